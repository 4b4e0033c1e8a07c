//! Test-only ZIP writer producing real archives for parser and pipeline tests.

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::Crc;
use flate2::write::DeflateEncoder;
use std::io::Write;
use std::path::Path;

use super::structures::{CDFH_SIGNATURE, CompressionMethod, EndOfCentralDirectory, LFH_SIGNATURE};

pub struct Member {
    pub name: String,
    pub data: Vec<u8>,
    pub deflate: bool,
}

impl Member {
    pub fn stored(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_vec(),
            deflate: false,
        }
    }

    pub fn deflated(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_vec(),
            deflate: true,
        }
    }
}

/// Serialize members into a complete single-disk archive.
pub fn build_zip(members: &[Member]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for member in members {
        let mut crc = Crc::new();
        crc.update(&member.data);
        let crc = crc.sum();

        let (method, payload) = if member.deflate {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&member.data).unwrap();
            (CompressionMethod::Deflate, encoder.finish().unwrap())
        } else {
            (CompressionMethod::Stored, member.data.clone())
        };

        let lfh_offset = out.len() as u32;
        let name = member.name.as_bytes();

        out.extend_from_slice(LFH_SIGNATURE);
        out.write_u16::<LittleEndian>(20).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(method.as_u16()).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0x21).unwrap();
        out.write_u32::<LittleEndian>(crc).unwrap();
        out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(member.data.len() as u32).unwrap();
        out.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.extend_from_slice(name);
        out.extend_from_slice(&payload);

        central.extend_from_slice(CDFH_SIGNATURE);
        central.write_u16::<LittleEndian>(20).unwrap();
        central.write_u16::<LittleEndian>(20).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(method.as_u16()).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(0x21).unwrap();
        central.write_u32::<LittleEndian>(crc).unwrap();
        central.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        central.write_u32::<LittleEndian>(member.data.len() as u32).unwrap();
        central.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u32::<LittleEndian>(0).unwrap();
        central.write_u32::<LittleEndian>(lfh_offset).unwrap();
        central.extend_from_slice(name);
    }

    let cd_offset = out.len() as u32;
    out.extend_from_slice(&central);

    out.extend_from_slice(EndOfCentralDirectory::SIGNATURE);
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(members.len() as u16).unwrap();
    out.write_u16::<LittleEndian>(members.len() as u16).unwrap();
    out.write_u32::<LittleEndian>(central.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(cd_offset).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();

    out
}

/// Build an OpenDocument text package with the given `meta.xml` body.
pub fn odt_with_meta(meta_xml: &str) -> Vec<u8> {
    build_zip(&[
        Member::stored("mimetype", b"application/vnd.oasis.opendocument.text"),
        Member::deflated("content.xml", b"<office:document-content/>"),
        Member::deflated("meta.xml", meta_xml.as_bytes()),
    ])
}

/// A `meta.xml` document as office suites write it.
pub fn meta_xml(creation_date: &str, title: &str, statistics: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-meta xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:meta="urn:oasis:names:tc:opendocument:xmlns:meta:1.0" xmlns:dc="http://purl.org/dc/elements/1.1/" office:version="1.3">
  <office:meta>
    <meta:creation-date>{creation_date}</meta:creation-date>
    <dc:title>{title}</dc:title>
    <meta:document-statistic {statistics}/>
  </office:meta>
</office:document-meta>"#
    )
}

pub fn write_odt(dir: &Path, name: &str, creation_date: &str, statistics: &str) {
    let xml = meta_xml(creation_date, name, statistics);
    std::fs::write(dir.join(name), odt_with_meta(&xml)).unwrap();
}
