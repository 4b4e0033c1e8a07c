//! `meta.xml` document model and parser.
//!
//! Matching is by local name so namespace prefixes do not matter:
//!
//! ```text
//! <office:document-meta>
//!   <office:meta>
//!     <meta:creation-date>2023-09-15T10:00:00</meta:creation-date>
//!     <dc:title>Report</dc:title>
//!     <meta:document-statistic meta:page-count="3" meta:word-count="812" .../>
//!   </office:meta>
//! </office:document-meta>
//! ```

use quick_xml::Reader;
use quick_xml::escape::{EscapeError, unescape};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use crate::statistic::Statistic;

/// Counters from `meta:document-statistic`. Absent counters are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsBlock {
    pub page_count: u64,
    pub word_count: u64,
    pub character_count: u64,
    pub paragraph_count: u64,
    pub image_count: u64,
    pub table_count: u64,
    pub non_whitespace_character_count: u64,
    pub object_count: u64,
}

impl StatisticsBlock {
    fn set(&mut self, stat: Statistic, value: u64) {
        let field = match stat {
            Statistic::Pages => &mut self.page_count,
            Statistic::Words => &mut self.word_count,
            Statistic::Characters => &mut self.character_count,
            Statistic::Paragraphs => &mut self.paragraph_count,
            Statistic::Images => &mut self.image_count,
            Statistic::Tables => &mut self.table_count,
            Statistic::NonWhitespaceCharacters => &mut self.non_whitespace_character_count,
            Statistic::Objects => &mut self.object_count,
        };
        *field = value;
    }
}

/// Parsed contents of `meta.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Raw `meta:creation-date`, empty when absent.
    pub creation_date: String,
    pub title: String,
    pub statistics: StatisticsBlock,
}

#[derive(Debug, Error)]
pub enum MetaParseError {
    #[error("meta.xml is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error("invalid attribute in meta.xml")]
    Attribute(#[from] AttrError),

    #[error("invalid character or entity reference in meta.xml")]
    Escape(#[from] EscapeError),

    #[error("meta.xml has no root element")]
    NoRoot,

    #[error("meta.xml has content outside its root element")]
    OutsideRoot,

    #[error("meta.xml ends before its elements are closed")]
    Unterminated,
}

/// Parse a `meta.xml` document.
///
/// Missing elements and attributes, and counters that are not non-negative
/// integers, fall back to defaults. Only a document that is not well-formed
/// is an error.
pub fn parse_meta_xml(data: &[u8]) -> Result<DocumentMetadata, MetaParseError> {
    let xml = std::str::from_utf8(data)?;
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);

    // Text is trimmed once it is assembled; trimming per event would eat the
    // spaces around entity references.
    let mut reader = Reader::from_str(xml);

    let mut meta = DocumentMetadata::default();
    let mut creation_date = None;
    let mut title = None;
    let mut statistics = None;

    let mut depth = 0usize;
    let mut saw_root = false;
    let mut in_meta = false;
    let mut meta_done = false;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) => {
                check_attributes(&e)?;
                if depth == 0 {
                    if saw_root {
                        return Err(MetaParseError::OutsideRoot);
                    }
                    saw_root = true;
                }
                match (depth, e.local_name().as_ref()) {
                    (1, b"meta") if !meta_done => in_meta = true,
                    (2, b"creation-date") if in_meta && creation_date.is_none() => {
                        // Consumes the matching end tag.
                        creation_date = Some(read_text_field(&mut reader)?);
                        continue;
                    }
                    (2, b"title") if in_meta && title.is_none() => {
                        title = Some(read_text_field(&mut reader)?);
                        continue;
                    }
                    (2, b"document-statistic") if in_meta && statistics.is_none() => {
                        statistics = Some(read_statistics(&e)?);
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(e) => {
                check_attributes(&e)?;
                if depth == 0 {
                    if saw_root {
                        return Err(MetaParseError::OutsideRoot);
                    }
                    saw_root = true;
                }
                match (depth, e.local_name().as_ref()) {
                    (1, b"meta") => meta_done = true,
                    (2, b"document-statistic") if in_meta && statistics.is_none() => {
                        statistics = Some(read_statistics(&e)?);
                    }
                    _ => {}
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 1 && in_meta {
                    in_meta = false;
                    meta_done = true;
                }
            }
            Event::Text(t) if depth == 0 => {
                if !t.iter().all(u8::is_ascii_whitespace) {
                    return Err(MetaParseError::OutsideRoot);
                }
            }
            Event::CData(_) | Event::GeneralRef(_) if depth == 0 => {
                return Err(MetaParseError::OutsideRoot);
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(MetaParseError::NoRoot);
    }
    if depth != 0 {
        return Err(MetaParseError::Unterminated);
    }

    meta.creation_date = creation_date.unwrap_or_default();
    meta.title = title.unwrap_or_default();
    meta.statistics = statistics.unwrap_or_default();
    Ok(meta)
}

/// Collect the character data of the element just opened, up to and
/// including its end tag. Text of nested elements is skipped.
fn read_text_field(reader: &mut Reader<&[u8]>) -> Result<String, MetaParseError> {
    let mut text = String::new();
    let mut nested = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                check_attributes(&e)?;
                nested += 1;
            }
            Event::Empty(e) => check_attributes(&e)?,
            Event::End(_) if nested == 0 => break,
            Event::End(_) => nested -= 1,
            Event::Text(t) if nested == 0 => {
                text.push_str(&unescape(std::str::from_utf8(&t)?)?);
            }
            Event::CData(c) if nested == 0 => text.push_str(std::str::from_utf8(&c)?),
            Event::GeneralRef(r) if nested == 0 => {
                let name = std::str::from_utf8(&r)?;
                text.push_str(&unescape(&format!("&{name};"))?);
            }
            Event::Eof => return Err(MetaParseError::Unterminated),
            _ => {}
        }
    }

    Ok(text.trim().to_string())
}

fn check_attributes(element: &BytesStart<'_>) -> Result<(), MetaParseError> {
    for attr in element.attributes() {
        attr?;
    }
    Ok(())
}

fn read_statistics(element: &BytesStart<'_>) -> Result<StatisticsBlock, MetaParseError> {
    let mut stats = StatisticsBlock::default();
    for attr in element.attributes() {
        let attr = attr?;
        let Some(stat) = Statistic::from_attribute(attr.key.local_name().as_ref()) else {
            continue;
        };
        let value = std::str::from_utf8(&attr.value)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);
        stats.set(stat, value);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zip::fixture::meta_xml;

    #[test]
    fn test_parse_office_meta() {
        let xml = meta_xml(
            "2023-09-15T10:00:00.512000000",
            "Quarterly &amp; Annual",
            r#"meta:table-count="2" meta:image-count="1" meta:object-count="0" meta:page-count="4" meta:paragraph-count="31" meta:word-count="812" meta:character-count="5120" meta:non-whitespace-character-count="4301""#,
        );

        let meta = parse_meta_xml(xml.as_bytes()).unwrap();
        assert_eq!(meta.creation_date, "2023-09-15T10:00:00.512000000");
        assert_eq!(meta.title, "Quarterly & Annual");
        assert_eq!(
            meta.statistics,
            StatisticsBlock {
                page_count: 4,
                word_count: 812,
                character_count: 5120,
                paragraph_count: 31,
                image_count: 1,
                table_count: 2,
                non_whitespace_character_count: 4301,
                object_count: 0,
            }
        );
    }

    #[test]
    fn test_missing_and_invalid_counters_default_to_zero() {
        let xml = meta_xml(
            "2021-01-02T00:00:00",
            "Draft",
            r#"meta:word-count="12" meta:page-count="-3" meta:table-count="many" meta:cell-count="9""#,
        );

        let stats = parse_meta_xml(xml.as_bytes()).unwrap().statistics;
        assert_eq!(stats.word_count, 12);
        assert_eq!(stats.page_count, 0);
        assert_eq!(stats.table_count, 0);
        assert_eq!(stats.character_count, 0);
        assert_eq!(stats.object_count, 0);
    }

    #[test]
    fn test_missing_elements_are_empty() {
        let xml = r#"<?xml version="1.0"?><office:document-meta><office:meta/></office:document-meta>"#;
        let meta = parse_meta_xml(xml.as_bytes()).unwrap();
        assert_eq!(meta, DocumentMetadata::default());

        let meta = parse_meta_xml(b"<document-meta/>").unwrap();
        assert_eq!(meta, DocumentMetadata::default());
    }

    #[test]
    fn test_statistic_element_with_end_tag() {
        let xml = r#"<doc><meta><title>T</title><document-statistic page-count="2"></document-statistic></meta></doc>"#;
        let meta = parse_meta_xml(xml.as_bytes()).unwrap();
        assert_eq!(meta.title, "T");
        assert_eq!(meta.statistics.page_count, 2);
    }

    #[test]
    fn test_fields_outside_meta_are_ignored() {
        let xml = r#"<doc><title>Outer</title><meta><creation-date>2020-05-06</creation-date></meta><other><document-statistic page-count="9"/></other></doc>"#;
        let meta = parse_meta_xml(xml.as_bytes()).unwrap();
        assert_eq!(meta.title, "");
        assert_eq!(meta.creation_date, "2020-05-06");
        assert_eq!(meta.statistics.page_count, 0);
    }

    #[test]
    fn test_malformed_documents_fail() {
        assert!(matches!(
            parse_meta_xml(b"<doc><meta></doc>"),
            Err(MetaParseError::Xml(_))
        ));
        assert!(parse_meta_xml(b"<doc><meta>").is_err());
        assert!(matches!(parse_meta_xml(b""), Err(MetaParseError::NoRoot)));
        assert!(matches!(
            parse_meta_xml(b"<doc>\xff</doc>"),
            Err(MetaParseError::Encoding(_))
        ));
    }

    #[test]
    fn test_cdata_and_references_are_decoded() {
        let xml = r#"<doc><meta><creation-date><![CDATA[2023-09-15T10:00:00]]></creation-date><title>  <![CDATA[X & Y]]> &amp; Z &#x41;&#66; </title></meta></doc>"#;
        let meta = parse_meta_xml(xml.as_bytes()).unwrap();
        assert_eq!(meta.creation_date, "2023-09-15T10:00:00");
        assert_eq!(meta.title, "X & Y & Z AB");
    }

    #[test]
    fn test_nested_text_is_skipped() {
        let xml = r#"<doc><meta><title>Main<span>aside</span> part</title></meta></doc>"#;
        let meta = parse_meta_xml(xml.as_bytes()).unwrap();
        assert_eq!(meta.title, "Main part");
    }

    #[test]
    fn test_content_outside_root_fails() {
        assert!(matches!(
            parse_meta_xml(b"<doc><meta><title>A</title></meta></doc><second/>"),
            Err(MetaParseError::OutsideRoot)
        ));
        assert!(matches!(
            parse_meta_xml(b"<doc><meta><title>A</title></meta></doc>trailing"),
            Err(MetaParseError::OutsideRoot)
        ));
        assert!(matches!(
            parse_meta_xml(b"leading<doc/>"),
            Err(MetaParseError::OutsideRoot)
        ));
        assert!(parse_meta_xml(b"<doc/>\n  \n").is_ok());
    }

    #[test]
    fn test_undefined_entity_fails() {
        assert!(matches!(
            parse_meta_xml(b"<doc><meta><title>A &bogus; B</title></meta></doc>"),
            Err(MetaParseError::Escape(_))
        ));
    }

    #[test]
    fn test_duplicate_attribute_fails() {
        assert!(matches!(
            parse_meta_xml(br#"<doc a="1" a="2"><meta/></doc>"#),
            Err(MetaParseError::Attribute(_))
        ));
        let xml = br#"<doc><meta><document-statistic page-count="1" page-count="2"/></meta></doc>"#;
        assert!(matches!(parse_meta_xml(xml), Err(MetaParseError::Attribute(_))));
    }
}
