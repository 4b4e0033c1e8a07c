use crate::odt::StatisticsBlock;

/// One of the counters in `meta:document-statistic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Pages,
    Words,
    Characters,
    Paragraphs,
    Images,
    Tables,
    NonWhitespaceCharacters,
    Objects,
}

impl Statistic {
    pub const ALL: [Statistic; 8] = [
        Statistic::Pages,
        Statistic::Words,
        Statistic::Characters,
        Statistic::Paragraphs,
        Statistic::Images,
        Statistic::Tables,
        Statistic::NonWhitespaceCharacters,
        Statistic::Objects,
    ];

    /// Project the counter this statistic names out of a statistics block.
    pub fn select(self, stats: &StatisticsBlock) -> u64 {
        match self {
            Statistic::Pages => stats.page_count,
            Statistic::Words => stats.word_count,
            Statistic::Characters => stats.character_count,
            Statistic::Paragraphs => stats.paragraph_count,
            Statistic::Images => stats.image_count,
            Statistic::Tables => stats.table_count,
            Statistic::NonWhitespaceCharacters => stats.non_whitespace_character_count,
            Statistic::Objects => stats.object_count,
        }
    }

    /// Attribute name in `meta.xml`, without the `meta:` prefix.
    pub fn attribute(self) -> &'static str {
        match self {
            Statistic::Pages => "page-count",
            Statistic::Words => "word-count",
            Statistic::Characters => "character-count",
            Statistic::Paragraphs => "paragraph-count",
            Statistic::Images => "image-count",
            Statistic::Tables => "table-count",
            Statistic::NonWhitespaceCharacters => "non-whitespace-character-count",
            Statistic::Objects => "object-count",
        }
    }

    pub fn from_attribute(name: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.attribute().as_bytes() == name)
    }
}
