use serde::Deserialize;

/// One article as published in the news payload.
///
/// Every field is optional; the card renderer substitutes placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArticleRecord {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
    #[serde(alias = "source")]
    pub source_name: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub published: Option<String>,
    pub fetched_at: Option<String>,
}

/// The precomputed news document.
///
/// Accepts both the current shape (`articles`, `article_count`) and the
/// older aggregator output (`news`, `total_news`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedPayload {
    #[serde(alias = "news")]
    pub articles: Vec<ArticleRecord>,
    pub last_updated: Option<String>,
    #[serde(alias = "total_news")]
    pub article_count: Option<usize>,
}

impl FeedPayload {
    /// Count to display: the published total when present, otherwise the
    /// number of articles actually delivered.
    pub fn display_count(&self) -> usize {
        self.article_count.unwrap_or(self.articles.len())
    }
}

/// Parse a JSON news payload.
pub fn parse_payload(bytes: &[u8]) -> Result<FeedPayload, serde_json::Error> {
    serde_json::from_slice(bytes)
}
