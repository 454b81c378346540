use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::news::model::ArticleRecord;

/// Layout of `seendate` in GDELT article lists.
const SEEN_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Deserialize)]
pub(crate) struct WireArticle {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) seendoc: Option<String>,
    #[serde(default)]
    pub(crate) snippet: Option<String>,
    #[serde(default)]
    pub(crate) language: Option<String>,
    #[serde(default)]
    pub(crate) url: Option<String>,
    #[serde(default)]
    pub(crate) domain: Option<String>,
    #[serde(default)]
    pub(crate) seendate: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

impl WireArticle {
    fn into_record(self) -> Option<ArticleRecord> {
        let title = non_empty(self.title)?;
        Some(ArticleRecord {
            title,
            summary: non_empty(self.seendoc).or_else(|| non_empty(self.snippet)),
            language: non_empty(self.language),
            url: self.url,
            domain: self.domain,
            seen_at: self
                .seendate
                .and_then(|s| NaiveDateTime::parse_from_str(&s, SEEN_DATE_FORMAT).ok()),
        })
    }
}

/// Pull the article list out of a decoded response.
///
/// Returns `None` when the response has no `articles` array at all. Entries that are not
/// objects, have the wrong field types or carry no title are skipped.
pub(crate) fn articles_from_value(value: Value) -> Option<Vec<ArticleRecord>> {
    let Value::Object(mut map) = value else {
        return None;
    };
    let Value::Array(items) = map.remove("articles")? else {
        return None;
    };

    let total = items.len();
    let records: Vec<ArticleRecord> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<WireArticle>(item).ok())
        .filter_map(WireArticle::into_record)
        .collect();

    if records.len() < total {
        tracing::debug!(
            skipped = total - records.len(),
            "skipped malformed or untitled articles"
        );
    }
    Some(records)
}
