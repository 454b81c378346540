use chrono::{NaiveDate, NaiveDateTime};
use std::future::Future;
use std::pin::Pin;

use crate::core::{SgClient, SgError, net};

/// Timestamp layout GDELT expects for `startdatetime`/`enddatetime`.
const GDELT_DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Cap on articles returned for one window; the provider's maximum.
pub const MAX_RECORDS: u32 = 250;

/// One search request: a free-text query over a half-open time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayQuery {
    pub query: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub max_records: u32,
}

impl DayQuery {
    /// The 24-hour window `[date 00:00:00, date+1 00:00:00)`.
    pub fn for_day(query: impl Into<String>, date: NaiveDate) -> Self {
        let start = date.and_time(chrono::NaiveTime::MIN);
        Self {
            query: query.into(),
            start,
            end: start + chrono::Duration::days(1),
            max_records: MAX_RECORDS,
        }
    }
}

/// What came back from a news source, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResponse {
    pub status: u16,
    pub body: String,
}

/// A searchable news provider.
///
/// Implemented by [`SgClient`] for GDELT. An `Err` means no response was obtained at all
/// and is treated as a transient network fault by the fetcher.
pub trait NewsSource: Send + Sync {
    fn search<'a>(
        &'a self,
        query: &'a DayQuery,
    ) -> Pin<Box<dyn Future<Output = Result<SourceResponse, SgError>> + Send + 'a>>;
}

impl NewsSource for SgClient {
    fn search<'a>(
        &'a self,
        query: &'a DayQuery,
    ) -> Pin<Box<dyn Future<Output = Result<SourceResponse, SgError>> + Send + 'a>> {
        Box::pin(async move {
            let mut url = self.base_gdelt().clone();
            url.query_pairs_mut()
                .append_pair("query", &query.query)
                .append_pair("mode", "ArtList")
                .append_pair("maxrecords", &query.max_records.to_string())
                .append_pair("format", "JSON")
                .append_pair(
                    "startdatetime",
                    &query.start.format(GDELT_DATETIME_FORMAT).to_string(),
                )
                .append_pair(
                    "enddatetime",
                    &query.end.format(GDELT_DATETIME_FORMAT).to_string(),
                );

            let resp = self.http().get(url).send().await?;
            let status = resp.status().as_u16();
            let tag = query.start.date().to_string();
            let body = net::get_text(resp, "gdelt_artlist", &tag).await?;
            Ok(SourceResponse { status, body })
        })
    }
}
