use chrono::NaiveDate;
use serde::Serialize;

/* ----- PRICES (shared by history/, indicators/ and dataset/) ----- */

/// One trading day for a single ticker, with the derived indicator columns.
///
/// `daily_return`, `ema_7` and `ema_21` are filled in by [`crate::indicators::apply`];
/// bars straight out of the chart decoder carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
    pub daily_return: Option<f64>,
    pub ema_7: Option<f64>,
    pub ema_21: Option<f64>,
    pub ticker: String,
    pub company: String,
}

/* ----- NEWS (shared by news/ and dataset/) ----- */

/// Separator placed between headlines of the same day.
pub const HEADLINE_DELIMITER: &str = " | ";

/// The surviving headlines for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyNewsRow {
    pub date: NaiveDate,
    /// Titles in ranked order, joined with [`HEADLINE_DELIMITER`].
    pub headlines: String,
    pub ticker: String,
    pub company: String,
}

impl DailyNewsRow {
    /// Split the joined headline field back into individual titles.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.headlines.split(HEADLINE_DELIMITER)
    }
}
