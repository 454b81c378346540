use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::core::{DailyNewsRow, PriceBar};

/// One line of the output table: a price bar plus that day's headlines, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Adj Close")]
    pub adj_close: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
    #[serde(rename = "Daily_Return")]
    pub daily_return: Option<f64>,
    #[serde(rename = "EMA_7")]
    pub ema_7: Option<f64>,
    #[serde(rename = "EMA_21")]
    pub ema_21: Option<f64>,
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Headlines")]
    pub headlines: Option<String>,
}

/// Left-join news rows onto price bars by (date, ticker, company).
///
/// Every bar yields exactly one row, in bar order. News rows without a matching bar
/// (weekends, holidays) are dropped.
pub fn left_join(bars: &[PriceBar], news: &[DailyNewsRow]) -> Vec<DatasetRow> {
    let by_key: HashMap<(NaiveDate, &str, &str), &str> = news
        .iter()
        .map(|n| {
            (
                (n.date, n.ticker.as_str(), n.company.as_str()),
                n.headlines.as_str(),
            )
        })
        .collect();

    bars.iter()
        .map(|b| DatasetRow {
            date: b.date,
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            adj_close: b.adj_close,
            volume: b.volume,
            daily_return: b.daily_return,
            ema_7: b.ema_7,
            ema_21: b.ema_21,
            ticker: b.ticker.clone(),
            company: b.company.clone(),
            headlines: by_key
                .get(&(b.date, b.ticker.as_str(), b.company.as_str()))
                .map(|h| (*h).to_string()),
        })
        .collect()
}
