//! Daily price history from the Yahoo chart API.

mod assemble;
mod fetch;
mod wire;

use chrono::NaiveDate;

use crate::core::{PriceBar, SgClient, SgError};
use crate::indicators;
use assemble::{ExchangeClock, assemble_bars};

/// A builder for fetching daily bars for one ticker, with indicators applied.
///
/// Both bounds of [`between`](Self::between) are inclusive calendar days. Bars carry
/// unadjusted OHLC plus the adjusted close; returns and EMAs are computed over the
/// adjusted close.
pub struct HistoryBuilder<'a> {
    client: &'a SgClient,
    ticker: String,
    company: Option<String>,
    range: Option<(NaiveDate, NaiveDate)>,
}

impl<'a> HistoryBuilder<'a> {
    pub fn new(client: &'a SgClient, ticker: impl Into<String>) -> Self {
        Self {
            client,
            ticker: ticker.into(),
            company: None,
            range: None,
        }
    }

    /// Company name stamped on every bar. Defaults to the ticker.
    pub fn company(mut self, name: impl Into<String>) -> Self {
        self.company = Some(name.into());
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.range = Some((start, end));
        self
    }

    /// # Errors
    ///
    /// Returns `SgError::InvalidDates` for a reversed range, `SgError::Status` for a
    /// non-2xx response, `SgError::Json` for a body that is not valid JSON and
    /// `SgError::Data` when the chart payload is incomplete or reports an error.
    #[tracing::instrument(skip(self), err, fields(ticker = %self.ticker))]
    pub async fn fetch(self) -> Result<Vec<PriceBar>, SgError> {
        let (start, end) = self
            .range
            .ok_or_else(|| SgError::Data("no date range set".into()))?;
        if start > end {
            return Err(SgError::InvalidDates);
        }
        let stop = end.succ_opt().ok_or(SgError::InvalidDates)?;
        let period1 = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let period2 = stop.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();

        let fetched = fetch::fetch_chart(self.client, &self.ticker, period1, period2).await?;
        let clock = ExchangeClock::from_meta(fetched.meta.as_ref());
        let company = self.company.as_deref().unwrap_or(&self.ticker);

        let mut bars = assemble_bars(
            &fetched.ts,
            &fetched.quote,
            &fetched.adjclose,
            &clock,
            &self.ticker,
            company,
        );
        // Yahoo pads the window; keep exactly the requested days.
        bars.retain(|b| b.date >= start && b.date <= end);
        indicators::apply(&mut bars);

        tracing::info!(records = bars.len(), "fetched price history");
        Ok(bars)
    }
}
