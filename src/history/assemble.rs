use chrono::{FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::core::PriceBar;
use crate::history::wire::{MetaNode, QuoteBlock};

/// Resolves a bar timestamp to the exchange's calendar date.
pub(crate) enum ExchangeClock {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ExchangeClock {
    /// Prefer the IANA zone name, then the raw GMT offset, then UTC.
    pub(crate) fn from_meta(meta: Option<&MetaNode>) -> Self {
        if let Some(tz) = meta
            .and_then(|m| m.exchange_timezone_name.as_deref())
            .and_then(|name| name.parse::<Tz>().ok())
        {
            return ExchangeClock::Named(tz);
        }
        let offset = meta
            .and_then(|m| m.gmtoffset)
            .and_then(|secs| i32::try_from(secs).ok())
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        ExchangeClock::Fixed(offset)
    }

    pub(crate) fn date_of(&self, ts: i64) -> Option<NaiveDate> {
        let utc = Utc.timestamp_opt(ts, 0).single()?;
        Some(match self {
            ExchangeClock::Named(tz) => utc.with_timezone(tz).date_naive(),
            ExchangeClock::Fixed(off) => utc.with_timezone(off).date_naive(),
        })
    }
}

/// Zip the columnar chart arrays into bars.
///
/// Rows missing any of open/high/low/close are dropped. A missing adjusted close falls
/// back to the close and a missing volume to zero. If two rows land on the same date the
/// later one wins.
pub(crate) fn assemble_bars(
    ts: &[i64],
    q: &QuoteBlock,
    adj: &[Option<f64>],
    clock: &ExchangeClock,
    ticker: &str,
    company: &str,
) -> Vec<PriceBar> {
    let mut out: Vec<PriceBar> = Vec::with_capacity(ts.len());

    for (i, &t) in ts.iter().enumerate() {
        let getter_f64 = |v: &Vec<Option<f64>>| v.get(i).and_then(|x| *x);
        let (Some(open), Some(high), Some(low), Some(close)) = (
            getter_f64(&q.open),
            getter_f64(&q.high),
            getter_f64(&q.low),
            getter_f64(&q.close),
        ) else {
            continue;
        };
        let Some(date) = clock.date_of(t) else {
            continue;
        };

        let bar = PriceBar {
            date,
            open,
            high,
            low,
            close,
            adj_close: adj.get(i).and_then(|x| *x).unwrap_or(close),
            volume: q.volume.get(i).and_then(|x| *x).unwrap_or(0),
            daily_return: None,
            ema_7: None,
            ema_21: None,
            ticker: ticker.to_string(),
            company: company.to_string(),
        };

        match out.last_mut() {
            Some(last) if last.date == date => *last = bar,
            _ => out.push(bar),
        }
    }

    out
}
