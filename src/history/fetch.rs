use crate::core::{SgClient, SgError, net};
use crate::history::wire::{ChartEnvelope, MetaNode, QuoteBlock};

pub(crate) struct Fetched {
    pub(crate) ts: Vec<i64>,
    pub(crate) quote: QuoteBlock,
    pub(crate) adjclose: Vec<Option<f64>>,
    pub(crate) meta: Option<MetaNode>,
}

/// Daily bars for `symbol` between two Unix timestamps (`period1` inclusive, `period2` exclusive).
pub(crate) async fn fetch_chart(
    client: &SgClient,
    symbol: &str,
    period1: i64,
    period2: i64,
) -> Result<Fetched, SgError> {
    if period1 >= period2 {
        return Err(SgError::InvalidDates);
    }

    let mut url = client.base_chart().join(symbol)?;
    url.query_pairs_mut()
        .append_pair("period1", &period1.to_string())
        .append_pair("period2", &period2.to_string())
        .append_pair("interval", "1d")
        .append_pair("events", "div|split")
        .append_pair("includePrePost", "false");

    let resp = client.http().get(url.clone()).send().await?;
    if !resp.status().is_success() {
        return Err(SgError::Status {
            status: resp.status().as_u16(),
            url: url.to_string(),
        });
    }

    let body = net::get_text(resp, "history_chart", symbol).await?;
    decode_chart(&body)
}

fn decode_chart(body: &str) -> Result<Fetched, SgError> {
    let parsed: ChartEnvelope = serde_json::from_str(body)?;

    let chart = parsed
        .chart
        .ok_or_else(|| SgError::Data("missing chart".into()))?;

    if let Some(err) = chart.error {
        return Err(SgError::Data(format!(
            "yahoo error: {} - {}",
            err.code, err.description
        )));
    }

    let mut results = chart
        .result
        .ok_or_else(|| SgError::Data("missing result".into()))?;

    let r0 = results
        .pop()
        .ok_or_else(|| SgError::Data("empty result".into()))?;

    let ts = r0.timestamp.unwrap_or_default();
    // A range with no trading days comes back without a quote block.
    let quote = r0.indicators.quote.into_iter().next().unwrap_or(QuoteBlock {
        open: Vec::new(),
        high: Vec::new(),
        low: Vec::new(),
        close: Vec::new(),
        volume: Vec::new(),
    });
    let adjclose = r0
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    Ok(Fetched {
        ts,
        quote,
        adjclose,
        meta: r0.meta,
    })
}
