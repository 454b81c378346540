//! Relevance filtering and ranking of one day's articles.

use std::cmp::Reverse;

use crate::news::model::{ArticleRecord, Tier};
use crate::text::{clean_keywords, strip_symbols};

/// Event-type terms that make a company mention market-relevant.
pub const IMPACT_KEYWORDS: &[&str] = &[
    "earnings",
    "profit",
    "loss",
    "revenue",
    "guidance",
    "dividend",
    "ipo",
    "lawsuit",
    "merger",
    "acquisition",
    "partnership",
    "regulation",
    "fine",
    "recall",
    "data breach",
    "analyst upgrade",
    "analyst downgrade",
    "stock buyback",
];

/// Finance vocabulary counted in titles when ranking.
pub const FINANCE_KEYWORDS: &[&str] = &[
    "finance",
    "market",
    "shares",
    "investment",
    "stock",
    "economy",
    "ipo",
    "trading",
    "fund",
    "earnings",
    "revenue",
    "profit",
    "dividend",
    "valuation",
    "forecast",
    "guidance",
];

/// Headlines kept per day unless the caller asks otherwise.
pub const DEFAULT_TOP_N: usize = 5;

const LANGUAGE_TAGS: &[&str] = &["en", "english"];
const MARKET_TERMS: &[&str] = &["stock", "shares"];

/// The keyword lists the filter works with.
///
/// Only the company keywords vary per run; the impact list is a module constant.
/// Title scoring uses [`FINANCE_KEYWORDS`] directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    company: Vec<String>,
}

impl KeywordSet {
    /// Build from raw company keywords (ticker, aliases, executives, products).
    /// Phrases are cleaned with [`clean_keywords`]; those that clean to nothing are dropped.
    pub fn new<I, S>(company_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let company = clean_keywords(company_keywords)
            .into_iter()
            .map(|k| k.to_lowercase())
            .collect();
        Self { company }
    }

    /// Cleaned, lowercased company keywords.
    pub fn company_keywords(&self) -> &[String] {
        &self.company
    }

    pub fn impact_keywords(&self) -> &'static [&'static str] {
        IMPACT_KEYWORDS
    }

    pub fn is_empty(&self) -> bool {
        self.company.is_empty()
    }
}

/// Lowercased title and summary with symbols stripped, the text keywords are matched in.
fn haystack(article: &ArticleRecord) -> String {
    let summary = article.summary.as_deref().unwrap_or("");
    strip_symbols(&format!("{} {}", article.title, summary)).to_lowercase()
}

fn contains_any<S: AsRef<str>>(text: &str, needles: &[S]) -> bool {
    needles.iter().any(|n| text.contains(n.as_ref()))
}

/// Whether the article is tagged English. Untagged articles are not.
pub fn is_english(article: &ArticleRecord) -> bool {
    article
        .language
        .as_deref()
        .map(|lang| {
            let lang = lang.trim().to_lowercase();
            LANGUAGE_TAGS.contains(&lang.as_str())
        })
        .unwrap_or(false)
}

/// Company keyword present in title or summary.
pub fn mentions_company(article: &ArticleRecord, keywords: &KeywordSet) -> bool {
    contains_any(&haystack(article), keywords.company_keywords())
}

/// Company keyword present, plus an impact keyword or "stock"/"shares".
pub fn is_market_relevant(article: &ArticleRecord, keywords: &KeywordSet) -> bool {
    let text = haystack(article);
    contains_any(&text, keywords.company_keywords())
        && (contains_any(&text, keywords.impact_keywords()) || contains_any(&text, MARKET_TERMS))
}

/// Sum of non-overlapping, case-insensitive occurrences of every finance keyword in `title`.
pub fn score_title(title: &str) -> usize {
    let title = title.to_lowercase();
    FINANCE_KEYWORDS
        .iter()
        .map(|kw| title.matches(kw).count())
        .sum()
}

/// The articles that made it through the relevance filter, and through which tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered<'a> {
    pub tier: Tier,
    pub articles: Vec<&'a ArticleRecord>,
}

/// Language filter, then the primary tier, then the fallback tier if the primary
/// tier kept nothing. Input order is preserved.
pub fn filter_relevant<'a>(articles: &'a [ArticleRecord], keywords: &KeywordSet) -> Filtered<'a> {
    let english: Vec<&ArticleRecord> = articles.iter().filter(|a| is_english(a)).collect();

    let primary: Vec<&ArticleRecord> = english
        .iter()
        .copied()
        .filter(|a| is_market_relevant(a, keywords))
        .collect();
    if !primary.is_empty() {
        return Filtered {
            tier: Tier::Primary,
            articles: primary,
        };
    }

    Filtered {
        tier: Tier::Fallback,
        articles: english
            .into_iter()
            .filter(|a| mentions_company(a, keywords))
            .collect(),
    }
}

/// Sort by title score, highest first, keeping input order among equal scores, and
/// keep at most `top_n`.
pub fn select_top<'a>(mut candidates: Vec<&'a ArticleRecord>, top_n: usize) -> Vec<&'a ArticleRecord> {
    candidates.sort_by_key(|a| Reverse(score_title(&a.title)));
    candidates.truncate(top_n);
    candidates
}

/// Filter and rank one day's batch.
pub fn rank_day<'a>(
    articles: &'a [ArticleRecord],
    keywords: &KeywordSet,
    top_n: usize,
) -> Filtered<'a> {
    let filtered = filter_relevant(articles, keywords);
    Filtered {
        tier: filtered.tier,
        articles: select_top(filtered.articles, top_n),
    }
}
