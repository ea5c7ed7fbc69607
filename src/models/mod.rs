use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the current dataset was obtained
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Source {
    Scraped,
    UploadedFile,
    DefaultFile,
}

impl Source {
    pub fn label(&self) -> &'static str {
        match self {
            Source::Scraped => "scraped",
            Source::UploadedFile => "uploaded file",
            Source::DefaultFile => "default file",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One classified ad, as extracted from a listing card or loaded from a file.
///
/// The serialized column names match the exported data files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingRecord {
    #[serde(rename = "categorie")]
    pub category: String,
    pub page: u32,
    #[serde(rename = "nom")]
    pub name: String,
    /// Free text, currency token already stripped
    #[serde(rename = "prix")]
    pub price: String,
    #[serde(rename = "adresse")]
    pub address: String,
    #[serde(rename = "image")]
    pub image_url: String,
}

impl ListingRecord {
    /// Numeric view of the price, `None` when it does not parse
    pub fn price_value(&self) -> Option<f64> {
        coerce_price(&self.price)
    }

    /// True when every text field that must carry data does.
    pub fn is_complete(&self) -> bool {
        !self.category.is_empty()
            && !self.name.is_empty()
            && !self.address.is_empty()
            && !self.image_url.is_empty()
    }
}

/// Coerce a free-text price into a number.
///
/// Digit-group separators (plain or non-breaking spaces) are ignored, so
/// "15 000" reads as 15000. This is deliberately wider than strict numeric
/// coercion, which would treat such prices as missing; CoinAfrique prints
/// large prices with grouped digits. Anything else that fails to parse, or
/// parses to a non-finite value, is treated as missing.
pub fn coerce_price(raw: &str) -> Option<f64> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\u{202f}')
        .collect();
    if compact.is_empty() {
        return None;
    }
    compact.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// An ordered set of listing records plus its provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub records: Vec<ListingRecord>,
    pub source: Source,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(records: Vec<ListingRecord>, source: Source) -> Self {
        Self {
            records,
            source,
            loaded_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
