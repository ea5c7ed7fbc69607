use crate::models::ListingRecord;
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;

/// CSS contract of a listing card
#[derive(Debug, Clone)]
pub struct CardSelectors {
    pub card: String,
    pub name: String,
    pub price: String,
    pub location: String,
    pub image: String,
    pub image_attr: String,
    pub currency_token: String,
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            card: "div.col.s6.m4.l3".to_string(),
            name: "p.ad__card-description a".to_string(),
            price: "p.ad__card-price a".to_string(),
            location: "p.ad__card-location span".to_string(),
            image: "img.ad__card-img".to_string(),
            image_attr: "src".to_string(),
            currency_token: "CFA".to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("card has no {0}")]
    MissingField(&'static str),
}

/// Whatever could be read off one card, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCard {
    pub name: Option<String>,
    pub price: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
}

impl RawCard {
    /// All-or-nothing conversion into a record.
    ///
    /// Name, address and image must be non-empty. The price element must be
    /// present but its text may be empty; it is coerced later.
    pub fn into_record(self, category: &str, page: u32) -> Result<ListingRecord, CardError> {
        let name = self.name.filter(|s| !s.is_empty());
        let address = self.address.filter(|s| !s.is_empty());
        let image_url = self.image_url.filter(|s| !s.is_empty());

        Ok(ListingRecord {
            category: category.to_string(),
            page,
            name: name.ok_or(CardError::MissingField("name"))?,
            price: self.price.ok_or(CardError::MissingField("price"))?,
            address: address.ok_or(CardError::MissingField("address"))?,
            image_url: image_url.ok_or(CardError::MissingField("image"))?,
        })
    }
}

/// Turns a parsed listing page into records
pub struct CardExtractor {
    card: Selector,
    name: Selector,
    price: Selector,
    location: Selector,
    image: Selector,
    image_attr: String,
    currency_token: String,
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector '{}': {:?}", css, e))
}

impl CardExtractor {
    /// Create an extractor for the CoinAfrique card layout
    pub fn new() -> Result<Self> {
        Self::with_selectors(CardSelectors::default())
    }

    pub fn with_selectors(selectors: CardSelectors) -> Result<Self> {
        Ok(Self {
            card: parse_selector(&selectors.card)?,
            name: parse_selector(&selectors.name)?,
            price: parse_selector(&selectors.price)?,
            location: parse_selector(&selectors.location)?,
            image: parse_selector(&selectors.image)?,
            image_attr: selectors.image_attr,
            currency_token: selectors.currency_token,
        })
    }

    /// Extract every complete card of a listing page, in document order.
    ///
    /// Cards missing a field are skipped. A page without cards, or one that is
    /// not HTML at all, yields an empty vector.
    pub fn extract(&self, html: &str, category: &str, page: u32) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);

        let mut records = Vec::new();
        let mut skipped = 0;

        for (idx, card) in document.select(&self.card).enumerate() {
            match self.read_card(card).into_record(category, page) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    debug!("Skipped card {} on {} page {}: {}", idx, category, page, e);
                }
            }
        }

        debug!(
            "Extracted {} records from {} page {} ({} cards skipped)",
            records.len(),
            category,
            page,
            skipped
        );

        records
    }

    /// Read the four fields off one card without judging them
    pub fn read_card(&self, card: ElementRef<'_>) -> RawCard {
        RawCard {
            name: Self::text_of(card, &self.name),
            price: Self::text_of(card, &self.price)
                .map(|price| price.replace(self.currency_token.as_str(), "").trim().to_string()),
            address: Self::text_of(card, &self.location),
            image_url: card
                .select(&self.image)
                .next()
                .and_then(|img| img.value().attr(&self.image_attr))
                .map(|src| src.trim().to_string()),
        }
    }

    fn text_of(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
        card.select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }
}
