pub mod view;

use crate::models::Dataset;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

pub use view::{charts, render_table, ChartSpec};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregationError {
    #[error("no data available")]
    NoData,
}

/// Number of records per category
pub fn count_by_category(ds: &Dataset) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in &ds.records {
        *counts.entry(record.category.clone()).or_insert(0) += 1;
    }
    counts
}

/// Numeric prices per category. Prices that do not coerce are left out, but
/// their category still gets an (empty) entry.
pub fn price_distribution(ds: &Dataset) -> BTreeMap<String, Vec<f64>> {
    let mut prices: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in &ds.records {
        let entry = prices.entry(record.category.clone()).or_default();
        if let Some(price) = record.price_value() {
            entry.push(price);
        }
    }
    prices
}

/// Mean numeric price per category; NaN where no price coerced.
pub fn mean_price_by_category(ds: &Dataset) -> BTreeMap<String, f64> {
    price_distribution(ds)
        .into_iter()
        .map(|(category, prices)| {
            let mean = if prices.is_empty() {
                f64::NAN
            } else {
                prices.iter().sum::<f64>() / prices.len() as f64
            };
            (category, mean)
        })
        .collect()
}

/// Share of records per category, summing to 1.0.
pub fn category_share(ds: &Dataset) -> Result<BTreeMap<String, f64>, AggregationError> {
    if ds.is_empty() {
        return Err(AggregationError::NoData);
    }
    let total = ds.len() as f64;
    Ok(count_by_category(ds)
        .into_iter()
        .map(|(category, count)| (category, count as f64 / total))
        .collect())
}

/// Five-number summary used for box plots
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

// Linear interpolation between closest ranks; `sorted` is non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

/// Everything the dashboard shows, computed once
#[derive(Debug, Clone)]
pub struct Summary {
    pub total: usize,
    pub counts: BTreeMap<String, usize>,
    pub prices: BTreeMap<String, Vec<f64>>,
    pub means: BTreeMap<String, f64>,
    pub shares: BTreeMap<String, f64>,
}

impl Summary {
    /// Aggregate a dataset, refusing empty or absent ones up front.
    pub fn compute(dataset: Option<&Dataset>) -> Result<Self, AggregationError> {
        let ds = match dataset {
            Some(ds) if !ds.is_empty() => ds,
            _ => return Err(AggregationError::NoData),
        };

        Ok(Self {
            total: ds.len(),
            counts: count_by_category(ds),
            prices: price_distribution(ds),
            means: mean_price_by_category(ds),
            shares: category_share(ds)?,
        })
    }

    pub fn box_stats(&self) -> BTreeMap<String, Option<BoxStats>> {
        self.prices
            .iter()
            .map(|(category, prices)| (category.clone(), BoxStats::from_values(prices)))
            .collect()
    }
}
