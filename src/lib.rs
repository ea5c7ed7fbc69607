//! Scrapes CoinAfrique animal listings into a flat dataset and summarises it.

pub mod config;
pub mod dashboard;
pub mod models;
pub mod scrapers;
pub mod session;
pub mod store;
