//! # Page specs
//!
//! Each spec knows where the ground truth lives in one source page and how to
//! lift it out as [`RawEntry`](crate::data::RawEntry) values. Specs only
//! extract: geocoding, caching and persistence happen in `resolve`,
//! `scrape` and `store`.
//!
//! ## Conventions
//! - CSS selectors come from `config::consts` so markup drift is a one-line fix.
//! - Section boundaries go through `core::html::SectionBoundary`.
//! - Entry order always follows document order.
//! - Specs are testable offline against inline fixtures.
pub mod testing_sites;
