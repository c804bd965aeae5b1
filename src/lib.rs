//! CPC report generator for merchant advertising exports.
//!
//! Takes the daily performance spreadsheet a merchant downloads from the ad
//! platform (Chinese headers, newest day first, numbers formatted with
//! thousands separators) and turns it into a normalized statistical report:
//! whole-period totals, up to four weekly buckets, and per-day records.

pub mod clean;
pub mod columns;
pub mod error;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;
