//! Core module: grading scheme, score sets, the aggregator, and reporting

pub mod aggregator;
pub mod config;
pub mod report;
pub mod scheme;
pub mod scores;
