//! CLI command handlers

pub mod config;
pub mod grade;
pub mod report;
