//! Weekly aggregation pipeline for the COVID-19 behavior survey dashboard.

pub mod aggregate;
pub mod ingest;
pub mod models;
pub mod report;
