pub mod config;
pub mod ingest;
pub mod order;
pub mod report;
pub mod section;
pub mod templates;
