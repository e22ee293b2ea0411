pub mod analytics;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod filter;
pub mod frame;
pub mod loader;
pub mod output;
pub mod report;
pub mod schema;
