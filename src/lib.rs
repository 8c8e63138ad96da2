pub mod catalog;
pub mod cli;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod ingest;
pub mod scanner;
