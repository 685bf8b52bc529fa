pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod observability;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod storage;
pub mod types;
pub mod web;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;
