// azure-events: subscribe Azure resources to service health incident alerts
// Exposes the argument parser and provisioning workflow as a library

pub mod alert;
pub mod binder;
pub mod cli;
pub mod config_file;
pub mod core;
pub mod error;
pub mod help;
pub mod http;
pub mod report;
pub mod retry;
pub mod schema;
pub mod tokenizer;
pub mod validation;
