//! `curdworks-client`
//!
//! **Responsibility:** the front end of the curdworks back office.
//!
//! This crate provides:
//! - [`HttpApi`]: the JSON/HTTP implementation of the customer, product and
//!   order gateways
//! - [`Workbench`]: the view state (collaborator lists, order draft, forms,
//!   current notice) and the operations a user can perform on it
//! - a line-oriented console that drives the workbench (`curdworks` binary)
//!
//! The API remains the authority for all durable state.

pub mod config;
pub mod console;
pub mod http;
pub mod workbench;

pub use config::ClientConfig;
pub use http::HttpApi;
pub use workbench::{BackOffice, Workbench};
