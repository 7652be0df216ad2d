//! `curdworks-core`: shared building blocks for the curdworks client.
//!
//! This crate contains **pure** primitives (no IO): identifiers handed out by
//! the remote API, lenient parsing of numeric form text, and the error types
//! shared by every business area.

pub mod entity;
pub mod error;
pub mod id;
pub mod numeric;

pub use entity::{Entity, find_by_id};
pub use error::{DomainError, DomainResult, GatewayError, GatewayResult};
pub use id::{CustomerId, OrderId, ProductId};
pub use numeric::{finite_or_zero, parse_number};
