//! Products module (catalog of goods sold by weight).
//!
//! Products are owned by the remote API. This crate holds their read shape,
//! the in-memory [`Catalog`] used to resolve default prices, the "new product"
//! form and the port used to list and create products.

pub mod catalog;
pub mod product;

pub use catalog::Catalog;
pub use product::{CreateProductRequest, NewProduct, Product, ProductField, ProductGateway};
