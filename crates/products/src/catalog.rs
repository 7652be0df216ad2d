//! In-memory view of the product list last fetched from the API.

use curdworks_core::{ProductId, find_by_id};

use crate::product::Product;

/// Snapshot of the catalog, replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        find_by_id(&self.products, id)
    }

    /// Current catalog price per kilogram, if the product is known.
    pub fn price_of(&self, id: &ProductId) -> Option<f64> {
        self.get(id).map(|p| p.price_per_kg)
    }

    pub fn name_of(&self, id: &ProductId) -> Option<&str> {
        self.get(id).map(|p| p.name.as_str())
    }
}
