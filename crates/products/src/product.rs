//! Products, the new-product form and the product API port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use curdworks_core::{DomainError, DomainResult, Entity, GatewayResult, ProductId, parse_number};

/// Catalog product as returned by the API (read-only to the client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    /// Price per kilogram.
    #[serde(default)]
    pub price_per_kg: f64,
    /// Stock on hand, in kilograms.
    #[serde(default)]
    pub stock_kg: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Editable fields of the product form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Sku,
    PricePerKg,
    StockKg,
}

/// In-progress "new product" form. Fields hold raw text until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub price_per_kg: String,
    pub stock_kg: String,
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub price_per_kg: f64,
    pub stock_kg: f64,
    pub is_active: bool,
}

impl NewProduct {
    pub fn set(&mut self, field: ProductField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProductField::Name => self.name = value,
            ProductField::Sku => self.sku = value,
            ProductField::PricePerKg => self.price_per_kg = value,
            ProductField::StockKg => self.stock_kg = value,
        }
    }

    /// Build the create payload.
    ///
    /// Empty price/stock text counts as zero; any other text must be a
    /// non-negative number.
    pub fn to_request(&self) -> DomainResult<CreateProductRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("product name is required"));
        }

        let sku = self.sku.trim();

        Ok(CreateProductRequest {
            name: name.to_string(),
            sku: (!sku.is_empty()).then(|| sku.to_string()),
            price_per_kg: quantity_field("price_per_kg", &self.price_per_kg)?,
            stock_kg: quantity_field("stock_kg", &self.stock_kg)?,
            is_active: true,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn quantity_field(name: &str, text: &str) -> DomainResult<f64> {
    if text.trim().is_empty() {
        return Ok(0.0);
    }
    match parse_number(text) {
        Some(v) if v >= 0.0 => Ok(v),
        Some(_) => Err(DomainError::validation(format!("{name} must not be negative"))),
        None => Err(DomainError::validation(format!("{name} must be a number"))),
    }
}

/// Port to the remote product catalog.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    async fn list_products(&self) -> GatewayResult<Vec<Product>>;

    async fn create_product(&self, request: &CreateProductRequest) -> GatewayResult<()>;
}
