//! Order draft: the order under construction before it is sent to the API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use curdworks_core::{CustomerId, ProductId, finite_or_zero, parse_number};
use curdworks_products::Catalog;

use crate::order::CreateOrderRequest;

/// Committed order line: product, weight, unit price.
///
/// The unit price is frozen when the line is committed; later catalog price
/// changes do not affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    /// Weight in kilograms (fractional allowed).
    pub quantity_kg: f64,
    /// Price per kilogram.
    pub unit_price: f64,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        finite_or_zero(self.unit_price) * finite_or_zero(self.quantity_kg)
    }
}

/// The order under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    pub customer_id: Option<CustomerId>,
    /// Insertion order is display order and the basis of removal by position.
    pub items: Vec<LineItem>,
    pub notes: String,
}

impl OrderDraft {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() && self.items.is_empty() && self.notes.is_empty()
    }
}

/// Field of the pending entry being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingField {
    Product,
    Quantity,
    /// Optional unit price override; empty means "use the catalog price".
    UnitPrice,
}

/// Raw, unvalidated line entry. Values are interpreted only on commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEntry {
    pub product_id: String,
    pub quantity_kg: String,
    pub unit_price: String,
}

impl PendingEntry {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Why a pending entry was not committed.
///
/// These are guard outcomes, not failures: the caller leaves the entry as it
/// is and nothing is shown to the user.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EntryRejected {
    #[error("no product selected")]
    MissingProduct,
    #[error("no quantity entered")]
    MissingQuantity,
    #[error("quantity must be a number greater than zero")]
    InvalidQuantity,
    #[error("unit price override must be a number")]
    InvalidPrice,
}

/// Display row for one draft line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineView {
    /// Product name, or `"-"` when the product is no longer in the catalog.
    pub product_name: String,
    pub quantity_kg: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Owner of the order draft and the pending entry.
///
/// Every operation is total: invalid input turns into a no-op rather than an
/// error, and the subtotal is always derived from the current items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftModel {
    draft: OrderDraft,
    pending: PendingEntry,
}

impl DraftModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn pending(&self) -> &PendingEntry {
        &self.pending
    }

    pub fn items(&self) -> &[LineItem] {
        &self.draft.items
    }

    pub fn item_count(&self) -> usize {
        self.draft.items.len()
    }

    pub fn customer_id(&self) -> Option<&CustomerId> {
        self.draft.customer_id.as_ref()
    }

    pub fn notes(&self) -> &str {
        &self.draft.notes
    }

    /// Replace the selected customer (`None` clears the selection).
    pub fn set_customer(&mut self, customer_id: Option<CustomerId>) {
        tracing::debug!(customer_id = ?customer_id, "draft customer selected");
        self.draft.customer_id = customer_id;
    }

    /// Replace the notes verbatim.
    pub fn set_notes(&mut self, text: impl Into<String>) {
        self.draft.notes = text.into();
    }

    /// Update one field of the pending entry. No validation happens here.
    pub fn update_pending(&mut self, field: PendingField, value: impl Into<String>) {
        let value = value.into();
        match field {
            PendingField::Product => self.pending.product_id = value,
            PendingField::Quantity => self.pending.quantity_kg = value,
            PendingField::UnitPrice => self.pending.unit_price = value,
        }
    }

    /// Commit the pending entry as a new line item.
    ///
    /// The unit price is the override when one was entered, otherwise the
    /// product's current catalog price, or zero when the product is not in
    /// the catalog. On success the pending entry is cleared; on rejection
    /// neither the items nor the pending entry change.
    pub fn commit_pending(&mut self, catalog: &Catalog) -> Result<LineItem, EntryRejected> {
        let item = match self.resolve_pending(catalog) {
            Ok(item) => item,
            Err(reason) => {
                tracing::debug!(%reason, "pending entry not committed");
                return Err(reason);
            }
        };

        self.draft.items.push(item.clone());
        self.pending = PendingEntry::default();

        tracing::debug!(
            product_id = %item.product_id,
            quantity_kg = item.quantity_kg,
            unit_price = item.unit_price,
            item_count = self.draft.items.len(),
            subtotal = self.subtotal(),
            "line item added to draft"
        );

        Ok(item)
    }

    fn resolve_pending(&self, catalog: &Catalog) -> Result<LineItem, EntryRejected> {
        let product_id: ProductId = self
            .pending
            .product_id
            .parse()
            .map_err(|_| EntryRejected::MissingProduct)?;

        if self.pending.quantity_kg.trim().is_empty() {
            return Err(EntryRejected::MissingQuantity);
        }
        let quantity_kg = parse_number(&self.pending.quantity_kg)
            .filter(|q| *q > 0.0)
            .ok_or(EntryRejected::InvalidQuantity)?;

        let unit_price = if self.pending.unit_price.trim().is_empty() {
            match catalog.price_of(&product_id) {
                Some(price) => price,
                None => {
                    tracing::warn!(
                        product_id = %product_id,
                        "product not in catalog; defaulting unit price to zero"
                    );
                    0.0
                }
            }
        } else {
            parse_number(&self.pending.unit_price).ok_or(EntryRejected::InvalidPrice)?
        };

        Ok(LineItem {
            product_id,
            quantity_kg,
            unit_price,
        })
    }

    /// Remove the line at `index`, returning it.
    ///
    /// Out-of-range indices leave the draft unchanged.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        if index >= self.draft.items.len() {
            tracing::debug!(index, item_count = self.draft.items.len(), "remove index out of range");
            return None;
        }
        let removed = self.draft.items.remove(index);
        tracing::debug!(
            index,
            item_count = self.draft.items.len(),
            subtotal = self.subtotal(),
            "line item removed from draft"
        );
        Some(removed)
    }

    /// Sum of `unit_price * quantity_kg` over the current items.
    ///
    /// Recomputed on every call; never cached.
    pub fn subtotal(&self) -> f64 {
        self.draft.items.iter().map(LineItem::line_total).sum()
    }

    /// True when a customer is selected and at least one item is present.
    pub fn is_complete(&self) -> bool {
        self.draft.customer_id.is_some() && !self.draft.items.is_empty()
    }

    /// Create-order payload for the current draft, if it is complete.
    pub fn to_request(&self) -> Option<CreateOrderRequest> {
        let customer_id = self.draft.customer_id.clone()?;
        if self.draft.items.is_empty() {
            return None;
        }
        Some(CreateOrderRequest {
            customer_id,
            items: self.draft.items.clone(),
            notes: self.draft.notes.clone(),
        })
    }

    /// Restore the empty initial state (draft and pending entry).
    pub fn reset(&mut self) {
        self.draft = OrderDraft::default();
        self.pending = PendingEntry::default();
    }

    /// Display rows for the current items, resolved against `catalog`.
    pub fn lines(&self, catalog: &Catalog) -> Vec<LineView> {
        self.draft
            .items
            .iter()
            .map(|item| LineView {
                product_name: catalog
                    .name_of(&item.product_id)
                    .unwrap_or("-")
                    .to_string(),
                quantity_kg: item.quantity_kg,
                unit_price: item.unit_price,
                line_total: item.line_total(),
            })
            .collect()
    }
}
