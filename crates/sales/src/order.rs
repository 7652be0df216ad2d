//! Persisted orders, the create payload and the order API port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use curdworks_core::{CustomerId, GatewayResult, OrderId, finite_or_zero};

use crate::draft::LineItem;

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub items: Vec<LineItem>,
    pub notes: String,
}

/// Order as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub order_date: Option<String>,
}

/// Port to the remote order API.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn list_orders(&self) -> GatewayResult<Vec<OrderRecord>>;

    /// Create an order.
    ///
    /// `Ok(None)` means the API accepted the order but did not echo it back.
    async fn create_order(&self, request: &CreateOrderRequest) -> GatewayResult<Option<OrderRecord>>;
}

/// Display row of the recent-orders table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentOrderRow {
    pub date: String,
    /// First six characters of the customer identity.
    pub customer: String,
    pub status: String,
    /// Total formatted to two decimals.
    pub total: String,
}

/// Recent-orders rows, newest first (the API lists oldest first).
pub fn recent_orders(orders: &[OrderRecord]) -> Vec<RecentOrderRow> {
    orders
        .iter()
        .rev()
        .map(|o| RecentOrderRow {
            date: o.order_date.clone().unwrap_or_else(|| "-".to_string()),
            customer: o
                .customer_id
                .as_ref()
                .map(|c| c.short(6).to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "-".to_string()),
            status: o.status.clone(),
            total: format!("{:.2}", finite_or_zero(o.total.unwrap_or(0.0))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use curdworks_core::ProductId;

    #[test]
    fn create_request_uses_wire_field_names() {
        let request = CreateOrderRequest {
            customer_id: CustomerId::new("C1"),
            items: vec![LineItem {
                product_id: ProductId::new("A"),
                quantity_kg: 2.0,
                unit_price: 4.5,
            }],
            notes: String::new(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "customer_id": "C1",
                "items": [{ "product_id": "A", "quantity_kg": 2.0, "unit_price": 4.5 }],
                "notes": ""
            })
        );
    }

    #[test]
    fn order_record_tolerates_sparse_documents() {
        let order: OrderRecord = serde_json::from_value(serde_json::json!({
            "_id": "o1",
            "status": "pending"
        }))
        .unwrap();
        assert_eq!(order.id, OrderId::new("o1"));
        assert!(order.items.is_empty());
        assert_eq!(order.total, None);
    }

    #[test]
    fn recent_orders_are_newest_first_and_compact() {
        let orders: Vec<OrderRecord> = serde_json::from_value(serde_json::json!([
            { "_id": "o1", "customer_id": "65f0c2aa9d1e", "status": "pending", "total": 16.0, "order_date": "2026-10-01" },
            { "_id": "o2", "status": "delivered" }
        ]))
        .unwrap();

        let rows = recent_orders(&orders);
        assert_eq!(
            rows,
            vec![
                RecentOrderRow {
                    date: "-".to_string(),
                    customer: "-".to_string(),
                    status: "delivered".to_string(),
                    total: "0.00".to_string(),
                },
                RecentOrderRow {
                    date: "2026-10-01".to_string(),
                    customer: "65f0c2".to_string(),
                    status: "pending".to_string(),
                    total: "16.00".to_string(),
                },
            ]
        );
    }
}
