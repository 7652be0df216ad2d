//! Customers, the new-customer form and the customer API port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use curdworks_core::{CustomerId, DomainError, DomainResult, Entity, GatewayResult};

/// Customer as returned by the directory (read-only to the client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Editable fields of the customer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Name,
    Email,
    Phone,
    Address,
}

/// In-progress "new customer" form. Fields hold raw text until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Body of `POST /api/customers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NewCustomer {
    pub fn set(&mut self, field: CustomerField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CustomerField::Name => self.name = value,
            CustomerField::Email => self.email = value,
            CustomerField::Phone => self.phone = value,
            CustomerField::Address => self.address = value,
        }
    }

    /// Build the create payload. Only the name is required.
    pub fn to_request(&self) -> DomainResult<CreateCustomerRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("customer name is required"));
        }

        Ok(CreateCustomerRequest {
            name: name.to_string(),
            email: non_empty(&self.email),
            phone: non_empty(&self.phone),
            address: non_empty(&self.address),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Port to the remote customer directory.
#[async_trait]
pub trait CustomerGateway: Send + Sync {
    async fn list_customers(&self) -> GatewayResult<Vec<Customer>>;

    async fn create_customer(&self, request: &CreateCustomerRequest) -> GatewayResult<()>;
}
