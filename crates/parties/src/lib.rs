//! Parties module (customer directory).
//!
//! Customers are owned by the remote API. This crate holds their read shape,
//! the "new customer" form and the port used to list and create them.

pub mod customer;

pub use customer::{
    CreateCustomerRequest, Customer, CustomerField, CustomerGateway, NewCustomer,
};
