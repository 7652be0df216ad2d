//! View state of the back office and the actions a user can take on it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use curdworks_core::{CustomerId, GatewayResult};
use curdworks_parties::{Customer, CustomerField, CustomerGateway, NewCustomer};
use curdworks_products::{Catalog, NewProduct, ProductField, ProductGateway};
use curdworks_sales::{
    DraftModel, EntryRejected, LineItem, LineView, Notice, OrderGateway, OrderRecord,
    OrderSubmission, PendingField, RecentOrderRow, SubmitOutcome, recent_orders,
};

/// Everything the workbench needs from the remote API.
pub trait BackOffice: CustomerGateway + ProductGateway + OrderGateway {}

impl<T> BackOffice for T where T: CustomerGateway + ProductGateway + OrderGateway {}

/// The single active view: collaborator lists, order draft, creation forms
/// and the latest notice.
pub struct Workbench<A> {
    api: A,
    customers: Vec<Customer>,
    catalog: Catalog,
    orders: Vec<OrderRecord>,
    draft: Mutex<DraftModel>,
    submission: OrderSubmission,
    new_customer: NewCustomer,
    new_product: NewProduct,
    notice: Option<Notice>,
}

impl<A: BackOffice> Workbench<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            customers: Vec::new(),
            catalog: Catalog::default(),
            orders: Vec::new(),
            draft: Mutex::new(DraftModel::new()),
            submission: OrderSubmission::new(),
            new_customer: NewCustomer::default(),
            new_product: NewProduct::default(),
            notice: None,
        }
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    pub fn recent_orders(&self) -> Vec<RecentOrderRow> {
        recent_orders(&self.orders)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn draft(&self) -> MutexGuard<'_, DraftModel> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- collaborator lists ---

    /// Initial load of all three lists. Individual failures are logged and
    /// leave that list as it was.
    pub async fn refresh_all(&mut self) {
        let _ = self.refresh_customers().await;
        let _ = self.refresh_products().await;
        let _ = self.refresh_orders().await;
    }

    pub async fn refresh_customers(&mut self) -> GatewayResult<usize> {
        let customers = log_refresh("customers", self.api.list_customers().await)?;
        self.customers = customers;
        Ok(self.customers.len())
    }

    pub async fn refresh_products(&mut self) -> GatewayResult<usize> {
        let products = log_refresh("products", self.api.list_products().await)?;
        self.catalog.replace(products);
        Ok(self.catalog.products().len())
    }

    pub async fn refresh_orders(&mut self) -> GatewayResult<usize> {
        let orders = log_refresh("orders", self.api.list_orders().await)?;
        self.orders = orders;
        Ok(self.orders.len())
    }

    // --- order draft ---

    pub fn select_customer(&mut self, customer_id: Option<CustomerId>) {
        self.draft().set_customer(customer_id);
    }

    pub fn set_notes(&mut self, text: impl Into<String>) {
        self.draft().set_notes(text);
    }

    pub fn set_pending(&mut self, field: PendingField, value: impl Into<String>) {
        self.draft().update_pending(field, value);
    }

    /// Commit the pending entry; rejections are silent no-ops.
    pub fn add_item(&mut self) -> Result<LineItem, EntryRejected> {
        let catalog = &self.catalog;
        self.draft
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .commit_pending(catalog)
    }

    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        self.draft().remove_item(index)
    }

    pub fn subtotal(&self) -> f64 {
        self.draft().subtotal()
    }

    pub fn draft_lines(&self) -> Vec<LineView> {
        self.draft().lines(&self.catalog)
    }

    /// Whether the "create order" affordance is enabled.
    pub fn can_submit(&self) -> bool {
        self.submission.submit_enabled(&self.draft())
    }

    /// Submit the draft and apply the outcome to the view.
    pub async fn submit_order(&mut self) -> SubmitOutcome {
        self.notice = None;
        let outcome = self.submission.submit(&self.draft, &self.api).await;

        if let SubmitOutcome::Created { orders: Ok(orders), .. } = &outcome {
            self.orders = orders.clone();
        }
        if let Some(notice) = outcome.notice() {
            self.notice = Some(notice);
        }
        outcome
    }

    // --- customer form ---

    pub fn new_customer(&self) -> &NewCustomer {
        &self.new_customer
    }

    pub fn set_customer_field(&mut self, field: CustomerField, value: impl Into<String>) {
        self.new_customer.set(field, value);
    }

    /// Create a customer from the form. Returns true on success.
    pub async fn save_customer(&mut self) -> bool {
        self.notice = None;

        let request = match self.new_customer.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.notice = Some(Notice::failure(e.to_string()));
                return false;
            }
        };

        match self.api.create_customer(&request).await {
            Ok(()) => {
                tracing::info!(name = %request.name, "customer created");
                self.new_customer.clear();
                let _ = self.refresh_customers().await;
                self.notice = Some(Notice::success("Customer added"));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "customer creation failed");
                self.notice = Some(Notice::failure("Failed to create customer"));
                false
            }
        }
    }

    // --- product form ---

    pub fn new_product(&self) -> &NewProduct {
        &self.new_product
    }

    pub fn set_product_field(&mut self, field: ProductField, value: impl Into<String>) {
        self.new_product.set(field, value);
    }

    /// Create a product from the form. Returns true on success.
    pub async fn save_product(&mut self) -> bool {
        self.notice = None;

        let request = match self.new_product.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.notice = Some(Notice::failure(e.to_string()));
                return false;
            }
        };

        match self.api.create_product(&request).await {
            Ok(()) => {
                tracing::info!(name = %request.name, "product created");
                self.new_product.clear();
                let _ = self.refresh_products().await;
                self.notice = Some(Notice::success("Product added"));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "product creation failed");
                self.notice = Some(Notice::failure("Failed to create product"));
                false
            }
        }
    }
}

fn log_refresh<T>(what: &str, result: GatewayResult<Vec<T>>) -> GatewayResult<Vec<T>> {
    match &result {
        Ok(items) => tracing::debug!(list = what, count = items.len(), "list refreshed"),
        Err(e) => tracing::warn!(list = what, error = %e, "list refresh failed; keeping previous"),
    }
    result
}
