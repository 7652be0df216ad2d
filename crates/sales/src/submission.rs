//! Submission flow: draft completeness gate + create-order call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use curdworks_core::GatewayError;

use crate::draft::DraftModel;
use crate::notice::Notice;
use crate::order::{OrderGateway, OrderRecord};

/// Why a submit call did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No customer selected or no items in the draft.
    Incomplete,
    /// A previous submission is still in flight.
    Busy,
}

/// Result of [`OrderSubmission::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Skipped(SkipReason),
    /// The order was created and the draft was reset.
    Created {
        order: Option<OrderRecord>,
        /// Refreshed order list (fetched after the create succeeded).
        orders: Result<Vec<OrderRecord>, GatewayError>,
    },
    /// The create call failed; the draft is unchanged.
    Failed(GatewayError),
}

impl SubmitOutcome {
    /// Message to show the user, if any.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            SubmitOutcome::Skipped(_) => None,
            SubmitOutcome::Created { .. } => Some(Notice::success("Order created")),
            SubmitOutcome::Failed(e) => Some(Notice::failure(format!("Failed to create order: {e}"))),
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created { .. })
    }
}

/// Submits drafts to the order API, one at a time.
///
/// The draft lock is never held across the network call; the outcome is
/// applied to the draft in a single locked step once the call returns.
#[derive(Debug, Default)]
pub struct OrderSubmission {
    busy: AtomicBool,
}

impl OrderSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a create call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// True iff a customer is selected and the draft has at least one item.
    pub fn can_submit(&self, draft: &DraftModel) -> bool {
        draft.is_complete()
    }

    /// Whether the submit affordance should be enabled right now.
    pub fn submit_enabled(&self, draft: &DraftModel) -> bool {
        self.can_submit(draft) && !self.is_busy()
    }

    /// Send the draft to the order API.
    ///
    /// No-op when the draft is incomplete or another submission is in flight.
    /// On success the draft is reset and the order list is re-fetched; on
    /// failure the draft is left exactly as it was. Failures are never
    /// retried here.
    pub async fn submit<G>(&self, draft: &Mutex<DraftModel>, gateway: &G) -> SubmitOutcome
    where
        G: OrderGateway + ?Sized,
    {
        let request = {
            let model = lock(draft);
            let Some(request) = model.to_request() else {
                tracing::debug!("submit ignored: draft incomplete");
                return SubmitOutcome::Skipped(SkipReason::Incomplete);
            };
            if self
                .busy
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                tracing::debug!("submit ignored: submission already in flight");
                return SubmitOutcome::Skipped(SkipReason::Busy);
            }
            tracing::info!(
                customer_id = %request.customer_id,
                item_count = request.items.len(),
                subtotal = model.subtotal(),
                "submitting order"
            );
            request
        };

        let _busy = BusyGuard(&self.busy);

        match gateway.create_order(&request).await {
            Ok(order) => {
                lock(draft).reset();
                tracing::info!(
                    order_id = ?order.as_ref().map(|o| &o.id),
                    "order created; draft reset"
                );

                let orders = gateway.list_orders().await;
                if let Err(e) = &orders {
                    tracing::warn!(error = %e, "failed to refresh orders after create");
                }

                SubmitOutcome::Created { order, orders }
            }
            Err(e) => {
                tracing::warn!(error = %e, "order submission failed; draft kept");
                SubmitOutcome::Failed(e)
            }
        }
    }
}

/// Clears the busy flag when the submission finishes, however it finishes.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock(draft: &Mutex<DraftModel>) -> MutexGuard<'_, DraftModel> {
    draft.lock().unwrap_or_else(PoisonError::into_inner)
}
