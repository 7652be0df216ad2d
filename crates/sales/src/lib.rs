//! Sales module: order composition and submission.
//!
//! This crate contains the client-side order workflow:
//! - [`DraftModel`]: the in-progress order (customer, weighted line items,
//!   notes) plus the pending line entry, with the derived subtotal.
//! - [`OrderSubmission`]: gates and performs the create-order call, resetting
//!   the draft on success and leaving it untouched on failure.
//!
//! Everything except [`OrderSubmission::submit`] is synchronous and IO-free.

pub mod draft;
pub mod notice;
pub mod order;
pub mod submission;

pub use draft::{
    DraftModel, EntryRejected, LineItem, LineView, OrderDraft, PendingEntry, PendingField,
};
pub use notice::{Notice, NoticeKind};
pub use order::{CreateOrderRequest, OrderGateway, OrderRecord, RecentOrderRow, recent_orders};
pub use submission::{OrderSubmission, SkipReason, SubmitOutcome};
