//! Business logic services for Shelfie Inventories

pub mod auth;
pub mod documents;
pub mod expenses;
pub mod goods;
pub mod incoming;
pub mod outgoing;
pub mod parties;
pub mod reconciler;
pub mod reporting;
pub mod workbook;

pub use auth::AuthService;
pub use documents::DocumentService;
pub use expenses::ExpenseService;
pub use goods::GoodsService;
pub use incoming::IncomingService;
pub use outgoing::OutgoingService;
pub use parties::PartyService;
pub use reconciler::{DeliveryOutcome, ReceiptOutcome, StockReconciler};
pub use reporting::ReportingService;
