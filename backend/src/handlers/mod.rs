//! HTTP request handlers

pub mod auth;
pub mod documents;
pub mod expenses;
pub mod goods;
pub mod health;
pub mod incoming;
pub mod outgoing;
pub mod parties;
pub mod reports;

pub use auth::{get_session, login, logout, refresh, register};
pub use documents::{export_document, import_document};
pub use expenses::{create_expense, get_expense_summary, list_expenses};
pub use goods::{create_good, delete_good, get_good, list_goods};
pub use health::{health_check, root};
pub use incoming::{create_incoming, list_incoming, update_incoming_status};
pub use outgoing::{create_outgoing, list_outgoing, quote_outgoing, update_outgoing_status};
pub use parties::{
    create_customer, create_supplier, delete_customer, delete_supplier, list_customers,
    list_suppliers,
};
pub use reports::{export_stock_sheet, get_inventory_report};
