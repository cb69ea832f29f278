//! Route definitions for Shelfie Inventories

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public, except the session lookup)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes
        .nest("/goods", goods_routes(state.clone()))
        .nest("/suppliers", supplier_routes(state.clone()))
        .nest("/customers", customer_routes(state.clone()))
        .nest("/expenses", expense_routes(state.clone()))
        .nest("/incoming", incoming_routes(state.clone()))
        .nest("/outgoing", outgoing_routes(state.clone()))
        .nest("/reports", report_routes(state.clone()))
        .nest("/documents", document_routes(state))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/logout", post(handlers::logout))
        .merge(
            Router::new()
                .route("/session", get(handlers::get_session))
                .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

/// Goods routes (protected)
fn goods_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_goods).post(handlers::create_good))
        .route(
            "/:good_id",
            get(handlers::get_good).delete(handlers::delete_good),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Supplier routes (protected)
fn supplier_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            delete(handlers::delete_supplier),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Customer routes (protected)
fn customer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            delete(handlers::delete_customer),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Expense routes (protected)
fn expense_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/summary", get(handlers::get_expense_summary))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Incoming shipment routes (protected)
fn incoming_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_incoming).post(handlers::create_incoming),
        )
        .route(
            "/:incoming_id/status",
            put(handlers::update_incoming_status),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Outgoing order routes (protected)
fn outgoing_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_outgoing).post(handlers::create_outgoing),
        )
        .route("/quote", get(handlers::quote_outgoing))
        .route(
            "/:outgoing_id/status",
            put(handlers::update_outgoing_status),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Report routes (protected)
fn report_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/inventory", get(handlers::get_inventory_report))
        .route("/inventory/export", get(handlers::export_stock_sheet))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Spreadsheet import/export routes (protected)
fn document_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/import", post(handlers::import_document))
        .route("/export/:table", get(handlers::export_document))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
