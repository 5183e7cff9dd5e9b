//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Products (JSON)
//! GET  /api/products                    - Product listing (filter/sort query)
//! GET  /api/products/{handle}           - Product detail
//! GET  /api/preferences                 - Saved listing preferences
//! POST /api/preferences                 - Save listing preferences
//!
//! # Cart (HTMX fragments)
//! GET  /cart                            - Cart drawer fragment
//! GET  /cart/count                      - Cart count badge (fragment)
//! POST /cart/add                        - Add line item (JSON body, validated)
//! POST /cart/add-product                - Add catalog product by handle (form)
//! POST /cart/update                     - Update quantity (returns drawer)
//! POST /cart/remove                     - Remove item (returns drawer)
//! POST /cart/clear                      - Empty the cart (returns drawer)
//! POST /cart/open | /cart/close | /cart/toggle - Drawer visibility
//! GET  /api/cart                        - Cart as JSON
//!
//! # Notifications (JSON)
//! GET  /api/notifications               - Live toasts
//! POST /api/notifications/{id}/dismiss  - Dismiss a toast
//! ```

pub mod cart;
pub mod notifications;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/add-product", post(cart::add_product))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/toggle", post(cart::toggle))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{handle}", get(products::show))
        .route(
            "/preferences",
            get(products::preferences).post(products::save_preferences),
        )
        .route("/cart", get(cart::view))
        .route("/notifications", get(notifications::index))
        .route("/notifications/{id}/dismiss", post(notifications::dismiss))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/cart", cart_routes())
        .nest("/api", api_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Shopify.
async fn health() -> &'static str {
    "ok"
}
