//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart lives in the session; see [`crate::services::cart`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use smiley_day_core::cart::{
    CartItemInput, CartLineItem, CartStore, CartTotals, cart_item_display_name, validate_cart_item,
};
use smiley_day_core::catalog::{CartOptions, product_to_cart_item};
use smiley_day_core::notify::ToastKind;
use smiley_day_core::{DEFAULT_CURRENCY, KeyValueStorage, LineItemId, VariantId, format_price};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::CartSession;
use crate::services::notifications::{self, ADDED_TO_CART_DURATION_MS};
use crate::state::AppState;

/// HTMX event fired after every cart mutation.
const CART_UPDATED: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart item display data for templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub display_name: String,
    pub color: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: String,
    pub image_alt: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.to_string(),
            handle: item.handle.clone(),
            title: item.title.clone(),
            display_name: cart_item_display_name(item),
            color: item.selected_color.clone(),
            quantity: item.quantity,
            price: format_price(item.price, &item.currency),
            line_price: format_price(item.line_total(), &item.currency),
            image_url: item.image.url.clone(),
            image_alt: item.image.alt_text.clone(),
        }
    }
}

/// Cart display data for templates and the JSON view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub is_open: bool,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub has_free_shipping: bool,
    pub amount_to_free_shipping: String,
    /// Unformatted totals.
    pub totals: CartTotals,
}

impl CartView {
    /// Build the view of a cart store.
    #[must_use]
    pub fn from_store<S: KeyValueStorage>(cart: &CartStore<S>) -> Self {
        let totals = cart.totals();
        let currency = cart
            .items()
            .first()
            .map_or(DEFAULT_CURRENCY, |item| item.currency.as_str());

        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            item_count: cart.item_count(),
            is_open: cart.is_open(),
            subtotal: format_price(totals.subtotal, currency),
            shipping: format_price(totals.shipping, currency),
            total: format_price(totals.total, currency),
            has_free_shipping: totals.has_free_shipping,
            amount_to_free_shipping: format_price(totals.amount_to_free_shipping, currency),
            totals,
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Add a catalog product by handle.
#[derive(Debug, Deserialize)]
pub struct AddProductForm {
    pub handle: String,
    pub color: Option<String>,
    pub variant_id: Option<String>,
    pub quantity: Option<i64>,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "cart/drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Commit the cart and answer with the refreshed drawer.
async fn drawer_response(cart_session: &CartSession) -> Result<Response> {
    cart_session.commit().await?;
    let cart = CartView::from_store(cart_session.cart());
    Ok((AppendHeaders([CART_UPDATED]), CartDrawerTemplate { cart }).into_response())
}

/// Validate, add and answer with the count badge.
async fn add_candidate(mut cart_session: CartSession, candidate: CartItemInput) -> Result<Response> {
    if let Err(reason) = validate_cart_item(&candidate) {
        tracing::info!(reason = reason.code(), "Rejected cart item");
        notifications::notify(
            cart_session.session(),
            ToastKind::Error,
            reason.to_string(),
            None,
        )
        .await?;
        return Err(AppError::InvalidCartItem(reason));
    }

    let title = candidate.title.clone();
    let product_id = candidate.product_id.to_string();
    let id = cart_session.cart_mut().add_item(candidate);
    cart_session.commit().await?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("product_id", product_id.as_str()), ("line_id", id.as_str())]),
    );
    notifications::notify(
        cart_session.session(),
        ToastKind::Success,
        format!("Added {title} to cart!"),
        Some(ADDED_TO_CART_DURATION_MS),
    )
    .await?;

    let count = cart_session.cart().item_count();
    Ok((AppendHeaders([CART_UPDATED]), CartCountTemplate { count }).into_response())
}

// =============================================================================
// Handlers
// =============================================================================

/// Cart drawer fragment.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<CartDrawerTemplate> {
    let cart_session = CartSession::load(session).await?;
    Ok(CartDrawerTemplate {
        cart: CartView::from_store(cart_session.cart()),
    })
}

/// Cart as JSON.
#[instrument(skip(session))]
pub async fn view(session: Session) -> Result<Json<CartView>> {
    let cart_session = CartSession::load(session).await?;
    Ok(Json(CartView::from_store(cart_session.cart())))
}

/// Cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<CartCountTemplate> {
    let cart_session = CartSession::load(session).await?;
    Ok(CartCountTemplate {
        count: cart_session.cart().item_count(),
    })
}

/// Add a line item snapshot to the cart.
///
/// The candidate is validated first; a rejected candidate answers 400 with
/// the reason and queues an error toast.
#[instrument(skip_all, fields(product_id = %candidate.product_id))]
pub async fn add(session: Session, Json(candidate): Json<CartItemInput>) -> Result<Response> {
    let cart_session = CartSession::load(session).await?;
    add_candidate(cart_session, candidate).await
}

/// Add a catalog product by handle with the chosen options.
#[instrument(skip(state, session))]
pub async fn add_product(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddProductForm>,
) -> Result<Response> {
    let product = state
        .catalog()?
        .product_by_handle(&form.handle)
        .await
        .ok_or(AppError::NotFound("Product"))?;

    let selected_color = form
        .color
        .filter(|c| !c.is_empty())
        .or_else(|| product.initial_color.clone());
    let selected_color_name = selected_color
        .as_deref()
        .and_then(|hex| product.color_name_for(hex))
        .map(String::from);

    let candidate = product_to_cart_item(
        &product,
        CartOptions {
            selected_color,
            selected_color_name,
            variant_id: form.variant_id.filter(|v| !v.is_empty()).map(VariantId::new),
            quantity: form.quantity,
        },
    );

    let cart_session = CartSession::load(session).await?;
    add_candidate(cart_session, candidate).await
}

/// Update cart item quantity (HTMX). Quantities below 1 remove the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let mut cart_session = CartSession::load(session).await?;
    cart_session
        .cart_mut()
        .update_quantity(&LineItemId::new(form.id), form.quantity);
    drawer_response(&cart_session).await
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let mut cart_session = CartSession::load(session).await?;
    cart_session.cart_mut().remove_item(&LineItemId::new(form.id));
    drawer_response(&cart_session).await
}

/// Empty the cart (HTMX).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Response> {
    let mut cart_session = CartSession::load(session).await?;
    cart_session.cart_mut().clear_cart();
    drawer_response(&cart_session).await
}

/// Open the cart drawer.
#[instrument(skip(session))]
pub async fn open(session: Session) -> Result<Response> {
    let mut cart_session = CartSession::load(session).await?;
    cart_session.cart_mut().open_cart();
    drawer_response(&cart_session).await
}

/// Close the cart drawer.
#[instrument(skip(session))]
pub async fn close(session: Session) -> Result<Response> {
    let mut cart_session = CartSession::load(session).await?;
    cart_session.cart_mut().close_cart();
    drawer_response(&cart_session).await
}

/// Toggle the cart drawer.
#[instrument(skip(session))]
pub async fn toggle(session: Session) -> Result<Response> {
    let mut cart_session = CartSession::load(session).await?;
    cart_session.cart_mut().toggle_cart();
    drawer_response(&cart_session).await
}
