//! Product catalog JSON endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smiley_day_core::catalog::Product;
use smiley_day_core::catalog::filter::{
    ALL_COLLECTIONS, PREFERENCES_KEY, PriceRange, ProductFilters, SortOrder, ViewPreferences,
    filter_products, sort_products,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::SessionStorage;
use crate::state::AppState;

/// Listing query parameters. Every parameter is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub collection: Option<String>,
    pub q: Option<String>,
    pub sort: Option<SortOrder>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Comma-separated hex values.
    pub colors: Option<String>,
}

impl ListQuery {
    fn into_filters(self, default_sort: SortOrder) -> ProductFilters {
        let defaults = PriceRange::default();
        ProductFilters {
            collection: self
                .collection
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| ALL_COLLECTIONS.to_string()),
            search_query: self.q.unwrap_or_default(),
            sort_by: self.sort.unwrap_or(default_sort),
            price_range: PriceRange {
                min: self.min_price.unwrap_or(defaults.min),
                max: self.max_price.unwrap_or(defaults.max),
            },
            selected_colors: self
                .colors
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// `GET /api/products` body.
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

/// `GET /api/products/{handle}` body.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// List products, filtered and sorted. Without a `sort` parameter the
/// session's saved sort order applies.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductsResponse>> {
    let catalog = state.catalog()?;

    let storage = SessionStorage::load(&session, &[PREFERENCES_KEY]).await?;
    let preferences = ViewPreferences::load(&storage);
    let filters = query.into_filters(preferences.sort_by);

    let products = catalog.list_products().await;
    let filtered = filter_products(&products, &filters);
    let sorted = sort_products(&filtered, filters.sort_by);

    tracing::debug!(
        total = products.len(),
        shown = sorted.len(),
        "Listed products"
    );

    Ok(Json(ProductsResponse { products: sorted }))
}

/// One product by handle.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<ProductResponse>> {
    let product = state
        .catalog()?
        .product_by_handle(&handle)
        .await
        .ok_or(AppError::NotFound("Product"))?;

    Ok(Json(ProductResponse {
        product: (*product).clone(),
    }))
}

/// Saved listing preferences.
#[instrument(skip(session))]
pub async fn preferences(session: Session) -> Result<Json<ViewPreferences>> {
    let storage = SessionStorage::load(&session, &[PREFERENCES_KEY]).await?;
    Ok(Json(ViewPreferences::load(&storage)))
}

/// Replace the saved listing preferences.
#[instrument(skip(session))]
pub async fn save_preferences(
    session: Session,
    Json(preferences): Json<ViewPreferences>,
) -> Result<Json<ViewPreferences>> {
    if preferences.items_per_page == 0 {
        return Err(AppError::BadRequest(
            "itemsPerPage must be at least 1".to_string(),
        ));
    }

    let mut storage = SessionStorage::load(&session, &[PREFERENCES_KEY]).await?;
    preferences.save(&mut storage);
    storage.commit(&session).await?;

    Ok(Json(preferences))
}
