//! Product listing filters, sort orders and persisted view preferences.

use std::cmp::Reverse;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;
use crate::storage::KeyValueStorage;

/// Collection value that disables collection filtering.
pub const ALL_COLLECTIONS: &str = "all";

/// Storage key for [`ViewPreferences`].
pub const PREFERENCES_KEY: &str = "product-filters";

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    NameAsc,
    NameDesc,
}

/// Grid or list presentation of the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Decimal::ZERO,
            max: Decimal::ONE_THOUSAND,
        }
    }
}

impl PriceRange {
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Active listing filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFilters {
    pub collection: String,
    pub search_query: String,
    pub sort_by: SortOrder,
    pub price_range: PriceRange,
    pub selected_colors: Vec<String>,
}

impl Default for ProductFilters {
    fn default() -> Self {
        Self {
            collection: ALL_COLLECTIONS.to_owned(),
            search_query: String::new(),
            sort_by: SortOrder::default(),
            price_range: PriceRange::default(),
            selected_colors: Vec::new(),
        }
    }
}

impl ProductFilters {
    /// Add `color` to the selection, or remove it if already selected.
    pub fn toggle_color(&mut self, color: &str) {
        if let Some(pos) = self.selected_colors.iter().position(|c| c == color) {
            self.selected_colors.remove(pos);
        } else {
            self.selected_colors.push(color.to_owned());
        }
    }

    /// Reset every filter to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Keep the products matching every active filter, in their original order.
#[must_use]
pub fn filter_products(products: &[Product], filters: &ProductFilters) -> Vec<Product> {
    let query = filters.search_query.trim().to_lowercase();

    products
        .iter()
        .filter(|p| filters.collection == ALL_COLLECTIONS || p.collection == filters.collection)
        .filter(|p| query.is_empty() || p.title.to_lowercase().contains(&query))
        .filter(|p| filters.price_range.contains(p.price))
        .filter(|p| {
            filters.selected_colors.is_empty()
                || p.colors.iter().any(|c| filters.selected_colors.contains(c))
        })
        .cloned()
        .collect()
}

/// Sort products. The sort is stable; for [`SortOrder::Newest`] undated
/// products come after dated ones.
#[must_use]
pub fn sort_products(products: &[Product], sort_by: SortOrder) -> Vec<Product> {
    let mut sorted = products.to_vec();

    match sort_by {
        SortOrder::Newest => sorted.sort_by_key(|p| Reverse(p.created_at)),
        SortOrder::PriceLow => sorted.sort_by_key(|p| p.price),
        SortOrder::PriceHigh => sorted.sort_by_key(|p| Reverse(p.price)),
        SortOrder::NameAsc => sorted.sort_by_cached_key(|p| p.title.to_lowercase()),
        SortOrder::NameDesc => sorted.sort_by_cached_key(|p| Reverse(p.title.to_lowercase())),
    }

    sorted
}

/// The listing settings that survive reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewPreferences {
    pub sort_by: SortOrder,
    pub view_mode: ViewMode,
    pub items_per_page: u32,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            sort_by: SortOrder::default(),
            view_mode: ViewMode::default(),
            items_per_page: 12,
        }
    }
}

impl ViewPreferences {
    /// Read preferences from storage; missing or malformed data gives defaults.
    pub fn load(storage: &impl KeyValueStorage) -> Self {
        match storage.get(PREFERENCES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Malformed view preferences, using defaults");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read view preferences");
                Self::default()
            }
        }
    }

    /// Write preferences to storage. Failures are logged and ignored.
    pub fn save(&self, storage: &mut impl KeyValueStorage) {
        let result = serde_json::to_string(self)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                storage
                    .set(PREFERENCES_KEY, raw)
                    .map_err(|e| e.to_string())
            });

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist view preferences");
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::super::fixtures::product;
    use super::*;
    use crate::storage::MemoryStorage;

    fn catalog() -> Vec<Product> {
        let mut buddy = product("p1", "Sunflower Buddy", Decimal::new(25, 0));
        buddy.colors = vec!["#FFB300".to_owned()];
        buddy.collection = "Plushies".to_owned();
        buddy.created_at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).single();

        let mut mini = product("p2", "mini bee", Decimal::new(10, 0));
        mini.colors = vec!["#FFF3E0".to_owned(), "#000000".to_owned()];
        mini.collection = "Keychains".to_owned();
        mini.created_at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single();

        let mut blanket = product("p3", "Honey Blanket", Decimal::new(1200, 0));
        blanket.collection = "Plushies".to_owned();

        vec![buddy, mini, blanket]
    }

    fn titles(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_default_filters_apply_price_range_only() {
        let filtered = filter_products(&catalog(), &ProductFilters::default());
        assert_eq!(titles(&filtered), ["Sunflower Buddy", "mini bee"]);
    }

    #[test]
    fn test_collection_and_search() {
        let filters = ProductFilters {
            collection: "Plushies".to_owned(),
            search_query: "  SUNFLOWER ".to_owned(),
            ..ProductFilters::default()
        };
        assert_eq!(
            titles(&filter_products(&catalog(), &filters)),
            ["Sunflower Buddy"]
        );
    }

    #[test]
    fn test_color_filter_and_toggle() {
        let mut filters = ProductFilters::default();
        filters.toggle_color("#000000");
        assert_eq!(titles(&filter_products(&catalog(), &filters)), ["mini bee"]);

        filters.toggle_color("#000000");
        assert!(filters.selected_colors.is_empty());

        filters.search_query = "x".to_owned();
        filters.reset();
        assert_eq!(filters, ProductFilters::default());
    }

    #[test]
    fn test_sorting() {
        let products = catalog();
        assert_eq!(
            titles(&sort_products(&products, SortOrder::PriceLow)),
            ["mini bee", "Sunflower Buddy", "Honey Blanket"]
        );
        assert_eq!(
            titles(&sort_products(&products, SortOrder::PriceHigh)),
            ["Honey Blanket", "Sunflower Buddy", "mini bee"]
        );
        assert_eq!(
            titles(&sort_products(&products, SortOrder::NameAsc)),
            ["Honey Blanket", "mini bee", "Sunflower Buddy"]
        );
        assert_eq!(
            titles(&sort_products(&products, SortOrder::NameDesc)),
            ["Sunflower Buddy", "mini bee", "Honey Blanket"]
        );
        assert_eq!(
            titles(&sort_products(&products, SortOrder::Newest)),
            ["mini bee", "Sunflower Buddy", "Honey Blanket"]
        );
    }

    #[test]
    fn test_sort_order_wire_names() {
        let json = serde_json::to_string(&SortOrder::PriceLow).unwrap_or_default();
        assert_eq!(json, "\"price-low\"");
    }

    #[test]
    fn test_view_preferences_persist() {
        let mut storage = MemoryStorage::new();
        assert_eq!(ViewPreferences::load(&storage), ViewPreferences::default());

        let prefs = ViewPreferences {
            sort_by: SortOrder::NameDesc,
            view_mode: ViewMode::List,
            items_per_page: 24,
        };
        prefs.save(&mut storage);
        assert_eq!(ViewPreferences::load(&storage), prefs);
    }

    #[test]
    fn test_view_preferences_malformed() {
        let storage = MemoryStorage::with_entry(PREFERENCES_KEY, "{\"viewMode\": 3}");
        assert_eq!(ViewPreferences::load(&storage), ViewPreferences::default());

        let partial = MemoryStorage::with_entry(PREFERENCES_KEY, "{\"viewMode\": \"list\"}");
        assert_eq!(ViewPreferences::load(&partial).view_mode, ViewMode::List);
        assert_eq!(ViewPreferences::load(&partial).items_per_page, 12);
    }
}
