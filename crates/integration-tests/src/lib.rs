//! Integration tests for the Smiley Day storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p smiley-day-integration-tests
//! ```
//!
//! Every test drives the real router in-process with
//! `tower::ServiceExt::oneshot`. The Shopify Storefront API is replaced by a
//! `wiremock` server, so no network access or credentials are needed.
//!
//! # Test Categories
//!
//! - `shopify_client` - GraphQL client against a mocked endpoint
//! - `catalog_routes` - Product listing, detail and preferences
//! - `cart_routes` - Cart mutations, drawer state and toasts

#![allow(clippy::missing_panics_doc, clippy::must_use_candidate)]

use std::net::Ipv4Addr;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use smiley_day_storefront::catalog::CatalogCache;
use smiley_day_storefront::config::{
    CatalogConfig, MissingShopifyConfig, ShopifyStorefrontConfig, StorefrontConfig,
};
use smiley_day_storefront::shopify::StorefrontClient;
use smiley_day_storefront::state::AppState;
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{body_partial_json, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Access token the mock Shopify server expects.
pub const TEST_TOKEN: &str = "test-storefront-token";

/// Path of the mocked GraphQL endpoint.
pub const GRAPHQL_PATH: &str = "/api/2025-10/graphql.json";

/// Storefront configuration for tests.
pub fn test_config(
    shopify: Result<ShopifyStorefrontConfig, MissingShopifyConfig>,
) -> StorefrontConfig {
    StorefrontConfig {
        host: Ipv4Addr::LOCALHOST.into(),
        port: 3000,
        base_url: Url::parse("http://localhost:3000").expect("valid base url"),
        shopify,
        catalog: CatalogConfig {
            page_size: 10,
            cache_ttl: Duration::from_secs(60),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A Storefront API client for the given mock server.
pub fn client_for(server: &MockServer) -> StorefrontClient {
    StorefrontClient::with_endpoint(
        format!("{}{GRAPHQL_PATH}", server.uri()),
        SecretString::from(TEST_TOKEN),
        10,
    )
}

// =============================================================================
// Shopify fixtures
// =============================================================================

/// A Storefront API product node.
pub fn product_node(handle: &str, title: &str, amount: &str, colors: &[&str]) -> Value {
    json!({
        "id": format!("gid://shopify/Product/{handle}"),
        "title": title,
        "handle": handle,
        "descriptionHtml": format!("<p>A handmade <strong>{title}</strong>.</p>"),
        "createdAt": "2024-05-01T12:00:00Z",
        "priceRange": {
            "minVariantPrice": { "amount": amount, "currencyCode": "USD" }
        },
        "images": {
            "edges": [
                { "node": { "url": format!("https://cdn.shopify.com/{handle}.png"), "altText": null } }
            ]
        },
        "options": [
            { "name": "Color", "values": colors }
        ],
        "collections": {
            "edges": [ { "node": { "title": "Plushies" } } ]
        }
    })
}

/// Answer `AllProducts` with the given nodes.
pub async fn mount_all_products(server: &MockServer, nodes: Vec<Value>) {
    let edges: Vec<Value> = nodes.into_iter().map(|node| json!({ "node": node })).collect();
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header_eq("X-Shopify-Storefront-Access-Token", TEST_TOKEN))
        .and(body_partial_json(json!({ "operationName": "AllProducts" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "products": { "edges": edges } } })),
        )
        .mount(server)
        .await;
}

/// Answer `ProductByHandle` for one handle.
pub async fn mount_product_by_handle(server: &MockServer, handle: &str, node: Option<Value>) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({
            "operationName": "ProductByHandle",
            "variables": { "handle": handle }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "product": node } })),
        )
        .mount(server)
        .await;
}

// =============================================================================
// In-process app
// =============================================================================

/// Buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Body parsed as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("response body is UTF-8")
    }

    /// A header value as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The storefront router plus a cookie jar holding the session cookie.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    /// Mock Shopify server, absent when credentials are "missing".
    shopify: Option<MockServer>,
}

impl TestApp {
    /// App backed by a fresh mock Shopify server.
    pub async fn with_shopify() -> Self {
        let server = MockServer::start().await;
        let config = test_config(Ok(ShopifyStorefrontConfig {
            store_domain: server.address().to_string(),
            api_version: "2025-10".to_string(),
            access_token: SecretString::from(TEST_TOKEN),
        }));
        let catalog = CatalogCache::new(client_for(&server), config.catalog.cache_ttl);
        let state = AppState::with_catalog(config, Ok(catalog));

        Self {
            router: smiley_day_storefront::app(state),
            cookie: None,
            shopify: Some(server),
        }
    }

    /// App started without Shopify credentials.
    pub fn without_shopify(missing: MissingShopifyConfig) -> Self {
        let state = AppState::new(test_config(Err(missing)));
        Self {
            router: smiley_day_storefront::app(state),
            cookie: None,
            shopify: None,
        }
    }

    /// The mock Shopify server.
    pub fn shopify(&self) -> &MockServer {
        self.shopify.as_ref().expect("app has a mock Shopify server")
    }

    /// Forget the session cookie, as a new visitor would.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    /// Send a request, carrying and updating the session cookie.
    pub async fn send(
        &mut self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: Body,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(body).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.trim().to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Body::empty()).await
    }

    pub async fn post(&mut self, uri: &str) -> TestResponse {
        self.send(Method::POST, uri, None, Body::empty()).await
    }

    pub async fn post_json(&mut self, uri: &str, body: &Value) -> TestResponse {
        self.send(
            Method::POST,
            uri,
            Some("application/json"),
            Body::from(body.to_string()),
        )
        .await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            Method::POST,
            uri,
            Some("application/x-www-form-urlencoded"),
            Body::from(encoded),
        )
        .await
    }
}

/// A cart candidate as the product page would post it.
pub fn cart_candidate(product_id: &str, title: &str, price: &str, color: Option<&str>) -> Value {
    let mut candidate = json!({
        "productId": product_id,
        "title": title,
        "handle": title.to_lowercase().replace(' ', "-"),
        "price": price,
        "currency": "USD",
        "image": { "url": "https://cdn.shopify.com/item.png", "altText": title }
    });
    if let Some(color) = color {
        candidate["selectedColor"] = json!(color);
    }
    candidate
}
