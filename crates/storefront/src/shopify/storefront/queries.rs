//! GraphQL query definitions for the Storefront API.
//!
//! Each query is a unit struct implementing [`GraphQLQuery`] by hand, so the
//! client can run them through the same generic `execute::<Q>()` path.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::Serialize;

use crate::shopify::types::{AllProductsData, ProductByHandleData};

/// Selection set shared by both product queries.
macro_rules! product_fields {
    () => {
        r"
fragment ProductFields on Product {
  id
  title
  handle
  descriptionHtml
  createdAt
  priceRange {
    minVariantPrice {
      amount
      currencyCode
    }
  }
  images(first: 5) {
    edges {
      node {
        url
        altText
      }
    }
  }
  options {
    name
    values
  }
  collections(first: 1) {
    edges {
      node {
        title
      }
    }
  }
}
"
    };
}

const ALL_PRODUCTS_QUERY: &str = concat!(
    r"
query AllProducts($first: Int!) {
  products(first: $first) {
    edges {
      node {
        ...ProductFields
      }
    }
  }
}
",
    product_fields!()
);

const PRODUCT_BY_HANDLE_QUERY: &str = concat!(
    r"
query ProductByHandle($handle: String!) {
  product(handle: $handle) {
    ...ProductFields
  }
}
",
    product_fields!()
);

/// First page of products.
pub struct AllProducts;

pub mod all_products {
    use super::Serialize;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
    }
}

impl GraphQLQuery for AllProducts {
    type Variables = all_products::Variables;
    type ResponseData = AllProductsData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: ALL_PRODUCTS_QUERY,
            operation_name: "AllProducts",
        }
    }
}

/// One product looked up by URL handle.
pub struct ProductByHandle;

pub mod product_by_handle {
    use super::Serialize;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }
}

impl GraphQLQuery for ProductByHandle {
    type Variables = product_by_handle::Variables;
    type ResponseData = ProductByHandleData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: PRODUCT_BY_HANDLE_QUERY,
            operation_name: "ProductByHandle",
        }
    }
}
