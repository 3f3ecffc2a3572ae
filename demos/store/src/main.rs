//! # Store demo
//!
//! A small product admin built on the cruditor view stack:
//!
//! - **Store**: an in-memory `ProductStore`, passed explicitly to each view
//! - **Views**: a filtered product list plus add/change/delete views,
//!   configured as one collection
//! - **URLs**: the collection's route table generated from a single plan
//!
//! ## Running
//!
//! ```bash
//! cargo run --package store-demo
//! ```
//!
//! The demo drives a handful of requests through the resolver and prints
//! the resulting responses, exercising the login gate, the list table with
//! its filter, the add/change forms, and a protected deletion.

mod models;
mod store;
mod urls;
mod views;

use std::sync::Arc;

use once_cell::sync::OnceCell;

use cruditor_core::{logging, RequestUser};
use cruditor_http::HttpRequest;

use store::ProductStore;
use views::SharedUrls;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::setup_logging(true, "info");

    let product_store = Arc::new(ProductStore::with_sample_data());
    let urls: SharedUrls = Arc::new(OnceCell::new());

    let resolver = urls::store_urls(product_store.clone(), urls.clone())?;
    if urls.set(resolver).is_err() {
        anyhow::bail!("URL resolver initialized twice");
    }
    let resolver = urls.get().expect("resolver just initialized");

    let admin = RequestUser::new("admin").staff();

    // An anonymous request hits the login gate.
    let request = HttpRequest::builder().path("/products/").build();
    dispatch(resolver, request, "anonymous list request").await;

    // The staff user sees the product table with the add button.
    let request = HttpRequest::builder()
        .path("/products/")
        .user(admin.clone())
        .build();
    dispatch(resolver, request, "product list").await;

    // Filtered and sorted.
    let request = HttpRequest::builder()
        .path("/products/")
        .query_string("search=moka&sort=-price_cents")
        .user(admin.clone())
        .build();
    dispatch(resolver, request, "filtered product list").await;

    // Adding a product redirects back to the list.
    let request = HttpRequest::builder()
        .method(http::Method::POST)
        .path("/products/add/")
        .content_type("application/x-www-form-urlencoded")
        .body(b"name=French+Press&price_cents=2990&active=on".to_vec())
        .user(admin.clone())
        .build();
    dispatch(resolver, request, "add product").await;

    // The change form renders with the current values and a delete link.
    let request = HttpRequest::builder()
        .path("/products/2/")
        .user(admin.clone())
        .build();
    dispatch(resolver, request, "change form").await;

    // Deleting product 1 is blocked by an open order.
    let request = HttpRequest::builder()
        .method(http::Method::POST)
        .path("/products/1/delete/")
        .user(admin)
        .build();
    dispatch(resolver, request, "protected delete").await;

    tracing::info!(products = product_store.all().len(), "demo finished");
    Ok(())
}

async fn dispatch(
    resolver: &cruditor_http::urls::URLResolver,
    request: HttpRequest,
    label: &str,
) {
    let path = request.path().trim_start_matches('/').to_string();
    match resolver.resolve(&path) {
        Ok(matched) => {
            let mut request = request;
            request.set_kwargs(matched.kwargs.clone());
            let response = (matched.func)(request).await;
            tracing::info!(
                label,
                status = %response.status(),
                body_bytes = response.content_bytes().len(),
                "dispatched"
            );
            println!("--- {label} ({})\n{}\n", response.status(), response.content_text());
        }
        Err(error) => {
            tracing::warn!(label, %error, "no route matched");
        }
    }
}
