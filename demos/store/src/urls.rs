//! URL configuration for the store demo.
//!
//! The product collection's route table is generated from a single plan and
//! mounted at the resolver root.

use std::sync::Arc;

use cruditor_collection::UrlPlan;
use cruditor_core::CruditorResult;
use cruditor_http::urls::pattern::RouteHandler;
use cruditor_http::urls::resolver::{root, URLEntry, URLResolver};
use cruditor_http::HttpRequest;
use cruditor_views::View;

use crate::store::ProductStore;
use crate::views::{
    ProductAddView, ProductChangeView, ProductDeleteView, ProductListView, SharedUrls,
};

fn handler_for<V: View + 'static>(view: Arc<V>) -> RouteHandler {
    Arc::new(move |request: HttpRequest| -> cruditor_http::BoxFuture {
        let view = view.clone();
        Box::pin(async move { view.dispatch(request).await })
    })
}

/// Builds the store's URL resolver and fills the shared cell the views
/// reverse against.
pub fn store_urls(store: Arc<ProductStore>, urls: SharedUrls) -> CruditorResult<URLResolver> {
    let patterns = UrlPlan::new("products", "product-")
        .list_view(handler_for(Arc::new(ProductListView::new(
            store.clone(),
            urls.clone(),
        ))))
        .add_view(handler_for(Arc::new(ProductAddView::new(
            store.clone(),
            urls.clone(),
        ))))
        .change_view(handler_for(Arc::new(ProductChangeView::new(
            store.clone(),
            urls.clone(),
        ))))
        .delete_view(handler_for(Arc::new(ProductDeleteView::new(
            store,
            urls.clone(),
        ))))
        .build()?;

    let resolver = root(patterns.into_iter().map(URLEntry::Pattern).collect())?;
    Ok(resolver)
}
