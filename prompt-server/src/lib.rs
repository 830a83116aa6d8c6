//! REST backend for the prompt manager.
//!
//! [`router`] exposes a [`PromptStore`] under the `/prompt_manager/*` routes;
//! [`serve`] runs it on a bound listener until the shutdown future resolves.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod handlers;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use prompt_primitives::routes;
use prompt_store::PromptStore;
use tokio::net::TcpListener;
use tracing::info;

pub use error::ApiError;

/// Largest accepted request body; sized for preview image uploads.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Builds the router serving every prompt manager endpoint.
pub fn router(store: Arc<PromptStore>) -> Router {
    let image_route = format!("{}:filename", routes::IMAGE_PREFIX);
    Router::new()
        .route(routes::PROMPTS, get(handlers::list_prompts))
        .route(routes::CATEGORIES, get(handlers::list_categories))
        .route(routes::ADD, post(handlers::add_prompt))
        .route(routes::UPDATE, post(handlers::update_prompt))
        .route(routes::DELETE, delete(handlers::delete_prompt))
        .route(routes::SAVE, post(handlers::save_prompts))
        .route(routes::CATEGORY_ADD, post(handlers::add_category))
        .route(routes::CATEGORY_DELETE, delete(handlers::delete_category))
        .route(routes::UPLOAD_IMAGE, post(handlers::upload_image))
        .route(routes::IMAGE_DELETE, delete(handlers::delete_image))
        .route(&image_route, get(handlers::get_image))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(store)
}

/// Serves the router on `listener` until `shutdown` completes.
///
/// # Errors
///
/// Propagates I/O errors from the listener.
pub async fn serve<F>(
    listener: TcpListener,
    store: Arc<PromptStore>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "prompt manager backend listening");
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("prompt manager backend stopped");
    Ok(())
}
