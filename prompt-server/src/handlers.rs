//! Route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use bytes::Bytes;
use prompt_primitives::wire::{
    ApiResponse, CategoryRequest, FilenameRequest, IndexRequest, SaveRequest,
};
use prompt_primitives::{CategoryLabel, NewPrompt, PromptIndex, PromptRecord};
use prompt_store::PromptStore;
use tracing::debug;

use crate::error::ApiError;

type Store = State<Arc<PromptStore>>;
type ApiResult<T> = Result<T, ApiError>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

fn labels(categories: Vec<CategoryLabel>) -> Vec<String> {
    categories.into_iter().map(String::from).collect()
}

pub(crate) async fn list_prompts(State(store): Store) -> ApiResult<Json<Vec<PromptRecord>>> {
    Ok(Json(store.list_prompts().await?))
}

pub(crate) async fn list_categories(State(store): Store) -> ApiResult<Json<Vec<CategoryLabel>>> {
    Ok(Json(store.list_categories().await?))
}

pub(crate) async fn add_prompt(
    State(store): Store,
    payload: Result<Json<NewPrompt>, JsonRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let index = store.add_prompt(body(payload)?).await?;
    Ok(Json(ApiResponse::success().with_index(index)))
}

pub(crate) async fn update_prompt(
    State(store): Store,
    payload: Result<Json<PromptRecord>, JsonRejection>,
) -> ApiResult<Json<ApiResponse>> {
    store.update_prompt(body(payload)?).await?;
    Ok(Json(ApiResponse::success()))
}

pub(crate) async fn delete_prompt(
    State(store): Store,
    payload: Result<Json<IndexRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let IndexRequest { index } = body(payload)?;
    let deleted = store.delete_prompt(index).await?;
    Ok(Json(ApiResponse::success().with_deleted(deleted.title)))
}

pub(crate) async fn save_prompts(
    State(store): Store,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let SaveRequest { prompts } = body(payload)?;
    let count = store.save_all(prompts).await?;
    Ok(Json(ApiResponse::success().with_count(count)))
}

pub(crate) async fn add_category(
    State(store): Store,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let CategoryRequest { category } = body(payload)?;
    let categories = store.add_category(&category).await?;
    Ok(Json(ApiResponse::success().with_categories(labels(categories))))
}

pub(crate) async fn delete_category(
    State(store): Store,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let CategoryRequest { category } = body(payload)?;
    let categories = store.delete_category(&category).await?;
    Ok(Json(ApiResponse::success().with_categories(labels(categories))))
}

pub(crate) async fn upload_image(
    State(store): Store,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse>> {
    let mut file: Option<(String, Bytes)> = None;
    let mut index: Option<PromptIndex> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(err.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::bad_request(err.body_text()))?;
                file = Some((file_name, data));
            }
            Some("index") => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| ApiError::bad_request(err.body_text()))?;
                index = Some(
                    text.parse()
                        .map_err(|err: prompt_primitives::Error| {
                            ApiError::bad_request(err.to_string())
                        })?,
                );
            }
            other => debug!(field = ?other, "ignoring multipart field"),
        }
    }

    let (name, data) = file.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let index = index.ok_or_else(|| ApiError::bad_request("Index required"))?;
    let filename = store.save_image(index, &name, &data).await?;
    Ok(Json(ApiResponse::success().with_filename(filename)))
}

pub(crate) async fn get_image(
    State(store): Store,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let (data, content_type) = store.read_image(&filename).await?;
    Ok(([(CONTENT_TYPE, content_type)], data))
}

pub(crate) async fn delete_image(
    State(store): Store,
    payload: Result<Json<FilenameRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let FilenameRequest { filename } = body(payload)?;
    if filename.trim().is_empty() {
        return Err(ApiError::bad_request("Filename required"));
    }
    store.delete_image(&filename).await?;
    Ok(Json(ApiResponse::success()))
}
