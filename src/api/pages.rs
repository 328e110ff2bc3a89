//! Static page API endpoints
//!
//! Public reads, admin upsert, and admin block operations.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{ContentBlock, PageName, StaticPage};
use crate::services::PageService;

/// Request body for saving a page
#[derive(Debug, Deserialize)]
pub struct SavePageRequest {
    pub content: serde_json::Value,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

/// Request body for adding a content block
#[derive(Debug, Deserialize)]
pub struct AddBlockRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: String,
    pub content: serde_json::Value,
}

/// Request body for updating a content block; unset fields are kept
#[derive(Debug, Deserialize)]
pub struct UpdateBlockRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub position: Option<String>,
    pub content: Option<serde_json::Value>,
}

fn parse(name: &str) -> Result<PageName, ApiError> {
    Ok(PageService::parse_name(name)?)
}

/// GET /api/pages
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<StaticPage>>, ApiError> {
    Ok(Json(state.page_service.list().await?))
}

/// GET /api/pages/{name}
pub async fn get_page(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StaticPage>, ApiError> {
    Ok(Json(state.page_service.get(parse(&name)?).await?))
}

/// PUT /api/pages/{name}
pub async fn save_page(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<SavePageRequest>,
) -> Result<Json<StaticPage>, ApiError> {
    let page = parse(&name)?;
    Ok(Json(
        state.page_service.save(page, body.content, body.blocks).await?,
    ))
}

/// POST /api/pages/{name}/blocks
pub async fn add_block(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<AddBlockRequest>,
) -> Result<Json<StaticPage>, ApiError> {
    let page = parse(&name)?;
    Ok(Json(
        state
            .page_service
            .add_block(page, body.kind, body.position, body.content)
            .await?,
    ))
}

/// PUT /api/pages/{name}/blocks/{block_id}
pub async fn update_block(
    State(state): State<AppState>,
    Path((name, block_id)): Path<(String, String)>,
    Json(body): Json<UpdateBlockRequest>,
) -> Result<Json<StaticPage>, ApiError> {
    let page = parse(&name)?;
    Ok(Json(
        state
            .page_service
            .update_block(page, &block_id, body.kind, body.position, body.content)
            .await?,
    ))
}

/// DELETE /api/pages/{name}/blocks/{block_id}
pub async fn remove_block(
    State(state): State<AppState>,
    Path((name, block_id)): Path<(String, String)>,
) -> Result<Json<StaticPage>, ApiError> {
    let page = parse(&name)?;
    Ok(Json(state.page_service.remove_block(page, &block_id).await?))
}
