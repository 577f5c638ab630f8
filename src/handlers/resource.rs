//! Resource lifecycle handlers: create, read/import, refresh, update, delete.

use crate::error::ProviderError;
use crate::resources::ResourceData;
use crate::response::{success_many, success_one, success_one_ok};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct AttributesBody {
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub prior: Map<String, Value>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

pub async fn list_types(State(state): State<AppState>) -> impl IntoResponse {
    success_many(state.provider.resource_types())
}

pub async fn create(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
    Json(body): Json<AttributesBody>,
) -> Result<impl IntoResponse, ProviderError> {
    let resource = state.provider.resource(&type_name)?;
    let mut data = ResourceData::new(body.attributes);
    resource.create(state.provider.client(), &mut data).await?;
    tracing::info!(resource = %type_name, id = %data.id(), "created");
    Ok(success_one(data.into_state()))
}

/// Import by id: no prior attributes, the object must exist.
pub async fn read(
    State(state): State<AppState>,
    Path((type_name, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ProviderError> {
    let resource = state.provider.resource(&type_name)?;
    let mut data = ResourceData::existing(&id, Map::new());
    resource.read(state.provider.client(), &mut data).await?;
    if data.is_gone() {
        return Err(ProviderError::NotFound(format!("{} {}", type_name, id)));
    }
    Ok(success_one_ok(data.into_state()))
}

/// Refresh known state. A gone object comes back with an empty id.
pub async fn refresh(
    State(state): State<AppState>,
    Path((type_name, id)): Path<(String, String)>,
    Json(body): Json<AttributesBody>,
) -> Result<impl IntoResponse, ProviderError> {
    let resource = state.provider.resource(&type_name)?;
    let mut data = ResourceData::existing(&id, body.attributes);
    resource.read(state.provider.client(), &mut data).await?;
    Ok(success_one_ok(data.into_state()))
}

pub async fn update(
    State(state): State<AppState>,
    Path((type_name, id)): Path<(String, String)>,
    Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse, ProviderError> {
    let resource = state.provider.resource(&type_name)?;
    let mut data = ResourceData::planned(&id, body.prior, body.attributes);
    resource.update(state.provider.client(), &mut data).await?;
    tracing::info!(resource = %type_name, id = %data.id(), "updated");
    Ok(success_one_ok(data.into_state()))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((type_name, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ProviderError> {
    let resource = state.provider.resource(&type_name)?;
    let mut data = ResourceData::existing(&id, Map::new());
    resource.delete(state.provider.client(), &mut data).await?;
    tracing::info!(resource = %type_name, id = %id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}
