use crate::error::{AppError, Result};
use crate::model::{CreateCityResponse, DeleteCityResponse, SearchParams, UpdateCityResponse};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use citydex_core::{City, CityId, CityUpdate, EnrichedCity, NewCity};
use tracing::{debug, info};

pub async fn create_city_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewCity>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateCityResponse>)> {
    let Json(city) = body?;
    city.validate()?;

    let id = state.repository().insert(city).await?;
    info!(city_id = id, "city created");

    Ok((StatusCode::CREATED, Json(CreateCityResponse { id })))
}

pub async fn list_cities_handler(State(state): State<AppState>) -> Result<Json<Vec<City>>> {
    let cities = state.repository().list().await?;
    Ok(Json(cities))
}

pub async fn get_city_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<CityId>, PathRejection>,
) -> Result<Json<City>> {
    let Path(id) = path?;

    state
        .repository()
        .get(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn update_city_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<CityId>, PathRejection>,
    body: std::result::Result<Json<CityUpdate>, JsonRejection>,
) -> Result<Json<UpdateCityResponse>> {
    let Path(id) = path?;
    let Json(update) = body?;
    update.validate()?;

    if !state.repository().update(id, update).await? {
        return Err(AppError::NotFound);
    }
    info!(city_id = id, "city updated");

    Ok(Json(UpdateCityResponse { updated: true }))
}

pub async fn delete_city_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<CityId>, PathRejection>,
) -> Result<Json<DeleteCityResponse>> {
    let Path(id) = path?;

    if !state.repository().delete(id).await? {
        return Err(AppError::NotFound);
    }
    info!(city_id = id, "city deleted");

    Ok(Json(DeleteCityResponse { deleted: true }))
}

/// Searches by name and enriches the matches with country and weather data.
pub async fn search_cities_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<EnrichedCity>>> {
    let Query(params) = query?;
    let name = params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("Query param 'name' is required".to_string()))?;

    let cities = state.repository().search_by_name(name).await?;
    if cities.is_empty() {
        return Err(AppError::NotFound);
    }
    debug!(name, matches = cities.len(), "enriching search results");

    Ok(Json(state.enricher().enrich(cities).await))
}
