mod city;

pub use city::{CreateCityResponse, DeleteCityResponse, SearchParams, UpdateCityResponse};

use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
