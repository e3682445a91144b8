use citydex_core::CityId;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct CreateCityResponse {
    pub id: CityId,
}

#[derive(Serialize)]
pub struct UpdateCityResponse {
    pub updated: bool,
}

#[derive(Serialize)]
pub struct DeleteCityResponse {
    pub deleted: bool,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}
