mod city;
mod health;

pub use city::{
    create_city_handler, delete_city_handler, get_city_handler, list_cities_handler,
    search_cities_handler, update_city_handler,
};
pub use health::health_handler;
