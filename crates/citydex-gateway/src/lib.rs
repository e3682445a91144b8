//! HTTP gateway for Citydex.
//!
//! Exposes create/read/update/delete over cities and a name search whose
//! results are passed through the enrichment pipeline.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
