//! House price prediction service.
//!
//! Serves a pre-trained regression model over HTTP: clients post six
//! structural features of a house to `/predict` and receive a predicted sale
//! price. The scaler and regressor artifacts are loaded once at startup and
//! shared read-only by every request.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod model;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use artifacts::Artifacts;
pub use error::*;
pub use routes::create_router;
pub use state::AppState;
