pub mod config;
mod error;
mod http_layers;
pub mod metrics;
pub mod server;
mod song_routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, run_server};
