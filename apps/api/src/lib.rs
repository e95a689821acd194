pub mod config;
pub mod errors;
pub mod form;
pub mod llm_client;
pub mod profile;
pub mod recommendation;
pub mod routes;
pub mod state;

pub use config::Config;
pub use errors::AppError;
