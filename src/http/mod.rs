mod auth;
mod client;
mod error;
pub mod routes;

pub use auth::Bearer;
pub use client::ApiClient;
pub use error::AppError;
