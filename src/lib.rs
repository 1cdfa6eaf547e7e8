pub mod config;
pub mod error;
pub mod http_client;
pub mod models;
pub mod poller;
pub mod services;
pub mod toast;
pub mod views;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use http_client::{ApiRequest, ApiTransport, HttpClient};
pub use toast::Toaster;
