//! Configuration: service settings from the environment and layout validation.

pub mod app_config;
pub mod validation;

pub use app_config::AppConfig;
pub use validation::validate_layout;
