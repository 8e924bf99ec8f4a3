//! Application wiring: configuration, providers and service assembly

pub mod config;
pub mod init;
pub mod loader;
pub mod providers;

pub use config::AppConfig;
pub use init::{init_history, init_service};
pub use loader::load_config;
