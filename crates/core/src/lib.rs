pub mod config;
pub mod error;
pub mod reports;
pub mod types;

pub use config::AppConfig;
pub use error::{CustlysisError, CustlysisResult};
