#![warn(clippy::unwrap_used)]

pub mod crud_rest;
pub mod recommendation_rest;
pub mod rest;
pub mod segmentation_rest;
pub mod server;
pub mod swagger;

pub use rest::AppState;
pub use server::ApiServer;
pub use swagger::ApiDoc;
