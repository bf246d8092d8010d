//! In-memory record store for the banking schema.
//!
//! Production: back this with a relational database; the repository API
//! (find-all, find-by-id, save, delete, exists) stays the same.

pub mod repository;
pub mod seed;
pub mod store;

pub use repository::{Entity, Repository};
pub use seed::SeedData;
pub use store::DataStore;
