//! Persistence for the course platform: sea-orm entities, one repository per
//! entity and the submission scoring entry point.

pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod repository;
pub mod state;

pub use config::StoreConfig;
pub use error::{ErrorKind, StoreError};
pub use state::CourseStore;
