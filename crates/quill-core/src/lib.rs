//! # Quill Core
//!
//! The domain layer of the Quill blog API.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the post access policy, the post use cases, and the ports
//! infrastructure has to implement.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use policy::{AccessDenied, PostAccessPolicy};
pub use service::PostService;
