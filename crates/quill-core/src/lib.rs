//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! This crate contains the post model, payload validation and the post store,
//! with no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::{DomainError, RepoError};
pub use service::PostService;
