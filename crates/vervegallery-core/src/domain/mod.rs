//! Domain entities
//!
//! This module contains the core domain types for VerveGallery:
//! - Newtypes for type-safe Drive and request identifiers
//! - Photo and category DTOs normalized from Drive responses
//! - Upload tracking types
//! - The signed-in user profile
//! - Domain and gateway error types

pub mod errors;
pub mod newtypes;
pub mod photo;
pub mod upload;
pub mod user;

// Re-export commonly used types
pub use errors::{DomainError, GatewayError};
pub use newtypes::*;
pub use photo::{Category, Photo};
pub use upload::{UploadFile, UploadState, UploadStatus};
pub use user::UserProfile;
