//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. The stores depend on these interfaces; their
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IDriveGateway`] - Photo storage, listing and upload (Google Drive)
//! - [`IIdentityProvider`] - Interactive sign-in and silent session restore
//! - [`IAccessTokenSource`] - Supplies the bearer token for gateway calls
//! - [`ISessionStorage`] - Key-value storage for the persisted profile record
//! - [`IFaceMatcher`] - Ranks photos against a face descriptor

pub mod drive_gateway;
pub mod face_matcher;
pub mod identity;
pub mod session_storage;

pub use drive_gateway::{IDriveGateway, ProgressCallback, DEFAULT_LIST_LIMIT};
pub use face_matcher::{FaceDescriptor, FaceMatch, IFaceMatcher};
pub use identity::{IAccessTokenSource, IIdentityProvider, SignedIn, Tokens};
pub use session_storage::ISessionStorage;
