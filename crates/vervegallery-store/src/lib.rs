//! VerveGallery stores
//!
//! The state containers that sit between the front end and the ports:
//!
//! - [`PhotoStore`] - cached photo collections, categories and uploads
//! - [`AuthStore`] - the signed-in session, also the gateway's token source
//!
//! Both are constructor-injected with `Arc<dyn Port>` dependencies and run
//! every action as a tracked request (see [`RequestTracker`]).
//!
//! Adapters that only the stores need also live here: the file and memory
//! [`ISessionStorage`](vervegallery_core::ports::ISessionStorage)
//! implementations and the placeholder [`SampledFaceMatcher`].

pub mod auth_store;
pub mod error;
pub mod face;
pub mod photo_store;
pub mod session;
pub mod tracker;

pub use auth_store::{AuthStore, Session, SESSION_KEY};
pub use error::StoreError;
pub use face::SampledFaceMatcher;
pub use photo_store::{PhotoState, PhotoStore, PhotoStoreSettings};
pub use session::{FileSessionStorage, MemorySessionStorage};
pub use tracker::{RequestRecord, RequestState, RequestTracker};
