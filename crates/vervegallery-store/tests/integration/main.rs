//! Integration tests for the stores, wired to the Drive adapter
//!
//! Drive is mocked with wiremock; identity is a scripted double.

mod common;
mod test_auth_store;
mod test_photo_store;
