//! Integration tests for vervegallery-drive
//!
//! Uses wiremock to simulate the Google Drive v3 API and verifies
//! end-to-end behavior of the gateway: listings, folder lookups, uploads,
//! single-file metadata and the userinfo lookup.

mod common;

mod test_folders;
mod test_metadata;
mod test_photos;
mod test_upload;
mod test_user_info;
