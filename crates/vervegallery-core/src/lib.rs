//! VerveGallery Core - Domain types, ports and configuration
//!
//! This crate contains the hexagonal core shared by every other crate:
//! - **Domain types** - `Photo`, `Category`, `UploadStatus`, `UserProfile`
//! - **Port definitions** - Traits for adapters: `IDriveGateway`,
//!   `IFaceMatcher`, `ISessionStorage`, `IIdentityProvider`, `IAccessTokenSource`
//! - **Configuration** - YAML-backed settings with validation
//!
//! # Architecture
//!
//! The domain module holds plain data with validation and no I/O.
//! Ports define trait interfaces that adapter crates implement
//! (`vervegallery-drive` for Google Drive, `vervegallery-store` for the
//! session storage and face matcher). The stores in `vervegallery-store`
//! orchestrate domain types through these ports.

pub mod config;
pub mod domain;
pub mod ports;
