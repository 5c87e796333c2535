//! CLI subcommands

pub mod auth;
pub mod categories;
pub mod completions;
pub mod config;
pub mod face_search;
pub mod photo;
pub mod photos;
pub mod upload;
