//! Core entry point for the report_pdf crate.

pub mod error;
pub mod layout;
pub mod model;
pub mod render;

#[cfg(feature = "upload")]
pub mod upload;
