//! Marshaling engine for Drone-style CI plugins.
//!
//! Drone passes plugin settings as `PLUGIN_`-prefixed environment variables.
//! This crate turns those into typed parameter records and turns records
//! into command-line arguments for the tool the plugin wraps.
//!
//! The public API is organised into layers:
//!
//! - **[`names`]**: split identifiers into terms and rebuild them in display
//!   (`TLSCertID`) or flag (`tls-cert-id`) form
//! - **[`record`]**: the [`Record`](record::Record) schema and the
//!   [`record!`] macro that declares one
//! - **[`args`]**: record → argument vector
//! - **[`env`]**: environment → record
//! - **[`runner`]**: environment → record → child process in one call
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod args;
pub mod env;
pub mod error;
pub mod exec;
pub mod logging;
pub mod names;
pub mod record;
pub mod runner;

pub use error::{ConversionError, Error, SchemaError};
