//! # OZON Report Config
//!
//! Type-safe configuration management for the OZON report job.
//!
//! This crate provides the configuration schema, its defaults, loading from
//! YAML/TOML files, `.env` files and environment variables, and validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::*;
pub use schema::*;
pub use validator::*;
