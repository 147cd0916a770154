//! StorePulse Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout StorePulse:
//! - Behavioral event records and ranking dimensions
//! - Catalog read-model types (products, filters, sorting, pagination)
//! - Store trait abstractions
//! - Core error types

pub mod catalog;
pub mod error;
pub mod events;
pub mod store;

pub use error::{Error, Result};
