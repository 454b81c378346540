//! Core components of the `stock-gdelt-rs` crate.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The main [`SgClient`] and its builder.
//! - The primary [`SgError`] type.
//! - Shared data models like [`PriceBar`] and [`DailyNewsRow`].

/// The main client (`SgClient`), builder, and retry configuration.
pub mod client;
/// The primary error type (`SgError`) for the crate.
pub mod error;
/// Shared data models used across multiple modules (e.g., `PriceBar`).
pub mod models;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::SgClient`
pub use client::{RetryConfig, SgClient, SgClientBuilder};
pub use error::SgError;
pub use models::{DailyNewsRow, HEADLINE_DELIMITER, PriceBar};
