//! # millkit Core
//!
//! Core types and utilities shared by the millkit crates.
//! Provides the measurement units and the locale-invariant number
//! formatting used when writing G-code.

pub mod units;

pub use units::{format_number, Units};
