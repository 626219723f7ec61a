//! Foundation types for Vellum.
//!
//! This crate contains the toolkit-agnostic types shared by the Vellum
//! crates: pointer input events, modifier keys, and the error type.

pub mod error;
pub mod input;
