//! # Base types for ox88
//!
//! This is an auxiliary crate for `ox88`, which contains the core board types
//! and 0x88 geometry. It was split from the main crate so the two layers can
//! evolve separately.
//!
//! Normally you don't want to use this crate directly. Use `ox88` instead.

pub mod geometry;
pub mod types;
