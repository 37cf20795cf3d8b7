//! Test helpers module
//!
//! This module provides utilities and helpers for testing the StudyCal
//! event store. It includes store factories, a failure-injecting repository
//! wrapper, and test data builders.

#![allow(dead_code)]

pub mod database_helper;
pub mod store_helper;
pub mod test_data;

pub use database_helper::*;
pub use store_helper::*;
pub use test_data::*;
