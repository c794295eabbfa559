//! Common types used across the Poloniex client library.

pub mod common;

pub use common::*;
