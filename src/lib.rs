//! Railway-oriented outcomes.
//!
//! Thin facade over [`railway_core`], see its documentation for the chain,
//! dispatch and match operations.
pub use railway_core::*;
