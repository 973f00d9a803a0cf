//! Tagged outcomes for railway-style computation.
//!
//! An [`Outcome`] is a success or a failure carrying a [`Tag`] (its subtype)
//! and a payload. Chain steps advance an outcome only while it succeeds,
//! collapsing the whole chain into the first failure. Outcomes may box other
//! outcomes, consumers always observe the terminal one.
//!
//! ```rust
//! use railway_core::{failure_with, success, Kind, Outcome, TagFilter};
//! use serde_json::{json, Value};
//!
//! fn apply_tax(value: f64) -> Outcome {
//!     let price = value + value * 0.1;
//!     if price < 100.0 {
//!         return failure_with("priceless", "priceless");
//!     }
//!     success(json!({ "price": price }))
//! }
//!
//! let mut total = None;
//! apply_tax(100.0)
//!     .step(|order: Value| order["price"].as_f64().unwrap_or_default() + 1.0)
//!     .check(|price| price.as_value().and_then(Value::as_f64) > Some(100.0))
//!     .on(Kind::Success, TagFilter::Any, |price: f64| total = Some(price))
//!     .on_failure("priceless", || total = None);
//!
//! assert_eq!(total, Some(111.0));
//! ```
extern crate self as railway_core;

mod chain;
mod dispatch;
mod error;
mod given;
mod handler;
mod matcher;
mod outcome;
mod payload;
pub mod stack;
mod stepped;
mod tag;

pub use dispatch::apply;
pub use error::EmptyValue;
pub use given::{attempt, given, Given};
pub use handler::{Branch, Continuation, FailureBranch, Reaction};
pub use outcome::{failure, failure_with, success, success_with, Outcome, Parts};
pub use payload::{keyed_field, keyed_fields, FromPayload, Json, Keyed, Payload};
pub use railway_macros::FromPayload;
pub use stepped::{IntoStepped, Stepped};
pub use tag::{Kind, Tag, TagFilter};
