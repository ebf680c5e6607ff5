//! Declarative object -> plain-data mapping with model inheritance.
//!
//! A model registers one transform rule per source type. Derived models
//! inherit the whole rule chain, shadow individual rules, and can still
//! invoke the rule they shadow. `map` turns a classified value into a
//! `serde_json::Value` tree built only from primitives, arrays and
//! key-ordered objects.

pub mod core;

pub use crate::core::delegate::Scope;
pub use crate::core::error::MapError;
pub use crate::core::model::{ObjectModel, Rules};
pub use crate::core::types::{Source, ToSource};
