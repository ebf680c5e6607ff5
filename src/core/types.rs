// source value classification
use std::any::Any;

use serde_json::{Map, Value};

/// A value about to be mapped, classified into the categories the engine
/// dispatches on.
///
/// `Null`, `Bool`, `Seq` and `Data` follow fixed structural policies.
/// `Object` goes through the rule registry, keyed by the exact runtime type.
pub enum Source<'a> {
    Null,
    Bool(bool),
    /// walked element-wise, order and length preserved
    Seq(Vec<Source<'a>>),
    /// already plain data, passed through verbatim
    Data(Map<String, Value>),
    /// a domain object, dispatched by its concrete type
    Object {
        value: &'a dyn Any,
        type_name: &'static str,
    },
}

impl<'a> Source<'a> {
    /// Wrap a domain object for rule dispatch.
    pub fn object<T: Any>(value: &'a T) -> Self {
        Source::Object {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Conversion into a [`Source`].
///
/// Collections and primitives classify structurally; domain objects opt into
/// rule dispatch with [`mappable!`](crate::mappable). Strings and numbers are
/// deliberately not covered: a model that wants them registers a rule for a
/// type that carries them.
pub trait ToSource {
    fn to_source(&self) -> Source<'_>;
}

impl ToSource for bool {
    fn to_source(&self) -> Source<'_> {
        Source::Bool(*self)
    }
}

impl<T: ToSource> ToSource for Option<T> {
    fn to_source(&self) -> Source<'_> {
        match self {
            Some(value) => value.to_source(),
            None => Source::Null,
        }
    }
}

impl<T: ToSource> ToSource for [T] {
    fn to_source(&self) -> Source<'_> {
        Source::Seq(self.iter().map(ToSource::to_source).collect())
    }
}

impl<T: ToSource> ToSource for Vec<T> {
    fn to_source(&self) -> Source<'_> {
        self.as_slice().to_source()
    }
}

impl ToSource for Map<String, Value> {
    fn to_source(&self) -> Source<'_> {
        Source::Data(self.clone())
    }
}

/// Mark domain types as rule-dispatched objects.
///
/// Expands to a [`ToSource`] impl classifying the type as [`Source::Object`],
/// so values reach the registry under their own `TypeId`.
#[macro_export]
macro_rules! mappable {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::core::types::ToSource for $ty {
            fn to_source(&self) -> $crate::core::types::Source<'_> {
                $crate::core::types::Source::object(self)
            }
        }
    )+};
}
