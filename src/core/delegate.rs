// rule execution context: recursion and parent-rule delegation
use std::any::{Any, TypeId};

use serde_json::Value;
use tracing::trace;

use crate::core::error::MapError;
use crate::core::model::ObjectModel;
use crate::core::types::ToSource;

/// Context handed to every rule: the engine for recursive mapping, plus
/// enough anchoring (defining layer, source type) to resolve "the rule one
/// level up from where this rule is defined".
pub struct Scope<'m> {
    pub(crate) model: &'m ObjectModel,
    /// index of the layer defining the currently executing rule
    pub(crate) layer: usize,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
}

impl Scope<'_> {
    /// Recursively map a nested value.
    ///
    /// Dispatches through the full model chain, whatever layer defines the
    /// executing rule, so overrides apply to nested values too.
    pub fn map<S>(&self, value: &S) -> Result<Value, MapError>
    where
        S: ToSource + ?Sized,
    {
        self.model.map(value)
    }

    /// Execute the nearest ancestor rule shadowed by the currently executing
    /// one, for the same source type and the same value, and return its
    /// result. Merging anything into that result stays the caller's job.
    pub fn parent<T: Any>(&self, value: &T) -> Result<Value, MapError> {
        if TypeId::of::<T>() != self.type_id {
            return Err(MapError::RuleMismatch {
                expected: self.type_name,
                found: std::any::type_name::<T>(),
            });
        }

        let defined_in = self.model.layers[self.layer].model;

        let Some((layer, rule)) = self.model.resolve_above(self.layer, self.type_id) else {
            return Err(MapError::NoParentRule {
                model: defined_in,
                type_name: self.type_name,
            });
        };

        trace!(
            model = self.model.name,
            from = defined_in,
            to = self.model.layers[layer].model,
            ty = self.type_name,
            "delegating to shadowed rule"
        );

        let scope = Scope {
            model: self.model,
            layer,
            type_id: self.type_id,
            type_name: self.type_name,
        };
        rule(value as &dyn Any, &scope)
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }
}
