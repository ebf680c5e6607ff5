// rule lookup across the layer chain
use std::any::{Any, TypeId};

use crate::core::model::{ObjectModel, RuleFn};

impl ObjectModel {
    /// Active rule for `type_id`: walk from the most-derived layer towards
    /// the root and return the first hit with its defining layer index.
    pub(crate) fn resolve(&self, type_id: TypeId) -> Option<(usize, &RuleFn)> {
        self.layers
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, layer)| layer.rules.get(&type_id).map(|rule| (index, rule)))
    }

    /// Continue the walk from the parent of `layer` towards the root.
    ///
    /// Anchored to the layer that defines the currently executing rule, not
    /// to the model doing the mapping, so multi-level override chains
    /// resolve one step at a time.
    pub(crate) fn resolve_above(&self, layer: usize, type_id: TypeId) -> Option<(usize, &RuleFn)> {
        self.layers[..layer]
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, layer)| layer.rules.get(&type_id).map(|rule| (index, rule)))
    }

    /// Does any layer in the chain define a rule for `T`?
    pub fn maps_type<T: Any>(&self) -> bool {
        self.resolve(TypeId::of::<T>()).is_some()
    }
}
