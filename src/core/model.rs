// model definition: rule registration and derivation
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::delegate::Scope;
use crate::core::error::MapError;

/// Type-erased transform, stored per (layer, source type).
pub(crate) type RuleFn =
    Box<dyn Fn(&dyn Any, &Scope<'_>) -> Result<Value, MapError> + Send + Sync>;

/// The rules one model registers directly, keyed by exact runtime type.
pub(crate) struct Layer {
    pub(crate) model: &'static str,
    pub(crate) rules: HashMap<TypeId, RuleFn>,
}

/// A mapping model: an immutable, resolved chain of rule layers.
///
/// Built once with [`ObjectModel::define`] or [`ObjectModel::derive`] and
/// read-only afterwards. Clones share the resolved layers, so instances are
/// cheap, stateless wrappers that can map from any number of threads. The
/// usual idiom is one `static MODEL: LazyLock<ObjectModel>` per model, which
/// keeps registration strictly before the first `map` call.
#[derive(Clone)]
pub struct ObjectModel {
    pub(crate) name: &'static str,
    /// root ancestor first, most-derived last
    pub(crate) layers: Vec<Arc<Layer>>,
}

impl ObjectModel {
    /// Define a root model: its own rules, no ancestors.
    pub fn define(name: &'static str, rules: impl FnOnce(&mut Rules)) -> Self {
        Self::build(name, None, rules)
    }

    /// Derive a model from `parent`, inheriting its whole resolved chain.
    /// Rules registered here shadow the parent's for the same type.
    pub fn derive(
        name: &'static str,
        parent: &ObjectModel,
        rules: impl FnOnce(&mut Rules),
    ) -> Self {
        Self::build(name, Some(parent), rules)
    }

    fn build(
        name: &'static str,
        parent: Option<&ObjectModel>,
        register: impl FnOnce(&mut Rules),
    ) -> Self {
        let mut rules = Rules {
            rules: HashMap::new(),
        };
        register(&mut rules);

        let mut layers = parent.map_or_else(Vec::new, |parent| parent.layers.clone());
        layers.push(Arc::new(Layer {
            model: name,
            rules: rules.rules,
        }));

        ObjectModel { name, layers }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ObjectModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain: Vec<&'static str> = self.layers.iter().map(|layer| layer.model).collect();
        f.debug_struct("ObjectModel")
            .field("name", &self.name)
            .field("chain", &chain)
            .finish()
    }
}

/// Registration surface handed to the model definition closure.
pub struct Rules {
    rules: HashMap<TypeId, RuleFn>,
}

impl Rules {
    /// Register the transform for values of exact type `T`.
    ///
    /// Registering `T` twice in the same model keeps the later rule; a model
    /// body reads top to bottom and the last registration wins.
    pub fn map<T, F>(&mut self, rule: F)
    where
        T: Any,
        F: Fn(&T, &Scope<'_>) -> Result<Value, MapError> + Send + Sync + 'static,
    {
        let shim: RuleFn = Box::new(move |value: &dyn Any, scope: &Scope<'_>| {
            let value = value.downcast_ref::<T>().ok_or_else(|| MapError::RuleMismatch {
                expected: std::any::type_name::<T>(),
                found: scope.type_name(),
            })?;
            rule(value, scope)
        });

        self.rules.insert(TypeId::of::<T>(), shim);
    }

    /// Register a rule that serializes the value itself into plain data.
    pub fn identity<T>(&mut self)
    where
        T: Any + Serialize,
    {
        self.map(|value: &T, _scope: &Scope<'_>| {
            serde_json::to_value(value).map_err(|source| MapError::Serialize {
                type_name: std::any::type_name::<T>(),
                source,
            })
        });
    }
}
