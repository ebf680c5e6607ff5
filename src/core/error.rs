// mapping failures
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    /// The value's runtime type has no rule anywhere in the model chain and
    /// is not one of the built-in structural categories.
    #[error("no mapping rule for type `{type_name}` in model `{model}`")]
    Unmappable {
        model: &'static str,
        type_name: &'static str,
    },

    /// An overriding rule delegated upward, but no ancestor of its defining
    /// model maps that type.
    #[error("no ancestor of model `{model}` maps type `{type_name}`")]
    NoParentRule {
        model: &'static str,
        type_name: &'static str,
    },

    /// A rule received a value of a different type than it was registered
    /// for. Only reachable by delegating with a foreign value; the dispatch
    /// path always hands rules a matching value.
    #[error("rule registered for `{expected}` received a `{found}` value")]
    RuleMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// An identity rule failed to serialize its value into plain data.
    #[error("failed to serialize `{type_name}` into plain data")]
    Serialize {
        type_name: &'static str,
        source: serde_json::Error,
    },
}
