// runtime dispatch over classified values
use std::any::Any;

use serde_json::Value;
use tracing::trace;

use crate::core::delegate::Scope;
use crate::core::error::MapError;
use crate::core::model::ObjectModel;
use crate::core::types::{Source, ToSource};

impl ObjectModel {
    /// Map `value` into a plain-data tree.
    ///
    /// Classification order:
    /// 1) nil and booleans map to themselves
    /// 2) an object with a rule anywhere in the chain runs the most-derived
    ///    rule, and its result is returned verbatim (no implicit merging)
    /// 3) sequences are walked element-wise, recursively
    /// 4) associative data passes through unchanged, entries not remapped
    /// 5) anything else is unmappable
    pub fn map<S>(&self, value: &S) -> Result<Value, MapError>
    where
        S: ToSource + ?Sized,
    {
        self.map_source(value.to_source())
    }

    /// Map an already-classified [`Source`].
    pub fn map_source(&self, source: Source<'_>) -> Result<Value, MapError> {
        match source {
            Source::Null => Ok(Value::Null),
            Source::Bool(value) => Ok(Value::Bool(value)),
            Source::Seq(items) => items
                .into_iter()
                .map(|item| self.map_source(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Source::Data(data) => Ok(Value::Object(data)),
            Source::Object { value, type_name } => self.map_object(value, type_name),
        }
    }

    fn map_object(&self, value: &dyn Any, type_name: &'static str) -> Result<Value, MapError> {
        let type_id = value.type_id();

        let Some((layer, rule)) = self.resolve(type_id) else {
            return Err(MapError::Unmappable {
                model: self.name,
                type_name,
            });
        };

        trace!(
            model = self.name,
            defined_in = self.layers[layer].model,
            ty = type_name,
            "dispatching rule"
        );

        let scope = Scope {
            model: self,
            layer,
            type_id,
            type_name,
        };
        rule(value, &scope)
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::{Map, Value, json};

    use crate::core::delegate::Scope;
    use crate::core::error::MapError;
    use crate::core::model::ObjectModel;

    struct Coin {
        face: &'static str,
    }
    crate::mappable!(Coin);

    #[derive(Serialize)]
    struct Sku(&'static str);
    crate::mappable!(Sku);

    struct Unmodeled;
    crate::mappable!(Unmodeled);

    fn empty_model() -> ObjectModel {
        ObjectModel::define("Empty", |_rules| {})
    }

    fn coin_model() -> ObjectModel {
        ObjectModel::define("Coins", |rules| {
            rules.map(|coin: &Coin, _scope: &Scope| Ok(json!({ "face": coin.face })));
        })
    }

    #[test]
    fn maps_nil_and_booleans_to_themselves() {
        let model = empty_model();
        assert_eq!(model.map(&None::<bool>).unwrap(), Value::Null);
        assert_eq!(model.map(&true).unwrap(), json!(true));
        assert_eq!(model.map(&false).unwrap(), json!(false));
    }

    #[test]
    fn maps_sequences_element_wise_preserving_order() {
        let model = coin_model();
        let coins = vec![Coin { face: "heads" }, Coin { face: "tails" }];

        assert_eq!(
            model.map(&coins).unwrap(),
            json!([{ "face": "heads" }, { "face": "tails" }])
        );
        assert_eq!(model.map(&Vec::<bool>::new()).unwrap(), json!([]));
    }

    #[test]
    fn maps_nested_sequences_at_every_level() {
        let model = coin_model();
        let nested = vec![vec![Coin { face: "heads" }], vec![]];

        assert_eq!(
            model.map(&nested).unwrap(),
            json!([[{ "face": "heads" }], []])
        );
    }

    #[test]
    fn passes_associative_data_through_unchanged() {
        let model = empty_model();
        let mut data = Map::new();
        data.insert("x".to_owned(), json!(10));
        data.insert("y".to_owned(), json!([1, 2, 3]));

        // entries are not remapped, even the nested sequence
        assert_eq!(model.map(&data).unwrap(), Value::Object(data.clone()));
    }

    #[test]
    fn rule_result_is_returned_verbatim() {
        let model = coin_model();
        assert_eq!(
            model.map(&Coin { face: "heads" }).unwrap(),
            json!({ "face": "heads" })
        );
    }

    #[test]
    fn optional_values_map_through_their_content() {
        let model = coin_model();
        assert_eq!(
            model.map(&Some(Coin { face: "tails" })).unwrap(),
            json!({ "face": "tails" })
        );
        assert_eq!(model.map(&None::<Coin>).unwrap(), Value::Null);
    }

    #[test]
    fn unmodeled_type_fails_with_unmappable() {
        let model = coin_model();

        match model.map(&Unmodeled).unwrap_err() {
            MapError::Unmappable { model, type_name } => {
                assert_eq!(model, "Coins");
                assert!(type_name.ends_with("Unmodeled"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unregistered_type_fails_even_with_similar_rules() {
        // dispatch is by exact runtime type: a rule for Coin says nothing
        // about other one-field types
        struct Token {
            face: &'static str,
        }
        crate::mappable!(Token);

        let model = coin_model();
        assert!(matches!(
            model.map(&Token { face: "heads" }).unwrap_err(),
            MapError::Unmappable { .. }
        ));
    }

    #[test]
    fn identity_rule_serializes_the_value_itself() {
        let model = ObjectModel::define("Skus", |rules| {
            rules.identity::<Sku>();
        });

        assert_eq!(model.map(&Sku("ab-123")).unwrap(), json!("ab-123"));
    }
}
