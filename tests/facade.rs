//! Facade tests: everything needed to map results is reachable from the root crate

use serde::Deserialize;
use strata_rowmap::{
    ExtraPolicy, FieldSpec, FieldType, RecordShape, SearchResults, ShapeConfig, Value,
};

#[derive(Debug, Deserialize, PartialEq)]
struct Hit {
    id: i64,
    #[serde(rename = "_distance")]
    distance: f64,
}

fn results() -> SearchResults {
    SearchResults::from_json(vec![
        serde_json::json!({"id": 1, "_distance": 0.0, "_rowid": 10}),
        serde_json::json!({"id": 2, "_distance": 1.25, "_rowid": 11}),
    ])
    .unwrap()
}

#[test]
fn test_models_through_facade() {
    let hits: Vec<Hit> = results().to_models().unwrap();
    assert_eq!(
        hits,
        vec![
            Hit { id: 1, distance: 0.0 },
            Hit { id: 2, distance: 1.25 }
        ]
    );
}

#[test]
fn test_config_from_toml_drives_extra_policy() {
    let config = ShapeConfig::from_toml_str("extra = \"forbid\"").unwrap();
    assert_eq!(config.extra, ExtraPolicy::Forbid);

    let shape = RecordShape::builder("Hit")
        .field(FieldSpec::new("id", FieldType::Int))
        .field(FieldSpec::new("distance", FieldType::Float).with_alias("_distance"))
        .computed("similarity", FieldType::Float, |r| {
            Ok(Value::Float(1.0 - r.get_float("distance")?))
        })
        .config(config)
        .build()
        .unwrap();

    // `_rowid` is not declared by the shape
    let err = results().to_records(&shape).unwrap_err();
    assert!(err.is_validation_error());
    assert!(err.to_string().contains("_rowid"));
}
