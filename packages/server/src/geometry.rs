//! `GeoJSON` output for boundary layers.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use seniaura_territory_models::{Boundary, Territory};

fn feature(code: &str, name: Option<&str>, geometry: Geometry) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("code".to_string(), JsonValue::from(code));
    properties.insert(
        "name".to_string(),
        name.map_or(JsonValue::Null, JsonValue::from),
    );

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Territories as a feature collection with `code` / `name` properties.
pub fn territories_to_geojson<'a>(territories: impl Iterator<Item = &'a Territory>) -> FeatureCollection {
    collection(
        territories
            .map(|t| {
                feature(
                    &t.code,
                    Some(t.display_name()),
                    Geometry::new(Value::from(&t.geometry)),
                )
            })
            .collect(),
    )
}

/// Overlay boundaries as a feature collection.
pub fn boundaries_to_geojson(boundaries: &[Boundary]) -> FeatureCollection {
    collection(
        boundaries
            .iter()
            .map(|b| {
                feature(
                    &b.code,
                    b.name.as_deref(),
                    Geometry::new(Value::from(&b.geometry)),
                )
            })
            .collect(),
    )
}
