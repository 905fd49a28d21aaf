use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt::Display};

use crate::{
    meter::RustyMeter,
    modules::firestore::{Document, Value},
    schemas::common::Comment,
};

/// Vehicle document id, e.g. `"Ford Focus"`. Doubles as the display name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for VehicleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Vehicle {
    pub fn rusty_meter(&self) -> RustyMeter {
        RustyMeter::from_comments(&self.comments)
    }
}

impl TryFrom<Document> for Vehicle {
    type Error = anyhow::Error;

    /// The document id is the vehicle id; the `comments` array holds the
    /// reviews. Entries that aren't maps are dropped.
    fn try_from(document: Document) -> anyhow::Result<Self> {
        let id = document
            .id()
            .map(VehicleId::from)
            .context("vehicle document has no id segment in its name")?;

        let comments = match document.field("comments") {
            Some(Value::ArrayValue(array)) => array
                .values
                .iter()
                .filter_map(|value| Comment::try_from(value).ok())
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self { id, comments })
    }
}

/// What the home screen renders: a vehicle id with its computed rustyMeter.
/// Derived on every query, never persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredVehicle {
    pub id: VehicleId,
    pub rusty_meter: RustyMeter,
}

#[cfg(test)]
mod tests {
    use super::{Vehicle, VehicleId};
    use crate::modules::firestore::Document;
    use std::convert::TryFrom;

    fn document(json: serde_json::Value) -> Document {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_from_document() {
        let vehicle = Vehicle::try_from(document(serde_json::json!({
            "name": "projects/rustyze/databases/(default)/documents/vehicles/Ford Focus",
            "fields": {
                "comments": {
                    "arrayValue": {
                        "values": [
                            { "mapValue": { "fields": { "stars": { "integerValue": "5" } } } },
                            { "mapValue": { "fields": { "stars": { "integerValue": "3" } } } },
                            { "stringValue": "not a comment" }
                        ]
                    }
                }
            }
        })))
        .unwrap();

        assert_eq!(vehicle.id, VehicleId::from("Ford Focus"));
        assert_eq!(vehicle.comments.len(), 2);
        assert_eq!(vehicle.rusty_meter().percent(), 80);
    }

    #[test]
    fn test_document_without_comments() {
        let vehicle = Vehicle::try_from(document(serde_json::json!({
            "name": "projects/rustyze/databases/(default)/documents/vehicles/Fiat Multipla"
        })))
        .unwrap();

        assert!(vehicle.comments.is_empty());
        assert_eq!(vehicle.rusty_meter().percent(), 0);
    }

    #[test]
    fn test_scored_vehicle_json_shape() {
        let vehicle = Vehicle::try_from(document(serde_json::json!({
            "name": "projects/rustyze/databases/(default)/documents/vehicles/Ford Focus",
            "fields": {
                "comments": {
                    "arrayValue": {
                        "values": [
                            { "mapValue": { "fields": { "stars": { "integerValue": "3" } } } },
                            { "mapValue": { "fields": { "stars": { "integerValue": "4" } } } }
                        ]
                    }
                }
            }
        })))
        .unwrap();

        let scored = super::ScoredVehicle {
            id: vehicle.id.clone(),
            rusty_meter: vehicle.rusty_meter(),
        };
        assert_eq!(
            serde_json::to_value(&scored).unwrap(),
            serde_json::json!({ "id": "Ford Focus", "rustyMeter": "70%" })
        );
    }
}
