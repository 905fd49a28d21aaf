use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::collections::HashMap;

use crate::common::Client;

/// One value of a Firestore document field.
/// See: https://firebase.google.com/docs/firestore/reference/rest/v1/Value
///
/// The REST encoding tags every value with its type, and 64-bit integers
/// come string-encoded to survive JSON number precision.
#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(#[serde_as(as = "DisplayFromStr")] i64),
    DoubleValue(f64),
    TimestampValue(DateTime<Utc>),
    StringValue(String),
    /// Base64, standard encoding with padding.
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(LatLng),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MapValue {
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name,
    /// `projects/{p}/databases/{db}/documents/{collection}/{id}`.
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

impl Document {
    /// Last segment of the resource name. Document ids cannot contain `/`.
    pub fn id(&self) -> Option<&str> {
        self.name.rsplit('/').next().filter(|id| !id.is_empty())
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

/// Read-only handle on one project's `(default)` database.
pub struct Database {
    base: String,
}

impl Database {
    pub fn new<S: AsRef<str>>(project: S) -> Self {
        Self {
            base: format!(
                "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
                project.as_ref()
            ),
        }
    }

    fn url(&self, collection: &str, id: Option<&str>) -> anyhow::Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base)?;
        {
            let mut segments = url
                .path_segments_mut()
                .ok()
                .context("documents base url cannot be a base")?;
            segments.push(collection);
            if let Some(id) = id {
                /* ids like "Ford Focus" need their space percent-encoded */
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Fetch a single document. A missing document is `Ok(None)`, not an
    /// error.
    pub async fn document(
        &self,
        client: &Client<false>,
        collection: &str,
        id: &str,
    ) -> anyhow::Result<Option<Document>> {
        let res = client.0.get(self.url(collection, Some(id))?).send().await?;
        if res.status() == 404 {
            Ok(None)
        } else {
            Ok(Some(res.error_for_status()?.json().await?))
        }
    }

    /// Fetch every document of a collection, following `nextPageToken`.
    pub async fn list(
        &self,
        client: &Client<false>,
        collection: &str,
    ) -> anyhow::Result<Vec<Document>> {
        let url = self.url(collection, None)?;
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = client.0.get(url.clone());
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }
            let page: ListResponse = request.send().await?.error_for_status()?.json().await?;
            documents.extend(page.documents);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::{Database, Document, Value};
    use maplit::hashmap;

    #[test]
    fn test_value_parsing() {
        /* integerValue is a string on the wire */
        assert_eq!(
            serde_json::from_value::<Value>(serde_json::json!({ "integerValue": "5" })).unwrap(),
            Value::IntegerValue(5)
        );
        assert_eq!(
            serde_json::from_value::<Value>(serde_json::json!({ "doubleValue": 4.5 })).unwrap(),
            Value::DoubleValue(4.5)
        );
        assert_eq!(
            serde_json::from_value::<Value>(serde_json::json!({ "stringValue": "x" })).unwrap(),
            Value::StringValue("x".to_string())
        );
        assert_eq!(
            serde_json::from_value::<Value>(serde_json::json!({ "nullValue": null })).unwrap(),
            Value::NullValue(())
        );
        assert!(serde_json::from_value::<Value>(serde_json::json!({ "integerValue": "4.5" }))
            .is_err());
    }

    #[test]
    fn test_full_value_union_parses() {
        /* a document carrying bytes or geo points must not sink the whole
         * fetch; every value type of the REST reference deserializes */
        assert_eq!(
            serde_json::from_value::<Value>(serde_json::json!({ "bytesValue": "3q2+7w==" }))
                .unwrap(),
            Value::BytesValue("3q2+7w==".to_string())
        );
        assert_eq!(
            serde_json::from_value::<Value>(serde_json::json!({
                "geoPointValue": { "latitude": 48.8566, "longitude": 2.3522 }
            }))
            .unwrap(),
            Value::GeoPointValue(super::LatLng {
                latitude: 48.8566,
                longitude: 2.3522
            })
        );

        let document: Document = serde_json::from_value(serde_json::json!({
            "name": "projects/rustyze/databases/(default)/documents/vehicles/Ford Focus",
            "fields": {
                "photo": { "bytesValue": "3q2+7w==" },
                "factory": { "geoPointValue": { "latitude": 50.1, "longitude": 8.6 } },
                "comments": { "arrayValue": { "values": [] } }
            }
        }))
        .unwrap();
        assert!(document.field("photo").is_some());
        assert!(document.field("factory").is_some());
    }

    #[test]
    fn test_value_round_trip() {
        let value = Value::MapValue(super::MapValue {
            fields: hashmap! {
                "stars".to_string() => Value::IntegerValue(4),
            },
        });
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "mapValue": { "fields": { "stars": { "integerValue": "4" } } } })
        );
        assert_eq!(serde_json::from_value::<Value>(json).unwrap(), value);
    }

    #[test]
    fn test_document_id() {
        let document: Document = serde_json::from_value(serde_json::json!({
            "name": "projects/rustyze/databases/(default)/documents/vehicles/Ford Focus",
            "fields": {}
        }))
        .unwrap();
        assert_eq!(document.id(), Some("Ford Focus"));
    }

    #[test]
    fn test_missing_fields_default() {
        let document: Document = serde_json::from_value(serde_json::json!({
            "name": "projects/rustyze/databases/(default)/documents/vehicles/Citroen C3"
        }))
        .unwrap();
        assert!(document.fields.is_empty());
        assert!(document.field("comments").is_none());
    }

    #[test]
    fn test_url_encodes_ids() {
        let db = Database::new("rustyze");
        let url = db.url("vehicles", Some("Ford Focus")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/rustyze/databases/(default)/documents/vehicles/Ford%20Focus"
        );
    }
}
