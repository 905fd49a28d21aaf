use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::modules::firestore::Value;

/*
 * One review left on a vehicle. Everything is optional: the store holds
 * free-form documents and older app versions wrote fewer fields.
 */
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Star rating, meaningful in `0..=5`. Anything else is kept as-is here
    /// and ignored by the meter.
    pub stars: Option<i64>,
    pub author: Option<String>,
    pub comment: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl TryFrom<&Value> for Comment {
    type Error = anyhow::Error;

    /// Pick the known fields out of a Firestore map value.
    /// A `stars` field of the wrong type (a double, a string) becomes `None`,
    /// the same way the app's `as? Long` cast used to drop it.
    fn try_from(value: &Value) -> anyhow::Result<Self> {
        let fields = match value {
            Value::MapValue(map) => &map.fields,
            _ => bail!("comment is not a map"),
        };

        Ok(Self {
            stars: match fields.get("stars") {
                Some(Value::IntegerValue(stars)) => Some(*stars),
                _ => None,
            },
            author: match fields.get("author") {
                Some(Value::StringValue(author)) => Some(author.clone()),
                _ => None,
            },
            comment: match fields.get("comment") {
                Some(Value::StringValue(comment)) => Some(comment.clone()),
                _ => None,
            },
            date: match fields.get("date") {
                Some(Value::TimestampValue(date)) => Some(*date),
                _ => None,
            },
        })
    }
}
