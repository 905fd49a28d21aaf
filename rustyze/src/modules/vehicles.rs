use futures::future;
use std::convert::TryFrom;
use tracing::warn;

use crate::{
    common::Client,
    modules::firestore::{Database, Value},
    schemas::vehicle::{Vehicle, VehicleId},
};

const VEHICLES: &str = "vehicles";
const USERS: &str = "users";
const LAST_SEEN_FIELD: &str = "vehiclesLastSeen";

/// Look up one vehicle. Missing documents are `Ok(None)`.
pub async fn by_id(
    client: &Client<false>,
    db: &Database,
    id: &VehicleId,
) -> anyhow::Result<Option<Vehicle>> {
    let document = db.document(client, VEHICLES, id.as_str()).await?;
    match document {
        Some(document) => Ok(Some(Vehicle::try_from(document)?)),
        None => Ok(None),
    }
}

/// Every vehicle in the store. Documents that don't convert are skipped
/// with a warning rather than failing the whole listing.
pub async fn all(client: &Client<false>, db: &Database) -> anyhow::Result<Vec<Vehicle>> {
    let documents = db.list(client, VEHICLES).await?;
    Ok(documents
        .into_iter()
        .filter_map(|document| match Vehicle::try_from(document) {
            Ok(vehicle) => Some(vehicle),
            Err(err) => {
                warn!(error = %err, "skipping malformed vehicle document");
                None
            }
        })
        .collect())
}

/// The user's append-ordered "seen recently" vehicle ids, oldest first.
/// No user document, or no such field, means an empty list. Array entries
/// that aren't strings are dropped.
pub async fn last_seen(
    client: &Client<false>,
    db: &Database,
    uid: &str,
) -> anyhow::Result<Vec<VehicleId>> {
    let document = match db.document(client, USERS, uid).await? {
        Some(document) => document,
        None => return Ok(Vec::new()),
    };

    Ok(match document.field(LAST_SEEN_FIELD) {
        Some(value) => ids_from_value(value),
        None => Vec::new(),
    })
}

fn ids_from_value(value: &Value) -> Vec<VehicleId> {
    match value {
        Value::ArrayValue(array) => array
            .values
            .iter()
            .filter_map(|entry| match entry {
                Value::StringValue(id) => Some(VehicleId::from(id.as_str())),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// The user's recently-seen vehicles, fetched as one concurrent fan-out and
/// joined into a single complete collection, still in chronological order.
///
/// Per-vehicle failures and dangling ids don't fail the whole query; they
/// are logged and the entry is dropped. The result is an immutable snapshot
/// for the pure scoring functions - no incremental accumulation.
pub async fn seen_recently(
    client: &Client<false>,
    db: &Database,
    uid: &str,
) -> anyhow::Result<Vec<Vehicle>> {
    let ids = last_seen(client, db, uid).await?;

    let fetched = future::join_all(ids.iter().map(|id| by_id(client, db, id))).await;

    let mut vehicles = Vec::with_capacity(ids.len());
    for (id, result) in ids.iter().zip(fetched) {
        match result {
            Ok(Some(vehicle)) => vehicles.push(vehicle),
            Ok(None) => warn!(vehicle = %id, "recently seen vehicle no longer exists"),
            Err(err) => warn!(vehicle = %id, error = %err, "error fetching vehicle"),
        }
    }
    Ok(vehicles)
}
