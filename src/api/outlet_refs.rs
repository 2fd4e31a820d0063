use std::collections::{HashMap, HashSet};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::menu_item::MenuItem;
use crate::domain::order::Order;
use crate::domain::outlet::OutletSummary;
use crate::store::Store;

use super::error::ApiError;

// ============================================================================
// Outlet references in read responses
// ============================================================================
//
// Orders and menu items store a bare outlet id. Listings and single reads
// replace it with `{id, name, location}`, or `null` once the outlet is gone.
//
// ============================================================================

/// Records that point at an outlet.
pub trait OutletOwned {
    fn outlet_id(&self) -> Uuid;
}

impl OutletOwned for Order {
    fn outlet_id(&self) -> Uuid {
        self.outlet_id
    }
}

impl OutletOwned for MenuItem {
    fn outlet_id(&self) -> Uuid {
        self.outlet_id
    }
}

/// Serialize `records` with their `outlet` field populated, one query for all of them.
pub async fn with_outlets<T>(store: &dyn Store, records: &[T]) -> Result<Vec<Value>, ApiError>
where
    T: Serialize + OutletOwned,
{
    let ids: Vec<Uuid> = records
        .iter()
        .map(OutletOwned::outlet_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let summaries: HashMap<Uuid, OutletSummary> = if ids.is_empty() {
        HashMap::new()
    } else {
        store
            .outlet_summaries(&ids)
            .await?
            .into_iter()
            .map(|summary| (summary.id, summary))
            .collect()
    };

    records
        .iter()
        .map(|record| populate(record, summaries.get(&record.outlet_id())))
        .collect()
}

pub async fn with_outlet<T>(store: &dyn Store, record: &T) -> Result<Value, ApiError>
where
    T: Serialize + OutletOwned,
{
    let mut populated = with_outlets(store, std::slice::from_ref(record)).await?;
    populated
        .pop()
        .ok_or_else(|| ApiError::Internal("populated record missing".to_string()))
}

fn populate<T: Serialize>(record: &T, outlet: Option<&OutletSummary>) -> Result<Value, ApiError> {
    let mut value = serde_json::to_value(record).map_err(|e| ApiError::Internal(e.to_string()))?;
    let outlet = serde_json::to_value(outlet).map_err(|e| ApiError::Internal(e.to_string()))?;

    if let Value::Object(fields) = &mut value {
        fields.insert("outlet".to_string(), outlet);
    }
    Ok(value)
}
