use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Outlet Value Objects
// ============================================================================

/// A food vendor with its own menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outlet {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub timings: String,
    pub description: String,
    pub image: String,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The outlet fields embedded in order and menu item listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutletSummary {
    pub id: Uuid,
    pub name: String,
    pub location: String,
}

impl From<&Outlet> for OutletSummary {
    fn from(outlet: &Outlet) -> Self {
        Self {
            id: outlet.id,
            name: outlet.name.clone(),
            location: outlet.location.clone(),
        }
    }
}

/// Outlet categories as admin forms submit them: a JSON array or a
/// comma-separated string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CategoryList {
    List(Vec<String>),
    Joined(String),
}

impl CategoryList {
    /// Trimmed, non-empty category names in submission order.
    pub fn normalize(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            CategoryList::List(items) => items,
            CategoryList::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        };

        raw.into_iter()
            .map(|category| category.trim().to_string())
            .filter(|category| !category.is_empty())
            .collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
