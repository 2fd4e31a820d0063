use serde::Deserialize;

use super::value_objects::CategoryList;

// ============================================================================
// Outlet Commands - Represent admin intent
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOutlet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub timings: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub categories: Option<CategoryList>,
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOutlet {
    pub name: Option<String>,
    pub location: Option<String>,
    pub timings: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub categories: Option<CategoryList>,
}
