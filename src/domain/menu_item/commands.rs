use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

// ============================================================================
// Menu Item Commands
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItem {
    #[serde(default)]
    pub name: String,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub outlet: Option<Uuid>,
    pub is_available: Option<bool>,
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItem {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub outlet: Option<Uuid>,
    pub is_available: Option<bool>,
}

/// Listing filters. `outlet` accepts an outlet id or an outlet name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemQuery {
    pub outlet: Option<String>,
    pub category: Option<String>,
    pub limit: Option<String>,
}

impl MenuItemQuery {
    /// Positive limits only; anything else means "no limit".
    pub fn parsed_limit(&self) -> Option<usize> {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: &str) -> MenuItemQuery {
        MenuItemQuery {
            limit: Some(limit.to_string()),
            ..MenuItemQuery::default()
        }
    }

    #[test]
    fn test_limit_parsing() {
        assert_eq!(query("5").parsed_limit(), Some(5));
        assert_eq!(query("0").parsed_limit(), None);
        assert_eq!(query("-3").parsed_limit(), None);
        assert_eq!(query("many").parsed_limit(), None);
        assert_eq!(MenuItemQuery::default().parsed_limit(), None);
    }

    #[test]
    fn test_create_reads_camel_case_fields() {
        let outlet = Uuid::new_v4();
        let json = format!(r#"{{"name": "Burger", "price": 100, "outlet": "{outlet}", "isAvailable": false}}"#);
        let command: CreateMenuItem = serde_json::from_str(&json).unwrap();

        assert_eq!(command.price, Some(Decimal::from(100)));
        assert_eq!(command.outlet, Some(outlet));
        assert_eq!(command.is_available, Some(false));
    }
}
