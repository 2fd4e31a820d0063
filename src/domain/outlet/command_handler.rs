use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::menu_item::MenuItem;
use crate::domain::{required_text, DEFAULT_IMAGE};
use crate::store::{MenuItemFilter, Store, StoreError};

use super::commands::{CreateOutlet, UpdateOutlet};
use super::errors::OutletError;
use super::value_objects::Outlet;

// ============================================================================
// Outlet Command Handler
// ============================================================================
//
// Orchestrates: Command → Validation → Store
//
// ============================================================================

#[derive(Clone)]
pub struct OutletCommandHandler {
    store: Arc<dyn Store>,
}

impl OutletCommandHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// All outlets ordered by name.
    pub async fn list(&self) -> Result<Vec<Outlet>, OutletError> {
        Ok(self.store.list_outlets().await?)
    }

    /// An outlet together with every menu item it owns.
    pub async fn get_with_menu(&self, id: Uuid) -> Result<(Outlet, Vec<MenuItem>), OutletError> {
        let outlet = self.store.get_outlet(id).await?.ok_or(OutletError::NotFound(id))?;

        let filter = MenuItemFilter {
            outlet_id: Some(id),
            ..MenuItemFilter::default()
        };
        let menu_items = self.store.list_menu_items(&filter).await?;

        Ok((outlet, menu_items))
    }

    pub async fn create(&self, command: CreateOutlet) -> Result<Outlet, OutletError> {
        let now = Utc::now();
        let outlet = Outlet {
            id: Uuid::new_v4(),
            name: required_text(&command.name, || OutletError::EmptyName)?,
            location: required_text(&command.location, || OutletError::EmptyLocation)?,
            timings: required_text(&command.timings, || OutletError::EmptyTimings)?,
            description: command.description.unwrap_or_default(),
            image: command.image.unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            categories: command.categories.map(|c| c.normalize()).unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        self.store
            .insert_outlet(&outlet)
            .await
            .map_err(|e| duplicate_name(e, &outlet.name))?;

        tracing::info!(outlet_id = %outlet.id, name = %outlet.name, "✅ Outlet created");
        Ok(outlet)
    }

    pub async fn update(&self, id: Uuid, command: UpdateOutlet) -> Result<Outlet, OutletError> {
        let mut outlet = self.store.get_outlet(id).await?.ok_or(OutletError::NotFound(id))?;

        if let Some(name) = command.name {
            outlet.name = required_text(&name, || OutletError::EmptyName)?;
        }
        if let Some(location) = command.location {
            outlet.location = required_text(&location, || OutletError::EmptyLocation)?;
        }
        if let Some(timings) = command.timings {
            outlet.timings = required_text(&timings, || OutletError::EmptyTimings)?;
        }
        if let Some(description) = command.description {
            outlet.description = description;
        }
        if let Some(image) = command.image {
            outlet.image = image;
        }
        if let Some(categories) = command.categories {
            outlet.categories = categories.normalize();
        }
        outlet.updated_at = Utc::now();

        let updated = self
            .store
            .update_outlet(&outlet)
            .await
            .map_err(|e| duplicate_name(e, &outlet.name))?;
        if !updated {
            return Err(OutletError::NotFound(id));
        }

        tracing::info!(outlet_id = %id, "Outlet updated");
        Ok(outlet)
    }

    /// Delete an outlet and cascade to its menu items.
    /// Returns the number of menu items removed alongside it.
    pub async fn delete(&self, id: Uuid) -> Result<u64, OutletError> {
        let removed_items = self
            .store
            .delete_outlet(id)
            .await?
            .ok_or(OutletError::NotFound(id))?;

        tracing::info!(
            outlet_id = %id,
            removed_menu_items = removed_items,
            "Outlet deleted"
        );
        Ok(removed_items)
    }
}

fn duplicate_name(err: StoreError, name: &str) -> OutletError {
    match err {
        StoreError::UniqueViolation(_) => OutletError::DuplicateName(name.to_string()),
        other => OutletError::Store(other),
    }
}
