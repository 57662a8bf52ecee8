/// Tools for the daily self-care checklist
///
/// This module implements the selfcare_add, selfcare_toggle, selfcare_list
/// and selfcare_delete MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::changes::CollectionRecord;
use crate::domain::{DateKey, SelfCareItem, SelfCareProgress};
use crate::storage::{SelfCareStore, StorageError};
use crate::tools::{date_or_today, parse_record_id};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddSelfCareParams {
    #[schemars(description = "The checklist line, e.g. 'Drank 8 glasses of water'")]
    pub item: String,
    #[schemars(description = "Group such as 'physical' or 'mental' (default 'general')")]
    pub category: Option<String>,
    #[schemars(description = "Day as YYYY-MM-DD (default today)")]
    pub date: Option<String>,
    #[schemars(description = "Add the item already ticked off (default false)")]
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SelfCareResponse {
    pub success: bool,
    pub item: SelfCareItem,
    pub message: String,
}

pub fn selfcare_add<S: SelfCareStore>(
    storage: &S,
    params: AddSelfCareParams,
    today: DateKey,
) -> Result<SelfCareResponse, StorageError> {
    let date = date_or_today(params.date.as_deref(), today)?;
    let mut item = SelfCareItem::new(date, params.category.as_deref(), &params.item)?;
    item.completed = params.completed.unwrap_or(false);
    let item = storage.create_self_care(item)?;

    let message = format!("💖 Added '{}' to the {} checklist for {}", item.item, item.category, item.date);
    Ok(SelfCareResponse { success: true, item, message })
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SelfCareIdParams {
    #[schemars(description = "ID of the self-care item")]
    pub item_id: String,
}

/// Tick an item off, or untick it
pub fn selfcare_toggle<S: SelfCareStore>(
    storage: &S,
    params: SelfCareIdParams,
) -> Result<SelfCareResponse, StorageError> {
    let id = parse_record_id("Self-care item ID", &params.item_id)?;
    let mut item = storage
        .get_self_care(&id)?
        .ok_or_else(|| StorageError::not_found(SelfCareItem::COLLECTION, &id))?;

    item.completed = !item.completed;
    let item = storage.update_self_care(&item)?;

    let message = if item.completed {
        format!("✅ Took care of: {}", item.item)
    } else {
        format!("Unchecked: {}", item.item)
    };
    Ok(SelfCareResponse { success: true, item, message })
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListSelfCareParams {
    #[schemars(description = "Day as YYYY-MM-DD (default today)")]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListSelfCareResponse {
    pub success: bool,
    pub date: DateKey,
    pub items: Vec<SelfCareItem>,
    pub progress: SelfCareProgress,
    pub message: String,
}

/// The checklist of one day, grouped by category
pub fn selfcare_list<S: SelfCareStore>(
    storage: &S,
    params: ListSelfCareParams,
    today: DateKey,
) -> Result<ListSelfCareResponse, StorageError> {
    let date = date_or_today(params.date.as_deref(), today)?;
    let items = storage.self_care_by_date(date)?;
    let progress = SelfCareProgress::of(&items);

    let message = if progress.total == 0 {
        format!("No self-care items for {}", date)
    } else if progress.completed == progress.total {
        format!("👑 All {} self-care items done!", progress.total)
    } else {
        format!("{} of {} self-care items done ({}%)", progress.completed, progress.total, progress.percent)
    };
    Ok(ListSelfCareResponse { success: true, date, items, progress, message })
}

#[derive(Debug, Serialize)]
pub struct DeleteSelfCareResponse {
    pub success: bool,
    pub message: String,
}

pub fn selfcare_delete<S: SelfCareStore>(
    storage: &S,
    params: SelfCareIdParams,
) -> Result<DeleteSelfCareResponse, StorageError> {
    let id = parse_record_id("Self-care item ID", &params.item_id)?;
    storage.delete_self_care(&id)?;
    Ok(DeleteSelfCareResponse { success: true, message: "🗑️ Self-care item removed".to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    fn today() -> DateKey {
        "2025-06-03".parse().unwrap()
    }

    fn add(storage: &SqliteStorage, item: &str, category: &str) -> SelfCareItem {
        let params = AddSelfCareParams {
            item: item.to_string(),
            category: Some(category.to_string()),
            date: None,
            completed: None,
        };
        selfcare_add(storage, params, today()).unwrap().item
    }

    #[test]
    fn test_add_toggle_list() {
        let storage = SqliteStorage::in_memory().unwrap();
        let water = add(&storage, "Drank 8 glasses of water", "physical");
        add(&storage, "Listened to music", "mental");

        let toggled = selfcare_toggle(&storage, SelfCareIdParams { item_id: water.id.to_string() }).unwrap();
        assert!(toggled.item.completed);

        let listed = selfcare_list(&storage, ListSelfCareParams::default(), today()).unwrap();
        assert_eq!(listed.items[0].category, "mental");
        assert_eq!(listed.progress.completed, 1);
        assert_eq!(listed.progress.total, 2);
        assert_eq!(listed.progress.percent, 50);

        let untoggled = selfcare_toggle(&storage, SelfCareIdParams { item_id: water.id.to_string() }).unwrap();
        assert!(!untoggled.item.completed);
    }

    #[test]
    fn test_list_other_day_is_empty() {
        let storage = SqliteStorage::in_memory().unwrap();
        add(&storage, "Got some sunlight", "physical");

        let params = ListSelfCareParams { date: Some("2025-06-02".to_string()) };
        let listed = selfcare_list(&storage, params, today()).unwrap();
        assert!(listed.items.is_empty());
        assert_eq!(listed.progress.percent, 0);
    }

    #[test]
    fn test_bad_ids_and_delete() {
        let storage = SqliteStorage::in_memory().unwrap();
        let bad = selfcare_toggle(&storage, SelfCareIdParams { item_id: "nope".to_string() });
        assert!(matches!(bad, Err(StorageError::Domain(_))));

        let item = add(&storage, "Got enough rest", "physical");
        selfcare_delete(&storage, SelfCareIdParams { item_id: item.id.to_string() }).unwrap();
        let again = selfcare_delete(&storage, SelfCareIdParams { item_id: item.id.to_string() });
        assert!(matches!(again, Err(StorageError::NotFound { .. })));
    }
}
