use serde::Deserialize;
use serde::Serialize;

use crate::error::StoreResult;
use crate::keys;
use crate::registry::read_text;
use crate::store::KeyValueStore;

/// What the user picked for one slot of one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SlotSelection {
    /// Never configured.
    Unset,
    /// Explicitly configured to show nothing.
    Nothing,
    Action(String),
}

impl SlotSelection {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Unset,
            Some(keys::NONE_ID) => Self::Nothing,
            Some(id) => Self::Action(id.to_string()),
        }
    }

    pub fn stored_value(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::Nothing => Some(keys::NONE_ID),
            Self::Action(id) => Some(id.as_str()),
        }
    }
}

pub fn read_selection(store: &dyn KeyValueStore, slot: &str) -> SlotSelection {
    SlotSelection::parse(read_text(store, &keys::selected_id_key(slot)).as_deref())
}

/// Persists a configuration choice; `Unset` clears the key.
pub fn select_action(
    store: &dyn KeyValueStore,
    slot: &str,
    selection: &SlotSelection,
) -> StoreResult<()> {
    let key = keys::selected_id_key(slot);
    match selection.stored_value() {
        Some(value) => store.set_string(&key, value),
        None => store.remove(&key),
    }
}

/// Slot ids of a multi-slot instance: the instance id itself, then `<instance>_2`…
pub fn instance_slots(instance: &str, slot_count: usize) -> Vec<String> {
    (1..=slot_count.max(1))
        .map(|index| {
            if index == 1 {
                instance.to_string()
            } else {
                format!("{instance}_{index}")
            }
        })
        .collect()
}
