use serde::Deserialize;
use serde::Serialize;

use crate::config::WidgetConfig;
use crate::keys;
use crate::registry::load_registry;
use crate::store::KeyValueStore;

pub const NONE_TITLE: &str = "None";

/// One choice offered while configuring a widget slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOption {
    pub id: String,
    pub title: String,
}

impl ActionOption {
    pub fn none() -> Self {
        Self {
            id: keys::NONE_ID.to_string(),
            title: NONE_TITLE.to_string(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.id == keys::NONE_ID
    }
}

/// `none` first, then every action the resolver would recognize, in registry order.
pub fn list_options(store: &dyn KeyValueStore, config: &WidgetConfig) -> Vec<ActionOption> {
    let registry = load_registry(store, config);
    let mut options = vec![ActionOption::none()];
    options.extend(registry.actions.iter().map(|action| ActionOption {
        id: action.id.clone(),
        title: action.title.clone(),
    }));
    options
}
