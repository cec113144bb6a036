use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::color::DEFAULT_ACCENT;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub widget: WidgetConfig,
    pub store: StoreConfig,
    pub log: LogConfig,
}

/// Everything the resolver needs besides the store itself.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
    pub default_accent: String,
    pub placeholder_id: String,
    pub slot_count: usize,
    pub demo_actions: Vec<DemoAction>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            default_accent: DEFAULT_ACCENT.to_string(),
            placeholder_id: "coffee".to_string(),
            slot_count: 4,
            demo_actions: vec![
                DemoAction::new("coffee", 3),
                DemoAction::new("water", 0),
                DemoAction::new("pill", 0),
                DemoAction::new("exercise", 0),
                DemoAction::new("snack", 0),
            ],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DemoAction {
    pub id: String,
    #[serde(default)]
    pub goal: i64,
}

impl DemoAction {
    pub fn new(id: &str, goal: i64) -> Self {
        Self {
            id: id.to_string(),
            goal,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
    /// Separate file for the app-process `action_states_v2` blob.
    pub app_state_path: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
