use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::color::resolve_color;
use crate::config::WidgetConfig;
use crate::keys;
use crate::keys::capitalize_id;
use crate::store::KeyValueStore;

/// Base display data for one known action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: String,
    pub title: String,
    pub count: i64,
    pub goal: i64,
    pub color: String,
}

/// Where the registry came from. Tried in declaration order; first non-empty wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrySource {
    ActionsJson,
    IdList,
    ActiveId,
    TitledKeys,
    Demo,
}

impl RegistrySource {
    pub const CHAIN: [Self; 5] = [
        Self::ActionsJson,
        Self::IdList,
        Self::ActiveId,
        Self::TitledKeys,
        Self::Demo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ActionsJson => "actions_json",
            Self::IdList => "action_ids",
            Self::ActiveId => "active_action_id",
            Self::TitledKeys => "title_keys",
            Self::Demo => "demo",
        }
    }

    fn load(self, store: &dyn KeyValueStore, config: &WidgetConfig) -> Vec<ActionRecord> {
        match self {
            Self::ActionsJson => load_actions_json(store, config),
            Self::IdList => read_text(store, keys::ACTION_IDS)
                .map(|raw| keys::split_id_list(&raw))
                .unwrap_or_default()
                .iter()
                .map(|id| record_from_keys(store, id, config))
                .collect(),
            Self::ActiveId => read_text(store, keys::ACTIVE_ACTION_ID)
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty() && id != keys::NONE_ID)
                .map(|id| vec![record_from_keys(store, &id, config)])
                .unwrap_or_default(),
            Self::TitledKeys => titled_ids(store)
                .iter()
                .map(|id| record_from_keys(store, id, config))
                .collect(),
            Self::Demo => demo_actions(config),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registry {
    pub source: RegistrySource,
    pub actions: Vec<ActionRecord>,
}

impl Registry {
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&ActionRecord> {
        self.actions.iter().find(|action| action.id == id)
    }

    pub fn first(&self) -> Option<&ActionRecord> {
        self.actions.first()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.actions.iter().map(|action| action.id.as_str()).collect()
    }

    pub fn is_demo(&self) -> bool {
        self.source == RegistrySource::Demo
    }
}

/// Builds the registry from the first source that yields anything, then lets the
/// individually stored counts and goals override whatever that source embedded.
pub fn load_registry(store: &dyn KeyValueStore, config: &WidgetConfig) -> Registry {
    let (source, mut actions) = RegistrySource::CHAIN
        .iter()
        .map(|source| (*source, dedup_ids(source.load(store, config))))
        .find(|(_, actions)| !actions.is_empty())
        .unwrap_or_else(|| {
            (
                RegistrySource::Demo,
                vec![placeholder_record(&config.placeholder_id, config)],
            )
        });
    refresh_numeric_fields(store, &mut actions);
    tracing::debug!(
        source = source.label(),
        actions = actions.len(),
        "registry resolved"
    );
    Registry { source, actions }
}

/// Per-id `count_`/`goal_` keys are written by the tap path without touching the
/// JSON blob, so they win whenever present. Title and color are left alone.
pub fn refresh_numeric_fields(store: &dyn KeyValueStore, actions: &mut [ActionRecord]) {
    for action in actions.iter_mut() {
        if let Some(count) = read_integer(store, &keys::count_key(&action.id)) {
            action.count = count.max(0);
        }
        if let Some(goal) = read_integer(store, &keys::goal_key(&action.id)) {
            action.goal = goal.max(0);
        }
    }
}

/// Record for an id that is not backed by `actions_json`: per-id keys, then defaults.
pub fn record_from_keys(
    store: &dyn KeyValueStore,
    id: &str,
    config: &WidgetConfig,
) -> ActionRecord {
    let title = read_text(store, &keys::title_key(id))
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| capitalize_id(id));
    let color = resolve_color(
        read_text(store, &keys::color_key(id)).as_deref(),
        &config.default_accent,
    );
    ActionRecord {
        id: id.to_string(),
        title,
        count: 0,
        goal: 0,
        color,
    }
}

#[derive(Debug, Deserialize)]
struct SyncedAction {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    count: Option<i64>,
    #[serde(default)]
    goal: Option<i64>,
    #[serde(default)]
    color: Option<String>,
}

fn load_actions_json(store: &dyn KeyValueStore, config: &WidgetConfig) -> Vec<ActionRecord> {
    let Some(raw) = read_text(store, keys::ACTIONS_JSON) else {
        return Vec::new();
    };
    let synced = match serde_json::from_str::<Vec<SyncedAction>>(&raw) {
        Ok(synced) => synced,
        Err(err) => {
            tracing::warn!(key = keys::ACTIONS_JSON, error = %err, "ignoring malformed action list");
            return Vec::new();
        }
    };
    synced
        .into_iter()
        .filter(|action| !action.id.trim().is_empty())
        .map(|action| ActionRecord {
            title: action
                .title
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| capitalize_id(&action.id)),
            count: action.count.unwrap_or(0).max(0),
            goal: action.goal.unwrap_or(0).max(0),
            color: resolve_color(action.color.as_deref(), &config.default_accent),
            id: action.id,
        })
        .collect()
}

/// Ids left behind by an app that stored `title_<id>` but no list, in key order.
fn titled_ids(store: &dyn KeyValueStore) -> BTreeSet<String> {
    match store.keys() {
        Ok(all_keys) => all_keys
            .iter()
            .filter_map(|key| key.strip_prefix(keys::TITLE_PREFIX))
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Err(err) => {
            tracing::debug!(error = %err, "store keys unavailable for title search");
            BTreeSet::new()
        }
    }
}

fn demo_actions(config: &WidgetConfig) -> Vec<ActionRecord> {
    config
        .demo_actions
        .iter()
        .map(|demo| ActionRecord {
            goal: demo.goal.max(0),
            ..placeholder_record(&demo.id, config)
        })
        .collect()
}

fn placeholder_record(id: &str, config: &WidgetConfig) -> ActionRecord {
    ActionRecord {
        id: id.to_string(),
        title: capitalize_id(id),
        count: 0,
        goal: 0,
        color: config.default_accent.clone(),
    }
}

fn dedup_ids(actions: Vec<ActionRecord>) -> Vec<ActionRecord> {
    let mut out: Vec<ActionRecord> = Vec::with_capacity(actions.len());
    for action in actions {
        if !out.iter().any(|seen| seen.id == action.id) {
            out.push(action);
        }
    }
    out
}

/// Text read where any failure means "absent". Empty strings count as absent too.
pub(crate) fn read_text(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get_string(key) {
        Ok(value) => value.filter(|text| !text.is_empty()),
        Err(err) => {
            tracing::debug!(key, error = %err, "treating unreadable key as absent");
            None
        }
    }
}

pub(crate) fn read_integer(store: &dyn KeyValueStore, key: &str) -> Option<i64> {
    match store.get_integer(key) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(key, error = %err, "treating unreadable key as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::MemoryStore;
    use crate::store::UnavailableStore;

    fn config() -> WidgetConfig {
        WidgetConfig::default()
    }

    #[test]
    fn chain_order_is_stable() {
        let labels: Vec<&'static str> = RegistrySource::CHAIN
            .iter()
            .map(|source| source.label())
            .collect();
        assert_eq!(
            labels,
            vec![
                "actions_json",
                "action_ids",
                "active_action_id",
                "title_keys",
                "demo"
            ]
        );
    }

    #[test]
    fn json_wins_over_id_list() {
        let store = MemoryStore::from_entries([
            (
                keys::ACTIONS_JSON,
                r##"[{"id":"tea","title":"Green tea","count":2,"goal":4,"color":"#10B981"}]"##,
            ),
            (keys::ACTION_IDS, "coffee,water"),
        ]);
        let registry = load_registry(&store, &config());
        assert_eq!(registry.source, RegistrySource::ActionsJson);
        assert_eq!(
            registry.actions,
            vec![ActionRecord {
                id: "tea".to_string(),
                title: "Green tea".to_string(),
                count: 2,
                goal: 4,
                color: "#10B981".to_string(),
            }]
        );
    }

    #[test]
    fn malformed_or_empty_json_falls_through() {
        for blob in ["{not json", "[]", r#"[{"title":"no id"}]"#] {
            let store = MemoryStore::from_entries([
                (keys::ACTIONS_JSON, blob),
                (keys::ACTION_IDS, "coffee"),
            ]);
            let registry = load_registry(&store, &config());
            assert_eq!(registry.source, RegistrySource::IdList, "blob {blob}");
            assert_eq!(registry.ids(), vec!["coffee"]);
        }
    }

    #[test]
    fn id_list_uses_per_id_display_keys() {
        let store = MemoryStore::from_entries([
            (keys::ACTION_IDS, "coffee,water,coffee"),
            ("title_water", "Glass of water"),
            ("color_water", "#0EA5E9"),
            ("color_coffee", "brown"),
        ]);
        let registry = load_registry(&store, &config());
        assert_eq!(registry.ids(), vec!["coffee", "water"]);
        let coffee = registry.get("coffee").expect("coffee");
        assert_eq!(coffee.title, "Coffee");
        assert_eq!(coffee.color, "#38BDF8");
        let water = registry.get("water").expect("water");
        assert_eq!(water.title, "Glass of water");
        assert_eq!(water.color, "#0EA5E9");
    }

    #[test]
    fn active_id_is_a_singleton_registry() {
        let store = MemoryStore::from_entries([(keys::ACTIVE_ACTION_ID, "stretch")]);
        let registry = load_registry(&store, &config());
        assert_eq!(registry.source, RegistrySource::ActiveId);
        assert_eq!(registry.ids(), vec!["stretch"]);
    }

    #[test]
    fn stray_title_keys_come_before_demo() {
        let store = MemoryStore::from_entries([
            ("title_zen", "Meditate"),
            ("title_art", ""),
            ("color_zen", "#A855F7"),
            ("goal_zen", "2"),
        ]);
        let registry = load_registry(&store, &config());
        assert_eq!(registry.source, RegistrySource::TitledKeys);
        assert!(!registry.is_demo());
        assert_eq!(registry.ids(), vec!["art", "zen"]);
        assert_eq!(
            registry.get("zen"),
            Some(&ActionRecord {
                id: "zen".to_string(),
                title: "Meditate".to_string(),
                count: 0,
                goal: 2,
                color: "#A855F7".to_string(),
            })
        );
        assert_eq!(registry.get("art").map(|action| action.title.as_str()), Some("Art"));
    }

    #[test]
    fn active_id_wins_over_stray_titles() {
        let store = MemoryStore::from_entries([
            (keys::ACTIVE_ACTION_ID, "stretch"),
            ("title_zen", "Meditate"),
        ]);
        assert_eq!(load_registry(&store, &config()).ids(), vec!["stretch"]);
    }

    #[test]
    fn demo_set_only_when_nothing_is_stored() {
        let registry = load_registry(&MemoryStore::new(), &config());
        assert!(registry.is_demo());
        assert_eq!(
            registry.ids(),
            vec!["coffee", "water", "pill", "exercise", "snack"]
        );
        assert_eq!(registry.get("coffee").map(|action| action.goal), Some(3));
    }

    #[test]
    fn unavailable_store_behaves_like_empty() {
        let registry = load_registry(&UnavailableStore, &config());
        assert!(registry.is_demo());
    }

    #[test]
    fn empty_demo_config_still_yields_placeholder() {
        let mut config = config();
        config.demo_actions.clear();
        let registry = load_registry(&MemoryStore::new(), &config);
        assert_eq!(registry.ids(), vec!["coffee"]);
    }

    #[test]
    fn individual_keys_override_embedded_numbers_only() {
        let store = MemoryStore::from_entries([
            (
                keys::ACTIONS_JSON,
                r##"[{"id":"x","title":"X","count":5,"goal":1,"color":"#FFF"}]"##,
            ),
            ("title_x", "Ignored"),
            ("color_x", "#000"),
        ]);
        store.set_integer("count_x", 9).expect("set");
        store.set_integer("goal_x", -4).expect("set");
        let registry = load_registry(&store, &config());
        let x = registry.get("x").expect("x");
        assert_eq!(x.count, 9);
        assert_eq!(x.goal, 0);
        assert_eq!(x.title, "X");
        assert_eq!(x.color, "#FFF");
    }

    #[test]
    fn non_numeric_count_key_keeps_source_value() {
        let store = MemoryStore::from_entries([
            (keys::ACTIONS_JSON, r#"[{"id":"x","count":5}]"#),
            ("count_x", "lots"),
        ]);
        let registry = load_registry(&store, &config());
        assert_eq!(registry.get("x").map(|action| action.count), Some(5));
    }
}
