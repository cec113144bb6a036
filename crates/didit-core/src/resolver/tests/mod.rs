use pretty_assertions::assert_eq;

pub(super) use super::resolve;
pub(super) use super::ActionView;
pub(super) use super::Placeholder;
pub(super) use super::RemovedView;
pub(super) use super::Resolution;
pub(super) use super::Resolver;
pub(super) use super::SelectionRequest;
pub(super) use super::SlotView;
pub(super) use crate::config::WidgetConfig;
pub(super) use crate::keys;
pub(super) use crate::registry::RegistrySource;
pub(super) use crate::selection::instance_slots;
pub(super) use crate::store::KeyValueStore;
pub(super) use crate::store::MemoryStore;
pub(super) use crate::store::UnavailableStore;

mod removed_state;

fn config() -> WidgetConfig {
    WidgetConfig::default()
}

fn store_with_ids(ids: &str) -> MemoryStore {
    MemoryStore::from_entries([(keys::ACTION_IDS, ids)])
}

fn select(store: &MemoryStore, slot: &str, id: &str) {
    store
        .set_string(&keys::selected_id_key(slot), id)
        .expect("select");
}

fn view(id: &str, title: &str, count: u64, goal: u64, color: &str) -> ActionView {
    ActionView {
        id: id.to_string(),
        title: title.to_string(),
        count,
        goal,
        color: color.to_string(),
    }
}

fn action_ids(resolution: &Resolution) -> Vec<&str> {
    resolution
        .entries
        .iter()
        .map(SlotView::action_id)
        .collect()
}

fn run(store: &dyn KeyValueStore, request: SelectionRequest) -> Resolution {
    resolve(store, &config(), &request)
}

fn assert_single_action(resolution: &Resolution, id: &str) {
    assert_eq!(resolution.entries.len(), 1);
    let Some(SlotView::Action(view)) = resolution.primary() else {
        panic!("expected an action view, got {:?}", resolution.entries);
    };
    assert_eq!(view.id, id);
}
