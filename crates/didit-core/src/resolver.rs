use serde::Deserialize;
use serde::Serialize;

use crate::color::NEUTRAL_COLOR;
use crate::config::WidgetConfig;
use crate::keys;
use crate::locale::resolve_language;
use crate::registry::load_registry;
use crate::registry::read_text;
use crate::registry::record_from_keys;
use crate::registry::refresh_numeric_fields;
use crate::registry::ActionRecord;
use crate::registry::Registry;
use crate::registry::RegistrySource;
use crate::selection::read_selection;
use crate::selection::SlotSelection;
use crate::store::KeyValueStore;

pub const REMOVED_MESSAGE: &str = "Removed";
pub const SETUP_REQUIRED_MESSAGE: &str = "Setup Required";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum SelectionRequest {
    AllKnown,
    ById(String),
    Selected(String),
    MultiSlot(Vec<String>),
}

/// Default-filled action ready for the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionView {
    pub id: String,
    pub title: String,
    pub count: u64,
    pub goal: u64,
    pub color: String,
}

impl ActionView {
    pub fn has_goal(&self) -> bool {
        self.goal > 0
    }
}

impl From<&ActionRecord> for ActionView {
    fn from(record: &ActionRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            count: u64::try_from(record.count).unwrap_or(0),
            goal: u64::try_from(record.goal).unwrap_or(0),
            color: record.color.clone(),
        }
    }
}

/// Terminal state for a slot whose selected action no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedView {
    pub slot: String,
    pub id: String,
    pub message: String,
    pub color: String,
}

impl RemovedView {
    fn new(slot: &str, id: &str) -> Self {
        Self {
            slot: slot.to_string(),
            id: id.to_string(),
            message: REMOVED_MESSAGE.to_string(),
            color: NEUTRAL_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotView {
    Action(ActionView),
    Removed(RemovedView),
}

impl SlotView {
    /// Removed slots offer no increment.
    pub fn tappable(&self) -> bool {
        matches!(self, Self::Action(_))
    }

    pub fn action_id(&self) -> &str {
        match self {
            Self::Action(view) => &view.id,
            Self::Removed(view) => &view.id,
        }
    }

    pub fn as_action(&self) -> Option<&ActionView> {
        match self {
            Self::Action(view) => Some(view),
            Self::Removed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    SetupRequired,
}

impl Placeholder {
    pub fn label(self) -> &'static str {
        match self {
            Self::SetupRequired => SETUP_REQUIRED_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub source: RegistrySource,
    pub language: String,
    pub entries: Vec<SlotView>,
}

impl Resolution {
    /// Shown instead of entries when every slot is explicitly empty.
    pub fn placeholder(&self) -> Option<Placeholder> {
        self.entries
            .is_empty()
            .then_some(Placeholder::SetupRequired)
    }

    /// The view a single-action layout draws.
    pub fn primary(&self) -> Option<&SlotView> {
        self.entries.first()
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionView> {
        self.entries.iter().filter_map(SlotView::as_action)
    }
}

/// Reads the shared store and turns a selection request into renderable views.
pub struct Resolver<'a> {
    store: &'a dyn KeyValueStore,
    config: &'a WidgetConfig,
    system_locale: Option<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a dyn KeyValueStore, config: &'a WidgetConfig) -> Self {
        Self {
            store,
            config,
            system_locale: None,
        }
    }

    pub fn with_system_locale(mut self, locale: impl Into<String>) -> Self {
        self.system_locale = Some(locale.into());
        self
    }

    pub fn registry(&self) -> Registry {
        load_registry(self.store, self.config)
    }

    pub fn resolve(&self, request: &SelectionRequest) -> Resolution {
        let registry = self.registry();
        let entries = match request {
            SelectionRequest::AllKnown => registry
                .actions
                .iter()
                .map(|record| SlotView::Action(record.into()))
                .collect(),
            SelectionRequest::ById(id) => vec![SlotView::Action(self.view_by_id(&registry, id))],
            SelectionRequest::Selected(slot) => {
                self.resolve_slot(&registry, slot, true).into_iter().collect()
            }
            SelectionRequest::MultiSlot(slots) => slots
                .iter()
                .enumerate()
                .filter_map(|(index, slot)| self.resolve_slot(&registry, slot, index == 0))
                .collect(),
        };
        Resolution {
            source: registry.source,
            language: resolve_language(self.store, self.system_locale.as_deref()),
            entries,
        }
    }

    fn resolve_slot(
        &self,
        registry: &Registry,
        slot: &str,
        governs_fallback: bool,
    ) -> Option<SlotView> {
        match read_selection(self.store, slot) {
            SlotSelection::Unset if governs_fallback => {
                Some(SlotView::Action(self.fallback_view(registry)))
            }
            SlotSelection::Unset | SlotSelection::Nothing => None,
            SlotSelection::Action(id) => match registry.get(&id) {
                Some(record) => Some(SlotView::Action(record.into())),
                None => {
                    tracing::debug!(slot, id = %id, "selected action is gone");
                    Some(SlotView::Removed(RemovedView::new(slot, &id)))
                }
            },
        }
    }

    /// Active action, then first registry entry, then the placeholder id.
    fn fallback_view(&self, registry: &Registry) -> ActionView {
        let active = read_text(self.store, keys::ACTIVE_ACTION_ID);
        let chosen = active
            .as_deref()
            .and_then(|id| registry.get(id.trim()))
            .or_else(|| registry.first());
        match chosen {
            Some(record) => record.into(),
            None => self.view_by_id(registry, &self.config.placeholder_id),
        }
    }

    fn view_by_id(&self, registry: &Registry, id: &str) -> ActionView {
        if let Some(record) = registry.get(id) {
            return record.into();
        }
        let mut records = [record_from_keys(self.store, id, self.config)];
        refresh_numeric_fields(self.store, &mut records);
        (&records[0]).into()
    }
}

/// One-shot form of [`Resolver::resolve`].
pub fn resolve(
    store: &dyn KeyValueStore,
    config: &WidgetConfig,
    request: &SelectionRequest,
) -> Resolution {
    Resolver::new(store, config).resolve(request)
}

#[cfg(test)]
mod tests;
