use didit_core::instance_slots;
use didit_core::KeyValueStore;
use didit_core::Resolution;
use didit_core::Resolver;
use didit_core::SelectionRequest;
use didit_core::WidgetConfig;

/// One kind of place the platform draws actions: home screen, list, control center.
pub trait WidgetSurface {
    fn name(&self) -> &'static str;

    fn request(&self) -> SelectionRequest;

    /// How many entries the layout can draw; `None` for scrolling lists.
    fn capacity(&self) -> Option<usize>;
}

/// Home-screen widget with up to `slot_count` independently chosen actions.
#[derive(Debug, Clone)]
pub struct HomeScreenSurface {
    pub instance: String,
    pub slot_count: usize,
}

impl HomeScreenSurface {
    pub fn new(instance: impl Into<String>, config: &WidgetConfig) -> Self {
        Self {
            instance: instance.into(),
            slot_count: config.slot_count.max(1),
        }
    }
}

impl WidgetSurface for HomeScreenSurface {
    fn name(&self) -> &'static str {
        "home"
    }

    fn request(&self) -> SelectionRequest {
        SelectionRequest::MultiSlot(instance_slots(&self.instance, self.slot_count))
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.slot_count.max(1))
    }
}

/// One action per widget instance, chosen in a configuration screen.
#[derive(Debug, Clone)]
pub struct SingleActionSurface {
    pub instance: String,
}

impl WidgetSurface for SingleActionSurface {
    fn name(&self) -> &'static str {
        "single"
    }

    fn request(&self) -> SelectionRequest {
        SelectionRequest::Selected(self.instance.clone())
    }

    fn capacity(&self) -> Option<usize> {
        Some(1)
    }
}

/// Scrolling collection showing every known action.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionListSurface;

impl WidgetSurface for ActionListSurface {
    fn name(&self) -> &'static str {
        "list"
    }

    fn request(&self) -> SelectionRequest {
        SelectionRequest::AllKnown
    }

    fn capacity(&self) -> Option<usize> {
        None
    }
}

/// Control-center button. A configured id is shown directly; otherwise the control's
/// own slot goes through the usual unconfigured fallback.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    pub slot: String,
    pub configured: Option<String>,
}

impl WidgetSurface for ControlSurface {
    fn name(&self) -> &'static str {
        "control"
    }

    fn request(&self) -> SelectionRequest {
        match &self.configured {
            Some(id) => SelectionRequest::ById(id.clone()),
            None => SelectionRequest::Selected(self.slot.clone()),
        }
    }

    fn capacity(&self) -> Option<usize> {
        Some(1)
    }
}

/// Resolves what `surface` should draw, trimmed to what its layout can hold.
pub fn resolve_surface(
    surface: &dyn WidgetSurface,
    store: &dyn KeyValueStore,
    config: &WidgetConfig,
) -> Resolution {
    let mut resolution = Resolver::new(store, config).resolve(&surface.request());
    if let Some(capacity) = surface.capacity() {
        resolution.entries.truncate(capacity);
    }
    tracing::debug!(
        surface = surface.name(),
        entries = resolution.entries.len(),
        "surface resolved"
    );
    resolution
}

#[cfg(test)]
mod tests {
    use didit_core::keys;
    use didit_core::MemoryStore;
    use didit_core::SlotView;
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(resolution: &Resolution) -> Vec<&str> {
        resolution.entries.iter().map(SlotView::action_id).collect()
    }

    #[test]
    fn home_surface_requests_every_slot() {
        let config = WidgetConfig::default();
        let surface = HomeScreenSurface::new("21", &config);
        assert_eq!(
            surface.request(),
            SelectionRequest::MultiSlot(vec![
                "21".to_string(),
                "21_2".to_string(),
                "21_3".to_string(),
                "21_4".to_string(),
            ])
        );
    }

    #[test]
    fn single_surface_truncates_to_one() {
        let config = WidgetConfig::default();
        let store = MemoryStore::from_entries([(keys::ACTION_IDS, "coffee,water")]);

        let resolution = resolve_surface(
            &SingleActionSurface {
                instance: "5".to_string(),
            },
            &store,
            &config,
        );

        assert_eq!(ids(&resolution), vec!["coffee"]);
    }

    #[test]
    fn list_surface_shows_whole_registry() {
        let config = WidgetConfig::default();
        let store = MemoryStore::from_entries([(keys::ACTION_IDS, "coffee,water,pill")]);

        let resolution = resolve_surface(&ActionListSurface, &store, &config);

        assert_eq!(ids(&resolution), vec!["coffee", "water", "pill"]);
    }

    #[test]
    fn control_surface_prefers_configured_id() {
        let config = WidgetConfig::default();
        let store = MemoryStore::from_entries([
            (keys::ACTION_IDS, "coffee,water"),
            ("title_water", "Water glass"),
        ]);
        let configured = ControlSurface {
            slot: "control".to_string(),
            configured: Some("water".to_string()),
        };
        let unconfigured = ControlSurface {
            slot: "control".to_string(),
            configured: None,
        };

        assert_eq!(ids(&resolve_surface(&configured, &store, &config)), vec!["water"]);
        assert_eq!(
            ids(&resolve_surface(&unconfigured, &store, &config)),
            vec!["coffee"]
        );
    }
}
