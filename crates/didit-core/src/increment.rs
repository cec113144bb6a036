use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::keys;
use crate::store::KeyValueStore;

/// Payload-free broadcast asking the rendering layer to redraw every widget instance.
/// Must be safe to call redundantly.
pub trait ReloadSignal {
    fn reload_all(&self);
}

/// Adapts a plain callback into a [`ReloadSignal`].
pub struct CallbackReload<F>(pub F);

impl<F: Fn()> ReloadSignal for CallbackReload<F> {
    fn reload_all(&self) {
        (self.0)()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlobUpdate {
    Updated,
    /// Blob exists but does not track this id.
    MissingEntry,
    Absent,
    Failed,
}

impl BlobUpdate {
    pub fn label(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::MissingEntry => "missing-entry",
            Self::Absent => "absent",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementOutcome {
    pub id: String,
    pub count: u64,
    pub tapped_at: String,
    pub count_written: bool,
    pub tap_time_written: bool,
    pub blob: BlobUpdate,
}

/// Where a tap writes. The `action_states_v2` blob may live in a store private to the
/// app process; without one it is looked up in the shared store.
pub struct IncrementTarget<'a> {
    pub shared: &'a dyn KeyValueStore,
    pub app_state: Option<&'a dyn KeyValueStore>,
}

impl<'a> IncrementTarget<'a> {
    pub fn shared(shared: &'a dyn KeyValueStore) -> Self {
        Self {
            shared,
            app_state: None,
        }
    }

    pub fn with_app_state(mut self, app_state: &'a dyn KeyValueStore) -> Self {
        self.app_state = Some(app_state);
        self
    }
}

pub fn increment(
    target: &IncrementTarget<'_>,
    signal: &dyn ReloadSignal,
    id: &str,
) -> IncrementOutcome {
    increment_at(target, signal, id, Utc::now())
}

/// Best-effort tap: bump `count_<id>`, stamp `lastTapTime_<id>`, patch the state blob,
/// then always signal a full reload. A failing step is logged and skipped.
pub fn increment_at(
    target: &IncrementTarget<'_>,
    signal: &dyn ReloadSignal,
    id: &str,
    now: DateTime<Utc>,
) -> IncrementOutcome {
    let store = target.shared;
    let count_key = keys::count_key(id);
    let current = match store.get_integer(&count_key) {
        Ok(value) => value.unwrap_or(0),
        Err(err) => {
            tracing::warn!(key = %count_key, error = %err, "unreadable count, restarting from zero");
            0
        }
    };
    let next = current.max(0).saturating_add(1);
    let count_written = match store.set_integer(&count_key, next) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(key = %count_key, error = %err, "count write failed");
            false
        }
    };

    let tapped_at = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let tap_key = keys::last_tap_time_key(id);
    let tap_time_written = match store.set_string(&tap_key, &tapped_at) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(key = %tap_key, error = %err, "tap time write failed");
            false
        }
    };

    let blob = update_state_blob(
        target.app_state.unwrap_or(store),
        id,
        count_written.then_some(next),
        tap_time_written.then_some(tapped_at.as_str()),
    );

    signal.reload_all();
    tracing::info!(
        id,
        count = next,
        blob = blob.label(),
        "action incremented"
    );

    IncrementOutcome {
        id: id.to_string(),
        count: u64::try_from(next).unwrap_or(0),
        tapped_at,
        count_written,
        tap_time_written,
        blob,
    }
}

/// Mirrors only the fields whose individual keys were actually written.
fn update_state_blob(
    store: &dyn KeyValueStore,
    id: &str,
    count: Option<i64>,
    tapped_at: Option<&str>,
) -> BlobUpdate {
    let raw = match store.get_string(keys::ACTION_STATES_V2) {
        Ok(Some(raw)) => raw,
        Ok(None) => return BlobUpdate::Absent,
        Err(err) => {
            tracing::warn!(key = keys::ACTION_STATES_V2, error = %err, "state blob unreadable");
            return BlobUpdate::Failed;
        }
    };
    let mut states = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(states)) => states,
        Ok(_) => {
            tracing::warn!(key = keys::ACTION_STATES_V2, "state blob is not an object");
            return BlobUpdate::Failed;
        }
        Err(err) => {
            tracing::warn!(key = keys::ACTION_STATES_V2, error = %err, "state blob is malformed");
            return BlobUpdate::Failed;
        }
    };
    match states.get_mut(id) {
        None => return BlobUpdate::MissingEntry,
        Some(Value::Object(_)) if count.is_none() && tapped_at.is_none() => {
            tracing::warn!(key = keys::ACTION_STATES_V2, id, "nothing recorded, state entry left alone");
            return BlobUpdate::Failed;
        }
        Some(Value::Object(entry)) => {
            if let Some(count) = count {
                entry.insert("count".to_string(), Value::from(count));
            }
            if let Some(tapped_at) = tapped_at {
                entry.insert("lastTapTime".to_string(), Value::from(tapped_at));
            }
        }
        Some(_) => {
            tracing::warn!(key = keys::ACTION_STATES_V2, id, "state entry is not an object");
            return BlobUpdate::Failed;
        }
    }
    let encoded = match serde_json::to_string(&Value::Object(states)) {
        Ok(encoded) => encoded,
        Err(err) => {
            tracing::warn!(key = keys::ACTION_STATES_V2, error = %err, "state blob encode failed");
            return BlobUpdate::Failed;
        }
    };
    match store.set_string(keys::ACTION_STATES_V2, &encoded) {
        Ok(()) => BlobUpdate::Updated,
        Err(err) => {
            tracing::warn!(key = keys::ACTION_STATES_V2, error = %err, "state blob write failed");
            BlobUpdate::Failed
        }
    }
}
