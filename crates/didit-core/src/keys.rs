pub const ACTION_IDS: &str = "action_ids";
pub const ACTIONS_JSON: &str = "actions_json";
pub const ACTIVE_ACTION_ID: &str = "active_action_id";
pub const ACTION_STATES_V2: &str = "action_states_v2";
pub const LANGUAGE_CODE: &str = "language_code";

pub const TITLE_PREFIX: &str = "title_";
pub const COLOR_PREFIX: &str = "color_";
pub const COUNT_PREFIX: &str = "count_";
pub const GOAL_PREFIX: &str = "goal_";
pub const LAST_TAP_TIME_PREFIX: &str = "lastTapTime_";
pub const SELECTED_ID_PREFIX: &str = "selected_id_";

/// Selection value meaning "explicitly show nothing in this slot".
pub const NONE_ID: &str = "none";

pub fn title_key(id: &str) -> String {
    format!("{TITLE_PREFIX}{id}")
}

pub fn color_key(id: &str) -> String {
    format!("{COLOR_PREFIX}{id}")
}

pub fn count_key(id: &str) -> String {
    format!("{COUNT_PREFIX}{id}")
}

pub fn goal_key(id: &str) -> String {
    format!("{GOAL_PREFIX}{id}")
}

pub fn last_tap_time_key(id: &str) -> String {
    format!("{LAST_TAP_TIME_PREFIX}{id}")
}

pub fn selected_id_key(slot: &str) -> String {
    format!("{SELECTED_ID_PREFIX}{slot}")
}

/// Display title derived from a bare id: first letter of every word upper-cased,
/// the rest lower-cased. Whitespace, `_` and `-` separate words and are kept.
pub fn capitalize_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut word_start = true;
    for ch in id.chars() {
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            out.push(ch);
            word_start = true;
        } else if word_start {
            out.extend(ch.to_uppercase());
            word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Splits the comma-joined `action_ids` value, keeping order and dropping blanks.
pub fn split_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
