use didit_core::IncrementOutcome;
use serde::Deserialize;
use serde::Serialize;

pub const TAP_SCHEME: &str = "didit";
pub const INCREMENT_ROUTE: &str = "increment";

/// A tap delivered by the rendering layer, usually as `didit://increment?id=<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapRequest {
    pub action_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct TapQuery {
    id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TapParseError {
    #[error("not a didit:// link: {0}")]
    Scheme(String),
    #[error("unsupported tap route: {0}")]
    Route(String),
    #[error("malformed tap query: {0}")]
    Query(String),
    #[error("tap link carries no action id")]
    MissingId,
}

impl TapRequest {
    pub fn new(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
        }
    }

    pub fn parse(uri: &str) -> Result<Self, TapParseError> {
        let uri = uri.trim();
        let Some(rest) = uri
            .split_once("://")
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(TAP_SCHEME))
            .map(|(_, rest)| rest)
        else {
            return Err(TapParseError::Scheme(uri.to_string()));
        };
        let (route, query) = rest.split_once('?').unwrap_or((rest, ""));
        let route = route.trim_end_matches('/');
        if !route.eq_ignore_ascii_case(INCREMENT_ROUTE) {
            return Err(TapParseError::Route(route.to_string()));
        }
        let query = serde_urlencoded::from_str::<TapQuery>(query)
            .map_err(|err| TapParseError::Query(err.to_string()))?;
        match query.id.map(|id| id.trim().to_string()) {
            Some(id) if !id.is_empty() => Ok(Self::new(id)),
            _ => Err(TapParseError::MissingId),
        }
    }

    pub fn to_uri(&self) -> String {
        let query = serde_urlencoded::to_string(TapQuery {
            id: Some(self.action_id.clone()),
        })
        .unwrap_or_else(|_| format!("id={}", self.action_id));
        format!("{TAP_SCHEME}://{INCREMENT_ROUTE}?{query}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapStatus {
    Accepted,
    Simulated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapResult {
    pub action_id: String,
    pub status: TapStatus,
    pub count: u64,
    pub outcome: Option<IncrementOutcome>,
}
