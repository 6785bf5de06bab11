use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActorStatus {
    #[default]
    #[serde(rename = "ACTOR_STATUS_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "ACTOR_STATUS_PENDING")]
    Pending,
    #[serde(rename = "ACTOR_STATUS_APPROVED")]
    Approved,
    #[serde(rename = "ACTOR_STATUS_BANNED")]
    Banned,
    #[serde(rename = "ACTOR_STATUS_NONE")]
    None,
    #[serde(rename = "ACTOR_STATUS_OPTED_OUT")]
    OptedOut,
    #[serde(rename = "ACTOR_STATUS_REJECTED")]
    Rejected,
}

/// A moderated account, keyed by DID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub did: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub status: ActorStatus,
    #[serde(default)]
    pub roles: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// While in the future, suppresses the actor from the active queue.
    pub held_until: Option<DateTime<Utc>>,
}
