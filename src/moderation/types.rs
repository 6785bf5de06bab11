use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Actor, ActorStatus};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActorsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_status: Option<ActorStatus>,
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cursor: String,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActorsResponse {
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub cursor: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetActorRequest {
    pub did: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetActorResponse {
    pub actor: Option<Actor>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetApprovalQueueRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetApprovalQueueResponse {
    pub queue_entry: Option<Actor>,
    #[serde(default)]
    pub queue_entries_remaining: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApprovalQueueAction {
    #[serde(rename = "APPROVAL_QUEUE_ACTION_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "APPROVAL_QUEUE_ACTION_APPROVE")]
    Approve,
    #[serde(rename = "APPROVAL_QUEUE_ACTION_REJECT")]
    Reject,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessApprovalQueueRequest {
    pub did: String,
    pub action: ApprovalQueueAction,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessApprovalQueueResponse {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldBackPendingActorRequest {
    pub did: String,
    /// ConnectRPC JSON encoding of a protobuf Duration, e.g. "86400s".
    pub duration: String,
}

impl HoldBackPendingActorRequest {
    pub fn for_seconds(did: impl Into<String>, seconds: u64) -> Self {
        Self {
            did: did.into(),
            duration: format!("{seconds}s"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldBackPendingActorResponse {
    pub actor: Option<Actor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BanActorRequest {
    pub did: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BanActorResponse {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceApproveActorRequest {
    pub did: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForceApproveActorResponse {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentAuditEventRequest {
    pub subject_did: String,
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentAuditEventResponse {
    pub audit_event: Option<AuditEvent>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditEventsRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_subject_did: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cursor: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditEventsResponse {
    #[serde(default)]
    pub audit_events: Vec<AuditEvent>,
    #[serde(default)]
    pub cursor: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: String,
    pub actor_did: String,
    pub subject_did: String,
    #[serde(default)]
    pub comment: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListRolesRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRolesResponse {
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}
