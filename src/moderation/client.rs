use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ModerationConfig;

use super::types::*;

const SERVICE_PATH: &str = "bff.v1.ModerationService";

/// Unary JSON client for the bff ModerationService.
#[derive(Clone)]
pub struct ModerationClient {
    http: Client,
    config: ModerationConfig,
}

impl ModerationClient {
    pub fn new(http: Client, config: ModerationConfig) -> Self {
        Self { http, config }
    }

    async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{}/{}", self.config.base_url, SERVICE_PATH, method);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.auth_token)
            .json(request)
            .send()
            .await
            .with_context(|| format!("{method} request failed"))?
            .error_for_status()
            .with_context(|| format!("{method} returned an error status"))?;

        let body = response
            .bytes()
            .await
            .with_context(|| format!("failed to read {method} response body"))?;
        serde_json::from_slice(&body).with_context(|| format!("failed to decode {method} response"))
    }

    pub async fn list_actors(&self, request: &ListActorsRequest) -> Result<ListActorsResponse> {
        self.call("ListActors", request).await
    }

    pub async fn get_actor(&self, did: &str) -> Result<GetActorResponse> {
        self.call(
            "GetActor",
            &GetActorRequest {
                did: did.to_string(),
            },
        )
        .await
    }

    pub async fn get_approval_queue(&self) -> Result<GetApprovalQueueResponse> {
        self.call("GetApprovalQueue", &GetApprovalQueueRequest::default())
            .await
    }

    pub async fn process_approval_queue(
        &self,
        request: &ProcessApprovalQueueRequest,
    ) -> Result<ProcessApprovalQueueResponse> {
        self.call("ProcessApprovalQueue", request).await
    }

    pub async fn hold_back_pending_actor(
        &self,
        request: &HoldBackPendingActorRequest,
    ) -> Result<HoldBackPendingActorResponse> {
        self.call("HoldBackPendingActor", request).await
    }

    pub async fn ban_actor(&self, request: &BanActorRequest) -> Result<BanActorResponse> {
        self.call("BanActor", request).await
    }

    pub async fn force_approve_actor(&self, did: &str) -> Result<ForceApproveActorResponse> {
        self.call(
            "ForceApproveActor",
            &ForceApproveActorRequest {
                did: did.to_string(),
            },
        )
        .await
    }

    pub async fn create_comment_audit_event(
        &self,
        request: &CreateCommentAuditEventRequest,
    ) -> Result<CreateCommentAuditEventResponse> {
        self.call("CreateCommentAuditEvent", request).await
    }

    pub async fn list_audit_events(
        &self,
        request: &ListAuditEventsRequest,
    ) -> Result<ListAuditEventsResponse> {
        self.call("ListAuditEvents", request).await
    }

    pub async fn list_roles(&self) -> Result<ListRolesResponse> {
        self.call("ListRoles", &ListRolesRequest::default()).await
    }
}
