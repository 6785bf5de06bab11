use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use reqwest::Client;

use crate::{
    bsky::{AppViewClient, ProfileBatchFetcher},
    config::AppConfig,
    domain::{Actor, ActorStatus, ProfileView},
    infrastructure::shutdown::Shutdown,
    moderation::{types::ListActorsRequest, ModerationClient},
    triage::queues::{categorize_all, QueueCategory},
};

pub struct TriageApp {
    config: Arc<AppConfig>,
    moderation: ModerationClient,
    fetcher: ProfileBatchFetcher,
    shutdown: Shutdown,
}

impl TriageApp {
    pub fn initialize(config: AppConfig, shutdown: Shutdown) -> Result<Self> {
        let config = Arc::new(config);

        let http_client = Client::builder()
            .user_agent(format!("bff-triage/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let appview = AppViewClient::new(http_client.clone(), config.appview.clone());
        let fetcher = ProfileBatchFetcher::new(Arc::new(appview));
        let moderation = ModerationClient::new(http_client, config.moderation.clone());

        Ok(Self {
            config,
            moderation,
            fetcher,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let mut listener = self.shutdown.subscribe();

        loop {
            if listener.is_triggered() {
                break;
            }

            if let Err(err) = self.run_pass().await {
                tracing::error!(target: "triage", error = %err, "triage pass failed");
            }

            match self.config.triage.interval {
                Some(interval) => {
                    tokio::select! {
                        _ = tokio::time::sleep(interval) => {}
                        _ = listener.notified() => break,
                    }
                }
                None => break,
            }
        }

        tracing::info!(target: "triage", "triage run complete");
        Ok(())
    }

    async fn run_pass(&self) -> Result<()> {
        let actors = self.pending_actors().await?;
        tracing::info!(target: "triage", total = actors.len(), "fetched pending actors");

        let profiles = self.fetch_profiles(&actors).await;
        let buckets = categorize_all(&actors, &profiles);

        for category in QueueCategory::ALL {
            let members = &buckets[&category];
            tracing::info!(
                target: "triage",
                queue = %category,
                count = members.len(),
                "queue populated"
            );
            for actor in members {
                tracing::debug!(target: "triage", queue = %category, did = %actor.did);
            }
        }

        Ok(())
    }

    async fn pending_actors(&self) -> Result<Vec<Actor>> {
        let mut actors = Vec::new();
        let mut cursor = String::new();

        loop {
            let response = self
                .moderation
                .list_actors(&ListActorsRequest {
                    filter_status: Some(ActorStatus::Pending),
                    limit: self.config.triage.page_size,
                    cursor: cursor.clone(),
                })
                .await
                .context("failed to list pending actors")?;

            actors.extend(response.actors);
            if response.cursor.is_empty() {
                break;
            }
            cursor = response.cursor;
        }

        Ok(actors)
    }

    // Fetch errors degrade that actor to "no profile" rather than
    // failing the pass.
    async fn fetch_profiles(&self, actors: &[Actor]) -> HashMap<String, ProfileView> {
        let fetches: Vec<_> = actors
            .iter()
            .map(|actor| self.fetcher.fetch_profile(&actor.did))
            .collect();

        let mut profiles = HashMap::new();
        let mut failures = 0usize;
        for (actor, result) in actors.iter().zip(join_all(fetches).await) {
            match result {
                Ok(Some(profile)) => {
                    profiles.insert(actor.did.clone(), profile);
                }
                Ok(None) => {}
                Err(err) => {
                    failures += 1;
                    tracing::warn!(target: "triage", did = %actor.did, error = %err, "profile fetch failed");
                }
            }
        }

        if failures > 0 {
            tracing::warn!(target: "triage", failures, "some profile fetches failed; affected actors triaged without profiles");
        }

        profiles
    }
}
