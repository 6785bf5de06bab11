use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::Deserialize;

use crate::config::AppViewConfig;
use crate::domain::ProfileView;

use super::batcher::FetchError;

/// Bulk profile lookup. The response is not guaranteed to cover every
/// requested DID or preserve request order; a missing entry means the
/// profile does not exist, not that the call failed.
pub trait ProfileSource: Send + Sync + 'static {
    fn get_profiles(
        &self,
        dids: Vec<String>,
    ) -> BoxFuture<'static, Result<Vec<ProfileView>, FetchError>>;
}

#[derive(Debug, Deserialize)]
struct GetProfilesResponse {
    profiles: Vec<ProfileView>,
}

// The public AppView endpoint needs no credential.
#[derive(Clone)]
pub struct AppViewClient {
    http: Client,
    config: AppViewConfig,
}

impl AppViewClient {
    pub fn new(http: Client, config: AppViewConfig) -> Self {
        Self { http, config }
    }

    async fn get_profiles_inner(
        http: Client,
        base_url: String,
        dids: Vec<String>,
    ) -> Result<Vec<ProfileView>, FetchError> {
        let url = format!("{}/xrpc/app.bsky.actor.getProfiles", base_url);
        let query: Vec<(&str, &str)> = dids.iter().map(|did| ("actors", did.as_str())).collect();

        let response = http
            .get(&url)
            .query(&query)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| FetchError::Upstream(err.to_string()))?;

        let body: GetProfilesResponse = response
            .json()
            .await
            .map_err(|err| FetchError::Upstream(err.to_string()))?;

        Ok(body.profiles)
    }
}

impl ProfileSource for AppViewClient {
    fn get_profiles(
        &self,
        dids: Vec<String>,
    ) -> BoxFuture<'static, Result<Vec<ProfileView>, FetchError>> {
        let http = self.http.clone();
        let base_url = self.config.base_url.clone();
        Self::get_profiles_inner(http, base_url, dids).boxed()
    }
}
