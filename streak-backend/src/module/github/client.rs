///! GitHub GraphQL client for contribution data

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use streak_common::UserActivity;

use super::types::GraphQlResponse;
use crate::config::GitHubConfig;
use crate::error::{CardError, Result};
use crate::module::source::ActivitySource;

/// Creation date, calendar, and up to 100 owned repositories with their
/// ten largest languages
pub const USER_ACTIVITY_QUERY: &str = r#"
query userActivity($login: String!) {
  user(login: $login) {
    login
    createdAt
    contributionsCollection {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            date
            contributionCount
          }
        }
      }
    }
    repositories(first: 100, ownerAffiliations: OWNER, isFork: false) {
      nodes {
        name
        languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node {
              name
              color
            }
          }
        }
      }
    }
  }
}
"#;

/// GitHub API client
///
/// Holds the credential it was configured with; it never looks at the
/// process environment.
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CardError::UpstreamFailure(format!("Failed to build HTTP client: {}", e)))?;

        if config.token.is_none() {
            tracing::warn!("No GitHub token configured, requests will likely be rejected");
        }

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Request body for one account
    fn request_body(login: &str) -> serde_json::Value {
        serde_json::json!({
            "query": USER_ACTIVITY_QUERY,
            "variables": { "login": login },
        })
    }

    /// Failure text for a non-success status, carrying the API's `message` when present
    fn status_diagnostic(status: reqwest::StatusCode, login: &str, body: &str) -> String {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(str::to_string));

        match message {
            Some(message) => format!("HTTP error {} for {}: {}", status, login, message),
            None => format!("HTTP error {} for {}", status, login),
        }
    }

    async fn fetch(&self, login: &str) -> Result<UserActivity> {
        let mut request = self.client.post(&self.api_url).json(&Self::request_body(login));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CardError::UpstreamFailure(Self::status_diagnostic(status, login, &body)));
        }

        let body = response.text().await?;
        let payload: GraphQlResponse = serde_json::from_str(&body)?;
        payload.into_activity(login)
    }
}

#[async_trait]
impl ActivitySource for GitHubClient {
    async fn fetch_activity(&self, login: &str) -> Result<UserActivity> {
        tracing::debug!("Fetching GitHub activity for {}", login);

        match self.fetch(login).await {
            Ok(activity) => {
                tracing::debug!(
                    "Fetched {} days and {} repositories for {}",
                    activity.calendar.day_count(),
                    activity.repositories.len(),
                    login
                );
                Ok(activity)
            }
            Err(e) => {
                tracing::warn!("GitHub fetch failed for {}: {}", login, e);
                Err(e)
            }
        }
    }
}
