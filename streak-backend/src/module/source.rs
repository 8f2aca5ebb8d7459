use async_trait::async_trait;
use streak_common::UserActivity;

use crate::error::Result;

/// Provider of contribution data for one account
///
/// The card service only depends on this trait, so tests and alternative
/// backends can stand in for the GitHub client.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn fetch_activity(&self, login: &str) -> Result<UserActivity>;
}
