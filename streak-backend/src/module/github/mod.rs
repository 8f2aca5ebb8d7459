///! GitHub activity source
///!
///! Fetches the account creation date, contribution calendar and repository
///! languages through the GraphQL API and converts them into the shared
///! value types.

pub mod client;
pub mod types;

pub use client::{GitHubClient, USER_ACTIVITY_QUERY};
pub use types::GraphQlResponse;
