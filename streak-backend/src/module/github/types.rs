///! GitHub GraphQL response types
///!
///! Only the fields requested by [`super::client::USER_ACTIVITY_QUERY`] are
///! modelled. Anything missing fails deserialization, which surfaces as a
///! malformed-response error.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use streak_common::{
    ContributionCalendar, ContributionDay, ContributionWeek, Repository, RepositoryLanguageEdge,
    UserActivity,
};

use crate::error::{CardError, Result};

/// Top-level GraphQL envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<ResponseData>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ResponseData {
    pub user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub login: String,
    pub created_at: DateTime<Utc>,
    pub contributions_collection: ContributionsCollection,
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub contribution_calendar: CalendarNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarNode {
    pub total_contributions: u64,
    pub weeks: Vec<WeekNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekNode {
    pub contribution_days: Vec<DayNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayNode {
    pub date: NaiveDate,
    pub contribution_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryConnection {
    pub nodes: Vec<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryNode {
    pub name: String,
    pub languages: LanguageConnection,
}

#[derive(Debug, Deserialize)]
pub struct LanguageConnection {
    pub edges: Vec<LanguageEdge>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageEdge {
    pub size: u64,
    pub node: LanguageNode,
}

#[derive(Debug, Deserialize)]
pub struct LanguageNode {
    pub name: String,
    pub color: Option<String>,
}

impl GraphQlResponse {
    /// Unwrap the envelope into the account's activity
    ///
    /// The first reported GraphQL error wins over any partial data.
    pub fn into_activity(self, login: &str) -> Result<UserActivity> {
        if let Some(first) = self.errors.into_iter().next() {
            return Err(CardError::UpstreamDataError(first.message));
        }

        let data = self
            .data
            .ok_or_else(|| CardError::MalformedResponse("response has no data".to_string()))?;

        let user = data.user.ok_or_else(|| {
            CardError::UpstreamDataError(format!(
                "Could not resolve to a User with the login of '{}'.",
                login
            ))
        })?;

        Ok(user.into())
    }
}

impl From<UserNode> for UserActivity {
    fn from(user: UserNode) -> Self {
        let calendar = user.contributions_collection.contribution_calendar;

        let weeks = calendar
            .weeks
            .into_iter()
            .map(|week| ContributionWeek {
                days: week
                    .contribution_days
                    .into_iter()
                    .map(|day| ContributionDay::new(day.date, day.contribution_count))
                    .collect(),
            })
            .collect();

        let repositories = user
            .repositories
            .nodes
            .into_iter()
            .map(|repo| Repository {
                name: repo.name,
                languages: repo
                    .languages
                    .edges
                    .into_iter()
                    .map(|edge| RepositoryLanguageEdge {
                        language_name: edge.node.name,
                        color: edge.node.color,
                        size_bytes: edge.size,
                    })
                    .collect(),
            })
            .collect();

        UserActivity {
            login: user.login,
            created_at: user.created_at,
            calendar: ContributionCalendar {
                total_contributions: calendar.total_contributions,
                weeks,
            },
            repositories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const USER_JSON: &str = r##"{
        "data": {
            "user": {
                "login": "octocat",
                "createdAt": "2011-01-25T18:44:36Z",
                "contributionsCollection": {
                    "contributionCalendar": {
                        "totalContributions": 7,
                        "weeks": [
                            {"contributionDays": [
                                {"date": "2024-01-06", "contributionCount": 3}
                            ]},
                            {"contributionDays": [
                                {"date": "2024-01-07", "contributionCount": 0},
                                {"date": "2024-01-08", "contributionCount": 4}
                            ]}
                        ]
                    }
                },
                "repositories": {
                    "nodes": [
                        {"name": "hello-world", "languages": {"edges": [
                            {"size": 1200, "node": {"name": "Rust", "color": "#dea584"}},
                            {"size": 30, "node": {"name": "Dockerfile", "color": null}}
                        ]}},
                        {"name": "empty", "languages": {"edges": []}}
                    ]
                }
            }
        }
    }"##;

    #[test]
    fn test_parse_user_activity() {
        let response: GraphQlResponse = serde_json::from_str(USER_JSON).unwrap();
        let activity = response.into_activity("octocat").unwrap();

        assert_eq!(activity.login, "octocat");
        assert_eq!(activity.calendar.total_contributions, 7);
        assert_eq!(activity.calendar.day_count(), 3);
        assert_eq!(activity.calendar.weeks[1].days[1].count, 4);
        assert_eq!(
            activity.calendar.weeks[0].days[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()
        );
        assert_eq!(activity.repositories.len(), 2);
        assert_eq!(
            activity.repositories[0].languages[1],
            RepositoryLanguageEdge::new("Dockerfile", None, 30)
        );
    }

    #[test]
    fn test_first_error_is_reported() {
        let json = r#"{"data": {"user": null}, "errors": [
            {"type": "NOT_FOUND", "message": "Could not resolve to a User with the login of 'ghost-x'."},
            {"message": "second"}
        ]}"#;
        let response: GraphQlResponse = serde_json::from_str(json).unwrap();

        match response.into_activity("ghost-x") {
            Err(CardError::UpstreamDataError(msg)) => {
                assert_eq!(msg, "Could not resolve to a User with the login of 'ghost-x'.")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_null_user_without_errors() {
        let response: GraphQlResponse = serde_json::from_str(r#"{"data": {"user": null}}"#).unwrap();
        assert!(matches!(
            response.into_activity("nobody"),
            Err(CardError::UpstreamDataError(_))
        ));
    }

    #[test]
    fn test_missing_data_is_malformed() {
        let response: GraphQlResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            response.into_activity("nobody"),
            Err(CardError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_field_fails_to_parse() {
        let json = r#"{"data": {"user": {"login": "octocat", "createdAt": "2011-01-25T18:44:36Z"}}}"#;
        assert!(serde_json::from_str::<GraphQlResponse>(json).is_err());
    }
}
