use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Color used for languages the source reports without one
pub const DEFAULT_LANGUAGE_COLOR: &str = "#858585";

/// Number of contributions made on a single calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
}

impl ContributionDay {
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }
}

/// One calendar week as reported by the source (up to seven days, oldest first)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionWeek {
    pub days: Vec<ContributionDay>,
}

/// Contribution calendar covering roughly the last year
///
/// Concatenating `weeks` in order yields an ascending daily sequence
/// with at most one entry per date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub weeks: Vec<ContributionWeek>,
}

impl ContributionCalendar {
    /// Iterate over every day, oldest first
    pub fn days(&self) -> impl DoubleEndedIterator<Item = &ContributionDay> + '_ {
        self.weeks.iter().flat_map(|week| week.days.iter())
    }

    /// Flattened copy of every day, oldest first
    pub fn flatten(&self) -> Vec<ContributionDay> {
        self.days().copied().collect()
    }

    pub fn day_count(&self) -> usize {
        self.weeks.iter().map(|week| week.days.len()).sum()
    }

    /// Build a calendar from a flat day list, chunked into seven-day weeks
    pub fn from_days(total_contributions: u64, days: &[ContributionDay]) -> Self {
        let weeks = days
            .chunks(7)
            .map(|chunk| ContributionWeek { days: chunk.to_vec() })
            .collect();

        Self {
            total_contributions,
            weeks,
        }
    }
}

/// Byte size of one language inside one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryLanguageEdge {
    pub language_name: String,
    pub color: Option<String>,
    pub size_bytes: u64,
}

impl RepositoryLanguageEdge {
    pub fn new(language_name: impl Into<String>, color: Option<&str>, size_bytes: u64) -> Self {
        Self {
            language_name: language_name.into(),
            color: color.map(str::to_string),
            size_bytes,
        }
    }
}

/// Owned repository with its language breakdown (largest first)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub languages: Vec<RepositoryLanguageEdge>,
}

/// Language usage summed across every repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageAggregate {
    pub name: String,
    pub color: String,
    pub total_size_bytes: u64,
    /// Share of the full total, rounded to two decimals
    pub percentage: f64,
}

/// Streak metrics derived from a contribution calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    pub current_length: u32,
    pub current_start: NaiveDate,
    pub longest_length: u32,
    pub longest_start: NaiveDate,
    pub longest_end: NaiveDate,
}

/// Everything the activity source returns for one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub login: String,
    pub created_at: DateTime<Utc>,
    pub calendar: ContributionCalendar,
    pub repositories: Vec<Repository>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32, count: u32) -> ContributionDay {
        ContributionDay::new(NaiveDate::from_ymd_opt(2024, 3, d).unwrap(), count)
    }

    #[test]
    fn test_days_flatten_in_order() {
        let days: Vec<_> = (1..=10).map(|d| day(d, d)).collect();
        let calendar = ContributionCalendar::from_days(55, &days);

        assert_eq!(calendar.weeks.len(), 2);
        assert_eq!(calendar.weeks[1].days.len(), 3);
        assert_eq!(calendar.day_count(), 10);
        assert_eq!(calendar.flatten(), days);
    }

    #[test]
    fn test_days_reverse_iteration() {
        let days: Vec<_> = (1..=9).map(|d| day(d, 0)).collect();
        let calendar = ContributionCalendar::from_days(0, &days);

        let last = calendar.days().next_back().unwrap();
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn test_day_serializes_iso_date() {
        let json = serde_json::to_string(&day(5, 2)).unwrap();
        assert_eq!(json, r#"{"date":"2024-03-05","count":2}"#);
    }

    #[test]
    fn test_edge_new() {
        let edge = RepositoryLanguageEdge::new("Rust", Some("#dea584"), 120);
        assert_eq!(edge.language_name, "Rust");
        assert_eq!(edge.color.as_deref(), Some("#dea584"));
        assert_eq!(edge.size_bytes, 120);
    }
}
