///! Value types shared between the activity source, the analyzer and the renderer.
///!
///! Everything here is request-scoped: built when a card request arrives,
///! handed to the next stage and dropped with the response.

pub mod types;

pub use types::{
    ContributionCalendar, ContributionDay, ContributionWeek, LanguageAggregate, Repository,
    RepositoryLanguageEdge, StreakResult, UserActivity, DEFAULT_LANGUAGE_COLOR,
};
