use streak_common::{ContributionCalendar, ContributionDay};

/// Days shown in the activity chart
pub const DEFAULT_WINDOW_DAYS: usize = 90;

/// Last `window_size` days of the calendar, oldest first
///
/// Missing dates are not filled in; the source reports one entry per day.
pub fn recent_window(calendar: &ContributionCalendar, window_size: usize) -> Vec<ContributionDay> {
    let days = calendar.flatten();
    let skip = days.len().saturating_sub(window_size);
    days[skip..].to_vec()
}
