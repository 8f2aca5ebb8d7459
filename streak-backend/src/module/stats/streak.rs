///! Streak calculation over the daily contribution sequence

use chrono::NaiveDate;
use streak_common::{ContributionCalendar, StreakResult};

/// Compute current and longest streaks
///
/// Walks the flattened calendar from the most recent day backward, keeping a
/// running count of consecutive active days. The longest streak is the
/// highest value the counter reaches; the current streak is the run that
/// touches the most recent day.
///
/// # Arguments
/// * `calendar` - Contribution calendar, oldest day first
/// * `today` - UTC date of the request, used only when the calendar is empty
pub fn compute_streaks(calendar: &ContributionCalendar, today: NaiveDate) -> StreakResult {
    let first_date = calendar.days().next().map(|d| d.date).unwrap_or(today);
    let last_date = calendar.days().next_back().map(|d| d.date).unwrap_or(today);

    let mut running = 0u32;
    let mut run_end = first_date;

    let mut longest = 0u32;
    let mut longest_start = first_date;
    let mut longest_end = first_date;

    // Cleared at the first inactive day, after which the current run is final
    let mut in_current = true;
    let mut current = 0u32;
    let mut current_start = last_date;

    for day in calendar.days().rev() {
        if !day.is_active() {
            running = 0;
            in_current = false;
            continue;
        }

        if running == 0 {
            run_end = day.date;
        }
        running += 1;

        if in_current {
            current = running;
            current_start = day.date;
        }

        if running > longest {
            longest = running;
            longest_start = day.date;
            longest_end = run_end;
        }
    }

    StreakResult {
        current_length: current,
        current_start,
        longest_length: longest,
        longest_start,
        longest_end,
    }
}
