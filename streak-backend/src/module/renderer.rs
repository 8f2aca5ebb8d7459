///! Activity card renderer
///!
///! Lays out the streak summary, the recent activity chart and the language
///! breakdown on a fixed SVG canvas. Rendering reads no clock and touches no
///! files, so identical input always yields identical output.

use chrono::{DateTime, NaiveDate, Utc};
use resvg::tiny_skia;
use resvg::usvg::{fontdb, Options, Tree};
use std::path::Path;
use std::sync::Arc;
use streak_common::{ContributionDay, LanguageAggregate, StreakResult};

use crate::error::{CardError, Result};

const CARD_SVG_TEMPLATE: &str = include_str!("../../resources/card_template.svg");

/// Everything drawn on one card
#[derive(Debug, Clone)]
pub struct CardData {
    pub login: String,
    pub total_contributions: u64,
    pub streak: StreakResult,
    pub window: Vec<ContributionDay>,
    pub languages: Vec<LanguageAggregate>,
    pub created_at: DateTime<Utc>,
}

/// Card layout renderer
pub struct CardRenderer;

impl CardRenderer {
    pub const WIDTH: f64 = 720.0;
    pub const HEIGHT: f64 = 420.0;

    const PADDING_X: f64 = 30.0;
    const TITLE_Y: f64 = 34.0;

    // Headline stats, one column per number
    const STAT_COLUMN_WIDTH: f64 = 240.0;
    const STAT_VALUE_Y: f64 = 88.0;
    const STAT_LABEL_Y: f64 = 114.0;
    const STAT_CAPTION_Y: f64 = 134.0;
    const DIVIDER_TOP: f64 = 62.0;
    const DIVIDER_BOTTOM: f64 = 140.0;

    // Activity chart
    const CHART_LABEL_Y: f64 = 162.0;
    const CHART_TOP: f64 = 170.0;
    const CHART_HEIGHT: f64 = 112.0;
    const CHART_INSET: f64 = 10.0;
    const POINT_RADIUS: f64 = 2.5;

    // Language bar and legend
    const LANG_LABEL_Y: f64 = 308.0;
    const BAR_Y: f64 = 318.0;
    const BAR_HEIGHT: f64 = 10.0;
    const LEGEND_TOP: f64 = 350.0;
    const LEGEND_ROW_HEIGHT: f64 = 22.0;
    const LEGEND_BOTTOM_MARGIN: f64 = 12.0;
    const LEGEND_DOT_RADIUS: f64 = 5.0;

    /// Width available to the chart frame and the language bar
    pub fn content_width() -> f64 {
        Self::WIDTH - 2.0 * Self::PADDING_X
    }

    /// Inner drawing box of the chart as (left, top, right, bottom)
    pub fn chart_inner_box() -> (f64, f64, f64, f64) {
        let left = Self::PADDING_X + Self::CHART_INSET;
        let right = Self::WIDTH - Self::PADDING_X - Self::CHART_INSET;
        let top = Self::CHART_TOP + Self::CHART_INSET;
        let bottom = Self::CHART_TOP + Self::CHART_HEIGHT - Self::CHART_INSET;
        (left, top, right, bottom)
    }

    /// Render the card to an SVG document
    pub fn render(card: &CardData) -> String {
        let mut content = String::new();

        content.push_str(&format!(
            r#"<text x="{}" y="{}" class="title">{}</text>"#,
            fmt_coord(Self::PADDING_X),
            fmt_coord(Self::TITLE_Y),
            escape_xml(&format!("{}'s contributions", card.login))
        ));
        content.push('\n');

        content.push_str(&Self::generate_stats(card));
        content.push_str(&Self::generate_chart(&card.window));
        content.push_str(&Self::generate_languages(&card.languages));

        CARD_SVG_TEMPLATE
            .replace("{{WIDTH}}", &fmt_coord(Self::WIDTH))
            .replace("{{HEIGHT}}", &fmt_coord(Self::HEIGHT))
            .replace("{{INNER_WIDTH}}", &fmt_coord(Self::WIDTH - 1.0))
            .replace("{{INNER_HEIGHT}}", &fmt_coord(Self::HEIGHT - 1.0))
            .replace("{{TITLE}}", &escape_xml(&format!("{} activity card", card.login)))
            .replace("{{CONTENT}}", &content)
    }

    /// Three headline numbers with their date captions
    fn generate_stats(card: &CardData) -> String {
        let streak = &card.streak;

        let total_caption = format!("{} - Present", format_date(card.created_at.date_naive()));

        let current_caption = if streak.current_length > 0 {
            format!("{} - Present", format_date(streak.current_start))
        } else {
            "No active streak".to_string()
        };

        let longest_caption = if streak.longest_length == 0 {
            "No streak yet".to_string()
        } else if streak.longest_start == streak.longest_end {
            format_date(streak.longest_start)
        } else {
            format!(
                "{} - {}",
                format_date(streak.longest_start),
                format_date(streak.longest_end)
            )
        };

        let columns = [
            (format_thousands(card.total_contributions), "Total Contributions", total_caption, ""),
            (streak.current_length.to_string(), "Current Streak", current_caption, " accent"),
            (streak.longest_length.to_string(), "Longest Streak", longest_caption, ""),
        ];

        let mut block = String::new();
        for (i, (value, label, caption, extra_class)) in columns.iter().enumerate() {
            let center = Self::STAT_COLUMN_WIDTH * (i as f64 + 0.5);
            block.push_str(&format!(
                r#"<g class="stat">
<text x="{x}" y="{}" text-anchor="middle" class="stat-value{}">{}</text>
<text x="{x}" y="{}" text-anchor="middle" class="stat-label">{}</text>
<text x="{x}" y="{}" text-anchor="middle" class="stat-caption">{}</text>
</g>
"#,
                fmt_coord(Self::STAT_VALUE_Y),
                extra_class,
                escape_xml(value),
                fmt_coord(Self::STAT_LABEL_Y),
                label,
                fmt_coord(Self::STAT_CAPTION_Y),
                escape_xml(caption),
                x = fmt_coord(center),
            ));
        }

        for i in 1..columns.len() {
            let x = Self::STAT_COLUMN_WIDTH * i as f64;
            block.push_str(&format!(
                r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}" class="divider" />"#,
                fmt_coord(Self::DIVIDER_TOP),
                fmt_coord(Self::DIVIDER_BOTTOM),
                x = fmt_coord(x),
            ));
            block.push('\n');
        }

        block
    }

    /// Point positions of the window inside the chart's inner box
    pub fn chart_points(window: &[ContributionDay]) -> Vec<(f64, f64)> {
        let (left, top, right, bottom) = Self::chart_inner_box();
        let width = right - left;
        let height = bottom - top;

        let max = window.iter().map(|d| d.count).max().unwrap_or(0).max(1) as f64;
        let steps = window.len().saturating_sub(1);

        window
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let x = if steps == 0 {
                    left
                } else {
                    left + width * i as f64 / steps as f64
                };
                let y = bottom - height * day.count as f64 / max;
                (x, y)
            })
            .collect()
    }

    /// Line and area chart of the recent window
    fn generate_chart(window: &[ContributionDay]) -> String {
        let mut block = String::new();

        block.push_str(&format!(
            r#"<text x="{}" y="{}" class="section-label">Last {} days</text>"#,
            fmt_coord(Self::PADDING_X),
            fmt_coord(Self::CHART_LABEL_Y),
            window.len()
        ));
        block.push('\n');

        block.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="4" class="chart-frame" />"#,
            fmt_coord(Self::PADDING_X),
            fmt_coord(Self::CHART_TOP),
            fmt_coord(Self::content_width()),
            fmt_coord(Self::CHART_HEIGHT)
        ));
        block.push('\n');

        let points = Self::chart_points(window);
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            block.push_str(&format!(
                r#"<text x="{}" y="{}" text-anchor="middle" class="stat-caption">No recent activity</text>"#,
                fmt_coord(Self::WIDTH / 2.0),
                fmt_coord(Self::CHART_TOP + Self::CHART_HEIGHT / 2.0)
            ));
            block.push('\n');
            return block;
        };

        let (_, _, _, bottom) = Self::chart_inner_box();
        let line: Vec<String> = points
            .iter()
            .map(|&(x, y)| format!("{},{}", fmt_coord(x), fmt_coord(y)))
            .collect();

        block.push_str(&format!(
            r#"<path d="M{},{} L{} L{},{} Z" class="chart-area" />"#,
            fmt_coord(first.0),
            fmt_coord(bottom),
            line.join(" L"),
            fmt_coord(last.0),
            fmt_coord(bottom)
        ));
        block.push('\n');

        block.push_str(&format!(
            r#"<polyline points="{}" class="chart-line" />"#,
            line.join(" ")
        ));
        block.push('\n');

        block.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="{}" class="chart-point" />"#,
            fmt_coord(last.0),
            fmt_coord(last.1),
            fmt_coord(Self::POINT_RADIUS)
        ));
        block.push('\n');

        let peak = window.iter().map(|d| d.count).max().unwrap_or(0);
        block.push_str(&format!(
            r#"<text x="{}" y="{}" text-anchor="end" class="stat-caption">Peak {} / day</text>"#,
            fmt_coord(Self::WIDTH - Self::PADDING_X),
            fmt_coord(Self::CHART_LABEL_Y),
            peak
        ));
        block.push('\n');

        block
    }

    /// Segment rectangles of the language bar as (x, width, color)
    pub fn bar_segments(languages: &[LanguageAggregate]) -> Vec<(f64, f64, &str)> {
        let scale = Self::content_width() / 100.0;
        let mut x = Self::PADDING_X;

        languages
            .iter()
            .map(|lang| {
                let width = lang.percentage * scale;
                let segment = (x, width, lang.color.as_str());
                x += width;
                segment
            })
            .collect()
    }

    /// Vertical distance between legend rows
    ///
    /// Shrinks below `LEGEND_ROW_HEIGHT` when the rows would not fit above
    /// the bottom margin.
    fn legend_row_pitch(rows: usize) -> f64 {
        if rows <= 1 {
            return Self::LEGEND_ROW_HEIGHT;
        }
        let available = Self::HEIGHT - Self::LEGEND_BOTTOM_MARGIN - Self::LEGEND_TOP;
        Self::LEGEND_ROW_HEIGHT.min(available / (rows - 1) as f64)
    }

    /// Segmented bar plus two-column legend
    fn generate_languages(languages: &[LanguageAggregate]) -> String {
        let mut block = String::new();

        block.push_str(&format!(
            r#"<text x="{}" y="{}" class="section-label">Most Used Languages</text>"#,
            fmt_coord(Self::PADDING_X),
            fmt_coord(Self::LANG_LABEL_Y)
        ));
        block.push('\n');

        if languages.is_empty() {
            block.push_str(&format!(
                r#"<text x="{}" y="{}" class="stat-caption">No language data</text>"#,
                fmt_coord(Self::PADDING_X),
                fmt_coord(Self::LEGEND_TOP)
            ));
            block.push('\n');
            return block;
        }

        block.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" class="bar-track" />"#,
            fmt_coord(Self::PADDING_X),
            fmt_coord(Self::BAR_Y),
            fmt_coord(Self::content_width()),
            fmt_coord(Self::BAR_HEIGHT)
        ));
        block.push('\n');

        for (x, width, color) in Self::bar_segments(languages) {
            block.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
                fmt_coord(x),
                fmt_coord(Self::BAR_Y),
                fmt_coord(width),
                fmt_coord(Self::BAR_HEIGHT),
                escape_xml(color)
            ));
            block.push('\n');
        }

        let column_width = Self::content_width() / 2.0;
        let rows = languages.len().div_ceil(2);
        let pitch = Self::legend_row_pitch(rows);
        for (i, lang) in languages.iter().enumerate() {
            // Fill the left column first, then the right
            let column = i / rows;
            let row = i % rows;
            let x = Self::PADDING_X + column as f64 * column_width;
            let y = Self::LEGEND_TOP + row as f64 * pitch;

            block.push_str(&format!(
                r#"<g class="legend-item">
<circle cx="{}" cy="{}" r="{}" fill="{}" />
<text x="{}" y="{}" class="legend-text">{} {}%</text>
</g>
"#,
                fmt_coord(x + Self::LEGEND_DOT_RADIUS),
                fmt_coord(y - Self::LEGEND_DOT_RADIUS + 1.0),
                fmt_coord(Self::LEGEND_DOT_RADIUS),
                escape_xml(&lang.color),
                fmt_coord(x + Self::LEGEND_DOT_RADIUS * 2.0 + 8.0),
                fmt_coord(y),
                escape_xml(&lang.name),
                fmt_coord(lang.percentage)
            ));
        }

        block
    }
}

/// Render the card to an SVG document
pub fn render(card: &CardData) -> String {
    CardRenderer::render(card)
}

/// Font database for rasterization
///
/// System fonts are always loaded; `font_dir` adds extra faces on top.
pub fn load_fonts(font_dir: Option<&Path>) -> Arc<fontdb::Database> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    if let Some(dir) = font_dir {
        db.load_fonts_dir(dir);
    }
    tracing::debug!("Loaded {} font faces for rasterization", db.len());
    Arc::new(db)
}

/// Rasterize an SVG document to PNG bytes
pub fn rasterize(svg: &str, fonts: Arc<fontdb::Database>) -> Result<Vec<u8>> {
    let mut options = Options::default();
    options.font_family = "DejaVu Sans".to_string();
    options.fontdb = fonts;

    let tree = Tree::from_str(svg, &options)
        .map_err(|e| CardError::Render(format!("Failed to parse SVG: {}", e)))?;

    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| CardError::Render("Failed to create pixmap".to_string()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| CardError::Render(format!("Failed to encode PNG: {}", e)))
}

/// Fixed-locale date caption, e.g. "Jan 5, 2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Integer with comma thousands separators
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn fmt_coord(value: f64) -> String {
    format!("{:.2}", value)
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_card() -> CardData {
        let start = date(2024, 1, 1);
        let window = (0..30)
            .map(|i| ContributionDay::new(start + Duration::days(i), (i % 5) as u32))
            .collect();

        CardData {
            login: "octocat".to_string(),
            total_contributions: 1234,
            streak: StreakResult {
                current_length: 4,
                current_start: date(2024, 1, 27),
                longest_length: 9,
                longest_start: date(2023, 11, 2),
                longest_end: date(2023, 11, 10),
            },
            window,
            languages: vec![
                LanguageAggregate {
                    name: "Rust".to_string(),
                    color: "#dea584".to_string(),
                    total_size_bytes: 600,
                    percentage: 60.0,
                },
                LanguageAggregate {
                    name: "C++".to_string(),
                    color: "#f34b7d".to_string(),
                    total_size_bytes: 400,
                    percentage: 40.0,
                },
            ],
            created_at: Utc.with_ymd_and_hms(2011, 1, 25, 18, 44, 36).unwrap(),
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let card = sample_card();
        assert_eq!(render(&card), render(&card));
    }

    #[test]
    fn test_render_contains_headlines() {
        let svg = render(&sample_card());

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="720.00" height="420.00""#));
        assert!(svg.contains(">1,234</text>"));
        assert!(svg.contains("Jan 25, 2011 - Present"));
        assert!(svg.contains("Jan 27, 2024 - Present"));
        assert!(svg.contains("Nov 2, 2023 - Nov 10, 2023"));
        assert!(svg.contains("Last 30 days"));
    }

    #[test]
    fn test_render_has_light_and_dark_styles() {
        let svg = render(&sample_card());
        assert!(svg.contains("@media (prefers-color-scheme: dark)"));
        assert!(svg.contains(".card-bg { fill: #fffefe"));
        assert!(svg.contains(".card-bg { fill: #0d1117"));
    }

    #[test]
    fn test_render_escapes_text() {
        let svg = render(&sample_card());
        assert!(svg.contains("C++ 40.00%"));
        assert!(svg.contains("octocat&apos;s contributions"));
    }

    #[test]
    fn test_render_zero_streaks() {
        let mut card = sample_card();
        card.streak.current_length = 0;
        card.streak.longest_length = 0;

        let svg = render(&card);
        assert!(svg.contains("No active streak"));
        assert!(svg.contains("No streak yet"));
    }

    #[test]
    fn test_render_empty_sections() {
        let mut card = sample_card();
        card.window.clear();
        card.languages.clear();

        let svg = render(&card);
        assert!(svg.contains("No recent activity"));
        assert!(svg.contains("No language data"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn test_single_point_at_left_edge() {
        let window = vec![ContributionDay::new(date(2024, 5, 1), 3)];
        let points = CardRenderer::chart_points(&window);
        let (left, top, _, _) = CardRenderer::chart_inner_box();

        assert_eq!(points, vec![(left, top)]);
    }

    #[test]
    fn test_chart_points_span_inner_box() {
        let window: Vec<_> = (0..5)
            .map(|i| ContributionDay::new(date(2024, 5, 1) + Duration::days(i), i as u32 * 2))
            .collect();
        let points = CardRenderer::chart_points(&window);
        let (left, top, right, bottom) = CardRenderer::chart_inner_box();

        assert_eq!(points.first().unwrap(), &(left, bottom));
        assert_eq!(points.last().unwrap(), &(right, top));
        assert!((points[2].1 - (top + bottom) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_window_stays_on_baseline() {
        let window: Vec<_> = (0..3)
            .map(|i| ContributionDay::new(date(2024, 5, 1) + Duration::days(i), 0))
            .collect();
        let (_, _, _, bottom) = CardRenderer::chart_inner_box();

        assert!(CardRenderer::chart_points(&window).iter().all(|&(_, y)| y == bottom));
    }

    #[test]
    fn test_bar_segments_are_contiguous() {
        let card = sample_card();
        let segments = CardRenderer::bar_segments(&card.languages);
        let width = CardRenderer::content_width();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].0, 30.0);
        assert!((segments[0].1 - width * 0.6).abs() < 1e-9);
        assert!((segments[1].0 - (segments[0].0 + segments[0].1)).abs() < 1e-9);
        assert_eq!(segments[1].2, "#f34b7d");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date(2024, 1, 5)), "Jan 5, 2024");
        assert_eq!(format_date(date(2023, 12, 31)), "Dec 31, 2023");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Test & <tag>"), "Test &amp; &lt;tag&gt;");
    }

    #[test]
    fn test_rasterize_produces_png() {
        let png = rasterize(&render(&sample_card()), load_fonts(None)).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_legend_stays_on_canvas() {
        let mut card = sample_card();
        card.languages = (0..10)
            .map(|i| LanguageAggregate {
                name: format!("Lang{}", i),
                color: "#123456".to_string(),
                total_size_bytes: 100,
                percentage: 10.0,
            })
            .collect();

        let svg = render(&card);
        let ys: Vec<f64> = svg
            .split(" y=\"")
            .skip(1)
            .chain(svg.split(" cy=\"").skip(1))
            .filter_map(|rest| rest.split('"').next()?.parse().ok())
            .collect();

        assert!(svg.contains("Lang9 10.00%"));
        assert!(!ys.is_empty());
        for y in ys {
            assert!(y <= CardRenderer::HEIGHT, "y={} is below the canvas", y);
        }
    }

    #[test]
    fn test_legend_pitch_unchanged_when_rows_fit() {
        assert_eq!(CardRenderer::legend_row_pitch(1), 22.0);
        assert_eq!(CardRenderer::legend_row_pitch(3), 22.0);
        assert!(CardRenderer::legend_row_pitch(5) < 22.0);
    }
}
