///! Card request pipeline: validate, fetch, analyze, render.
use chrono::{DateTime, Utc};
use resvg::usvg::fontdb;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::config::CardSettings;
use crate::error::{CardError, Result};
use super::renderer::{self, CardData};
use super::source::ActivitySource;
use super::stats;

/// Output encoding of the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardFormat {
    #[default]
    Svg,
    Png,
}

impl CardFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            CardFormat::Svg => "image/svg+xml",
            CardFormat::Png => "image/png",
        }
    }
}

impl std::str::FromStr for CardFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(CardFormat::Svg),
            "png" => Ok(CardFormat::Png),
            _ => Err(format!("Unknown card format: {}", s)),
        }
    }
}

/// A finished card ready to be sent
#[derive(Debug, Clone)]
pub struct CardResponse {
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub cache_control: String,
}

/// Builds activity cards from an activity source
pub struct CardService {
    source: Arc<dyn ActivitySource>,
    settings: CardSettings,
    /// Loaded on the first PNG request and reused afterwards
    fonts: OnceLock<Arc<fontdb::Database>>,
}

impl CardService {
    pub fn new(source: Arc<dyn ActivitySource>, settings: CardSettings) -> Self {
        Self {
            source,
            settings,
            fonts: OnceLock::new(),
        }
    }

    fn fonts(&self) -> Arc<fontdb::Database> {
        self.fonts
            .get_or_init(|| renderer::load_fonts(self.settings.font_dir.as_deref()))
            .clone()
    }

    /// Handle one card request
    ///
    /// # Arguments
    /// * `login` - Account name from the request; blank counts as missing
    /// * `format` - Output encoding
    /// * `now` - Request instant; its UTC date is "today" for the analyzer
    pub async fn handle(
        &self,
        login: Option<&str>,
        format: CardFormat,
        now: DateTime<Utc>,
    ) -> Result<CardResponse> {
        let login = login
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or(CardError::MissingParameter("user"))?;

        let started = Instant::now();
        let activity = self.source.fetch_activity(login).await?;
        tracing::debug!("Fetched activity for {} in {:?}", login, started.elapsed());

        let today = now.date_naive();
        let card = CardData {
            login: activity.login.clone(),
            total_contributions: activity.calendar.total_contributions,
            streak: stats::compute_streaks(&activity.calendar, today),
            window: stats::recent_window(&activity.calendar, self.settings.window_days),
            languages: stats::aggregate_languages(&activity.repositories, self.settings.top_languages),
            created_at: activity.created_at,
        };

        let svg = renderer::render(&card);
        let body = match format {
            CardFormat::Svg => svg.into_bytes(),
            CardFormat::Png => renderer::rasterize(&svg, self.fonts())?,
        };

        tracing::info!(
            "Rendered {:?} card for {} (current {}, longest {}) in {:?}",
            format,
            login,
            card.streak.current_length,
            card.streak.longest_length,
            started.elapsed()
        );

        Ok(CardResponse {
            body,
            content_type: format.content_type(),
            cache_control: self.settings.cache_control(),
        })
    }
}
