use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{ItemId, Listed, timestamp};

const MS_PER_DAY: f64 = 86_400_000.0;

/// A measurable goal tracked on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: ItemId,
    pub title: String,
    pub current_value: f64,
    pub target_value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub due_date: DateTime<Utc>,
}

impl Listed for Goal {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Presentation bucket for a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProgressTier {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ProgressTier {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            0..=20 => Self::VeryLow,
            21..=40 => Self::Low,
            41..=60 => Self::Medium,
            61..=80 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "very-low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very-high",
        }
    }
}

impl Goal {
    /// Percentage towards the target, rounded half up and clamped to 0..=100.
    /// A target of zero, a negative target or non-finite values give 0.
    pub fn progress(&self) -> u8 {
        progress_percent(self.current_value, self.target_value)
    }

    pub fn tier(&self) -> ProgressTier {
        ProgressTier::from_percent(self.progress())
    }

    /// Whole days until the due date, rounded up. Zero or negative once due.
    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        let ms = (self.due_date - now).num_milliseconds() as f64;
        (ms / MS_PER_DAY).ceil() as i64
    }

    pub fn due_label(&self, now: DateTime<Utc>) -> String {
        match self.days_left(now) {
            n if n > 0 => format!("{} days left", n),
            _ => "Past Due".to_string(),
        }
    }

    pub fn created_display(&self) -> String {
        format_long_date(self.created_at)
    }

    pub fn due_display(&self) -> String {
        format_long_date(self.due_date)
    }
}

pub fn progress_percent(current: f64, target: f64) -> u8 {
    if !current.is_finite() || !target.is_finite() || target <= 0.0 {
        return 0;
    }
    // floor(x + 0.5) rounds half up
    let pct = (current / target * 100.0 + 0.5).floor();
    pct.clamp(0.0, 100.0) as u8
}

/// "January 5, 2025": long month, numeric day, numeric year, in UTC.
pub fn format_long_date(dt: DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y").to_string()
}
