// src/models/lecture.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    #[default]
    Concise,
    Detailed,
    BulletPoints,
    Academic,
    SimpleLanguage,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 5] = [
        SummaryStyle::Concise,
        SummaryStyle::Detailed,
        SummaryStyle::BulletPoints,
        SummaryStyle::Academic,
        SummaryStyle::SimpleLanguage,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            SummaryStyle::Concise => "concise",
            SummaryStyle::Detailed => "detailed",
            SummaryStyle::BulletPoints => "bullet_points",
            SummaryStyle::Academic => "academic",
            SummaryStyle::SimpleLanguage => "simple_language",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SummaryStyle::Concise => "Concise",
            SummaryStyle::Detailed => "Detailed",
            SummaryStyle::BulletPoints => "Bullet Points",
            SummaryStyle::Academic => "Academic",
            SummaryStyle::SimpleLanguage => "Simple Language",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            SummaryStyle::Concise => "Quick overview of main points",
            SummaryStyle::Detailed => "Comprehensive coverage of content",
            SummaryStyle::BulletPoints => "Easy-to-scan format",
            SummaryStyle::Academic => "Formal, structured summary",
            SummaryStyle::SimpleLanguage => "Easy-to-understand format",
        }
    }
}

/// Target summary length as a percentage of the transcript, 10..=50 in steps of 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SummaryLength(u8);

impl SummaryLength {
    pub const MIN: u8 = 10;
    pub const MAX: u8 = 50;
    pub const STEP: u8 = 5;
    pub const DEFAULT: SummaryLength = SummaryLength(30);

    /// Clamp into range and snap to the nearest step
    pub fn new(percent: i64) -> Self {
        let clamped = percent.clamp(Self::MIN as i64, Self::MAX as i64);
        let step = Self::STEP as i64;
        let snapped = (clamped + step / 2) / step * step;
        SummaryLength(snapped.min(Self::MAX as i64) as u8)
    }

    pub fn percent(&self) -> u8 {
        self.0
    }
}

impl Default for SummaryLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<'de> Deserialize<'de> for SummaryLength {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // form fields arrive as strings
        let raw = String::deserialize(deserializer)?;
        let percent = raw.trim().parse::<i64>().map_err(serde::de::Error::custom)?;
        Ok(SummaryLength::new(percent))
    }
}

/// One recorded summary on the lecture page
#[derive(Debug, Clone, Serialize)]
pub struct LectureSummary {
    pub url: String,
    pub summary: String,
    pub style: SummaryStyle,
    pub length: SummaryLength,
    pub created_at: DateTime<Utc>,
}

impl LectureSummary {
    pub fn new(
        url: impl Into<String>,
        summary: impl Into<String>,
        style: SummaryStyle,
        length: SummaryLength,
    ) -> Self {
        Self {
            url: url.into(),
            summary: summary.into(),
            style,
            length,
            created_at: Utc::now(),
        }
    }
}
