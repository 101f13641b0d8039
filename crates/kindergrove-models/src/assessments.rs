//! Assessment question-bank row models and vocabulary.
//!
//! The question bank is organized as one config per age band, each config
//! covering all six developmental dimensions with a handful of questions per
//! dimension. Question content and game parameters are stored as JSON.

use crate::ids::{AssessmentConfigId, AssessmentQuestionId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// The six developmental dimensions every age band is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Attention,
    Memory,
    Logic,
    Language,
    Motor,
    Social,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Attention,
        Dimension::Memory,
        Dimension::Logic,
        Dimension::Language,
        Dimension::Motor,
        Dimension::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Attention => "attention",
            Dimension::Memory => "memory",
            Dimension::Logic => "logic",
            Dimension::Language => "language",
            Dimension::Motor => "motor",
            Dimension::Social => "social",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attention" => Ok(Dimension::Attention),
            "memory" => Ok(Dimension::Memory),
            "logic" => Ok(Dimension::Logic),
            "language" => Ok(Dimension::Language),
            "motor" => Ok(Dimension::Motor),
            "social" => Ok(Dimension::Social),
            other => Err(format!("unknown dimension: {other}")),
        }
    }
}

/// Age bands covered by the question bank, in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    Months24To36,
    Months36To48,
    Months48To60,
    Months60To72,
}

impl AgeBand {
    pub const ALL: [AgeBand; 4] = [
        AgeBand::Months24To36,
        AgeBand::Months36To48,
        AgeBand::Months48To60,
        AgeBand::Months60To72,
    ];

    /// Inclusive lower and upper bounds in months.
    pub fn months(&self) -> (i32, i32) {
        match self {
            AgeBand::Months24To36 => (24, 36),
            AgeBand::Months36To48 => (36, 48),
            AgeBand::Months48To60 => (48, 60),
            AgeBand::Months60To72 => (60, 72),
        }
    }

    /// The band key stored on question rows, e.g. `"24-36"`.
    pub fn key(&self) -> &'static str {
        match self {
            AgeBand::Months24To36 => "24-36",
            AgeBand::Months36To48 => "36-48",
            AgeBand::Months48To60 => "48-60",
            AgeBand::Months60To72 => "60-72",
        }
    }

    /// Human-readable label in years, e.g. `"2-3 years"`.
    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Months24To36 => "2-3 years",
            AgeBand::Months36To48 => "3-4 years",
            AgeBand::Months48To60 => "4-5 years",
            AgeBand::Months60To72 => "5-6 years",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How a question is administered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Interactive mini-game scored by the client
    Game,
    /// Guided question read to the child by the assessor
    Qa,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Game => "game",
            QuestionType::Qa => "qa",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentConfig {
    pub id: AssessmentConfigId,
    pub name: String,
    pub description: Option<String>,
    pub min_age_months: i32,
    pub max_age_months: i32,
    pub dimensions: serde_json::Value,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentQuestion {
    pub id: AssessmentQuestionId,
    pub config_id: AssessmentConfigId,
    pub dimension: String,
    pub age_band: String,
    pub question_type: String,
    pub title: String,
    pub content: serde_json::Value,
    pub game_config: Option<serde_json::Value>,
    pub difficulty: i16,
    pub score: i32,
    pub sort_order: i32,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_roundtrip() {
        for dim in Dimension::ALL {
            assert_eq!(dim.as_str().parse::<Dimension>().unwrap(), dim);
        }
        assert!("creativity".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_age_bands_are_contiguous() {
        let mut prev_max = 24;
        for band in AgeBand::ALL {
            let (min, max) = band.months();
            assert_eq!(min, prev_max);
            assert!(max > min);
            prev_max = max;
        }
        assert_eq!(prev_max, 72);
    }

    #[test]
    fn test_age_band_keys_match_bounds() {
        for band in AgeBand::ALL {
            let (min, max) = band.months();
            assert_eq!(band.key(), format!("{min}-{max}"));
        }
    }
}
