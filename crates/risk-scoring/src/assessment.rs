//! Combined per-site assessment

use crate::{METRIC_CONNECTION, METRIC_CURTAILMENT, METRIC_DELAY};
use serde::{Deserialize, Serialize};

/// Metric scores below this threshold raise a risk factor
pub const RISK_FACTOR_THRESHOLD: i64 = 60;

/// Composite below this threshold flags regulatory uncertainty
pub const REGULATORY_THRESHOLD: i64 = 65;

/// The three metric scores for one site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub connection: i64,
    pub curtailment: i64,
    pub delay: i64,
}

/// Bankability band derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankabilityRating {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl BankabilityRating {
    pub fn from_composite(composite: i64) -> Self {
        match composite {
            c if c >= 80 => Self::Excellent,
            c if c >= 70 => Self::Good,
            c if c >= 60 => Self::Moderate,
            _ => Self::Poor,
        }
    }

    /// Expected months to energisation
    pub fn timeline_months(&self) -> u32 {
        match self {
            Self::Excellent => 12,
            Self::Good => 18,
            Self::Moderate => 24,
            Self::Poor => 36,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
        }
    }
}

impl RiskAssessment {
    /// Rounded mean of the three metrics
    pub fn composite(&self) -> i64 {
        let sum = (self.connection + self.curtailment + self.delay) as f64;
        (sum / 3.0).round() as i64
    }

    pub fn rating(&self) -> BankabilityRating {
        BankabilityRating::from_composite(self.composite())
    }

    pub fn risk_factors(&self) -> Vec<&'static str> {
        let mut factors = Vec::new();
        if self.connection < RISK_FACTOR_THRESHOLD {
            factors.push("Limited transmission capacity available");
        }
        if self.curtailment < RISK_FACTOR_THRESHOLD {
            factors.push("Elevated curtailment exposure");
        }
        if self.delay < RISK_FACTOR_THRESHOLD {
            factors.push("High interconnection queue congestion");
        }
        if self.composite() < REGULATORY_THRESHOLD {
            factors.push("Regulatory approval timeline uncertainty");
        }
        factors
    }

    /// Metric name/score pairs in report order
    pub fn metrics(&self) -> [(&'static str, i64); 3] {
        [
            (METRIC_CONNECTION, self.connection),
            (METRIC_CURTAILMENT, self.curtailment),
            (METRIC_DELAY, self.delay),
        ]
    }
}
