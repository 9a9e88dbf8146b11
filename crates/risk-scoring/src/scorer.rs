//! Scorer implementations
//!
//! [`LocationScorer`] is a deterministic location heuristic built on two
//! trigonometric location factors:
//!
//! ```text
//! f = sin(0.1·lat) · cos(0.1·lon)     (connection, curtailment)
//! g = cos(0.1·lat) · sin(0.1·lon)     (delay)
//! score = clamp(round(base ± swing · factor), min, max)
//! ```
//!
//! [`FixedScorer`] returns configured constants and is used to pin behaviour.

use crate::{Coordinates, Result, RiskScorer};
use tracing::debug;

/// Default connection band: capacity improves with the location factor
pub const CONNECTION_BAND: MetricBand = MetricBand {
    base: 70.0,
    swing: 15.0,
    min: 30,
    max: 95,
};

/// Default curtailment band: exposure grows with the location factor
pub const CURTAILMENT_BAND: MetricBand = MetricBand {
    base: 65.0,
    swing: -10.0,
    min: 20,
    max: 95,
};

/// Default delay band
pub const DELAY_BAND: MetricBand = MetricBand {
    base: 55.0,
    swing: 12.0,
    min: 5,
    max: 90,
};

/// Linear band for one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricBand {
    pub base: f64,
    /// Signed; negative bands score lower as the factor grows
    pub swing: f64,
    pub min: i64,
    pub max: i64,
}

impl MetricBand {
    /// Map a factor in [-1, 1] onto the band
    pub fn score(&self, factor: f64) -> i64 {
        let raw = (self.base + self.swing * factor).round() as i64;
        raw.clamp(self.min, self.max)
    }
}

/// Scorer configuration
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    /// Transmission capacity band
    pub connection: MetricBand,
    /// Curtailment exposure band
    pub curtailment: MetricBand,
    /// Interconnection delay band
    pub delay: MetricBand,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            connection: CONNECTION_BAND,
            curtailment: CURTAILMENT_BAND,
            delay: DELAY_BAND,
        }
    }
}

/// Primary location factor in [-1, 1]
pub fn location_factor(site: Coordinates) -> f64 {
    (site.lat * 0.1).sin() * (site.lon * 0.1).cos()
}

/// Secondary location factor in [-1, 1], used for queue delay
pub fn queue_factor(site: Coordinates) -> f64 {
    (site.lat * 0.1).cos() * (site.lon * 0.1).sin()
}

#[derive(Debug, Clone, Default)]
pub struct LocationScorer {
    config: ScorerConfig,
}

impl LocationScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }
}

impl RiskScorer for LocationScorer {
    fn compute_connection_score(&self, site: Coordinates) -> Result<i64> {
        site.validate()?;
        let factor = location_factor(site);
        let score = self.config.connection.score(factor);
        debug!(
            "connection score for ({:.4}, {:.4}): {} (f={:.3})",
            site.lat, site.lon, score, factor
        );
        Ok(score)
    }

    fn compute_curtailment_score(&self, site: Coordinates) -> Result<i64> {
        site.validate()?;
        let factor = location_factor(site);
        let score = self.config.curtailment.score(factor);
        debug!(
            "curtailment score for ({:.4}, {:.4}): {} (f={:.3})",
            site.lat, site.lon, score, factor
        );
        Ok(score)
    }

    fn compute_delay_score(&self, site: Coordinates) -> Result<i64> {
        site.validate()?;
        let factor = queue_factor(site);
        let score = self.config.delay.score(factor);
        debug!(
            "delay score for ({:.4}, {:.4}): {} (g={:.3})",
            site.lat, site.lon, score, factor
        );
        Ok(score)
    }
}

/// Constant scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedScorer {
    pub connection: i64,
    pub curtailment: i64,
    pub delay: i64,
}

impl FixedScorer {
    /// Same value for every metric
    pub fn uniform(score: i64) -> Self {
        Self::per_metric(score, score, score)
    }

    pub fn per_metric(connection: i64, curtailment: i64, delay: i64) -> Self {
        Self {
            connection,
            curtailment,
            delay,
        }
    }
}

impl RiskScorer for FixedScorer {
    fn compute_connection_score(&self, site: Coordinates) -> Result<i64> {
        site.validate()?;
        Ok(self.connection)
    }

    fn compute_curtailment_score(&self, site: Coordinates) -> Result<i64> {
        site.validate()?;
        Ok(self.curtailment)
    }

    fn compute_delay_score(&self, site: Coordinates) -> Result<i64> {
        site.validate()?;
        Ok(self.delay)
    }
}
