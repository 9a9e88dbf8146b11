//! Grid Site Risk Scoring
//!
//! Three independent scoring capabilities for a candidate grid-connection
//! site, exposed through the [`RiskScorer`] trait:
//!
//! | Metric | Method | Meaning |
//! |--------|--------|---------|
//! | connection  | `compute_connection_score`  | Available transmission capacity |
//! | curtailment | `compute_curtailment_score` | Exposure to output curtailment |
//! | delay       | `compute_delay_score`       | Interconnection queue delay |
//!
//! All scores are integers on a 0-100 scale where higher means a more
//! favourable site. The composite score is the rounded mean of the three.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod assessment;
pub mod scorer;

pub use assessment::{BankabilityRating, RiskAssessment};
pub use scorer::{FixedScorer, LocationScorer, MetricBand, ScorerConfig};

/// Metric names, in report order
pub const METRIC_CONNECTION: &str = "connection";
pub const METRIC_CURTAILMENT: &str = "curtailment";
pub const METRIC_DELAY: &str = "delay";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Coordinates out of range (lat [-90, 90], lon [-180, 180]): ({lat}, {lon})")]
    OutOfRange { lat: f64, lon: f64 },
}

pub type Result<T> = std::result::Result<T, ScoringError>;

/// A WGS84 coordinate pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Reject coordinates that cannot be scored
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lon_ok = self.lon.is_finite() && (-180.0..=180.0).contains(&self.lon);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(ScoringError::OutOfRange {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }
}

/// Scoring seam used by the gateway.
///
/// Implementors provide the three metric computations; [`RiskScorer::assess`]
/// validates the coordinates once and combines them.
pub trait RiskScorer: Send + Sync {
    fn compute_connection_score(&self, site: Coordinates) -> Result<i64>;

    fn compute_curtailment_score(&self, site: Coordinates) -> Result<i64>;

    fn compute_delay_score(&self, site: Coordinates) -> Result<i64>;

    fn assess(&self, site: Coordinates) -> Result<RiskAssessment> {
        site.validate()?;
        Ok(RiskAssessment {
            connection: self.compute_connection_score(site)?,
            curtailment: self.compute_curtailment_score(site)?,
            delay: self.compute_delay_score(site)?,
        })
    }
}
