//! Request pipeline: score, persist, render
//!
//! Everything here is synchronous. Handlers run it on the blocking pool so a
//! slow render or a busy database file never stalls the async workers.

use std::sync::Arc;

use risk_scoring::{Coordinates, RiskAssessment, RiskScorer};
use site_report::{make_pdf, PdfEngine, ScoreSheet};
use site_store::{SiteRecord, SiteStore};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;

/// Result of one successful analysis
#[derive(Debug, Clone)]
pub struct Analysis {
    pub record: SiteRecord,
    pub assessment: RiskAssessment,
    pub pdf_len: usize,
}

#[derive(Clone)]
pub struct SiteAnalyzer {
    scorer: Arc<dyn RiskScorer>,
    store: Arc<dyn SiteStore>,
    engine: Arc<dyn PdfEngine>,
}

impl SiteAnalyzer {
    pub fn new(
        scorer: Arc<dyn RiskScorer>,
        store: Arc<dyn SiteStore>,
        engine: Arc<dyn PdfEngine>,
    ) -> Self {
        Self {
            scorer,
            store,
            engine,
        }
    }

    pub fn store(&self) -> &Arc<dyn SiteStore> {
        &self.store
    }

    /// Score the site, insert one record, then render its report
    pub fn analyze(&self, site: Coordinates) -> Result<Analysis, ApiError> {
        let assessment = self.scorer.assess(site)?;

        let record = SiteRecord::new(
            site.lat,
            site.lon,
            assessment.connection,
            assessment.curtailment,
            assessment.delay,
        );
        self.store.insert(&record)?;

        let pdf = make_pdf(&score_sheet(&assessment), self.engine.as_ref())?;

        info!(
            "Analyzed site {} at ({:.4}, {:.4}): score={} rating={}",
            record.id,
            site.lat,
            site.lon,
            assessment.composite(),
            assessment.rating().label()
        );

        Ok(Analysis {
            record,
            assessment,
            pdf_len: pdf.len(),
        })
    }

    pub fn site(&self, id: Uuid) -> Result<SiteRecord, ApiError> {
        self.store.get(&id)?.ok_or(ApiError::SiteNotFound(id))
    }

    /// Render the report for a stored site
    pub fn report(&self, id: Uuid) -> Result<Vec<u8>, ApiError> {
        let record = self.site(id)?;
        Ok(make_pdf(
            &score_sheet(&assessment_of(&record)),
            self.engine.as_ref(),
        )?)
    }
}

pub fn assessment_of(record: &SiteRecord) -> RiskAssessment {
    RiskAssessment {
        connection: record.connection,
        curtailment: record.curtailment,
        delay: record.delay,
    }
}

pub fn score_sheet(assessment: &RiskAssessment) -> ScoreSheet {
    assessment.metrics().into_iter().collect()
}
