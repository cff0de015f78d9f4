use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::watch;
use tracing::{info, warn};

use super::domain::QuestionnaireAnswers;
use super::engine::{CostEstimate, EstimationEngine};
use super::report::EstimateReport;
use super::rules::RulesTable;
use crate::workflows::accounts::{
    ActivityPublisher, RecordId, RecordStore, StoreError, StoredRecord, UserActivity,
    UserIdentity,
};
use crate::workflows::export::{ExportFormat, ExportedDocument, ReportError, ReportMetadata};

const ACTIVITY_PAGE: &str = "cost-calculator";

/// Saved calculator run: the answers as entered and the estimate they priced to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationPayload {
    pub company_name: String,
    pub requirements: QuestionnaireAnswers,
    pub cost_breakdown: CostEstimate,
}

pub type CalculationRecord = StoredRecord<CalculationPayload>;

/// Service pricing questionnaires and keeping a signed-in user's history.
pub struct CalculatorService<S, P> {
    engine: Arc<EstimationEngine>,
    store: Arc<S>,
    activity: Arc<P>,
}

impl<S, P> CalculatorService<S, P>
where
    S: RecordStore<CalculationPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    pub fn new(engine: Arc<EstimationEngine>, store: Arc<S>, activity: Arc<P>) -> Self {
        Self {
            engine,
            store,
            activity,
        }
    }

    pub fn rules(&self) -> &RulesTable {
        self.engine.rules()
    }

    /// Prices answers. Always recomputed, never read back from storage.
    pub fn estimate(&self, answers: &QuestionnaireAnswers) -> CostEstimate {
        self.engine.estimate(answers)
    }

    pub fn save(
        &self,
        user: Option<&UserIdentity>,
        answers: QuestionnaireAnswers,
    ) -> Result<CalculationRecord, CalculatorServiceError> {
        let user = user.ok_or(CalculatorServiceError::NotSignedIn)?;
        let payload = self.payload(answers);
        let record = self.store.create(user, payload)?;

        info!(id = %record.id, uid = %user.uid.0, "calculation saved");
        self.record_activity(
            user,
            "calculation_saved",
            json!({
                "calculationId": record.id.0,
                "totalCosts": record.payload.cost_breakdown.total_costs,
            }),
        );
        Ok(record)
    }

    /// Re-prices edited answers and replaces the stored run.
    pub fn update(
        &self,
        user: Option<&UserIdentity>,
        id: &RecordId,
        answers: QuestionnaireAnswers,
    ) -> Result<CalculationRecord, CalculatorServiceError> {
        let user = user.ok_or(CalculatorServiceError::NotSignedIn)?;
        let payload = self.payload(answers);
        let record = self.store.update(user, id, payload)?;

        info!(id = %record.id, uid = %user.uid.0, "calculation updated");
        Ok(record)
    }

    pub fn delete(
        &self,
        user: Option<&UserIdentity>,
        id: &RecordId,
    ) -> Result<(), CalculatorServiceError> {
        let user = user.ok_or(CalculatorServiceError::NotSignedIn)?;
        self.store.delete(user, id)?;

        info!(id = %id, uid = %user.uid.0, "calculation deleted");
        Ok(())
    }

    /// Saved runs, newest first. Anonymous callers get an empty history.
    pub fn history(
        &self,
        user: Option<&UserIdentity>,
    ) -> Result<Vec<CalculationRecord>, CalculatorServiceError> {
        match user {
            Some(user) => Ok(self.store.list(&user.uid)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn watch_history(
        &self,
        user: &UserIdentity,
    ) -> Result<watch::Receiver<Vec<CalculationRecord>>, CalculatorServiceError> {
        Ok(self.store.subscribe(&user.uid)?)
    }

    /// Prices the answers and renders the downloadable estimate.
    pub fn export(
        &self,
        user: Option<&UserIdentity>,
        answers: &QuestionnaireAnswers,
        format: ExportFormat,
        metadata: &ReportMetadata,
    ) -> Result<ExportedDocument, CalculatorServiceError> {
        let estimate = self.estimate(answers);
        let report = EstimateReport::new(answers, &estimate, metadata);
        let document = report.render(metadata, format)?;

        if let Some(user) = user {
            self.record_activity(
                user,
                "report_exported",
                json!({
                    "format": format.extension(),
                    "fileName": document.file_name,
                }),
            );
        }
        Ok(document)
    }

    fn payload(&self, answers: QuestionnaireAnswers) -> CalculationPayload {
        let cost_breakdown = self.estimate(&answers);
        CalculationPayload {
            company_name: answers.display_company_name().to_string(),
            requirements: answers,
            cost_breakdown,
        }
    }

    fn record_activity(&self, user: &UserIdentity, action: &str, details: serde_json::Value) {
        let activity = UserActivity::new(user, action, ACTIVITY_PAGE, details);
        if let Err(error) = self.activity.publish(activity) {
            warn!(%error, action, "failed to record user activity");
        }
    }
}

/// Error raised by the calculator service.
#[derive(Debug, thiserror::Error)]
pub enum CalculatorServiceError {
    #[error("user must be authenticated")]
    NotSignedIn,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
