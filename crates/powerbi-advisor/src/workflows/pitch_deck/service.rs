use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::domain::PitchResponses;
use super::questionnaire::{self, QuestionGroup, ValidationError};
use super::report::PitchDeckReport;
use super::slides::{self, PitchDeck};
use crate::workflows::accounts::{
    ActivityPublisher, RecordStore, StoreError, StoredRecord, UserActivity, UserIdentity,
};
use crate::workflows::export::{ExportFormat, ExportedDocument, ReportError, ReportMetadata};

const ACTIVITY_PAGE: &str = "pitch-deck";

/// Saved proposal: the responses and the deck generated from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchDeckPayload {
    pub company_name: String,
    pub responses: PitchResponses,
    pub deck: PitchDeck,
}

pub type PitchDeckRecord = StoredRecord<PitchDeckPayload>;

pub struct PitchDeckService<S, P> {
    store: Arc<S>,
    activity: Arc<P>,
}

impl<S, P> PitchDeckService<S, P>
where
    S: RecordStore<PitchDeckPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    pub fn new(store: Arc<S>, activity: Arc<P>) -> Self {
        Self { store, activity }
    }

    pub fn questions(&self) -> &'static [QuestionGroup] {
        questionnaire::groups()
    }

    /// Validates the responses and builds the deck.
    pub fn generate(&self, responses: &PitchResponses) -> Result<PitchDeck, PitchDeckServiceError> {
        questionnaire::validate(responses)?;
        Ok(slides::generate(responses))
    }

    pub fn save(
        &self,
        user: Option<&UserIdentity>,
        responses: PitchResponses,
    ) -> Result<PitchDeckRecord, PitchDeckServiceError> {
        let user = user.ok_or(PitchDeckServiceError::NotSignedIn)?;
        let deck = self.generate(&responses)?;
        let payload = PitchDeckPayload {
            company_name: deck.company_name.clone(),
            responses,
            deck,
        };
        let record = self.store.create(user, payload)?;

        info!(id = %record.id, uid = %user.uid.0, "pitch deck saved");
        self.record_activity(
            user,
            "pitch_deck_saved",
            json!({
                "pitchDeckId": record.id.0,
                "companyName": record.payload.company_name,
            }),
        );
        Ok(record)
    }

    pub fn history(
        &self,
        user: Option<&UserIdentity>,
    ) -> Result<Vec<PitchDeckRecord>, PitchDeckServiceError> {
        match user {
            Some(user) => Ok(self.store.list(&user.uid)?),
            None => Ok(Vec::new()),
        }
    }

    /// Renders the proposal download. Responses are exported as given.
    pub fn export(
        &self,
        user: Option<&UserIdentity>,
        responses: &PitchResponses,
        metadata: &ReportMetadata,
    ) -> Result<ExportedDocument, PitchDeckServiceError> {
        let document =
            PitchDeckReport::new(responses, metadata).render(metadata, ExportFormat::Json)?;

        if let Some(user) = user {
            self.record_activity(
                user,
                "pitch_deck_exported",
                json!({ "fileName": document.file_name }),
            );
        }
        Ok(document)
    }

    fn record_activity(&self, user: &UserIdentity, action: &str, details: serde_json::Value) {
        let activity = UserActivity::new(user, action, ACTIVITY_PAGE, details);
        if let Err(error) = self.activity.publish(activity) {
            warn!(%error, action, "failed to record user activity");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PitchDeckServiceError {
    #[error("user must be authenticated")]
    NotSignedIn,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
