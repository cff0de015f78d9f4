use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::PitchResponses;
use crate::workflows::export::{
    iso_millis, Attribution, ExportFormat, ExportedDocument, ReportError, ReportMetadata,
    DEFAULT_COMPANY_NAME,
};

pub const PITCH_DECK_FILE_STEM: &str = "powerbi-pitch-deck";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchCompanyInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Downloadable proposal: the raw responses plus attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchDeckReport {
    pub company_info: PitchCompanyInfo,
    pub responses: PitchResponses,
    #[serde(with = "iso_millis")]
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub attribution: Attribution,
}

impl PitchDeckReport {
    pub fn new(responses: &PitchResponses, metadata: &ReportMetadata) -> Self {
        Self {
            company_info: PitchCompanyInfo {
                name: responses
                    .text_or("company_name", DEFAULT_COMPANY_NAME)
                    .to_string(),
                industry: responses.text("industry").map(str::to_string),
                size: responses.text("company_size").map(str::to_string),
            },
            responses: responses.clone(),
            generated_at: metadata.generated_at,
            attribution: metadata.attribution.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Proposals are only offered as JSON.
    pub fn render(
        &self,
        metadata: &ReportMetadata,
        format: ExportFormat,
    ) -> Result<ExportedDocument, ReportError> {
        match format {
            ExportFormat::Json => Ok(ExportedDocument {
                file_name: metadata.file_name(PITCH_DECK_FILE_STEM, format),
                content_type: format.content_type(),
                body: self.to_json()?.into_bytes(),
            }),
            ExportFormat::Csv => Err(ReportError::Unsupported("csv")),
        }
    }
}
