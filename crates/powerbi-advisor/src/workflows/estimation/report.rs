use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Industry, QuestionnaireAnswers};
use super::engine::CostEstimate;
use crate::workflows::export::{
    iso_millis, Attribution, ExportFormat, ExportedDocument, ReportError, ReportMetadata,
};

pub const ESTIMATE_FILE_STEM: &str = "powerbi-cost-estimate";

/// Company identity block at the top of an exported estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub industry: Industry,
    pub size: String,
    pub users: u32,
}

/// Downloadable cost estimate: inputs, outputs, and attribution, untransformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport {
    pub company_info: CompanyInfo,
    pub cost_breakdown: CostEstimate,
    pub requirements: QuestionnaireAnswers,
    #[serde(with = "iso_millis")]
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub attribution: Attribution,
}

impl EstimateReport {
    pub fn new(
        answers: &QuestionnaireAnswers,
        estimate: &CostEstimate,
        metadata: &ReportMetadata,
    ) -> Self {
        Self {
            company_info: CompanyInfo {
                name: answers.display_company_name().to_string(),
                industry: answers.industry.clone(),
                size: answers.company_size.clone(),
                users: answers.users,
            },
            cost_breakdown: estimate.clone(),
            requirements: answers.clone(),
            generated_at: metadata.generated_at,
            attribution: metadata.attribution.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Flat `section,item,value` rows of the cost breakdown.
    pub fn to_csv(&self) -> Result<Vec<u8>, ReportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["section", "item", "value"])?;

        let company = &self.company_info;
        let users = company.users.to_string();
        writer.write_record(["company", "name", company.name.as_str()])?;
        writer.write_record(["company", "industry", company.industry.code()])?;
        writer.write_record(["company", "size", company.size.as_str()])?;
        writer.write_record(["company", "users", users.as_str()])?;

        let costs = &self.cost_breakdown;
        let rows = [
            ("licensingCosts", costs.licensing_costs.to_string()),
            ("developmentCosts", costs.development_costs.to_string()),
            ("trainingCosts", costs.training_costs.to_string()),
            ("infrastructureCosts", costs.infrastructure_costs.to_string()),
            ("maintenanceCosts", costs.maintenance_costs.to_string()),
            ("totalCosts", costs.total_costs.to_string()),
            ("timeline", costs.timeline_weeks.to_string()),
            ("roi", costs.roi.to_string()),
            ("packageTier", costs.package_tier.to_string()),
        ];
        for (item, value) in &rows {
            writer.write_record(["costBreakdown", *item, value.as_str()])?;
        }

        let generated_at = self
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        writer.write_record(["meta", "generatedAt", generated_at.as_str()])?;
        writer.write_record(["meta", "developedBy", self.attribution.developed_by.as_str()])?;

        writer
            .into_inner()
            .map_err(|err| ReportError::Io(err.into_error()))
    }

    pub fn render(
        &self,
        metadata: &ReportMetadata,
        format: ExportFormat,
    ) -> Result<ExportedDocument, ReportError> {
        let body = match format {
            ExportFormat::Json => self.to_json()?.into_bytes(),
            ExportFormat::Csv => self.to_csv()?,
        };

        Ok(ExportedDocument {
            file_name: metadata.file_name(ESTIMATE_FILE_STEM, format),
            content_type: format.content_type(),
            body,
        })
    }
}

/// Packages inputs and outputs into the downloadable estimate document.
pub fn serialize(
    answers: &QuestionnaireAnswers,
    estimate: &CostEstimate,
    metadata: &ReportMetadata,
) -> EstimateReport {
    EstimateReport::new(answers, estimate, metadata)
}
