//! Shared plumbing for downloadable documents: attribution block, timestamp
//! encoding, and the rendered file handed to callers.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

pub const DEVELOPED_BY: &str = "Mirko - M365 Summit";
pub const LINKEDIN_PROFILE: &str = "https://www.linkedin.com/in/m365-summit/";
pub const COMPANY_PAGE: &str = "https://www.linkedin.com/school/m365-show/";

/// Fallback company name used when the questionnaire leaves it blank.
pub const DEFAULT_COMPANY_NAME: &str = "Your Company";

/// Fixed attribution fields stamped on every exported document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub developed_by: String,
    pub linkedin_profile: String,
    pub company_page: String,
}

impl Default for Attribution {
    fn default() -> Self {
        Self {
            developed_by: DEVELOPED_BY.to_string(),
            linkedin_profile: LINKEDIN_PROFILE.to_string(),
            company_page: COMPANY_PAGE.to_string(),
        }
    }
}

/// Generation context for a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub attribution: Attribution,
}

impl ReportMetadata {
    /// Timestamps are truncated to milliseconds, the precision of the wire format.
    pub fn at(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at: generated_at.trunc_subsecs(3),
            attribution: Attribution::default(),
        }
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn file_name(&self, stem: &str, format: ExportFormat) -> String {
        format!(
            "{stem}-{}.{}",
            self.generated_at.timestamp_millis(),
            format.extension()
        )
    }
}

/// Output encodings offered for exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(self) -> mime::Mime {
        match self {
            ExportFormat::Json => mime::APPLICATION_JSON,
            ExportFormat::Csv => mime::TEXT_CSV,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Rendered document ready to be downloaded or written to disk.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub content_type: mime::Mime,
    pub body: Vec<u8>,
}

impl ExportedDocument {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }

    pub fn write_to(&self, directory: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(directory)?;
        let path = directory.join(&self.file_name);
        fs::write(&path, &self.body)?;
        Ok(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to encode report as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode report as CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush report buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} export is not supported for this document")]
    Unsupported(&'static str),
}

/// `generatedAt` encoding: ISO-8601 UTC with millisecond precision and a `Z` suffix.
pub(crate) mod iso_millis {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|value| value.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
