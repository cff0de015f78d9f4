use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a categorical questionnaire field with its documented codes.
///
/// Codes outside the documented set are preserved in `Other` so they survive a
/// round trip through exports and price at the neutral fallback.
macro_rules! option_set {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $code:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            /// Documented options in presentation order.
            pub fn known() -> Vec<$name> {
                vec![$($name::$variant),+]
            }

            pub fn code(&self) -> &str {
                match self {
                    $($name::$variant => $code,)+
                    $name::Other(code) => code.as_str(),
                }
            }

            pub fn label(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Other(code) => code.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $($code => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($code => $name::$variant,)+
                    _ => $name::Other(value),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(code) => code,
                    known => known.code().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

option_set! {
    /// Customer industry; drives the development multiplier.
    Industry {
        Manufacturing => "manufacturing", "Manufacturing";
        Retail => "retail", "Retail & E-commerce";
        Healthcare => "healthcare", "Healthcare";
        Finance => "finance", "Financial Services";
        Technology => "technology", "Technology";
        Education => "education", "Education";
        Government => "government", "Government";
        RealEstate => "real_estate", "Real Estate";
        Logistics => "logistics", "Logistics & Supply Chain";
        Energy => "energy", "Energy & Utilities";
    }
}

option_set! {
    /// Where the customer's data lives today.
    DataInfrastructure {
        Excel => "excel", "Primarily Excel Files";
        Sql => "sql", "SQL Server Databases";
        Cloud => "cloud", "Cloud Platforms (Azure, AWS, GCP)";
        Apis => "apis", "APIs & Web Services";
        Mixed => "mixed", "Mixed Environment";
        Hybrid => "hybrid", "Hybrid (On-Premise + Cloud)";
    }
}

option_set! {
    /// Desired delivery window.
    Timeline {
        Asap => "asap", "ASAP (Rush project)";
        OneToThreeMonths => "1-3-months", "1-3 months";
        ThreeToSixMonths => "3-6-months", "3-6 months";
        SixToTwelveMonths => "6-12-months", "6-12 months";
        OverTwelveMonths => "12-months+", "More than 12 months";
    }
}

option_set! {
    /// In-house IT capacity available to the project.
    ItTeamCapacity {
        NoTeam => "none", "No dedicated IT team";
        Limited => "limited", "Limited IT resources";
        Moderate => "moderate", "Moderate IT support";
        Extensive => "extensive", "Extensive IT team";
        Outsourced => "outsourced", "Outsourced IT services";
    }
}

option_set! {
    /// Deployment model for the reporting platform.
    DeploymentModel {
        Cloud => "cloud", "Cloud-First";
        OnPremise => "on_premise", "On-Premise";
        Hybrid => "hybrid", "Hybrid Approach";
    }
}

option_set! {
    DataVolume {
        Small => "small", "Small (< 1GB)";
        Medium => "medium", "Medium (1GB - 100GB)";
        Large => "large", "Large (100GB - 1TB)";
        VeryLarge => "very_large", "Very Large (1TB - 10TB)";
        Enterprise => "enterprise", "Enterprise (10TB+)";
    }
}

option_set! {
    /// Power BI licensing plan.
    LicenseType {
        Pro => "pro", "Power BI Pro ($10/user/month)";
        PremiumPerUser => "premium_per_user", "Power BI Premium Per User ($20/user/month)";
    }
}

option_set! {
    TrainingLevel {
        Basic => "basic", "Basic training (Online resources)";
        Standard => "standard", "Standard training (Virtual sessions)";
        Comprehensive => "comprehensive", "Comprehensive training (On-site + Virtual)";
        Enterprise => "enterprise", "Enterprise training (Custom curriculum)";
    }
}

/// Cost calculator questionnaire, one field per form input.
///
/// Missing keys fall back to the calculator's initial form state, so a partial
/// payload prices the same way the form does before the user edits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionnaireAnswers {
    // Company information
    pub company_name: String,
    pub industry: Industry,
    pub company_size: String,
    pub annual_revenue: String,

    // Users and licensing
    pub users: u32,
    #[serde(rename = "powerBILicenseType")]
    pub power_bi_license_type: LicenseType,
    pub premium_capacity: bool,

    // Data infrastructure
    pub data_infrastructure: DataInfrastructure,
    pub data_sources: u32,
    pub data_volume: DataVolume,
    pub update_frequency: String,
    pub cloud_vs_on_prem: DeploymentModel,

    // Reporting
    pub reports_count: u32,
    pub dashboard_complexity: String,
    pub custom_visuals: bool,
    pub mobile_reporting: bool,

    // Integration and connectivity
    pub system_integrations: Vec<String>,
    pub api_connections: u32,
    pub gateway_required: bool,

    // Security and compliance
    pub security_requirements: Vec<String>,
    pub compliance_needs: Vec<String>,
    pub row_level_security: bool,

    // Implementation
    pub it_team: ItTeamCapacity,
    pub timeline: Timeline,
    pub training: TrainingLevel,
    pub support_level: String,

    // Advanced features
    pub ai_features: bool,
    pub automated_insights: bool,
    pub data_flows: bool,
    pub paginated_reports: bool,

    // Infrastructure
    pub azure_services: Vec<String>,
    pub bandwidth_requirements: String,
    pub storage_needs: String,

    // Operations
    pub maintenance_level: String,
    pub monitoring_tools: bool,
    pub backup_strategy: String,

    // Geography
    pub multi_region: bool,
    pub international_users: u32,

    // Migration
    pub legacy_system_migration: bool,
    pub data_quality_issues: String,
    pub historical_data_migration: String,
}

impl Default for QuestionnaireAnswers {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            industry: Industry::Manufacturing,
            company_size: "51-200".to_string(),
            annual_revenue: "not_specified".to_string(),
            users: 50,
            power_bi_license_type: LicenseType::Pro,
            premium_capacity: false,
            data_infrastructure: DataInfrastructure::Sql,
            data_sources: 3,
            data_volume: DataVolume::Medium,
            update_frequency: "daily".to_string(),
            cloud_vs_on_prem: DeploymentModel::Hybrid,
            reports_count: 10,
            dashboard_complexity: "medium".to_string(),
            custom_visuals: false,
            mobile_reporting: false,
            system_integrations: Vec::new(),
            api_connections: 0,
            gateway_required: false,
            security_requirements: Vec::new(),
            compliance_needs: Vec::new(),
            row_level_security: false,
            it_team: ItTeamCapacity::Limited,
            timeline: Timeline::ThreeToSixMonths,
            training: TrainingLevel::Comprehensive,
            support_level: "standard".to_string(),
            ai_features: false,
            automated_insights: false,
            data_flows: false,
            paginated_reports: false,
            azure_services: Vec::new(),
            bandwidth_requirements: "standard".to_string(),
            storage_needs: "standard".to_string(),
            maintenance_level: "standard".to_string(),
            monitoring_tools: false,
            backup_strategy: "basic".to_string(),
            multi_region: false,
            international_users: 0,
            legacy_system_migration: false,
            data_quality_issues: "minimal".to_string(),
            historical_data_migration: "1-year".to_string(),
        }
    }
}

impl QuestionnaireAnswers {
    /// Distinct integration tags; repeated tags are counted once.
    pub fn integration_count(&self) -> u32 {
        distinct_count(&self.system_integrations)
    }

    pub fn security_requirement_count(&self) -> u32 {
        distinct_count(&self.security_requirements)
    }

    pub fn wants_comprehensive_training(&self) -> bool {
        self.training == TrainingLevel::Comprehensive
    }

    /// Display name for documents, defaulting when the form left it blank.
    pub fn display_company_name(&self) -> &str {
        let trimmed = self.company_name.trim();
        if trimmed.is_empty() {
            crate::workflows::export::DEFAULT_COMPANY_NAME
        } else {
            self.company_name.as_str()
        }
    }
}

fn distinct_count(tags: &[String]) -> u32 {
    let distinct: BTreeSet<&str> = tags.iter().map(String::as_str).collect();
    u32::try_from(distinct.len()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_codes_are_preserved_verbatim() {
        let industry = Industry::from("aerospace");
        assert_eq!(industry, Industry::Other("aerospace".to_string()));
        assert!(!industry.is_known());
        assert_eq!(String::from(industry), "aerospace");
    }

    #[test]
    fn missing_fields_fall_back_to_form_defaults() {
        let answers: QuestionnaireAnswers =
            serde_json::from_value(json!({ "users": 120, "timeline": "asap" }))
                .expect("partial answers parse");
        assert_eq!(answers.users, 120);
        assert_eq!(answers.timeline, Timeline::Asap);
        assert_eq!(answers.industry, Industry::Manufacturing);
        assert_eq!(answers.reports_count, 10);
        assert_eq!(answers.training, TrainingLevel::Comprehensive);
    }

    #[test]
    fn license_key_keeps_original_spelling() {
        let value = serde_json::to_value(QuestionnaireAnswers::default()).expect("serializes");
        assert_eq!(value["powerBILicenseType"], json!("pro"));
        assert_eq!(value["cloudVsOnPrem"], json!("hybrid"));
        assert_eq!(value["timeline"], json!("3-6-months"));
    }

    #[test]
    fn duplicate_tags_count_once() {
        let answers = QuestionnaireAnswers {
            system_integrations: vec!["erp".into(), "crm".into(), "erp".into()],
            ..QuestionnaireAnswers::default()
        };
        assert_eq!(answers.integration_count(), 2);
    }

    #[test]
    fn blank_company_name_uses_placeholder() {
        let mut answers = QuestionnaireAnswers::default();
        assert_eq!(answers.display_company_name(), "Your Company");
        answers.company_name = "Contoso".to_string();
        assert_eq!(answers.display_company_name(), "Contoso");
    }
}
