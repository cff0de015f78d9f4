//! Fixed pitch questionnaire: six groups asked one question at a time.

use std::fmt;

use serde::Serialize;

use super::domain::{PitchResponses, ResponseValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Textarea,
    Select,
    Multiselect,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestionKind::Text => "text",
            QuestionKind::Textarea => "textarea",
            QuestionKind::Select => "select",
            QuestionKind::Multiselect => "multiselect",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub kind: QuestionKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "has_no_options")]
    pub options: &'static [QuestionOption],
}

fn has_no_options(options: &&'static [QuestionOption]) -> bool {
    options.is_empty()
}

impl Question {
    pub fn accepts(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionGroup {
    pub id: &'static str,
    pub title: &'static str,
    pub questions: &'static [Question],
}

const fn opt(value: &'static str, label: &'static str) -> QuestionOption {
    QuestionOption { value, label }
}

const fn text(
    id: &'static str,
    prompt: &'static str,
    required: bool,
    placeholder: &'static str,
) -> Question {
    Question {
        id,
        prompt,
        kind: QuestionKind::Text,
        required,
        placeholder: Some(placeholder),
        options: &[],
    }
}

const fn select(
    id: &'static str,
    prompt: &'static str,
    required: bool,
    options: &'static [QuestionOption],
) -> Question {
    Question {
        id,
        prompt,
        kind: QuestionKind::Select,
        required,
        placeholder: None,
        options,
    }
}

const fn multiselect(
    id: &'static str,
    prompt: &'static str,
    required: bool,
    options: &'static [QuestionOption],
) -> Question {
    Question {
        id,
        prompt,
        kind: QuestionKind::Multiselect,
        required,
        placeholder: None,
        options,
    }
}

const INDUSTRY_OPTIONS: &[QuestionOption] = &[
    opt("manufacturing", "Manufacturing"),
    opt("retail", "Retail & E-commerce"),
    opt("healthcare", "Healthcare"),
    opt("finance", "Financial Services"),
    opt("technology", "Technology"),
    opt("education", "Education"),
    opt("government", "Government"),
    opt("real_estate", "Real Estate"),
    opt("logistics", "Logistics & Supply Chain"),
    opt("energy", "Energy & Utilities"),
    opt("other", "Other"),
];

const COMPANY_SIZE_OPTIONS: &[QuestionOption] = &[
    opt("1-50", "1-50 employees"),
    opt("51-200", "51-200 employees"),
    opt("201-500", "201-500 employees"),
    opt("501-1000", "501-1,000 employees"),
    opt("1001-5000", "1,001-5,000 employees"),
    opt("5000+", "5,000+ employees"),
];

const ANNUAL_REVENUE_OPTIONS: &[QuestionOption] = &[
    opt("under_1m", "Under $1M"),
    opt("1m_10m", "$1M - $10M"),
    opt("10m_50m", "$10M - $50M"),
    opt("50m_100m", "$50M - $100M"),
    opt("100m_500m", "$100M - $500M"),
    opt("500m_1b", "$500M - $1B"),
    opt("1b+", "$1B+"),
    opt("prefer_not_say", "Prefer not to say"),
];

const BIGGEST_CHALLENGE_OPTIONS: &[QuestionOption] = &[
    opt("data_silos", "Data scattered across multiple systems"),
    opt("manual_reporting", "Too much manual report generation"),
    opt("delayed_insights", "Delayed access to critical insights"),
    opt("poor_data_quality", "Poor data quality and consistency"),
    opt("lack_visibility", "Lack of real-time visibility"),
    opt("complex_analysis", "Complex analysis takes too long"),
    opt("no_self_service", "No self-service analytics for users"),
    opt("compliance_issues", "Compliance and governance issues"),
    opt("scalability", "Current solution doesn't scale"),
];

const CURRENT_TOOLS_OPTIONS: &[QuestionOption] = &[
    opt("excel", "Microsoft Excel"),
    opt("access", "Microsoft Access"),
    opt("sql_server", "SQL Server Reporting Services"),
    opt("tableau", "Tableau"),
    opt("qlik", "QlikView/QlikSense"),
    opt("looker", "Looker"),
    opt("custom_built", "Custom-built solutions"),
    opt("none", "No formal BI tools"),
    opt("other", "Other"),
];

const PAIN_POINTS_OPTIONS: &[QuestionOption] = &[
    opt("0-5", "0-5 hours"),
    opt("6-15", "6-15 hours"),
    opt("16-30", "16-30 hours"),
    opt("31-50", "31-50 hours"),
    opt("50+", "More than 50 hours"),
];

const DATA_SOURCES_OPTIONS: &[QuestionOption] = &[
    opt("sql_server", "SQL Server"),
    opt("oracle", "Oracle"),
    opt("mysql", "MySQL"),
    opt("excel_files", "Excel Files"),
    opt("sharepoint", "SharePoint"),
    opt("dynamics", "Dynamics 365"),
    opt("salesforce", "Salesforce"),
    opt("azure_cloud", "Azure Cloud Services"),
    opt("aws", "AWS"),
    opt("google_cloud", "Google Cloud"),
    opt("web_apis", "Web APIs"),
    opt("erp_systems", "ERP Systems"),
    opt("crm_systems", "CRM Systems"),
    opt("other", "Other"),
];

const DATA_VOLUME_OPTIONS: &[QuestionOption] = &[
    opt("small", "Small (< 1GB)"),
    opt("medium", "Medium (1GB - 100GB)"),
    opt("large", "Large (100GB - 1TB)"),
    opt("very_large", "Very Large (1TB - 10TB)"),
    opt("enterprise", "Enterprise (10TB+)"),
];

const UPDATE_FREQUENCY_OPTIONS: &[QuestionOption] = &[
    opt("real_time", "Real-time"),
    opt("hourly", "Hourly"),
    opt("daily", "Daily"),
    opt("weekly", "Weekly"),
    opt("monthly", "Monthly"),
    opt("quarterly", "Quarterly"),
];

const KEY_METRICS_OPTIONS: &[QuestionOption] = &[
    opt("revenue", "Revenue & Sales Performance"),
    opt("profitability", "Profitability & Cost Analysis"),
    opt("customer_metrics", "Customer Metrics & Satisfaction"),
    opt("operational_efficiency", "Operational Efficiency"),
    opt("inventory", "Inventory Management"),
    opt("financial_kpis", "Financial KPIs"),
    opt("hr_metrics", "HR & Employee Metrics"),
    opt("marketing_roi", "Marketing ROI"),
    opt("quality_metrics", "Quality & Compliance Metrics"),
    opt("supply_chain", "Supply Chain Performance"),
];

const USER_TYPES_OPTIONS: &[QuestionOption] = &[
    opt("executives", "Executives & C-Level"),
    opt("managers", "Department Managers"),
    opt("analysts", "Business Analysts"),
    opt("finance", "Finance Team"),
    opt("sales", "Sales Team"),
    opt("marketing", "Marketing Team"),
    opt("operations", "Operations Team"),
    opt("hr", "HR Team"),
    opt("it", "IT Team"),
    opt("field_staff", "Field Staff"),
];

const REPORTING_NEEDS_OPTIONS: &[QuestionOption] = &[
    opt("executive_dashboards", "Executive Dashboards"),
    opt("operational_reports", "Operational Reports"),
    opt("financial_reports", "Financial Reports"),
    opt("sales_reports", "Sales Reports"),
    opt("customer_reports", "Customer Reports"),
    opt("inventory_reports", "Inventory Reports"),
    opt("compliance_reports", "Compliance Reports"),
    opt("ad_hoc_analysis", "Ad-hoc Analysis"),
    opt("scheduled_reports", "Scheduled Reports"),
    opt("mobile_reports", "Mobile Reports"),
];

const TIMELINE_OPTIONS: &[QuestionOption] = &[
    opt("asap", "ASAP (Rush project)"),
    opt("1-3-months", "1-3 months"),
    opt("3-6-months", "3-6 months"),
    opt("6-12-months", "6-12 months"),
    opt("12-months+", "More than 12 months"),
    opt("flexible", "Flexible timeline"),
];

const BUDGET_RANGE_OPTIONS: &[QuestionOption] = &[
    opt("under_25k", "Under $25,000"),
    opt("25k-50k", "$25,000 - $50,000"),
    opt("50k-100k", "$50,000 - $100,000"),
    opt("100k-250k", "$100,000 - $250,000"),
    opt("250k-500k", "$250,000 - $500,000"),
    opt("500k+", "$500,000+"),
    opt("not_determined", "Not yet determined"),
];

const SUCCESS_CRITERIA_OPTIONS: &[QuestionOption] = &[
    opt("time_savings", "Time savings in reporting"),
    opt("faster_decisions", "Faster decision making"),
    opt("improved_accuracy", "Improved data accuracy"),
    opt("cost_reduction", "Cost reduction"),
    opt("revenue_increase", "Revenue increase"),
    opt("user_adoption", "High user adoption"),
    opt("self_service", "Self-service capabilities"),
    opt("compliance", "Better compliance"),
    opt("scalability", "Scalability for growth"),
];

const IT_SUPPORT_OPTIONS: &[QuestionOption] = &[
    opt("none", "No dedicated IT support"),
    opt("limited", "Limited IT resources"),
    opt("moderate", "Moderate IT support"),
    opt("extensive", "Extensive IT team"),
    opt("outsourced", "Outsourced IT services"),
];

const INTEGRATION_NEEDS_OPTIONS: &[QuestionOption] = &[
    opt("erp", "ERP Systems"),
    opt("crm", "CRM Systems"),
    opt("hr_systems", "HR Systems"),
    opt("accounting", "Accounting Software"),
    opt("inventory", "Inventory Management"),
    opt("ecommerce", "E-commerce Platforms"),
    opt("marketing_tools", "Marketing Tools"),
    opt("custom_apps", "Custom Applications"),
    opt("none", "No integration needed"),
];

const SECURITY_REQUIREMENTS_OPTIONS: &[QuestionOption] = &[
    opt("gdpr", "GDPR Compliance"),
    opt("hipaa", "HIPAA Compliance"),
    opt("sox", "SOX Compliance"),
    opt("iso27001", "ISO 27001"),
    opt("row_level_security", "Row-level Security"),
    opt("single_sign_on", "Single Sign-On (SSO)"),
    opt("data_encryption", "Data Encryption"),
    opt("audit_trails", "Audit Trails"),
    opt("none", "No specific requirements"),
];

static QUESTION_GROUPS: &[QuestionGroup] = &[
    QuestionGroup {
        id: "company_info",
        title: "Company Information",
        questions: &[
            text(
                "company_name",
                "What is your company name?",
                true,
                "e.g., Acme Corporation",
            ),
            select(
                "industry",
                "What industry are you in?",
                true,
                INDUSTRY_OPTIONS,
            ),
            select(
                "company_size",
                "How many employees does your company have?",
                true,
                COMPANY_SIZE_OPTIONS,
            ),
            select(
                "annual_revenue",
                "What is your approximate annual revenue?",
                false,
                ANNUAL_REVENUE_OPTIONS,
            ),
        ],
    },
    QuestionGroup {
        id: "current_challenges",
        title: "Current Data Challenges",
        questions: &[
            multiselect(
                "biggest_challenge",
                "What is your biggest data-related challenge?",
                true,
                BIGGEST_CHALLENGE_OPTIONS,
            ),
            multiselect(
                "current_tools",
                "What tools are you currently using for reporting and analytics?",
                true,
                CURRENT_TOOLS_OPTIONS,
            ),
            select(
                "pain_points",
                "How much time does your team spend on manual data preparation weekly?",
                true,
                PAIN_POINTS_OPTIONS,
            ),
        ],
    },
    QuestionGroup {
        id: "data_environment",
        title: "Data Environment & Infrastructure",
        questions: &[
            multiselect(
                "data_sources",
                "What are your primary data sources?",
                true,
                DATA_SOURCES_OPTIONS,
            ),
            select(
                "data_volume",
                "What is your approximate data volume?",
                true,
                DATA_VOLUME_OPTIONS,
            ),
            select(
                "update_frequency",
                "How often does your data need to be updated?",
                true,
                UPDATE_FREQUENCY_OPTIONS,
            ),
        ],
    },
    QuestionGroup {
        id: "requirements",
        title: "Business Requirements",
        questions: &[
            multiselect(
                "key_metrics",
                "What are your most important business metrics to track?",
                true,
                KEY_METRICS_OPTIONS,
            ),
            multiselect(
                "user_types",
                "Who will be the primary users of the BI solution?",
                true,
                USER_TYPES_OPTIONS,
            ),
            multiselect(
                "reporting_needs",
                "What types of reports do you need?",
                true,
                REPORTING_NEEDS_OPTIONS,
            ),
        ],
    },
    QuestionGroup {
        id: "project_details",
        title: "Project Details & Timeline",
        questions: &[
            select(
                "timeline",
                "What is your desired timeline for implementation?",
                true,
                TIMELINE_OPTIONS,
            ),
            select(
                "budget_range",
                "What is your approximate budget range?",
                false,
                BUDGET_RANGE_OPTIONS,
            ),
            multiselect(
                "success_criteria",
                "How will you measure the success of this BI implementation?",
                true,
                SUCCESS_CRITERIA_OPTIONS,
            ),
            select(
                "it_support",
                "What level of IT support do you have available?",
                true,
                IT_SUPPORT_OPTIONS,
            ),
        ],
    },
    QuestionGroup {
        id: "additional_info",
        title: "Additional Information",
        questions: &[
            multiselect(
                "integration_needs",
                "Do you need integration with existing systems?",
                false,
                INTEGRATION_NEEDS_OPTIONS,
            ),
            multiselect(
                "security_requirements",
                "What security and compliance requirements do you have?",
                false,
                SECURITY_REQUIREMENTS_OPTIONS,
            ),
            Question {
                id: "additional_comments",
                prompt: "Any additional comments or specific requirements?",
                kind: QuestionKind::Textarea,
                required: false,
                placeholder: Some(
                    "Please share any additional information that would help us create a more personalized pitch...",
                ),
                options: &[],
            },
        ],
    },
];

pub fn groups() -> &'static [QuestionGroup] {
    QUESTION_GROUPS
}

/// Every question in the order it is asked.
pub fn questions() -> impl Iterator<Item = &'static Question> {
    QUESTION_GROUPS
        .iter()
        .flat_map(|group| group.questions.iter())
}

pub fn find(id: &str) -> Option<&'static Question> {
    questions().find(|question| question.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ResponseIssue {
    Missing {
        question: &'static str,
    },
    UnknownOption {
        question: &'static str,
        value: String,
    },
    WrongKind {
        question: &'static str,
        expected: QuestionKind,
    },
}

impl fmt::Display for ResponseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseIssue::Missing { question } => write!(f, "{question} is required"),
            ResponseIssue::UnknownOption { question, value } => {
                write!(f, "{question} has no option '{value}'")
            }
            ResponseIssue::WrongKind { question, expected } => {
                write!(f, "{question} expects a {expected} answer")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} questionnaire answer(s) need attention: {}", .issues.len(), summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<ResponseIssue>,
}

fn summarize(issues: &[ResponseIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks required answers and option codes against the catalog.
///
/// Answers to questions outside the catalog are kept as-is and not checked.
pub fn validate(responses: &PitchResponses) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    for question in questions() {
        let Some(value) = responses.get(question.id).filter(|value| !value.is_blank()) else {
            if question.required {
                issues.push(ResponseIssue::Missing {
                    question: question.id,
                });
            }
            continue;
        };

        match (question.kind, value) {
            (QuestionKind::Text | QuestionKind::Textarea, ResponseValue::Text(_)) => {}
            (QuestionKind::Select, ResponseValue::Text(choice)) => {
                if !question.accepts(choice) {
                    issues.push(ResponseIssue::UnknownOption {
                        question: question.id,
                        value: choice.clone(),
                    });
                }
            }
            (QuestionKind::Multiselect, ResponseValue::Choices(choices)) => {
                issues.extend(
                    choices
                        .iter()
                        .filter(|choice| !question.accepts(choice))
                        .map(|choice| ResponseIssue::UnknownOption {
                            question: question.id,
                            value: choice.clone(),
                        }),
                );
            }
            (expected, _) => issues.push(ResponseIssue::WrongKind {
                question: question.id,
                expected,
            }),
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_six_groups_and_unique_ids() {
        assert_eq!(groups().len(), 6);
        let ids: Vec<_> = questions().map(|question| question.id).collect();
        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(ids.first(), Some(&"company_name"));
        assert_eq!(ids.last(), Some(&"additional_comments"));
    }

    #[test]
    fn choice_questions_carry_options() {
        for question in questions() {
            let has_options = !question.options.is_empty();
            let is_choice = matches!(question.kind, QuestionKind::Select | QuestionKind::Multiselect);
            assert_eq!(has_options, is_choice, "{}", question.id);
        }
    }

    #[test]
    fn lookup_by_id() {
        let industry = find("industry").expect("industry question");
        assert!(industry.accepts("other"));
        assert!(!industry.accepts("aerospace"));
        assert!(find("favourite_colour").is_none());
    }
}
