use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::PitchResponses;
use crate::workflows::export::{COMPANY_PAGE, DEFAULT_COMPANY_NAME};

pub const DEFAULT_INDUSTRY: &str = "your industry";
pub const DEFAULT_COMPANY_SIZE: &str = "Not specified";
pub const DEFAULT_TIMELINE: &str = "3-6-months";

/// Personalized slides generated from one set of questionnaire responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchDeck {
    pub company_name: String,
    pub slides: Vec<Slide>,
}

impl PitchDeck {
    pub fn slide(&self, id: &str) -> Option<&Slide> {
        self.slides.iter().find(|slide| slide.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub content: SlideContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum SlideContent {
    Title {
        heading: String,
        subtitle: String,
        summary: String,
        facts: Vec<Fact>,
    },
    Challenges {
        heading: String,
        challenges: Vec<Challenge>,
    },
    NextSteps {
        heading: String,
        steps: Vec<NextStep>,
        call_to_action: CallToAction,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub code: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextStep {
    pub title: String,
    pub description: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToAction {
    pub heading: String,
    pub message: String,
    pub link_label: String,
    pub link_url: String,
}

/// Display title for a challenge code; unknown codes are shown as given.
pub fn challenge_title(code: &str) -> &str {
    match code {
        "data_silos" => "Data Silos",
        "manual_reporting" => "Manual Reporting",
        "delayed_insights" => "Delayed Insights",
        "poor_data_quality" => "Poor Data Quality",
        "lack_visibility" => "Lack of Visibility",
        "complex_analysis" => "Complex Analysis",
        "no_self_service" => "No Self-Service",
        "compliance_issues" => "Compliance Issues",
        "scalability" => "Scalability Issues",
        other => other,
    }
}

/// Builds the deck. Unanswered questions fall back to neutral wording, so
/// this never fails; validate first when answers must be complete.
pub fn generate(responses: &PitchResponses) -> PitchDeck {
    let company_name = responses.text_or("company_name", DEFAULT_COMPANY_NAME);
    let industry = responses.text_or("industry", DEFAULT_INDUSTRY);
    let company_size = responses.text_or("company_size", DEFAULT_COMPANY_SIZE);
    let timeline = responses.text_or("timeline", DEFAULT_TIMELINE);
    let challenges = responses.choices("biggest_challenge");

    let mut slides = vec![title_slide(company_name, industry, company_size, timeline)];
    if !challenges.is_empty() {
        slides.push(challenges_slide(company_name, challenges));
    }
    slides.push(next_steps_slide(company_name, industry, timeline));

    debug!(company = company_name, slides = slides.len(), "pitch deck generated");
    PitchDeck {
        company_name: company_name.to_string(),
        slides,
    }
}

fn title_slide(company_name: &str, industry: &str, company_size: &str, timeline: &str) -> Slide {
    let industry = capitalize_first(industry);
    let heading = format!("Power BI Solution for {company_name}");

    Slide {
        id: "personalized_title".to_string(),
        title: heading.clone(),
        content: SlideContent::Title {
            heading,
            subtitle: format!("Tailored Business Intelligence for {industry}"),
            summary: "A comprehensive Power BI implementation strategy designed specifically \
                      for your business needs and challenges."
                .to_string(),
            facts: vec![
                fact("Industry", &industry),
                fact("Company Size", company_size),
                fact("Timeline", &display_timeline(timeline)),
            ],
        },
    }
}

fn challenges_slide(company_name: &str, codes: &[String]) -> Slide {
    let challenges = codes
        .iter()
        .map(|code| Challenge {
            code: code.clone(),
            title: challenge_title(code).to_string(),
        })
        .collect();

    Slide {
        id: "personalized_challenges".to_string(),
        title: "Your Data Challenges".to_string(),
        content: SlideContent::Challenges {
            heading: format!("Challenges Power BI Will Address for {company_name}"),
            challenges,
        },
    }
}

fn next_steps_slide(company_name: &str, industry: &str, timeline: &str) -> Slide {
    Slide {
        id: "personalized_next_steps".to_string(),
        title: "Next Steps".to_string(),
        content: SlideContent::NextSteps {
            heading: "Your Personalized Next Steps".to_string(),
            steps: vec![
                NextStep {
                    title: "Discovery Workshop".to_string(),
                    description: format!(
                        "Deep dive into your {industry} specific requirements and current data landscape"
                    ),
                    duration: "2-3 days".to_string(),
                },
                NextStep {
                    title: "Proof of Concept".to_string(),
                    description:
                        "Build a working prototype using your actual data to demonstrate value"
                            .to_string(),
                    duration: "2-3 weeks".to_string(),
                },
                NextStep {
                    title: "Full Implementation".to_string(),
                    description: "Complete rollout with training and support for your team"
                        .to_string(),
                    duration: display_timeline(timeline),
                },
            ],
            call_to_action: CallToAction {
                heading: format!("Ready to Transform {company_name}'s Data Strategy?"),
                message: "Let's discuss how Power BI can address your specific challenges and \
                          deliver measurable results."
                    .to_string(),
                link_label: "Learn More About Our Services".to_string(),
                link_url: COMPANY_PAGE.to_string(),
            },
        },
    }
}

fn fact(label: &str, value: &str) -> Fact {
    Fact {
        label: label.to_string(),
        value: value.to_string(),
    }
}

/// Only the first dash becomes a space: `3-6-months` reads `3 6-months`.
fn display_timeline(timeline: &str) -> String {
    timeline.replacen('-', " ", 1)
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
