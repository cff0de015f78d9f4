use crate::infra::{load_engine, parse_export_format, read_json_file, Services};
use clap::Args;
use powerbi_advisor::config::AppConfig;
use powerbi_advisor::error::AppError;
use powerbi_advisor::workflows::estimation::{CostEstimate, QuestionnaireAnswers};
use powerbi_advisor::workflows::export::{ExportFormat, ReportMetadata};
use powerbi_advisor::workflows::pitch_deck::{PitchDeck, PitchResponses, SlideContent};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct EstimateArgs {
    /// Questionnaire answers as JSON. Missing fields use the form defaults.
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
    /// Write the estimate report in this format (json or csv)
    #[arg(long, value_parser = parse_export_format)]
    pub(crate) export: Option<ExportFormat>,
    /// Directory for exported files (defaults to APP_EXPORT_DIR)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct PitchArgs {
    /// Pitch questionnaire responses as JSON keyed by question id
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Write the proposal document next to the printed deck
    #[arg(long)]
    pub(crate) export: bool,
    /// Directory for exported files (defaults to APP_EXPORT_DIR)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let EstimateArgs {
        answers,
        export,
        out,
    } = args;

    let config = AppConfig::load()?;
    let services = Services::in_memory(load_engine(&config.estimation)?);
    let answers: QuestionnaireAnswers = match answers {
        Some(path) => read_json_file(&path)?,
        None => QuestionnaireAnswers::default(),
    };

    let estimate = services.calculator.estimate(&answers);
    render_estimate(answers.display_company_name(), &estimate);

    if let Some(format) = export {
        let document =
            services
                .calculator
                .export(None, &answers, format, &ReportMetadata::now())?;
        let directory = out.unwrap_or(config.estimation.export_dir);
        let path = document.write_to(&directory)?;
        println!("\nReport written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_pitch(args: PitchArgs) -> Result<(), AppError> {
    let PitchArgs {
        responses,
        export,
        out,
    } = args;

    let config = AppConfig::load()?;
    let services = Services::in_memory(load_engine(&config.estimation)?);
    let responses: PitchResponses = read_json_file(&responses)?;

    let deck = services.pitch_decks.generate(&responses)?;
    render_deck(&deck);

    if export {
        let document = services
            .pitch_decks
            .export(None, &responses, &ReportMetadata::now())?;
        let directory = out.unwrap_or(config.estimation.export_dir);
        let path = document.write_to(&directory)?;
        println!("\nProposal written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_rules() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = load_engine(&config.estimation)?;
    let rendered = serde_json::to_string_pretty(engine.rules())
        .map_err(|err| AppError::Input(format!("failed to render rules table ({err})")))?;
    println!("{rendered}");
    Ok(())
}

fn render_estimate(company: &str, estimate: &CostEstimate) {
    println!("Power BI cost estimate for {company}");
    println!("  Package tier:      {}", estimate.package_tier);
    println!("  Licensing:         ${}", estimate.licensing_costs);
    println!("  Development:       ${}", estimate.development_costs);
    println!("  Training:          ${}", estimate.training_costs);
    println!("  Infrastructure:    ${}", estimate.infrastructure_costs);
    println!("  Maintenance:       ${}", estimate.maintenance_costs);
    println!("  Total investment:  ${}", estimate.total_costs);
    println!("  Timeline:          {} weeks", estimate.timeline_weeks);
    println!("  Projected ROI:     {}%", estimate.roi);
}

fn render_deck(deck: &PitchDeck) {
    println!("Pitch deck for {}", deck.company_name);
    for (index, slide) in deck.slides.iter().enumerate() {
        println!("\n{}. {}", index + 1, slide.title);
        match &slide.content {
            SlideContent::Title {
                subtitle, facts, ..
            } => {
                println!("   {subtitle}");
                for fact in facts {
                    println!("   - {}: {}", fact.label, fact.value);
                }
            }
            SlideContent::Challenges {
                heading,
                challenges,
            } => {
                println!("   {heading}");
                for challenge in challenges {
                    println!("   - {}", challenge.title);
                }
            }
            SlideContent::NextSteps {
                steps,
                call_to_action,
                ..
            } => {
                for step in steps {
                    println!("   - {} ({}): {}", step.title, step.duration, step.description);
                }
                println!("   {} {}", call_to_action.link_label, call_to_action.link_url);
            }
        }
    }
}
