use crate::commands::{run_estimate, run_pitch, run_rules, EstimateArgs, PitchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use powerbi_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Power BI Advisor",
    about = "Price Power BI engagements and build tailored pitch decks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a questionnaire and optionally export the estimate report
    Estimate(EstimateArgs),
    /// Build a pitch deck from questionnaire responses
    Pitch(PitchArgs),
    /// Print the active pricing rules table
    Rules,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args),
        Command::Pitch(args) => run_pitch(args),
        Command::Rules => run_rules(),
    }
}
