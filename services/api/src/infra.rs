use metrics_exporter_prometheus::PrometheusHandle;
use powerbi_advisor::config::EstimationConfig;
use powerbi_advisor::error::AppError;
use powerbi_advisor::workflows::accounts::{
    AuthProvider, InMemoryActivityLog, InMemoryAuthProvider, InMemoryRecordStore,
};
use powerbi_advisor::workflows::estimation::{
    CalculationPayload, CalculatorService, EstimationEngine, RulesTable,
};
use powerbi_advisor::workflows::export::ExportFormat;
use powerbi_advisor::workflows::pitch_deck::{PitchDeckPayload, PitchDeckService};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type CalculationStore = InMemoryRecordStore<CalculationPayload>;
pub(crate) type PitchDeckStore = InMemoryRecordStore<PitchDeckPayload>;
pub(crate) type Calculator = CalculatorService<CalculationStore, InMemoryActivityLog>;
pub(crate) type PitchDecks = PitchDeckService<PitchDeckStore, InMemoryActivityLog>;

/// In-memory collaborators shared by every route. One session per process.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) auth: Arc<dyn AuthProvider>,
    pub(crate) calculator: Arc<Calculator>,
    pub(crate) pitch_decks: Arc<PitchDecks>,
}

impl Services {
    pub(crate) fn in_memory(engine: EstimationEngine) -> Self {
        let activity = Arc::new(InMemoryActivityLog::new());
        let calculator = CalculatorService::new(
            Arc::new(engine),
            Arc::new(InMemoryRecordStore::new("calculation")),
            activity.clone(),
        );
        let pitch_decks =
            PitchDeckService::new(Arc::new(InMemoryRecordStore::new("pitch-deck")), activity);

        Self {
            auth: Arc::new(InMemoryAuthProvider::new()),
            calculator: Arc::new(calculator),
            pitch_decks: Arc::new(pitch_decks),
        }
    }
}

/// Builds the engine from the configured rules file, or the built-in table.
pub(crate) fn load_engine(config: &EstimationConfig) -> Result<EstimationEngine, AppError> {
    let rules = match &config.rules_path {
        Some(path) => {
            let rules = RulesTable::from_path(path)?;
            info!(path = %path.display(), version = %rules.version, "loaded rules table");
            rules
        }
        None => RulesTable::standard(),
    };
    Ok(EstimationEngine::new(rules))
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| {
        AppError::Input(format!("failed to parse '{}' ({err})", path.display()))
    })
}

pub(crate) fn parse_export_format(raw: &str) -> Result<ExportFormat, String> {
    ExportFormat::parse(raw).ok_or_else(|| format!("unknown export format '{raw}' (json|csv)"))
}
