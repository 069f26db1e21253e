//! In-process API facade over the calculation core, with narrative readings,
//! the SQLite calculation log, and the HTTP server.

mod location;
mod narrative;
mod persistence;
mod server;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use contracts::{
    CalculationModule, CastReport, CastRequest, CharmReadingRequest, Location, LogEntry,
    LostItemQuery, LostItemResult, NumerologyProfile, NumerologyQuery, NumerologyReadingRequest,
    NumerologyReport, ServiceStatus, SyllabusConfig, SCHEMA_VERSION_V1,
};
use rand::Rng;
use serde::Serialize;
use syllabus_core::{
    cast_with_seed, compute_for_query, numerology_profile, BoardGeometry, CastError, CastOutcome,
};
use tracing::{debug, info, warn};

pub use location::UserLocationProvider;
pub use narrative::{
    charm_prompt, numerology_prompt, GenerativeNarrativeService, NarrativeError,
    NarrativeService, SilentNarrativeService,
};
pub use persistence::{PersistenceError, SqliteLogStore};
pub use server::{router, serve, ServerError};

pub const NUMEROLOGY_MEANING_FALLBACK: &str = "The numbers are silent.";
pub const NUMEROLOGY_INSIGHT_FALLBACK: &str = "Vibrations unclear.";

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("intent must not be empty")]
    EmptyIntent,
    #[error(transparent)]
    Cast(#[from] CastError),
}

pub struct OracleApi {
    config: SyllabusConfig,
    narrative: Arc<dyn NarrativeService>,
    store: Option<SqliteLogStore>,
    calculations_run: u64,
    last_persistence_error: Option<String>,
}

impl fmt::Debug for OracleApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleApi")
            .field("config", &self.config)
            .field("narrative_enabled", &self.narrative.is_enabled())
            .field("store", &self.store)
            .field("calculations_run", &self.calculations_run)
            .field("last_persistence_error", &self.last_persistence_error)
            .finish()
    }
}

impl OracleApi {
    /// Uses the generative narrative service when its API key is present,
    /// otherwise a silent one.
    pub fn from_config(config: SyllabusConfig) -> Self {
        let narrative: Arc<dyn NarrativeService> =
            match GenerativeNarrativeService::from_config(&config.narrative) {
                Some(service) => {
                    info!(model = %config.narrative.model, "narrative service enabled");
                    Arc::new(service)
                }
                None => {
                    info!(
                        api_key_env = %config.narrative.api_key_env,
                        "narrative API key not set; readings disabled"
                    );
                    Arc::new(SilentNarrativeService)
                }
            };
        Self::with_narrative(config, narrative)
    }

    pub fn with_narrative(config: SyllabusConfig, narrative: Arc<dyn NarrativeService>) -> Self {
        Self {
            config,
            narrative,
            store: None,
            calculations_run: 0,
            last_persistence_error: None,
        }
    }

    pub fn attach_sqlite_store(&mut self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let store = SqliteLogStore::open(path)?;
        self.attach_store(store)
    }

    pub fn attach_store(&mut self, store: SqliteLogStore) -> Result<(), PersistenceError> {
        self.calculations_run = store.calculations_run()?;
        self.store = Some(store);
        self.last_persistence_error = None;
        Ok(())
    }

    pub fn config(&self) -> &SyllabusConfig {
        &self.config
    }

    pub fn last_persistence_error(&self) -> Option<&str> {
        self.last_persistence_error.as_deref()
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            calculations_run: self.calculations_run,
            narrative_enabled: self.narrative.is_enabled(),
        }
    }

    pub fn lost_item(&mut self, query: &LostItemQuery) -> LostItemResult {
        let result = compute_for_query(query);
        debug!(
            item = %query.item_name,
            master_number = result.master_number,
            "lost item located"
        );
        self.record(CalculationModule::LostItem, &query.log_label(), &result);
        result
    }

    /// Computes the profile now; the reading is awaited on the returned value.
    pub fn start_numerology(&self, query: &NumerologyQuery) -> PendingNumerology {
        PendingNumerology {
            profile: numerology_profile(&query.name, &query.birth_date, query.scheme),
            query: query.clone(),
            narrative: Arc::clone(&self.narrative),
        }
    }

    pub fn record_numerology(&mut self, query: &NumerologyQuery, report: &NumerologyReport) {
        let label = format!("{} ({})", query.name, query.birth_date);
        self.record(CalculationModule::Numerology, &label, report);
    }

    pub async fn numerology(&mut self, query: &NumerologyQuery) -> NumerologyReport {
        let report = self.start_numerology(query).read().await;
        self.record_numerology(query, &report);
        report
    }

    /// Runs the cast to rest. A missing seed draws a fresh one; the report
    /// always carries the seed used.
    pub fn start_cast(&self, request: &CastRequest) -> Result<PendingCast, OracleError> {
        let intent = request.intent.trim();
        if intent.is_empty() {
            return Err(OracleError::EmptyIntent);
        }

        let seed = request
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
        let outcome = cast_with_seed(BoardGeometry::from(self.config.board), seed)?;
        info!(
            seed,
            steps = outcome.steps,
            landings = outcome.landings,
            "cast settled"
        );

        Ok(PendingCast {
            intent: intent.to_string(),
            seed,
            outcome,
            narrative: Arc::clone(&self.narrative),
        })
    }

    pub fn record_cast(&mut self, report: &CastReport) {
        self.record(CalculationModule::CharmCasting, &report.intent, report);
    }

    /// Casts the seven charms and asks the narrative service to read them.
    pub async fn cast_charms(&mut self, request: &CastRequest) -> Result<CastReport, OracleError> {
        let report = self.start_cast(request)?.read().await;
        self.record_cast(&report);
        Ok(report)
    }

    pub fn logs(&self, module: Option<&str>) -> Result<Vec<LogEntry>, PersistenceError> {
        let Some(store) = self.store.as_ref() else {
            return Err(PersistenceError::NotAttached);
        };
        store.list(module)
    }

    pub fn user_location(&self) -> Result<Option<Location>, PersistenceError> {
        let Some(store) = self.store.as_ref() else {
            return Err(PersistenceError::NotAttached);
        };
        store.get()
    }

    pub fn set_user_location(&mut self, location: Location) -> Result<(), PersistenceError> {
        let Some(store) = self.store.as_mut() else {
            return Err(PersistenceError::NotAttached);
        };
        store.set(location)
    }

    /// Appends the calculation to the log when a store is attached and counts it.
    /// With a store the reported count always mirrors the stored counter.
    /// Log failures never fail the calculation; the last one is kept for inspection.
    fn record<T: Serialize>(&mut self, module: CalculationModule, query: &str, result: &T) {
        let Some(store) = self.store.as_mut() else {
            self.calculations_run += 1;
            return;
        };

        match append_to_log(store, module, query, result) {
            Ok((id, calculations_run)) => {
                debug!(module = %module, id, calculations_run, "calculation recorded");
                self.calculations_run = calculations_run;
                self.last_persistence_error = None;
            }
            Err(err) => {
                warn!(module = %module, error = %err, "failed to record calculation");
                if let Ok(stored) = store.calculations_run() {
                    self.calculations_run = stored;
                }
                self.last_persistence_error = Some(err.to_string());
            }
        }
    }
}

/// Narrative half of a numerology request. Holds no borrow of the [`OracleApi`],
/// so a slow reading never blocks other callers.
pub struct PendingNumerology {
    query: NumerologyQuery,
    profile: NumerologyProfile,
    narrative: Arc<dyn NarrativeService>,
}

impl PendingNumerology {
    pub async fn read(self) -> NumerologyReport {
        let request = NumerologyReadingRequest {
            name: self.query.name.clone(),
            scheme: self.query.scheme,
            profile: self.profile,
        };
        let (meaning, esoteric_insight) = match self.narrative.numerology_reading(&request).await {
            Some(reading) => (reading.meaning, reading.esoteric_insight),
            None => (String::new(), String::new()),
        };

        NumerologyReport {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            name: self.query.name,
            scheme: self.query.scheme,
            profile: self.profile,
            meaning: non_empty_or(meaning, NUMEROLOGY_MEANING_FALLBACK),
            esoteric_insight: non_empty_or(esoteric_insight, NUMEROLOGY_INSIGHT_FALLBACK),
            system_comparison: format!("{} System", self.query.scheme.display_name()),
        }
    }
}

/// A settled cast waiting for its reading.
pub struct PendingCast {
    intent: String,
    seed: u64,
    outcome: CastOutcome,
    narrative: Arc<dyn NarrativeService>,
}

impl PendingCast {
    pub async fn read(self) -> CastReport {
        let reading_request = CharmReadingRequest {
            intent: self.intent.clone(),
            placements: self.outcome.placed_charms(),
        };
        let reading = self.narrative.charm_reading(&reading_request).await;

        CastReport {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            intent: self.intent,
            seed: self.seed,
            steps: self.outcome.steps,
            landings: self.outcome.landings,
            placements: self.outcome.placements,
            reading,
        }
    }
}

/// Returns the new row id and the stored counter after incrementing it.
fn append_to_log<T: Serialize>(
    store: &mut SqliteLogStore,
    module: CalculationModule,
    query: &str,
    result: &T,
) -> Result<(i64, u64), PersistenceError> {
    let id = store.record(module.as_str(), query, result)?;
    let calculations_run = store.increment_calculations_run()?;
    Ok((id, calculations_run))
}

fn non_empty_or(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use contracts::{CharmDetail, CharmReading, NumerologyReading, Scheme};

    use super::*;

    struct ScriptedNarrative;

    #[async_trait]
    impl NarrativeService for ScriptedNarrative {
        async fn charm_reading(&self, request: &CharmReadingRequest) -> Option<CharmReading> {
            Some(CharmReading {
                synthesis: format!("{} charms answer", request.placements.len()),
                key_insight: request.intent.clone(),
                charm_details: vec![CharmDetail {
                    charm: request.placements[0].charm.clone(),
                    meaning: request.placements[0].zone.clone(),
                }],
            })
        }

        async fn numerology_reading(
            &self,
            request: &NumerologyReadingRequest,
        ) -> Option<NumerologyReading> {
            Some(NumerologyReading {
                meaning: format!("path {}", request.profile.life_path),
                esoteric_insight: String::new(),
            })
        }
    }

    fn silent_api() -> OracleApi {
        let mut api =
            OracleApi::with_narrative(SyllabusConfig::default(), Arc::new(SilentNarrativeService));
        api.attach_store(SqliteLogStore::open_in_memory().expect("open"))
            .expect("attach");
        api
    }

    #[test]
    fn lost_item_is_logged_with_item_and_date() {
        let mut api = silent_api();
        let result = api.lost_item(&LostItemQuery {
            item_name: "Keys".to_string(),
            date_lost: "2024-01-01".to_string(),
            seeker_name: String::new(),
            scheme: Scheme::Pythagorean,
        });
        assert_eq!(result.master_number, 7);

        let logs = api.logs(Some("LOST_ITEM")).expect("logs");
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].query, "Keys (2024-01-01)");
        assert_eq!(logs[0].result["master_number"], 7);
        assert_eq!(api.status().calculations_run, 1);
    }

    #[tokio::test]
    async fn numerology_falls_back_when_narrative_is_silent() {
        let mut api = silent_api();
        let report = api
            .numerology(&NumerologyQuery {
                name: "Anna".to_string(),
                birth_date: "1990-07-04".to_string(),
                scheme: Scheme::Chaldean,
            })
            .await;

        assert_eq!(report.meaning, NUMEROLOGY_MEANING_FALLBACK);
        assert_eq!(report.esoteric_insight, NUMEROLOGY_INSIGHT_FALLBACK);
        assert_eq!(report.system_comparison, "Chaldean System");
        assert_eq!(report.profile.life_path, 3);
        assert_eq!(api.logs(Some("NUMEROLOGY")).expect("logs")[0].query, "Anna (1990-07-04)");
    }

    #[tokio::test]
    async fn empty_narrative_fields_fall_back_individually() {
        let mut api = OracleApi::with_narrative(SyllabusConfig::default(), Arc::new(ScriptedNarrative));
        let report = api
            .numerology(&NumerologyQuery {
                name: "Anna".to_string(),
                birth_date: "1990-07-04".to_string(),
                scheme: Scheme::Pythagorean,
            })
            .await;
        assert_eq!(report.meaning, "path 3");
        assert_eq!(report.esoteric_insight, NUMEROLOGY_INSIGHT_FALLBACK);
        assert_eq!(report.system_comparison, "Pythagorean System");
    }

    #[tokio::test]
    async fn seeded_cast_is_reproducible_and_read() {
        let mut api = OracleApi::with_narrative(SyllabusConfig::default(), Arc::new(ScriptedNarrative));
        let request = CastRequest {
            intent: "  new job?  ".to_string(),
            seed: Some(42),
        };

        let first = api.cast_charms(&request).await.expect("cast");
        let second = api.cast_charms(&request).await.expect("cast");

        assert_eq!(first.intent, "new job?");
        assert_eq!(first.seed, 42);
        assert_eq!(first.placements, second.placements);
        assert_eq!(first.placements.len(), 7);
        assert_eq!(first.landings, 7);
        let reading = first.reading.expect("scripted reading");
        assert_eq!(reading.synthesis, "7 charms answer");
        assert_eq!(reading.charm_details[0].meaning, first.placements[0].zone_label);
        assert_eq!(api.status().calculations_run, 2);
    }

    #[tokio::test]
    async fn blank_intent_is_rejected_without_counting() {
        let mut api = silent_api();
        let err = api
            .cast_charms(&CastRequest {
                intent: "   ".to_string(),
                seed: None,
            })
            .await
            .expect_err("blank intent");
        assert!(matches!(err, OracleError::EmptyIntent));
        assert_eq!(api.status().calculations_run, 0);
        assert!(api.logs(None).expect("logs").is_empty());
    }

    #[test]
    fn store_operations_require_attachment() {
        let mut api =
            OracleApi::with_narrative(SyllabusConfig::default(), Arc::new(SilentNarrativeService));
        assert!(matches!(api.logs(None), Err(PersistenceError::NotAttached)));
        assert!(matches!(
            api.set_user_location(Location { lat: 0.0, lng: 0.0 }),
            Err(PersistenceError::NotAttached)
        ));

        // calculations still run and count without a store
        api.lost_item(&LostItemQuery {
            item_name: "Ring".to_string(),
            date_lost: "2024-03-15".to_string(),
            seeker_name: String::new(),
            scheme: Scheme::Pythagorean,
        });
        assert_eq!(api.status().calculations_run, 1);
        assert!(api.last_persistence_error().is_none());
    }

    fn keys_query() -> LostItemQuery {
        LostItemQuery {
            item_name: "Keys".to_string(),
            date_lost: "2024-01-01".to_string(),
            seeker_name: String::new(),
            scheme: Scheme::Pythagorean,
        }
    }

    #[test]
    fn failed_counter_write_leaves_status_matching_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("oracle.db");

        let mut api =
            OracleApi::with_narrative(SyllabusConfig::default(), Arc::new(SilentNarrativeService));
        api.attach_store(SqliteLogStore::open(&path).expect("open"))
            .expect("attach");
        api.lost_item(&keys_query());
        assert_eq!(api.status().calculations_run, 1);

        {
            let conn = rusqlite::Connection::open(&path).expect("second connection");
            conn.execute_batch(
                "CREATE TRIGGER freeze_settings BEFORE UPDATE ON settings
                 BEGIN SELECT RAISE(ABORT, 'settings frozen'); END;",
            )
            .expect("create trigger");
        }

        let result = api.lost_item(&keys_query());
        assert_eq!(result.master_number, 7);
        assert!(api.last_persistence_error().is_some());
        assert_eq!(api.status().calculations_run, 1);
        assert_eq!(api.logs(None).expect("logs").len(), 2);

        drop(api);
        let mut reopened =
            OracleApi::with_narrative(SyllabusConfig::default(), Arc::new(SilentNarrativeService));
        reopened
            .attach_store(SqliteLogStore::open(&path).expect("reopen"))
            .expect("attach");
        assert_eq!(reopened.status().calculations_run, 1);
    }
}
