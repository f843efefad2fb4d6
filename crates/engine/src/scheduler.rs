//! Scheduler coordinator: one timer per job family, single-flight
//! execution, manual triggers, status queries, and run history.
//!
//! The coordinator is an explicitly constructed service object with
//! process-wide lifetime, injected into the binary entry point — not a
//! module global — so its guards and timers are exercised directly in
//! tests through stub [`JobRunner`]s.
//!
//! State machine per family:
//! Stopped -> (enabled + start) -> Scheduled -> (trigger fires) ->
//! Running -> Scheduled; stop() or enabled=false from any state ->
//! Stopped. restart() is stop() + start(), used whenever an operator
//! changes a trigger setting.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clipdeck_catalog::CatalogClient;
use clipdeck_core::error::CoreError;
use clipdeck_core::family::{history_tag, JobFamily, RunKind, ALL_FAMILIES};
use clipdeck_core::schedule::{next_run_after, TriggerSpec, INTERVAL_DAILY};
use clipdeck_core::types::Timestamp;
use clipdeck_db::models::job_run::CreateJobRun;
use clipdeck_db::repositories::{JobRunRepo, SettingsRepo};
use clipdeck_db::DbPool;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::backup::DEFAULT_RETAIN;
use crate::error::EngineError;
use crate::guard::RunGuard;
use crate::jobs::{BackupJob, GenerationJob, JobOutcome, JobRunner, MaintenanceJob, RefreshJob};

// ---------------------------------------------------------------------------
// Public result types
// ---------------------------------------------------------------------------

/// Status snapshot for one job family.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleStatus {
    pub family: String,
    pub enabled: bool,
    pub next_run_at: Option<Timestamp>,
    pub is_running: bool,
}

/// Synchronous result of a manual trigger: counts plus the full report.
#[derive(Debug, Serialize)]
pub struct TriggeredRun {
    pub family: String,
    pub success: bool,
    pub work_done: i32,
    pub errors: Vec<String>,
    pub duration_ms: i64,
    pub detail: serde_json::Value,
}

/// Settings-driven schedule configuration for one family.
#[derive(Debug, Clone, Copy)]
pub struct FamilyConfig {
    pub enabled: bool,
    pub trigger: TriggerSpec,
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

struct FamilyState {
    enabled: bool,
    next_run_at: Option<Timestamp>,
    cancel: Option<CancellationToken>,
}

struct FamilyEntry {
    runner: Arc<dyn JobRunner>,
    guard: RunGuard,
    state: Mutex<FamilyState>,
}

impl FamilyEntry {
    fn new(runner: Arc<dyn JobRunner>) -> Arc<Self> {
        Arc::new(Self {
            runner,
            guard: RunGuard::new(),
            state: Mutex::new(FamilyState {
                enabled: false,
                next_run_at: None,
                cancel: None,
            }),
        })
    }
}

// ---------------------------------------------------------------------------
// SchedulerCoordinator
// ---------------------------------------------------------------------------

/// Owns every family timer and guard for the process.
pub struct SchedulerCoordinator {
    pool: DbPool,
    families: HashMap<JobFamily, Arc<FamilyEntry>>,
}

impl SchedulerCoordinator {
    /// Create an empty coordinator; register runners before starting.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            families: HashMap::new(),
        }
    }

    /// Register (or replace) the runner for a family.
    pub fn register(&mut self, family: JobFamily, runner: Arc<dyn JobRunner>) {
        self.families.insert(family, FamilyEntry::new(runner));
    }

    /// Coordinator wired with the four production job bodies.
    pub fn with_default_jobs(
        pool: DbPool,
        catalog: Arc<CatalogClient>,
        backup_dir: PathBuf,
    ) -> Self {
        let mut coordinator = Self::new(pool.clone());
        coordinator.register(
            JobFamily::Generation,
            Arc::new(GenerationJob {
                pool: pool.clone(),
                catalog: Arc::clone(&catalog),
            }),
        );
        coordinator.register(
            JobFamily::Maintenance,
            Arc::new(MaintenanceJob {
                pool: pool.clone(),
                catalog: Arc::clone(&catalog),
            }),
        );
        coordinator.register(
            JobFamily::Refresh,
            Arc::new(RefreshJob {
                pool: pool.clone(),
                catalog,
            }),
        );
        coordinator.register(JobFamily::Backup, Arc::new(BackupJob { pool, backup_dir }));
        coordinator
    }

    fn entry(&self, family: JobFamily) -> Result<&Arc<FamilyEntry>, EngineError> {
        self.families.get(&family).ok_or_else(|| {
            CoreError::Internal(format!(
                "Job family '{}' has no registered runner",
                family.as_str()
            ))
            .into()
        })
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    /// Seed the family's schedule settings with documented defaults (only
    /// missing keys are written) and read the effective configuration.
    pub async fn load_family_config(&self, family: JobFamily) -> Result<FamilyConfig, EngineError> {
        let pool = &self.pool;
        SettingsRepo::seed_default(pool, &family.enabled_key(), "true").await?;
        SettingsRepo::seed_default(pool, &family.hour_key(), &family.default_hour().to_string())
            .await?;
        SettingsRepo::seed_default(pool, &family.interval_key(), INTERVAL_DAILY).await?;
        SettingsRepo::seed_default(pool, &family.weekday_key(), "monday").await?;
        if family == JobFamily::Backup {
            SettingsRepo::seed_default(pool, "backup.retain", &DEFAULT_RETAIN.to_string()).await?;
        }

        let enabled = SettingsRepo::get(pool, &family.enabled_key())
            .await?
            .is_some_and(|v| v == "true");
        let hour: u32 = SettingsRepo::get(pool, &family.hour_key())
            .await?
            .unwrap_or_default()
            .parse()
            .map_err(|_| {
                CoreError::Validation(format!(
                    "Setting '{}' is not a valid hour",
                    family.hour_key()
                ))
            })?;
        let interval = SettingsRepo::get(pool, &family.interval_key())
            .await?
            .unwrap_or_else(|| INTERVAL_DAILY.to_string());
        let weekday = SettingsRepo::get(pool, &family.weekday_key())
            .await?
            .unwrap_or_else(|| "monday".to_string());

        let trigger = TriggerSpec::from_settings(&interval, hour, &weekday)?;
        Ok(FamilyConfig { enabled, trigger })
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Start a family's timer from its persisted settings.
    ///
    /// Returns `false` when the family is disabled (it ends up Stopped).
    pub async fn start(&self, family: JobFamily) -> Result<bool, EngineError> {
        let config = self.load_family_config(family).await?;
        self.start_with(family, config).await
    }

    /// Start a family's timer from an explicit configuration. Any previous
    /// timer for the family is cancelled first.
    pub async fn start_with(
        &self,
        family: JobFamily,
        config: FamilyConfig,
    ) -> Result<bool, EngineError> {
        let entry = self.entry(family)?;
        let mut state = entry.state.lock().await;

        if let Some(cancel) = state.cancel.take() {
            cancel.cancel();
        }

        if !config.enabled {
            state.enabled = false;
            state.next_run_at = None;
            tracing::info!(family = family.as_str(), "Scheduler disabled; family stopped");
            return Ok(false);
        }

        let cancel = CancellationToken::new();
        state.enabled = true;
        state.next_run_at = Some(next_run_after(Utc::now(), config.trigger));
        state.cancel = Some(cancel.clone());
        drop(state);

        tokio::spawn(run_loop(
            self.pool.clone(),
            family,
            Arc::clone(entry),
            config.trigger,
            cancel,
        ));

        tracing::info!(
            family = family.as_str(),
            trigger = ?config.trigger,
            "Scheduler started"
        );
        Ok(true)
    }

    /// Stop a family's timer. In-flight runs finish; no new ticks fire.
    pub async fn stop(&self, family: JobFamily) -> Result<(), EngineError> {
        let entry = self.entry(family)?;
        let mut state = entry.state.lock().await;
        if let Some(cancel) = state.cancel.take() {
            cancel.cancel();
        }
        state.enabled = false;
        state.next_run_at = None;
        tracing::info!(family = family.as_str(), "Scheduler stopped");
        Ok(())
    }

    /// Stop and start a family so changed trigger settings take effect
    /// without a process restart.
    pub async fn restart(&self, family: JobFamily) -> Result<bool, EngineError> {
        self.stop(family).await?;
        self.start(family).await
    }

    /// Start every registered family from its settings.
    pub async fn start_all(&self) -> Result<(), EngineError> {
        for family in ALL_FAMILIES {
            if self.families.contains_key(family) {
                self.start(*family).await?;
            }
        }
        Ok(())
    }

    /// Stop every registered family.
    pub async fn stop_all(&self) {
        for family in ALL_FAMILIES {
            if self.families.contains_key(family) {
                let _ = self.stop(*family).await;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Status and manual triggers
    // -----------------------------------------------------------------------

    /// Status snapshot for one family.
    pub async fn status(&self, family: JobFamily) -> Result<ScheduleStatus, EngineError> {
        let entry = self.entry(family)?;
        let state = entry.state.lock().await;
        Ok(ScheduleStatus {
            family: family.as_str().to_string(),
            enabled: state.enabled,
            next_run_at: state.next_run_at,
            is_running: entry.guard.is_running(),
        })
    }

    /// Status snapshots for all registered families.
    pub async fn statuses(&self) -> Vec<ScheduleStatus> {
        let mut out = Vec::with_capacity(self.families.len());
        for family in ALL_FAMILIES {
            if self.families.contains_key(family) {
                if let Ok(status) = self.status(*family).await {
                    out.push(status);
                }
            }
        }
        out
    }

    /// Run a family's job body now, regardless of scheduler state, still
    /// subject to the single-flight guard, with history tagged "manual".
    pub async fn trigger_now(&self, family: JobFamily) -> Result<TriggeredRun, EngineError> {
        let entry = self.entry(family)?;
        execute(&self.pool, family, entry, RunKind::Manual).await
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Run one guarded execution and append its history row.
///
/// The permit is held for the whole body and released on every exit path,
/// so a failed run can never wedge the family.
async fn execute(
    pool: &DbPool,
    family: JobFamily,
    entry: &FamilyEntry,
    kind: RunKind,
) -> Result<TriggeredRun, EngineError> {
    let Some(_permit) = entry.guard.try_acquire() else {
        return Err(EngineError::AlreadyRunning { family });
    };

    let started = std::time::Instant::now();
    let outcome: JobOutcome = entry.runner.run().await;
    let duration_ms = started.elapsed().as_millis() as i64;

    let tag = history_tag(family, kind);
    let record = CreateJobRun {
        family: tag.clone(),
        success: outcome.success,
        work_done: outcome.work_done,
        errors: outcome.errors.clone(),
        duration_ms,
    };
    if let Err(e) = JobRunRepo::insert(pool, &record).await {
        tracing::error!(family = %tag, error = %e, "Failed to write run history");
    }

    tracing::info!(
        family = %tag,
        success = outcome.success,
        work_done = outcome.work_done,
        errors = outcome.errors.len(),
        duration_ms,
        "Job run finished"
    );

    Ok(TriggeredRun {
        family: tag,
        success: outcome.success,
        work_done: outcome.work_done,
        errors: outcome.errors,
        duration_ms,
        detail: outcome.detail,
    })
}

/// Timer loop for one family: sleep until the next trigger instant, run,
/// recompute. Exits when the family's token is cancelled.
async fn run_loop(
    pool: DbPool,
    family: JobFamily,
    entry: Arc<FamilyEntry>,
    trigger: TriggerSpec,
    cancel: CancellationToken,
) {
    loop {
        let now = Utc::now();
        let next = next_run_after(now, trigger);
        entry.state.lock().await.next_run_at = Some(next);

        let wait = (next - now)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(family = family.as_str(), "Scheduler loop cancelled");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                match execute(&pool, family, &entry, RunKind::Scheduled).await {
                    Ok(_) => {}
                    Err(EngineError::AlreadyRunning { .. }) => {
                        // No queuing: the next tick will simply run later.
                        tracing::warn!(
                            family = family.as_str(),
                            "Scheduled tick skipped: previous run still in flight"
                        );
                    }
                    Err(e) => {
                        tracing::error!(family = family.as_str(), error = %e, "Scheduled run failed");
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Timelike;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Pool that never connects: history writes fail fast and are logged,
    /// which keeps guard/timer behavior observable without a database.
    fn lazy_pool() -> DbPool {
        sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(100))
            .connect_lazy("postgres://127.0.0.1:1/clipdeck_test")
            .expect("lazy pool from static url")
    }

    struct StubJob {
        delay: Duration,
        runs: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl JobRunner for StubJob {
        async fn run(&self) -> JobOutcome {
            tokio::time::sleep(self.delay).await;
            self.runs.fetch_add(1, Ordering::SeqCst);
            JobOutcome {
                success: true,
                work_done: 1,
                errors: vec![],
                detail: serde_json::Value::Null,
            }
        }
    }

    fn coordinator_with_stub(
        family: JobFamily,
        delay: Duration,
    ) -> (Arc<SchedulerCoordinator>, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut coordinator = SchedulerCoordinator::new(lazy_pool());
        coordinator.register(
            family,
            Arc::new(StubJob {
                delay,
                runs: Arc::clone(&runs),
            }),
        );
        (Arc::new(coordinator), runs)
    }

    fn daily(hour: u32) -> FamilyConfig {
        FamilyConfig {
            enabled: true,
            trigger: TriggerSpec::Daily { hour },
        }
    }

    // -- Status and lifecycle -------------------------------------------------

    #[tokio::test]
    async fn family_is_stopped_until_started() {
        let (coordinator, _) =
            coordinator_with_stub(JobFamily::Maintenance, Duration::ZERO);
        let status = coordinator.status(JobFamily::Maintenance).await.unwrap();
        assert!(!status.enabled);
        assert!(status.next_run_at.is_none());
        assert!(!status.is_running);
    }

    #[tokio::test]
    async fn start_schedules_and_stop_clears() {
        let (coordinator, _) =
            coordinator_with_stub(JobFamily::Maintenance, Duration::ZERO);

        let started = coordinator
            .start_with(JobFamily::Maintenance, daily(3))
            .await
            .unwrap();
        assert!(started);

        let status = coordinator.status(JobFamily::Maintenance).await.unwrap();
        assert!(status.enabled);
        assert!(status.next_run_at.is_some());

        coordinator.stop(JobFamily::Maintenance).await.unwrap();
        let status = coordinator.status(JobFamily::Maintenance).await.unwrap();
        assert!(!status.enabled);
        assert!(status.next_run_at.is_none());
    }

    #[tokio::test]
    async fn disabled_config_leaves_family_stopped() {
        let (coordinator, _) =
            coordinator_with_stub(JobFamily::Maintenance, Duration::ZERO);
        let config = FamilyConfig {
            enabled: false,
            trigger: TriggerSpec::Hourly,
        };
        let started = coordinator
            .start_with(JobFamily::Maintenance, config)
            .await
            .unwrap();
        assert!(!started);
        let status = coordinator.status(JobFamily::Maintenance).await.unwrap();
        assert!(!status.enabled);
    }

    #[tokio::test]
    async fn restarting_with_new_trigger_updates_next_run() {
        let (coordinator, _) =
            coordinator_with_stub(JobFamily::Maintenance, Duration::ZERO);

        coordinator
            .start_with(JobFamily::Maintenance, daily(5))
            .await
            .unwrap();
        coordinator
            .start_with(JobFamily::Maintenance, daily(7))
            .await
            .unwrap();

        let status = coordinator.status(JobFamily::Maintenance).await.unwrap();
        assert_eq!(status.next_run_at.unwrap().hour(), 7);
    }

    #[tokio::test]
    async fn unregistered_family_is_an_error() {
        let (coordinator, _) =
            coordinator_with_stub(JobFamily::Maintenance, Duration::ZERO);
        let err = coordinator.trigger_now(JobFamily::Backup).await;
        assert!(err.is_err());
    }

    // -- Single-flight --------------------------------------------------------

    #[tokio::test]
    async fn second_trigger_fails_fast_while_first_runs() {
        let (coordinator, runs) =
            coordinator_with_stub(JobFamily::Maintenance, Duration::from_millis(500));

        let background = Arc::clone(&coordinator);
        let first = tokio::spawn(async move {
            background.trigger_now(JobFamily::Maintenance).await
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        let status = coordinator.status(JobFamily::Maintenance).await.unwrap();
        assert!(status.is_running);

        let second = coordinator.trigger_now(JobFamily::Maintenance).await;
        assert_matches!(
            second,
            Err(EngineError::AlreadyRunning {
                family: JobFamily::Maintenance
            })
        );

        let run = first.await.unwrap().unwrap();
        assert!(run.success);
        assert_eq!(run.work_done, 1);
        assert_eq!(run.family, "maintenance-manual");
        // One sweep ran, not two.
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn guard_releases_after_each_run() {
        let (coordinator, runs) =
            coordinator_with_stub(JobFamily::Generation, Duration::ZERO);

        coordinator.trigger_now(JobFamily::Generation).await.unwrap();
        coordinator.trigger_now(JobFamily::Generation).await.unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 2);
        let status = coordinator.status(JobFamily::Generation).await.unwrap();
        assert!(!status.is_running);
    }

    #[tokio::test]
    async fn manual_run_tag_reflects_family_and_kind() {
        let (coordinator, _) = coordinator_with_stub(JobFamily::Refresh, Duration::ZERO);
        let run = coordinator.trigger_now(JobFamily::Refresh).await.unwrap();
        assert_eq!(run.family, "smart-refresh-manual");
    }

    // -- Timer ----------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn hourly_timer_fires_the_job() {
        let (coordinator, runs) =
            coordinator_with_stub(JobFamily::Maintenance, Duration::ZERO);
        let config = FamilyConfig {
            enabled: true,
            trigger: TriggerSpec::Hourly,
        };
        coordinator
            .start_with(JobFamily::Maintenance, config)
            .await
            .unwrap();

        // Two virtual hours cover at least one top-of-hour tick.
        tokio::time::sleep(Duration::from_secs(2 * 3600 + 5)).await;
        assert!(runs.load(Ordering::SeqCst) >= 1);

        coordinator.stop(JobFamily::Maintenance).await.unwrap();
    }
}
