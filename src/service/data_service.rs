use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::error::ServiceError;
use super::filter::ReleaseFilter;
use super::stats::DashboardStats;
use crate::analysis::DerivedRelease;
use crate::output::DETAILS_FILE;
use crate::runtime::Runtime;

/// Everything produced by one load of the CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub releases: Vec<DerivedRelease>,
    pub stats: DashboardStats,
}

impl Snapshot {
    pub fn new(releases: Vec<DerivedRelease>) -> Self {
        let stats = DashboardStats::from_releases(&releases);
        Self { releases, stats }
    }
}

enum State {
    Unloaded,
    Loaded(Arc<Snapshot>),
}

/// In-memory view of `enhanced_release_details.csv`.
///
/// Lifecycle: constructed unloaded, [`initialize`](Self::initialize) once at
/// boot, [`refresh`](Self::refresh) any time after. Reads fail with
/// [`ServiceError::NotInitialized`] while unloaded, including the window
/// inside a refresh.
pub struct DataService<R: Runtime> {
    runtime: R,
    csv_path: PathBuf,
    state: RwLock<State>,
}

impl<R: Runtime> DataService<R> {
    pub fn new(runtime: R, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            csv_path: csv_path.into(),
            state: RwLock::new(State::Unloaded),
        }
    }

    /// Service reading the detailed release file inside `data_dir`.
    pub fn in_dir(runtime: R, data_dir: &Path) -> Self {
        Self::new(runtime, data_dir.join(DETAILS_FILE))
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.read_state(), State::Loaded(_))
    }

    /// Load the CSV and compute stats. No-op when already loaded.
    #[tracing::instrument(skip(self))]
    pub fn initialize(&self) -> Result<(), ServiceError> {
        if self.is_loaded() {
            debug!("Data service already loaded, skipping initialization");
            return Ok(());
        }

        let snapshot = self.load().inspect_err(|e| {
            error!("Data service initialization failed: {}", e);
        })?;

        info!(
            "Data service initialized: {} releases loaded from {}",
            snapshot.releases.len(),
            self.csv_path.display()
        );

        *self.write_state() = State::Loaded(Arc::new(snapshot));
        Ok(())
    }

    /// Discard the loaded state and load the CSV again.
    #[tracing::instrument(skip(self))]
    pub fn refresh(&self) -> Result<(), ServiceError> {
        *self.write_state() = State::Unloaded;
        self.initialize()
    }

    pub fn all_releases(&self) -> Result<Vec<DerivedRelease>, ServiceError> {
        Ok(self.snapshot()?.releases.clone())
    }

    pub fn stats(&self) -> Result<DashboardStats, ServiceError> {
        Ok(self.snapshot()?.stats.clone())
    }

    pub fn filtered_releases(
        &self,
        filter: &ReleaseFilter,
    ) -> Result<Vec<DerivedRelease>, ServiceError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot
            .releases
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    fn snapshot(&self) -> Result<Arc<Snapshot>, ServiceError> {
        match &*self.read_state() {
            State::Loaded(snapshot) => Ok(Arc::clone(snapshot)),
            State::Unloaded => Err(ServiceError::NotInitialized),
        }
    }

    fn load(&self) -> Result<Snapshot, ServiceError> {
        if !self.runtime.exists(&self.csv_path) {
            return Err(ServiceError::NotFound(self.csv_path.clone()));
        }

        let file = self
            .runtime
            .open(&self.csv_path)
            .map_err(|e| ServiceError::Unreadable {
                path: self.csv_path.clone(),
                message: format!("{:#}", e),
            })?;

        let mut reader = csv::ReaderBuilder::new().from_reader(file);
        reader.headers()?;

        let mut releases = Vec::new();
        for (index, row) in reader.deserialize::<DerivedRelease>().enumerate() {
            match row {
                Ok(release) => releases.push(release),
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
                Err(e) => {
                    // +2: header line and 1-based numbering
                    warn!("Skipping malformed row {} in {}: {}", index + 2, self.csv_path.display(), e);
                }
            }
        }

        Ok(Snapshot::new(releases))
    }

    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
