//! The in-memory status database.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::{BinaryParagraph, PackageSpec, Triplet};
use crate::status::{StatusError, StatusStore};

/// Installation state of one spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallState {
    NotInstalled,
    /// An install was started and has not been settled.
    HalfInstalled,
    Installed,
}

impl InstallState {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallState::NotInstalled => "not-installed",
            InstallState::HalfInstalled => "half-installed",
            InstallState::Installed => "installed",
        }
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-installed" => Ok(InstallState::NotInstalled),
            "half-installed" => Ok(InstallState::HalfInstalled),
            "installed" => Ok(InstallState::Installed),
            _ => Err(format!("unknown install state `{s}`")),
        }
    }
}

/// One spec's recorded state.
///
/// An `Installed` entry always carries the paragraph that was installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    spec: PackageSpec,
    state: InstallState,
    package: Option<BinaryParagraph>,
}

impl StatusEntry {
    /// An entry recording `package` in `state`.
    pub fn with_package(package: BinaryParagraph, state: InstallState) -> Self {
        StatusEntry {
            spec: package.spec.clone(),
            state,
            package: Some(package),
        }
    }

    /// An entry with no paragraph; never `Installed`.
    pub(crate) fn without_package(spec: PackageSpec, state: InstallState) -> Self {
        debug_assert_ne!(state, InstallState::Installed);
        StatusEntry {
            spec,
            state,
            package: None,
        }
    }

    pub fn spec(&self) -> &PackageSpec {
        &self.spec
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    /// The recorded paragraph, if any.
    pub fn package(&self) -> Option<&BinaryParagraph> {
        self.package.as_ref()
    }

    pub fn is_installed(&self) -> bool {
        self.state == InstallState::Installed
    }
}

/// What [`StatusDatabase::load`] found besides the usable entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries that could not be parsed.
    pub skipped: usize,
    /// Specs left mid-install by an interrupted operation.
    pub half_installed: Vec<PackageSpec>,
}

impl LoadReport {
    /// Whether the database holds unsettled entries.
    pub fn is_consistent(&self) -> bool {
        self.half_installed.is_empty()
    }
}

/// Installation state of every known spec.
///
/// Every transition writes the store before the in-memory map changes, and
/// both happen under the write lock, so a lookup never reports a state that
/// is not yet durable.
#[derive(Debug)]
pub struct StatusDatabase {
    store: StatusStore,
    entries: RwLock<HashMap<PackageSpec, StatusEntry>>,
}

impl StatusDatabase {
    /// Load every entry from `store`.
    pub fn load(store: StatusStore) -> Result<(Self, LoadReport), StatusError> {
        let (entries, skipped) = store.read_all()?;

        let mut half_installed: Vec<PackageSpec> = entries
            .iter()
            .filter(|e| e.state() == InstallState::HalfInstalled)
            .map(|e| e.spec().clone())
            .collect();
        half_installed.sort();

        let entries = entries
            .into_iter()
            .map(|e| (e.spec().clone(), e))
            .collect();

        tracing::debug!(
            "loaded status database from {} ({} skipped)",
            store.dir().display(),
            skipped
        );

        let db = StatusDatabase {
            store,
            entries: RwLock::new(entries),
        };
        Ok((
            db,
            LoadReport {
                skipped,
                half_installed,
            },
        ))
    }

    /// The backing store.
    pub fn store(&self) -> &StatusStore {
        &self.store
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<PackageSpec, StatusEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<PackageSpec, StatusEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The entry for `name` on `triplet`, only if it is installed.
    pub fn find_installed(&self, name: &str, triplet: Triplet) -> Option<StatusEntry> {
        let spec = PackageSpec::from_name_and_triplet(name, triplet).ok()?;
        self.read().get(&spec).filter(|e| e.is_installed()).cloned()
    }

    /// Whether `spec` is installed.
    pub fn is_installed(&self, spec: &PackageSpec) -> bool {
        self.read().get(spec).is_some_and(StatusEntry::is_installed)
    }

    /// The entry for `spec` in any state.
    pub fn get(&self, spec: &PackageSpec) -> Option<StatusEntry> {
        self.read().get(spec).cloned()
    }

    /// The state of `spec`; unknown specs are not installed.
    pub fn state_of(&self, spec: &PackageSpec) -> InstallState {
        self.read()
            .get(spec)
            .map_or(InstallState::NotInstalled, StatusEntry::state)
    }

    /// All installed entries, ordered by spec.
    pub fn installed(&self) -> Vec<StatusEntry> {
        let mut installed: Vec<_> = self
            .read()
            .values()
            .filter(|e| e.is_installed())
            .cloned()
            .collect();
        installed.sort_by(|a, b| a.spec().cmp(b.spec()));
        installed
    }

    /// Start an install: `not_installed`/`installed` -> `half_installed`.
    pub fn mark_half_installed(&self, spec: &PackageSpec) -> Result<(), StatusError> {
        let mut entries = self.write();
        let current = entries.get(spec);
        let from = current.map_or(InstallState::NotInstalled, StatusEntry::state);
        if from == InstallState::HalfInstalled {
            return Err(StatusError::InvalidTransition {
                spec: spec.clone(),
                from,
                to: InstallState::HalfInstalled,
            });
        }

        let entry = match current.and_then(StatusEntry::package) {
            Some(pgh) => StatusEntry::with_package(pgh.clone(), InstallState::HalfInstalled),
            None => StatusEntry::without_package(spec.clone(), InstallState::HalfInstalled),
        };
        self.commit(&mut entries, entry)
    }

    /// Finish an install: `half_installed` -> `installed`.
    pub fn mark_installed(&self, package: BinaryParagraph) -> Result<(), StatusError> {
        let mut entries = self.write();
        let from = entries
            .get(&package.spec)
            .map_or(InstallState::NotInstalled, StatusEntry::state);
        if from != InstallState::HalfInstalled {
            return Err(StatusError::InvalidTransition {
                spec: package.spec.clone(),
                from,
                to: InstallState::Installed,
            });
        }

        self.commit(
            &mut entries,
            StatusEntry::with_package(package, InstallState::Installed),
        )
    }

    /// Remove or roll back: `installed`/`half_installed` -> `not_installed`.
    pub fn mark_not_installed(&self, spec: &PackageSpec) -> Result<(), StatusError> {
        let mut entries = self.write();
        let current = entries.get(spec);
        let from = current.map_or(InstallState::NotInstalled, StatusEntry::state);
        if from == InstallState::NotInstalled {
            return Err(StatusError::InvalidTransition {
                spec: spec.clone(),
                from,
                to: InstallState::NotInstalled,
            });
        }

        let entry = match current.and_then(StatusEntry::package) {
            Some(pgh) => StatusEntry::with_package(pgh.clone(), InstallState::NotInstalled),
            None => StatusEntry::without_package(spec.clone(), InstallState::NotInstalled),
        };
        self.commit(&mut entries, entry)
    }

    fn commit(
        &self,
        entries: &mut HashMap<PackageSpec, StatusEntry>,
        entry: StatusEntry,
    ) -> Result<(), StatusError> {
        self.store.write(&entry)?;
        tracing::debug!("{} is now {}", entry.spec(), entry.state());
        entries.insert(entry.spec().clone(), entry);
        Ok(())
    }
}
