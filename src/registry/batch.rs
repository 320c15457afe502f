//! Batch coordinator
//!
//! Resolves the latest version for every dependency with one registry
//! request per unique (manager, name) pair:
//! 1. dedup within each manager, first occurrence wins
//! 2. chunk into manager-sized batches; batches run in order, requests
//!    inside a batch run concurrently
//! 3. the three manager pipelines run concurrently
//! 4. once everything has settled, broadcast the results onto every record

use crate::domain::{Dependency, DependencyKey, Manager, UpdateType};
use crate::progress::Progress;
use crate::registry::{create_adapter, HttpClient, RegistryAdapter};
use crate::update::classify;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};

/// Resolved registry data for one unique dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub latest_version: String,
    pub update_type: UpdateType,
}

/// Counts and failures from one resolution pass
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Unique (manager, name) pairs queried
    pub unique: usize,
    /// Pairs that resolved successfully
    pub resolved: usize,
    /// One message per pair that failed after retries
    pub errors: Vec<String>,
}

/// A unique dependency to look up, with the constraint used for classification
struct Lookup {
    name: String,
    current_version: String,
}

type ManagerResults = (Vec<(DependencyKey, Resolution)>, Vec<String>);

/// Drives registry adapters over deduplicated batches
pub struct BatchCoordinator {
    adapters: Vec<Box<dyn RegistryAdapter>>,
}

impl BatchCoordinator {
    /// Coordinator over the public npm, PyPI and RubyGems registries
    pub fn new(client: HttpClient) -> Self {
        let adapters = Manager::all()
            .iter()
            .map(|manager| create_adapter(*manager, client.clone()))
            .collect();
        Self { adapters }
    }

    /// Coordinator over custom adapters
    pub fn with_adapters(adapters: Vec<Box<dyn RegistryAdapter>>) -> Self {
        Self { adapters }
    }

    fn adapter(&self, manager: Manager) -> Option<&dyn RegistryAdapter> {
        self.adapters
            .iter()
            .find(|a| a.manager() == manager)
            .map(|a| a.as_ref())
    }

    /// Resolves `dependencies` in place; `current_version` is never touched
    pub async fn resolve(&self, dependencies: &mut [Dependency], progress: &Progress) -> BatchOutcome {
        let mut lookups = unique_lookups(dependencies);
        let unique = lookups.values().map(Vec::len).sum();

        for manager in Manager::all() {
            let count = lookups.get(manager).map_or(0, Vec::len);
            tracing::info!(manager = %manager, unique = count, "resolving latest versions");
        }

        let mut take = |manager: Manager| lookups.remove(&manager).unwrap_or_default();
        let (npm, pypi, rubygems) = (
            take(Manager::Npm),
            take(Manager::Pypi),
            take(Manager::Rubygems),
        );

        let (npm, pypi, rubygems) = tokio::join!(
            self.resolve_manager(Manager::Npm, npm, progress),
            self.resolve_manager(Manager::Pypi, pypi, progress),
            self.resolve_manager(Manager::Rubygems, rubygems, progress),
        );

        let mut resolutions = HashMap::new();
        let mut errors = Vec::new();
        for (resolved, failed) in [npm, pypi, rubygems] {
            resolutions.extend(resolved);
            errors.extend(failed);
        }

        let outcome = BatchOutcome {
            unique,
            resolved: resolutions.len(),
            errors,
        };
        broadcast(dependencies, &resolutions);
        outcome
    }

    async fn resolve_manager(
        &self,
        manager: Manager,
        lookups: Vec<Lookup>,
        progress: &Progress,
    ) -> ManagerResults {
        let mut resolved = Vec::with_capacity(lookups.len());
        let mut errors = Vec::new();
        if lookups.is_empty() {
            return (resolved, errors);
        }

        let Some(adapter) = self.adapter(manager) else {
            tracing::warn!(manager = %manager, "no registry adapter configured");
            errors.extend(
                lookups
                    .iter()
                    .map(|l| format!("{}: no registry adapter for {}", l.name, manager)),
            );
            return (resolved, errors);
        };

        let batch_size = manager.batch_size();
        let total_batches = lookups.len().div_ceil(batch_size);

        for (index, batch) in lookups.chunks(batch_size).enumerate() {
            tracing::debug!(
                manager = %manager,
                batch = index + 1,
                total = total_batches,
                size = batch.len(),
                "processing batch"
            );

            let results = join_all(batch.iter().map(|lookup| async move {
                (lookup, adapter.fetch_latest(&lookup.name).await)
            }))
            .await;

            for (lookup, result) in results {
                progress.inc();
                match result {
                    Ok(latest) => {
                        let update_type = classify(&lookup.current_version, &latest);
                        resolved.push((
                            (manager, lookup.name.clone()),
                            Resolution {
                                latest_version: latest,
                                update_type,
                            },
                        ));
                    }
                    Err(e) => {
                        tracing::error!(
                            package = %lookup.name,
                            manager = %manager,
                            "failed to fetch latest version after retries: {}",
                            e
                        );
                        errors.push(format!("{} ({}): {}", lookup.name, manager, e));
                    }
                }
            }
        }

        (resolved, errors)
    }
}

/// Number of registry requests `resolve` will make
pub fn unique_count(dependencies: &[Dependency]) -> usize {
    dependencies
        .iter()
        .map(Dependency::key)
        .collect::<HashSet<_>>()
        .len()
}

/// First occurrence of each name, per manager, in declaration order
fn unique_lookups(dependencies: &[Dependency]) -> HashMap<Manager, Vec<Lookup>> {
    let mut seen: HashSet<DependencyKey> = HashSet::new();
    let mut lookups: HashMap<Manager, Vec<Lookup>> = HashMap::new();

    for dep in dependencies {
        if seen.insert(dep.key()) {
            lookups.entry(dep.manager).or_default().push(Lookup {
                name: dep.name.clone(),
                current_version: dep.current_version.clone(),
            });
        }
    }

    lookups
}

/// Copies resolved data onto every record sharing the key
fn broadcast(dependencies: &mut [Dependency], resolutions: &HashMap<DependencyKey, Resolution>) {
    for dep in dependencies.iter_mut() {
        if let Some(resolution) = resolutions.get(&dep.key()) {
            dep.latest_version = Some(resolution.latest_version.clone());
            dep.update_type = Some(resolution.update_type);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileType;
    use crate::error::RegistryError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Stats {
        calls: Mutex<HashMap<String, usize>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    struct MockAdapter {
        manager: Manager,
        versions: HashMap<String, String>,
        stats: Arc<Stats>,
    }

    impl MockAdapter {
        fn boxed(manager: Manager, versions: &[(&str, &str)], stats: Arc<Stats>) -> Box<dyn RegistryAdapter> {
            Box::new(Self {
                manager,
                versions: versions
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect(),
                stats,
            })
        }
    }

    #[async_trait]
    impl RegistryAdapter for MockAdapter {
        fn manager(&self) -> Manager {
            self.manager
        }

        fn registry_name(&self) -> &'static str {
            "mock"
        }

        async fn fetch_latest(&self, package: &str) -> Result<String, RegistryError> {
            *self
                .stats
                .calls
                .lock()
                .unwrap()
                .entry(package.to_string())
                .or_default() += 1;
            let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.stats.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.versions
                .get(package)
                .cloned()
                .ok_or_else(|| RegistryError::package_not_found(package, "mock"))
        }
    }

    fn dep(name: &str, current: &str, file_type: FileType, repo: &str) -> Dependency {
        Dependency::new(
            name,
            current,
            file_type,
            repo,
            format!("/src/{repo}"),
            format!("/src/{repo}/{}", file_type.as_str()),
        )
    }

    #[tokio::test]
    async fn test_dedup_single_call_and_broadcast() {
        let stats = Arc::new(Stats::default());
        let coordinator = BatchCoordinator::with_adapters(vec![MockAdapter::boxed(
            Manager::Npm,
            &[("lodash", "4.17.21")],
            stats.clone(),
        )]);

        let mut deps = vec![
            dep("lodash", "^4.17.20", FileType::PackageJson, "web"),
            dep("lodash", "4.0.0", FileType::PackageJson, "api"),
            dep("lodash", "~4.17.0", FileType::PackageJson, "docs"),
        ];
        let outcome = coordinator.resolve(&mut deps, &Progress::disabled()).await;

        assert_eq!(stats.calls.lock().unwrap()["lodash"], 1);
        assert_eq!(unique_count(&deps), 1);
        assert_eq!(outcome.unique, 1);
        assert_eq!(outcome.resolved, 1);
        for d in &deps {
            assert_eq!(d.latest_version.as_deref(), Some("4.17.21"));
            assert_eq!(d.update_type, Some(UpdateType::Patch));
        }
        assert_eq!(deps[1].current_version, "4.0.0");
        assert_eq!(deps[2].current_version, "~4.17.0");
    }

    #[tokio::test]
    async fn test_same_name_different_managers_not_merged() {
        let stats = Arc::new(Stats::default());
        let coordinator = BatchCoordinator::with_adapters(vec![
            MockAdapter::boxed(Manager::Npm, &[("json", "11.0.0")], stats.clone()),
            MockAdapter::boxed(Manager::Rubygems, &[("json", "2.7.1")], stats.clone()),
        ]);

        let mut deps = vec![
            dep("json", "10.0.0", FileType::PackageJson, "web"),
            dep("json", "2.7.0", FileType::Gemfile, "shop"),
        ];
        coordinator.resolve(&mut deps, &Progress::disabled()).await;

        assert_eq!(stats.calls.lock().unwrap()["json"], 2);
        assert_eq!(deps[0].latest_version.as_deref(), Some("11.0.0"));
        assert_eq!(deps[0].update_type, Some(UpdateType::Major));
        assert_eq!(deps[1].latest_version.as_deref(), Some("2.7.1"));
        assert_eq!(deps[1].update_type, Some(UpdateType::Patch));
    }

    #[tokio::test]
    async fn test_npm_batches_of_twenty() {
        let stats = Arc::new(Stats::default());
        let names: Vec<String> = (0..25).map(|i| format!("pkg-{i}")).collect();
        let versions: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "1.0.1")).collect();
        let coordinator = BatchCoordinator::with_adapters(vec![MockAdapter::boxed(
            Manager::Npm,
            &versions,
            stats.clone(),
        )]);

        let mut deps: Vec<_> = names
            .iter()
            .map(|n| dep(n, "1.0.0", FileType::PackageJson, "web"))
            .collect();
        let outcome = coordinator.resolve(&mut deps, &Progress::disabled()).await;

        assert_eq!(outcome.resolved, 25);
        assert_eq!(stats.max_in_flight.load(Ordering::SeqCst), 20);
    }

    #[tokio::test]
    async fn test_pypi_batches_of_ten() {
        let stats = Arc::new(Stats::default());
        let names: Vec<String> = (0..15).map(|i| format!("lib{i}")).collect();
        let versions: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "2.0.0")).collect();
        let coordinator = BatchCoordinator::with_adapters(vec![MockAdapter::boxed(
            Manager::Pypi,
            &versions,
            stats.clone(),
        )]);

        let mut deps: Vec<_> = names
            .iter()
            .map(|n| dep(n, ">=1.0.0", FileType::PyprojectToml, "svc"))
            .collect();
        coordinator.resolve(&mut deps, &Progress::disabled()).await;

        assert_eq!(stats.max_in_flight.load(Ordering::SeqCst), 10);
        assert!(deps.iter().all(|d| d.update_type == Some(UpdateType::Major)));
    }

    /// Holds every request until one request per manager is in flight
    struct RendezvousAdapter {
        manager: Manager,
        barrier: Arc<tokio::sync::Barrier>,
        stats: Arc<Stats>,
    }

    #[async_trait]
    impl RegistryAdapter for RendezvousAdapter {
        fn manager(&self) -> Manager {
            self.manager
        }

        fn registry_name(&self) -> &'static str {
            "rendezvous"
        }

        async fn fetch_latest(&self, _package: &str) -> Result<String, RegistryError> {
            let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.stats.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.barrier.wait().await;
            self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("9.9.9".to_string())
        }
    }

    #[tokio::test]
    async fn test_manager_pipelines_run_concurrently() {
        let stats = Arc::new(Stats::default());
        let barrier = Arc::new(tokio::sync::Barrier::new(3));
        let coordinator = BatchCoordinator::with_adapters(
            Manager::all()
                .iter()
                .map(|manager| {
                    Box::new(RendezvousAdapter {
                        manager: *manager,
                        barrier: barrier.clone(),
                        stats: stats.clone(),
                    }) as Box<dyn RegistryAdapter>
                })
                .collect(),
        );

        let mut deps = vec![
            dep("react", "18.0.0", FileType::PackageJson, "web"),
            dep("django", "5.0.0", FileType::PyprojectToml, "api"),
            dep("rails", "7.1.0", FileType::Gemfile, "shop"),
            dep("react", "17.0.0", FileType::PackageJson, "admin"),
        ];
        let progress = Progress::disabled();
        let resolve = coordinator.resolve(&mut deps, &progress);
        let outcome = tokio::time::timeout(std::time::Duration::from_secs(5), resolve)
            .await
            .expect("a manager pipeline waited on another");

        assert_eq!(outcome.resolved, 3);
        assert_eq!(stats.max_in_flight.load(Ordering::SeqCst), 3);
        assert!(deps
            .iter()
            .all(|d| d.latest_version.as_deref() == Some("9.9.9")));
        assert_eq!(deps[3].update_type, Some(UpdateType::Major));
        assert_eq!(deps[0].update_type, Some(UpdateType::Major));
    }

    #[tokio::test]
    async fn test_broadcast_waits_for_slowest_manager() {
        let stats = Arc::new(Stats::default());
        let coordinator = BatchCoordinator::with_adapters(vec![
            MockAdapter::boxed(Manager::Npm, &[("left-pad", "1.0.1")], stats.clone()),
            Box::new(SlowAdapter {
                manager: Manager::Rubygems,
                delay: std::time::Duration::from_millis(50),
            }),
        ]);

        let mut deps = vec![
            dep("left-pad", "1.0.0", FileType::PackageJson, "web"),
            dep("rake", "13.0.0", FileType::Gemfile, "shop"),
            dep("left-pad", "1.0.0", FileType::PackageJson, "docs"),
            dep("rake", "13.0.0", FileType::Gemspec, "shop"),
        ];
        let outcome = coordinator.resolve(&mut deps, &Progress::disabled()).await;

        assert_eq!(outcome.resolved, 2);
        assert!(deps.iter().all(|d| d.update_type == Some(UpdateType::Patch)));
        assert_eq!(deps[3].latest_version.as_deref(), Some("13.0.1"));
    }

    struct SlowAdapter {
        manager: Manager,
        delay: std::time::Duration,
    }

    #[async_trait]
    impl RegistryAdapter for SlowAdapter {
        fn manager(&self) -> Manager {
            self.manager
        }

        fn registry_name(&self) -> &'static str {
            "slow"
        }

        async fn fetch_latest(&self, _package: &str) -> Result<String, RegistryError> {
            tokio::time::sleep(self.delay).await;
            Ok("13.0.1".to_string())
        }
    }

    #[tokio::test]
    async fn test_failure_leaves_dependency_unresolved() {
        let stats = Arc::new(Stats::default());
        let coordinator = BatchCoordinator::with_adapters(vec![MockAdapter::boxed(
            Manager::Rubygems,
            &[("rails", "7.1.3")],
            stats,
        )]);

        let mut deps = vec![
            dep("rails", "~> 7.0", FileType::Gemfile, "shop"),
            dep("no-such-gem", "1.0.0", FileType::Gemfile, "shop"),
        ];
        let outcome = coordinator.resolve(&mut deps, &Progress::disabled()).await;

        assert_eq!(outcome.unique, 2);
        assert_eq!(outcome.resolved, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("no-such-gem"));
        assert_eq!(deps[0].update_type, Some(UpdateType::Minor));
        assert!(deps[1].latest_version.is_none());
        assert!(deps[1].update_type.is_none());
    }

    #[tokio::test]
    async fn test_missing_adapter_reports_errors() {
        let coordinator = BatchCoordinator::with_adapters(Vec::new());
        let mut deps = vec![dep("left-pad", "1.0.0", FileType::PackageJson, "web")];
        let outcome = coordinator.resolve(&mut deps, &Progress::disabled()).await;

        assert_eq!(outcome.resolved, 0);
        assert_eq!(outcome.errors.len(), 1);
        assert!(deps[0].latest_version.is_none());
    }
}
