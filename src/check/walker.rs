//! Dependency graph traversal
//!
//! Two passes over the lockfile: the direct pass covers what the project
//! itself declares (runtime, then dev), the opt-in full-graph pass flattens
//! every nested sub-map into a worklist and checks whatever the direct pass
//! did not cover. Edges from either pass run through a bounded lookup pool;
//! one edge failing never disturbs its siblings, and the run registry makes
//! sure a package name is resolved at most once no matter how many parents
//! reference it.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use tracing::warn;

use crate::check::resolver::{self, Decision};
use crate::check::run_registry::RunRegistry;
use crate::config::Config;
use crate::lockfile::types::{PackageLock, PackageNode};
use crate::registry::client::RegistryClient;
use crate::report::{Outcome, PackageReport, Reporter, SaveMode};

/// One unit of work: a package name with its requested spec, the version the
/// lockfile resolved, and how a downgrade would be saved back.
struct Edge {
    name: String,
    requested: String,
    actual: String,
    save_mode: SaveMode,
}

pub struct Walker<'a> {
    client: &'a RegistryClient,
    config: &'a Config,
    cutoff: DateTime<Utc>,
    registry: RunRegistry,
}

impl<'a> Walker<'a> {
    pub fn new(client: &'a RegistryClient, config: &'a Config, cutoff: DateTime<Utc>) -> Self {
        Self {
            client,
            config,
            cutoff,
            registry: RunRegistry::new(),
        }
    }

    /// Check the lockfile against the cutoff. Reports are emitted through the
    /// reporter as they complete and returned in completion order; the call
    /// returns only once every pass has drained.
    pub async fn walk(&self, lock: &PackageLock, reporter: &Reporter) -> Vec<PackageReport> {
        let root = lock.root();
        let mut reports = Vec::new();

        let runtime = self.direct_edges(lock, &root.dependencies, reporter);
        self.run_pass(runtime, reporter, &mut reports).await;

        let dev = self.direct_edges(lock, &root.dev_dependencies, reporter);
        self.run_pass(dev, reporter, &mut reports).await;

        if self.config.full_graph {
            reporter.section("transitive dependencies");
            self.run_pass(transitive_edges(lock), reporter, &mut reports)
                .await;
        }

        reports
    }

    /// Edges for one root mapping. A declared name with no entry in the flat
    /// dependency map is a data-quality problem in the lockfile, not a crash:
    /// it is reported and skipped without claiming the name.
    fn direct_edges(
        &self,
        lock: &PackageLock,
        declared: &IndexMap<String, String>,
        reporter: &Reporter,
    ) -> Vec<Edge> {
        declared
            .iter()
            .filter_map(|(name, requested)| match lock.dependencies.get(name) {
                Some(node) => Some(Edge {
                    name: name.clone(),
                    requested: requested.clone(),
                    actual: node.version.clone(),
                    save_mode: SaveMode::Exact,
                }),
                None => {
                    warn!("lockfile declares {name} at the root but resolves no entry for it");
                    reporter.missing_graph_entry(name);
                    None
                }
            })
            .collect()
    }

    /// Drive one batch of edges through the pool. Submission order is the
    /// edge order; completion order is whatever the lookups make of it.
    async fn run_pass(
        &self,
        edges: Vec<Edge>,
        reporter: &Reporter,
        reports: &mut Vec<PackageReport>,
    ) {
        let mut results = stream::iter(edges)
            .map(|edge| self.check_edge(edge))
            .buffer_unordered(self.config.parallel_limit.max(1));

        while let Some(result) = results.next().await {
            if let Some(report) = result {
                reporter.emit(&report);
                reports.push(report);
            }
        }
    }

    /// Resolve one edge. Losing the claim race (or arriving after the name is
    /// done) produces no report at all.
    async fn check_edge(&self, edge: Edge) -> Option<PackageReport> {
        if !self.registry.claim(&edge.name) {
            return None;
        }

        let outcome = self.judge(&edge).await;
        Some(PackageReport {
            name: edge.name,
            requested: edge.requested,
            actual: edge.actual,
            save_mode: edge.save_mode,
            outcome,
        })
    }

    async fn judge(&self, edge: &Edge) -> Outcome {
        let meta = match self
            .client
            .release_timeline(&edge.name, &edge.requested)
            .await
        {
            Ok(meta) => meta,
            Err(err) => {
                warn!("metadata lookup for {} failed: {err}", edge.name);
                return Outcome::Inconclusive {
                    reason: err.to_string(),
                };
            }
        };

        match resolver::resolve(&meta, &edge.actual, self.cutoff, self.config.include_prerelease) {
            Ok(Decision::Pass { published }) => Outcome::UpToDate { published },
            Ok(Decision::Downgrade { version, published }) => {
                Outcome::Downgrade { version, published }
            }
            Ok(Decision::NoAlternative) => Outcome::NoAlternative,
            Err(err) => {
                warn!("cannot judge {}@{}: {err}", edge.name, edge.actual);
                Outcome::Inconclusive {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Flatten the transitive graph into a worklist.
///
/// A node whose name the root declares is dropped together with its subtree
/// at that point; the direct pass already owns that name. Every other node
/// becomes an edge (its resolved version doubles as the requested spec, since
/// nothing requested it at the root) and its children join the queue
/// regardless of how the node itself will be judged.
fn transitive_edges(lock: &PackageLock) -> Vec<Edge> {
    let root = lock.root();
    let root_names: HashSet<&str> = root
        .dependencies
        .keys()
        .chain(root.dev_dependencies.keys())
        .map(String::as_str)
        .collect();

    let mut edges = Vec::new();
    let mut queue: VecDeque<(&String, &PackageNode)> = lock.dependencies.iter().collect();

    while let Some((name, node)) = queue.pop_front() {
        if root_names.contains(name.as_str()) {
            continue;
        }

        edges.push(Edge {
            name: name.clone(),
            requested: node.version.clone(),
            actual: node.version.clone(),
            save_mode: SaveMode::Peer,
        });

        queue.extend(node.dependencies.iter());
    }

    edges
}
