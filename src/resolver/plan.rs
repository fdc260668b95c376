//! Install plans - the transitive, ordered view used by `quay install`.
//!
//! A single build attempt only checks its immediate dependencies. The plan
//! builder walks the whole graph up front so the driver can invoke builds
//! in an order where every attempt finds its dependencies installed.

use std::collections::{BTreeSet, HashMap, VecDeque};

use anyhow::Result;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::{filter_dependencies, PackageSpec, SourceParagraph};
use crate::resolver::ResolutionError;
use crate::status::StatusDatabase;

/// One step of an install plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallPlanAction {
    /// A requested spec that is already installed.
    AlreadyInstalled { spec: PackageSpec },
    /// A spec to build from its recipe.
    BuildFromSource {
        spec: PackageSpec,
        source: SourceParagraph,
    },
}

impl InstallPlanAction {
    pub fn spec(&self) -> &PackageSpec {
        match self {
            InstallPlanAction::AlreadyInstalled { spec }
            | InstallPlanAction::BuildFromSource { spec, .. } => spec,
        }
    }
}

/// Somewhere recipes can be looked up by port name.
pub trait PortProvider {
    /// The recipe for `name`, or `None` if there is no such port.
    fn load_port(&self, name: &str) -> Result<Option<SourceParagraph>>;
}

impl PortProvider for HashMap<String, SourceParagraph> {
    fn load_port(&self, name: &str) -> Result<Option<SourceParagraph>> {
        Ok(self.get(name).cloned())
    }
}

/// Order `requests` and everything they need into an install plan.
///
/// Installed dependencies are left out; installed requests appear as
/// [`InstallPlanAction::AlreadyInstalled`]. Dependencies always come before
/// their dependents. Among specs that are ready at the same time, the one
/// discovered first wins: requests in the order given, then each recipe's
/// dependencies in declared order.
pub fn create_install_plan(
    requests: &[PackageSpec],
    ports: &dyn PortProvider,
    status_db: &StatusDatabase,
) -> Result<Vec<InstallPlanAction>, ResolutionError> {
    let mut graph: DiGraph<PackageSpec, ()> = DiGraph::new();
    let mut nodes: HashMap<PackageSpec, NodeIndex> = HashMap::new();
    let mut recipes: HashMap<NodeIndex, SourceParagraph> = HashMap::new();
    let mut queue: VecDeque<(NodeIndex, Option<PackageSpec>)> = VecDeque::new();

    for spec in requests {
        if !nodes.contains_key(spec) {
            let node = graph.add_node(spec.clone());
            nodes.insert(spec.clone(), node);
            if !status_db.is_installed(spec) {
                queue.push_back((node, None));
            }
        }
    }

    while let Some((node, required_by)) = queue.pop_front() {
        let spec = graph[node].clone();
        let source = load_recipe(ports, &spec, required_by)?;

        for name in filter_dependencies(&source.depends, spec.triplet()) {
            let dep = PackageSpec::from_name_and_triplet(&name, spec.triplet()).map_err(
                |source| ResolutionError::InvalidDependencyName {
                    package: spec.clone(),
                    dependency: name.clone(),
                    source,
                },
            )?;

            let dep_node = match nodes.get(&dep) {
                Some(&existing) => existing,
                None if status_db.is_installed(&dep) => continue,
                None => {
                    let added = graph.add_node(dep.clone());
                    nodes.insert(dep, added);
                    queue.push_back((added, Some(spec.clone())));
                    added
                }
            };

            // Edges point from a dependency to its dependent.
            graph.update_edge(dep_node, node, ());
        }

        recipes.insert(node, source);
    }

    let order = order_nodes(&graph)?;

    let plan: Vec<InstallPlanAction> = order
        .into_iter()
        .map(|node| {
            let spec = graph[node].clone();
            match recipes.remove(&node) {
                Some(source) => InstallPlanAction::BuildFromSource { spec, source },
                None => InstallPlanAction::AlreadyInstalled { spec },
            }
        })
        .collect();

    tracing::debug!(
        "install plan: {}",
        plan.iter()
            .map(|a| a.spec().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(plan)
}

fn load_recipe(
    ports: &dyn PortProvider,
    spec: &PackageSpec,
    required_by: Option<PackageSpec>,
) -> Result<SourceParagraph, ResolutionError> {
    let source = ports
        .load_port(spec.name())
        .map_err(|e| ResolutionError::PortLoad {
            name: spec.name().to_string(),
            source: e.into(),
        })?
        .ok_or_else(|| ResolutionError::MissingPort {
            spec: spec.clone(),
            required_by,
        })?;

    if source.name != spec.name() {
        return Err(ResolutionError::MismatchedPort {
            spec: spec.clone(),
            found: source.name,
        });
    }
    Ok(source)
}

/// Kahn's algorithm, always taking the earliest-discovered ready node.
fn order_nodes(graph: &DiGraph<PackageSpec, ()>) -> Result<Vec<NodeIndex>, ResolutionError> {
    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|n| graph.neighbors_directed(n, Direction::Incoming).count())
        .collect();

    let mut ready: BTreeSet<NodeIndex> = graph
        .node_indices()
        .filter(|n| in_degree[n.index()] == 0)
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(node) = ready.pop_first() {
        order.push(node);
        for next in graph.neighbors_directed(node, Direction::Outgoing) {
            in_degree[next.index()] -= 1;
            if in_degree[next.index()] == 0 {
                ready.insert(next);
            }
        }
    }

    if order.len() < graph.node_count() {
        return Err(ResolutionError::Cycle {
            specs: find_cycle(graph),
        });
    }
    Ok(order)
}

fn find_cycle(graph: &DiGraph<PackageSpec, ()>) -> Vec<PackageSpec> {
    tarjan_scc(graph)
        .into_iter()
        .find(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .map(|mut component| {
            component.sort();
            component.into_iter().map(|n| graph[n].clone()).collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Triplet;
    use crate::test_support::{installed_db, paragraph_for, PortFixture};
    use tempfile::TempDir;

    fn triplet() -> Triplet {
        Triplet::from_canonical_name("x64-windows").unwrap()
    }

    fn spec(name: &str) -> PackageSpec {
        PackageSpec::from_name_and_triplet(name, triplet()).unwrap()
    }

    fn ports(fixtures: &[PortFixture]) -> HashMap<String, SourceParagraph> {
        fixtures
            .iter()
            .map(|p| (p.name().to_string(), p.to_source()))
            .collect()
    }

    fn plan_specs(plan: &[InstallPlanAction]) -> Vec<String> {
        plan.iter().map(|a| a.spec().to_string()).collect()
    }

    #[test]
    fn test_dependencies_come_first() {
        let tmp = TempDir::new().unwrap();
        let db = installed_db(tmp.path(), &[]);
        let ports = ports(&[
            PortFixture::new("zlib").depends("libpng (x64-windows), bzip2"),
            PortFixture::new("libpng").depends("bzip2"),
            PortFixture::new("bzip2"),
        ]);

        let plan = create_install_plan(&[spec("zlib")], &ports, &db).unwrap();

        assert_eq!(
            plan_specs(&plan),
            ["bzip2:x64-windows", "libpng:x64-windows", "zlib:x64-windows"]
        );
        assert!(plan
            .iter()
            .all(|a| matches!(a, InstallPlanAction::BuildFromSource { .. })));
    }

    #[test]
    fn test_ties_follow_discovery_order() {
        let tmp = TempDir::new().unwrap();
        let db = installed_db(tmp.path(), &[]);
        let ports = ports(&[
            PortFixture::new("app").depends("zstd, bzip2, lz4"),
            PortFixture::new("zstd"),
            PortFixture::new("bzip2"),
            PortFixture::new("lz4"),
        ]);

        let plan = create_install_plan(&[spec("app")], &ports, &db).unwrap();

        assert_eq!(
            plan_specs(&plan),
            [
                "zstd:x64-windows",
                "bzip2:x64-windows",
                "lz4:x64-windows",
                "app:x64-windows"
            ]
        );
    }

    #[test]
    fn test_installed_specs() {
        let tmp = TempDir::new().unwrap();
        let db = installed_db(
            tmp.path(),
            &[paragraph_for("bzip2", triplet()), paragraph_for("curl", triplet())],
        );
        let ports = ports(&[
            PortFixture::new("zlib").depends("bzip2"),
            PortFixture::new("bzip2"),
        ]);

        let plan = create_install_plan(&[spec("curl"), spec("zlib")], &ports, &db).unwrap();

        assert_eq!(
            plan,
            [
                InstallPlanAction::AlreadyInstalled { spec: spec("curl") },
                InstallPlanAction::BuildFromSource {
                    spec: spec("zlib"),
                    source: PortFixture::new("zlib").depends("bzip2").to_source(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_port_names_requirer() {
        let tmp = TempDir::new().unwrap();
        let db = installed_db(tmp.path(), &[]);
        let ports = ports(&[PortFixture::new("zlib").depends("libpng")]);

        let err = create_install_plan(&[spec("zlib")], &ports, &db).unwrap_err();

        match err {
            ResolutionError::MissingPort {
                spec: missing,
                required_by,
            } => {
                assert_eq!(missing, spec("libpng"));
                assert_eq!(required_by, Some(spec("zlib")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cycle_is_reported() {
        let tmp = TempDir::new().unwrap();
        let db = installed_db(tmp.path(), &[]);
        let ports = ports(&[
            PortFixture::new("app").depends("a"),
            PortFixture::new("a").depends("b"),
            PortFixture::new("b").depends("a"),
        ]);

        let err = create_install_plan(&[spec("app")], &ports, &db).unwrap_err();

        match err {
            ResolutionError::Cycle { specs } => assert_eq!(specs, [spec("a"), spec("b")]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let tmp = TempDir::new().unwrap();
        let db = installed_db(tmp.path(), &[]);
        let ports = ports(&[PortFixture::new("a").depends("a")]);

        let err = create_install_plan(&[spec("a")], &ports, &db).unwrap_err();

        assert!(matches!(err, ResolutionError::Cycle { specs } if specs == [spec("a")]));
    }
}
