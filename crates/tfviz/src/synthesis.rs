//! The synthesis pass: from a decoded [`ResourceStore`] to a [`Topology`].
//!
//! The pass runs these steps in order, each one implemented on
//! [`Synthesizer`] in its own module:
//!
//! 1. the public internet sentinel node
//! 2. default containers and the default security group ([`crate::defaults`])
//! 3. clusters and nodes for every stored resource ([`crate::materialize`])
//! 4. edges derived from security-group rules ([`crate::links`])
//!
//! No step aborts the pass. Rejected graph mutations and unresolved
//! references become diagnostics, and the graph built so far is kept.

use indexmap::IndexSet;
use log::{debug, error, info, warn};

use tfviz_core::{
    graph::{Attributes, Graph, Scope},
    identifier::{Id, ResourceAddress},
};
use tfviz_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode, Severity};

use crate::{
    TfvizError,
    config::{AppConfig, StyleConfig, SynthesisConfig},
    store::ResourceStore,
};

/// Name of the root graph.
pub const GRAPH_NAME: &str = "G";

/// Node standing for the public internet.
pub const INTERNET: &str = "Internet";

/// Security groups that are referenced but never declared.
///
/// Each group is registered once, before its placeholder node is created, so
/// no placeholder is ever created twice.
#[derive(Debug, Clone, Default)]
pub struct UndefinedGroupRegistry {
    groups: IndexSet<String>,
}

impl UndefinedGroupRegistry {
    /// Registers `group`, returning `true` if it was not registered yet.
    pub fn register(&mut self, group: &str) -> bool {
        self.groups.insert(group.to_string())
    }

    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}

/// Result of a synthesis pass.
#[derive(Debug, Clone)]
pub struct Topology {
    graph: Graph,
    diagnostics: Vec<Diagnostic>,
    undefined_groups: UndefinedGroupRegistry,
    unsupported: Vec<ResourceAddress>,
}

impl Topology {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Decoding and synthesis diagnostics, in the order they were emitted.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn undefined_groups(&self) -> &UndefinedGroupRegistry {
        &self.undefined_groups
    }

    /// Resources that were skipped because their kind is not supported.
    pub fn unsupported(&self) -> &[ResourceAddress] {
        &self.unsupported
    }

    /// Logs the diagnostics and, in verbose mode, the unsupported resources.
    pub fn report(&self, config: &SynthesisConfig) {
        for diag in &self.diagnostics {
            match diag.severity() {
                Severity::Error => error!(code:? = diag.code(); "{diag}"),
                Severity::Warning if config.ignore_warnings() => {}
                Severity::Warning => warn!(code:? = diag.code(); "{diag}"),
            }
            if let Some(help) = diag.help() {
                if diag.severity().is_error() || !config.ignore_warnings() {
                    info!("  help: {help}");
                }
            }
        }

        if config.verbose() && !self.unsupported.is_empty() {
            let list: Vec<String> = self
                .unsupported
                .iter()
                .map(|address| format!(" - {address}"))
                .collect();
            warn!("Unsupported resources:\n{}", list.join("\n"));
        }
    }
}

/// Runs the graph-building phase over a completed store.
///
/// `collector` carries the diagnostics of the decoding phase; the returned
/// [`Topology`] holds them followed by those of this pass.
///
/// # Errors
///
/// Returns [`TfvizError::Config`] if a configured color is invalid. Nothing
/// else fails.
pub fn synthesize(
    store: &ResourceStore,
    config: &AppConfig,
    collector: DiagnosticCollector,
) -> Result<Topology, TfvizError> {
    let style = config.style();
    let public_edge_color = style.public_edge_color().map_err(TfvizError::Config)?;
    let background_color = style.background_color().map_err(TfvizError::Config)?;

    let mut synthesizer = Synthesizer {
        store,
        config: config.synthesis(),
        style,
        public_edge_color,
        graph: Graph::new(GRAPH_NAME, true),
        undefined_groups: UndefinedGroupRegistry::default(),
        collector,
    };
    if let Some(color) = background_color {
        synthesizer.graph.set_attribute("bgcolor", color);
    }

    synthesizer.add_internet();
    synthesizer.synthesize_defaults();
    synthesizer.materialize();
    synthesizer.resolve_links();

    debug!(
        nodes = synthesizer.graph.nodes_count(),
        clusters = synthesizer.graph.clusters_count(),
        edges = synthesizer.graph.edges_count();
        "Topology synthesized"
    );

    Ok(Topology {
        graph: synthesizer.graph,
        diagnostics: synthesizer.collector.into_diagnostics(),
        undefined_groups: synthesizer.undefined_groups,
        unsupported: store.unsupported().to_vec(),
    })
}

/// State of one synthesis pass.
pub(crate) struct Synthesizer<'a> {
    pub(crate) store: &'a ResourceStore,
    pub(crate) config: &'a SynthesisConfig,
    pub(crate) style: &'a StyleConfig,
    pub(crate) public_edge_color: &'a str,
    pub(crate) graph: Graph,
    pub(crate) undefined_groups: UndefinedGroupRegistry,
    pub(crate) collector: DiagnosticCollector,
}

impl Synthesizer<'_> {
    fn add_internet(&mut self) {
        let attributes = match self.style.icon("internet.png") {
            Some(icon) => Attributes::new()
                .with("shape", "none")
                .with("label", INTERNET)
                .with("labelloc", "b")
                .with("image", icon),
            None => Attributes::new()
                .with("shape", "octagon")
                .with("label", INTERNET),
        };
        self.add_node(Scope::Root, Id::new(INTERNET), attributes);
    }

    /// Adds a cluster, reporting a rejected mutation as a diagnostic.
    pub(crate) fn add_cluster(&mut self, scope: Scope, id: Id, attributes: Attributes) -> bool {
        if self.config.verbose() {
            debug!(cluster:% = id, scope:% = scope; "Adding cluster");
        }
        match self.graph.add_cluster(scope, id, attributes) {
            Ok(()) => true,
            Err(err) => {
                self.emit_graph_error(err);
                false
            }
        }
    }

    /// Adds a node, reporting a rejected mutation as a diagnostic.
    pub(crate) fn add_node(&mut self, scope: Scope, id: Id, attributes: Attributes) -> bool {
        if self.config.verbose() {
            debug!(node:% = id, scope:% = scope; "Adding node");
        }
        match self.graph.add_node(scope, id, attributes) {
            Ok(()) => true,
            Err(err) => {
                self.emit_graph_error(err);
                false
            }
        }
    }

    /// Adds an edge, reporting a rejected mutation as a diagnostic.
    pub(crate) fn add_edge(&mut self, source: Id, target: Id, attributes: Attributes) {
        if self.config.verbose() {
            debug!(source:% = source, target:% = target; "Adding edge");
        }
        if let Err(err) = self.graph.add_edge(source, target, attributes) {
            self.emit_graph_error(err);
        }
    }

    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) {
        self.collector.emit(diagnostic);
    }

    fn emit_graph_error(&mut self, err: tfviz_core::graph::GraphError) {
        self.emit(Diagnostic::error(err.to_string()).with_code(ErrorCode::E400));
    }
}
