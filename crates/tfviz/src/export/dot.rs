//! Graphviz backend.
//!
//! The clustered graph is converted into `dot-structures` statements, with
//! every node and cluster declared before the first edge, and printed with
//! `graphviz-rust`. Image formats are produced by piping the DOT text
//! through the `dot` executable, which must be installed.

use std::{
    fs,
    path::{Path, PathBuf},
};

use dot_structures::{
    Attribute, Edge, EdgeTy, Graph as DotGraph, Id as DotId, Node, NodeId, Stmt, Subgraph, Vertex,
};
use graphviz_rust::{
    cmd::{CommandArg, Format as GraphvizFormat},
    exec,
    printer::{DotPrinter, PrinterContext},
};
use log::{debug, info};

use tfviz_core::{
    graph::{Attributes, Graph, Scope},
    identifier::Id,
};

use super::{Error, Exporter, Format};

/// Writes a graph to `path` in the given format.
#[derive(Debug, Clone)]
pub struct DotExporter {
    path: PathBuf,
    format: Format,
}

impl DotExporter {
    pub fn new(path: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Exporter for DotExporter {
    fn export_graph(&mut self, graph: &Graph) -> Result<(), Error> {
        if self.path.exists() {
            return Err(Error::OutputExists(self.path.clone()));
        }

        info!(path:? = self.path, format:% = self.format; "Exporting graph");
        let dot = to_dot(graph);
        let format = match self.format {
            Format::Dot => {
                fs::write(&self.path, print(&dot))?;
                return Ok(());
            }
            Format::Png => GraphvizFormat::Png,
            Format::Svg => GraphvizFormat::Svg,
            Format::Pdf => GraphvizFormat::Pdf,
            Format::Jpg => GraphvizFormat::Jpg,
            Format::Gif => GraphvizFormat::Gif,
        };

        debug!(format:% = self.format; "Running graphviz");
        exec(
            dot,
            &mut PrinterContext::default(),
            vec![
                CommandArg::Format(format),
                CommandArg::Output(self.path.display().to_string()),
            ],
        )
        .map_err(|err| Error::Render(format!("graphviz `dot` failed: {err}")))?;
        Ok(())
    }
}

/// Renders `graph` as DOT text.
pub fn render(graph: &Graph) -> String {
    print(&to_dot(graph))
}

fn print(dot: &DotGraph) -> String {
    dot.print(&mut PrinterContext::default())
}

/// Converts the clustered graph into `dot-structures` form.
pub fn to_dot(graph: &Graph) -> DotGraph {
    let mut stmts = attribute_stmts(graph.attributes());
    stmts.extend(scope_stmts(graph, Scope::Root));
    stmts.extend(graph.edges().map(|edge| {
        Stmt::Edge(Edge {
            ty: EdgeTy::Pair(vertex(edge.source()), vertex(edge.target())),
            attributes: attributes(edge.attributes()),
        })
    }));

    let id = quoted(&graph.name().to_string());
    if graph.is_directed() {
        DotGraph::DiGraph {
            id,
            strict: false,
            stmts,
        }
    } else {
        DotGraph::Graph {
            id,
            strict: false,
            stmts,
        }
    }
}

/// Nodes of `scope` followed by its clusters, each with its own content.
fn scope_stmts(graph: &Graph, scope: Scope) -> Vec<Stmt> {
    let mut stmts: Vec<Stmt> = graph
        .nodes_in(scope)
        .map(|node| {
            Stmt::Node(Node {
                id: node_id(node.id()),
                attributes: attributes(node.attributes()),
            })
        })
        .collect();

    for cluster in graph.clusters_in(scope) {
        let mut cluster_stmts = attribute_stmts(cluster.attributes());
        cluster_stmts.extend(scope_stmts(graph, Scope::Cluster(cluster.id())));
        stmts.push(Stmt::Subgraph(Subgraph {
            id: quoted(&cluster.id().to_string()),
            stmts: cluster_stmts,
        }));
    }
    stmts
}

fn attribute_stmts(attrs: &Attributes) -> Vec<Stmt> {
    attributes(attrs).into_iter().map(Stmt::Attribute).collect()
}

fn attributes(attrs: &Attributes) -> Vec<Attribute> {
    attrs
        .iter()
        .map(|(key, value)| Attribute(DotId::Plain(key.to_string()), quoted(value)))
        .collect()
}

fn node_id(id: Id) -> NodeId {
    NodeId(quoted(&id.to_string()), None)
}

fn vertex(id: Id) -> Vertex {
    Vertex::N(node_id(id))
}

/// A double-quoted DOT identifier. Line breaks become `\n` escapes.
fn quoted(value: &str) -> DotId {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    DotId::Escaped(format!("\"{escaped}\""))
}
