//! Abstract clustered graph produced by topology synthesis.
//!
//! This module provides the renderer-independent graph model: a root graph,
//! nested clusters, nodes placed in the root or in a cluster, and edges
//! between nodes. Every element carries an ordered bag of string
//! [`Attributes`] that a rendering backend interprets.
//!
//! # Architecture
//!
//! - [`Graph`]: node and cluster storage in creation order, edge list, and
//!   per-node incoming/outgoing edge indices
//! - [`Scope`]: where a node or cluster lives (root or a parent cluster)
//! - [`GraphError`]: typed mutation failures
//!
//! Mutations are checked: a node or cluster can only be added to a scope that
//! already exists, names are unique per element type, and an edge can only
//! be added once both of its endpoints exist. Backends such as graphviz
//! silently create missing endpoints at root scope, so enforcing
//! node-before-edge here keeps the rendered containment faithful.

use std::{collections::HashMap, fmt};

use indexmap::IndexMap;
use log::trace;
use thiserror::Error;

use crate::identifier::Id;

/// Errors raised by graph mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node `{0}` already exists")]
    DuplicateNode(Id),

    #[error("cluster `{0}` already exists")]
    DuplicateCluster(Id),

    #[error("parent cluster `{0}` does not exist")]
    UnknownCluster(Id),

    #[error("edge endpoint `{0}` does not exist")]
    UnknownNode(Id),
}

/// Ordered string attributes attached to graph elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    /// Creates an empty attribute bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    ///
    /// ```
    /// use tfviz_core::graph::Attributes;
    ///
    /// let attrs = Attributes::new().with("shape", "point").with("style", "invis");
    /// assert_eq!(attrs.get("shape"), Some("point"));
    /// assert_eq!(attrs.len(), 2);
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces an attribute.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value of an attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Placement of a node or cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Directly under the root graph.
    Root,
    /// Inside the cluster with the given identifier.
    Cluster(Id),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Root => f.write_str("root"),
            Scope::Cluster(id) => write!(f, "{id}"),
        }
    }
}

/// A node of the graph.
#[derive(Debug, Clone)]
pub struct Node {
    id: Id,
    scope: Scope,
    attributes: Attributes,
}

impl Node {
    pub fn id(&self) -> Id {
        self.id
    }

    /// The scope the node was placed in.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// A nested cluster (subgraph) of the graph.
#[derive(Debug, Clone)]
pub struct Cluster {
    id: Id,
    scope: Scope,
    attributes: Attributes,
}

impl Cluster {
    pub fn id(&self) -> Id {
        self.id
    }

    /// The scope the cluster is nested in.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Index of an edge in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An edge between two existing nodes.
#[derive(Debug, Clone)]
pub struct Edge {
    source: Id,
    target: Id,
    attributes: Attributes,
}

impl Edge {
    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Clustered graph with checked mutations.
///
/// Nodes and clusters are kept in creation order; edges are kept in emission
/// order. The graph allows multiple edges between the same pair of nodes.
#[derive(Debug, Clone)]
pub struct Graph {
    name: Id,
    directed: bool,
    attributes: Attributes,
    clusters: IndexMap<Id, Cluster>,
    nodes: IndexMap<Id, Node>,
    edges: Vec<Edge>,
    incoming_edges: HashMap<Id, Vec<EdgeIndex>>,
    outgoing_edges: HashMap<Id, Vec<EdgeIndex>>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new(name: &str, directed: bool) -> Self {
        Self {
            name: Id::new(name),
            directed,
            attributes: Attributes::new(),
            clusters: IndexMap::new(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
            incoming_edges: HashMap::new(),
            outgoing_edges: HashMap::new(),
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Graph-level attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key, value);
    }

    fn check_scope(&self, scope: Scope) -> Result<(), GraphError> {
        match scope {
            Scope::Root => Ok(()),
            Scope::Cluster(parent) if self.clusters.contains_key(&parent) => Ok(()),
            Scope::Cluster(parent) => Err(GraphError::UnknownCluster(parent)),
        }
    }

    /// Adds a cluster nested in `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateCluster`] if the name is taken and
    /// [`GraphError::UnknownCluster`] if the parent does not exist.
    pub fn add_cluster(
        &mut self,
        scope: Scope,
        id: Id,
        attributes: Attributes,
    ) -> Result<(), GraphError> {
        if self.clusters.contains_key(&id) {
            return Err(GraphError::DuplicateCluster(id));
        }
        self.check_scope(scope)?;
        trace!(cluster:% = id, scope:% = scope; "Adding cluster");
        self.clusters.insert(
            id,
            Cluster {
                id,
                scope,
                attributes,
            },
        );
        Ok(())
    }

    /// Adds a node placed in `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateNode`] if the name is taken and
    /// [`GraphError::UnknownCluster`] if the parent does not exist.
    pub fn add_node(
        &mut self,
        scope: Scope,
        id: Id,
        attributes: Attributes,
    ) -> Result<(), GraphError> {
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.check_scope(scope)?;
        trace!(node:% = id, scope:% = scope; "Adding node");
        self.nodes.insert(
            id,
            Node {
                id,
                scope,
                attributes,
            },
        );
        Ok(())
    }

    /// Adds an edge between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] naming the first missing endpoint.
    pub fn add_edge(
        &mut self,
        source: Id,
        target: Id,
        attributes: Attributes,
    ) -> Result<EdgeIndex, GraphError> {
        for endpoint in [source, target] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(GraphError::UnknownNode(endpoint));
            }
        }
        trace!(source:% = source, target:% = target; "Adding edge");

        self.edges.push(Edge {
            source,
            target,
            attributes,
        });
        let idx = EdgeIndex(self.edges.len() - 1);
        self.outgoing_edges.entry(source).or_default().push(idx);
        self.incoming_edges.entry(target).or_default().push(idx);
        Ok(idx)
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn cluster(&self, id: Id) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn contains_cluster(&self, id: Id) -> bool {
        self.clusters.contains_key(&id)
    }

    pub fn edge(&self, idx: EdgeIndex) -> Option<&Edge> {
        self.edges.get(idx.0)
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All clusters in creation order.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    /// All edges in emission order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn clusters_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes placed directly in `scope`.
    pub fn nodes_in(&self, scope: Scope) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |node| node.scope == scope)
    }

    /// Clusters nested directly in `scope`.
    pub fn clusters_in(&self, scope: Scope) -> impl Iterator<Item = &Cluster> {
        self.clusters
            .values()
            .filter(move |cluster| cluster.scope == scope)
    }

    /// Edges from `source` to `target`, in emission order.
    pub fn edges_between(&self, source: Id, target: Id) -> impl Iterator<Item = &Edge> {
        self.outgoing_edges
            .get(&source)
            .into_iter()
            .flatten()
            .map(|idx| &self.edges[idx.0])
            .filter(move |edge| edge.target == target)
    }

    /// Targets of edges leaving `source`, one entry per edge.
    pub fn outgoing_nodes(&self, source: Id) -> impl Iterator<Item = Id> {
        self.outgoing_edges
            .get(&source)
            .into_iter()
            .flatten()
            .map(|idx| self.edges[idx.0].target)
    }

    /// Sources of edges entering `target`, one entry per edge.
    pub fn incoming_nodes(&self, target: Id) -> impl Iterator<Item = Id> {
        self.incoming_edges
            .get(&target)
            .into_iter()
            .flatten()
            .map(|idx| self.edges[idx.0].source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_graph() -> Graph {
        let mut graph = Graph::new("G", true);
        graph
            .add_cluster(Scope::Root, Id::new("cluster_vpc"), Attributes::new())
            .unwrap();
        graph
            .add_cluster(
                Scope::Cluster(Id::new("cluster_vpc")),
                Id::new("cluster_subnet"),
                Attributes::new(),
            )
            .unwrap();
        graph
    }

    #[test]
    fn test_scope_display_names_cluster() {
        assert_eq!(Scope::Root.to_string(), "root");
        assert_eq!(
            Scope::Cluster(Id::new("cluster_aws_vpc_main")).to_string(),
            "cluster_aws_vpc_main"
        );
    }

    #[test]
    fn test_graph_new() {
        let graph = Graph::new("G", true);

        assert_eq!(graph.name(), "G");
        assert!(graph.is_directed());
        assert_eq!(graph.nodes_count(), 0);
        assert_eq!(graph.clusters_count(), 0);
        assert_eq!(graph.edges_count(), 0);
    }

    #[test]
    fn test_add_node_to_root_and_cluster() {
        let mut graph = cluster_graph();
        let internet = Id::new("Internet");
        let web = Id::new("aws_instance_web");

        graph
            .add_node(Scope::Root, internet, Attributes::new())
            .unwrap();
        graph
            .add_node(
                Scope::Cluster(Id::new("cluster_subnet")),
                web,
                Attributes::new().with("label", "web"),
            )
            .unwrap();

        assert_eq!(graph.nodes_count(), 2);
        assert_eq!(graph.node(internet).unwrap().scope(), Scope::Root);
        assert_eq!(
            graph.node(web).unwrap().scope(),
            Scope::Cluster(Id::new("cluster_subnet"))
        );
        assert_eq!(graph.node(web).unwrap().attributes().get("label"), Some("web"));
    }

    #[test]
    fn test_add_node_unknown_cluster() {
        let mut graph = Graph::new("G", true);
        let err = graph
            .add_node(
                Scope::Cluster(Id::new("cluster_missing")),
                Id::new("n"),
                Attributes::new(),
            )
            .unwrap_err();

        assert_eq!(err, GraphError::UnknownCluster(Id::new("cluster_missing")));
        assert!(!graph.contains_node(Id::new("n")));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut graph = Graph::new("G", true);
        let id = Id::new("sg-default");
        graph.add_node(Scope::Root, id, Attributes::new()).unwrap();

        let err = graph.add_node(Scope::Root, id, Attributes::new()).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNode(id));
        assert_eq!(graph.nodes_count(), 1);
    }

    #[test]
    fn test_duplicate_cluster_rejected() {
        let mut graph = cluster_graph();
        let err = graph
            .add_cluster(Scope::Root, Id::new("cluster_vpc"), Attributes::new())
            .unwrap_err();
        assert_eq!(err, GraphError::DuplicateCluster(Id::new("cluster_vpc")));
    }

    #[test]
    fn test_add_edge_requires_endpoints() {
        let mut graph = Graph::new("G", true);
        let a = Id::new("a");
        let b = Id::new("b");
        graph.add_node(Scope::Root, a, Attributes::new()).unwrap();

        assert_eq!(
            graph.add_edge(a, b, Attributes::new()).unwrap_err(),
            GraphError::UnknownNode(b)
        );
        assert_eq!(
            graph.add_edge(b, a, Attributes::new()).unwrap_err(),
            GraphError::UnknownNode(b)
        );
        assert_eq!(graph.edges_count(), 0);

        graph.add_node(Scope::Root, b, Attributes::new()).unwrap();
        let idx = graph
            .add_edge(a, b, Attributes::new().with("color", "red"))
            .unwrap();
        assert_eq!(idx.index(), 0);
        assert_eq!(graph.edge(idx).unwrap().attributes().get("color"), Some("red"));
    }

    #[test]
    fn test_scoped_queries() {
        let mut graph = cluster_graph();
        graph
            .add_node(Scope::Cluster(Id::new("cluster_vpc")), Id::new("vpc"), Attributes::new())
            .unwrap();
        graph
            .add_node(
                Scope::Cluster(Id::new("cluster_subnet")),
                Id::new("subnet"),
                Attributes::new(),
            )
            .unwrap();

        let in_vpc: Vec<Id> = graph
            .nodes_in(Scope::Cluster(Id::new("cluster_vpc")))
            .map(Node::id)
            .collect();
        assert_eq!(in_vpc, vec![Id::new("vpc")]);

        let nested: Vec<Id> = graph
            .clusters_in(Scope::Cluster(Id::new("cluster_vpc")))
            .map(Cluster::id)
            .collect();
        assert_eq!(nested, vec![Id::new("cluster_subnet")]);
        assert_eq!(graph.clusters_in(Scope::Root).count(), 1);
    }

    #[test]
    fn test_incoming_and_outgoing() {
        let mut graph = Graph::new("G", true);
        let ids: Vec<Id> = ["src", "dst1", "dst2"].into_iter().map(Id::new).collect();
        for id in &ids {
            graph.add_node(Scope::Root, *id, Attributes::new()).unwrap();
        }
        graph.add_edge(ids[0], ids[1], Attributes::new()).unwrap();
        graph.add_edge(ids[0], ids[2], Attributes::new()).unwrap();
        graph.add_edge(ids[0], ids[1], Attributes::new()).unwrap();

        assert_eq!(graph.outgoing_nodes(ids[0]).count(), 3);
        assert_eq!(graph.incoming_nodes(ids[1]).count(), 2);
        assert_eq!(graph.edges_between(ids[0], ids[1]).count(), 2);
        assert_eq!(graph.edges_between(ids[1], ids[0]).count(), 0);
        assert_eq!(graph.outgoing_nodes(Id::new("missing")).count(), 0);
    }

    #[test]
    fn test_creation_order_is_kept() {
        let mut graph = Graph::new("G", true);
        for name in ["c", "a", "b"] {
            graph.add_node(Scope::Root, Id::new(name), Attributes::new()).unwrap();
        }
        let order: Vec<String> = graph.nodes().map(|n| n.id().to_string()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }
}
