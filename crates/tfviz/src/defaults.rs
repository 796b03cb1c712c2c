//! Default containers and the default security group.
//!
//! When a configuration declares no network, no subnetwork or no security
//! group, the synthesizer creates a single placeholder for the missing tier
//! so every resource has somewhere to go. Placement may also ask for a
//! default container later, when a reference does not resolve; every
//! `ensure_*` method is idempotent.

use tfviz_core::{
    graph::{Attributes, Scope},
    identifier::{Id, ResourceAddress},
};

use crate::synthesis::Synthesizer;

/// Node standing for the implicit default security group.
pub const DEFAULT_SECURITY_GROUP: &str = "sg-default";

const DEFAULT_NAME: &str = "default";

/// Address of the default network, `aws_vpc.default`.
pub fn default_network() -> ResourceAddress {
    ResourceAddress::new("aws_vpc", DEFAULT_NAME)
}

/// Address of the default subnetwork, `aws_subnet.default`.
pub fn default_subnetwork() -> ResourceAddress {
    ResourceAddress::new("aws_subnet", DEFAULT_NAME)
}

impl Synthesizer<'_> {
    /// Creates the placeholders for every tier the store has nothing of.
    pub(crate) fn synthesize_defaults(&mut self) {
        if !self.store.has_networks() {
            self.ensure_default_network();
        }
        if !self.store.has_subnetworks() {
            self.ensure_default_subnetwork();
        }
        if !self.store.has_security_groups() {
            self.ensure_default_security_group();
        }
    }

    /// Returns the default network cluster, creating it at the root if needed.
    pub(crate) fn ensure_default_network(&mut self) -> Id {
        let address = default_network();
        let cluster = address.cluster_id();
        if !self.graph.contains_cluster(cluster) {
            let attributes = Attributes::new().with("label", "VPC: default");
            self.add_container(Scope::Root, &address, attributes);
        }
        cluster
    }

    /// Returns the default subnetwork cluster, creating it if needed.
    ///
    /// It nests in the default network when that one exists, and directly
    /// under the root otherwise.
    pub(crate) fn ensure_default_subnetwork(&mut self) -> Id {
        let address = default_subnetwork();
        let cluster = address.cluster_id();
        if !self.graph.contains_cluster(cluster) {
            let network = default_network().cluster_id();
            let scope = if self.graph.contains_cluster(network) {
                Scope::Cluster(network)
            } else {
                Scope::Root
            };
            let attributes = Attributes::new().with("label", "Subnet: default");
            self.add_container(scope, &address, attributes);
        }
        cluster
    }

    /// Returns the default security group node, creating and registering it
    /// if needed.
    pub(crate) fn ensure_default_security_group(&mut self) -> Id {
        let id = Id::new(DEFAULT_SECURITY_GROUP);
        if self.undefined_groups.register(DEFAULT_SECURITY_GROUP) {
            self.add_node(
                Scope::Root,
                id,
                Attributes::new()
                    .with("style", "dotted")
                    .with("label", DEFAULT_SECURITY_GROUP),
            );
        }
        id
    }

    /// Adds the cluster of `address` with its invisible anchor node, the
    /// endpoint of every edge that targets the container.
    pub(crate) fn add_container(
        &mut self,
        scope: Scope,
        address: &ResourceAddress,
        attributes: Attributes,
    ) {
        let cluster = address.cluster_id();
        if self.add_cluster(scope, cluster, attributes) {
            self.add_node(
                Scope::Cluster(cluster),
                address.node_id(),
                Attributes::new().with("shape", "point").with("style", "invis"),
            );
        }
    }
}
