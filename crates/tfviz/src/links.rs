//! Security-group link resolution.
//!
//! For every security group attached to a compute or database instance, and
//! for every enabled direction, the rules of the group are turned into edges
//! between the instance and:
//!
//! - the public internet, for `0.0.0.0/0` and `::/0`
//! - the subnetwork, else the network, whose CIDR contains a literal address
//! - an opaque node for an address outside every modeled network
//! - the other members of the group (`self = true`) or of a referenced group
//!
//! Ingress edges point from the peer to the instance, egress edges from the
//! instance to the peer.
//!
//! When several subnetworks contain the same address, the first one the
//! store yields wins. Store iteration order is unspecified, so which of the
//! overlapping subnetworks is chosen is unspecified too.

use std::net::IpAddr;

use ipnet::IpNet;
use log::trace;

use tfviz_core::{
    graph::{Attributes, Scope},
    identifier::{Id, ResourceAddress, normalize},
};
use tfviz_parser::error::{Diagnostic, ErrorCode};

use crate::{
    resource::{SecurityGroup, SecurityGroupRule},
    synthesis::{INTERNET, Synthesizer},
};

/// CIDR blocks that stand for the whole internet.
const PUBLIC_CIDRS: [&str; 2] = ["0.0.0.0/0", "::/0"];

/// Traffic direction of a security-group rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ingress,
    Egress,
}

impl Direction {
    /// Orders the endpoints of an edge between `peer` and `resource`.
    ///
    /// ```
    /// # use tfviz::links::Direction;
    /// assert_eq!(Direction::Ingress.orient("peer", "res"), ("peer", "res"));
    /// assert_eq!(Direction::Egress.orient("peer", "res"), ("res", "peer"));
    /// ```
    pub fn orient<T>(self, peer: T, resource: T) -> (T, T) {
        match self {
            Direction::Ingress => (peer, resource),
            Direction::Egress => (resource, peer),
        }
    }

    fn rules(self, group: &SecurityGroup) -> &[SecurityGroupRule] {
        match self {
            Direction::Ingress => &group.ingress,
            Direction::Egress => &group.egress,
        }
    }
}

/// A network or subnetwork with a parsed CIDR block.
struct Container {
    anchor: Id,
    net: IpNet,
}

/// Declared containers, most specific tier first.
#[derive(Default)]
struct Containers {
    subnetworks: Vec<Container>,
    networks: Vec<Container>,
}

impl Containers {
    /// Anchor of the first subnetwork containing `addr`, else of the first
    /// network containing it.
    fn find(&self, addr: IpAddr) -> Option<Id> {
        self.subnetworks
            .iter()
            .find(|container| container.net.contains(&addr))
            .or_else(|| {
                self.networks
                    .iter()
                    .find(|container| container.net.contains(&addr))
            })
            .map(|container| container.anchor)
    }
}

impl Synthesizer<'_> {
    /// Emits the edges of every attached security group.
    ///
    /// Runs after materialization: every endpoint other than placeholders
    /// already exists, and placeholders are created right before their
    /// first edge.
    pub(crate) fn resolve_links(&mut self) {
        let store = self.store;
        let mut directions = Vec::with_capacity(2);
        if !self.config.ignore_ingress() {
            directions.push(Direction::Ingress);
        }
        if !self.config.ignore_egress() {
            directions.push(Direction::Egress);
        }
        let containers = self.containers();

        for (address, instance) in store.compute_instances() {
            let mut groups = instance.attached_groups().peekable();
            if groups.peek().is_none() {
                self.link_default_group(address, directions.first().copied());
            }
            for group in groups {
                for &direction in &directions {
                    self.link_group(direction, address, group, &containers);
                }
            }
        }

        for (address, database) in store.database_instances() {
            for group in database.attached_groups() {
                for &direction in &directions {
                    self.link_group(direction, address, group, &containers);
                }
            }
        }
    }

    /// Parses the CIDR block of every declared container.
    fn containers(&mut self) -> Containers {
        let store = self.store;
        let mut containers = Containers::default();
        for (address, subnetwork) in store.subnetworks() {
            if let Some(container) = self.container(address, &subnetwork.cidr_block) {
                containers.subnetworks.push(container);
            }
        }
        for (address, network) in store.networks() {
            if let Some(container) = self.container(address, &network.cidr_block) {
                containers.networks.push(container);
            }
        }
        containers
    }

    fn container(&mut self, address: &ResourceAddress, cidr_block: &str) -> Option<Container> {
        // A missing block was already reported while decoding.
        if cidr_block.is_empty() {
            return None;
        }
        match cidr_block.parse::<IpNet>() {
            Ok(net) => Some(Container {
                anchor: address.node_id(),
                net,
            }),
            Err(err) => {
                self.emit(
                    Diagnostic::warning(format!("invalid CIDR block `{cidr_block}`: {err}"))
                        .with_code(ErrorCode::E301)
                        .with_subject(address.qualified())
                        .with_help("addresses cannot be matched against this container"),
                );
                None
            }
        }
    }

    /// An instance without security groups is attached to the default one.
    ///
    /// A single edge is emitted, ingress when enabled, else egress.
    fn link_default_group(&mut self, address: &ResourceAddress, direction: Option<Direction>) {
        let group = self.ensure_default_security_group();
        if let Some(direction) = direction {
            let (source, target) = direction.orient(group, address.node_id());
            self.add_edge(source, target, Attributes::new());
        }
    }

    fn link_group(
        &mut self,
        direction: Direction,
        address: &ResourceAddress,
        group: &str,
        containers: &Containers,
    ) {
        let store = self.store;
        let node = address.node_id();

        let Some(security_group) = store.security_group(group) else {
            // Undeclared group: a placeholder and a single edge, the first
            // time the group is met.
            if self.undefined_groups.register(group) {
                let placeholder = Id::new(group);
                let attributes = Attributes::new()
                    .with("style", "dotted")
                    .with("label", group);
                self.add_node(Scope::Root, placeholder, attributes);
                let (source, target) = direction.orient(placeholder, node);
                self.add_edge(source, target, Attributes::new());
            }
            return;
        };

        for rule in direction.rules(security_group) {
            trace!(resource:% = address, group, direction:? = direction; "Resolving rule");
            for cidr in rule.cidrs() {
                self.link_cidr(direction, address, cidr, containers);
            }
            if rule.self_reference {
                self.link_members(direction, node, group);
            }
            for peer_group in &rule.security_groups {
                self.link_members(direction, node, peer_group);
            }
        }
    }

    fn link_cidr(
        &mut self,
        direction: Direction,
        address: &ResourceAddress,
        cidr: &str,
        containers: &Containers,
    ) {
        let node = address.node_id();

        if PUBLIC_CIDRS.contains(&cidr) {
            let (source, target) = direction.orient(Id::new(INTERNET), node);
            let attributes = Attributes::new().with("color", self.public_edge_color);
            self.add_edge(source, target, attributes);
            return;
        }

        let net = match cidr.parse::<IpNet>() {
            Ok(net) => net,
            Err(err) => {
                self.emit(
                    Diagnostic::error(format!("invalid CIDR `{cidr}`: {err}"))
                        .with_code(ErrorCode::E300)
                        .with_subject(address.qualified())
                        .with_help("the rule entry is skipped"),
                );
                return;
            }
        };

        let peer = match containers.find(net.addr()) {
            Some(anchor) => anchor,
            None => {
                // Outside every modeled network.
                let external = Id::new(cidr);
                if !self.graph.contains_node(external) {
                    self.add_node(Scope::Root, external, Attributes::new().with("label", cidr));
                }
                external
            }
        };
        let (source, target) = direction.orient(peer, node);
        self.add_edge(source, target, Attributes::new());
    }

    /// Edges between `node` and every other member of `group`.
    fn link_members(&mut self, direction: Direction, node: Id, group: &str) {
        let store = self.store;
        for member in store.membership().members(group) {
            let peer = Id::new(&normalize(member));
            if peer == node {
                continue;
            }
            let (source, target) = direction.orient(peer, node);
            self.add_edge(source, target, Attributes::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containers_prefer_subnetworks() {
        let containers = Containers {
            subnetworks: vec![Container {
                anchor: Id::new("aws_subnet_a"),
                net: "10.0.1.0/24".parse().unwrap(),
            }],
            networks: vec![Container {
                anchor: Id::new("aws_vpc_main"),
                net: "10.0.0.0/16".parse().unwrap(),
            }],
        };

        let inside_subnet: IpAddr = "10.0.1.5".parse().unwrap();
        let inside_network: IpAddr = "10.0.2.5".parse().unwrap();
        let outside: IpAddr = "192.168.0.1".parse().unwrap();
        let v6: IpAddr = "2001:db8::1".parse().unwrap();

        assert_eq!(containers.find(inside_subnet), Some(Id::new("aws_subnet_a")));
        assert_eq!(containers.find(inside_network), Some(Id::new("aws_vpc_main")));
        assert_eq!(containers.find(outside), None);
        assert_eq!(containers.find(v6), None);
    }
}
