//! Clusters for networks and subnetworks, nodes for everything placeable.

use log::debug;

use tfviz_core::{
    graph::{Attributes, Scope},
    identifier::{Id, ResourceAddress, normalize},
};
use tfviz_parser::error::{Diagnostic, ErrorCode};

use crate::{resource::DatabaseInstance, synthesis::Synthesizer};

/// Width of one label line.
const LABEL_WIDTH: usize = 8;

const NETWORK_BACKGROUND: &str = "#EDF1F2";
const SUBNETWORK_BACKGROUND: &str = "white";

/// Splits `name` into lines of at most 8 characters.
///
/// ```
/// # use tfviz::materialize::wrap_label;
/// assert_eq!(wrap_label("web"), "web");
/// assert_eq!(wrap_label("webserver01"), "webserve\nr01");
/// ```
pub fn wrap_label(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    chars
        .chunks(LABEL_WIDTH)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cluster identifier a reference such as `aws_subnet.a` points to.
fn referenced_cluster(reference: &str) -> Id {
    Id::new(&format!("cluster_{}", normalize(reference)))
}

impl Synthesizer<'_> {
    /// Creates every cluster and node of the stored resources.
    ///
    /// Networks come first, then subnetworks, so that every container a
    /// resource can be placed in already exists when the resource is placed.
    pub(crate) fn materialize(&mut self) {
        let store = self.store;

        for (address, _) in store.networks() {
            let attributes = Attributes::new()
                .with("label", format!("VPC: {}", address.name()))
                .with("style", "rounded")
                .with("bgcolor", NETWORK_BACKGROUND)
                .with("labeljust", "l");
            self.add_container(Scope::Root, address, attributes);
        }

        for (address, subnetwork) in store.subnetworks() {
            let parent = if store.network(&subnetwork.network_id).is_some() {
                referenced_cluster(&subnetwork.network_id)
            } else {
                self.unresolved(address, "network", &subnetwork.network_id);
                self.ensure_default_network()
            };
            let attributes = Attributes::new()
                .with("label", format!("Subnet: {}", address.name()))
                .with("style", "rounded")
                .with("bgcolor", SUBNETWORK_BACKGROUND)
                .with("labeljust", "l");
            self.add_container(Scope::Cluster(parent), address, attributes);
        }

        for (address, instance) in store.compute_instances() {
            let cluster = match instance.subnetwork_id.as_deref() {
                Some(reference) => self.subnetwork_cluster(address, reference),
                None => self.ensure_default_subnetwork(),
            };
            let attributes = self.resource_attributes(address, "ec2.png", "box");
            self.place(cluster, address, attributes);
        }

        for (address, database) in store.database_instances() {
            let cluster = self.database_cluster(address, database);
            let font_color = if database.publicly_accessible {
                "red"
            } else {
                "black"
            };
            let attributes = self
                .resource_attributes(address, "db.png", "cylinder")
                .with("fontcolor", font_color);
            self.place(cluster, address, attributes);
        }

        for (address, load_balancer) in store.load_balancers() {
            let cluster = self.first_subnetwork_cluster(address, &load_balancer.subnetwork_ids);
            let attributes = self.resource_attributes(address, "alb.png", "diamond");
            self.place(cluster, address, attributes);
        }

        for (address, group) in store.autoscaling_groups() {
            let cluster = self.first_subnetwork_cluster(address, &group.subnetwork_ids);
            let attributes = self.resource_attributes(address, "asg.png", "box3d");
            self.place(cluster, address, attributes);
        }
    }

    fn place(&mut self, cluster: Id, address: &ResourceAddress, attributes: Attributes) {
        debug!(resource:% = address, cluster:% = cluster; "Placing resource");
        self.add_node(Scope::Cluster(cluster), address.node_id(), attributes);
    }

    fn resource_attributes(&self, address: &ResourceAddress, icon: &str, shape: &str) -> Attributes {
        let attributes = Attributes::new().with("label", wrap_label(address.name()));
        match self.style.icon(icon) {
            Some(image) => attributes
                .with("image", image)
                .with("width", "1")
                .with("height", "1")
                .with("fixedsize", "true")
                .with("shape", "none"),
            None => attributes.with("shape", shape),
        }
    }

    /// Cluster of the declared subnetwork `reference`, or the default one.
    fn subnetwork_cluster(&mut self, address: &ResourceAddress, reference: &str) -> Id {
        if self.store.subnetwork(reference).is_some() {
            referenced_cluster(reference)
        } else {
            self.unresolved(address, "subnetwork", reference);
            self.ensure_default_subnetwork()
        }
    }

    /// Placement of load balancers and autoscaling groups.
    ///
    /// Only the first listed subnetwork is used; the others are never looked at.
    fn first_subnetwork_cluster(&mut self, address: &ResourceAddress, subnetworks: &[String]) -> Id {
        match subnetworks.first() {
            Some(first) if self.store.has_subnetworks() => self.subnetwork_cluster(address, first),
            _ => self.ensure_default_subnetwork(),
        }
    }

    /// Databases are placed in the network of the first subnetwork of their
    /// subnet group.
    fn database_cluster(&mut self, address: &ResourceAddress, database: &DatabaseInstance) -> Id {
        let store = self.store;
        let Some(group_reference) = database.subnet_group.as_deref() else {
            return self.ensure_default_network();
        };
        if !store.has_networks() {
            return self.ensure_default_network();
        }

        let network = store
            .database_subnet_group(group_reference)
            .and_then(|group| group.subnetwork_ids.first())
            .and_then(|subnetwork| store.subnetwork(subnetwork))
            .map(|subnetwork| subnetwork.network_id.as_str())
            .filter(|network| store.network(network).is_some());

        match network {
            Some(network) => referenced_cluster(network),
            None => {
                self.emit(
                    Diagnostic::warning(format!(
                        "database subnet group `{group_reference}` does not lead to a declared network"
                    ))
                    .with_code(ErrorCode::E201)
                    .with_subject(address.qualified())
                    .with_help("placing the database in the default VPC"),
                );
                self.ensure_default_network()
            }
        }
    }

    fn unresolved(&mut self, address: &ResourceAddress, tier: &str, reference: &str) {
        self.emit(
            Diagnostic::warning(format!("{tier} `{reference}` is not declared"))
                .with_code(ErrorCode::E200)
                .with_subject(address.qualified())
                .with_help(format!("placing the resource in the default {tier}")),
        );
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_wrap_label_exact_multiple() {
        assert_eq!(wrap_label("abcdefgh"), "abcdefgh");
        assert_eq!(wrap_label("abcdefghijklmnop"), "abcdefgh\nijklmnop");
    }

    proptest! {
        #[test]
        fn wrap_label_keeps_every_character(name in "[a-z0-9_-]{1,40}") {
            let label = wrap_label(&name);
            prop_assert!(!label.is_empty());
            prop_assert_eq!(label.replace('\n', ""), name.clone());
            prop_assert!(label.split('\n').all(|line| !line.is_empty() && line.chars().count() <= LABEL_WIDTH));
            if name.len() <= LABEL_WIDTH {
                prop_assert_eq!(label, name);
            }
        }
    }
}
