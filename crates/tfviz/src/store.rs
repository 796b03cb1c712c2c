//! The resource store: decoded records of every supported resource.
//!
//! Decoding is the first of the two synthesis phases. [`ResourceStore::decode_all`]
//! decodes every declaration and builds the security-group membership as it
//! goes; the second phase only ever reads a completed store, so self and peer
//! expansions see every member regardless of declaration order.
//!
//! Records are kept in hash maps. Iteration order is unspecified and may
//! differ between two runs over the same input.

use std::collections::HashMap;

use indexmap::IndexSet;
use log::debug;

use tfviz_core::identifier::ResourceAddress;
use tfviz_parser::{
    Module,
    decode::{Decode, decode_body},
    error::DiagnosticCollector,
    hcl::{Body, eval::Context},
};

use crate::resource::{
    AutoscalingGroup, ComputeInstance, DatabaseInstance, DatabaseSubnetGroup, LoadBalancer,
    Network, ResourceKind, SecurityGroup, Subnetwork,
};

/// Security group reference → addresses of the compute and database
/// instances that attach it, in attachment order.
///
/// Keys are the references exactly as they decode, e.g.
/// `aws_security_group.web` or a literal `sg-0a1b2c`.
#[derive(Debug, Clone, Default)]
pub struct SecurityGroupMembership {
    groups: HashMap<String, IndexSet<String>>,
}

impl SecurityGroupMembership {
    /// Records `member` (`kind.name`) as attached to `group`.
    pub fn record(&mut self, group: &str, member: &str) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(member.to_string());
    }

    /// Members of `group`; empty for a group nobody attaches.
    pub fn members(&self, group: &str) -> impl Iterator<Item = &str> {
        self.groups
            .get(group)
            .into_iter()
            .flat_map(|members| members.iter().map(String::as_str))
    }
}

/// Decoded records of one module.
#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
    networks: HashMap<ResourceAddress, Network>,
    subnetworks: HashMap<ResourceAddress, Subnetwork>,
    compute_instances: HashMap<ResourceAddress, ComputeInstance>,
    database_instances: HashMap<ResourceAddress, DatabaseInstance>,
    database_subnet_groups: HashMap<ResourceAddress, DatabaseSubnetGroup>,
    load_balancers: HashMap<ResourceAddress, LoadBalancer>,
    autoscaling_groups: HashMap<ResourceAddress, AutoscalingGroup>,
    security_groups: HashMap<ResourceAddress, SecurityGroup>,
    membership: SecurityGroupMembership,
    unsupported: Vec<ResourceAddress>,
}

impl ResourceStore {
    /// Decodes every managed resource of `module` against `ctx`.
    ///
    /// Decoding problems are reported into `collector` and never stop the
    /// pass. Resources of unsupported kinds, and load balancers that are not
    /// application load balancers, are recorded in [`Self::unsupported`].
    pub fn decode_all(
        module: &Module,
        ctx: &Context<'_>,
        collector: &mut DiagnosticCollector,
    ) -> Self {
        let mut store = Self::default();

        for resource in module.resources() {
            let address = resource.address().clone();
            let Some(kind) = ResourceKind::from_type(address.kind()) else {
                debug!(resource:% = address; "Resource kind is not supported");
                store.unsupported.push(address);
                continue;
            };

            debug!(resource:% = address; "Decoding resource");
            let body = resource.body();
            match kind {
                ResourceKind::Network => {
                    let record = decode(body, ctx, &address, collector);
                    store.networks.insert(address, record);
                }
                ResourceKind::Subnetwork => {
                    let record = decode(body, ctx, &address, collector);
                    store.subnetworks.insert(address, record);
                }
                ResourceKind::ComputeInstance => {
                    let record: ComputeInstance = decode(body, ctx, &address, collector);
                    for group in record.attached_groups() {
                        store.membership.record(group, &address.qualified());
                    }
                    store.compute_instances.insert(address, record);
                }
                ResourceKind::DatabaseInstance => {
                    let record: DatabaseInstance = decode(body, ctx, &address, collector);
                    for group in record.attached_groups() {
                        store.membership.record(group, &address.qualified());
                    }
                    store.database_instances.insert(address, record);
                }
                ResourceKind::DatabaseSubnetGroup => {
                    let record = decode(body, ctx, &address, collector);
                    store.database_subnet_groups.insert(address, record);
                }
                ResourceKind::LoadBalancer => {
                    let record: LoadBalancer = decode(body, ctx, &address, collector);
                    if record.is_application() {
                        store.load_balancers.insert(address, record);
                    } else {
                        debug!(
                            resource:% = address,
                            load_balancer_type:? = record.load_balancer_type;
                            "Only application load balancers are supported"
                        );
                        store.unsupported.push(address);
                    }
                }
                ResourceKind::AutoscalingGroup => {
                    let record = decode(body, ctx, &address, collector);
                    store.autoscaling_groups.insert(address, record);
                }
                ResourceKind::SecurityGroup => {
                    let record = decode(body, ctx, &address, collector);
                    store.security_groups.insert(address, record);
                }
            }
        }

        store
    }

    pub fn networks(&self) -> impl Iterator<Item = (&ResourceAddress, &Network)> {
        self.networks.iter()
    }

    pub fn subnetworks(&self) -> impl Iterator<Item = (&ResourceAddress, &Subnetwork)> {
        self.subnetworks.iter()
    }

    pub fn compute_instances(&self) -> impl Iterator<Item = (&ResourceAddress, &ComputeInstance)> {
        self.compute_instances.iter()
    }

    pub fn database_instances(
        &self,
    ) -> impl Iterator<Item = (&ResourceAddress, &DatabaseInstance)> {
        self.database_instances.iter()
    }

    pub fn load_balancers(&self) -> impl Iterator<Item = (&ResourceAddress, &LoadBalancer)> {
        self.load_balancers.iter()
    }

    pub fn autoscaling_groups(
        &self,
    ) -> impl Iterator<Item = (&ResourceAddress, &AutoscalingGroup)> {
        self.autoscaling_groups.iter()
    }

    pub fn has_networks(&self) -> bool {
        !self.networks.is_empty()
    }

    pub fn has_subnetworks(&self) -> bool {
        !self.subnetworks.is_empty()
    }

    pub fn has_security_groups(&self) -> bool {
        !self.security_groups.is_empty()
    }

    /// Looks up a network by a `aws_vpc.<name>` reference.
    pub fn network(&self, reference: &str) -> Option<&Network> {
        ResourceAddress::parse(reference).and_then(|address| self.networks.get(&address))
    }

    /// Looks up a subnetwork by a `aws_subnet.<name>` reference.
    pub fn subnetwork(&self, reference: &str) -> Option<&Subnetwork> {
        ResourceAddress::parse(reference).and_then(|address| self.subnetworks.get(&address))
    }

    /// Looks up a security group by a `aws_security_group.<name>` reference.
    pub fn security_group(&self, reference: &str) -> Option<&SecurityGroup> {
        ResourceAddress::parse(reference).and_then(|address| self.security_groups.get(&address))
    }

    /// Looks up a database subnet group by address, then by declared `name`.
    pub fn database_subnet_group(&self, reference: &str) -> Option<&DatabaseSubnetGroup> {
        ResourceAddress::parse(reference)
            .and_then(|address| self.database_subnet_groups.get(&address))
            .or_else(|| {
                self.database_subnet_groups
                    .values()
                    .find(|group| group.name.as_deref() == Some(reference))
            })
    }

    pub fn membership(&self) -> &SecurityGroupMembership {
        &self.membership
    }

    /// Resources that produce no node, in declaration order.
    pub fn unsupported(&self) -> &[ResourceAddress] {
        &self.unsupported
    }
}

fn decode<T: Decode>(
    body: &Body,
    ctx: &Context<'_>,
    address: &ResourceAddress,
    collector: &mut DiagnosticCollector,
) -> T {
    decode_body(body, ctx, &address.qualified(), collector)
}

#[cfg(test)]
mod tests {
    use tfviz_parser::parse_module;

    use super::*;
    use crate::resolver::interpolation_context;

    fn store(source: &str) -> (ResourceStore, DiagnosticCollector) {
        let module = parse_module(source).unwrap();
        let ctx = interpolation_context(&module);
        let mut collector = DiagnosticCollector::new();
        let store = ResourceStore::decode_all(&module, &ctx, &mut collector);
        (store, collector)
    }

    #[test]
    fn test_membership_sees_later_declarations() {
        let (store, collector) = store(
            r#"
            resource "aws_instance" "a" {
              vpc_security_group_ids = [aws_security_group.web.id]
            }
            resource "aws_security_group" "web" {}
            resource "aws_db_instance" "db" {
              vpc_security_group_ids = [aws_security_group.web.id, "sg-external"]
            }
            resource "aws_instance" "b" {
              security_groups = [aws_security_group.web.name]
            }
            "#,
        );
        assert!(collector.is_empty(), "{:?}", collector.diagnostics());

        let members: Vec<&str> = store.membership().members("aws_security_group.web").collect();
        assert_eq!(members, ["aws_instance.a", "aws_db_instance.db", "aws_instance.b"]);
        assert_eq!(
            store.membership().members("sg-external").collect::<Vec<_>>(),
            ["aws_db_instance.db"]
        );
        assert_eq!(store.membership().members("sg-unknown").count(), 0);
        assert!(store.security_group("aws_security_group.web").is_some());
        assert!(store.security_group("sg-external").is_none());
    }

    #[test]
    fn test_unsupported_resources() {
        let (store, _) = store(
            r#"
            resource "aws_s3_bucket" "logs" {}
            resource "aws_lb" "nlb" { load_balancer_type = "network" }
            resource "aws_alb" "web" {}
            "#,
        );
        let unsupported: Vec<String> = store.unsupported().iter().map(|a| a.qualified()).collect();
        assert_eq!(unsupported, ["aws_s3_bucket.logs", "aws_lb.nlb"]);
        assert_eq!(store.load_balancers().count(), 1);
    }

    #[test]
    fn test_database_subnet_group_lookup() {
        let (store, _) = store(
            r#"
            resource "aws_db_subnet_group" "main" {
              name       = "main-db"
              subnet_ids = [aws_subnet.a.id]
            }
            "#,
        );
        assert!(store.database_subnet_group("aws_db_subnet_group.main").is_some());
        assert!(store.database_subnet_group("main-db").is_some());
        assert!(store.database_subnet_group("other").is_none());
    }

    #[test]
    fn test_decoding_problems_are_collected() {
        let (store, collector) = store(
            r#"
            resource "aws_subnet" "a" {
              vpc_id = aws_vpc.missing.id
            }
            "#,
        );
        assert_eq!(store.subnetworks().count(), 1);
        assert_eq!(collector.len(), 2);
        assert!(!collector.has_errors());
    }
}
