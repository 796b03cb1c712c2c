//! Typed records of the supported AWS resource kinds.
//!
//! Only the arguments that matter for the topology are decoded; everything
//! else in a resource body is ignored.

use tfviz_parser::decode::{BodyDecoder, Decode};

/// Kinds of resources that take part in the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Network,
    Subnetwork,
    ComputeInstance,
    DatabaseInstance,
    DatabaseSubnetGroup,
    LoadBalancer,
    AutoscalingGroup,
    SecurityGroup,
}

impl ResourceKind {
    /// Maps a Terraform resource type onto a supported kind.
    ///
    /// ```
    /// # use tfviz::resource::ResourceKind;
    /// assert_eq!(ResourceKind::from_type("aws_alb"), Some(ResourceKind::LoadBalancer));
    /// assert_eq!(ResourceKind::from_type("aws_s3_bucket"), None);
    /// ```
    pub fn from_type(resource_type: &str) -> Option<Self> {
        match resource_type {
            "aws_vpc" => Some(Self::Network),
            "aws_subnet" => Some(Self::Subnetwork),
            "aws_instance" => Some(Self::ComputeInstance),
            "aws_db_instance" => Some(Self::DatabaseInstance),
            "aws_db_subnet_group" => Some(Self::DatabaseSubnetGroup),
            "aws_lb" | "aws_alb" => Some(Self::LoadBalancer),
            "aws_autoscaling_group" => Some(Self::AutoscalingGroup),
            "aws_security_group" => Some(Self::SecurityGroup),
            _ => None,
        }
    }
}

/// An `aws_vpc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    pub cidr_block: String,
}

impl Decode for Network {
    fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
        Self {
            cidr_block: decoder.required_string("cidr_block"),
        }
    }
}

/// An `aws_subnet`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subnetwork {
    pub cidr_block: String,
    /// Reference to the parent network, usually `aws_vpc.<name>`.
    pub network_id: String,
}

impl Decode for Subnetwork {
    fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
        Self {
            cidr_block: decoder.required_string("cidr_block"),
            network_id: decoder.required_string("vpc_id"),
        }
    }
}

/// An `aws_instance`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputeInstance {
    pub subnetwork_id: Option<String>,
    pub security_groups: Vec<String>,
    pub vpc_security_group_ids: Vec<String>,
}

impl ComputeInstance {
    /// Attached security groups: the name-based list then the id-based one.
    pub fn attached_groups(&self) -> impl Iterator<Item = &str> {
        self.security_groups
            .iter()
            .chain(&self.vpc_security_group_ids)
            .map(String::as_str)
    }
}

impl Decode for ComputeInstance {
    fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
        Self {
            subnetwork_id: decoder.optional_string("subnet_id"),
            security_groups: decoder.string_list("security_groups"),
            vpc_security_group_ids: decoder.string_list("vpc_security_group_ids"),
        }
    }
}

/// An `aws_db_instance`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseInstance {
    /// Reference to an `aws_db_subnet_group`, by address or by name.
    pub subnet_group: Option<String>,
    pub publicly_accessible: bool,
    pub security_group_ids: Vec<String>,
}

impl DatabaseInstance {
    pub fn attached_groups(&self) -> impl Iterator<Item = &str> {
        self.security_group_ids.iter().map(String::as_str)
    }
}

impl Decode for DatabaseInstance {
    fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
        Self {
            subnet_group: decoder.optional_string("db_subnet_group_name"),
            publicly_accessible: decoder.bool("publicly_accessible"),
            security_group_ids: decoder.string_list("vpc_security_group_ids"),
        }
    }
}

/// An `aws_db_subnet_group`. Only the first subnetwork is used for placement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSubnetGroup {
    pub name: Option<String>,
    pub subnetwork_ids: Vec<String>,
}

impl Decode for DatabaseSubnetGroup {
    fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
        Self {
            name: decoder.optional_string("name"),
            subnetwork_ids: decoder.string_list("subnet_ids"),
        }
    }
}

/// An `aws_lb` or `aws_alb`. Only the first subnetwork is used for placement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadBalancer {
    pub load_balancer_type: Option<String>,
    pub subnetwork_ids: Vec<String>,
}

impl LoadBalancer {
    /// Application load balancers are the only variant placed in the graph.
    /// A missing type defaults to `application`.
    pub fn is_application(&self) -> bool {
        self.load_balancer_type
            .as_deref()
            .is_none_or(|ty| ty == "application")
    }
}

impl Decode for LoadBalancer {
    fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
        Self {
            load_balancer_type: decoder.optional_string("load_balancer_type"),
            subnetwork_ids: decoder.string_list("subnets"),
        }
    }
}

/// An `aws_autoscaling_group`. Only the first subnetwork is used for placement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoscalingGroup {
    pub subnetwork_ids: Vec<String>,
}

impl Decode for AutoscalingGroup {
    fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
        Self {
            subnetwork_ids: decoder.string_list("vpc_zone_identifier"),
        }
    }
}

/// An `aws_security_group` with its inline rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityGroup {
    pub network_id: Option<String>,
    pub ingress: Vec<SecurityGroupRule>,
    pub egress: Vec<SecurityGroupRule>,
}

impl Decode for SecurityGroup {
    fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
        Self {
            network_id: decoder.optional_string("vpc_id"),
            ingress: decoder.blocks("ingress"),
            egress: decoder.blocks("egress"),
        }
    }
}

/// An `ingress` or `egress` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityGroupRule {
    pub from_port: i64,
    pub to_port: i64,
    pub protocol: String,
    pub cidr_blocks: Vec<String>,
    pub ipv6_cidr_blocks: Vec<String>,
    /// Members of the owning group may reach each other.
    pub self_reference: bool,
    pub security_groups: Vec<String>,
}

impl SecurityGroupRule {
    /// IPv4 blocks followed by IPv6 blocks.
    pub fn cidrs(&self) -> impl Iterator<Item = &str> {
        self.cidr_blocks
            .iter()
            .chain(&self.ipv6_cidr_blocks)
            .map(String::as_str)
    }
}

impl Decode for SecurityGroupRule {
    fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
        Self {
            from_port: decoder.required_integer("from_port"),
            to_port: decoder.required_integer("to_port"),
            protocol: decoder.required_string("protocol"),
            cidr_blocks: decoder.string_list("cidr_blocks"),
            ipv6_cidr_blocks: decoder.string_list("ipv6_cidr_blocks"),
            self_reference: decoder.bool("self"),
            security_groups: decoder.string_list("security_groups"),
        }
    }
}
