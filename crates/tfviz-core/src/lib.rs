//! tfviz Core Types
//!
//! This crate provides the foundational types shared by the tfviz crates:
//!
//! - **Identifiers**: String-interned graph identifiers ([`identifier::Id`]) and
//!   resource addresses ([`identifier::ResourceAddress`])
//! - **Graph**: The abstract clustered graph produced by topology synthesis
//!   ([`graph::Graph`])

pub mod graph;
pub mod identifier;
