//! Identifiers for graph elements and declared resources.
//!
//! [`Id`] is a string-interned handle used for every node and cluster name in
//! a [`Graph`](crate::graph::Graph). [`ResourceAddress`] is the `kind.name`
//! address of a declared resource and knows how that address maps onto node
//! and cluster names.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner backing every [`Id`].
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Interned identifier of a graph node or cluster.
///
/// Identifiers are cheap to copy and compare, which matters because the same
/// names are looked up repeatedly while edges are resolved.
///
/// # Examples
///
/// ```
/// use tfviz_core::identifier::Id;
///
/// let a = Id::new("aws_instance_web");
/// let b: Id = "aws_instance_web".into();
/// assert_eq!(a, b);
/// assert_eq!(a, "aws_instance_web");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string slice, interning it if needed.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the owned string behind this identifier.
    pub fn as_string(&self) -> String {
        interner()
            .resolve(self.0)
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Id {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Replaces every `.` of a reference with `_`, producing a name that is safe
/// to use as a node or cluster identifier.
///
/// ```
/// use tfviz_core::identifier::normalize;
///
/// assert_eq!(normalize("aws_vpc.main"), "aws_vpc_main");
/// assert_eq!(normalize("sg-1234"), "sg-1234");
/// ```
pub fn normalize(reference: &str) -> String {
    reference.replace('.', "_")
}

/// Address of a declared resource: its kind (e.g. `aws_subnet`) and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceAddress {
    kind: String,
    name: String,
}

impl ResourceAddress {
    /// Creates an address from a kind and a name.
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Parses a `kind.name` reference.
    ///
    /// Returns `None` for literal identifiers that are not addresses, such as
    /// `sg-0a1b2c` or `subnet-42`.
    ///
    /// ```
    /// use tfviz_core::identifier::ResourceAddress;
    ///
    /// let addr = ResourceAddress::parse("aws_subnet.private").unwrap();
    /// assert_eq!(addr.kind(), "aws_subnet");
    /// assert_eq!(addr.name(), "private");
    /// assert!(ResourceAddress::parse("sg-0a1b2c").is_none());
    /// ```
    pub fn parse(reference: &str) -> Option<Self> {
        let (kind, name) = reference.split_once('.')?;
        if kind.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(kind, name))
    }

    /// The resource kind, e.g. `aws_instance`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The resource name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fully-qualified `kind.name` form used by references.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.kind, self.name)
    }

    /// Identifier of the node that represents this resource.
    pub fn node_id(&self) -> Id {
        Id::new(&format!("{}_{}", self.kind, self.name))
    }

    /// Identifier of the cluster that represents this resource.
    pub fn cluster_id(&self) -> Id {
        Id::new(&format!("cluster_{}_{}", self.kind, self.name))
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.name)
    }
}
