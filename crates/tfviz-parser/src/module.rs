//! In-memory representation of a loaded configuration module.

use std::path::{Path, PathBuf};

use hcl::{Body, Expression, Value};

use tfviz_core::identifier::ResourceAddress;

/// A `variable` block: its name and current value.
///
/// The value starts as the evaluated `default` and is replaced by any
/// assignment found in a variable definitions file.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    value: Option<Value>,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value, `None` when neither a default nor an assignment exists.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = Some(value);
    }
}

/// A managed `resource` block with its undecoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBlock {
    address: ResourceAddress,
    body: Body,
}

impl ResourceBlock {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, body: Body) -> Self {
        Self {
            address: ResourceAddress::new(kind, name),
            body,
        }
    }

    pub fn address(&self) -> &ResourceAddress {
        &self.address
    }

    pub fn kind(&self) -> &str {
        self.address.kind()
    }

    pub fn name(&self) -> &str {
        self.address.name()
    }

    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// A `data` block. Only its address is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    address: ResourceAddress,
}

impl DataSource {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: ResourceAddress::new(kind, name),
        }
    }

    pub fn address(&self) -> &ResourceAddress {
        &self.address
    }

    /// The reference form, `data.kind.name`.
    pub fn qualified(&self) -> String {
        format!("data.{}", self.address.qualified())
    }
}

/// One attribute of a `locals` block, kept unevaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Local {
    name: String,
    expr: Expression,
}

impl Local {
    pub fn new(name: impl Into<String>, expr: Expression) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> &Expression {
        &self.expr
    }
}

/// Every declaration of a configuration module, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    source_dir: Option<PathBuf>,
    variables: Vec<Variable>,
    resources: Vec<ResourceBlock>,
    data_sources: Vec<DataSource>,
    locals: Vec<Local>,
}

impl Module {
    /// Directory the module was loaded from, `None` for in-memory sources.
    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn resources(&self) -> &[ResourceBlock] {
        &self.resources
    }

    pub fn data_sources(&self) -> &[DataSource] {
        &self.data_sources
    }

    pub fn locals(&self) -> &[Local] {
        &self.locals
    }

    /// Looks up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|var| var.name() == name)
    }

    pub(crate) fn set_source_dir(&mut self, dir: PathBuf) {
        self.source_dir = Some(dir);
    }

    pub(crate) fn push_variable(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    pub(crate) fn push_resource(&mut self, resource: ResourceBlock) {
        self.resources.push(resource);
    }

    pub(crate) fn push_data_source(&mut self, data: DataSource) {
        self.data_sources.push(data);
    }

    pub(crate) fn push_local(&mut self, local: Local) {
        self.locals.push(local);
    }

    /// Assigns a variable value, declaring the variable if the module does not.
    pub(crate) fn assign_variable(&mut self, name: &str, value: Value) {
        match self.variables.iter_mut().find(|var| var.name() == name) {
            Some(var) => var.set_value(value),
            None => self.variables.push(Variable::new(name, Some(value))),
        }
    }

    /// Appends every declaration of `other`, keeping declaration order.
    pub(crate) fn merge(&mut self, other: Module) {
        self.variables.extend(other.variables);
        self.resources.extend(other.resources);
        self.data_sources.extend(other.data_sources);
        self.locals.extend(other.locals);
    }
}
