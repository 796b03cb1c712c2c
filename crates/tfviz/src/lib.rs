//! tfviz - Topology graph synthesis for Terraform AWS configurations.
//!
//! Loads a Terraform module, decodes the supported AWS resources and
//! synthesizes a clustered network topology graph: networks and subnetworks
//! become nested clusters, workloads become nodes placed inside them, and
//! security-group rules become edges between nodes.

pub mod config;
pub mod defaults;
pub mod export;
pub mod links;
pub mod materialize;
pub mod resolver;
pub mod resource;
pub mod store;
pub mod synthesis;

mod error;

pub use tfviz_core::{graph, identifier};
pub use tfviz_parser::Module;

pub use error::TfvizError;

use std::path::Path;

use log::{debug, info, trace};

use tfviz_parser::error::DiagnosticCollector;

use config::AppConfig;
use export::{Exporter, Format, dot::DotExporter};
use store::ResourceStore;
use synthesis::Topology;

/// Builder for loading Terraform modules and exporting their topology.
///
/// # Examples
///
/// ```rust,no_run
/// use tfviz::{TopologyBuilder, config::AppConfig, export::Format};
///
/// let builder = TopologyBuilder::new(AppConfig::default());
///
/// let module = builder.load("infra/").expect("Failed to load module");
/// let topology = builder.synthesize(&module).expect("Failed to synthesize");
/// topology.report(builder.config().synthesis());
///
/// builder
///     .export(&topology, Format::Svg, "topology.svg")
///     .expect("Failed to export");
/// ```
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    config: AppConfig,
}

impl TopologyBuilder {
    /// Create a new topology builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load the Terraform module at `path`, a directory or a single file.
    ///
    /// # Errors
    ///
    /// Returns [`TfvizError::Parse`] if the files cannot be read or parsed,
    /// or if the module declares no resources.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Module, TfvizError> {
        let path = path.as_ref();
        info!(path:? = path; "Loading module");

        let module = tfviz_parser::load_module(path)
            .map_err(|err| TfvizError::new_parse_error(err, path))?;

        debug!(
            resources = module.resources().len(),
            variables = module.variables().len();
            "Module loaded"
        );
        Ok(module)
    }

    /// Parse a module from configuration source text.
    ///
    /// # Errors
    ///
    /// Returns [`TfvizError::Parse`] if the source is not valid HCL.
    pub fn parse(&self, source: &str) -> Result<Module, TfvizError> {
        tfviz_parser::parse_module(source).map_err(|err| TfvizError::new_parse_error(err, "<input>"))
    }

    /// Decode the resources of `module` and synthesize its topology.
    ///
    /// # Errors
    ///
    /// Returns [`TfvizError::Config`] if the style configuration is invalid.
    /// Problems in the module itself are reported as diagnostics on the
    /// returned [`Topology`].
    pub fn synthesize(&self, module: &Module) -> Result<Topology, TfvizError> {
        info!("Synthesizing topology");

        let ctx = resolver::interpolation_context(module);
        let mut collector = DiagnosticCollector::new();
        let store = ResourceStore::decode_all(module, &ctx, &mut collector);

        let topology = synthesis::synthesize(&store, &self.config, collector)?;
        trace!(graph:? = topology.graph(); "Synthesized graph");
        Ok(topology)
    }

    /// Render the topology as DOT text.
    pub fn render_dot(&self, topology: &Topology) -> String {
        export::dot::render(topology.graph())
    }

    /// Export the topology to `path` in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`TfvizError::OutputExists`] if `path` exists, or
    /// [`TfvizError::Export`] if rendering or writing fails.
    pub fn export(
        &self,
        topology: &Topology,
        format: Format,
        path: impl AsRef<Path>,
    ) -> Result<(), TfvizError> {
        let mut exporter = DotExporter::new(path.as_ref(), format);
        exporter.export_graph(topology.graph())?;
        info!(path:? = exporter.path(); "Topology exported");
        Ok(())
    }
}
