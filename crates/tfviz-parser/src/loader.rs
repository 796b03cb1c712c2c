//! Reading configuration files and variable definitions from disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use hcl::{
    Block, Body,
    eval::{Context, Evaluate},
};
use log::{debug, trace, warn};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError, Result},
    module::{DataSource, Local, Module, ResourceBlock, Variable},
};

const CONFIG_EXTENSION: &str = "tf";
const TFVARS_FILE: &str = "terraform.tfvars";
const AUTO_TFVARS_SUFFIX: &str = ".auto.tfvars";

/// Loads the module at `path`, which is either a single `.tf` file or a
/// directory of them.
pub fn load(path: &Path) -> Result<Module> {
    let (files, dir) = if path.is_dir() {
        let files = config_files(path)?;
        if files.is_empty() {
            return Err(Diagnostic::error(format!(
                "no `.tf` configuration file found in `{}`",
                path.display()
            ))
            .with_code(ErrorCode::E003)
            .into());
        }
        (files, path.to_path_buf())
    } else {
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        (vec![path.to_path_buf()], dir)
    };

    let mut module = Module::default();
    for file in &files {
        debug!(file:? = file; "Loading configuration file");
        let source = read(file)?;
        let parsed = parse(&source).map_err(|err| with_file_subject(err, file))?;
        module.merge(parsed);
    }

    if module.resources().is_empty() {
        return Err(Diagnostic::error("configuration declares no managed resource")
            .with_code(ErrorCode::E004)
            .with_subject(path.display().to_string())
            .with_help("add at least one `resource` block")
            .into());
    }

    apply_variable_files(&mut module, &dir)?;
    module.set_source_dir(dir);
    Ok(module)
}

/// Parses HCL source text into a [`Module`].
pub fn parse(source: &str) -> Result<Module> {
    let body = hcl::parse(source).map_err(|err| {
        ParseError::from(
            Diagnostic::error(err.to_string())
                .with_code(ErrorCode::E002)
                .with_help("fix the HCL syntax error"),
        )
    })?;

    let mut collector = DiagnosticCollector::new();
    let mut module = Module::default();
    for block in body.blocks() {
        collect_block(block, &mut module, &mut collector);
    }
    collector.finish().map(|_| module)
}

fn collect_block(block: &Block, module: &mut Module, collector: &mut DiagnosticCollector) {
    let labels: Vec<&str> = block.labels().iter().map(|label| label.as_str()).collect();
    match block.identifier() {
        "resource" => match labels.as_slice() {
            [kind, name] => module.push_resource(ResourceBlock::new(
                *kind,
                *name,
                block.body().clone(),
            )),
            _ => collector.emit(label_error(block, 2)),
        },
        "data" => match labels.as_slice() {
            [kind, name] => module.push_data_source(DataSource::new(*kind, *name)),
            _ => collector.emit(label_error(block, 2)),
        },
        "variable" => match labels.as_slice() {
            [name] => module.push_variable(Variable::new(*name, variable_default(name, block.body()))),
            _ => collector.emit(label_error(block, 1)),
        },
        "locals" => {
            for attr in block.body().attributes() {
                module.push_local(Local::new(attr.key(), attr.expr().clone()));
            }
        }
        other => trace!(block = other; "Ignoring block"),
    }
}

fn variable_default(name: &str, body: &Body) -> Option<hcl::Value> {
    let attr = body.attributes().find(|attr| attr.key() == "default")?;
    match attr.expr().evaluate(&Context::new()) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(variable = name, err:% = err; "Ignoring variable default that cannot be evaluated");
            None
        }
    }
}

fn label_error(block: &Block, expected: usize) -> Diagnostic {
    Diagnostic::error(format!(
        "`{}` block expects {} label(s), found {}",
        block.identifier(),
        expected,
        block.labels().len()
    ))
    .with_code(ErrorCode::E005)
}

/// Applies `terraform.tfvars` and then every `*.auto.tfvars` file of `dir`.
fn apply_variable_files(module: &mut Module, dir: &Path) -> Result<()> {
    let mut files = Vec::new();
    let tfvars = dir.join(TFVARS_FILE);
    if tfvars.is_file() {
        files.push(tfvars);
    }
    files.extend(sorted_files(dir, |name| name.ends_with(AUTO_TFVARS_SUFFIX))?);

    for file in files {
        debug!(file:? = file; "Applying variable definitions");
        let source = read(&file)?;
        let body = hcl::parse(&source).map_err(|err| tfvars_error(&file, err.to_string()))?;
        let ctx = Context::new();
        for attr in body.attributes() {
            let value = attr
                .expr()
                .evaluate(&ctx)
                .map_err(|err| tfvars_error(&file, err.to_string()))?;
            module.assign_variable(attr.key(), value);
        }
    }
    Ok(())
}

fn tfvars_error(file: &Path, message: String) -> ParseError {
    Diagnostic::error(message)
        .with_code(ErrorCode::E006)
        .with_subject(file.display().to_string())
        .into()
}

fn config_files(dir: &Path) -> Result<Vec<PathBuf>> {
    sorted_files(dir, |name| {
        Path::new(name)
            .extension()
            .is_some_and(|ext| ext == CONFIG_EXTENSION)
    })
}

/// Regular files of `dir` whose name satisfies `filter`, in lexical order.
fn sorted_files(dir: &Path, filter: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| read_error(dir, &err))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| read_error(dir, &err))?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(&filter);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| read_error(path, &err))
}

fn read_error(path: &Path, err: &std::io::Error) -> ParseError {
    Diagnostic::error(format!("cannot read `{}`: {err}", path.display()))
        .with_code(ErrorCode::E001)
        .into()
}

fn with_file_subject(err: ParseError, file: &Path) -> ParseError {
    let subject = file.display().to_string();
    err.diagnostics()
        .iter()
        .cloned()
        .map(|diag| match diag.subject() {
            Some(_) => diag,
            None => diag.with_subject(subject.clone()),
        })
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collects_declarations() {
        let module = parse(
            r#"
            provider "aws" { region = "eu-west-1" }

            variable "cidr" { default = "10.0.0.0/16" }
            variable "name" {}

            locals { env = "prod" }

            data "aws_ami" "ubuntu" { most_recent = true }

            resource "aws_vpc" "main" { cidr_block = var.cidr }
            resource "aws_subnet" "a" { vpc_id = aws_vpc.main.id }
            "#,
        )
        .unwrap();

        assert_eq!(module.variables().len(), 2);
        assert_eq!(
            module.variable("cidr").and_then(Variable::value),
            Some(&hcl::Value::from("10.0.0.0/16"))
        );
        assert!(module.variable("name").unwrap().value().is_none());
        assert_eq!(module.locals().len(), 1);
        assert_eq!(module.locals()[0].name(), "env");
        assert_eq!(module.data_sources()[0].qualified(), "data.aws_ami.ubuntu");

        let addresses: Vec<String> = module
            .resources()
            .iter()
            .map(|res| res.address().qualified())
            .collect();
        assert_eq!(addresses, ["aws_vpc.main", "aws_subnet.a"]);
    }

    #[test]
    fn test_parse_invalid_syntax() {
        let err = parse("resource \"aws_vpc\" {").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E002));
    }

    #[test]
    fn test_parse_rejects_bad_labels() {
        let err = parse(r#"resource "aws_vpc" { cidr_block = "10.0.0.0/16" }"#).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E005));
    }
}
