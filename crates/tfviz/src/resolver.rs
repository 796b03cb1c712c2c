//! Interpolation context for decoding resource bodies.
//!
//! References between resources are resolved symbolically: every declared
//! resource evaluates to its own `kind.name` address, so an argument such as
//! `subnet_id = aws_subnet.private.id` decodes to `"aws_subnet.private"`,
//! which is exactly the key the placement and link steps look up.

use log::{debug, trace};
use tfviz_parser::{
    Module,
    hcl::{
        Map, Value,
        eval::{Context, Evaluate},
    },
};

/// Variables that appear in a context besides resource kinds.
const VAR: &str = "var";
const LOCAL: &str = "local";
const DATA: &str = "data";

/// Attributes every resource exposes.
const REFERENCE_ATTRIBUTES: [&str; 3] = ["id", "name", "arn"];

/// Builds the interpolation context of `module`.
///
/// The context declares:
/// - `var.<name>`: the variable value, or `"var_<name>"` when it has none
/// - `<kind>.<name>.{id,name,arn}`: `"<kind>.<name>"` for every resource
/// - `data.<kind>.<name>.{id,name,arn}`: `"data.<kind>.<name>"`
/// - `local.<name>`: the evaluated local, or `"local_<name>"` when it cannot
///   be evaluated
///
/// # Example
///
/// ```
/// # use tfviz::resolver::interpolation_context;
/// # use tfviz_parser::{parse_module, hcl::{self, eval::Evaluate}};
/// let module = parse_module(r#"
///     variable "env" {}
///     resource "aws_vpc" "main" {}
/// "#).unwrap();
/// let ctx = interpolation_context(&module);
///
/// let body = hcl::parse("vpc = aws_vpc.main.id\nenv = var.env").unwrap();
/// let values: Vec<_> = body
///     .attributes()
///     .map(|attr| attr.expr().evaluate(&ctx).unwrap())
///     .collect();
/// assert_eq!(values, [hcl::Value::from("aws_vpc.main"), hcl::Value::from("var_env")]);
/// ```
pub fn interpolation_context(module: &Module) -> Context<'static> {
    let mut ctx = Context::new();

    let variables: Map<String, Value> = module
        .variables()
        .iter()
        .map(|var| {
            let value = var
                .value()
                .cloned()
                .unwrap_or_else(|| Value::from(format!("var_{}", var.name())));
            (var.name().to_string(), value)
        })
        .collect();
    ctx.declare_var(VAR, Value::Object(variables));

    let mut kinds: Map<String, Map<String, Value>> = Map::new();
    for resource in module.resources() {
        let address = resource.address();
        if [VAR, LOCAL, DATA].contains(&address.kind()) {
            debug!(resource:% = address; "Resource kind shadows a reserved name");
            continue;
        }
        kinds
            .entry(address.kind().to_string())
            .or_default()
            .insert(address.name().to_string(), reference(&address.qualified()));
    }

    let mut data: Map<String, Map<String, Value>> = Map::new();
    for source in module.data_sources() {
        let address = source.address();
        data.entry(address.kind().to_string())
            .or_default()
            .insert(address.name().to_string(), reference(&source.qualified()));
    }
    ctx.declare_var(DATA, nested(data));

    for (kind, names) in kinds {
        ctx.declare_var(kind, Value::Object(names));
    }

    // Locals may refer to earlier locals, so they are evaluated in order
    // against the context built so far.
    let mut locals = Map::new();
    ctx.declare_var(LOCAL, Value::Object(locals.clone()));
    for local in module.locals() {
        let value = match local.expr().evaluate(&ctx) {
            Ok(value) => value,
            Err(err) => {
                debug!(local = local.name(), err:% = err; "Local cannot be evaluated");
                Value::from(format!("local_{}", local.name()))
            }
        };
        trace!(local = local.name(); "Declaring local");
        locals.insert(local.name().to_string(), value);
        ctx.declare_var(LOCAL, Value::Object(locals.clone()));
    }

    ctx
}

/// An object exposing `id`, `name` and `arn`, all equal to `address`.
fn reference(address: &str) -> Value {
    Value::Object(
        REFERENCE_ATTRIBUTES
            .iter()
            .map(|attr| (attr.to_string(), Value::from(address)))
            .collect(),
    )
}

fn nested(map: Map<String, Map<String, Value>>) -> Value {
    Value::Object(
        map.into_iter()
            .map(|(key, inner)| (key, Value::Object(inner)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use tfviz_parser::{hcl, parse_module};

    use super::*;

    fn try_eval(ctx: &Context<'_>, expr: &str) -> Result<Value, hcl::eval::Error> {
        let body = hcl::parse(&format!("v = {expr}")).unwrap();
        let attr = body.attributes().next().unwrap();
        attr.expr().evaluate(ctx)
    }

    fn eval(ctx: &Context<'_>, expr: &str) -> Value {
        try_eval(ctx, expr).unwrap()
    }

    #[test]
    fn test_context_exposes_every_reference_form() {
        let module = parse_module(
            r#"
            variable "cidr" { default = "10.0.0.0/16" }
            variable "region" {}

            data "aws_ami" "ubuntu" {}

            locals {
              prefix = "app"
              name   = "${local.prefix}-web"
              broken = cidrsubnet(var.cidr, 8, 1)
            }

            resource "aws_vpc" "main" {}
            resource "aws_db_subnet_group" "db" {}
            resource "aws_s3_bucket" "logs" {}
            "#,
        )
        .unwrap();
        let ctx = interpolation_context(&module);

        assert_eq!(eval(&ctx, "var.cidr"), Value::from("10.0.0.0/16"));
        assert_eq!(eval(&ctx, "var.region"), Value::from("var_region"));
        assert_eq!(eval(&ctx, "aws_vpc.main.id"), Value::from("aws_vpc.main"));
        assert_eq!(
            eval(&ctx, "aws_db_subnet_group.db.name"),
            Value::from("aws_db_subnet_group.db")
        );
        assert_eq!(eval(&ctx, "aws_s3_bucket.logs.arn"), Value::from("aws_s3_bucket.logs"));
        assert_eq!(eval(&ctx, "data.aws_ami.ubuntu.id"), Value::from("data.aws_ami.ubuntu"));
        assert_eq!(eval(&ctx, "local.name"), Value::from("app-web"));
        assert_eq!(eval(&ctx, "local.broken"), Value::from("local_broken"));
    }

    #[test]
    fn test_unknown_reference_fails() {
        let module = parse_module(r#"resource "aws_vpc" "main" {}"#).unwrap();
        let ctx = interpolation_context(&module);
        assert!(try_eval(&ctx, "aws_subnet.missing.id").is_err());
    }
}
