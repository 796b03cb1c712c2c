//! Typed decoding of resource bodies.
//!
//! Decoding never fails. Each accessor of [`BodyDecoder`] evaluates one
//! attribute against the interpolation [`Context`]; a missing required
//! attribute, an expression that cannot be evaluated or a value of the wrong
//! type emits a single warning into the [`DiagnosticCollector`] and yields the
//! zero value of the field, so a record always comes back with whatever did
//! decode.

use hcl::{Attribute, Body, Value, eval::Context, eval::Evaluate};
use log::trace;

use crate::error::{Diagnostic, DiagnosticCollector, ErrorCode};

/// A record that can be decoded from a block body.
pub trait Decode: Sized {
    fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self;
}

/// Decodes `body` into a `T`, reporting problems against `subject`.
///
/// # Example
///
/// ```
/// # use tfviz_parser::{decode::{BodyDecoder, Decode, decode_body}, error::DiagnosticCollector};
/// struct Vpc {
///     cidr_block: String,
/// }
///
/// impl Decode for Vpc {
///     fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
///         Self {
///             cidr_block: decoder.required_string("cidr_block"),
///         }
///     }
/// }
///
/// let body = hcl::parse(r#"cidr_block = "10.0.0.0/16""#).unwrap();
/// let mut collector = DiagnosticCollector::new();
/// let vpc: Vpc = decode_body(&body, &hcl::eval::Context::new(), "aws_vpc.main", &mut collector);
///
/// assert_eq!(vpc.cidr_block, "10.0.0.0/16");
/// assert!(collector.is_empty());
/// ```
pub fn decode_body<T: Decode>(
    body: &Body,
    ctx: &Context<'_>,
    subject: &str,
    collector: &mut DiagnosticCollector,
) -> T {
    let mut decoder = BodyDecoder {
        body,
        ctx,
        subject,
        collector,
    };
    T::decode(&mut decoder)
}

/// Field accessors over one block body.
pub struct BodyDecoder<'a, 'c> {
    body: &'a Body,
    ctx: &'a Context<'c>,
    subject: &'a str,
    collector: &'a mut DiagnosticCollector,
}

impl<'a> BodyDecoder<'a, '_> {
    /// A string attribute that must be present. Missing yields `""`.
    pub fn required_string(&mut self, key: &str) -> String {
        self.value(key, true)
            .and_then(|value| self.convert(key, value, to_string, "string"))
            .unwrap_or_default()
    }

    pub fn optional_string(&mut self, key: &str) -> Option<String> {
        let value = self.value(key, false)?;
        self.convert(key, value, to_string, "string")
    }

    pub fn optional_bool(&mut self, key: &str) -> Option<bool> {
        let value = self.value(key, false)?;
        self.convert(key, value, to_bool, "bool")
    }

    /// A boolean attribute defaulting to `false`.
    pub fn bool(&mut self, key: &str) -> bool {
        self.optional_bool(key).unwrap_or_default()
    }

    /// A number attribute that must be present. Missing yields `0`.
    pub fn required_integer(&mut self, key: &str) -> i64 {
        self.value(key, true)
            .and_then(|value| self.convert(key, value, to_integer, "number"))
            .unwrap_or_default()
    }

    /// A list of strings, empty when absent.
    ///
    /// Elements that are not strings are dropped with a warning; the other
    /// elements are kept.
    pub fn string_list(&mut self, key: &str) -> Vec<String> {
        let Some(value) = self.value(key, false) else {
            return Vec::new();
        };
        let Value::Array(items) = value else {
            self.mismatch(key, "list of strings", &value);
            return Vec::new();
        };

        let mut strings = Vec::with_capacity(items.len());
        for item in items {
            match to_string(&item) {
                Some(s) => strings.push(s),
                None if matches!(item, Value::Null) => {}
                None => self.mismatch(key, "string", &item),
            }
        }
        strings
    }

    /// Decodes every nested block named `identifier`, in declaration order.
    pub fn blocks<T: Decode>(&mut self, identifier: &str) -> Vec<T> {
        let body = self.body;
        body.blocks()
            .filter(|block| block.identifier() == identifier)
            .map(|block| {
                let mut nested = BodyDecoder {
                    body: block.body(),
                    ctx: self.ctx,
                    subject: self.subject,
                    collector: &mut *self.collector,
                };
                T::decode(&mut nested)
            })
            .collect()
    }

    fn attribute(&self, key: &str) -> Option<&'a Attribute> {
        let body: &'a Body = self.body;
        body.attributes().find(|attr| attr.key() == key)
    }

    /// Evaluates attribute `key`. `null` counts as absent.
    fn value(&mut self, key: &str, required: bool) -> Option<Value> {
        let Some(attr) = self.attribute(key) else {
            if required {
                self.emit(
                    Diagnostic::warning(format!("missing required argument `{key}`"))
                        .with_code(ErrorCode::E100)
                        .with_help(format!("add a `{key}` argument to the resource")),
                );
            }
            return None;
        };

        match attr.expr().evaluate(self.ctx) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(err) => {
                self.emit(
                    Diagnostic::warning(format!("cannot evaluate `{key}`: {err}"))
                        .with_code(ErrorCode::E101),
                );
                None
            }
        }
    }

    fn convert<T>(
        &mut self,
        key: &str,
        value: Value,
        convert: fn(&Value) -> Option<T>,
        expected: &str,
    ) -> Option<T> {
        let converted = convert(&value);
        if converted.is_none() {
            self.mismatch(key, expected, &value);
        }
        converted
    }

    fn mismatch(&mut self, key: &str, expected: &str, found: &Value) {
        self.emit(
            Diagnostic::warning(format!(
                "argument `{key}` expects a {expected}, found {}",
                type_name(found)
            ))
            .with_code(ErrorCode::E102),
        );
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        let diagnostic = diagnostic.with_subject(self.subject);
        trace!(diagnostic:% = diagnostic; "Decoding diagnostic");
        self.collector.emit(diagnostic);
    }
}

fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Rule {
        from_port: i64,
        cidr_blocks: Vec<String>,
    }

    impl Decode for Rule {
        fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
            Self {
                from_port: decoder.required_integer("from_port"),
                cidr_blocks: decoder.string_list("cidr_blocks"),
            }
        }
    }

    #[derive(Debug)]
    struct Group {
        name: Option<String>,
        vpc_id: String,
        public: bool,
        ingress: Vec<Rule>,
    }

    impl Decode for Group {
        fn decode(decoder: &mut BodyDecoder<'_, '_>) -> Self {
            Self {
                name: decoder.optional_string("name"),
                vpc_id: decoder.required_string("vpc_id"),
                public: decoder.bool("public"),
                ingress: decoder.blocks("ingress"),
            }
        }
    }

    fn decode(source: &str, ctx: &Context<'_>) -> (Group, DiagnosticCollector) {
        let body = hcl::parse(source).unwrap();
        let mut collector = DiagnosticCollector::new();
        let group = decode_body(&body, ctx, "aws_security_group.web", &mut collector);
        (group, collector)
    }

    #[test]
    fn test_decode_nested_blocks_and_conversions() {
        let mut ctx = Context::new();
        let mut vpc = hcl::Map::new();
        let mut main = hcl::Map::new();
        main.insert("id".to_string(), Value::from("aws_vpc.main"));
        vpc.insert("main".to_string(), Value::Object(main));
        ctx.declare_var("aws_vpc", Value::Object(vpc));

        let (group, collector) = decode(
            r#"
            vpc_id = aws_vpc.main.id
            public = "true"
            ingress {
              from_port   = "443"
              cidr_blocks = ["0.0.0.0/0", "10.0.0.0/8"]
            }
            ingress {
              from_port = 22
            }
            "#,
            &ctx,
        );

        assert!(collector.is_empty(), "{:?}", collector.diagnostics());
        assert_eq!(group.vpc_id, "aws_vpc.main");
        assert!(group.name.is_none());
        assert!(group.public);
        assert_eq!(group.ingress.len(), 2);
        assert_eq!(group.ingress[0].from_port, 443);
        assert_eq!(group.ingress[0].cidr_blocks, ["0.0.0.0/0", "10.0.0.0/8"]);
        assert_eq!(group.ingress[1].from_port, 22);
        assert!(group.ingress[1].cidr_blocks.is_empty());
    }

    #[test]
    fn test_decode_reports_and_continues() {
        let (group, collector) = decode(
            r#"
            name   = aws_vpc.unknown.id
            public = [1]
            ingress {
              cidr_blocks = "10.0.0.0/8"
            }
            "#,
            &Context::new(),
        );

        let codes: Vec<_> = collector
            .diagnostics()
            .iter()
            .map(|diag| diag.code())
            .collect();
        assert_eq!(
            codes,
            [
                Some(ErrorCode::E101),
                Some(ErrorCode::E100),
                Some(ErrorCode::E102),
                Some(ErrorCode::E100),
                Some(ErrorCode::E102),
            ]
        );
        assert!(!collector.has_errors());
        assert!(
            collector
                .diagnostics()
                .iter()
                .all(|diag| diag.subject() == Some("aws_security_group.web"))
        );

        assert!(group.name.is_none());
        assert_eq!(group.vpc_id, "");
        assert!(!group.public);
        assert_eq!(group.ingress.len(), 1);
        assert_eq!(group.ingress[0].from_port, 0);
        assert!(group.ingress[0].cidr_blocks.is_empty());
    }

    #[test]
    fn test_null_is_absent() {
        let (group, collector) = decode("vpc_id = \"v\"\nname = null", &Context::new());
        assert!(collector.is_empty());
        assert!(group.name.is_none());
    }
}
