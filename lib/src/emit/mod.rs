//! Deterministic Turtle rendering of a [`Profile`](crate::model::Profile).
//!
//! Output is written by hand rather than through an RDF serializer so that
//! the layout (prefix order, block order, nested property shapes) is stable
//! across runs and reads well in diffs.
pub mod ontology;
pub mod shapes;

use crate::config::ProfileConfig;
use crate::prefixes::PrefixMap;
use oxigraph::model::NamedNode;

const INDENT: usize = 4;

/// What every emitter needs besides the profile itself.
pub struct EmitContext<'a> {
    pub config: &'a ProfileConfig,
    pub prefixes: &'a PrefixMap,
    pub source_name: &'a str,
    pub source_digest: &'a str,
}

impl EmitContext<'_> {
    pub(crate) fn iri(&self, node: &NamedNode) -> String {
        self.prefixes.compact(node.as_str())
    }

    /// The generated-file banner followed by the prefix declarations.
    pub(crate) fn preamble(&self, document: &str) -> String {
        let name: String = self
            .source_name
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        format!(
            "# {} generated by profilegen from {} (sha256 {}).\n\
             # Regenerate from the source table: manual edits are overwritten.\n\n{}\n",
            document,
            name,
            self.source_digest,
            self.prefixes.turtle_header()
        )
    }
}

/// The predicate-object pairs of one subject or blank node, in order.
#[derive(Debug, Default)]
pub(crate) struct PredicateList {
    pairs: Vec<(String, String)>,
}

impl PredicateList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, predicate: &str, object: impl Into<String>) -> &mut Self {
        self.pairs.push((predicate.to_string(), object.into()));
        self
    }

    pub(crate) fn push_opt(&mut self, predicate: &str, object: Option<String>) -> &mut Self {
        if let Some(object) = object {
            self.push(predicate, object);
        }
        self
    }

    fn render(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        self.pairs
            .iter()
            .map(|(p, o)| format!("{}{} {}", pad, p, o))
            .collect::<Vec<_>>()
            .join(" ;\n")
    }

    /// `[ ... ]` for use as an object at nesting depth `indent`.
    pub(crate) fn blank_node(&self, indent: usize) -> String {
        format!(
            "[\n{}\n{}]",
            self.render(indent + INDENT),
            " ".repeat(indent)
        )
    }

    /// A complete statement. The first pair shares the subject's line.
    pub(crate) fn statement(&self, subject: &str) -> String {
        let mut pairs = self.pairs.iter();
        let Some((p, o)) = pairs.next() else {
            return String::new();
        };
        let mut out = format!("{} {} {}", subject, p, o);
        for (p, o) in pairs {
            out.push_str(&format!(" ;\n{}{} {}", " ".repeat(INDENT), p, o));
        }
        out.push_str(" .\n\n");
        out
    }
}

/// A quoted Turtle string with `\`, `"` and control characters escaped.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub(crate) fn typed_literal(value: &str, datatype: &str) -> String {
    format!("{}^^{}", string_literal(value), datatype)
}
