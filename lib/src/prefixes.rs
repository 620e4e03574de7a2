//! Prefix bindings: CURIE expansion when reading the table, compaction when
//! writing Turtle.
use crate::named_nodes::{OWL_NS, RDFS_NS, RDF_NS, SH_NS, SKOS_NS, XSD_NS};
use oxigraph::model::NamedNode;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const STANDARD_PREFIXES: [(&str, &str); 14] = [
    ("owl", OWL_NS),
    ("rdf", RDF_NS),
    ("rdfs", RDFS_NS),
    ("xsd", XSD_NS),
    ("skos", SKOS_NS),
    ("sh", SH_NS),
    ("dct", "http://purl.org/dc/terms/"),
    ("dcat", "http://www.w3.org/ns/dcat#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("sosa", "http://www.w3.org/ns/sosa/"),
    ("ssn", "http://www.w3.org/ns/ssn/"),
    ("schema", "https://schema.org/"),
    ("unit", "https://qudt.org/vocab/unit/"),
    ("exif", "https://exiftool.org/TagNames/EXIF.html#"),
];

fn prefix_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z]([A-Za-z0-9_.\-]*[A-Za-z0-9_\-])?$").unwrap())
}

fn local_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]([A-Za-z0-9_.\-]*[A-Za-z0-9_\-])?$").unwrap())
}

/// Whether `name` can be written as a Turtle prefix name.
pub fn is_prefix_name(name: &str) -> bool {
    prefix_name_re().is_match(name)
}

/// Whether `local` can follow a prefix in a Turtle prefixed name.
pub fn is_local_name(local: &str) -> bool {
    local_name_re().is_match(local)
}

/// Why a cell could not be turned into an IRI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermError {
    UnknownPrefix,
    InvalidIri,
}

/// A set of prefix bindings, iterated in prefix order.
///
/// Aliases and namespace fixes only affect expansion: they let older tables
/// be read without ever showing up in generated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMap {
    bindings: BTreeMap<String, String>,
    aliases: BTreeMap<String, String>,
    fixes: Vec<(String, String)>,
}

impl PrefixMap {
    pub fn empty() -> Self {
        PrefixMap {
            bindings: BTreeMap::new(),
            aliases: BTreeMap::new(),
            fixes: Vec::new(),
        }
    }

    /// The well-known vocabularies plus `base_prefix` bound to `base_ns`.
    pub fn standard(base_prefix: &str, base_ns: &str) -> Result<Self, String> {
        let mut map = Self::empty();
        for (prefix, ns) in STANDARD_PREFIXES {
            map.insert(prefix, ns)?;
        }
        map.insert(base_prefix, base_ns)?;
        Ok(map)
    }

    pub fn insert(&mut self, prefix: &str, namespace: &str) -> Result<(), String> {
        if !is_prefix_name(prefix) {
            return Err(format!("`{}` is not a valid prefix name", prefix));
        }
        NamedNode::new(namespace)
            .map_err(|e| format!("namespace `{}` for prefix `{}`: {}", namespace, prefix, e))?;
        self.bindings
            .insert(prefix.to_string(), namespace.to_string());
        Ok(())
    }

    /// Binds `prefix` for expansion only. A real binding of the same prefix
    /// takes precedence.
    pub fn alias(&mut self, prefix: &str, namespace: &str) -> Result<(), String> {
        if !is_prefix_name(prefix) {
            return Err(format!("`{}` is not a valid prefix name", prefix));
        }
        self.aliases
            .insert(prefix.to_string(), namespace.to_string());
        Ok(())
    }

    /// Rewrites `from` to `to` inside every expanded IRI.
    pub fn fix_namespace(&mut self, from: &str, to: &str) -> Result<(), String> {
        if from.is_empty() {
            return Err("namespace fix with an empty pattern".to_string());
        }
        self.fixes.push((from.to_string(), to.to_string()));
        Ok(())
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        self.namespace(prefix)
            .or_else(|| self.aliases.get(prefix).map(String::as_str))
    }

    fn named_node(&self, iri: &str) -> Result<NamedNode, TermError> {
        let iri = self
            .fixes
            .iter()
            .fold(iri.to_string(), |iri, (from, to)| iri.replace(from.as_str(), to));
        NamedNode::new(iri).map_err(|_| TermError::InvalidIri)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }

    /// Turns a CURIE, an absolute IRI, or a `<...>`-wrapped IRI into a named node.
    pub fn expand(&self, value: &str) -> Result<NamedNode, TermError> {
        let value = value.trim();
        if let Some(inner) = value.strip_prefix('<').and_then(|v| v.strip_suffix('>')) {
            return self.named_node(inner.trim());
        }
        if is_absolute(value) {
            return self.named_node(value);
        }
        let (prefix, local) = value.split_once(':').ok_or(TermError::InvalidIri)?;
        let namespace = self.resolve_prefix(prefix).ok_or(TermError::UnknownPrefix)?;
        self.named_node(&format!("{}{}", namespace, local))
    }

    /// Splits `iri` into the longest matching `(prefix, local)` pair.
    pub fn split<'a>(&'a self, iri: &'a str) -> Option<(&'a str, &'a str)> {
        self.bindings
            .iter()
            .filter(|(_, ns)| iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| (prefix.as_str(), &iri[ns.len()..]))
    }

    /// Renders `iri` as a prefixed name when possible, `<iri>` otherwise.
    pub fn compact(&self, iri: &str) -> String {
        match self.split(iri) {
            Some((prefix, local)) if is_local_name(local) => format!("{}:{}", prefix, local),
            _ => format!("<{}>", iri),
        }
    }

    /// `@prefix` lines for every binding.
    pub fn turtle_header(&self) -> String {
        self.iter()
            .map(|(prefix, ns)| format!("@prefix {}: <{}> .\n", prefix, ns))
            .collect()
    }
}

/// Whether `value` is written as an absolute IRI rather than a CURIE.
pub fn is_absolute(value: &str) -> bool {
    value.starts_with('<') || value.contains("://") || value.starts_with("urn:")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> PrefixMap {
        PrefixMap::standard("agimage", "https://w3id.org/agri-image/").unwrap()
    }

    #[test]
    fn expands_known_prefix() {
        let node = map().expand("schema:variant").unwrap();
        assert_eq!(node.as_str(), "https://schema.org/variant");
    }

    #[test]
    fn rejects_unknown_prefix() {
        assert_eq!(map().expand("nope:thing"), Err(TermError::UnknownPrefix));
    }

    #[test]
    fn passes_wrapped_and_bare_iris() {
        let m = map();
        assert_eq!(
            m.expand("<http://example.org/a>").unwrap().as_str(),
            "http://example.org/a"
        );
        assert_eq!(
            m.expand("http://example.org/b").unwrap().as_str(),
            "http://example.org/b"
        );
    }

    #[test]
    fn compacts_to_longest_namespace() {
        let mut m = map();
        m.insert("img", "https://w3id.org/agri-image/image/").unwrap();
        assert_eq!(m.compact("https://w3id.org/agri-image/image/Width"), "img:Width");
        assert_eq!(m.compact("https://w3id.org/agri-image/Plot"), "agimage:Plot");
    }

    #[test]
    fn falls_back_to_full_iri() {
        let m = map();
        assert_eq!(
            m.compact("https://w3id.org/agri-image/a/b"),
            "<https://w3id.org/agri-image/a/b>"
        );
        assert_eq!(m.compact("http://example.org/x"), "<http://example.org/x>");
    }

    #[test]
    fn header_is_sorted() {
        let header = map().turtle_header();
        let agimage = header.find("@prefix agimage:").unwrap();
        let xsd = header.find("@prefix xsd:").unwrap();
        assert!(agimage < xsd);
    }

    #[test]
    fn aliases_expand_but_are_never_written() {
        let mut m = map();
        m.alias("newont", "https://w3id.org/agri-image/").unwrap();
        let node = m.expand("newont:plotId").unwrap();
        assert_eq!(node.as_str(), "https://w3id.org/agri-image/plotId");
        assert_eq!(m.compact(node.as_str()), "agimage:plotId");
        assert!(!m.turtle_header().contains("newont"));

        m.insert("newont", "http://example.org/legacy/").unwrap();
        assert_eq!(
            m.expand("newont:x").unwrap().as_str(),
            "http://example.org/legacy/x"
        );
    }

    #[test]
    fn namespace_fixes_apply_to_every_form() {
        let mut m = map();
        m.insert("old", "https://w3id.org/agri-images/").unwrap();
        m.fix_namespace("w3id.org/agri-images", "w3id.org/agri-image").unwrap();
        for value in [
            "https://w3id.org/agri-images/Plot",
            "<https://w3id.org/agri-images/Plot>",
            "old:Plot",
        ] {
            assert_eq!(
                m.expand(value).unwrap().as_str(),
                "https://w3id.org/agri-image/Plot"
            );
        }
    }

    #[test]
    fn rejects_bad_prefix_names() {
        let mut m = PrefixMap::empty();
        assert!(m.insert("1abc", "http://example.org/").is_err());
        assert!(m.insert("ok", "not an iri").is_err());
    }
}
