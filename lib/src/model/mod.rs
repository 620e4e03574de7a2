//! The typed, validated form of a profile table.
mod cardinality;

pub use cardinality::Cardinality;

use oxigraph::model::NamedNode;
use std::fmt;

/// Whether a field holds literals or links to other resources.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Datatype,
    Object,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Datatype => write!(f, "datatype"),
            FieldKind::Object => write!(f, "object"),
        }
    }
}

/// Where the property of a field comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyRef {
    /// Declared in the ontology extension.
    Local(NamedNode),
    /// Reused from an external vocabulary; never declared locally.
    External(NamedNode),
}

impl PropertyRef {
    pub fn iri(&self) -> &NamedNode {
        match self {
            PropertyRef::Local(iri) | PropertyRef::External(iri) => iri,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, PropertyRef::External(_))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClassOrigin {
    Local,
    External,
}

/// A permitted value of a field, as written in the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AllowedValue {
    /// A literal of the field's datatype.
    Literal(String),
    /// A resource: an explicit IRI/CURIE, or a codelist concept for a bare token.
    Iri { text: String, iri: NamedNode },
}

impl AllowedValue {
    pub fn text(&self) -> &str {
        match self {
            AllowedValue::Literal(text) | AllowedValue::Iri { text, .. } => text,
        }
    }
}

fn codelist_token(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

/// The concept scheme collecting the allowed values of `field`.
pub fn codelist_scheme(base_ns: &str, field: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("{}{}Scheme", base_ns, codelist_token(field)))
}

/// The concept standing for the bare allowed value `value` of `field`.
pub fn codelist_concept(base_ns: &str, field: &str, value: &str) -> NamedNode {
    NamedNode::new_unchecked(format!(
        "{}{}_{}",
        base_ns,
        codelist_token(field),
        codelist_token(value)
    ))
}

/// One row of the table, resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub row: usize,
    pub name: String,
    pub property: PropertyRef,
    pub kind: FieldKind,
    /// A datatype IRI for datatype fields, a class IRI for object fields.
    pub range: NamedNode,
    pub cardinality: Cardinality,
    pub description: Option<String>,
    pub example: Option<String>,
    pub allowed_values: Vec<AllowedValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    pub name: String,
    pub iri: NamedNode,
    pub origin: ClassOrigin,
    pub first_row: usize,
    pub fields: Vec<FieldDefinition>,
}

impl ClassDefinition {
    pub fn is_external(&self) -> bool {
        self.origin == ClassOrigin::External
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A locally declared property, merged over every row that uses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalProperty {
    pub iri: NamedNode,
    pub first_row: usize,
    pub label: String,
    pub kind: FieldKind,
    pub range: NamedNode,
    /// Classes using the property, in order of first use.
    pub domains: Vec<NamedNode>,
    pub comment: Option<String>,
    pub example: Option<String>,
}

impl LocalProperty {
    /// The single domain, when exactly one class uses the property.
    pub fn domain(&self) -> Option<&NamedNode> {
        match self.domains.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// The whole profile: classes in order of first appearance in the table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Profile {
    pub classes: Vec<ClassDefinition>,
    pub properties: Vec<LocalProperty>,
}

impl Profile {
    pub fn class(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn class_by_iri(&self, iri: &NamedNode) -> Option<&ClassDefinition> {
        self.classes.iter().find(|c| &c.iri == iri)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&ClassDefinition, &FieldDefinition)> {
        self.classes
            .iter()
            .flat_map(|c| c.fields.iter().map(move |f| (c, f)))
    }

    pub fn field_count(&self) -> usize {
        self.classes.iter().map(|c| c.fields.len()).sum()
    }

    pub fn local_classes(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.iter().filter(|c| !c.is_external())
    }
}
