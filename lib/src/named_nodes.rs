//! Vocabulary terms the compiler emits, as `oxigraph` named nodes.
//!
//! `rdf`, `rdfs` and `xsd` come from `oxigraph::model::vocab`.
use oxigraph::model::NamedNode;

pub const SH_NS: &str = "http://www.w3.org/ns/shacl#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

pub struct SHACL {
    pub node_shape: NamedNode,
    pub target_class: NamedNode,
    pub property: NamedNode,
    pub path: NamedNode,
    pub name: NamedNode,
    pub description: NamedNode,
    pub datatype: NamedNode,
    pub class: NamedNode,
    pub min_count: NamedNode,
    pub max_count: NamedNode,
    pub in_: NamedNode,
}

impl SHACL {
    pub fn new() -> Self {
        Self {
            node_shape: NamedNode::new_unchecked(format!("{SH_NS}NodeShape")),
            target_class: NamedNode::new_unchecked(format!("{SH_NS}targetClass")),
            property: NamedNode::new_unchecked(format!("{SH_NS}property")),
            path: NamedNode::new_unchecked(format!("{SH_NS}path")),
            name: NamedNode::new_unchecked(format!("{SH_NS}name")),
            description: NamedNode::new_unchecked(format!("{SH_NS}description")),
            datatype: NamedNode::new_unchecked(format!("{SH_NS}datatype")),
            class: NamedNode::new_unchecked(format!("{SH_NS}class")),
            min_count: NamedNode::new_unchecked(format!("{SH_NS}minCount")),
            max_count: NamedNode::new_unchecked(format!("{SH_NS}maxCount")),
            in_: NamedNode::new_unchecked(format!("{SH_NS}in")),
        }
    }
}

impl Default for SHACL {
    fn default() -> Self {
        Self::new()
    }
}

pub struct OWL {
    pub ontology: NamedNode,
    pub class: NamedNode,
    pub datatype_property: NamedNode,
    pub object_property: NamedNode,
    pub version_info: NamedNode,
}

impl OWL {
    pub fn new() -> Self {
        Self {
            ontology: NamedNode::new_unchecked(format!("{OWL_NS}Ontology")),
            class: NamedNode::new_unchecked(format!("{OWL_NS}Class")),
            datatype_property: NamedNode::new_unchecked(format!("{OWL_NS}DatatypeProperty")),
            object_property: NamedNode::new_unchecked(format!("{OWL_NS}ObjectProperty")),
            version_info: NamedNode::new_unchecked(format!("{OWL_NS}versionInfo")),
        }
    }
}

impl Default for OWL {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SKOS {
    pub concept_scheme: NamedNode,
    pub concept: NamedNode,
    pub in_scheme: NamedNode,
    pub pref_label: NamedNode,
    pub example: NamedNode,
}

impl SKOS {
    pub fn new() -> Self {
        Self {
            concept_scheme: NamedNode::new_unchecked(format!("{SKOS_NS}ConceptScheme")),
            concept: NamedNode::new_unchecked(format!("{SKOS_NS}Concept")),
            in_scheme: NamedNode::new_unchecked(format!("{SKOS_NS}inScheme")),
            pref_label: NamedNode::new_unchecked(format!("{SKOS_NS}prefLabel")),
            example: NamedNode::new_unchecked(format!("{SKOS_NS}example")),
        }
    }
}

impl Default for SKOS {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-XSD datatypes that still denote literal ranges.
pub const LITERAL_RANGES: [&str; 5] = [
    "http://www.w3.org/2000/01/rdf-schema#Literal",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#HTML",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON",
];

/// Local names of the XSD 1.1 built-in datatypes usable as a range.
pub const XSD_DATATYPES: &[&str] = &[
    "string", "normalizedString", "token", "language", "Name", "NCName", "NMTOKEN",
    "NMTOKENS", "ID", "IDREF", "IDREFS", "ENTITY", "ENTITIES", "QName", "NOTATION",
    "anyURI", "base64Binary", "hexBinary", "boolean", "decimal", "integer",
    "nonPositiveInteger", "negativeInteger", "long", "int", "short", "byte",
    "nonNegativeInteger", "unsignedLong", "unsignedInt", "unsignedShort", "unsignedByte",
    "positiveInteger", "double", "float", "duration", "dayTimeDuration",
    "yearMonthDuration", "dateTime", "dateTimeStamp", "time", "date", "gYearMonth",
    "gYear", "gMonthDay", "gDay", "gMonth", "anyAtomicType", "anySimpleType",
];

/// Whether `iri` is in the XSD namespace but names no built-in datatype.
pub fn is_unknown_xsd(iri: &str) -> bool {
    iri.strip_prefix(XSD_NS)
        .is_some_and(|local| !XSD_DATATYPES.contains(&local))
}

/// Whether `iri` names a literal datatype rather than a class.
pub fn is_literal_range(iri: &str) -> bool {
    iri.strip_prefix(XSD_NS)
        .is_some_and(|local| XSD_DATATYPES.contains(&local))
        || LITERAL_RANGES.contains(&iri)
}
