use super::{string_literal, EmitContext, PredicateList};
use crate::model::{codelist_concept, codelist_scheme, AllowedValue, FieldKind, Profile};
use log::debug;

/// Renders the ontology extension: local classes and local properties, plus
/// the optional external class annotations and SKOS codelists.
pub fn ontology_document(profile: &Profile, ctx: &EmitContext<'_>) -> String {
    let config = ctx.config;
    let mut out = ctx.preamble("Ontology extension");

    let mut header = PredicateList::new();
    header
        .push("a", "owl:Ontology")
        .push_opt("rdfs:label", config.title.as_deref().map(string_literal))
        .push_opt(
            "owl:versionInfo",
            config.version.as_deref().map(string_literal),
        );
    out.push_str(&header.statement(&format!("<{}>", config.base_ns)));

    for class in &profile.classes {
        if class.is_external() && !config.emit_external_class_blocks {
            continue;
        }
        let mut block = PredicateList::new();
        block
            .push("a", "owl:Class")
            .push("rdfs:label", string_literal(&class.name));
        out.push_str(&block.statement(&ctx.iri(&class.iri)));
    }

    for property in &profile.properties {
        let kind = match property.kind {
            FieldKind::Datatype => "owl:DatatypeProperty",
            FieldKind::Object => "owl:ObjectProperty",
        };
        let mut block = PredicateList::new();
        block
            .push("a", kind)
            .push("rdfs:label", string_literal(&property.label))
            .push_opt("rdfs:domain", property.domain().map(|d| ctx.iri(d)))
            .push("rdfs:range", ctx.iri(&property.range))
            .push_opt("rdfs:comment", property.comment.as_deref().map(string_literal))
            .push_opt("skos:example", property.example.as_deref().map(string_literal));
        if property.domain().is_none() {
            debug!(
                "{} is shared by {} classes; omitting rdfs:domain",
                property.iri,
                property.domains.len()
            );
        }
        out.push_str(&block.statement(&ctx.iri(&property.iri)));
    }

    if config.add_codelists {
        out.push_str(&codelists(profile, ctx));
    }
    out
}

/// One `skos:ConceptScheme` per field name with bare allowed values. Fields
/// sharing a name across classes share the scheme, and their values are merged
/// in order of first appearance.
fn codelists(profile: &Profile, ctx: &EmitContext<'_>) -> String {
    let base_ns = ctx.config.base_ns.as_str();
    let mut schemes: Vec<(&str, Vec<&str>)> = Vec::new();
    for (_, field) in profile.fields() {
        let values = field.allowed_values.iter().filter(|v| match v {
            AllowedValue::Literal(_) => true,
            AllowedValue::Iri { text, iri } => *iri == codelist_concept(base_ns, &field.name, text),
        });
        let index = match schemes.iter().position(|(name, _)| *name == field.name) {
            Some(index) => index,
            None => {
                schemes.push((field.name.as_str(), Vec::new()));
                schemes.len() - 1
            }
        };
        let merged = &mut schemes[index].1;
        for value in values.map(AllowedValue::text) {
            if !merged.contains(&value) {
                merged.push(value);
            }
        }
    }

    let mut out = String::new();
    for (name, values) in schemes.into_iter().filter(|(_, v)| !v.is_empty()) {
        let scheme_iri = ctx.iri(&codelist_scheme(base_ns, name));
        debug!("codelist {} with {} concepts", scheme_iri, values.len());
        let mut block = PredicateList::new();
        block.push("a", "skos:ConceptScheme").push(
            "skos:prefLabel",
            string_literal(&format!("{} controlled vocabulary", name)),
        );
        out.push_str(&block.statement(&scheme_iri));
        for value in values {
            let mut concept = PredicateList::new();
            concept
                .push("a", "skos:Concept")
                .push("skos:inScheme", scheme_iri.clone())
                .push("skos:prefLabel", string_literal(value));
            out.push_str(&concept.statement(&ctx.iri(&codelist_concept(base_ns, name, value))));
        }
    }
    out
}
