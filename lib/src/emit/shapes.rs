use super::{string_literal, typed_literal, EmitContext, PredicateList, INDENT};
use crate::config::ProfileConfig;
use crate::model::{codelist_concept, AllowedValue, ClassDefinition, FieldDefinition, FieldKind, Profile};
use crate::named_nodes::{RDFS_NS, RDF_NS, XSD_NS};
use log::warn;
use oxigraph::model::NamedNode;

/// Datatypes whose `sh:in` members are written as plain strings.
fn is_plain_string(datatype: &NamedNode) -> bool {
    let iri = datatype.as_str();
    iri == format!("{XSD_NS}string")
        || iri == format!("{RDFS_NS}Literal")
        || iri == format!("{RDF_NS}langString")
}

/// The IRI of the node shape generated for `class`.
pub fn shape_iri(base_ns: &str, class: &ClassDefinition) -> NamedNode {
    NamedNode::new_unchecked(format!("{}{}Shape", base_ns, class.name))
}

/// Generated codelist concepts that `sh:in` lists refer to but that the
/// ontology will not declare, because codelists are switched off.
pub fn undeclared_concepts(profile: &Profile, config: &ProfileConfig) -> Vec<NamedNode> {
    if config.add_codelists {
        return Vec::new();
    }
    profile
        .fields()
        .flat_map(|(_, field)| {
            field.allowed_values.iter().filter_map(move |value| match value {
                AllowedValue::Iri { text, iri }
                    if *iri == codelist_concept(&config.base_ns, &field.name, text) =>
                {
                    Some(iri.clone())
                }
                _ => None,
            })
        })
        .collect()
}

/// Renders the shapes graph: one `sh:NodeShape` per class, with one nested
/// property shape per field.
pub fn shapes_document(profile: &Profile, ctx: &EmitContext<'_>) -> String {
    let mut out = ctx.preamble("SHACL shapes");
    for concept in undeclared_concepts(profile, ctx.config) {
        warn!(
            "sh:in refers to {} which is not declared; enable add-codelists to declare it",
            concept
        );
    }
    for class in &profile.classes {
        let mut shape = PredicateList::new();
        shape
            .push("a", "sh:NodeShape")
            .push("sh:targetClass", ctx.iri(&class.iri));
        for field in &class.fields {
            shape.push("sh:property", property_shape(field, ctx).blank_node(INDENT));
        }
        out.push_str(&shape.statement(&ctx.iri(&shape_iri(&ctx.config.base_ns, class))));
    }
    out
}

fn property_shape(field: &FieldDefinition, ctx: &EmitContext<'_>) -> PredicateList {
    let range = ctx.iri(&field.range);
    let mut pairs = PredicateList::new();
    pairs
        .push("sh:path", ctx.iri(field.property.iri()))
        .push("sh:name", string_literal(&field.name));
    match field.kind {
        FieldKind::Datatype => pairs.push("sh:datatype", range.clone()),
        FieldKind::Object => pairs.push("sh:class", range.clone()),
    };
    pairs
        .push("sh:minCount", field.cardinality.min.to_string())
        .push_opt("sh:maxCount", field.cardinality.max.map(|m| m.to_string()))
        .push_opt(
            "sh:description",
            field.description.as_deref().map(string_literal),
        );
    if !field.allowed_values.is_empty() {
        let members: Vec<String> = field
            .allowed_values
            .iter()
            .map(|value| match value {
                AllowedValue::Literal(text) if is_plain_string(&field.range) => {
                    string_literal(text)
                }
                AllowedValue::Literal(text) => typed_literal(text, &range),
                AllowedValue::Iri { iri, .. } => ctx.iri(iri),
            })
            .collect();
        pairs.push("sh:in", format!("( {} )", members.join(" ")));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_profile;
    use crate::source::SourceTable;
    use std::error::Error;

    #[test]
    fn bare_object_values_need_codelists() -> Result<(), Box<dyn Error>> {
        let table = SourceTable::from_csv(
            "t.csv",
            b"entity,property,type,datatype,cardinality,allowedValues\nImage,license,object,dct:LicenseDocument,zero-or-one,\"open, dct:closed\"\n",
            b',',
        )?;
        let mut config = ProfileConfig::default();
        let prefixes = config.prefix_map()?;
        let profile = parse_profile(&table, &config, &prefixes)?;
        assert_eq!(
            undeclared_concepts(&profile, &config),
            vec![NamedNode::new("https://w3id.org/agri-image/license_open")?]
        );
        config.add_codelists = true;
        assert!(undeclared_concepts(&profile, &config).is_empty());
        Ok(())
    }
}
