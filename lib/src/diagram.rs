//! Graphviz DOT view of a profile.
use crate::model::{FieldKind, Profile};
use crate::prefixes::PrefixMap;
use std::collections::BTreeMap;

fn escape_record(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>' | '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Generates a DOT digraph: one record node per class listing its datatype
/// fields, dashed borders for external classes, and one edge per object field.
pub fn to_graphviz(profile: &Profile, prefixes: &PrefixMap) -> String {
    let mut out = String::from("digraph profile {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=record, fontname=\"Helvetica\"];\n");
    out.push_str("  edge [fontname=\"Helvetica\", fontsize=10];\n");

    let mut ids: BTreeMap<String, String> = BTreeMap::new();
    for (index, class) in profile.classes.iter().enumerate() {
        let id = format!("c{}", index);
        let fields: String = class
            .fields
            .iter()
            .filter(|f| f.kind == FieldKind::Datatype)
            .map(|f| {
                format!(
                    "{} : {} [{}]\\l",
                    escape_record(&prefixes.compact(f.property.iri().as_str())),
                    escape_record(&prefixes.compact(f.range.as_str())),
                    f.cardinality
                )
            })
            .collect();
        let style = if class.is_external() {
            ", style=dashed"
        } else {
            ""
        };
        out.push_str(&format!(
            "  {} [label=\"{{{}|{}}}\"{}];\n",
            id,
            escape_record(&prefixes.compact(class.iri.as_str())),
            fields,
            style
        ));
        ids.insert(class.iri.as_str().to_string(), id);
    }

    // object ranges outside the table get a plain node of their own
    let mut extra = 0;
    for class in &profile.classes {
        for field in class.fields.iter().filter(|f| f.kind == FieldKind::Object) {
            if !ids.contains_key(field.range.as_str()) {
                let id = format!("x{}", extra);
                extra += 1;
                out.push_str(&format!(
                    "  {} [shape=ellipse, style=dashed, label=\"{}\"];\n",
                    id,
                    escape_record(&prefixes.compact(field.range.as_str()))
                ));
                ids.insert(field.range.as_str().to_string(), id);
            }
        }
    }

    for class in &profile.classes {
        for field in class.fields.iter().filter(|f| f.kind == FieldKind::Object) {
            out.push_str(&format!(
                "  {} -> {} [label=\"{} [{}]\"];\n",
                ids[class.iri.as_str()],
                ids[field.range.as_str()],
                escape_record(&prefixes.compact(field.property.iri().as_str())),
                field.cardinality
            ));
        }
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;
    use crate::parser::parse_profile;
    use crate::source::SourceTable;
    use std::error::Error;

    #[test]
    fn draws_classes_and_links() -> Result<(), Box<dyn Error>> {
        let table = SourceTable::from_csv(
            "t.csv",
            b"entity,property,datatype,cardinality\nImage,width,xsd:integer,exactly-one\nImage,plot,Plot,zero-or-one\nPlot,plotId,xsd:string,exactly-one\nImage,creator,foaf:Agent,zero-or-more\n",
            b',',
        )?;
        let config = ProfileConfig::default();
        let prefixes = config.prefix_map()?;
        let profile = parse_profile(&table, &config, &prefixes)?;
        let dot = to_graphviz(&profile, &prefixes);
        assert!(dot.starts_with("digraph profile {"));
        assert!(dot.contains("c0 [label=\"{agimage:Image|agimage:width : xsd:integer [1..1]\\l}\"];"));
        assert!(dot.contains("c0 -> c1 [label=\"agimage:plot [0..1]\"];"));
        assert!(dot.contains("x0 [shape=ellipse, style=dashed, label=\"foaf:Agent\"];"));
        assert!(dot.contains("c0 -> x0"));
        Ok(())
    }
}
