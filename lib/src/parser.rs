//! Turns a [`SourceTable`] into a validated [`Profile`].
//!
//! Parsing runs in two passes. The first reads every row into a typed record
//! and rejects rows that are malformed on their own. The second resolves
//! names across rows: class identities, property IRIs, ranges, duplicate
//! fields and shared local properties.
use crate::config::ProfileConfig;
use crate::error::ProfileError;
use crate::model::{
    codelist_concept, AllowedValue, Cardinality, ClassDefinition, ClassOrigin, FieldDefinition, FieldKind, LocalProperty, Profile,
    PropertyRef,
};
use crate::named_nodes::{is_literal_range, is_unknown_xsd, XSD_NS};
use crate::prefixes::{is_absolute, is_local_name, PrefixMap, TermError};
use crate::source::{SourceRow, SourceTable};
use log::{debug, info, warn};
use oxigraph::model::NamedNode;
use oxsdatatypes::{Boolean, Date, DateTime, Decimal, Double, Duration, Float, GYear, Integer, Time};
use std::collections::HashMap;

const CLASS: &str = "class";
const FIELD: &str = "property";
const RANGE: &str = "datatype";
const CARDINALITY: &str = "cardinality";

fn normalize_header(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Columns {
    class: usize,
    field: usize,
    range: usize,
    cardinality: Option<usize>,
    min: Option<usize>,
    max: Option<usize>,
    kind: Option<usize>,
    mapping: Option<usize>,
    description: Option<usize>,
    example: Option<usize>,
    allowed: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self, ProfileError> {
        let names: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
        let find = |aliases: &[&str]| names.iter().position(|n| aliases.contains(&n.as_str()));
        let require = |aliases: &[&str], column: &'static str| {
            find(aliases).ok_or(ProfileError::MissingColumn { column })
        };

        let columns = Columns {
            class: require(&["entity", "class"], CLASS)?,
            field: require(&["property", "field", "name"], FIELD)?,
            range: require(&["datatype", "range"], RANGE)?,
            cardinality: find(&["cardinality"]),
            min: find(&["cardinalitymin", "mincount"]),
            max: find(&["cardinalitymax", "maxcount"]),
            kind: find(&["type", "kind"]),
            mapping: find(&["uri", "external", "mapping", "externaluri"]),
            description: find(&["description"]),
            example: find(&["example"]),
            allowed: find(&["allowedvalues", "allowed"]),
        };
        if columns.cardinality.is_none() && columns.min.is_none() && columns.max.is_none() {
            return Err(ProfileError::MissingColumn {
                column: CARDINALITY,
            });
        }
        Ok(columns)
    }
}

/// A row after the first pass: every cell typed, nothing resolved yet.
#[derive(Debug)]
struct RowRecord<'a> {
    row: usize,
    class: &'a str,
    field: &'a str,
    kind: Option<FieldKind>,
    range: &'a str,
    cardinality: Cardinality,
    mapping: Option<&'a str>,
    description: Option<&'a str>,
    example: Option<&'a str>,
    allowed_values: Vec<String>,
}

fn read_row<'a>(row: &'a SourceRow, columns: &Columns) -> Result<RowRecord<'a>, ProfileError> {
    let number = row.number;
    let cell = |index: Option<usize>| index.and_then(|i| row.cell(i));
    let required = |index: usize, column: &'static str| {
        row.cell(index).ok_or(ProfileError::MissingCell {
            row: number,
            column,
        })
    };

    let class = required(columns.class, CLASS)?;
    let field = required(columns.field, FIELD)?;
    let range = required(columns.range, RANGE)?;

    let cardinality = match (cell(columns.cardinality), cell(columns.min), cell(columns.max)) {
        (Some(token), _, _) => token
            .parse::<Cardinality>()
            .map_err(|_| ProfileError::UnknownCardinality {
                row: number,
                token: token.to_string(),
            })?,
        (None, None, None) => {
            return Err(ProfileError::MissingCell {
                row: number,
                column: CARDINALITY,
            })
        }
        (None, min, max) => Cardinality::from_bounds(min, max).map_err(|_| {
            ProfileError::UnknownCardinality {
                row: number,
                token: format!("{}..{}", min.unwrap_or(""), max.unwrap_or("")),
            }
        })?,
    };

    let kind = match cell(columns.kind) {
        None => None,
        Some(value) => Some(parse_kind(value).ok_or_else(|| ProfileError::UnknownFieldKind {
            row: number,
            value: value.to_string(),
        })?),
    };

    Ok(RowRecord {
        row: number,
        class,
        field,
        kind,
        range,
        cardinality,
        mapping: cell(columns.mapping),
        description: cell(columns.description),
        example: cell(columns.example),
        allowed_values: cell(columns.allowed)
            .map(parse_allowed_values)
            .unwrap_or_default(),
    })
}

fn parse_kind(value: &str) -> Option<FieldKind> {
    match normalize_header(value).as_str() {
        "datatype" | "data" | "literal" | "datatypeproperty" => Some(FieldKind::Datatype),
        "object" | "class" | "reference" | "objectproperty" => Some(FieldKind::Object),
        _ => None,
    }
}

/// Splits `['a','b']` or `a, b` into its values.
pub fn parse_allowed_values(cell: &str) -> Vec<String> {
    cell.chars()
        .filter(|c| !matches!(c, '[' | ']' | '\'' | '"'))
        .collect::<String>()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Upper-cases the first letter, as class names are written in CamelCase.
fn class_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn local_part(iri: &str) -> &str {
    iri.rsplit(|c: char| c == '#' || c == '/').next().unwrap_or(iri)
}

fn is_reference(cell: &str) -> bool {
    is_absolute(cell) || cell.contains(':')
}

struct Resolver<'a> {
    config: &'a ProfileConfig,
    prefixes: &'a PrefixMap,
    base_ns: &'a str,
}

impl Resolver<'_> {
    fn expand(&self, row: usize, value: &str) -> Result<NamedNode, ProfileError> {
        self.prefixes.expand(value).map_err(|e| match e {
            TermError::UnknownPrefix => ProfileError::UnknownPrefix {
                row,
                value: value.to_string(),
            },
            TermError::InvalidIri => ProfileError::InvalidIri {
                row,
                value: value.to_string(),
            },
        })
    }

    fn local_iri(&self, local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("{}{}", self.base_ns, local))
    }

    /// Resolves a bare class name against the class mappings.
    fn named_class(
        &self,
        row: usize,
        name: &str,
    ) -> Result<(String, NamedNode, ClassOrigin), ProfileError> {
        let name = class_case(name);
        if !is_local_name(&name) {
            return Err(ProfileError::InvalidLocalName { row, value: name });
        }
        match self.config.classes.get(&name) {
            Some(target) => {
                let iri = self
                    .prefixes
                    .expand(target)
                    .map_err(|_| ProfileError::Config(format!("class mapping for `{}`", name)))?;
                Ok((name, iri, ClassOrigin::External))
            }
            None => {
                let iri = self.local_iri(&name);
                Ok((name, iri, ClassOrigin::Local))
            }
        }
    }

    /// Resolves the class cell of a row.
    fn class(
        &self,
        row: usize,
        cell: &str,
    ) -> Result<(String, NamedNode, ClassOrigin), ProfileError> {
        if !is_reference(cell) {
            return self.named_class(row, cell);
        }
        let iri = self.expand(row, cell)?;
        if let Some(local) = iri.as_str().strip_prefix(self.base_ns) {
            return self.named_class(row, local);
        }
        let name = local_part(iri.as_str()).to_string();
        if !is_local_name(&name) {
            return Err(ProfileError::InvalidLocalName { row, value: name });
        }
        Ok((name, iri, ClassOrigin::External))
    }

    fn property(&self, record: &RowRecord<'_>) -> Result<PropertyRef, ProfileError> {
        let local_field = |field: &str| {
            if is_local_name(field) {
                Ok(PropertyRef::Local(self.local_iri(field)))
            } else {
                Err(ProfileError::InvalidLocalName {
                    row: record.row,
                    value: field.to_string(),
                })
            }
        };
        match record.mapping {
            None => local_field(record.field),
            Some(mapping) => {
                let iri = self.expand(record.row, mapping)?;
                match iri.as_str().strip_prefix(self.base_ns) {
                    Some("") => local_field(record.field),
                    Some(_) => Ok(PropertyRef::Local(iri)),
                    None => Ok(PropertyRef::External(iri)),
                }
            }
        }
    }

    /// Resolves the range cell, inferring the field kind when it is blank.
    fn range(
        &self,
        record: &RowRecord<'_>,
        class_name: &str,
        classes: &HashMap<String, NamedNode>,
    ) -> Result<(FieldKind, NamedNode), ProfileError> {
        let unresolved = || ProfileError::UnresolvedRange {
            row: record.row,
            field: record.field.to_string(),
            class: class_name.to_string(),
            range: record.range.to_string(),
        };
        // a class reference must name a class of the table or a mapped class
        let class_ref = |name: &str| -> Result<NamedNode, ProfileError> {
            let name = class_case(name);
            if let Some(iri) = classes.get(&name) {
                return Ok(iri.clone());
            }
            match self.config.classes.get(&name) {
                Some(target) => self.prefixes.expand(target).map_err(|_| unresolved()),
                None => Err(unresolved()),
            }
        };

        if !is_reference(record.range) {
            return match record.kind {
                Some(FieldKind::Datatype) => Err(unresolved()),
                _ => Ok((FieldKind::Object, class_ref(record.range)?)),
            };
        }

        let iri = self.prefixes.expand(record.range).map_err(|_| unresolved())?;
        if is_unknown_xsd(iri.as_str()) {
            return Err(unresolved());
        }
        let kind = record.kind.unwrap_or(if is_literal_range(iri.as_str()) {
            FieldKind::Datatype
        } else {
            FieldKind::Object
        });
        if kind == FieldKind::Object {
            if let Some(local) = iri.as_str().strip_prefix(self.base_ns) {
                return Ok((kind, class_ref(local)?));
            }
        }
        Ok((kind, iri))
    }
}

/// Parses and resolves every row of `table`.
pub fn parse_profile(
    table: &SourceTable,
    config: &ProfileConfig,
    prefixes: &PrefixMap,
) -> Result<Profile, ProfileError> {
    let columns = Columns::from_header(table.header())?;
    let records = table
        .rows()
        .iter()
        .map(|row| read_row(row, &columns))
        .collect::<Result<Vec<_>, _>>()?;

    let resolver = Resolver {
        config,
        prefixes,
        base_ns: &config.base_ns,
    };

    // classes, in order of first appearance
    let mut classes: Vec<ClassDefinition> = Vec::new();
    let mut class_index: HashMap<String, usize> = HashMap::new();
    let mut record_class: Vec<usize> = Vec::with_capacity(records.len());
    for record in &records {
        let (name, iri, origin) = resolver.class(record.row, record.class)?;
        let index = match class_index.get(&name) {
            Some(&index) => {
                let existing = &classes[index];
                if existing.iri != iri {
                    return Err(ProfileError::ConflictingClass {
                        row: record.row,
                        class: name,
                        iri: iri.as_str().to_string(),
                        first_row: existing.first_row,
                        first_iri: existing.iri.as_str().to_string(),
                    });
                }
                index
            }
            None => {
                classes.push(ClassDefinition {
                    name: name.clone(),
                    iri,
                    origin,
                    first_row: record.row,
                    fields: Vec::new(),
                });
                class_index.insert(name, classes.len() - 1);
                classes.len() - 1
            }
        };
        record_class.push(index);
    }
    let class_iris: HashMap<String, NamedNode> = classes
        .iter()
        .map(|c| (c.name.clone(), c.iri.clone()))
        .collect();

    let mut properties: Vec<LocalProperty> = Vec::new();
    let mut property_index: HashMap<NamedNode, usize> = HashMap::new();
    for (record, &index) in records.iter().zip(&record_class) {
        let class = &classes[index];
        if let Some(first) = class.field(record.field) {
            return Err(ProfileError::DuplicateField {
                row: record.row,
                class: class.name.clone(),
                field: record.field.to_string(),
                first_row: first.row,
            });
        }
        let property = resolver.property(record)?;
        let (kind, range) = resolver.range(record, &class.name, &class_iris)?;

        let allowed_values = match kind {
            FieldKind::Datatype => {
                check_lexical(record, &range);
                record
                    .allowed_values
                    .iter()
                    .map(|v| AllowedValue::Literal(v.clone()))
                    .collect()
            }
            FieldKind::Object => record
                .allowed_values
                .iter()
                .map(|v| {
                    let iri = if is_reference(v) {
                        resolver.expand(record.row, v)?
                    } else {
                        codelist_concept(resolver.base_ns, record.field, v)
                    };
                    Ok(AllowedValue::Iri {
                        text: v.clone(),
                        iri,
                    })
                })
                .collect::<Result<Vec<_>, ProfileError>>()?,
        };

        if let PropertyRef::Local(iri) = &property {
            match property_index.get(iri) {
                Some(&p) => {
                    let declared = &mut properties[p];
                    if declared.kind != kind || declared.range != range {
                        return Err(ProfileError::ConflictingProperty {
                            row: record.row,
                            property: iri.as_str().to_string(),
                            first_row: declared.first_row,
                        });
                    }
                    if !declared.domains.contains(&class.iri) {
                        declared.domains.push(class.iri.clone());
                    }
                    if declared.comment.is_none() {
                        declared.comment = record.description.map(str::to_string);
                    }
                    if declared.example.is_none() {
                        declared.example = record.example.map(str::to_string);
                    }
                }
                None => {
                    property_index.insert(iri.clone(), properties.len());
                    properties.push(LocalProperty {
                        iri: iri.clone(),
                        first_row: record.row,
                        label: record.field.to_string(),
                        kind,
                        range: range.clone(),
                        domains: vec![class.iri.clone()],
                        comment: record.description.map(str::to_string),
                        example: record.example.map(str::to_string),
                    });
                }
            }
        }

        let field = FieldDefinition {
            row: record.row,
            name: record.field.to_string(),
            property,
            kind,
            range,
            cardinality: record.cardinality,
            description: record.description.map(str::to_string),
            example: record.example.map(str::to_string),
            allowed_values,
        };
        debug!(
            "row {}: {}.{} -> {} {} [{}]",
            field.row,
            classes[index].name,
            field.name,
            field.kind,
            field.range,
            field.cardinality
        );
        classes[index].fields.push(field);
    }

    let profile = Profile {
        classes,
        properties,
    };
    info!(
        "Parsed {} classes ({} local), {} fields and {} local properties from {}",
        profile.classes.len(),
        profile.local_classes().count(),
        profile.field_count(),
        profile.properties.len(),
        table.name()
    );
    Ok(profile)
}

fn check_lexical(record: &RowRecord<'_>, datatype: &NamedNode) {
    let values = record
        .example
        .into_iter()
        .chain(record.allowed_values.iter().map(String::as_str));
    for value in values {
        if !lexically_valid(datatype.as_str(), value) {
            warn!(
                "row {}: value `{}` of field `{}` is not a valid {}",
                record.row, value, record.field, datatype
            );
        }
    }
}

/// Whether `value` is in the lexical space of the XSD `datatype`. Datatypes
/// outside XSD, and XSD types without a checker, always pass.
pub fn lexically_valid(datatype: &str, value: &str) -> bool {
    let Some(local) = datatype.strip_prefix(XSD_NS) else {
        return true;
    };
    match local {
        "boolean" => value.parse::<Boolean>().is_ok(),
        "integer" | "int" | "long" | "short" | "byte" | "nonNegativeInteger"
        | "positiveInteger" | "negativeInteger" | "nonPositiveInteger" | "unsignedLong"
        | "unsignedInt" | "unsignedShort" | "unsignedByte" => value.parse::<Integer>().is_ok(),
        "decimal" => value.parse::<Decimal>().is_ok(),
        "double" => value.parse::<Double>().is_ok(),
        "float" => value.parse::<Float>().is_ok(),
        "date" => value.parse::<Date>().is_ok(),
        "dateTime" => value.parse::<DateTime>().is_ok(),
        "time" => value.parse::<Time>().is_ok(),
        "duration" => value.parse::<Duration>().is_ok(),
        "gYear" => value.parse::<GYear>().is_ok(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    const HEADER: [&str; 8] = [
        "entity",
        "property",
        "type",
        "datatype",
        "cardinality",
        "uri",
        "description",
        "allowedValues",
    ];

    fn table(rows: &[[&str; 8]]) -> SourceTable {
        SourceTable::from_rows(
            "test",
            HEADER.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn parse(rows: &[[&str; 8]]) -> Result<Profile, ProfileError> {
        let config = ProfileConfig::default();
        let prefixes = config.prefix_map()?;
        parse_profile(&table(rows), &config, &prefixes)
    }

    #[test]
    fn external_mapping_is_reused() -> Result<(), Box<dyn Error>> {
        let profile = parse(&[[
            "Plant", "cultivar", "", "xsd:string", "exactly-one", "schema:variant", "", "",
        ]])?;
        let plant = profile.class("Plant").ok_or("missing class")?;
        let field = plant.field("cultivar").ok_or("missing field")?;
        assert_eq!(
            field.property,
            PropertyRef::External(NamedNode::new("https://schema.org/variant")?)
        );
        assert_eq!(field.kind, FieldKind::Datatype);
        assert_eq!(field.cardinality, Cardinality::EXACTLY_ONE);
        assert!(profile.properties.is_empty());
        Ok(())
    }

    #[test]
    fn unmapped_field_becomes_local_property() -> Result<(), Box<dyn Error>> {
        let profile = parse(&[[
            "plot", "plotArea", "datatype", "xsd:decimal", "zero-or-one", "", "Area in m2", "",
        ]])?;
        let plot = profile.class("Plot").ok_or("missing class")?;
        assert_eq!(plot.origin, ClassOrigin::Local);
        assert_eq!(plot.iri.as_str(), "https://w3id.org/agri-image/Plot");
        let prop = &profile.properties[0];
        assert_eq!(prop.iri.as_str(), "https://w3id.org/agri-image/plotArea");
        assert_eq!(prop.domain(), Some(&plot.iri));
        assert_eq!(prop.comment.as_deref(), Some("Area in m2"));
        Ok(())
    }

    #[test]
    fn mapped_classes_are_external() -> Result<(), Box<dyn Error>> {
        let profile = parse(&[
            ["Sensor", "model", "", "xsd:string", "exactly-one", "", "", ""],
            ["Image", "capturedBy", "object", "Sensor", "exactly-one", "", "", ""],
        ])?;
        let sensor = profile.class("Sensor").ok_or("missing class")?;
        assert!(sensor.is_external());
        assert_eq!(sensor.iri.as_str(), "http://www.w3.org/ns/sosa/Sensor");
        let field = profile
            .class("Image")
            .and_then(|c| c.field("capturedBy"))
            .ok_or("missing field")?;
        assert_eq!(field.range, sensor.iri);
        Ok(())
    }

    #[test]
    fn kind_is_inferred_from_range() -> Result<(), Box<dyn Error>> {
        let profile = parse(&[
            ["Plot", "plotId", "", "xsd:string", "exactly-one", "", "", ""],
            ["Image", "plot", "", "Plot", "zero-or-more", "", "", ""],
            ["Image", "license", "", "dct:LicenseDocument", "zero-or-one", "", "", ""],
        ])?;
        let image = profile.class("Image").ok_or("missing class")?;
        assert_eq!(image.field("plot").map(|f| f.kind), Some(FieldKind::Object));
        assert_eq!(image.field("license").map(|f| f.kind), Some(FieldKind::Object));
        let plot = profile.class("Plot").ok_or("missing class")?;
        assert_eq!(plot.field("plotId").map(|f| f.kind), Some(FieldKind::Datatype));
        Ok(())
    }

    #[test]
    fn missing_class_cell_reports_row() {
        let err = parse(&[
            ["Plot", "plotId", "", "xsd:string", "exactly-one", "", "", ""],
            ["", "area", "", "xsd:decimal", "exactly-one", "", "", ""],
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ProfileError::MissingCell {
                row: 3,
                column: CLASS
            }
        ));
        assert_eq!(err.row(), Some(3));
    }

    #[test]
    fn unknown_cardinality_fails() {
        let err = parse(&[["Plot", "plotId", "", "xsd:string", "lots", "", "", ""]]).unwrap_err();
        assert!(matches!(err, ProfileError::UnknownCardinality { row: 2, .. }));
    }

    #[test]
    fn duplicate_field_fails() {
        let err = parse(&[
            ["Plot", "plotId", "", "xsd:string", "exactly-one", "", "", ""],
            ["Crop", "plotId", "", "xsd:string", "exactly-one", "", "", ""],
            ["Plot", "plotId", "", "xsd:integer", "zero-or-one", "", "", ""],
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ProfileError::DuplicateField {
                row: 4,
                first_row: 2,
                ..
            }
        ));
    }

    #[test]
    fn unresolved_class_range_fails() {
        let err = parse(&[["Image", "plot", "object", "Parcel", "exactly-one", "", "", ""]])
            .unwrap_err();
        match err {
            ProfileError::UnresolvedRange { field, class, .. } => {
                assert_eq!(field, "plot");
                assert_eq!(class, "Image");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bare_datatype_range_fails() {
        let err = parse(&[["Plot", "plotId", "datatype", "string", "exactly-one", "", "", ""]])
            .unwrap_err();
        assert!(matches!(err, ProfileError::UnresolvedRange { .. }));
    }

    #[test]
    fn misspelled_xsd_datatype_fails() {
        let err = parse(&[["Plot", "plotId", "", "xsd:strng", "exactly-one", "", "", ""]])
            .unwrap_err();
        assert!(matches!(
            err,
            ProfileError::UnresolvedRange { row: 2, ref range, .. } if range == "xsd:strng"
        ));
    }

    #[test]
    fn multiline_description_keeps_error_row() -> Result<(), Box<dyn Error>> {
        let table = SourceTable::from_csv(
            "t.csv",
            b"entity,property,datatype,cardinality,description\nPlot,plotId,xsd:string,exactly-one,\"line one\nline two\"\nPlot,area,xsd:decimal,lots,\n",
            b',',
        )?;
        let config = ProfileConfig::default();
        let prefixes = config.prefix_map()?;
        let err = parse_profile(&table, &config, &prefixes).unwrap_err();
        assert!(matches!(err, ProfileError::UnknownCardinality { row: 3, .. }));
        Ok(())
    }

    #[test]
    fn legacy_prefix_and_namespace_resolve_to_base() -> Result<(), Box<dyn Error>> {
        let profile = parse(&[
            [
                "newont:plot", "plotId", "datatype", "xsd:string", "exactly-one", "newont:plotId",
                "", "",
            ],
            [
                "https://w3id.org/agri-images/Image", "plot", "object", "newont:plot",
                "zero-or-one", "", "", "",
            ],
        ])?;
        let plot = profile.class("Plot").ok_or("missing class")?;
        assert_eq!(plot.origin, ClassOrigin::Local);
        assert_eq!(plot.iri.as_str(), "https://w3id.org/agri-image/Plot");
        let plot_id = plot.field("plotId").ok_or("missing field")?;
        assert_eq!(
            plot_id.property,
            PropertyRef::Local(NamedNode::new("https://w3id.org/agri-image/plotId")?)
        );
        let image = profile.class("Image").ok_or("missing class")?;
        assert_eq!(image.origin, ClassOrigin::Local);
        assert_eq!(image.field("plot").ok_or("missing field")?.range, plot.iri);
        Ok(())
    }

    #[test]
    fn unknown_prefix_in_mapping_fails() {
        let err = parse(&[[
            "Plot", "plotId", "", "xsd:string", "exactly-one", "newont:plotId", "", "",
        ]])
        .unwrap_err();
        assert!(matches!(err, ProfileError::UnknownPrefix { row: 2, .. }));
    }

    #[test]
    fn shared_local_property_drops_domain() -> Result<(), Box<dyn Error>> {
        let profile = parse(&[
            ["Plot", "label", "", "xsd:string", "zero-or-one", "", "", ""],
            ["Crop", "label", "", "xsd:string", "exactly-one", "", "", ""],
        ])?;
        assert_eq!(profile.properties.len(), 1);
        assert_eq!(profile.properties[0].domains.len(), 2);
        assert_eq!(profile.properties[0].domain(), None);
        Ok(())
    }

    #[test]
    fn conflicting_local_property_fails() {
        let err = parse(&[
            ["Plot", "label", "", "xsd:string", "zero-or-one", "", "", ""],
            ["Crop", "label", "", "xsd:integer", "exactly-one", "", "", ""],
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ProfileError::ConflictingProperty {
                row: 3,
                first_row: 2,
                ..
            }
        ));
    }

    #[test]
    fn class_cannot_be_local_and_external() {
        let err = parse(&[
            ["ssn:Deployment", "id", "", "xsd:string", "exactly-one", "", "", ""],
            ["Deployment", "site", "", "xsd:string", "exactly-one", "", "", ""],
        ])
        .unwrap_err();
        assert!(matches!(err, ProfileError::ConflictingClass { row: 3, .. }));
    }

    #[test]
    fn base_namespace_mapping_stays_local() -> Result<(), Box<dyn Error>> {
        let profile = parse(&[[
            "Camera", "model", "", "xsd:string", "exactly-one", "agimage:cameraModel", "", "",
        ]])?;
        let field = profile
            .class("Camera")
            .and_then(|c| c.field("model"))
            .ok_or("missing field")?;
        assert!(!field.property.is_external());
        assert_eq!(
            field.property.iri().as_str(),
            "https://w3id.org/agri-image/cameraModel"
        );
        Ok(())
    }

    #[test]
    fn legacy_min_max_columns() -> Result<(), Box<dyn Error>> {
        let table = SourceTable::from_csv(
            "legacy.csv",
            b"entity,property,type,datatype,cardinalityMin,cardinalityMax\nPlot,plotId,datatype,xsd:string,1,1\nPlot,tag,datatype,xsd:string,0,*\n",
            b',',
        )?;
        let config = ProfileConfig::default();
        let profile = parse_profile(&table, &config, &config.prefix_map()?)?;
        let plot = profile.class("Plot").ok_or("missing class")?;
        assert_eq!(plot.fields[0].cardinality, Cardinality::EXACTLY_ONE);
        assert_eq!(plot.fields[1].cardinality, Cardinality::ZERO_OR_MORE);
        Ok(())
    }

    #[test]
    fn missing_column_fails() -> Result<(), Box<dyn Error>> {
        let table = SourceTable::from_csv(
            "t.csv",
            b"property,datatype,cardinality\nplotId,xsd:string,exactly-one\n",
            b',',
        )?;
        let config = ProfileConfig::default();
        let err = parse_profile(&table, &config, &config.prefix_map()?).unwrap_err();
        assert!(matches!(err, ProfileError::MissingColumn { column: CLASS }));
        Ok(())
    }

    #[test]
    fn allowed_values_forms() {
        assert_eq!(parse_allowed_values("['RGB', 'NIR']"), vec!["RGB", "NIR"]);
        assert_eq!(parse_allowed_values("a, b ,,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn lexical_checks() {
        let xsd = |l: &str| format!("{}{}", XSD_NS, l);
        assert!(lexically_valid(&xsd("integer"), "42"));
        assert!(!lexically_valid(&xsd("integer"), "4.2"));
        assert!(lexically_valid(&xsd("date"), "2024-05-01"));
        assert!(!lexically_valid(&xsd("boolean"), "yes"));
        assert!(lexically_valid(&xsd("string"), "anything"));
        assert!(lexically_valid("https://schema.org/Text", "anything"));
    }
}
