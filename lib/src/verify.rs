//! Parses generated documents back with oxigraph before they are written.
use crate::error::ProfileError;
use crate::model::Profile;
use crate::named_nodes::SHACL;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::vocab::rdf;
use oxigraph::model::{Graph, TermRef, Triple};

/// Parses a Turtle document into an in-memory graph.
pub fn parse_turtle(text: &str) -> Result<Graph, String> {
    let mut graph = Graph::new();
    for quad in RdfParser::from_format(RdfFormat::Turtle).for_reader(text.as_bytes()) {
        let quad = quad.map_err(|e| e.to_string())?;
        graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }
    Ok(graph)
}

/// Counts the `sh:NodeShape` instances and their `sh:property` links.
pub fn count_shapes(graph: &Graph) -> (usize, usize) {
    let sh = SHACL::new();
    let mut node_shapes = 0;
    let mut property_shapes = 0;
    for triple in graph.iter() {
        if triple.predicate == rdf::TYPE
            && triple.object == TermRef::NamedNode(sh.node_shape.as_ref())
        {
            node_shapes += 1;
        } else if triple.predicate == sh.property.as_ref() {
            property_shapes += 1;
        }
    }
    (node_shapes, property_shapes)
}

/// Checks that both documents are well-formed Turtle and that the shapes
/// graph has one node shape per class and one property shape per field.
pub fn verify_documents(
    profile: &Profile,
    ontology: &str,
    shapes: &str,
) -> Result<(), ProfileError> {
    parse_turtle(ontology).map_err(|message| ProfileError::Verify {
        document: "ontology",
        message,
    })?;
    let graph = parse_turtle(shapes).map_err(|message| ProfileError::Verify {
        document: "shapes",
        message,
    })?;
    let (node_shapes, property_shapes) = count_shapes(&graph);
    if node_shapes != profile.classes.len() || property_shapes != profile.field_count() {
        return Err(ProfileError::Verify {
            document: "shapes",
            message: format!(
                "expected {} node shapes with {} property shapes, found {} with {}",
                profile.classes.len(),
                profile.field_count(),
                node_shapes,
                property_shapes
            ),
        });
    }
    Ok(())
}
