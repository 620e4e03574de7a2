use oxigraph::model::{Graph, NamedNode, Term};
use petgraph::algo::is_isomorphic_matching;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Converts an `oxigraph::model::Graph` to a `petgraph::graph::DiGraph`.
///
/// Each unique subject and object in the oxigraph graph becomes a node in the petgraph graph.
/// Each triple becomes a directed edge from the subject node to the object node, with the
/// predicate as the edge weight.
pub fn oxigraph_to_petgraph(ox_graph: &Graph) -> DiGraph<Term, NamedNode> {
    let mut pg_graph = DiGraph::<Term, NamedNode>::new();
    let mut node_map = HashMap::<Term, NodeIndex>::new();

    for triple_ref in ox_graph.iter() {
        let subject_term = Term::from(triple_ref.subject.into_owned());
        let object_term = triple_ref.object.into_owned();
        let predicate = triple_ref.predicate.into_owned();

        let s_node = *node_map
            .entry(subject_term.clone())
            .or_insert_with(|| pg_graph.add_node(subject_term));
        let o_node = *node_map
            .entry(object_term.clone())
            .or_insert_with(|| pg_graph.add_node(object_term));

        pg_graph.add_edge(s_node, o_node, predicate);
    }

    pg_graph
}

/// Blank nodes match any blank node; every other term must be equal.
fn terms_match(left: &Term, right: &Term) -> bool {
    match (left, right) {
        (Term::BlankNode(_), Term::BlankNode(_)) => true,
        _ => left == right,
    }
}

/// Checks if two RDF graphs are isomorphic, up to blank node renaming.
///
/// Re-parsing the same Turtle document yields fresh blank node labels, so a
/// generated file and its on-disk copy only compare equal under this notion.
pub fn are_isomorphic(g1: &Graph, g2: &Graph) -> bool {
    if g1.len() != g2.len() {
        return false;
    }
    let pg1 = oxigraph_to_petgraph(g1);
    let pg2 = oxigraph_to_petgraph(g2);

    is_isomorphic_matching(&pg1, &pg2, terms_match, |e1, e2| e1 == e2)
}
