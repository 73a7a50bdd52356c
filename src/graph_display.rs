//! NFA -> Graphviz DOT/SVG, for debugging a compiled pattern's automaton.
//!
//! Generalized from the teacher's `NFA -> DiGraph` conversion to the
//! new generic `Transition<T>` shape: groups now render as an
//! open/close edge pair carrying the group's index and optional name,
//! rather than the teacher's single end-of-match group label, and
//! there is a `^`/`$` anchor edge kind the teacher's char-only engine
//! never needed. Predicates aren't `Display`, so `Match` edges render
//! as a plain `"match"` label rather than the teacher's literal char.

use graphviz_rust::attributes::{arrowhead, shape, EdgeAttributes, NodeAttributes};
use graphviz_rust::cmd::{Format, Layout};
use graphviz_rust::dot_generator::{edge, graph, id, node, node_id};
use graphviz_rust::exec_dot;
use graphviz_rust::printer::{DotPrinter, PrinterContext};

use crate::nfa::{AnchorKind, Boundary, Nfa, State, Transition};

pub struct DiGraph(graphviz_rust::dot_structures::Graph);

impl<T> From<&Nfa<T>> for DiGraph {
    fn from(nfa: &Nfa<T>) -> Self {
        let mut nodes = vec![];
        let mut edges = vec![];

        for (index, transition) in nfa.transitions.iter().enumerate() {
            let state = State(index);
            if state == nfa.accept {
                nodes.push(node!(state; NodeAttributes::shape(shape::doublecircle)));
            } else if state == nfa.start {
                nodes.push(node!(state));
                nodes.push(node!("start"; NodeAttributes::shape(shape::none)));
                edges.push(edge!(node_id!("start") => node_id!(state);
                                 EdgeAttributes::arrowhead(arrowhead::normal)));
            } else {
                nodes.push(node!(state));
            }

            match transition {
                Transition::Match(_, e) => {
                    edges.push(edge!(node_id!(state) => node_id!(e);
                            EdgeAttributes::arrowhead(arrowhead::normal),
                            EdgeAttributes::label("\"match\"")));
                }
                Transition::Split(e1, e2) => {
                    if let Some(e1) = e1 {
                        edges.push(edge!(node_id!(state) => node_id!(e1)));
                    }
                    if let Some(e2) = e2 {
                        edges.push(edge!(node_id!(state) => node_id!(e2)));
                    }
                }
                Transition::Anchor(kind, e) => {
                    let label = match kind {
                        AnchorKind::Start => "^",
                        AnchorKind::End => "$",
                    };
                    edges.push(edge!(node_id!(state) => node_id!(e);
                            EdgeAttributes::arrowhead(arrowhead::normal),
                            EdgeAttributes::label(format!("\"{label}\""))));
                }
                Transition::Group(marker, e) => {
                    let boundary = match marker.boundary {
                        Boundary::Open => "open",
                        Boundary::Close => "close",
                    };
                    let name = marker.name.as_deref().unwrap_or("");
                    edges.push(edge!(node_id!(state) => node_id!(e);
                            EdgeAttributes::arrowhead(arrowhead::normal),
                            EdgeAttributes::label(format!("\"{boundary} {}{name}\"", marker.index))));
                }
                Transition::Accept => {}
            }
        }

        let mut graph: graphviz_rust::dot_structures::Graph = graph!(strict di id!("G"));
        for node in nodes {
            graph.add_stmt(node.into());
        }
        for edge in edges {
            graph.add_stmt(edge.into());
        }

        Self(graph)
    }
}

impl std::fmt::Display for DiGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dot = self.0.print(&mut PrinterContext::default());

        match exec_dot(dot, vec![Format::Svg.into(), Layout::Dot.into()]) {
            Ok(s) => s.fmt(f),
            Err(e) => {
                eprintln!("{e}");
                Err(std::fmt::Error)
            }
        }
    }
}
