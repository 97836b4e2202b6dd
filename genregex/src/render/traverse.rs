use crate::render::{Edge, Node};
use crate::{Label, Nfa};

/// Collects every transition and every state of `nfa`, in arena order.
pub fn traverse<T>(nfa: &Nfa<T>) -> (Vec<Edge>, Vec<Node>) {
    let edges = nfa
        .states()
        .iter()
        .enumerate()
        .flat_map(|(from, state)| {
            state.transitions().iter().map(move |transition| Edge {
                from,
                to: transition.target(),
                epsilon: transition.is_epsilon(),
                label_text: match transition.label() {
                    Label::Epsilon => "ε".to_string(),
                    Label::OnPredicate(p) => p.name().unwrap_or("?").to_string(),
                },
            })
        })
        .collect();

    let nodes = nfa
        .states()
        .iter()
        .enumerate()
        .map(|(id, state)| Node {
            id,
            accepting: state.is_accepting(),
            start: id == nfa.start(),
        })
        .collect();

    (edges, nodes)
}
