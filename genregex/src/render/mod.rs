//! Render compiled automata to graphviz `.dot` files.
//!
//! Generally, use `nfa.render_to(filename, RenderSettings::default())` for the most basic rendering.
//! Rendering only uses the read-only view of an [`Nfa`], so anything drawn here can also
//! be computed by hand from [`Nfa::states`].

use crate::{Nfa, StateId};
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

mod traverse;
pub use traverse::traverse;

/// Global settings related to rendering automata.
pub struct RenderSettings {
    /// Whether to display predicate names next to edges
    pub show_edge_labels: bool,
    /// The title which should be displayed above the graph.
    ///
    /// Defaults to the filename given to [`RenderNfa::render_to`].
    pub title: Option<String>,
}

impl RenderSettings {
    /// Sets the name of the automaton
    pub fn with_name(mut self, name: impl AsRef<str>) -> Self {
        self.title = Some(name.as_ref().to_string());
        self
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_edge_labels: true,
            title: None,
        }
    }
}

/// An edge from one state to another
pub struct Edge {
    /// the source state, where the edge starts
    pub from: StateId,
    /// the destination
    pub to: StateId,
    /// Whether the edge consumes no input
    pub epsilon: bool,
    /// The predicate name, `ε` for epsilon edges and `?` for anonymous predicates.
    ///
    /// Note: this label is hidden if you disable `show_edge_labels` in [`RenderSettings`].
    pub label_text: String,
}

/// A state, as far as rendering is concerned
pub struct Node {
    /// Index of the state in the automaton
    pub id: StateId,
    /// Drawn with a double circle
    pub accepting: bool,
    /// Gets an incoming arrow from nowhere
    pub start: bool,
}

fn state_to_node_name(s: StateId) -> String {
    format!("state_{s}")
}

/// Escapes `inp` for use inside a double-quoted dot string.
fn escape_text(inp: &str) -> String {
    let mut out = String::with_capacity(inp.len());
    for c in inp.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

/// Visualize an automaton by emitting a graphviz dot file.
pub trait RenderNfa {
    /// Writes the whole automaton as a graphviz digraph to `output`.
    fn render<W: Write>(&self, output: &mut W, settings: RenderSettings) -> io::Result<()>;

    /// [`render`](RenderNfa::render) directly to a file.
    fn render_to(&self, path: impl AsRef<Path>, mut settings: RenderSettings) -> io::Result<()> {
        let path = path.as_ref();
        let mut w = File::create(path)?;

        if settings.title.is_none() {
            settings.title = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string());
        }

        self.render(&mut w, settings)?;
        log::info!("rendered automaton to {}", path.display());
        Ok(())
    }
}

impl<T> RenderNfa for Nfa<T> {
    fn render<W: Write>(&self, output: &mut W, settings: RenderSettings) -> io::Result<()> {
        let (edges, nodes) = traverse(self);

        writeln!(output, "digraph {{")?;
        writeln!(output, "rankdir=LR;")?;

        if let Some(ref i) = settings.title {
            // title
            writeln!(output, r#"labelloc="t";"#)?;
            writeln!(output, r#"label="{}";"#, escape_text(i))?;
        }

        // nodes
        for node in &nodes {
            let name = state_to_node_name(node.id);
            let shape = if node.accepting {
                "doublecircle"
            } else {
                "circle"
            };
            writeln!(output, r#"{name} [shape="{shape}"][label="{}"]"#, node.id)?;
        }

        // the start state gets an arrow from an invisible point
        for node in nodes.iter().filter(|n| n.start) {
            writeln!(output, r#"entry [shape="point"]"#)?;
            writeln!(output, "entry -> {}", state_to_node_name(node.id))?;
        }

        // edges
        for edge in edges {
            let from = state_to_node_name(edge.from);
            let to = state_to_node_name(edge.to);
            let style = if edge.epsilon {
                r#"[style="dashed"]"#
            } else {
                ""
            };

            if settings.show_edge_labels {
                let label = escape_text(&edge.label_text);
                writeln!(output, r#"{from} -> {to} [label="{label}"]{style}"#)?
            } else {
                writeln!(output, "{from} -> {to} {style}")?
            }
        }

        writeln!(output, "}}")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_text, traverse, RenderNfa, RenderSettings};
    use crate::patterns::{eq, named, test};
    use crate::Expression;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_single_predicate() {
        let nfa = eq(1).compile_accepting().unwrap();
        let mut out = Vec::new();
        nfa.render(&mut out, RenderSettings::default().with_name("one"))
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"digraph {
rankdir=LR;
labelloc="t";
label="one";
state_0 [shape="circle"][label="0"]
state_1 [shape="doublecircle"][label="1"]
entry [shape="point"]
entry -> state_0
state_0 -> state_1 [label="1"]
}
"#
        );
    }

    #[test]
    fn render_without_labels() {
        let nfa = Expression::star(test(|x: &u8| *x > 3))
            .compile_accepting()
            .unwrap();
        let mut out = Vec::new();
        nfa.render(
            &mut out,
            RenderSettings {
                show_edge_labels: false,
                title: None,
            },
        )
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(!out
            .lines()
            .any(|line| line.contains("->") && line.contains("label")));
        assert_eq!(out.matches("[style=\"dashed\"]").count(), 4);
        assert!(out.contains("state_2 -> state_3 \n"));
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_text("plain"), "plain");
        assert_eq!(escape_text(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_text("two\nlines"), r"two\nlines");
        assert_eq!(escape_text("crlf\r\n"), r"crlf\n");
        assert_eq!(escape_text(r"ends in \"), r"ends in \\");
    }

    #[test]
    fn render_awkward_names() {
        let nfa = named("path\\\nnext \"x\"", |_: &u8| true)
            .compile_accepting()
            .unwrap();
        let mut out = Vec::new();
        nfa.render(&mut out, RenderSettings::default().with_name("dir\\"))
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(r#"label="dir\\";"#));
        assert!(out.contains(r#"state_0 -> state_1 [label="path\\\nnext \"x\""]"#));
        // every line is a complete statement
        assert_eq!(out.lines().count(), 10);
    }

    #[test]
    fn traverse_lists_every_transition() {
        let nfa = Expression::union(eq(1), eq(2)).compile_accepting().unwrap();
        let (edges, nodes) = traverse(&nfa);

        assert_eq!(nodes.len(), 6);
        assert_eq!(nodes.iter().filter(|n| n.start).count(), 1);
        assert_eq!(nodes.iter().filter(|n| n.accepting).count(), 1);

        assert_eq!(edges.len(), 6);
        let mut labels: Vec<_> = edges
            .iter()
            .filter(|e| !e.epsilon)
            .map(|e| e.label_text.as_str())
            .collect();
        labels.sort_unstable();
        assert_eq!(labels, vec!["1", "2"]);
    }
}
