//! Graphviz export of the feature tree.
//!
//! Each feature becomes a box; each non-empty group of a feature becomes a
//! small routing node between the feature and the group's members. Edges
//! into mandatory members end in a filled dot, edges into optional members
//! in a hollow one.

use std::fmt::Write;

use featureforge_core::{FeatureModel, GroupKind, HasConstraints, HasFeatureTree, NodeId};
use tracing::debug;

/// Renders `model` in DOT syntax.
///
/// # Example
///
/// ```
/// use featureforge_core::FeatureModel;
/// use featureforge_io::to_dot;
///
/// let mut model = FeatureModel::new();
/// let car = model.add_feature("Car").unwrap();
/// model.add_child("Radio", &car).unwrap();
///
/// let dot = to_dot(&model);
/// assert!(dot.starts_with("digraph featuremodel {"));
/// assert!(dot.contains("label=\"Radio\""));
/// assert!(dot.contains("arrowhead=odot"));
/// ```
pub fn to_dot(model: &FeatureModel) -> String {
    let tree = model.feature_tree();
    let mut out = String::new();
    out.push_str("digraph featuremodel {\n");
    out.push_str("  rankdir=TB;\n");
    out.push_str("  node [shape=box, style=rounded, fontname=\"Helvetica\"];\n");
    out.push_str("  edge [arrowhead=none];\n");

    let mut edges = 0usize;
    for id in tree.preorder() {
        let Some(node) = tree.node(id) else {
            continue;
        };
        let Some(feature) = model.feature(node.feature()) else {
            continue;
        };

        let mut style = vec!["rounded"];
        if feature.is_abstract() {
            style.push("dashed");
        }
        let mut attrs = format!("label=\"{}\", style=\"{}\"", escape(&feature.name()), style.join(","));
        if model.is_hidden_in_tree(feature.identifier()) {
            attrs.push_str(", fontcolor=gray50, color=gray50");
        }
        let _ = writeln!(out, "  {} [{}];", node_name(id), attrs);

        for (index, group) in node.groups().iter().enumerate() {
            let members = tree.group_children(id, index);
            if members.is_empty() {
                continue;
            }
            let group_node = format!("{}_g{}", node_name(id), index);
            let shape = match group.kind() {
                GroupKind::And => "shape=point, width=0.05".to_string(),
                GroupKind::Or => "shape=circle, style=filled, fillcolor=black, label=\"\", width=0.15".to_string(),
                GroupKind::Alternative => "shape=circle, label=\"\", width=0.15".to_string(),
                GroupKind::Cardinality => format!("shape=plaintext, label=\"{}\"", group.range()),
            };
            let _ = writeln!(out, "  {group_node} [{shape}];");
            let _ = writeln!(out, "  {} -> {group_node};", node_name(id));
            for member in members {
                let head = match tree.node(member) {
                    Some(m) if m.is_mandatory() => "dot",
                    _ => "odot",
                };
                let _ = writeln!(out, "  {group_node} -> {} [arrowhead={head}];", node_name(member));
                edges += 1;
            }
        }
    }

    if !model.constraints().is_empty() {
        let label: String = model
            .constraints()
            .iter()
            .map(|c| format!("{}\\l", escape(&c.formula().to_string())))
            .collect();
        let _ = writeln!(out, "  constraints [shape=note, label=\"{label}\"];");
    }

    out.push_str("}\n");
    debug!(event = "dot_exported", nodes = tree.len() as u64, edges = edges as u64);
    out
}

fn node_name(id: NodeId) -> String {
    format!("n{}", id.index())
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use featureforge_core::{Group, Range};
    use featureforge_test::car::car_model;
    use featureforge_test::groups::cardinality_model;

    use super::*;

    #[test]
    fn test_car_graph_shape() {
        let car = car_model();
        let dot = to_dot(&car.model);

        assert_eq!(dot.matches("[label=").count(), 10);
        // Car, Gearbox, Radio and Diagnostics each route through one group node.
        assert_eq!(dot.matches("_g0 [").count(), 4);
        assert_eq!(dot.matches("arrowhead=dot]").count(), 2);
        assert_eq!(dot.matches("arrowhead=odot]").count(), 7);
        assert!(dot.contains("style=\"rounded,dashed\""));
        assert!(dot.contains("fillcolor=black"));
        assert!(dot.contains("fontcolor=gray50"));
        assert!(dot.contains("label=\"Navigation => Automatic\\l\""));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_cardinality_group_is_labeled() {
        let fixture = cardinality_model(2, Some(3), &["A", "B", "C", "D"]);
        let dot = to_dot(&fixture.model);
        assert!(dot.contains("shape=plaintext, label=\"[2..3]\""));
        assert_eq!(dot.matches("arrowhead=odot]").count(), 4);
    }

    #[test]
    fn test_empty_groups_are_omitted() {
        let mut fixture = cardinality_model(0, None, &["A"]);
        fixture
            .model
            .add_group(&fixture.root, Group::new(Range::ALTERNATIVE))
            .unwrap();
        let dot = to_dot(&fixture.model);
        assert!(dot.contains("_g0 [shape=point"));
        assert!(!dot.contains("_g1"));
        assert!(!dot.contains("constraints"));
    }

    #[test]
    fn test_names_are_escaped() {
        let mut fixture = cardinality_model(0, None, &[]);
        fixture
            .model
            .add_child("Say \"hi\"", &fixture.root)
            .unwrap();
        assert!(to_dot(&fixture.model).contains("label=\"Say \\\"hi\\\"\""));
    }
}
