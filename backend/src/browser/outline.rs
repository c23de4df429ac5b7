use crate::models::node::{Node, NodeType};

const INDENT: &str = "  ";

/// Renders nodes as an indented list, one line per node. File nodes carry a
/// `(+)` marker for the create-table action.
pub fn render_outline(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, 0, &mut out);
    }
    out
}

fn render_node(node: &Node, level: usize, out: &mut String) {
    let marker = if node.kind == NodeType::File { " (+)" } else { "" };
    out.push_str(&format!(
        "{}- {} [{}]{marker}\n",
        INDENT.repeat(level),
        node.name,
        node.kind.as_str()
    ));
    for child in &node.children {
        render_node(child, level + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_levels_with_indentation() {
        let tree = vec![
            Node::new("lake", "Lake", NodeType::Database).with_children(vec![
                Node::new("raw", "raw", NodeType::Folder)
                    .with_children(vec![Node::new("p0", "part-0.parquet", NodeType::File)]),
            ]),
            Node::new("gcs", "GCS", NodeType::Bucket),
        ];

        let expected = "\
- Lake [database]
  - raw [folder]
    - part-0.parquet [file] (+)
- GCS [bucket]
";
        assert_eq!(render_outline(&tree), expected);
    }

    #[test]
    fn empty_tree_renders_nothing() {
        assert_eq!(render_outline(&[]), "");
    }
}
