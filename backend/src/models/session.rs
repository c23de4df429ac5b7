use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::{Node, NodeType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("light") {
            Ok(Theme::Light)
        } else if value.eq_ignore_ascii_case("dark") {
            Ok(Theme::Dark)
        } else {
            Err(format!("unknown theme {value:?}, expected light or dark"))
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
    pub index: usize,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    pub child_count: usize,
    pub can_open: bool,
    pub can_create_table: bool,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            child_count: node.children.len(),
            can_open: node.has_children(),
            can_create_table: node.kind.supports_table_creation(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub depth: usize,
    pub breadcrumb: Vec<BreadcrumbEntry>,
    pub nodes: Vec<NodeSummary>,
    pub has_map_view: bool,
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenResponse {
    pub opened: bool,
    pub view: SessionView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub root_count: usize,
    pub node_count: usize,
    pub has_map_view: bool,
    pub view: SessionView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRequestResponse {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeRequest {
    pub theme: Theme,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn summary_reflects_node_affordances() {
        let bucket = Node::new("s3", "S3", NodeType::Bucket)
            .with_children(vec![Node::new("hr", "HR", NodeType::Bucket)]);
        let summary = NodeSummary::from(&bucket);
        assert_eq!(summary.child_count, 1);
        assert!(summary.can_open);
        assert!(summary.can_create_table);

        let db = NodeSummary::from(&Node::new("pg", "PostgreSQL", NodeType::Database));
        assert!(!db.can_open);
        assert!(!db.can_create_table);
    }
}
