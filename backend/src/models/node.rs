use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Database,
    Bucket,
    Folder,
    File,
    Schema,
    Region,
    Table,
    Server,
}

impl NodeType {
    pub const ALL: [NodeType; 8] = [
        NodeType::Database,
        NodeType::Bucket,
        NodeType::Folder,
        NodeType::File,
        NodeType::Schema,
        NodeType::Region,
        NodeType::Table,
        NodeType::Server,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Database => "database",
            NodeType::Bucket => "bucket",
            NodeType::Folder => "folder",
            NodeType::File => "file",
            NodeType::Schema => "schema",
            NodeType::Region => "region",
            NodeType::Table => "table",
            NodeType::Server => "server",
        }
    }

    /// Exact, case-sensitive match against the serialized names.
    pub fn from_raw(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Node kinds that expose the "create table from path" action.
    pub fn supports_table_creation(self) -> bool {
        matches!(self, NodeType::File | NodeType::Folder | NodeType::Bucket)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Counts this node and all of its descendants.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}
