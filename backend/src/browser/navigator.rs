use crate::{error::AppError, models::node::Node};

/// Drill-down position within a tree of nodes.
///
/// The path is a stack of child indices: entry `i` indexes into the sibling
/// set displayed at depth `i`. It only grows through [`Navigator::open`],
/// which validates the index against the displayed set, so every stored
/// path resolves against the current roots.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    roots: Vec<Node>,
    path: Vec<usize>,
}

impl Navigator {
    pub fn new(roots: Vec<Node>) -> Self {
        Self {
            roots,
            path: Vec::new(),
        }
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The sibling set currently on display.
    pub fn current(&self) -> &[Node] {
        match self.breadcrumb().last().copied() {
            Some(node) => &node.children,
            None => &self.roots,
        }
    }

    /// Ancestors of the displayed set, outermost first.
    pub fn breadcrumb(&self) -> Vec<&Node> {
        let mut trail = Vec::with_capacity(self.path.len());
        let mut siblings = self.roots.as_slice();
        for &index in &self.path {
            let Some(node) = siblings.get(index) else {
                break;
            };
            trail.push(node);
            siblings = &node.children;
        }
        trail
    }

    /// Drills into a displayed node. Returns `false` without moving when the
    /// node has no children.
    pub fn open(&mut self, node_id: &str) -> Result<bool, AppError> {
        let index = self.position(node_id)?;
        if !self.current()[index].has_children() {
            return Ok(false);
        }
        self.path.push(index);
        Ok(true)
    }

    /// Steps one level up. Returns `false` at the root.
    pub fn back(&mut self) -> bool {
        self.path.pop().is_some()
    }

    /// Truncates the path so the breadcrumb entry at `index` becomes the
    /// innermost ancestor.
    pub fn jump(&mut self, index: usize) -> Result<(), AppError> {
        if index >= self.path.len() {
            return Err(AppError::BadRequest(format!(
                "breadcrumb index {index} out of range for depth {}",
                self.path.len()
            )));
        }
        self.path.truncate(index + 1);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.path.clear();
    }

    pub fn replace_root(&mut self, roots: Vec<Node>) {
        self.roots = roots;
        self.path.clear();
    }

    /// `/`-joined names from the outermost ancestor down to the displayed
    /// node `node_id`.
    pub fn table_path(&self, node_id: &str) -> Result<String, AppError> {
        let index = self.position(node_id)?;
        let node = &self.current()[index];
        if !node.kind.supports_table_creation() {
            return Err(AppError::BadRequest(format!(
                "cannot create a table from {} node {}",
                node.kind.as_str(),
                node.name
            )));
        }

        let mut segments: Vec<&str> = self
            .breadcrumb()
            .into_iter()
            .map(|ancestor| ancestor.name.as_str())
            .collect();
        segments.push(&node.name);
        Ok(segments.join("/"))
    }

    fn position(&self, node_id: &str) -> Result<usize, AppError> {
        self.current()
            .iter()
            .position(|node| node.id == node_id)
            .ok_or_else(|| AppError::NotFound(format!("node {node_id} at depth {}", self.depth())))
    }
}
