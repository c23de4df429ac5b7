use std::{fmt, path::PathBuf, time::Duration};

use tokio::fs;
use tracing::{info, warn};

use super::normalize::{TreeDocument, parse_document};
use crate::{error::AppError, models::map::MapView};

/// Where the tree shown to new sessions comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    Builtin,
    Remote(String),
    File(PathBuf),
}

impl TreeSource {
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => TreeSource::Builtin,
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                TreeSource::Remote(url.to_string())
            }
            Some(path) => TreeSource::File(PathBuf::from(path)),
        }
    }
}

impl fmt::Display for TreeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeSource::Builtin => f.write_str("builtin"),
            TreeSource::Remote(url) => f.write_str(url),
            TreeSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads the initial tree. Failures are logged and fall back to the
/// built-in tree; they never surface to clients.
pub async fn load_initial_tree(source: &TreeSource, timeout: Duration) -> TreeDocument {
    match fetch_document(source, timeout).await {
        Ok(document) => {
            info!(
                source = %source,
                roots = document.roots.len(),
                nodes = document.node_count(),
                map_tables = document.map_view.as_ref().map_or(0, MapView::table_count),
                "loaded initial tree"
            );
            document
        }
        Err(err) => {
            warn!(
                source = %source,
                error = %err,
                "failed to load tree source, using built-in tree"
            );
            TreeDocument::builtin()
        }
    }
}

async fn fetch_document(source: &TreeSource, timeout: Duration) -> Result<TreeDocument, AppError> {
    match source {
        TreeSource::Builtin => Ok(TreeDocument::builtin()),
        TreeSource::Remote(url) => {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            let bytes = client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            parse_document(&bytes)
        }
        TreeSource::File(path) => {
            let bytes = fs::read(path).await?;
            parse_document(&bytes)
        }
    }
}
