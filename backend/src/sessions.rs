use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    browser::{Navigator, TreeDocument},
    error::AppError,
    models::{
        map::MapView,
        session::{BreadcrumbEntry, NodeSummary, SessionView, Theme},
    },
};

/// State behind one browser view.
#[derive(Debug, Clone)]
pub struct BrowserSession {
    pub id: Uuid,
    pub navigator: Navigator,
    pub map_view: Option<MapView>,
    pub theme: Theme,
}

impl BrowserSession {
    pub fn new(id: Uuid, document: TreeDocument, theme: Theme) -> Self {
        Self {
            id,
            navigator: Navigator::new(document.roots),
            map_view: document.map_view,
            theme,
        }
    }

    /// Swaps in a freshly uploaded document, back at depth 0.
    pub fn replace_document(&mut self, document: TreeDocument) {
        self.navigator.replace_root(document.roots);
        self.map_view = document.map_view;
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            depth: self.navigator.depth(),
            breadcrumb: self
                .navigator
                .breadcrumb()
                .into_iter()
                .enumerate()
                .map(|(index, node)| BreadcrumbEntry {
                    index,
                    id: node.id.clone(),
                    name: node.name.clone(),
                })
                .collect(),
            nodes: self
                .navigator
                .current()
                .iter()
                .map(NodeSummary::from)
                .collect(),
            has_map_view: self.map_view.is_some(),
            theme: self.theme,
        }
    }
}

#[derive(Debug, Default)]
struct SessionMap {
    sessions: HashMap<Uuid, BrowserSession>,
    created: VecDeque<Uuid>,
}

/// In-memory registry of browser sessions, bounded by `max_sessions`.
pub struct SessionStore {
    initial: TreeDocument,
    default_theme: Theme,
    max_sessions: usize,
    inner: RwLock<SessionMap>,
}

impl SessionStore {
    pub fn new(initial: TreeDocument, default_theme: Theme, max_sessions: usize) -> Self {
        Self {
            initial,
            default_theme,
            max_sessions: max_sessions.max(1),
            inner: RwLock::new(SessionMap::default()),
        }
    }

    pub async fn active_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    pub async fn create(&self) -> SessionView {
        let id = Uuid::new_v4();
        let session = BrowserSession::new(id, self.initial.clone(), self.default_theme);
        let view = session.view();

        let mut inner = self.inner.write().await;
        while inner.sessions.len() >= self.max_sessions {
            let Some(oldest) = inner.created.pop_front() else {
                break;
            };
            if inner.sessions.remove(&oldest).is_some() {
                info!(session_id = %oldest, "evicted oldest browser session");
            }
        }
        inner.sessions.insert(id, session);
        inner.created.push_back(id);

        debug!(session_id = %id, active = inner.sessions.len(), "created browser session");
        view
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        inner
            .sessions
            .remove(&id)
            .ok_or_else(|| session_not_found(id))?;
        inner.created.retain(|entry| *entry != id);
        debug!(session_id = %id, "removed browser session");
        Ok(())
    }

    pub async fn read<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&BrowserSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let inner = self.inner.read().await;
        let session = inner.sessions.get(&id).ok_or_else(|| session_not_found(id))?;
        f(session)
    }

    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut BrowserSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or_else(|| session_not_found(id))?;
        f(session)
    }
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("session {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::node::{Node, NodeType};

    fn document() -> TreeDocument {
        TreeDocument {
            roots: vec![
                Node::new("lake", "Lake", NodeType::Database)
                    .with_children(vec![Node::new("raw", "Raw", NodeType::Folder)]),
            ],
            map_view: None,
        }
    }

    #[tokio::test]
    async fn sessions_navigate_independently() {
        let store = SessionStore::new(document(), Theme::Light, 8);
        let first = store.create().await.session_id;
        let second = store.create().await.session_id;

        store
            .update(first, |session| session.navigator.open("lake"))
            .await
            .unwrap();

        let first_view = store.read(first, |s| Ok(s.view())).await.unwrap();
        let second_view = store.read(second, |s| Ok(s.view())).await.unwrap();
        assert_eq!(first_view.depth, 1);
        assert_eq!(first_view.nodes[0].id, "raw");
        assert_eq!(second_view.depth, 0);
        assert_eq!(second_view.nodes[0].id, "lake");
    }

    #[tokio::test]
    async fn creating_past_the_cap_evicts_the_oldest() {
        let store = SessionStore::new(document(), Theme::Dark, 2);
        let oldest = store.create().await.session_id;
        let middle = store.create().await.session_id;
        let newest = store.create().await;

        assert_eq!(newest.theme, Theme::Dark);
        assert_eq!(store.active_count().await, 2);
        assert!(matches!(
            store.read(oldest, |s| Ok(s.id)).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(store.read(middle, |s| Ok(s.id)).await.unwrap(), middle);
    }

    #[tokio::test]
    async fn removed_sessions_are_gone() {
        let store = SessionStore::new(document(), Theme::Light, 4);
        let id = store.create().await.session_id;
        store.remove(id).await.unwrap();
        assert!(matches!(store.remove(id).await, Err(AppError::NotFound(_))));
        assert_eq!(store.active_count().await, 0);
    }

    #[test]
    fn replacing_the_document_resets_depth_and_map() {
        let mut session = BrowserSession::new(Uuid::new_v4(), document(), Theme::Light);
        session.navigator.open("lake").unwrap();
        session.replace_document(TreeDocument {
            roots: vec![Node::new("new", "New", NodeType::Folder)],
            map_view: None,
        });
        let view = session.view();
        assert_eq!(view.depth, 0);
        assert!(view.breadcrumb.is_empty());
        assert_eq!(view.nodes[0].id, "new");
    }
}
