//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::library::DocumentStore;
use crate::pdf::RenderService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    renderer: RenderService,
    documents: DocumentStore,
}

impl AppState {
    /// Create the application state, making sure the upload and render
    /// directories exist
    pub async fn new(config: Config, db: SqlitePool) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(&config.storage.upload_dir).await?;
        tokio::fs::create_dir_all(&config.storage.temp_dir).await?;

        let renderer = RenderService::new(
            config.storage.temp_dir.clone(),
            config.server.render_timeout_secs,
        );
        let documents = DocumentStore::new(
            db.clone(),
            config.storage.upload_dir.clone(),
            renderer.clone(),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                renderer,
                documents,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the page renderer
    pub fn renderer(&self) -> &RenderService {
        &self.inner.renderer
    }

    /// Get the document store
    pub fn documents(&self) -> &DocumentStore {
        &self.inner.documents
    }

    /// Secret used to sign flash cookies
    pub fn session_secret(&self) -> &str {
        &self.inner.config.session.secret
    }
}
