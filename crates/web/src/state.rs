//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::QuillConfig;
use crate::services::media::MediaStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: QuillConfig,
    pool: PgPool,
    media: MediaStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: QuillConfig, pool: PgPool) -> Self {
        let media = MediaStore::new(config.media_dir.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                media,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuillConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn media(&self) -> &MediaStore {
        &self.inner.media
    }
}
