//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the live try-on sessions and the two external collaborators
//! (background removal and image-size probing). Sessions are purely
//! in-memory: a restart starts every mannequin empty, and a session nobody
//! touches for the configured idle TTL is swept away.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use placement::{Canvas, PlacementStore};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::DEFAULT_MAX_SESSIONS;
use crate::services::probe::ImageProbe;
use crate::services::removal::BackgroundRemover;

// =============================================================================
// TRY-ON SESSION
// =============================================================================

/// One mannequin: the canvas it is drawn on and the garments placed on it.
///
/// The store is only mutated while holding the sessions write lock, so each
/// session has a single writer even when several drops resolve concurrently.
pub struct TryOnSession {
    pub canvas: Canvas,
    pub store: PlacementStore,
    last_touched: Instant,
}

impl TryOnSession {
    #[must_use]
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas, store: PlacementStore::new(), last_touched: Instant::now() }
    }

    /// Mark the session as in use.
    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    /// Time since the session was last used, as of `now`.
    #[must_use]
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_touched)
    }
}

impl Default for TryOnSession {
    fn default() -> Self {
        Self::new(Canvas::default())
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<Uuid, TryOnSession>>>,
    pub remover: Arc<dyn BackgroundRemover>,
    pub probe: Arc<dyn ImageProbe>,
    /// Upper bound on live sessions; creation fails once it is reached.
    pub max_sessions: usize,
}

impl AppState {
    #[must_use]
    pub fn new(remover: Arc<dyn BackgroundRemover>, probe: Arc<dyn ImageProbe>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            remover,
            probe,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    #[must_use]
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }
}


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
