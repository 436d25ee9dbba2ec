//! Try-on session service: drop → probe → place → append.
//!
//! DESIGN
//! ======
//! A drop runs in two phases. `PendingPlacement::begin` snapshots the
//! session canvas under the lock; the image probe then runs with no lock
//! held; finally the finished item is appended under the write lock. Two
//! drops in flight on the same session do not wait for each other, so the
//! store reflects the order in which their image sizes resolved, not the
//! order in which they were dropped.
//!
//! Every operation on a session marks it as used. A background sweep
//! (`spawn_eviction_task`) drops sessions idle for longer than the
//! configured TTL, and creation is refused once `AppState::max_sessions`
//! sessions are live.

use std::time::{Duration, Instant};

use placement::{Canvas, DropEvent, ItemId, PendingPlacement, PlacedItem, PlacementError};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::{AppState, TryOnSession};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(Uuid),
    #[error("session limit of {limit} reached")]
    LimitReached { limit: usize },
    #[error("placement deferred: {0}")]
    Deferred(#[from] PlacementError),
}

impl SessionError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_SESSION_NOT_FOUND",
            Self::LimitReached { .. } => "E_SESSION_LIMIT",
            Self::Deferred(e) => e.error_code(),
        }
    }
}

/// Ordering for listed items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListOrder {
    /// The order items were added in.
    #[default]
    Insertion,
    /// Draw order: `stack_order` ascending, ties in insertion order.
    Stack,
}

/// A session's canvas and items, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub canvas: Canvas,
    pub items: Vec<PlacedItem>,
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Create an empty session on `canvas` and return its ID.
///
/// # Errors
///
/// Returns `LimitReached` if `state.max_sessions` sessions are already live.
pub async fn create_session(state: &AppState, canvas: Canvas) -> Result<Uuid, SessionError> {
    let mut sessions = state.sessions.write().await;
    if sessions.len() >= state.max_sessions {
        warn!(limit = state.max_sessions, "session limit reached; refusing new session");
        return Err(SessionError::LimitReached { limit: state.max_sessions });
    }
    let id = Uuid::new_v4();
    sessions.insert(id, TryOnSession::new(canvas));
    info!(%id, width = canvas.width, height = canvas.height, "try-on session created");
    Ok(id)
}

/// Drop a session and everything placed on it.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist.
pub async fn delete_session(state: &AppState, id: Uuid) -> Result<(), SessionError> {
    if state.sessions.write().await.remove(&id).is_none() {
        return Err(SessionError::NotFound(id));
    }
    info!(%id, "try-on session deleted");
    Ok(())
}

/// Replace the session canvas. Items already placed keep their geometry.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist.
pub async fn set_canvas(state: &AppState, id: Uuid, canvas: Canvas) -> Result<(), SessionError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
    session.canvas = canvas;
    session.touch();
    Ok(())
}

/// Current canvas and items of a session.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist.
pub async fn snapshot(state: &AppState, id: Uuid, order: ListOrder) -> Result<SessionSnapshot, SessionError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
    session.touch();
    Ok(SessionSnapshot { id, canvas: session.canvas, items: ordered_items(session, order) })
}

// =============================================================================
// PLACEMENT
// =============================================================================

/// Place a dropped garment and append it to the session store.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist (or was deleted while
/// the image size was resolving), and `Deferred` if the canvas has not been
/// laid out or the image size could not be resolved.
pub async fn drop_item(state: &AppState, id: Uuid, event: DropEvent) -> Result<PlacedItem, SessionError> {
    let pending = {
        let mut sessions = state.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.touch();
        PendingPlacement::begin(event, session.canvas)
    };
    debug!(
        %id,
        category = %pending.category(),
        anchor_x = pending.anchor().x,
        anchor_y = pending.anchor().y,
        "drop received; resolving image size"
    );

    if !pending.canvas().is_ready() {
        return Err(PlacementError::CanvasNotReady.into());
    }

    let natural = match state.probe.natural_size(pending.image_ref()).await {
        Ok(size) => size,
        Err(e) => {
            warn!(%id, error = %e, code = e.error_code(), "image size unavailable; placement deferred");
            return Err(PlacementError::ImageNotReady.into());
        }
    };

    let item = pending.finish(natural)?;

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
    session.store.add(item.clone());
    session.touch();
    info!(
        %id,
        item_id = %item.id,
        category = %item.category,
        free_placement = !item.category.is_known(),
        x = item.position.x,
        y = item.position.y,
        width = item.size.width,
        height = item.size.height,
        "garment placed"
    );

    Ok(item)
}

/// Remove one item. Removing an absent item is not an error.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist.
pub async fn remove_item(state: &AppState, id: Uuid, item_id: ItemId) -> Result<Option<PlacedItem>, SessionError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
    session.touch();
    Ok(session.store.remove(&item_id))
}

/// Remove every item, returning how many were removed.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist.
pub async fn clear_items(state: &AppState, id: Uuid) -> Result<usize, SessionError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
    let count = session.store.len();
    session.store.clear();
    session.touch();
    Ok(count)
}

/// Items of a session in the requested order.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist.
pub async fn list_items(state: &AppState, id: Uuid, order: ListOrder) -> Result<Vec<PlacedItem>, SessionError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
    session.touch();
    Ok(ordered_items(session, order))
}

fn ordered_items(session: &TryOnSession, order: ListOrder) -> Vec<PlacedItem> {
    match order {
        ListOrder::Insertion => session.store.list().to_vec(),
        ListOrder::Stack => session.store.render_order().into_iter().cloned().collect(),
    }
}

// =============================================================================
// EVICTION
// =============================================================================

/// Remove every session idle for longer than `ttl`, returning how many went.
pub async fn evict_idle(state: &AppState, ttl: Duration) -> usize {
    let now = Instant::now();
    let mut sessions = state.sessions.write().await;
    let before = sessions.len();
    sessions.retain(|_, session| session.idle_for(now) <= ttl);
    let evicted = before - sessions.len();
    if evicted > 0 {
        info!(evicted, remaining = sessions.len(), "idle try-on sessions evicted");
    }
    evicted
}

/// Spawn the idle-session sweep. Returns a handle for shutdown.
pub fn spawn_eviction_task(state: AppState, ttl: Duration, sweep_interval: Duration) -> JoinHandle<()> {
    info!(ttl_secs = ttl.as_secs(), sweep_secs = sweep_interval.as_secs(), "session eviction configured");
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(sweep_interval).await;
            evict_idle(&state, ttl).await;
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
