//! Try-on session routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use placement::{Canvas, DropEvent, ItemId, PlacedItem};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::session::{self, ListOrder, SessionError, SessionSnapshot};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CanvasBody {
    pub width: f64,
    pub height: f64,
}

impl From<CanvasBody> for Canvas {
    fn from(body: CanvasBody) -> Self {
        Canvas::new(body.width, body.height)
    }
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub id: Uuid,
    pub canvas: Canvas,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    #[serde(default)]
    pub order: ListOrder,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// `POST /api/sessions`: start a try-on session on a canvas.
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CanvasBody>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), Response> {
    let canvas = Canvas::from(body);
    let id = session::create_session(&state, canvas)
        .await
        .map_err(session_error_response)?;
    Ok((StatusCode::CREATED, Json(CreateSessionResponse { id, canvas })))
}

/// `GET /api/sessions/:id`: canvas plus items in insertion order.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, Response> {
    let snapshot = session::snapshot(&state, id, ListOrder::Insertion)
        .await
        .map_err(session_error_response)?;
    Ok(Json(snapshot))
}

/// `DELETE /api/sessions/:id`: end a session.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, Response> {
    session::delete_session(&state, id)
        .await
        .map_err(session_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/sessions/:id/canvas`: report the laid-out canvas size.
pub async fn set_canvas(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CanvasBody>,
) -> Result<Json<Canvas>, Response> {
    let canvas = Canvas::from(body);
    session::set_canvas(&state, id, canvas)
        .await
        .map_err(session_error_response)?;
    Ok(Json(canvas))
}

/// `POST /api/sessions/:id/drop`: place a dropped garment.
pub async fn drop_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<DropEvent>,
) -> Result<(StatusCode, Json<PlacedItem>), Response> {
    let item = session::drop_item(&state, id, event)
        .await
        .map_err(session_error_response)?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /api/sessions/:id/items?order=insertion|stack`
pub async fn list_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Vec<PlacedItem>>, Response> {
    let items = session::list_items(&state, id, query.order)
        .await
        .map_err(session_error_response)?;
    Ok(Json(items))
}

/// `DELETE /api/sessions/:id/items/:item_id`: 204 whether or not the item existed.
pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, ItemId)>,
) -> Result<StatusCode, Response> {
    session::remove_item(&state, id, item_id)
        .await
        .map_err(session_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/sessions/:id/items`: clear the mannequin.
pub async fn clear_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, Response> {
    let removed = session::clear_items(&state, id)
        .await
        .map_err(session_error_response)?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

pub(crate) fn session_error_to_status(err: &SessionError) -> StatusCode {
    match err {
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::LimitReached { .. } => StatusCode::SERVICE_UNAVAILABLE,
        SessionError::Deferred(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn session_error_response(err: SessionError) -> Response {
    let status = session_error_to_status(&err);
    (status, Json(ErrorBody { error: err.to_string(), code: err.error_code() })).into_response()
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
