use axum::{Router, routing::get};

use crate::AppState;

mod announcement;

pub fn build_router() -> Router<AppState> {
    Router::new().route("/api/study-announcement", get(announcement::get_announcement))
}
