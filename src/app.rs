use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/lanes", post(handlers::pack_lanes))
        .route("/api/calendar/:year/:month", get(handlers::get_month))
        .route("/api/days/:date", get(handlers::get_day))
        .route("/api/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/api/tasks/:id",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .with_state(state)
}
