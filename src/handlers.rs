use crate::calendar::{month_layout, tasks_on};
use crate::errors::AppError;
use crate::lanes::{lane_count, pack_bars, pack_bars_by_start, Bar};
use crate::models::{
    CreateTaskRequest, DeleteResponse, MonthQuery, PackOrder, PackRequest, PackResponse, Task,
    UpdateTaskRequest,
};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::render_month;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::info;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Html<String>, AppError> {
    let today = Local::now().date_naive();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());

    let tasks = state.data.lock().await.tasks_by_start();
    let layout = month_layout(&tasks, year, month)?;
    Ok(Html(render_month(&layout, today)))
}

pub async fn pack_lanes(Json(payload): Json<PackRequest>) -> Result<Json<PackResponse>, AppError> {
    let bars = payload
        .bars
        .into_iter()
        .map(|bar| Bar::new(bar.start_column, bar.end_column, bar.payload))
        .collect::<Result<Vec<Bar<Value>>, _>>()?;

    let placements = match payload.order {
        PackOrder::Input => pack_bars(bars),
        PackOrder::Start => pack_bars_by_start(bars),
    };

    Ok(Json(PackResponse {
        lanes: lane_count(&placements),
        placements,
    }))
}

pub async fn get_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<Value>, AppError> {
    let tasks = state.data.lock().await.tasks_by_start();
    let layout = month_layout(&tasks, year, month)?;
    let body = serde_json::to_value(&layout).map_err(AppError::internal)?;
    Ok(Json(body))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Task>>, AppError> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("date must be YYYY-MM-DD, got '{date}'")))?;

    let data = state.data.lock().await;
    let tasks = tasks_on(&data.tasks, date).into_iter().cloned().collect();
    Ok(Json(tasks))
}

pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    let data = state.data.lock().await;
    Json(data.tasks_by_start())
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    validate_task(&payload.title, payload.start_at, payload.end_at)?;

    let mut data = state.data.lock().await;
    let task = data.insert(payload);
    persist_data(&state.data_path, &data).await?;

    info!(id = task.id, multi_day = task.is_multi_day(), "created task");
    Ok(Json(task))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Task>, AppError> {
    let data = state.data.lock().await;
    data.get(id).cloned().map(Json).ok_or_else(|| task_not_found(id))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let mut data = state.data.lock().await;
    let current = data.get(id).ok_or_else(|| task_not_found(id))?;
    let updated = payload.apply_to(current);
    validate_task(&updated.title, updated.start_at, updated.end_at)?;

    data.replace(updated.clone());
    persist_data(&state.data_path, &data).await?;

    info!(id, "updated task");
    Ok(Json(updated))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>, AppError> {
    let mut data = state.data.lock().await;
    data.remove(id).ok_or_else(|| task_not_found(id))?;
    persist_data(&state.data_path, &data).await?;

    info!(id, "deleted task");
    Ok(Json(DeleteResponse { deleted: true }))
}

fn validate_task(title: &str, start_at: NaiveDateTime, end_at: NaiveDateTime) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }
    if end_at < start_at {
        return Err(AppError::bad_request("end_at must not be before start_at"));
    }
    Ok(())
}

fn task_not_found(id: u64) -> AppError {
    AppError::not_found(format!("task {id} not found"))
}
