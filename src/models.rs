use crate::lanes::{Bar, Placement};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_STATUS: &str = "planned";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
}

impl Task {
    pub fn start_date(&self) -> NaiveDate {
        self.start_at.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_at.date()
    }

    /// Starts and ends on different calendar days.
    pub fn is_multi_day(&self) -> bool {
        self.start_date() != self.end_date()
    }

    /// `date` falls within the task's day range, both ends inclusive.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date() <= date && date <= self.end_date()
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub last_id: u64,
    pub tasks: Vec<Task>,
}

impl AppData {
    pub fn insert(&mut self, request: CreateTaskRequest) -> Task {
        self.last_id = self.last_id.saturating_add(1);
        let task = Task {
            id: self.last_id,
            title: request.title.trim().to_string(),
            category: request.category.unwrap_or_else(default_category),
            status: request.status.unwrap_or_else(default_status),
            start_at: request.start_at,
            end_at: request.end_at,
        };
        self.tasks.push(task.clone());
        task
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Swaps in `task` for the stored task with the same id.
    pub fn replace(&mut self, task: Task) -> Option<Task> {
        let slot = self.tasks.iter_mut().find(|stored| stored.id == task.id)?;
        Some(std::mem::replace(slot, task))
    }

    pub fn remove(&mut self, id: u64) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Tasks ordered by start time; ties keep insertion order.
    ///
    /// Calendar layouts are packed from this order, not from storage order.
    pub fn tasks_by_start(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by_key(|task| task.start_at);
        tasks
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub category: Option<String>,
    pub status: Option<String>,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub start_at: Option<NaiveDateTime>,
    pub end_at: Option<NaiveDateTime>,
}

impl UpdateTaskRequest {
    /// `task` with every provided field overwritten.
    pub fn apply_to(self, task: &Task) -> Task {
        Task {
            id: task.id,
            title: self
                .title
                .map(|title| title.trim().to_string())
                .unwrap_or_else(|| task.title.clone()),
            category: self.category.unwrap_or_else(|| task.category.clone()),
            status: self.status.unwrap_or_else(|| task.status.clone()),
            start_at: self.start_at.unwrap_or(task.start_at),
            end_at: self.end_at.unwrap_or(task.end_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackOrder {
    #[default]
    Input,
    Start,
}

#[derive(Debug, Deserialize)]
pub struct PackRequest {
    pub bars: Vec<Bar<serde_json::Value>>,
    #[serde(default)]
    pub order: PackOrder,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PackResponse {
    pub lanes: u32,
    pub placements: Vec<Placement<serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}
