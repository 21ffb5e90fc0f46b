//! Month grids and per-week task layout.
//!
//! Weeks run Sunday through Saturday. Cells outside the month are `None`, so
//! a task that crosses a month boundary only gets a bar over its in-month
//! days.

use crate::errors::LayoutError;
use crate::lanes::{lane_count, pack_bars, Bar, Placement};
use crate::models::Task;
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

pub const DAYS_PER_WEEK: usize = 7;

/// Day-of-month numbers for one Sunday-first week row.
pub type WeekCells = [Option<u32>; DAYS_PER_WEEK];

#[derive(Debug, Serialize)]
pub struct MonthLayout<'a> {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<WeekLayout<'a>>,
}

#[derive(Debug, Serialize)]
pub struct WeekLayout<'a> {
    pub lanes: u32,
    pub bars: Vec<Placement<&'a Task>>,
    pub days: Vec<DayCell<'a>>,
}

#[derive(Debug, Serialize)]
pub struct DayCell<'a> {
    pub day: Option<u32>,
    pub tasks: Vec<&'a Task>,
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, LayoutError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(LayoutError::InvalidMonth { year, month })
}

pub fn days_in_month(first: NaiveDate) -> u32 {
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        // Only the last representable month lands here; it is a December.
        None => 31,
    }
}

/// The month split into week rows, padded with empty cells on both ends.
pub fn month_grid(year: i32, month: u32) -> Result<Vec<WeekCells>, LayoutError> {
    let first = first_of_month(year, month)?;
    let leading = first.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Option<u32>> = vec![None; leading];
    cells.extend((1..=days_in_month(first)).map(Some));
    while cells.len() % DAYS_PER_WEEK != 0 {
        cells.push(None);
    }

    Ok(cells
        .chunks(DAYS_PER_WEEK)
        .map(|chunk| {
            let mut week: WeekCells = [None; DAYS_PER_WEEK];
            week.copy_from_slice(chunk);
            week
        })
        .collect())
}

/// Packed bars for the multi-day tasks touching this week row.
///
/// Tasks keep the order they are given in.
pub fn week_bars<'a>(
    tasks: &'a [Task],
    year: i32,
    month: u32,
    week: &WeekCells,
) -> Vec<Placement<&'a Task>> {
    let dates: Vec<Option<NaiveDate>> = week
        .iter()
        .map(|day| day.and_then(|day| NaiveDate::from_ymd_opt(year, month, day)))
        .collect();

    let bars = tasks
        .iter()
        .filter(|task| task.is_multi_day())
        .filter_map(|task| {
            let mut covered = dates
                .iter()
                .enumerate()
                .filter(|(_, date)| date.is_some_and(|date| task.covers(date)))
                .map(|(column, _)| column);
            let first = covered.next()?;
            let last = covered.last().unwrap_or(first);
            Some(Bar {
                start_column: first as u8 + 1,
                end_column: last as u8 + 2,
                payload: task,
            })
        });

    pack_bars(bars)
}

/// Tasks that start and end on `date`, in the order given.
pub fn single_day_tasks(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| !task.is_multi_day() && task.start_date() == date)
        .collect()
}

/// Every task whose day range includes `date`, earliest start first.
pub fn tasks_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    let mut found: Vec<&Task> = tasks.iter().filter(|task| task.covers(date)).collect();
    found.sort_by_key(|task| task.start_at);
    found
}

pub fn month_layout(tasks: &[Task], year: i32, month: u32) -> Result<MonthLayout<'_>, LayoutError> {
    let weeks = month_grid(year, month)?
        .iter()
        .map(|week| {
            let bars = week_bars(tasks, year, month, week);
            let days = week
                .iter()
                .map(|&day| DayCell {
                    day,
                    tasks: day
                        .and_then(|day| NaiveDate::from_ymd_opt(year, month, day))
                        .map(|date| single_day_tasks(tasks, date))
                        .unwrap_or_default(),
                })
                .collect();
            WeekLayout {
                lanes: lane_count(&bars),
                bars,
                days,
            }
        })
        .collect();

    Ok(MonthLayout { year, month, weeks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppData, CreateTaskRequest};
    use chrono::NaiveDateTime;

    fn task(id: u64, start: &str, end: &str) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            category: "general".to_string(),
            status: "planned".to_string(),
            start_at: NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M").unwrap(),
            end_at: NaiveDateTime::parse_from_str(end, "%Y-%m-%d %H:%M").unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spans(bars: &[Placement<&Task>]) -> Vec<(u64, u8, u8, u32)> {
        bars.iter()
            .map(|bar| (bar.payload.id, bar.start_column, bar.end_column, bar.lane))
            .collect()
    }

    #[test]
    fn grid_pads_leading_and_trailing_cells() {
        // March 2026 starts on a Sunday and has 31 days.
        let grid = month_grid(2026, 3).unwrap();
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][0], Some(1));
        assert_eq!(grid[4], [Some(29), Some(30), Some(31), None, None, None, None]);

        // August 2026 starts on a Saturday.
        let grid = month_grid(2026, 8).unwrap();
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0], [None, None, None, None, None, None, Some(1)]);
        assert_eq!(grid[5][1], Some(31));
    }

    #[test]
    fn grid_handles_february_lengths() {
        // February 2026 starts on Sunday: exactly four full weeks.
        let grid = month_grid(2026, 2).unwrap();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[3][6], Some(28));

        let leap = month_grid(2028, 2).unwrap();
        let days: Vec<u32> = leap.iter().flatten().flatten().copied().collect();
        assert_eq!(days.last(), Some(&29));
    }

    #[test]
    fn grid_rejects_invalid_month() {
        assert_eq!(
            month_grid(2026, 13),
            Err(LayoutError::InvalidMonth { year: 2026, month: 13 })
        );
        assert!(first_of_month(2026, 0).is_err());
    }

    #[test]
    fn bars_span_covered_columns() {
        let tasks = vec![task(1, "2026-03-03 09:00", "2026-03-05 18:00")];
        let grid = month_grid(2026, 3).unwrap();

        // Tue 3 .. Thu 5 are cells 2..=4 of the first week.
        let bars = week_bars(&tasks, 2026, 3, &grid[0]);
        assert_eq!(spans(&bars), vec![(1, 3, 6, 1)]);
        assert!(week_bars(&tasks, 2026, 3, &grid[1]).is_empty());
    }

    #[test]
    fn bars_split_across_week_rows() {
        // Fri 6 .. Tue 10 crosses from week one into week two.
        let tasks = vec![task(1, "2026-03-06 10:00", "2026-03-10 10:00")];
        let grid = month_grid(2026, 3).unwrap();

        assert_eq!(spans(&week_bars(&tasks, 2026, 3, &grid[0])), vec![(1, 6, 8, 1)]);
        assert_eq!(spans(&week_bars(&tasks, 2026, 3, &grid[1])), vec![(1, 1, 4, 1)]);
    }

    #[test]
    fn bars_clip_to_days_inside_the_month() {
        // Starts in July; August 2026 has six empty leading cells.
        let tasks = vec![task(1, "2026-07-29 08:00", "2026-08-02 08:00")];
        let grid = month_grid(2026, 8).unwrap();

        assert_eq!(spans(&week_bars(&tasks, 2026, 8, &grid[0])), vec![(1, 7, 8, 1)]);
        assert_eq!(spans(&week_bars(&tasks, 2026, 8, &grid[1])), vec![(1, 1, 2, 1)]);
    }

    #[test]
    fn overlapping_tasks_stack_in_given_order() {
        let tasks = vec![
            task(1, "2026-03-01 09:00", "2026-03-04 09:00"),
            task(2, "2026-03-02 09:00", "2026-03-05 09:00"),
            task(3, "2026-03-04 09:00", "2026-03-06 09:00"),
            task(4, "2026-03-02 09:00", "2026-03-02 10:00"),
        ];
        let grid = month_grid(2026, 3).unwrap();
        let bars = week_bars(&tasks, 2026, 3, &grid[0]);

        assert_eq!(
            spans(&bars),
            vec![(1, 1, 5, 1), (2, 2, 6, 2), (3, 4, 7, 3)]
        );
    }

    #[test]
    fn single_day_tasks_skip_multi_day_ones() {
        let tasks = vec![
            task(1, "2026-03-02 18:00", "2026-03-02 19:00"),
            task(2, "2026-03-02 09:00", "2026-03-03 09:00"),
            task(3, "2026-03-02 07:00", "2026-03-02 08:00"),
            task(4, "2026-03-03 07:00", "2026-03-03 08:00"),
        ];
        let ids: Vec<u64> = single_day_tasks(&tasks, date(2026, 3, 2))
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn tasks_on_includes_spanning_tasks_sorted_by_start() {
        let tasks = vec![
            task(1, "2026-03-02 18:00", "2026-03-02 19:00"),
            task(2, "2026-02-27 09:00", "2026-03-03 09:00"),
            task(3, "2026-03-02 07:00", "2026-03-02 08:00"),
            task(4, "2026-03-03 07:00", "2026-03-03 08:00"),
        ];
        let ids: Vec<u64> = tasks_on(&tasks, date(2026, 3, 2)).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn stored_tasks_pack_in_start_order() {
        // Columns (2,4) (5,7) (4,6) (1,3) (3,5) of the first March 2026 week,
        // stored out of chronological order.
        let mut data = AppData::default();
        for (start, end) in [(2, 3), (5, 6), (4, 5), (1, 2), (3, 4)] {
            data.insert(CreateTaskRequest {
                title: format!("march {start}"),
                category: None,
                status: None,
                start_at: date(2026, 3, start).and_hms_opt(9, 0, 0).unwrap(),
                end_at: date(2026, 3, end).and_hms_opt(18, 0, 0).unwrap(),
            });
        }

        let stored = month_layout(&data.tasks, 2026, 3).unwrap();
        assert_eq!(stored.weeks[0].lanes, 3);

        let tasks = data.tasks_by_start();
        let layout = month_layout(&tasks, 2026, 3).unwrap();
        let week = &layout.weeks[0];
        assert_eq!(week.lanes, 2);
        assert_eq!(
            spans(&week.bars),
            vec![(4, 1, 3, 1), (1, 2, 4, 2), (5, 3, 5, 1), (3, 4, 6, 2), (2, 5, 7, 1)]
        );
    }

    #[test]
    fn month_layout_combines_bars_and_day_cells() {
        let tasks = vec![
            task(1, "2026-03-09 09:00", "2026-03-11 09:00"),
            task(2, "2026-03-10 09:00", "2026-03-12 09:00"),
            task(3, "2026-03-10 12:00", "2026-03-10 13:00"),
        ];
        let layout = month_layout(&tasks, 2026, 3).unwrap();

        assert_eq!(layout.weeks.len(), 5);
        assert_eq!(layout.weeks[0].lanes, 0);

        let second = &layout.weeks[1];
        assert_eq!(second.lanes, 2);
        assert_eq!(second.days.len(), 7);
        assert_eq!(second.days[2].day, Some(10));
        let ids: Vec<u64> = second.days[2].tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3]);

        let trailing = &layout.weeks[4].days[6];
        assert_eq!(trailing.day, None);
        assert!(trailing.tasks.is_empty());
    }
}
