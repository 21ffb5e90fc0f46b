//! Lane packing for multi-day calendar bars.
//!
//! A week row has seven day cells addressed by grid columns `1..=7`, with `8`
//! as the past-the-end column. A bar covers `[start_column, end_column)`.
//! Packing assigns each bar the lowest lane (`1`-based) where it does not
//! collide with a bar already placed, in a single greedy pass.

use crate::errors::LayoutError;
use serde::{Deserialize, Serialize};

pub const FIRST_COLUMN: u8 = 1;
pub const END_COLUMN: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar<T> {
    pub start_column: u8,
    pub end_column: u8,
    pub payload: T,
}

impl<T> Bar<T> {
    /// Builds a bar, rejecting empty spans and columns outside the week grid.
    pub fn new(start_column: u8, end_column: u8, payload: T) -> Result<Self, LayoutError> {
        if start_column >= end_column {
            return Err(LayoutError::EmptyBar {
                start: start_column,
                end: end_column,
            });
        }
        if start_column < FIRST_COLUMN || end_column > END_COLUMN {
            return Err(LayoutError::ColumnOutOfRange {
                start: start_column,
                end: end_column,
            });
        }

        Ok(Self {
            start_column,
            end_column,
            payload,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement<T> {
    pub start_column: u8,
    pub end_column: u8,
    pub payload: T,
    pub lane: u32,
}

impl<T> Placement<T> {
    fn new(bar: Bar<T>, lane: u32) -> Self {
        Self {
            start_column: bar.start_column,
            end_column: bar.end_column,
            payload: bar.payload,
            lane,
        }
    }

    /// Drops the lane, giving back the bar that was packed.
    pub fn into_bar(self) -> Bar<T> {
        Bar {
            start_column: self.start_column,
            end_column: self.end_column,
            payload: self.payload,
        }
    }
}

/// Half-open column ranges `[a_start, a_end)` and `[b_start, b_end)` share a column.
pub fn columns_overlap(a_start: u8, a_end: u8, b_start: u8, b_end: u8) -> bool {
    a_start < b_end && a_end > b_start
}

/// Columns already claimed in each lane.
#[derive(Debug, Default)]
struct Occupancy {
    spans: Vec<(u8, u8, u32)>,
}

impl Occupancy {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            spans: Vec::with_capacity(capacity),
        }
    }

    fn place(&mut self, start: u8, end: u8) -> u32 {
        let mut lane = 1;
        while self
            .spans
            .iter()
            .any(|&(s, e, l)| l == lane && columns_overlap(s, e, start, end))
        {
            lane += 1;
        }
        self.spans.push((start, end, lane));
        lane
    }
}

/// Greedy first-fit packing in caller order.
///
/// Bars are not re-sorted, so the lane count depends on the order they arrive
/// in. Use [`pack_bars_by_start`] to pack in start-column order instead.
pub fn pack_bars<T>(bars: impl IntoIterator<Item = Bar<T>>) -> Vec<Placement<T>> {
    let bars = bars.into_iter();
    let mut occupancy = Occupancy::with_capacity(bars.size_hint().0);
    bars.map(|bar| {
        let lane = occupancy.place(bar.start_column, bar.end_column);
        Placement::new(bar, lane)
    })
    .collect()
}

/// First-fit packing over bars stably sorted by start column.
///
/// Placements come back in the caller's original order.
pub fn pack_bars_by_start<T>(bars: impl IntoIterator<Item = Bar<T>>) -> Vec<Placement<T>> {
    let mut indexed: Vec<(usize, Bar<T>)> = bars.into_iter().enumerate().collect();
    indexed.sort_by_key(|(_, bar)| bar.start_column);

    let mut occupancy = Occupancy::with_capacity(indexed.len());
    let mut placed: Vec<(usize, Placement<T>)> = indexed
        .into_iter()
        .map(|(index, bar)| {
            let lane = occupancy.place(bar.start_column, bar.end_column);
            (index, Placement::new(bar, lane))
        })
        .collect();

    placed.sort_by_key(|(index, _)| *index);
    placed.into_iter().map(|(_, placement)| placement).collect()
}

/// Highest lane in use, or 0 when nothing was placed.
pub fn lane_count<T>(placements: &[Placement<T>]) -> u32 {
    placements.iter().map(|p| p.lane).max().unwrap_or(0)
}
