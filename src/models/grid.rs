//! Weekly time grid.
//!
//! A school week is a small fixed grid: a handful of weekdays, each with
//! a per-day period cap. Periods are 1-based to match how schools number
//! them; days are 0-based indices into the week.

use serde::{Deserialize, Serialize};

/// One (day, period) position in the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Weekday index (0 = first teaching day).
    pub day: u8,
    /// Period number, 1-based.
    pub period: u8,
}

impl Cell {
    /// Creates a cell.
    pub fn new(day: u8, period: u8) -> Self {
        Self { day, period }
    }
}

/// The weekly grid: weekday count and per-day period caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGrid {
    daily_periods: Vec<u8>,
}

impl TimeGrid {
    /// Creates a grid from per-day period caps.
    ///
    /// Empty input falls back to the standard week.
    pub fn new(daily_periods: Vec<u8>) -> Self {
        if daily_periods.is_empty() {
            Self::standard_week()
        } else {
            Self { daily_periods }
        }
    }

    /// The standard 5-day, 7-period week.
    pub fn standard_week() -> Self {
        Self {
            daily_periods: vec![7; 5],
        }
    }

    /// Number of teaching days.
    pub fn days(&self) -> u8 {
        self.daily_periods.len() as u8
    }

    /// Period cap for a day (0 when out of range).
    pub fn periods_on(&self, day: u8) -> u8 {
        self.daily_periods.get(day as usize).copied().unwrap_or(0)
    }

    /// The largest per-day period cap.
    pub fn max_periods(&self) -> u8 {
        self.daily_periods.iter().copied().max().unwrap_or(0)
    }

    /// Whether a cell lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.period >= 1 && cell.period <= self.periods_on(cell.day)
    }

    /// Total teachable periods per week.
    pub fn weekly_periods(&self) -> u32 {
        self.daily_periods.iter().map(|&p| p as u32).sum()
    }

    /// All cells in day-major order.
    pub fn cells(&self) -> Vec<Cell> {
        let mut out = Vec::with_capacity(self.weekly_periods() as usize);
        for day in 0..self.days() {
            for period in 1..=self.periods_on(day) {
                out.push(Cell::new(day, period));
            }
        }
        out
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self::standard_week()
    }
}
