//! Scoring module - row-clear points and the score-driven gravity rule
//!
//! Points only come from clearing rows, using the classic table without level
//! multipliers. Gravity grows linearly with the score and is capped.

use crate::types::{INITIAL_SPEED, LINE_SCORES, MAX_SPEED, SPEED_SCALE};

/// Points for clearing `rows` rows at once; 0 outside 1..=4
pub fn line_clear_points(rows: usize) -> u32 {
    if rows == 0 || rows >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[rows]
}

/// Gravity in moves per second for a given score
pub fn gravity_rate_for(points: u32) -> f64 {
    (INITIAL_SPEED + points as f64 * SPEED_SCALE).min(MAX_SPEED)
}

/// Running point total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    points: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// Award the points for a simultaneous clear of `rows` rows.
    /// Returns the award (0 for counts outside the table).
    pub fn rows_completed(&mut self, rows: usize) -> u32 {
        let award = line_clear_points(rows);
        self.points = self.points.saturating_add(award);
        award
    }
}
