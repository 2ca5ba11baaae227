use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::error::GameError;

pub const GRID_SIZE_OPTIONS: [&str; 3] = ["2x2", "2x3", "3x4"];
pub const DEFAULT_GRID_SIZE: GridSize = GridSize { rows: 2, columns: 2 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub rows: u32,
    pub columns: u32,
}

impl GridSize {
    pub fn new(rows: u32, columns: u32) -> Result<Self, GameError> {
        if rows == 0 || columns == 0 {
            return Err(GameError::InvalidGridSize(format!("{rows}x{columns}")));
        }
        Ok(GridSize { rows, columns })
    }

    pub fn card_count(self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn pair_count(self) -> Result<usize, GameError> {
        let cards = self.card_count();
        if cards % 2 != 0 {
            return Err(GameError::OddCardCount {
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(cards / 2)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        DEFAULT_GRID_SIZE
    }
}

impl FromStr for GridSize {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidGridSize(value.to_string());
        let (rows, columns) = value.trim().split_once('x').ok_or_else(invalid)?;
        let dimension = |raw: &str| {
            if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            raw.parse::<u32>().map_err(|_| invalid())
        };
        let rows = dimension(rows)?;
        let columns = dimension(columns)?;
        if rows == 0 || columns == 0 {
            return Err(invalid());
        }
        Ok(GridSize { rows, columns })
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// Delays driving the timer and the two one-shot callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    pub tick: Duration,
    pub flip_back: Duration,
    pub end_message: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            tick: Duration::from_millis(1000),
            flip_back: Duration::from_millis(900),
            end_message: Duration::from_millis(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_offered_option() {
        for option in GRID_SIZE_OPTIONS {
            let grid: GridSize = option.parse().unwrap();
            assert_eq!(grid.to_string(), option);
            assert!(grid.pair_count().is_ok());
        }
    }

    #[test]
    fn rejects_malformed_selections() {
        for raw in [
            "", "3", "x4", "3x", "3X4", "ax2", "0x4", "2x-2", "2x2x2",
            "+2x2", "2x+2", "+2x+2", "2 x2", "2x 2",
        ] {
            assert!(
                matches!(raw.parse::<GridSize>(), Err(GameError::InvalidGridSize(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn odd_grids_have_no_pair_count() {
        let grid = GridSize::new(3, 3).unwrap();
        assert!(matches!(
            grid.pair_count(),
            Err(GameError::OddCardCount { rows: 3, columns: 3 })
        ));
        assert_eq!(GridSize::new(3, 4).unwrap().pair_count().unwrap(), 6);
    }
}
