//! Plotting coordinates onto space-filled character grids.

use crate::coords::Coordinate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Minimal rectangle covering a set of coordinates (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub min_x: u8,
    pub max_x: u8,
    pub min_y: u8,
    pub max_y: u8,
}

impl Bounds {
    /// Bounding box of `coords`, or `None` for an empty slice.
    pub fn of(coords: &[Coordinate]) -> Option<Self> {
        let first = coords.first()?;
        let init = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(coords.iter().fold(init, |b, c| Bounds {
            min_x: b.min_x.min(c.x),
            max_x: b.max_x.max(c.x),
            min_y: b.min_y.min(c.y),
            max_y: b.max_y.max(c.y),
        }))
    }

    pub fn width(&self) -> usize {
        (self.max_x - self.min_x) as usize + 1
    }

    pub fn height(&self) -> usize {
        (self.max_y - self.min_y) as usize + 1
    }
}

/// How a coordinate's `y` maps to a grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Row 0 holds `min_y`.
    Normal,
    /// Row 0 holds `max_y` (vertically mirrored).
    Flipped,
}

impl Orientation {
    /// Grid row for a `y` value, or `None` when `y` lies outside `bounds`.
    pub fn row(self, y: u8, bounds: &Bounds) -> Option<usize> {
        if y < bounds.min_y || y > bounds.max_y {
            return None;
        }
        let row = match self {
            Orientation::Normal => y.checked_sub(bounds.min_y)?,
            Orientation::Flipped => bounds.max_y.checked_sub(y)?,
        };
        Some(row as usize)
    }

    /// Inverse of [`Orientation::row`]: the `y` value a grid row represents.
    pub fn y_for_row(self, row: usize, bounds: &Bounds) -> usize {
        match self {
            Orientation::Normal => bounds.min_y as usize + row,
            Orientation::Flipped => (bounds.max_y as usize).saturating_sub(row),
        }
    }
}

/// A `height x width` block of characters stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Grid {
    /// A grid with every cell set to a space.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Write a cell. Out-of-range positions are ignored and reported as `false`.
    pub fn set(&mut self, row: usize, col: usize, c: char) -> bool {
        if row < self.height && col < self.width {
            self.cells[row * self.width + col] = c;
            true
        } else {
            false
        }
    }

    /// Each row as a string, trailing spaces included.
    pub fn rows(&self) -> Vec<String> {
        if self.width == 0 {
            return vec![String::new(); self.height];
        }
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows().join("\n"))
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

/// Plot `coords` into a fresh grid sized by `bounds`. Later coordinates
/// overwrite earlier ones on the same cell.
pub fn render(coords: &[Coordinate], bounds: &Bounds, orientation: Orientation) -> Grid {
    let mut grid = Grid::blank(bounds.width(), bounds.height());
    for coord in coords {
        let (Some(col), Some(row)) = (
            coord.x.checked_sub(bounds.min_x),
            orientation.row(coord.y, bounds),
        ) else {
            continue;
        };
        grid.set(row, col as usize, coord.marker.glyph());
    }
    grid
}

/// Both orientations of one coordinate collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendering {
    pub bounds: Bounds,
    pub normal: Grid,
    pub flipped: Grid,
}

impl Rendering {
    /// Render both grids, or `None` when there is nothing to display.
    pub fn new(coords: &[Coordinate]) -> Option<Self> {
        let bounds = Bounds::of(coords)?;
        Some(Self {
            bounds,
            normal: render(coords, &bounds, Orientation::Normal),
            flipped: render(coords, &bounds, Orientation::Flipped),
        })
    }

    pub fn grid(&self, orientation: Orientation) -> &Grid {
        match orientation {
            Orientation::Normal => &self.normal,
            Orientation::Flipped => &self.flipped,
        }
    }

    /// The grid with axis labels: a header of column digits and each row
    /// prefixed by its `y` value, both taken modulo 10.
    pub fn labeled(&self, orientation: Orientation) -> String {
        let grid = self.grid(orientation);
        let mut out = String::from("   ");
        for col in 0..grid.width() {
            out.push_str(&((self.bounds.min_x as usize + col) % 10).to_string());
        }
        for (row, line) in grid.rows().iter().enumerate() {
            let y = orientation.y_for_row(row, &self.bounds);
            out.push_str(&format!("\n{}: {}", y % 10, line));
        }
        out
    }
}
