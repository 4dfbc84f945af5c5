use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// True when the two points are orthogonal neighbours.
    pub fn touches(self, other: Coordinate) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Content code of a single grid cell.
///
/// `Wall` is never stored; it is what [`Landscape::query`] reports for
/// coordinates outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Body = 1,
    Apple = 2,
    Wall = 3,
}

impl Cell {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Bounded grid holding the snake body and at most one apple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landscape {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    apple: Option<Coordinate>,
}

impl Landscape {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: i32::from(width),
            height: i32::from(height),
            cells: vec![Cell::Empty; usize::from(width) * usize::from(height)],
            apple: None,
        }
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn in_bounds(&self, c: Coordinate) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    fn index(&self, c: Coordinate) -> Option<usize> {
        self.in_bounds(c).then(|| c.y as usize * self.width as usize + c.x as usize)
    }

    pub fn query(&self, c: Coordinate) -> Cell {
        self.index(c).map_or(Cell::Wall, |i| self.cells[i])
    }

    pub fn apple(&self) -> Option<Coordinate> {
        self.apple
    }

    /// Places the apple if `c` is inside the grid, empty, and no other apple
    /// exists. Returns `false` and leaves the grid untouched otherwise.
    pub fn plant_apple(&mut self, c: Coordinate) -> bool {
        if self.apple.is_some() {
            return false;
        }
        match self.index(c) {
            Some(i) if self.cells[i] == Cell::Empty => {
                self.cells[i] = Cell::Apple;
                self.apple = Some(c);
                true
            }
            _ => false,
        }
    }

    pub fn remove_apple(&mut self) -> Option<Coordinate> {
        let apple = self.apple.take()?;
        if let Some(i) = self.index(apple) {
            self.cells[i] = Cell::Empty;
        }
        Some(apple)
    }

    /// Marks `c` as body. Writing over the apple consumes it.
    pub fn set_body(&mut self, c: Coordinate) {
        let Some(i) = self.index(c) else { return };
        if self.cells[i] == Cell::Apple {
            self.apple = None;
        }
        self.cells[i] = Cell::Body;
    }

    pub fn clear(&mut self, c: Coordinate) {
        let Some(i) = self.index(c) else { return };
        if self.cells[i] == Cell::Apple {
            self.apple = None;
        }
        self.cells[i] = Cell::Empty;
    }

    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Empty).count()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Every stored cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coordinate, Cell)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(i, &cell)| {
            let i = i as i32;
            (Coordinate::new(i % width, i / width), cell)
        })
    }
}

impl fmt::Display for Landscape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1) as usize) {
            for cell in row {
                let ch = match cell {
                    Cell::Empty => '.',
                    Cell::Body => '#',
                    Cell::Apple => '@',
                    Cell::Wall => '|',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
