//! Rectangular obstacle maps built from tiles or text.
//!
//! A [`Map`] is a row-major grid of [`Tile`]s. It is always rectangular:
//! every constructor rejects ragged input, so consumers can index it
//! without re-validating its shape.

use crate::geom::{Point, Range};

/// The content of a single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    /// Navigable floor.
    #[default]
    Empty,
    /// Starting point (navigable).
    Start,
    /// Exit point (navigable).
    Exit,
    /// Obstacle. Never navigable.
    Wall,
}

impl Tile {
    /// Whether a path may pass through this tile.
    #[inline]
    pub fn is_navigable(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    /// Map a text character to a tile.
    ///
    /// `' '` and `'.'` are empty, `'S'` is the start, `'E'` the exit, and
    /// `'X'` or `'#'` a wall.
    pub fn from_char(ch: char) -> Option<Tile> {
        match ch {
            ' ' | '.' => Some(Tile::Empty),
            'S' => Some(Tile::Start),
            'E' => Some(Tile::Exit),
            'X' | '#' => Some(Tile::Wall),
            _ => None,
        }
    }

    /// Canonical text character for this tile.
    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Start => 'S',
            Tile::Exit => 'E',
            Tile::Wall => 'X',
        }
    }
}

/// Errors that can occur when building a map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// A row does not have the same width as the first row.
    #[error("map row {row} has width {found}, expected {expected}")]
    InconsistentWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside the tile alphabet was found.
    #[error("map contains invalid tile {ch:?} at {pos}")]
    InvalidTile { ch: char, pos: Point },
}

/// A rectangular grid of tiles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Map {
    tiles: Vec<Tile>,
    width: usize,
    height: usize,
}

impl Map {
    /// Build a map from rows of tiles. All rows must have the same width.
    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Result<Self, MapError>
    where
        R: AsRef<[Tile]>,
    {
        let mut tiles = Vec::new();
        let mut width = None;
        let mut height = 0;
        for (row, cells) in rows.into_iter().enumerate() {
            let cells = cells.as_ref();
            let expected = *width.get_or_insert(cells.len());
            if cells.len() != expected {
                return Err(MapError::InconsistentWidth {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
            tiles.extend_from_slice(cells);
            height += 1;
        }
        Ok(Self {
            tiles,
            width: width.unwrap_or(0),
            height,
        })
    }

    /// Parse a map from text, one row per line.
    ///
    /// Lines are not trimmed: leading and trailing spaces are empty cells.
    /// A single trailing newline and `\r\n` line endings are accepted.
    pub fn parse(s: &str) -> Result<Self, MapError> {
        let s = s.strip_suffix('\n').unwrap_or(s);
        if s.is_empty() {
            return Ok(Self::default());
        }
        let mut rows = Vec::new();
        for (y, line) in s.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let mut row = Vec::with_capacity(line.len());
            for (x, ch) in line.chars().enumerate() {
                let tile = Tile::from_char(ch).ok_or(MapError::InvalidTile {
                    ch,
                    pos: Point::new(x as i32, y as i32),
                })?;
                row.push(tile);
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The map's bounds, with origin (0, 0).
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Whether the map has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether `p` lies within the map.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    /// The tile at `p`, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: Point) -> Option<Tile> {
        if !self.contains(p) {
            return None;
        }
        Some(self.tiles[p.y as usize * self.width + p.x as usize])
    }

    /// Set the tile at `p`. Out-of-bounds points are ignored.
    pub fn set(&mut self, p: Point, tile: Tile) {
        if self.contains(p) {
            self.tiles[p.y as usize * self.width + p.x as usize] = tile;
        }
    }

    /// Row-major iterator over every cell and its tile.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        self.bounds().iter().zip(self.tiles.iter().copied())
    }

    /// Position of the first tile equal to `tile` in row-major order.
    pub fn find(&self, tile: Tile) -> Option<Point> {
        self.iter().find(|&(_, t)| t == tile).map(|(p, _)| p)
    }
}

impl std::str::FromStr for Map {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.tiles.chunks(self.width.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for tile in row {
                write!(f, "{}", tile.to_char())?;
            }
        }
        Ok(())
    }
}
