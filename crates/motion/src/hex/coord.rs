use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

const SQRT_3: f32 = 1.732_050_8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CoordError {
    #[error("hecs `a` component must be 0 or 1, got {0}")]
    InvalidA(i32),
}

/// Hexagonal Efficient Coordinate System point on a pointy-top grid.
///
/// `a` selects one of the two interleaved rectangular arrays, `r` and `c`
/// are the row and column within it. `a` is always 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawHecsCoord")]
pub struct HecsCoord {
    a: i32,
    r: i32,
    c: i32,
}

#[derive(Deserialize)]
struct RawHecsCoord {
    a: i32,
    r: i32,
    c: i32,
}

impl TryFrom<RawHecsCoord> for HecsCoord {
    type Error = CoordError;

    fn try_from(raw: RawHecsCoord) -> Result<Self, Self::Error> {
        Self::try_new(raw.a, raw.r, raw.c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexDirection {
    UpRight,
    Right,
    DownRight,
    DownLeft,
    Left,
    UpLeft,
}

impl HexDirection {
    /// Clockwise, starting at the edge a heading of 0 points through.
    pub const ALL: [HexDirection; 6] = [
        Self::UpRight,
        Self::Right,
        Self::DownRight,
        Self::DownLeft,
        Self::Left,
        Self::UpLeft,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// Every 60° sector of heading maps onto one edge. Headings outside
    /// `[0, 360)` wrap in both directions.
    pub fn from_heading(heading_degrees: f32) -> Self {
        let sector = (heading_degrees / 60.0).floor() as i64;
        Self::from_index(sector.rem_euclid(6) as usize)
    }

    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub fn displacement(self) -> HecsCoord {
        HecsCoord::ORIGIN.neighbor(self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpRight => "UP_RIGHT",
            Self::Right => "RIGHT",
            Self::DownRight => "DOWN_RIGHT",
            Self::DownLeft => "DOWN_LEFT",
            Self::Left => "LEFT",
            Self::UpLeft => "UP_LEFT",
        }
    }
}

impl fmt::Display for HexDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HecsCoord {
    pub const ORIGIN: Self = Self { a: 0, r: 0, c: 0 };

    /// Only the low bit of `a` is kept.
    pub const fn new(a: i32, r: i32, c: i32) -> Self {
        Self { a: a & 1, r, c }
    }

    pub fn try_new(a: i32, r: i32, c: i32) -> Result<Self, CoordError> {
        if a == 0 || a == 1 {
            Ok(Self { a, r, c })
        } else {
            Err(CoordError::InvalidA(a))
        }
    }

    pub fn a(&self) -> i32 {
        self.a
    }

    pub fn r(&self) -> i32 {
        self.r
    }

    pub fn c(&self) -> i32 {
        self.c
    }

    /// "odd-r" offset layout: odd rows are shifted half a cell right.
    pub fn from_offset_coordinates(row: i32, col: i32) -> Self {
        Self::new(row.rem_euclid(2), row.div_euclid(2), col)
    }

    /// Returns `(row, col)`.
    pub fn to_offset_coordinates(&self) -> (i32, i32) {
        (2 * self.r + self.a, self.c)
    }

    pub fn up_right(&self) -> Self {
        Self::new(1 - self.a, self.r - (1 - self.a), self.c + self.a)
    }

    pub fn right(&self) -> Self {
        Self::new(self.a, self.r, self.c + 1)
    }

    pub fn down_right(&self) -> Self {
        Self::new(1 - self.a, self.r + self.a, self.c + self.a)
    }

    pub fn down_left(&self) -> Self {
        Self::new(1 - self.a, self.r + self.a, self.c - (1 - self.a))
    }

    pub fn left(&self) -> Self {
        Self::new(self.a, self.r, self.c - 1)
    }

    pub fn up_left(&self) -> Self {
        Self::new(1 - self.a, self.r - (1 - self.a), self.c - (1 - self.a))
    }

    pub fn neighbor(&self, direction: HexDirection) -> Self {
        match direction {
            HexDirection::UpRight => self.up_right(),
            HexDirection::Right => self.right(),
            HexDirection::DownRight => self.down_right(),
            HexDirection::DownLeft => self.down_left(),
            HexDirection::Left => self.left(),
            HexDirection::UpLeft => self.up_left(),
        }
    }

    pub fn neighbors(&self) -> [Self; 6] {
        HexDirection::ALL.map(|direction| self.neighbor(direction))
    }

    pub fn neighbor_at_heading(&self, heading_degrees: f32) -> Self {
        self.neighbor(HexDirection::from_heading(heading_degrees))
    }

    /// Direction from `self` to `other`, or `None` when they are not adjacent.
    pub fn direction_of(&self, other: Self) -> Option<HexDirection> {
        let displacement = other - *self;
        HexDirection::ALL
            .into_iter()
            .find(|direction| direction.displacement() == displacement)
    }

    pub fn is_adjacent_to(&self, other: Self) -> bool {
        self.direction_of(other).is_some()
    }

    /// Planar projection `(x, y)` with unit spacing between neighbors. The
    /// vertical axis is supplied separately by the caller.
    pub fn cartesian(&self) -> (f32, f32) {
        let a = self.a as f32;
        (
            0.5 * a + self.c as f32,
            -(SQRT_3 / 2.0) * a - SQRT_3 * self.r as f32,
        )
    }

    /// `cols` coordinates heading right from `origin`, all on one row.
    pub fn range_1d(origin: Self, cols: usize) -> Vec<Self> {
        std::iter::successors(Some(origin), |coord| Some(coord.right()))
            .take(cols)
            .collect()
    }

    /// A `rows` x `cols` block laid out like offset coordinates, so
    /// `range_2d(ORIGIN, ..)[row][col] == from_offset_coordinates(row, col)`.
    pub fn range_2d(origin: Self, rows: usize, cols: usize) -> Vec<Vec<Self>> {
        let mut grid = Vec::with_capacity(rows);
        let mut start = origin;
        for row in 0..rows {
            grid.push(Self::range_1d(start, cols));
            start = if row % 2 == 0 {
                start.down_right()
            } else {
                start.down_left()
            };
        }
        grid
    }
}

impl Add for HecsCoord {
    type Output = HecsCoord;

    fn add(self, rhs: HecsCoord) -> Self::Output {
        let carry = self.a & rhs.a;
        Self::new(self.a ^ rhs.a, self.r + rhs.r + carry, self.c + rhs.c + carry)
    }
}

impl Neg for HecsCoord {
    type Output = HecsCoord;

    fn neg(self) -> Self::Output {
        Self::new(self.a, -self.r - self.a, -self.c - self.a)
    }
}

impl Sub for HecsCoord {
    type Output = HecsCoord;

    fn sub(self, rhs: HecsCoord) -> Self::Output {
        self + -rhs
    }
}

impl fmt::Display for HecsCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:02}, {:02}, {:02})", self.a, self.r, self.c)
    }
}
