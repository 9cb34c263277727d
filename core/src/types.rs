use crate::error::BoardError;
use std::fmt;

/// Side length of the board.
pub const BOARD_SIZE: u8 = 8;

/// Represents one of the two players in checkers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Returns the opposite color.
    pub const fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Returns the row delta of a forward step for men of this color.
    pub const fn forward(self) -> i8 {
        match self {
            Color::Black => 1,
            Color::White => -1,
        }
    }

    /// Returns the row on which men of this color are crowned.
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::Black => BOARD_SIZE - 1,
            Color::White => 0,
        }
    }

    /// Returns the row men of this color start furthest back on.
    pub const fn home_row(self) -> u8 {
        match self {
            Color::Black => 0,
            Color::White => BOARD_SIZE - 1,
        }
    }

    /// Canonical scan order: the two forward diagonals, then the two backward ones.
    pub const fn directions(self) -> [Step; 4] {
        let f = self.forward();
        [
            Step::new(f, -1),
            Step::new(f, 1),
            Step::new(-f, -1),
            Step::new(-f, 1),
        ]
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

/// A checkers piece: a man or a king of one color.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Piece {
    pub color: Color,
    pub king: bool,
}

impl Piece {
    /// Creates an uncrowned piece.
    pub const fn man(color: Color) -> Self {
        Self { color, king: false }
    }

    /// Creates a crowned piece.
    pub const fn king(color: Color) -> Self {
        Self { color, king: true }
    }

    pub const fn is_king(self) -> bool {
        self.king
    }

    /// Returns the piece as it stands on `row`: men reaching their promotion
    /// row are crowned, kings stay kings.
    pub const fn crowned_on(self, row: u8) -> Self {
        if row == self.color.promotion_row() {
            Self::king(self.color)
        } else {
            self
        }
    }

    /// Diagram character: lowercase for men, uppercase for kings.
    pub const fn to_char(self) -> char {
        match (self.color, self.king) {
            (Color::Black, false) => 'b',
            (Color::Black, true) => 'B',
            (Color::White, false) => 'w',
            (Color::White, true) => 'W',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'b' => Some(Self::man(Color::Black)),
            'B' => Some(Self::king(Color::Black)),
            'w' => Some(Self::man(Color::White)),
            'W' => Some(Self::king(Color::White)),
            _ => None,
        }
    }
}

/// A diagonal displacement, either a single step or a two-cell jump.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Step {
    pub rows: i8,
    pub cols: i8,
}

impl Step {
    pub const fn new(rows: i8, cols: i8) -> Self {
        Self { rows, cols }
    }

    /// Returns this step scaled to a jump over the adjacent cell.
    pub const fn doubled(self) -> Self {
        Self::new(self.rows * 2, self.cols * 2)
    }

    /// Returns true for a two-cell jump.
    pub const fn is_jump(self) -> bool {
        self.rows.abs() == 2 && self.cols.abs() == 2
    }
}

/// A cell of the 8x8 grid.
/// Using a newtype with validated fields ensures every coordinate is on the board.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Creates a coordinate, failing if either index lies outside `0..8`.
    pub fn new(row: i32, col: i32) -> Result<Self, BoardError> {
        let range = 0..i32::from(BOARD_SIZE);
        if range.contains(&row) && range.contains(&col) {
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(BoardError::InvalidCoordinate { row, col })
        }
    }

    /// Builds a coordinate from indices already known to be in range.
    pub(crate) const fn new_unchecked(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Self { row, col }
    }

    /// Every cell of the board in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Self::new_unchecked(row, col)))
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the cell reached by `step`, if it is on the board.
    pub fn offset(self, step: Step) -> Option<Self> {
        Self::new(
            i32::from(self.row) + i32::from(step.rows),
            i32::from(self.col) + i32::from(step.cols),
        )
        .ok()
    }

    /// Returns the displacement from `self` to `other`.
    pub fn step_to(self, other: Coord) -> Step {
        Step::new(
            other.row as i8 - self.row as i8,
            other.col as i8 - self.col as i8,
        )
    }

    /// Returns the cell halfway between two cells a jump apart.
    pub const fn midpoint(self, other: Coord) -> Coord {
        Coord {
            row: (self.row + other.row) / 2,
            col: (self.col + other.col) / 2,
        }
    }

    /// Dark squares are the playable ones.
    pub const fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// Squared Euclidean distance to another cell.
    pub const fn distance_squared(self, other: Coord) -> u32 {
        let dr = self.row.abs_diff(other.row) as u32;
        let dc = self.col.abs_diff(other.col) as u32;
        dr * dr + dc * dc
    }

    /// Parses notation such as `c2`: row letter `a`-`h`, then 1-based column.
    pub fn from_notation(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let row = chars.next()?.to_ascii_lowercase();
        let col = chars.next()?.to_digit(10)?;
        if chars.next().is_some() || !row.is_ascii_lowercase() || col == 0 {
            return None;
        }
        Self::new(i32::from(row as u8 - b'a'), col as i32 - 1).ok()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.row) as char, self.col + 1)
    }
}

/// A move: the origin cell followed by every cell the piece lands on.
/// A two-cell path with a single step is a simple move; every jump leg
/// removes the piece it passes over.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    path: Vec<Coord>,
}

impl Move {
    /// Builds a move from a path. Returns None for paths shorter than two cells.
    pub fn from_path(path: Vec<Coord>) -> Option<Self> {
        (path.len() >= 2).then_some(Self { path })
    }

    pub fn simple(from: Coord, to: Coord) -> Self {
        Self {
            path: vec![from, to],
        }
    }

    pub fn from(&self) -> Coord {
        self.path[0]
    }

    pub fn to(&self) -> Coord {
        self.path[self.path.len() - 1]
    }

    pub fn path(&self) -> &[Coord] {
        &self.path
    }

    /// Number of hops in the move.
    pub fn legs(&self) -> usize {
        self.path.len() - 1
    }

    pub fn is_capture(&self) -> bool {
        self.path[0].step_to(self.path[1]).is_jump()
    }

    /// Cells of the pieces removed by this move, in jump order.
    pub fn captured(&self) -> impl Iterator<Item = Coord> + '_ {
        self.path
            .windows(2)
            .filter(|w| w[0].step_to(w[1]).is_jump())
            .map(|w| w[0].midpoint(w[1]))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_capture() { "x" } else { "-" };
        for (i, cell) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{cell}")?;
        }
        Ok(())
    }
}
