use crate::board::Board;
use crate::error::LayoutError;
use crate::types::{Coord, Piece, BOARD_SIZE};

/// Board diagram notation.
/// Eight rows, row 0 first, separated by `/` or newlines. Each row has eight
/// cells: `.` for empty, `b`/`w` for men and `B`/`W` for kings.
impl Board {
    /// Parses a board diagram. Pieces go through `place`, so men written on
    /// their promotion row come out crowned.
    pub fn from_diagram(diagram: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = diagram
            .split(['/', '\n'])
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();

        if rows.len() != BOARD_SIZE as usize {
            return Err(LayoutError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (row, cells) in rows.iter().enumerate() {
            let width = cells.chars().count();
            if width != BOARD_SIZE as usize {
                return Err(LayoutError::RowWidth { row, width });
            }
            for (col, c) in cells.chars().enumerate() {
                if c == '.' {
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(LayoutError::InvalidPiece(c))?;
                let at = Coord::new(row as i32, col as i32)?;
                if !at.is_dark() {
                    return Err(LayoutError::LightSquare(at));
                }
                board.place(at, piece)?;
            }
        }

        Ok(board)
    }

    /// Serializes the board as a `/`-separated diagram.
    pub fn to_diagram(&self) -> String {
        let mut out = String::with_capacity(72);
        for at in Coord::all() {
            if at.row() > 0 && at.col() == 0 {
                out.push('/');
            }
            out.push(self.get(at).map_or('.', Piece::to_char));
        }
        out
    }
}

/// Reference positions for tests and demos.
pub mod positions {
    /// Starting position.
    pub const STARTING: &str =
        ".b.b.b.b/b.b.b.b./.b.b.b.b/......../......../w.w.w.w./.w.w.w.w/w.w.w.w.";

    /// Black man on d3 forced through a two-leg chain that ends crowned on h7.
    pub const DOUBLE_JUMP: &str =
        "......../......../......../..b...../...w..../......../.....w../........";

    /// Black man crowned on the first leg, then jumping backwards as a king.
    pub const CROWNING_CHAIN: &str =
        "......../......../......../......../......../..b...../...w.w../........";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn test_parse_starting_position() {
        let board = Board::from_diagram(positions::STARTING).unwrap();
        assert_eq!(board.to_diagram(), Board::starting_position().to_diagram());
        assert_eq!(board.count(Color::Black), 12);
        assert_eq!(board.count(Color::White), 12);
    }

    #[test]
    fn test_round_trip() {
        let board = Board::from_diagram(positions::CROWNING_CHAIN).unwrap();
        assert_eq!(board.to_diagram(), positions::CROWNING_CHAIN);
    }

    #[test]
    fn test_multiline_diagram() {
        let board = Board::from_diagram(
            "
            ........
            ........
            ........
            ....B...
            ........
            ........
            ........
            ........
            ",
        )
        .unwrap();
        assert_eq!(board.positions(Color::Black), &[Coord::new(3, 4).unwrap()]);
        assert!(board.get(Coord::new(3, 4).unwrap()).unwrap().is_king());
    }

    #[test]
    fn test_invalid_diagrams() {
        assert_eq!(
            Board::from_diagram("invalid"),
            Err(LayoutError::RowCount(1))
        );
        assert_eq!(
            Board::from_diagram(".b.b.b.b/b.b.b.b./.b.b.b.b/......../......../w.w.w.w./.w.w.w.w/w.w.w.w"),
            Err(LayoutError::RowWidth { row: 7, width: 7 })
        );
        assert_eq!(
            Board::from_diagram(".x....../......../......../......../......../......../......../........"),
            Err(LayoutError::InvalidPiece('x'))
        );
        assert_eq!(
            Board::from_diagram("b......./......../......../......../......../......../......../........"),
            Err(LayoutError::LightSquare(Coord::new(0, 0).unwrap()))
        );
    }

    #[test]
    fn test_men_on_far_row_are_crowned() {
        let board =
            Board::from_diagram("......../......../......../......../......../......../......../.b......")
                .unwrap();
        assert!(board.get(Coord::new(7, 1).unwrap()).unwrap().is_king());
    }
}
