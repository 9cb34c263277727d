use checkers_core::{Board, Color, Coord, Move, BOARD_SIZE};
use crossterm::{
    queue,
    style::{Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use std::io::{self, Write};

/// Prints the board as a grid with row letters down the side and column
/// numbers across the top. Cells in `highlight` are drawn in yellow.
pub fn draw_board(out: &mut impl Write, board: &Board, highlight: &[Coord]) -> io::Result<()> {
    let size = BOARD_SIZE as usize;
    let rule = format!("  {}+", "+---".repeat(size));

    queue!(out, Print("   "))?;
    for col in 1..=size {
        queue!(out, Print(format!(" {col}  ")))?;
    }
    queue!(out, Print("\n"), Print(&rule), Print("\n"))?;

    for at in Coord::all() {
        if at.col() == 0 {
            queue!(out, Print(format!("{} |", (b'a' + at.row()) as char)))?;
        }

        queue!(out, Print(" "))?;
        match board.get(at) {
            Some(piece) => {
                let color = if highlight.contains(&at) {
                    TermColor::Yellow
                } else {
                    match piece.color {
                        Color::Black => TermColor::Red,
                        Color::White => TermColor::White,
                    }
                };
                queue!(out, SetForegroundColor(color))?;
                if piece.is_king() {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                queue!(
                    out,
                    Print(piece.to_char()),
                    SetAttribute(Attribute::Reset),
                    ResetColor
                )?;
            }
            None if highlight.contains(&at) => {
                queue!(out, SetForegroundColor(TermColor::Yellow), Print('*'), ResetColor)?;
            }
            None => queue!(out, Print(' '))?,
        }
        queue!(out, Print(" |"))?;

        if at.col() == BOARD_SIZE - 1 {
            queue!(out, Print("\n"), Print(&rule), Print("\n"))?;
        }
    }

    out.flush()
}

/// Board followed by a side-to-move line and piece counts.
pub fn draw_position(
    out: &mut impl Write,
    board: &Board,
    turn: Color,
    last: Option<&Move>,
) -> io::Result<()> {
    let highlight: Vec<Coord> = last.map(|mv| mv.path().to_vec()).unwrap_or_default();
    draw_board(out, board, &highlight)?;
    writeln!(
        out,
        "{} to move | Black {} ({} kings) | White {} ({} kings)",
        turn,
        board.count(Color::Black),
        board.kings(Color::Black),
        board.count(Color::White),
        board.kings(Color::White),
    )?;
    if let Some(mv) = last {
        writeln!(out, "Last move: {mv}")?;
    }
    out.flush()
}
