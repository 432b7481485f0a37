use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// The eight lines that end the game when uniformly marked, scanned in this
/// order: rows, then columns, then diagonals.
pub const WINNING_TRIPLES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A symbol identifying one player's cells.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum Marker {
    X,
    O,
}

impl Marker {
    /// The marker of the other player.
    pub const fn opponent(self) -> Marker {
        match self {
            Marker::X => Marker::O,
            Marker::O => Marker::X,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Marker::X => 'X',
            Marker::O => 'O',
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Marker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "X" | "x" => Ok(Marker::X),
            "O" | "o" => Ok(Marker::O),
            other => Err(Error::InvalidMarker {
                input: other.to_string(),
            }),
        }
    }
}

/// Derived end-of-game state, recomputed by [`Board::is_game_over`].
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum Winner {
    /// A winning triple is uniformly marked with this marker.
    Marker(Marker),
    /// No triple is complete and no cell is empty.
    Draw,
}

/// The 3x3 grid, the order in which its cells were filled, and the cached
/// winner.
///
/// Cells are indexed 0..8 in row-major order. The move history is the only
/// way to undo a move and always lists exactly the occupied cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Option<Marker>; CELL_COUNT],
    history: Vec<usize>,
    winner: Option<Winner>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Option<Marker>; CELL_COUNT] {
        &self.cells
    }

    /// Returns the content of a cell, or `None` when it is empty or out of range.
    pub fn cell(&self, position: usize) -> Option<Marker> {
        self.cells.get(position).copied().flatten()
    }

    /// Positions in the order they were filled.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// The winner found by the latest [`Board::is_game_over`] call, if any.
    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn is_available(&self, position: usize) -> bool {
        position < CELL_COUNT && self.cells[position].is_none()
    }

    /// All empty positions in ascending order.
    ///
    /// The order defines move enumeration in search and therefore its
    /// tie-break between equally scored moves.
    pub fn available_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// The marker whose turn it is, assuming X moved first.
    pub fn next_marker(&self) -> Marker {
        let x_count = self.cells.iter().filter(|c| **c == Some(Marker::X)).count();
        let o_count = self.cells.iter().filter(|c| **c == Some(Marker::O)).count();
        if x_count > o_count {
            Marker::O
        } else {
            Marker::X
        }
    }

    /// Places `marker` on `position` and records the move.
    ///
    /// The caller guarantees the position is empty. Marking an occupied or
    /// out-of-range cell is a bug and panics.
    pub fn mark(&mut self, marker: Marker, position: usize) {
        if !self.is_available(position) {
            panic!("BUG: marking unavailable position {position}");
        }
        self.cells[position] = Some(marker);
        self.history.push(position);
    }

    /// Checked variant of [`Board::mark`] for untrusted positions.
    pub fn try_mark(&mut self, marker: Marker, position: usize) -> Result<()> {
        if position >= CELL_COUNT {
            return Err(Error::InvalidPosition { position });
        }
        if self.cells[position].is_some() {
            return Err(Error::OccupiedPosition { position });
        }
        self.mark(marker, position);
        Ok(())
    }

    /// Undoes the most recent move and clears the cached winner.
    ///
    /// Returns the freed position. Panics when no move has been made.
    pub fn revert_last_move(&mut self) -> usize {
        let Some(position) = self.history.pop() else {
            panic!("BUG: reverting a move on a board without history");
        };
        self.cells[position] = None;
        self.winner = None;
        position
    }

    /// Checks whether the game has ended and records the winner.
    ///
    /// The first uniformly marked triple in [`WINNING_TRIPLES`] order decides
    /// the winner; a full board without one is a draw.
    pub fn is_game_over(&mut self) -> bool {
        for [a, b, c] in WINNING_TRIPLES {
            if let Some(marker) = self.cells[a] {
                if self.cells[b] == Some(marker) && self.cells[c] == Some(marker) {
                    self.winner = Some(Winner::Marker(marker));
                    return true;
                }
            }
        }

        if self.cells.iter().all(Option::is_some) {
            self.winner = Some(Winner::Draw);
            return true;
        }

        false
    }
}

impl fmt::Display for Board {
    /// Renders the grid with empty cells showing their index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            let cells: Vec<String> = (row * 3..row * 3 + 3)
                .map(|i| match self.cells[i] {
                    Some(marker) => marker.to_string(),
                    None => i.to_string(),
                })
                .collect();
            writeln!(f, " {} | {} | {} ", cells[0], cells[1], cells[2])?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parses nine cells of `X`, `O` or an empty mark (`-`, `.`, `_` or a
    /// digit). Whitespace and `|` separators are ignored. Occupied cells are
    /// recorded in ascending index order.
    fn from_str(s: &str) -> Result<Self> {
        let mut cells = Vec::with_capacity(CELL_COUNT);
        for character in s.chars() {
            if character.is_whitespace() || character == '|' {
                continue;
            }
            let cell = match character {
                'X' | 'x' => Some(Marker::X),
                'O' | 'o' => Some(Marker::O),
                '-' | '.' | '_' => None,
                c if c.is_ascii_digit() => None,
                c => {
                    return Err(Error::InvalidCellCharacter {
                        character: c,
                        context: s.to_string(),
                    });
                }
            };
            cells.push(cell);
        }

        if cells.len() != CELL_COUNT {
            return Err(Error::InvalidBoardLength {
                got: cells.len(),
                context: s.to_string(),
            });
        }

        let mut board = Board::new();
        for (position, cell) in cells.into_iter().enumerate() {
            if let Some(marker) = cell {
                board.mark(marker, position);
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_positions_are_ascending() {
        // arrange
        let mut board = Board::new();
        board.mark(Marker::X, 4);
        board.mark(Marker::O, 0);

        // act
        let available = board.available_positions();

        // assert
        assert_eq!(available, vec![1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn mark_then_revert_restores_board() {
        // arrange
        let mut board: Board = "XO- -X- ---".parse().unwrap();
        let before = board.clone();

        // act
        board.mark(Marker::O, 8);
        board.is_game_over();
        let freed = board.revert_last_move();

        // assert
        assert_eq!(freed, 8);
        assert_eq!(board, before);
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn revert_clears_detected_win() {
        // arrange
        let mut board: Board = "XX- OO- ---".parse().unwrap();
        board.mark(Marker::X, 2);
        assert!(board.is_game_over());
        assert_eq!(board.winner(), Some(Winner::Marker(Marker::X)));

        // act
        board.revert_last_move();

        // assert
        assert_eq!(board.winner(), None);
        assert!(!board.is_game_over());
    }

    #[test]
    #[should_panic(expected = "BUG")]
    fn revert_on_empty_history_panics() {
        let mut board = Board::new();
        board.revert_last_move();
    }

    #[test]
    #[should_panic(expected = "BUG")]
    fn marking_occupied_cell_panics() {
        let mut board = Board::new();
        board.mark(Marker::X, 3);
        board.mark(Marker::O, 3);
    }

    #[test]
    fn try_mark_rejects_bad_positions() {
        let mut board = Board::new();
        board.mark(Marker::X, 0);

        assert!(matches!(
            board.try_mark(Marker::O, 0),
            Err(Error::OccupiedPosition { position: 0 })
        ));
        assert!(matches!(
            board.try_mark(Marker::O, 9),
            Err(Error::InvalidPosition { position: 9 })
        ));
        assert_eq!(board.history(), &[0]);
    }

    #[test]
    fn diagonal_detected_before_trailing_triples() {
        // arrange
        let mut board: Board = "XOX OXO --X".parse().unwrap();

        // act
        board.mark(Marker::X, 6);

        // assert
        assert!(board.is_game_over());
        assert_eq!(board.winner(), Some(Winner::Marker(Marker::X)));
    }

    #[test]
    fn first_triple_in_scan_order_wins() {
        // Not reachable under alternating play, but must still be resolved.
        let mut board: Board = "OOO XXX ---".parse().unwrap();

        assert!(board.is_game_over());
        assert_eq!(board.winner(), Some(Winner::Marker(Marker::O)));
    }

    #[test]
    fn full_board_without_line_is_draw() {
        let mut board: Board = "XOX XOO OXX".parse().unwrap();

        assert!(board.is_game_over());
        assert_eq!(board.winner(), Some(Winner::Draw));
    }

    #[test]
    fn open_board_is_not_over() {
        let mut board: Board = "XO- --- ---".parse().unwrap();

        assert!(!board.is_game_over());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert!(matches!(
            "XO".parse::<Board>(),
            Err(Error::InvalidBoardLength { got: 2, .. })
        ));
        assert!(matches!(
            "XOZ------".parse::<Board>(),
            Err(Error::InvalidCellCharacter { character: 'Z', .. })
        ));
    }

    #[test]
    fn display_shows_indices_for_empty_cells() {
        let board: Board = "X-- -O- ---".parse().unwrap();

        let rendered = board.to_string();

        assert_eq!(
            rendered,
            " X | 1 | 2 \n---+---+---\n 3 | O | 5 \n---+---+---\n 6 | 7 | 8 \n"
        );
    }

    #[test]
    fn next_marker_follows_piece_counts() {
        assert_eq!(Board::new().next_marker(), Marker::X);
        assert_eq!("X-- --- ---".parse::<Board>().unwrap().next_marker(), Marker::O);
        assert_eq!("XO- --- ---".parse::<Board>().unwrap().next_marker(), Marker::X);
    }
}
