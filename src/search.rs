//! Exhaustive minimax search over the shared mutable board.
//!
//! The search plays hypothetical moves directly on the caller's board and
//! takes them back before looking at the next candidate, so the board is
//! never copied per node. Every hypothetical move goes through [`Probe`],
//! which reverts it when dropped.

use crate::board::{Board, Marker, Winner};
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use tracing::trace;

/// Score of a position for the searching marker: +1 win, 0 draw, -1 loss.
pub type Score = i8;

pub const WIN: Score = 1;
pub const DRAW: Score = 0;
pub const LOSS: Score = -1;

/// Outcome of a search from one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// The chosen position, lowest index among equally scored moves.
    pub position: usize,
    /// Outcome for the searching marker under optimal play by both sides.
    pub score: Score,
    /// Number of hypothetical moves played during the search.
    pub nodes: u64,
}

/// Finds the optimal move for `marker`.
///
/// The board is left exactly as it was passed in. Returns `None` when no
/// position is available.
pub fn best_move(board: &mut Board, marker: Marker) -> Option<SearchResult> {
    let mut search = Minimax::new(marker);
    let (position, score) = search.maximize(board);
    trace!(%marker, ?position, score, nodes = search.nodes, "search finished");
    position.map(|position| SearchResult {
        position,
        score,
        nodes: search.nodes,
    })
}

/// Scores a board from `marker`'s point of view.
///
/// Anything other than a decided win or loss, including a board that is not
/// actually over, scores as a draw.
pub fn score(board: &mut Board, marker: Marker) -> Score {
    if board.is_game_over() {
        match board.winner() {
            Some(Winner::Marker(winner)) if winner == marker => return WIN,
            Some(Winner::Marker(winner)) if winner == marker.opponent() => return LOSS,
            _ => {}
        }
    }
    DRAW
}

/// A hypothetical move held on the board for the lifetime of the guard.
struct Probe<'a> {
    board: &'a mut Board,
}

impl<'a> Probe<'a> {
    fn new(board: &'a mut Board, marker: Marker, position: usize) -> Self {
        board.mark(marker, position);
        Self { board }
    }
}

impl Deref for Probe<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Probe<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        self.board.revert_last_move();
    }
}

struct Minimax {
    marker: Marker,
    opponent: Marker,
    nodes: u64,
}

impl Minimax {
    fn new(marker: Marker) -> Self {
        Self {
            marker,
            opponent: marker.opponent(),
            nodes: 0,
        }
    }

    /// Best move for the searching marker; ties keep the first-seen move.
    fn maximize(&mut self, board: &mut Board) -> (Option<usize>, Score) {
        let mut best_move = None;
        let mut best_score = Score::MIN;

        for position in board.available_positions() {
            self.nodes += 1;
            let mut probe = Probe::new(board, self.marker, position);
            let outcome = if probe.is_game_over() {
                score(&mut probe, self.marker)
            } else {
                self.minimize(&mut probe).1
            };
            drop(probe);

            if best_move.is_none() || outcome > best_score {
                best_score = outcome;
                best_move = Some(position);
            }
        }

        (best_move, if best_move.is_some() { best_score } else { DRAW })
    }

    /// Best reply for the opponent, i.e. the lowest score for the searching
    /// marker; ties keep the first-seen move.
    fn minimize(&mut self, board: &mut Board) -> (Option<usize>, Score) {
        let mut best_move = None;
        let mut best_score = Score::MAX;

        for position in board.available_positions() {
            self.nodes += 1;
            let mut probe = Probe::new(board, self.opponent, position);
            let outcome = if probe.is_game_over() {
                score(&mut probe, self.marker)
            } else {
                self.maximize(&mut probe).1
            };
            drop(probe);

            if best_move.is_none() || outcome < best_score {
                best_score = outcome;
                best_move = Some(position);
            }
        }

        (best_move, if best_move.is_some() { best_score } else { DRAW })
    }
}
