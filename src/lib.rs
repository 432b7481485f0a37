//! Exhaustive minimax tic-tac-toe and Monte Carlo opening experiments.
//!
//! The search engine plays provably optimal moves by enumerating the whole
//! game tree on a single mutable board. On top of it, a Monte Carlo harness
//! plays thousands of complete games to measure how the first move and the
//! chance of moving first change win and draw rates.
//!
//! # Example
//!
//! ```rust
//! use ttt_minimax::board::{Board, Marker};
//! use ttt_minimax::harness::Harness;
//! use ttt_minimax::player::Opening;
//! use ttt_minimax::search::best_move;
//!
//! // Ask the engine for the best reply to a corner opening
//! let mut board: Board = "X-- --- ---".parse().unwrap();
//! let reply = best_move(&mut board, Marker::O).unwrap();
//! assert_eq!(reply.position, 4);
//! assert_eq!(reply.score, 0);
//!
//! // Play a small seeded round where the subject always opens in the centre
//! let round = Harness::new()
//!     .with_seed(42)
//!     .run_round(1.0, 2, Opening::Fixed(4))
//!     .unwrap();
//! assert_eq!(round.counts.losses, 0);
//! ```

/// The 3x3 grid, move history and win/draw detection.
pub mod board;
/// Result series from sweeps and the sinks that consume them.
pub mod chart;
/// Settings for batch experiments.
pub mod config;
/// The crate's error type.
pub mod error;
/// The turn loop between two players.
pub mod game;
/// Monte Carlo rounds and sweeps.
pub mod harness;
/// Human and automatic players.
pub mod player;
/// Contains traits and implementations for random number generation.
pub mod random;
/// Exhaustive minimax search.
pub mod search;

pub use error::{Error, Result};
