//! Human and automatic players behind one "produce the next move" contract.

use crate::board::{Board, Marker};
use crate::error::{Error, Result};
use crate::random::{RandomGenerator, StandardRandomGenerator};
use crate::search::best_move;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::debug;

/// How an automatic player chooses its very first move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opening {
    /// Search from the first move on.
    #[default]
    Search,
    /// Play this position first.
    ///
    /// Only meaningful as the first move of the game; an occupied position is
    /// rejected with [`Error::OccupiedPosition`].
    Fixed(usize),
    /// Play a uniformly random free position first.
    Random,
}

impl fmt::Display for Opening {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opening::Search => write!(f, "search"),
            Opening::Fixed(position) => write!(f, "{position}"),
            Opening::Random => write!(f, "random"),
        }
    }
}

impl FromStr for Opening {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" | "optimal" => Ok(Opening::Search),
            "random" | "-1" => Ok(Opening::Random),
            other => match other.parse::<usize>() {
                Ok(position) if position < 9 => Ok(Opening::Fixed(position)),
                Ok(position) => Err(Error::InvalidPosition { position }),
                Err(_) => Err(Error::InvalidConfiguration {
                    message: format!("unknown opening '{other}' (expected search, random or 0-8)"),
                }),
            },
        }
    }
}

/// Source of human-chosen positions.
pub trait PositionInput {
    /// Reads one raw answer, or `None` once the source is exhausted.
    fn read_position(&mut self) -> Result<Option<String>>;

    /// Called for every answer that is not a free position.
    fn reject(&mut self, _raw: &str) {}
}

/// Reads one line from `reader`, or `None` at end of input.
///
/// Bytes that are not UTF-8 are replaced rather than reported, so a garbled
/// answer is rejected and asked again like any other invalid one.
fn read_answer(reader: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = Vec::new();
    let read = reader
        .read_until(b'\n', &mut line)
        .map_err(|e| Error::io("read position", e))?;
    Ok((read > 0).then(|| String::from_utf8_lossy(&line).into_owned()))
}

/// Prompts on stdout and reads lines from stdin.
#[derive(Debug, Default)]
pub struct ConsoleInput;

impl PositionInput for ConsoleInput {
    fn read_position(&mut self) -> Result<Option<String>> {
        print!("Input position: ");
        io::stdout()
            .flush()
            .map_err(|e| Error::io("flush prompt", e))?;

        read_answer(&mut io::stdin().lock())
    }

    fn reject(&mut self, _raw: &str) {
        println!("Invalid move. Retry");
    }
}

/// Reads one answer per line from any buffered reader, without prompting.
#[derive(Debug)]
pub struct LineInput<B> {
    reader: B,
}

impl<B: BufRead> LineInput<B> {
    pub fn new(reader: B) -> Self {
        Self { reader }
    }
}

impl<B: BufRead> PositionInput for LineInput<B> {
    fn read_position(&mut self) -> Result<Option<String>> {
        read_answer(&mut self.reader)
    }
}

/// Replays a fixed list of answers; records rejected ones.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    rejected: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            rejected: Vec::new(),
        }
    }

    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }
}

impl PositionInput for ScriptedInput {
    fn read_position(&mut self) -> Result<Option<String>> {
        Ok(self.answers.pop_front())
    }

    fn reject(&mut self, raw: &str) {
        self.rejected.push(raw.to_string());
    }
}

/// A player whose moves come from a [`PositionInput`].
pub struct HumanPlayer {
    marker: Marker,
    input: Box<dyn PositionInput>,
}

impl HumanPlayer {
    pub fn new(marker: Marker, input: impl PositionInput + 'static) -> Self {
        Self {
            marker,
            input: Box::new(input),
        }
    }

    /// Asks until the answer is a free position. Invalid answers are reported
    /// to the input source and never surface as errors.
    fn choose(&mut self, board: &Board) -> Result<usize> {
        loop {
            let Some(raw) = self.input.read_position()? else {
                return Err(Error::InputClosed);
            };
            match raw.trim().parse::<usize>() {
                Ok(position) if board.is_available(position) => return Ok(position),
                _ => {
                    debug!(input = raw.trim(), "rejected human input");
                    self.input.reject(raw.trim());
                }
            }
        }
    }
}

impl fmt::Debug for HumanPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HumanPlayer")
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}

/// A player that searches for the optimal move, after an optional scripted
/// opening.
#[derive(Debug, Clone)]
pub struct AutomaticPlayer<R: RandomGenerator = StandardRandomGenerator> {
    marker: Marker,
    opponent: Marker,
    opening: Option<Opening>,
    random: R,
}

impl<R: RandomGenerator> AutomaticPlayer<R> {
    pub fn new(marker: Marker) -> Self {
        Self::with_opening(marker, Opening::Search, R::default())
    }

    pub fn with_opening(marker: Marker, opening: Opening, random: R) -> Self {
        Self {
            marker,
            opponent: marker.opponent(),
            opening: Some(opening),
            random,
        }
    }

    pub fn opponent(&self) -> Marker {
        self.opponent
    }

    /// The opening still to be played, if the first move has not happened.
    pub fn pending_opening(&self) -> Option<Opening> {
        self.opening
    }

    /// Picks a position; the opening setting is consumed on the first call.
    fn choose(&mut self, board: &mut Board) -> Result<usize> {
        match self.opening.take().unwrap_or_default() {
            Opening::Fixed(position) => {
                if !board.is_available(position) {
                    return Err(Error::OccupiedPosition { position });
                }
                Ok(position)
            }
            Opening::Random => self
                .random
                .choose(&board.available_positions())
                .copied()
                .ok_or(Error::NoAvailablePositions),
            Opening::Search => best_move(board, self.marker)
                .map(|result| result.position)
                .ok_or(Error::NoAvailablePositions),
        }
    }
}

/// Whether a seat is filled by a person or by the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Automatic,
}

/// A participant in a game.
#[derive(Debug)]
pub enum Player<R: RandomGenerator = StandardRandomGenerator> {
    Human(HumanPlayer),
    Automatic(AutomaticPlayer<R>),
}

impl<R: RandomGenerator> Player<R> {
    pub fn human(marker: Marker, input: impl PositionInput + 'static) -> Self {
        Player::Human(HumanPlayer::new(marker, input))
    }

    pub fn automatic(marker: Marker) -> Self {
        Player::Automatic(AutomaticPlayer::new(marker))
    }

    pub fn automatic_with_opening(marker: Marker, opening: Opening, random: R) -> Self {
        Player::Automatic(AutomaticPlayer::with_opening(marker, opening, random))
    }

    pub fn marker(&self) -> Marker {
        match self {
            Player::Human(human) => human.marker,
            Player::Automatic(automatic) => automatic.marker,
        }
    }

    pub fn kind(&self) -> PlayerKind {
        match self {
            Player::Human(_) => PlayerKind::Human,
            Player::Automatic(_) => PlayerKind::Automatic,
        }
    }

    /// Chooses a position, marks it and returns it.
    pub fn make_move(&mut self, board: &mut Board) -> Result<usize> {
        let position = match self {
            Player::Human(human) => human.choose(board)?,
            Player::Automatic(automatic) => automatic.choose(board)?,
        };
        board.mark(self.marker(), position);
        Ok(position)
    }
}
