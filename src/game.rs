//! Turn-by-turn play between two players on one board.

use crate::board::{Board, Marker, Winner};
use crate::error::{Error, Result};
use crate::player::{Player, PlayerKind};
use crate::random::RandomGenerator;
use serde::Serialize;
use tracing::debug;

/// State of a game: in progress, or one of the three terminal outcomes.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize)]
pub enum GameState {
    InProgress,
    Draw,
    Player1Won,
    Player2Won,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        self != GameState::InProgress
    }
}

/// A finished game: its terminal state and the order positions were played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub state: GameState,
    pub moves: Vec<usize>,
}

/// Receives the board and announcements while a game is played.
pub trait Renderer {
    fn render(&mut self, board: &Board);

    fn announce_turn(&mut self, _kind: PlayerKind, _marker: Marker) {}

    fn announce_outcome(&mut self, _winner: Winner) {}
}

/// Renders nothing; used by batch experiments.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentRenderer;

impl Renderer for SilentRenderer {
    fn render(&mut self, _board: &Board) {}
}

/// Prints the board and messages to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn render(&mut self, board: &Board) {
        println!("\nCurrent board:");
        print!("{board}");
    }

    fn announce_turn(&mut self, kind: PlayerKind, marker: Marker) {
        match kind {
            PlayerKind::Human => println!("[Human's move, {marker}]"),
            PlayerKind::Automatic => println!("[Computer's move, {marker}]"),
        }
    }

    fn announce_outcome(&mut self, winner: Winner) {
        match winner {
            Winner::Draw => println!("Game over with draw"),
            Winner::Marker(marker) => println!("Winner: {marker}"),
        }
    }
}

/// One game between two players on a fresh board.
#[derive(Debug, Default)]
pub struct Game {
    board: Board,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Alternates turns, player 1 first, until a win or a full board.
    ///
    /// The renderer sees the board before every move and once more at the
    /// end. Errors only come from a player's move source.
    pub fn play<R: RandomGenerator>(
        &mut self,
        player1: &mut Player<R>,
        player2: &mut Player<R>,
        renderer: &mut impl Renderer,
    ) -> Result<GameRecord> {
        if player1.marker() == player2.marker() {
            return Err(Error::SameMarker {
                marker: player1.marker().symbol(),
            });
        }

        let mut state = GameState::InProgress;
        for turn in 0..9 {
            renderer.render(&self.board);

            let player = if turn % 2 == 0 {
                &mut *player1
            } else {
                &mut *player2
            };
            renderer.announce_turn(player.kind(), player.marker());
            let position = player.make_move(&mut self.board)?;
            debug!(turn, marker = %player.marker(), position, "move played");

            if self.board.is_game_over() {
                state = match self.board.winner() {
                    Some(Winner::Marker(marker)) if marker == player1.marker() => {
                        GameState::Player1Won
                    }
                    Some(Winner::Marker(_)) => GameState::Player2Won,
                    _ => GameState::Draw,
                };
                break;
            }
        }

        if state == GameState::InProgress {
            state = GameState::Draw;
        }

        renderer.render(&self.board);
        if let Some(winner) = self.board.winner() {
            renderer.announce_outcome(winner);
        }
        debug!(?state, moves = ?self.board.history(), "game finished");

        Ok(GameRecord {
            state,
            moves: self.board.history().to_vec(),
        })
    }
}

/// Plays one game silently on a fresh board.
pub fn play_silently<R: RandomGenerator>(
    player1: &mut Player<R>,
    player2: &mut Player<R>,
) -> Result<GameRecord> {
    Game::new().play(player1, player2, &mut SilentRenderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Opening, ScriptedInput};
    use crate::random::CustomNumberGenerator;

    #[derive(Default)]
    struct CountingRenderer {
        renders: usize,
        turns: Vec<(PlayerKind, Marker)>,
        outcome: Option<Winner>,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, _board: &Board) {
            self.renders += 1;
        }

        fn announce_turn(&mut self, kind: PlayerKind, marker: Marker) {
            self.turns.push((kind, marker));
        }

        fn announce_outcome(&mut self, winner: Winner) {
            self.outcome = Some(winner);
        }
    }

    #[test]
    fn optimal_players_draw() {
        // arrange
        let mut player1: Player = Player::automatic(Marker::X);
        let mut player2: Player = Player::automatic(Marker::O);

        // act
        let record = play_silently(&mut player1, &mut player2).unwrap();

        // assert
        assert_eq!(record.state, GameState::Draw);
        assert_eq!(record.moves.len(), 9);
    }

    #[test]
    fn optimal_players_draw_after_any_opening() {
        for opening in 0..9 {
            let mut player1: Player<CustomNumberGenerator> = Player::automatic_with_opening(
                Marker::X,
                Opening::Fixed(opening),
                CustomNumberGenerator::default(),
            );
            let mut player2: Player<CustomNumberGenerator> = Player::automatic(Marker::O);

            let record = play_silently(&mut player1, &mut player2).unwrap();

            assert_eq!(record.state, GameState::Draw, "opening {opening}");
            assert_eq!(record.moves[0], opening);
        }
    }

    #[test]
    fn human_loses_to_search() {
        // arrange: the human plays 1, 2, 3, 5 in order, skipping taken cells.
        let mut human: Player = Player::human(
            Marker::X,
            ScriptedInput::new(["1", "2", "3", "5", "6", "7", "8"]),
        );
        let mut computer: Player = Player::automatic(Marker::O);
        let mut renderer = CountingRenderer::default();

        // act
        let record = Game::new()
            .play(&mut human, &mut computer, &mut renderer)
            .unwrap();

        // assert
        assert_eq!(record.state, GameState::Player2Won);
        assert_eq!(renderer.outcome, Some(Winner::Marker(Marker::O)));
        assert_eq!(renderer.renders, record.moves.len() + 1);
        assert_eq!(renderer.turns[0], (PlayerKind::Human, Marker::X));
        assert_eq!(renderer.turns[1], (PlayerKind::Automatic, Marker::O));
    }

    #[test]
    fn game_stops_on_first_win() {
        // arrange: O goes first here and takes the left column.
        let mut player1: Player = Player::human(Marker::O, ScriptedInput::new(["0", "3", "6"]));
        let mut player2: Player = Player::human(Marker::X, ScriptedInput::new(["1", "2"]));

        // act
        let record = play_silently(&mut player1, &mut player2).unwrap();

        // assert
        assert_eq!(record.state, GameState::Player1Won);
        assert_eq!(record.moves, vec![0, 1, 3, 2, 6]);
    }

    #[test]
    fn same_markers_are_rejected() {
        let mut player1: Player = Player::automatic(Marker::X);
        let mut player2: Player = Player::automatic(Marker::X);

        assert!(matches!(
            play_silently(&mut player1, &mut player2),
            Err(Error::SameMarker { marker: 'X' })
        ));
    }

    #[test]
    fn closed_input_aborts_the_game() {
        let mut player1: Player = Player::human(Marker::X, ScriptedInput::new(["4"]));
        let mut player2: Player = Player::automatic(Marker::O);

        assert!(matches!(
            play_silently(&mut player1, &mut player2),
            Err(Error::InputClosed)
        ));
    }

    #[test]
    fn terminal_states() {
        assert!(!GameState::InProgress.is_terminal());
        assert!(GameState::Draw.is_terminal());
        assert!(GameState::Player1Won.is_terminal());
        assert!(GameState::Player2Won.is_terminal());
    }
}
