//! Properties of the board and the search over reachable positions.

use proptest::prelude::*;
use ttt_minimax::board::{Board, Marker, WINNING_TRIPLES, Winner};
use ttt_minimax::game::{GameState, play_silently};
use ttt_minimax::player::{Opening, Player};
use ttt_minimax::random::CustomNumberGenerator;
use ttt_minimax::search::{LOSS, WIN, best_move};

/// Plays `order` alternately from X, stopping after `len` moves or at the end
/// of the game.
fn reachable(order: &[usize], len: usize) -> Board {
    let mut board = Board::new();
    let mut marker = Marker::X;
    for &position in order.iter().take(len) {
        if board.is_game_over() {
            break;
        }
        board.mark(marker, position);
        marker = marker.opponent();
    }
    board
}

fn line_winner(board: &Board) -> Option<Marker> {
    WINNING_TRIPLES.iter().find_map(|&[a, b, c]| {
        let marker = board.cell(a)?;
        (board.cell(b) == Some(marker) && board.cell(c) == Some(marker)).then_some(marker)
    })
}

fn move_order() -> impl Strategy<Value = Vec<usize>> {
    Just((0..9).collect::<Vec<usize>>()).prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn game_over_matches_lines_and_fullness(order in move_order(), len in 0usize..=9) {
        let mut board = reachable(&order, len);
        let expected_winner = line_winner(&board);
        let full = board.available_positions().is_empty();

        let over = board.is_game_over();

        prop_assert_eq!(over, expected_winner.is_some() || full);
        match board.winner() {
            Some(Winner::Marker(marker)) => prop_assert_eq!(Some(marker), expected_winner),
            Some(Winner::Draw) => prop_assert!(expected_winner.is_none() && full),
            None => prop_assert!(!over),
        }
    }

    #[test]
    fn mark_then_revert_is_identity(order in move_order(), len in 0usize..9) {
        let mut board = reachable(&order, len);
        prop_assume!(!board.clone().is_game_over());
        let before = board.clone();
        let position = board.available_positions()[0];

        board.mark(board.next_marker(), position);
        board.is_game_over();
        board.revert_last_move();

        prop_assert_eq!(&board, &before);
        prop_assert_eq!(board.winner(), None);
    }

    #[test]
    fn history_mirrors_occupied_cells(order in move_order(), len in 0usize..=9) {
        let board = reachable(&order, len);
        let mut occupied: Vec<usize> = (0..9).filter(|&i| board.cell(i).is_some()).collect();
        let mut history = board.history().to_vec();
        occupied.sort_unstable();
        history.sort_unstable();

        prop_assert_eq!(occupied, history);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn search_score_is_realised_by_optimal_play(order in move_order(), len in 2usize..8) {
        let mut board = reachable(&order, len);
        prop_assume!(!board.is_game_over());
        let before = board.clone();
        let mover = board.next_marker();

        let predicted = best_move(&mut board, mover).unwrap();
        prop_assert_eq!(&board, &before);

        // Continue with both sides playing the search's move.
        let mut marker = mover;
        while !board.is_game_over() {
            let position = best_move(&mut board, marker).unwrap().position;
            board.mark(marker, position);
            marker = marker.opponent();
        }
        let realised = match board.winner() {
            Some(Winner::Marker(winner)) if winner == mover => WIN,
            Some(Winner::Marker(_)) => LOSS,
            _ => 0,
        };
        prop_assert_eq!(realised, predicted.score);
    }
}

#[test]
fn optimal_players_always_draw() {
    let mut player1: Player = Player::automatic(Marker::X);
    let mut player2: Player = Player::automatic(Marker::O);

    let record = play_silently(&mut player1, &mut player2).unwrap();

    assert_eq!(record.state, GameState::Draw);
}

#[test]
fn random_opening_against_search_is_drawn() {
    for seed in 0..8 {
        let mut player1: Player<CustomNumberGenerator> = Player::automatic_with_opening(
            Marker::X,
            Opening::Random,
            CustomNumberGenerator::new(seed),
        );
        let mut player2: Player<CustomNumberGenerator> = Player::automatic(Marker::O);

        let record = play_silently(&mut player1, &mut player2).unwrap();

        assert_eq!(record.state, GameState::Draw, "seed {seed}: {:?}", record.moves);
    }
}
