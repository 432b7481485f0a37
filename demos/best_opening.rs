extern crate ttt_minimax;

use ttt_minimax::board::{Board, Marker};
use ttt_minimax::harness::Harness;
use ttt_minimax::player::Opening;
use ttt_minimax::search::best_move;

fn main() {
    // Optimal replies to every opening move
    for opening in 0..9 {
        let mut board = Board::new();
        board.mark(Marker::X, opening);
        let reply = best_move(&mut board, Marker::O).unwrap();
        println!(
            "Opening {opening}: O answers {} (score {}, {} positions searched)",
            reply.position, reply.score, reply.nodes
        );
    }

    // A small seeded round per forced opening
    let harness = Harness::new().with_seed(2024).with_parallel(true);
    let chart = harness.sweep_first_move(1.0, 4).unwrap();
    for (i, x) in chart.x.iter().enumerate() {
        println!(
            "First move {x}: win {:.1}%, draw {:.1}%",
            chart.win[i], chart.draw[i]
        );
        assert_eq!(chart.win_or_draw[i], 100.0);
    }
}
