//! Property tests for incremental make/unmake.
//!
//! Random legal games are played from a handful of start positions; after
//! every move the incremental key must match a from-scratch key, and
//! unwinding the whole game must restore the start position bit for bit.

use chess_engine::Position;
use proptest::prelude::*;

const STARTS: [&str; 4] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_games_unwind_exactly(
        start in 0usize..STARTS.len(),
        choices in prop::collection::vec(any::<u16>(), 1..40),
        nulls in prop::collection::vec(any::<bool>(), 40),
    ) {
        let mut position = Position::from_fen(STARTS[start]).unwrap();
        let original = position.clone();
        let mut made = Vec::new();

        for (i, choice) in choices.iter().enumerate() {
            if nulls[i] && !position.in_check() {
                position.make_null_move();
                made.push(true);
                prop_assert_eq!(position.key(), position.compute_key());
                continue;
            }
            let moves = position.generate_moves();
            if moves.is_empty() {
                break;
            }
            let m = moves[*choice as usize % moves.len()];
            position.make_move(m);
            made.push(false);
            prop_assert_eq!(position.key(), position.compute_key());
            prop_assert_eq!(Position::from_fen(&position.to_fen()).unwrap().key(), position.key());
        }

        while let Some(null) = made.pop() {
            if null {
                position.unmake_null_move();
            } else {
                position.unmake_move();
            }
        }
        prop_assert_eq!(position, original);
    }

    #[test]
    fn generated_moves_never_leave_king_in_check(
        start in 0usize..STARTS.len(),
        choices in prop::collection::vec(any::<u16>(), 0..20),
    ) {
        let mut position = Position::from_fen(STARTS[start]).unwrap();
        for choice in choices {
            let moves = position.generate_moves();
            if moves.is_empty() {
                break;
            }
            let mover = position.side_to_move();
            for m in &moves {
                position.make_move(*m);
                let king = position.king_square(mover);
                prop_assert!(!position.is_square_attacked(king, mover.opposite()), "{}", m.to_uci());
                position.unmake_move();
            }
            position.make_move(moves[choice as usize % moves.len()]);
        }
    }
}
