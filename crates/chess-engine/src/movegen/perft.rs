//! Leaf counting over the legal move tree.
//!
//! Counts are compared against published values to check move generation
//! together with make/unmake.

use crate::Position;

/// Number of leaves `depth` plies below `position`. The position is left as
/// it was found.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.generate_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|&m| {
            position.make_move(m);
            let nodes = perft(position, depth - 1);
            position.unmake_move();
            nodes
        })
        .sum()
}

/// Leaf counts below each root move, sorted by move text.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let mut split: Vec<(String, u64)> = position
        .generate_moves()
        .iter()
        .map(|&m| {
            position.make_move(m);
            let nodes = perft(position, depth.saturating_sub(1));
            position.unmake_move();
            (m.to_uci(), nodes)
        })
        .collect();
    split.sort_unstable();
    split
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";

    /// (fen, counts for depth 1, 2, 3)
    const SUITE: &[(&str, [u64; 3])] = &[
        (chess_core::Fen::STARTPOS, [20, 400, 8_902]),
        (KIWIPETE, [48, 2_039, 97_862]),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", [14, 191, 2_812]),
        (
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            [6, 264, 9_467],
        ),
        (
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1",
            [44, 1_486, 62_379],
        ),
    ];

    #[test]
    fn shallow_suite() {
        for (fen, counts) in SUITE {
            let mut position = Position::from_fen(fen).unwrap();
            for (depth, &expected) in (1..).zip(counts) {
                assert_eq!(perft(&mut position, depth), expected, "{fen} depth {depth}");
            }
        }
    }

    #[test]
    fn startpos_depth_4() {
        assert_eq!(perft(&mut Position::startpos(), 4), 197_281);
    }

    #[test]
    fn depth_zero_is_one_leaf() {
        assert_eq!(perft(&mut Position::startpos(), 0), 1);
    }

    #[test]
    fn divide_sums_to_perft_and_restores() {
        let mut position = Position::from_fen(KIWIPETE).unwrap();
        let before = position.clone();
        let split = perft_divide(&mut position, 2);
        assert_eq!(position, before);
        assert_eq!(split.len(), 48);
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 2_039);
        assert!(split.windows(2).all(|w| w[0].0 < w[1].0));
    }
}
