//! Static exchange evaluation.

use crate::params::EvalParams;
use chess_core::{Move, MoveKind, Piece, Square};
use chess_engine::{Bitboard, Position};

/// Value of the king in exchanges: large enough that losing it outweighs
/// any sequence of captures.
const KING_VALUE: i32 = 20_000;

/// Piece values used by [`see`], indexed by piece.
pub fn see_values(params: &EvalParams) -> [i32; 6] {
    let mut values = params.material_mg.as_array();
    values[Piece::King.index()] = KING_VALUE;
    values
}

/// Net material the mover gains by playing `m` and then letting both sides
/// recapture on the target square with their least valuable attacker, each
/// free to stop when continuing would lose material.
///
/// Sliders hidden behind a capturing piece join the exchange once it moves.
/// Pins are ignored. The position is not modified.
pub fn see(position: &Position, m: Move, values: &[i32; 6]) -> i32 {
    let to = m.to();
    let mut occupied = position.occupied();
    let mut gain = [0i32; 40];

    let mut on_target = values[m.piece().index()];
    gain[0] = match m.kind() {
        MoveKind::EnPassant => {
            if let Some(victim) = to.forward(position.side_to_move(), -1) {
                occupied = occupied.without(victim);
            }
            values[Piece::Pawn.index()]
        }
        _ => m.captured().map_or(0, |piece| values[piece.index()]),
    };
    if let Some(promoted) = m.kind().promotion_piece() {
        gain[0] += values[promoted.index()] - values[Piece::Pawn.index()];
        on_target = values[promoted.index()];
    }

    let mut from = Bitboard::from_square(m.from());
    let mut side = position.side_to_move();
    let mut depth = 0;
    loop {
        depth += 1;
        gain[depth] = on_target - gain[depth - 1];
        occupied ^= from;
        side = side.opposite();

        let attackers = position.attackers_to(to, occupied) & occupied & position.occupancy(side);
        match least_valuable(position, attackers) {
            Some((square, piece)) => {
                from = Bitboard::from_square(square);
                on_target = values[piece.index()];
            }
            None => break,
        }
        if depth + 1 == gain.len() {
            break;
        }
    }

    while depth > 1 {
        depth -= 1;
        gain[depth - 1] = -(-gain[depth - 1]).max(gain[depth]);
    }
    gain[0]
}

/// True if [`see`] of `m` is at least `threshold`.
pub fn see_ge(position: &Position, m: Move, threshold: i32, values: &[i32; 6]) -> bool {
    see(position, m, values) >= threshold
}

fn least_valuable(position: &Position, attackers: Bitboard) -> Option<(Square, Piece)> {
    Piece::ALL.into_iter().find_map(|piece| {
        (attackers & position.pieces(piece))
            .lsb()
            .map(|square| (square, piece))
    })
}
