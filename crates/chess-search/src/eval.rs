//! Static evaluation.
//!
//! Every term is computed for White and Black separately, summed as a
//! White-positive middlegame / endgame pair, blended by game phase and
//! finally returned from the side to move's point of view.

use crate::params::{EvalParams, Taper};
use chess_core::{Color, Piece, Square};
use chess_engine::movegen::pawn_attacks_of;
use chess_engine::{attacks_of, pawn_attacks, Bitboard, Position};

/// Phase counter with every minor and major piece on the board.
pub const MAX_PHASE: i32 = 24;

/// Game phase from [`MAX_PHASE`] (opening) down to 0 (pawn endgame).
pub fn phase(position: &Position) -> i32 {
    let phase: i32 = Piece::ALL
        .iter()
        .map(|&piece| piece.phase_weight() * position.pieces(piece).count() as i32)
        .sum();
    phase.min(MAX_PHASE)
}

/// Running middlegame / endgame sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Phased {
    mg: i32,
    eg: i32,
}

impl Phased {
    fn add(&mut self, weight: Taper, count: i32) {
        self.mg += weight.mg * count;
        self.eg += weight.eg * count;
    }

    fn blend(self, phase: i32) -> i32 {
        (self.mg * phase + self.eg * (MAX_PHASE - phase)) / MAX_PHASE
    }
}

impl std::ops::Sub for Phased {
    type Output = Phased;

    fn sub(self, rhs: Phased) -> Phased {
        Phased {
            mg: self.mg - rhs.mg,
            eg: self.eg - rhs.eg,
        }
    }
}

/// Evaluates positions with one fixed set of weights.
///
/// Material and piece-square tables are merged per colour at construction.
#[derive(Debug, Clone)]
pub struct Evaluator {
    psqt: [[[Taper; 64]; 6]; 2],
    params: EvalParams,
}

impl Evaluator {
    pub fn new(params: &EvalParams) -> Self {
        let mg_values = params.material_mg.as_array();
        let eg_values = params.material_eg.as_array();
        let mg_tables = params.pst_mg.as_array();
        let eg_tables = params.pst_eg.as_array();

        let mut psqt = [[[Taper::default(); 64]; 6]; 2];
        for piece in Piece::ALL {
            let p = piece.index();
            for sq in 0..64usize {
                // Tables are written rank 8 first from White's side.
                for (color, row) in [(Color::White, sq ^ 56), (Color::Black, sq)] {
                    psqt[color.index()][p][sq] = Taper::new(
                        mg_values[p] + mg_tables[p].get(row).copied().unwrap_or(0),
                        eg_values[p] + eg_tables[p].get(row).copied().unwrap_or(0),
                    );
                }
            }
        }

        Evaluator {
            psqt,
            params: params.clone(),
        }
    }

    pub fn params(&self) -> &EvalParams {
        &self.params
    }

    /// Score of `position` in centipawns for the side to move.
    pub fn evaluate(&self, position: &Position) -> i32 {
        let white = self.evaluate_side(position, Color::White);
        let black = self.evaluate_side(position, Color::Black);
        let score = (white - black).blend(phase(position));
        position.side_to_move().sign() * score + self.params.tempo
    }

    fn evaluate_side(&self, position: &Position, color: Color) -> Phased {
        let mut total = Phased::default();
        self.material(position, color, &mut total);
        self.pawn_structure(position, color, &mut total);
        self.mobility(position, color, &mut total);
        self.king_safety(position, color, &mut total);
        if position.pieces_of(Piece::Bishop, color).more_than_one() {
            total.add(self.params.bishop_pair, 1);
        }
        total
    }

    fn material(&self, position: &Position, color: Color, total: &mut Phased) {
        let tables = &self.psqt[color.index()];
        for piece in Piece::ALL {
            for sq in position.pieces_of(piece, color) {
                total.add(tables[piece.index()][sq.index() as usize], 1);
            }
        }
    }

    fn pawn_structure(&self, position: &Position, color: Color, total: &mut Phased) {
        let params = &self.params;
        let own = position.pieces_of(Piece::Pawn, color);
        let enemy = position.pieces_of(Piece::Pawn, color.opposite());
        let occupied = position.occupied();

        for sq in own {
            let file = Bitboard::file_of(sq);
            let adjacent = file.east() | file.west();
            let front = Bitboard::from_square(sq).front_span(color);

            if (front & (file | adjacent) & enemy).is_empty() {
                let rank = color.relative_rank(sq.rank_index()) as usize;
                total.mg += params.passed_pawn_mg.get(rank).copied().unwrap_or(0);
                total.eg += params.passed_pawn_eg.get(rank).copied().unwrap_or(0);
            }

            if (adjacent & own).is_empty() {
                total.add(params.isolated_pawn, 1);
            } else if is_backward(sq, color, adjacent, own, enemy) {
                total.add(params.backward_pawn, 1);
            }

            if (front & own).is_not_empty() {
                total.add(params.doubled_pawn, 1);
            }

            if sq.forward(color, 1).is_some_and(|stop| occupied.contains(stop)) {
                total.add(params.blocked_pawn, 1);
            }
        }
    }

    fn mobility(&self, position: &Position, color: Color, total: &mut Phased) {
        let them = color.opposite();
        let unsafe_squares = pawn_attacks_of(position.pieces_of(Piece::Pawn, them), them);
        let available = !position.occupancy(color) & !unsafe_squares;
        let occupied = position.occupied();
        let weights = self.params.mobility.as_array();

        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            for sq in position.pieces_of(piece, color) {
                let reach = attacks_of(piece, color, sq, occupied) & available;
                total.add(weights[piece.index()], reach.count() as i32);
            }
        }
    }

    fn king_safety(&self, position: &Position, color: Color, total: &mut Phased) {
        let king = position.king_square(color);
        let weights = self.params.king_tropism.as_array();
        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            for sq in position.pieces_of(piece, color.opposite()) {
                let closeness = 7 - king.distance(sq) as i32;
                total.add(weights[piece.index()], closeness);
            }
        }

        let king_bb = Bitboard::from_square(king);
        let near = (king_bb | king_bb.east() | king_bb.west()).forward(color);
        let shield = near | near.forward(color);
        let pawns = (shield & position.pieces_of(Piece::Pawn, color)).count() as i32;
        total.add(self.params.pawn_shield, pawns);
    }
}

/// A pawn no friendly pawn can support from behind or beside whose stop
/// square is covered by an enemy pawn.
fn is_backward(
    sq: Square,
    color: Color,
    adjacent: Bitboard,
    own: Bitboard,
    enemy: Bitboard,
) -> bool {
    let rank = Bitboard::rank_of(sq);
    let level_or_behind = rank | rank.front_span(color.opposite());
    if (adjacent & level_or_behind & own).is_not_empty() {
        return false;
    }
    sq.forward(color, 1)
        .is_some_and(|stop| (pawn_attacks(stop, color) & enemy).is_not_empty())
}
