//! Property tests for the packed move encoding.

use chess_core::{Move, MoveKind, Piece, Square};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = MoveKind> {
    (0u8..9).prop_map(|bits| MoveKind::from_bits(bits).unwrap())
}

fn any_piece() -> impl Strategy<Value = Piece> {
    (0u8..6).prop_map(|i| Piece::from_index(i).unwrap())
}

fn any_capture() -> impl Strategy<Value = Option<Piece>> {
    prop_oneof![Just(None), (0u8..5).prop_map(Piece::from_index)]
}

proptest! {
    #[test]
    fn decode_inverts_encode(
        from in 0u8..64,
        to in 0u8..64,
        piece in any_piece(),
        captured in any_capture(),
        kind in any_kind(),
        score in any::<i32>(),
    ) {
        prop_assume!(from != to);
        let from = Square::from_index(from).unwrap();
        let to = Square::from_index(to).unwrap();
        let m = Move::new(from, to, piece, captured, kind).with_score(score);

        let decoded = Move::decode(m.encode()).expect("generated moves decode");
        prop_assert_eq!(decoded, m);
        prop_assert_eq!(decoded.from(), from);
        prop_assert_eq!(decoded.to(), to);
        prop_assert_eq!(decoded.piece(), piece);
        prop_assert_eq!(decoded.captured(), captured);
        prop_assert_eq!(decoded.kind(), kind);
        prop_assert_eq!(decoded.score(), 0);
    }

    #[test]
    fn decode_never_panics(bits in any::<u32>()) {
        if let Some(m) = Move::decode(bits) {
            prop_assert_eq!(m.encode(), bits);
            prop_assert_ne!(m.from(), m.to());
        }
    }
}
