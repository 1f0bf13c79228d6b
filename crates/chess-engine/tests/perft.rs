//! Deep perft runs. Run with `cargo test -p chess-engine --release -- --ignored`.

use chess_engine::{perft, Position};

fn run(fen: &str, depth: u32) -> u64 {
    let mut position = Position::from_fen(fen).unwrap();
    perft(&mut position, depth)
}

#[test]
#[ignore]
fn startpos_depth_5() {
    assert_eq!(run(chess_core::Fen::STARTPOS, 5), 4_865_609);
}

#[test]
#[ignore]
fn kiwipete_depth_4() {
    assert_eq!(
        run("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -", 4),
        4_085_603
    );
}

#[test]
#[ignore]
fn position3_depth_5() {
    assert_eq!(run("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 5), 674_624);
}

#[test]
#[ignore]
fn position4_depth_4() {
    assert_eq!(
        run("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", 4),
        422_333
    );
}

#[test]
#[ignore]
fn position5_depth_4() {
    assert_eq!(
        run("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1", 4),
        2_103_487
    );
}

#[test]
#[ignore]
fn position6_depth_4() {
    assert_eq!(
        run("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10", 4),
        3_894_594
    );
}
