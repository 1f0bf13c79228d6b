//! Randomized checks on search output.

use chess_engine::Position;
use chess_search::{
    Parameters, ScoreKind, SearchController, SearchInfo, SearchLimits, SearchTables, Searcher,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn shallow_search_always_answers_legally(
        choices in prop::collection::vec(any::<u16>(), 0..30),
    ) {
        let mut position = Position::startpos();
        for choice in &choices {
            let moves = position.generate_moves();
            if moves.is_empty() {
                break;
            }
            position.make_move(moves[*choice as usize % moves.len()]);
        }
        let before = position.clone();

        let params = Parameters::default();
        let mut tables = SearchTables::new(&params.management);
        let limits = SearchLimits::depth(2);
        let mut reports = 0usize;
        let mut reporter = |_info: SearchInfo| reports += 1;
        let outcome = Searcher::new(
            &position,
            &params,
            &mut tables,
            SearchController::new(),
            &limits,
            &[],
            &mut reporter,
        )
        .run();

        prop_assert_eq!(&position, &before);
        prop_assert!(reports >= 1);
        let legal = position.generate_moves();
        match outcome.best_move {
            Some(best) => {
                prop_assert!(legal.contains(best));
                prop_assert_eq!(outcome.depth, 2);
            }
            None => {
                prop_assert!(legal.is_empty());
                let expected = if position.in_check() { ScoreKind::Mate } else { ScoreKind::Exact };
                prop_assert_eq!(outcome.score.kind, expected);
                prop_assert_eq!(outcome.score.value, 0);
            }
        }
    }
}
