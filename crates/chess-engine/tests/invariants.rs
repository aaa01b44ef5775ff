//! Property tests over random legal games.
//!
//! Each case walks a random sequence of legal moves from one of a few
//! seed positions, checking board consistency after every move and that
//! unwinding the walk restores the start exactly.

use chess_engine::zobrist::hash_of;
use chess_engine::{generate_legal, MoveGenerator, Outcome, Position};
use proptest::prelude::*;
use proptest::sample::Index;

const SEEDS: [&str; 4] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
];

fn walk() -> impl Strategy<Value = (usize, Vec<Index>)> {
    (0..SEEDS.len(), prop::collection::vec(any::<Index>(), 0..60))
}

/// Plays moves picked by `choices` until they run out or the game ends.
/// Returns the FEN and hash seen before each move.
fn play(position: &mut Position, choices: &[Index]) -> Vec<(String, u64)> {
    let mut trail = Vec::new();
    for choice in choices {
        let moves = generate_legal(position, false);
        if moves.is_empty() {
            break;
        }
        trail.push((position.to_fen(), position.hash()));
        position.apply_move(moves[choice.index(moves.len())]);
    }
    trail
}

proptest! {
    #[test]
    fn undo_restores_every_earlier_position((seed, choices) in walk()) {
        let mut position = Position::from_fen(SEEDS[seed]).unwrap();
        let trail = play(&mut position, &choices);
        prop_assert_eq!(position.undo_depth(), trail.len());

        for (fen, hash) in trail.iter().rev() {
            position.undo_move();
            prop_assert_eq!(&position.to_fen(), fen);
            prop_assert_eq!(position.hash(), *hash);
        }
        prop_assert_eq!(position.to_fen(), SEEDS[seed]);
        prop_assert_eq!(position.undo_depth(), 0);
    }

    #[test]
    fn incremental_hash_matches_recomputed((seed, choices) in walk()) {
        let mut position = Position::from_fen(SEEDS[seed]).unwrap();
        for choice in &choices {
            let moves = generate_legal(&mut position, false);
            if moves.is_empty() {
                break;
            }
            let before = position.hash();
            position.apply_move(moves[choice.index(moves.len())]);
            prop_assert_ne!(position.hash(), before);
            prop_assert_eq!(position.hash(), hash_of(&position));
        }
    }

    #[test]
    fn board_stays_consistent((seed, choices) in walk()) {
        let mut position = Position::from_fen(SEEDS[seed]).unwrap();
        for choice in &choices {
            prop_assert_eq!(position.validate_invariants(), Ok(()));
            let moves = generate_legal(&mut position, false);
            if moves.is_empty() {
                break;
            }
            position.apply_move(moves[choice.index(moves.len())]);
        }
        prop_assert_eq!(position.validate_invariants(), Ok(()));
    }

    #[test]
    fn generated_moves_never_leave_the_king_attacked((seed, choices) in walk()) {
        let mut position = Position::from_fen(SEEDS[seed]).unwrap();
        play(&mut position, &choices);

        let us = position.side_to_move();
        let moves = generate_legal(&mut position, false);
        for m in &moves {
            position.apply_move(*m);
            prop_assert!(!position.is_in_check(us), "{} leaves the king attacked", m);
            position.undo_move();
        }
    }

    #[test]
    fn captures_only_is_the_capture_subset((seed, choices) in walk()) {
        let mut position = Position::from_fen(SEEDS[seed]).unwrap();
        play(&mut position, &choices);

        let all = generate_legal(&mut position, false);
        let mut expected: Vec<u32> = all
            .iter()
            .filter(|m| m.is_capture())
            .map(|m| m.raw())
            .collect();
        let mut captures: Vec<u32> = generate_legal(&mut position, true)
            .iter()
            .map(|m| m.raw())
            .collect();
        expected.sort_unstable();
        captures.sort_unstable();
        prop_assert_eq!(captures, expected);
    }

    #[test]
    fn outcome_agrees_with_check_state((seed, choices) in walk()) {
        let mut position = Position::from_fen(SEEDS[seed]).unwrap();
        play(&mut position, &choices);

        let mut generator = MoveGenerator::new();
        let in_check = position.is_in_check(position.side_to_move());
        match generator.outcome(&mut position) {
            Outcome::Checkmate => prop_assert!(in_check),
            Outcome::Stalemate => prop_assert!(!in_check),
            Outcome::Ongoing => {
                prop_assert!(!generator.legal_moves(&mut position, false).is_empty())
            }
        }
    }
}
