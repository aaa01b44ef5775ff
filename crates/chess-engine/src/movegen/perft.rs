//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::generate_legal;
use crate::Position;

/// Counts the number of leaf nodes at the given depth.
///
/// Works on a fork of `position`, which is left untouched.
pub fn perft(position: &Position, depth: u32) -> u64 {
    let mut position = position.fork();
    count(&mut position, depth)
}

/// Leaf count with bulk counting at depth 1.
fn count(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal(position, false);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        position.apply_move(*m);
        nodes += count(position, depth - 1);
        position.undo_move();
    }
    nodes
}

/// Perft with divide - node count below each root move.
///
/// Sorted by the move's UCI text. Useful for finding which root move has
/// an incorrect count.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut position = position.fork();
    let moves = generate_legal(&mut position, false);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        position.apply_move(*m);
        let nodes = if depth > 1 {
            count(&mut position, depth - 1)
        } else {
            1
        };
        position.undo_move();
        tracing::trace!(mv = %m, nodes, "perft divide");
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
