//! Chain moves: composite moves built by stitching together two smaller moves
//! that share no altered variable, via [`crate::neighborhood::Move::compose_chain`].
//!
//! Grounded on `printemps::neighborhood::ChainMoveGenerator`: composed candidates
//! are `register`ed one at a time, then deduplicated, sorted (by descending
//! overlap rate, then descending hash, then alteration/related-constraint count,
//! then variable id, then target value — ties broken deterministically so results
//! are reproducible), and finally capped to `chain_move_capacity`. When
//! `ChainMoveReduceMode::Shuffle` is selected the sort is replaced by an RNG
//! shuffle before the same capacity cut.

use crate::neighborhood::Move;
use crate::options::ChainMoveReduceMode;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Default)]
pub struct ChainMoveGenerator {
    moves: Vec<Move>,
}

impl ChainMoveGenerator {
    pub fn register(&mut self, candidate: Move) {
        self.moves.push(candidate);
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn deduplicate(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.moves.retain(|m| seen.insert(chain_key(m)));
    }

    /// Orders (or, in [`ChainMoveReduceMode::Shuffle`] mode, shuffles) the
    /// registered candidates and truncates to `capacity`.
    pub fn reduce(&mut self, capacity: usize, mode: ChainMoveReduceMode, rng: &mut impl Rng) {
        match mode {
            ChainMoveReduceMode::OverlapRate => {
                self.moves.sort_by(|a, b| {
                    b.overlap_rate()
                        .partial_cmp(&a.overlap_rate())
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| b.hash().cmp(&a.hash()))
                        .then_with(|| b.alterations().len().cmp(&a.alterations().len()))
                        .then_with(|| b.related_constraints().len().cmp(&a.related_constraints().len()))
                });
            }
            ChainMoveReduceMode::Shuffle => {
                self.moves.shuffle(rng);
            }
        }
        self.moves.truncate(capacity);
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn into_moves(self) -> Vec<Move> {
        self.moves
    }
}

fn chain_key(m: &Move) -> (u64, Vec<(u32, i64)>) {
    (m.hash(), m.alterations().iter().map(|&(v, target)| (v.0, target)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::MoveType;
    use crate::VariableID;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use smallvec::smallvec;

    fn mv(var: u32, related: u32) -> Move {
        Move::new(
            smallvec![(VariableID::from(var), 1)],
            smallvec![crate::ConstraintID::from(related)],
            MoveType::Binary,
        )
    }

    #[test]
    fn deduplicates_identical_alterations() {
        let mut gen = ChainMoveGenerator::default();
        gen.register(mv(0, 0));
        gen.register(mv(0, 0));
        gen.register(mv(1, 0));
        gen.deduplicate();
        assert_eq!(gen.moves().len(), 2);
    }

    #[test]
    fn reduce_caps_capacity() {
        let mut gen = ChainMoveGenerator::default();
        for i in 0..20 {
            gen.register(mv(i, i));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        gen.reduce(5, ChainMoveReduceMode::OverlapRate, &mut rng);
        assert_eq!(gen.moves().len(), 5);
    }
}
