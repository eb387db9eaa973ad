use crate::{ConstraintID, VariableID};
use smallvec::SmallVec;

/// Tag identifying which generator produced a move; drives tabu-mode and scoring
/// special-cases (selection moves, chain moves) in the tabu search core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MoveType {
    Binary,
    Integer,
    Selection,
    ExclusiveOr,
    ExclusiveNor,
    InvertedIntegers,
    BalancedIntegers,
    ConstantSumIntegers,
    ConstantDifferenceIntegers,
    ConstantRatioIntegers,
    Aggregation,
    Precedence,
    VariableBound,
    SoftSelection,
    TrinomialExclusiveNor,
    Chain,
    TwoFlip,
    UserDefined,
}

/// A single (variable, target-value) alteration inside a [`Move`].
pub type Alteration = (VariableID, i64);

/// A candidate local move: a small list of alterations plus precomputed metadata
/// so the tabu-search core never needs to touch the model to classify a move.
///
/// Invariants
/// ----------
/// - No duplicate variable id within `alterations`.
/// - Every target value lies within that variable's current bound (checked by
///   the generator's filter stage before the move ever reaches the evaluator).
#[derive(Debug, Clone)]
pub struct Move {
    alterations: SmallVec<[Alteration; 4]>,
    related_constraints: SmallVec<[ConstraintID; 8]>,
    move_type: MoveType,
    is_univariable: bool,
    is_selection: bool,
    is_special: bool,
    is_available: bool,
    hash: u64,
    overlap_rate: f64,
}

impl Move {
    pub fn new(
        alterations: SmallVec<[Alteration; 4]>,
        related_constraints: SmallVec<[ConstraintID; 8]>,
        move_type: MoveType,
    ) -> Self {
        let is_univariable = alterations.len() == 1;
        let is_selection = matches!(move_type, MoveType::Selection);
        let is_special = !matches!(move_type, MoveType::Binary | MoveType::Integer);
        let hash = alterations
            .iter()
            .fold(0u64, |acc, (var, _)| acc ^ (var.0 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Move {
            alterations,
            related_constraints,
            move_type,
            is_univariable,
            is_selection,
            is_special,
            is_available: true,
            hash,
            overlap_rate: 1.0,
        }
    }

    pub fn alterations(&self) -> &[Alteration] {
        &self.alterations
    }

    pub fn related_constraints(&self) -> &[ConstraintID] {
        &self.related_constraints
    }

    pub fn move_type(&self) -> MoveType {
        self.move_type
    }

    pub fn is_univariable(&self) -> bool {
        self.is_univariable
    }

    pub fn is_selection(&self) -> bool {
        self.is_selection
    }

    pub fn is_special(&self) -> bool {
        self.is_special
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn set_available(&mut self, available: bool) {
        self.is_available = available;
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn overlap_rate(&self) -> f64 {
        self.overlap_rate
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableID> + '_ {
        self.alterations.iter().map(|&(v, _)| v)
    }

    /// Composes this move with `other` into a chain candidate. The hash is the XOR of
    /// variable pointers (ids); the overlap rate is the geometric mean of intersection
    /// over union of the two moves' related-constraint sets.
    pub fn compose_chain(&self, other: &Move) -> Move {
        let mut alterations = self.alterations.clone();
        alterations.extend(other.alterations.iter().copied());

        let mut related: Vec<ConstraintID> = self
            .related_constraints
            .iter()
            .chain(other.related_constraints.iter())
            .copied()
            .collect();
        related.sort_by_key(|c| c.0);
        related.dedup();

        let a: std::collections::BTreeSet<_> = self.related_constraints.iter().map(|c| c.0).collect();
        let b: std::collections::BTreeSet<_> = other.related_constraints.iter().map(|c| c.0).collect();
        let intersection = a.intersection(&b).count() as f64;
        let union = a.union(&b).count().max(1) as f64;
        let overlap_rate = (intersection / union).sqrt();

        let mut m = Move::new(alterations, related.into(), MoveType::Chain);
        m.hash = self.hash ^ other.hash;
        m.overlap_rate = overlap_rate;
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: u32) -> VariableID {
        VariableID::from(i)
    }
    fn c(i: u32) -> ConstraintID {
        ConstraintID::from(i)
    }

    #[test]
    fn chain_hash_is_xor_of_components() {
        let m1 = Move::new(smallvec::smallvec![(v(0), 1)], smallvec::smallvec![c(0)], MoveType::Binary);
        let m2 = Move::new(smallvec::smallvec![(v(1), 1)], smallvec::smallvec![c(1)], MoveType::Binary);
        let chained = m1.compose_chain(&m2);
        assert_eq!(chained.hash(), m1.hash() ^ m2.hash());
        assert_eq!(chained.alterations().len(), 2);
    }

    #[test]
    fn overlap_rate_is_one_for_identical_related_sets() {
        let m1 = Move::new(smallvec::smallvec![(v(0), 1)], smallvec::smallvec![c(0), c(1)], MoveType::Binary);
        let m2 = Move::new(smallvec::smallvec![(v(1), 1)], smallvec::smallvec![c(0), c(1)], MoveType::Binary);
        let chained = m1.compose_chain(&m2);
        assert!((chained.overlap_rate() - 1.0).abs() < 1e-9);
    }
}
