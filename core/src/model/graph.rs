use crate::{ConstraintID, VariableID};

/// Reverse variable-to-constraint dependency graph, stored CSR-style (offsets
/// plus a flat neighbor array) so that looking up "related constraints" for a
/// move's altered variables stays cache-friendly and allocation-free on the hot path.
///
/// Per design note: this replaces a pointer/graph-library representation (the teacher
/// crate uses `petgraph::graphmap::DiGraphMap` for a comparable but much smaller
/// substitution-order graph) because the search evaluates this structure once per
/// candidate move, millions of times per solve.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    offsets: Vec<u32>,
    neighbors: Vec<ConstraintID>,
    in_objective: Vec<bool>,
}

impl DependencyGraph {
    /// Builds the graph from, for each constraint, the variables appearing in its expression.
    pub fn build(
        num_variables: usize,
        constraint_variables: impl IntoIterator<Item = (ConstraintID, Vec<VariableID>)>,
        objective_variables: impl IntoIterator<Item = VariableID>,
    ) -> Self {
        let mut adjacency: Vec<Vec<ConstraintID>> = vec![Vec::new(); num_variables];
        for (constraint_id, variables) in constraint_variables {
            for var in variables {
                adjacency[var.index()].push(constraint_id);
            }
        }
        let mut in_objective = vec![false; num_variables];
        for var in objective_variables {
            in_objective[var.index()] = true;
        }

        let mut offsets = Vec::with_capacity(num_variables + 1);
        let mut neighbors = Vec::new();
        offsets.push(0u32);
        for list in adjacency.iter_mut() {
            list.sort_by_key(|c| c.0);
            list.dedup();
            neighbors.extend_from_slice(list);
            offsets.push(neighbors.len() as u32);
        }

        DependencyGraph {
            offsets,
            neighbors,
            in_objective,
        }
    }

    pub fn constraints_of(&self, var: VariableID) -> &[ConstraintID] {
        let start = self.offsets[var.index()] as usize;
        let end = self.offsets[var.index() + 1] as usize;
        &self.neighbors[start..end]
    }

    pub fn is_in_objective(&self, var: VariableID) -> bool {
        self.in_objective.get(var.index()).copied().unwrap_or(false)
    }

    /// Union of related constraints for a set of altered variables, deduplicated and sorted.
    pub fn related_constraints(&self, vars: impl IntoIterator<Item = VariableID>) -> Vec<ConstraintID> {
        let mut out: Vec<ConstraintID> = vars
            .into_iter()
            .flat_map(|v| self.constraints_of(v).iter().copied())
            .collect();
        out.sort_by_key(|c| c.0);
        out.dedup();
        out
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
    fn lookup_returns_only_referencing_constraints() {
        let graph = DependencyGraph::build(
            3,
            vec![
                (c(0), vec![v(0), v(1)]),
                (c(1), vec![v(1), v(2)]),
            ],
            vec![v(0)],
        );
        assert_eq!(graph.constraints_of(v(0)), &[c(0)]);
        assert_eq!(graph.constraints_of(v(1)), &[c(0), c(1)]);
        assert_eq!(graph.constraints_of(v(2)), &[c(1)]);
        assert!(graph.is_in_objective(v(0)));
        assert!(!graph.is_in_objective(v(1)));
    }

    #[test]
    fn related_constraints_dedupe_across_variables() {
        let graph = DependencyGraph::build(
            2,
            vec![(c(0), vec![v(0), v(1)])],
            vec![],
        );
        assert_eq!(graph.related_constraints([v(0), v(1)]), vec![c(0)]);
    }
}
