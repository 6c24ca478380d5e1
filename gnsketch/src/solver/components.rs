//! Splits a system of constraints into connected components.
//! Two constraints are connected if they share a variable.
//! Components share no variables, so each can be solved on its own.

use indexmap::IndexMap;

use crate::{Constraint, Id};

/// Group the constraints into connected components.
/// Each component is a list of indices into `constraints`.
///
/// Components are ordered by their first constraint's position in the input.
/// Within a component, constraints are in depth-first preorder starting from that
/// first constraint. Neighbours are visited in the order of the constraint's variables,
/// and for each variable, in the order constraints referencing it were given.
pub(crate) fn connected_components(constraints: &[Constraint]) -> Vec<Vec<usize>> {
    // Which constraints use each variable?
    let mut constraints_using: IndexMap<Id, Vec<usize>> = IndexMap::new();
    let mut vars = Vec::with_capacity(super::NONZEROES_PER_ROW);
    for (i, constraint) in constraints.iter().enumerate() {
        vars.clear();
        constraint.nonzeroes(&mut vars);
        for var in &vars {
            let users = constraints_using.entry(*var).or_default();
            // A constraint can mention the same variable twice, but should only be listed once.
            if users.last() != Some(&i) {
                users.push(i);
            }
        }
    }

    let mut visited = vec![false; constraints.len()];
    let mut components = Vec::new();
    let mut stack = Vec::new();
    let mut neighbours = Vec::new();

    for start in 0..constraints.len() {
        if visited[start] {
            continue;
        }
        let mut component = Vec::new();
        stack.push(start);
        while let Some(current) = stack.pop() {
            if visited[current] {
                continue;
            }
            visited[current] = true;
            component.push(current);

            vars.clear();
            constraints[current].nonzeroes(&mut vars);
            neighbours.clear();
            for var in &vars {
                neighbours.extend(
                    constraints_using[var]
                        .iter()
                        .copied()
                        .filter(|n| !visited[*n]),
                );
            }
            // Pushing in reverse means the first neighbour is popped first,
            // which visits constraints in the same order as a recursive search would.
            stack.extend(neighbours.iter().rev().copied());
        }
        components.push(component);
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::DatumPoint;

    fn p(x: Id) -> DatumPoint {
        DatumPoint::new_xy(x, x + 1)
    }

    #[test]
    fn empty() {
        assert!(connected_components(&[]).is_empty());
    }

    #[test]
    fn disjoint_constraints_are_separate_components() {
        let constraints = [
            Constraint::Fixed(0, 1.0),
            Constraint::Fixed(1, 1.0),
            Constraint::Equal(0, 2),
        ];
        assert_eq!(connected_components(&constraints), vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn depth_first_preorder() {
        // 0 links a-b, 1 links c-d, 2 links b-c, 3 links a-e.
        // From 0: variables of a lead to 3, variables of b lead to 2, which leads to 1.
        // Recursion visits 0, 3 (via a), then 2 (via b), then 1 (via c).
        let (a, b, c, d, e) = (p(0), p(2), p(4), p(6), p(8));
        let constraints = [
            Constraint::FixedDistance(a, b, 1.0),
            Constraint::FixedDistance(c, d, 1.0),
            Constraint::FixedDistance(b, c, 1.0),
            Constraint::FixedDistance(a, e, 1.0),
        ];
        assert_eq!(connected_components(&constraints), vec![vec![0, 3, 2, 1]]);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let constraints: Vec<_> = (0..100_000).map(|i| Constraint::Equal(i, i + 1)).collect();
        let components = connected_components(&constraints);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0], (0..100_000).collect::<Vec<_>>());
    }
}
