use crate::grid::Grid;
use crate::rule::RuleTable;

use super::state::{State, evolve_adjacent};
use super::{Family, Variant};

/// Totalistique 3 couleurs : la table est indexée par la somme du voisinage (0..=6).
#[derive(Clone, Debug)]
pub struct Totalistic {
    state: State,
}

impl Totalistic {
    pub(crate) fn from_state(state: State) -> Self {
        Self { state }
    }
}

impl Variant for Totalistic {
    const FAMILY: Family = Family::Totalistic;

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    #[inline]
    fn evolve(grid: &mut Grid, rule: &RuleTable) {
        evolve_adjacent(grid, rule);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::automaton::Automaton;
    use crate::palette::Palette;
    use crate::seed::SeedBuilder;

    use super::*;

    fn code(number: u64, pattern: &str, width: usize) -> Automaton {
        let rule = RuleTable::manual(number, Family::Totalistic.rule_shape()).unwrap();
        let seed = SeedBuilder::new(3, 1, width, 80).unwrap().pattern(pattern).unwrap();
        Automaton::new(
            Family::Totalistic,
            rule,
            &seed,
            Duration::from_millis(100),
            Palette::for_base(3),
        )
        .unwrap()
    }

    #[test]
    fn code_1599_first_generations() {
        let mut ca = code(1599, "1", 9);
        ca.step();
        assert_eq!(ca.rows().1, &[0, 0, 0, 2, 2, 2, 0, 0, 0]);
        ca.step();
        assert_eq!(ca.rows().1, &[0, 0, 0, 1, 2, 1, 0, 0, 0]);
    }

    #[test]
    fn neighborhood_order_does_not_matter() {
        // 2+1+0 et 0+1+2 tombent sur la même entrée.
        let mut left = code(1635, "210", 11);
        let mut right = code(1635, "012", 11);
        left.step();
        right.step();
        let (_, l) = left.rows();
        let (_, r) = right.rows();
        assert_eq!(l[5], r[5]);
    }

    #[test]
    fn symbols_stay_in_base() {
        let mut ca = code(777, "1021201", 31);
        for _ in 0..50 {
            ca.step();
            assert!(ca.rows().1.iter().all(|&s| s < 3));
        }
    }
}
