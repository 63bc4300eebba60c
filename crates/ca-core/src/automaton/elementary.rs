use crate::grid::Grid;
use crate::rule::RuleTable;

use super::state::{State, evolve_adjacent};
use super::{Family, Variant};

/// Automate élémentaire : base 2, voisinage gauche/centre/droite.
#[derive(Clone, Debug)]
pub struct Elementary {
    state: State,
}

impl Elementary {
    pub(crate) fn from_state(state: State) -> Self {
        Self { state }
    }
}

impl Variant for Elementary {
    const FAMILY: Family = Family::Elementary;

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
