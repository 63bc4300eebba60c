use crate::error::CoreError;
use crate::grid::Grid;
use crate::rule::RuleTable;

use super::state::State;
use super::{Family, Variant};

/// Automate réversible du second ordre.
///
/// The grid keeps three rows: two generations back, previous, newest. A new
/// cell reads `(two_back[i], previous[i-1], previous[i], previous[i+1])`, the
/// cell two generations back being the most significant digit. A table whose
/// upper half is the complement of its lower half computes
/// `f(previous) xor two_back`, which is what makes time reversal possible.
#[derive(Clone, Debug)]
pub struct Reversible {
    state: State,
}

impl Reversible {
    pub(crate) fn from_state(state: State) -> Self {
        Self { state }
    }

    /// Inverse le sens du temps.
    ///
    /// Swapping the two newest rows and stepping once regenerates the
    /// generation that came before them; from then on the automaton
    /// retraces its history. Counts as two steps so the render cadence is
    /// preserved.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidModification` while paused.
    pub fn reverse(&mut self) -> Result<(), CoreError> {
        if !self.state.running {
            return Err(CoreError::InvalidModification(
                "inversion impossible : automate en pause".into(),
            ));
        }
        let height = self.state.grid.height();
        self.state.grid.swap_rows(height - 2, height - 1)?;
        self.state.steps += 1;
        self.step();
        log::debug!("Sens du temps inversé (pas {})", self.state.steps);
        Ok(())
    }
}

impl Variant for Reversible {
    const FAMILY: Family = Family::Reversible;

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn evolve(grid: &mut Grid, rule: &RuleTable) {
        let width = grid.width();
        let (history, newest) = grid.split_history_mut();
        if history.len() < 2 * width {
            return;
        }
        let (two_back, previous) = history.split_at(history.len() - width);
        let two_back = &two_back[two_back.len() - width..];
        for i in 1..width.saturating_sub(1) {
            let neighborhood = [two_back[i], previous[i - 1], previous[i], previous[i + 1]];
            newest[i] = rule.apply(&neighborhood);
        }
    }
}
