use std::time::Duration;

use crate::error::CoreError;
use crate::grid::{Grid, Symbol};
use crate::palette::Palette;
use crate::rule::RuleTable;
use crate::seed::Seed;

use super::{Family, Modification};

/// Première ligne de la grille recevant le seed ; la ligne 0 reste vide.
pub const SEED_START_ROW: usize = 1;

/// État partagé par toutes les familles : grille, règle, cadence, palette.
#[derive(Clone, Debug)]
pub struct State {
    pub(crate) grid: Grid,
    pub(crate) rule: RuleTable,
    pub(crate) steps: u64,
    pub(crate) running: bool,
    pub(crate) delay: Duration,
    pub(crate) palette: Palette,
}

impl State {
    /// Validate the resolved values against `family` and seed a fresh grid.
    pub(crate) fn new(
        family: Family,
        rule: RuleTable,
        seed: &Seed,
        delay: Duration,
        palette: Palette,
    ) -> Result<Self, CoreError> {
        if rule.shape() != family.rule_shape() {
            return Err(CoreError::InvalidRule(format!(
                "la règle fournie ({} entrées, base {}) ne convient pas à {}",
                rule.shape().len(),
                rule.shape().base,
                family.name()
            )));
        }
        if seed.base() != family.base() || seed.rows().len() != family.seed_rows() {
            return Err(CoreError::InvalidSeed(format!(
                "{} attend {} ligne(s) en base {}",
                family.name(),
                family.seed_rows(),
                family.base()
            )));
        }
        if delay.is_zero() {
            return Err(CoreError::Config("le délai doit être > 0".into()));
        }
        if palette.len() != usize::from(family.base()) {
            return Err(CoreError::Config(format!(
                "palette de {} couleurs pour une base {}",
                palette.len(),
                family.base()
            )));
        }

        let mut grid = Grid::new(family.history_rows(), seed.width());
        for (offset, row) in seed.rows().iter().enumerate() {
            for (col, &symbol) in row.iter().enumerate() {
                grid.set(SEED_START_ROW + offset, col, symbol)?;
            }
        }

        Ok(Self {
            grid,
            rule,
            steps: 0,
            running: true,
            delay,
            palette,
        })
    }

    /// Shift the history, count the step and pin the edge cells of the new row.
    ///
    /// Returns `false` (and does nothing) while paused.
    pub(crate) fn begin_step(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.grid.shift_back();
        self.steps += 1;
        pin_edges(&mut self.grid);
        true
    }

    /// (previous row, current row).
    pub(crate) fn rows(&self) -> (&[Symbol], &[Symbol]) {
        let height = self.grid.height();
        let previous = self.grid.row(height.saturating_sub(2)).unwrap_or(&[]);
        let newest = self.grid.row(height.saturating_sub(1)).unwrap_or(&[]);
        (previous, newest)
    }

    /// Modifications communes à toutes les familles.
    pub(crate) fn apply_common(&mut self, modification: Modification) -> Result<(), CoreError> {
        match modification {
            Modification::SetColor { index, color } => self.palette.set(index, color),
            Modification::SetAllColors(colors) => self.palette.set_all(&colors),
            Modification::SetDelay(ms) => {
                let millis = u64::try_from(ms)
                    .ok()
                    .filter(|&m| m > 0)
                    .ok_or_else(|| CoreError::InvalidModification(format!("délai {ms} ≤ 0")))?;
                self.delay = Duration::from_millis(millis);
                Ok(())
            }
            Modification::SetRunning(Some(run)) => {
                self.running = run;
                Ok(())
            }
            Modification::SetRunning(None) => {
                self.running = !self.running;
                Ok(())
            }
            Modification::Reverse => Err(CoreError::InvalidModification(
                "seuls les automates réversibles peuvent être inversés".into(),
            )),
        }
    }
}

/// Bords fixes : la nouvelle ligne reprend les cellules extrêmes de la ligne 0.
fn pin_edges(grid: &mut Grid) {
    let width = grid.width();
    if width == 0 {
        return;
    }
    let (history, newest) = grid.split_history_mut();
    newest[0] = history[0];
    newest[width - 1] = history[width - 1];
}

/// Évolution à voisinage 3 sur la seule ligne d'historique précédente.
///
/// Shared by the elementary and totalistic families; the rule's encoding
/// decides how the window is indexed.
pub(crate) fn evolve_adjacent(grid: &mut Grid, rule: &RuleTable) {
    let width = grid.width();
    let (history, newest) = grid.split_history_mut();
    let Some(previous) = history.get(history.len().saturating_sub(width)..) else {
        return;
    };
    for (i, window) in previous.windows(3).enumerate() {
        newest[i + 1] = rule.apply(window);
    }
}
