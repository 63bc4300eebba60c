//! Automates cellulaires 1D : trois familles derrière un même enum.

mod elementary;
mod reversible;
mod state;
mod totalistic;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use elementary::Elementary;
pub use reversible::Reversible;
pub use state::{SEED_START_ROW, State};
pub use totalistic::Totalistic;

use crate::error::CoreError;
use crate::grid::{Grid, Symbol};
use crate::palette::{Palette, Rgb};
use crate::rule::{Encoding, RuleShape, RuleTable};
use crate::seed::Seed;

/// Famille d'automate.
///
/// # Example
/// ```
/// use ca_core::automaton::Family;
/// assert_eq!(Family::Elementary.rule_shape().len(), 8);
/// assert_eq!(Family::Reversible.rule_shape().len(), 16);
/// assert_eq!(Family::Totalistic.rule_shape().len(), 7);
/// assert_eq!("reversible".parse::<Family>().unwrap(), Family::Reversible);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Family {
    /// Base 2, voisinage de 3 cellules.
    #[default]
    Elementary,
    /// Second ordre réversible : base 2, 3 cellules + la cellule deux pas en arrière.
    Reversible,
    /// Totalistique 3 couleurs : index = somme du voisinage.
    Totalistic,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Elementary, Family::Reversible, Family::Totalistic];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Family::Elementary => "Elementary",
            Family::Reversible => "Second-Order Reversible",
            Family::Totalistic => "Three-Colour Totalistic",
        }
    }

    #[must_use]
    pub fn base(self) -> u8 {
        match self {
            Family::Elementary | Family::Reversible => 2,
            Family::Totalistic => 3,
        }
    }

    #[must_use]
    pub fn rule_shape(self) -> RuleShape {
        match self {
            Family::Elementary => RuleShape::new(2, 3, Encoding::Positional),
            Family::Reversible => RuleShape::new(2, 4, Encoding::Positional),
            Family::Totalistic => RuleShape::new(3, 3, Encoding::Totalistic),
        }
    }

    /// Hauteur de la grille (historique conservé).
    #[must_use]
    pub fn history_rows(self) -> usize {
        match self {
            Family::Elementary | Family::Totalistic => 2,
            Family::Reversible => 3,
        }
    }

    /// Number of generations a seed provides.
    #[must_use]
    pub fn seed_rows(self) -> usize {
        self.history_rows() - SEED_START_ROW
    }

    /// `steps % 2` value on which a new pair of rows is ready to draw.
    ///
    /// Single-row seeds need one step before the first pair exists; the
    /// reversible seed already is a pair.
    #[must_use]
    pub fn render_parity(self) -> u64 {
        match self {
            Family::Elementary | Family::Totalistic => 1,
            Family::Reversible => 0,
        }
    }

    /// Nom lisible d'une règle : « Rule 110 », « Code 1599 », « Rule 150R ».
    ///
    /// A reversible table whose upper half is not the complement of its lower
    /// half has no elementary counterpart and is labelled by its table number.
    #[must_use]
    pub fn rule_label(self, rule: &RuleTable) -> String {
        match self {
            Family::Elementary => format!("Rule {}", rule.number()),
            Family::Totalistic => format!("Code {}", rule.number()),
            Family::Reversible => {
                let (lower, upper) = rule.as_slice().split_at(rule.as_slice().len() / 2);
                let complemented =
                    lower.len() == upper.len() && lower.iter().zip(upper).all(|(l, u)| l ^ 1 == *u);
                match RuleTable::from_digits(lower, Family::Elementary.rule_shape()) {
                    Ok(base) if complemented => format!("Rule {}R", base.number()),
                    _ => format!("Table {}", rule.number()),
                }
            }
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elementary" | "eca" => Ok(Family::Elementary),
            "reversible" | "second-order" | "second-order-reversible" => Ok(Family::Reversible),
            "totalistic" | "three-colour" | "three-color" => Ok(Family::Totalistic),
            other => Err(CoreError::Config(format!("famille inconnue : {other}"))),
        }
    }
}

/// Modification appliquée à un automate en cours d'exécution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Modification {
    /// Replace the color of one symbol.
    SetColor { index: usize, color: Rgb },
    /// Replace the whole palette; ignored on a length mismatch.
    SetAllColors(Vec<Rgb>),
    /// Delay between rendered frames in milliseconds; ignored when ≤ 0.
    SetDelay(i64),
    /// `Some(run)` sets the running flag, `None` toggles it.
    SetRunning(Option<bool>),
    /// Time reversal, reversible family only.
    Reverse,
}

/// Comportement propre à une famille ; le reste vit dans [`State`].
pub trait Variant {
    /// Family implemented by this variant.
    const FAMILY: Family;

    fn state(&self) -> &State;

    fn state_mut(&mut self) -> &mut State;

    /// Écrit les cellules intérieures de la dernière ligne.
    ///
    /// CONTRAT : l'historique est déjà décalé et les bords déjà fixés.
    fn evolve(grid: &mut Grid, rule: &RuleTable);

    /// One simulation step; no-op while paused.
    fn step(&mut self) {
        let state = self.state_mut();
        if state.begin_step() {
            Self::evolve(&mut state.grid, &state.rule);
        }
    }

    /// `true` when the two newest rows form a fresh drawable pair.
    fn should_render(&self) -> bool {
        let state = self.state();
        state.running && state.steps % 2 == Self::FAMILY.render_parity()
    }
}

/// Un automate prêt à tourner.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ca_core::automaton::{Automaton, Family};
/// use ca_core::palette::Palette;
/// use ca_core::rule::RuleTable;
/// use ca_core::seed::SeedBuilder;
///
/// let family = Family::Elementary;
/// let rule = RuleTable::manual(90, family.rule_shape()).unwrap();
/// let seed = SeedBuilder::new(2, 1, 9, 80).unwrap().pattern("1").unwrap();
/// let mut ca = Automaton::new(family, rule, &seed, Duration::from_millis(50), Palette::for_base(2)).unwrap();
/// ca.step();
/// assert!(ca.should_render());
/// let (previous, current) = ca.rows();
/// assert_eq!(previous, &[0, 0, 0, 0, 1, 0, 0, 0, 0]);
/// assert_eq!(current, &[0, 0, 0, 1, 0, 1, 0, 0, 0]);
/// ```
#[derive(Clone, Debug)]
pub enum Automaton {
    Elementary(Elementary),
    Reversible(Reversible),
    Totalistic(Totalistic),
}

impl Automaton {
    /// Build an automaton from already-resolved values.
    ///
    /// # Errors
    /// `InvalidRule` if the rule shape does not match `family`, `InvalidSeed`
    /// if the seed has the wrong base or row count, `Config` for a zero delay
    /// or a palette whose size differs from the base.
    pub fn new(
        family: Family,
        rule: RuleTable,
        seed: &Seed,
        delay: Duration,
        palette: Palette,
    ) -> Result<Self, CoreError> {
        let state = State::new(family, rule, seed, delay, palette)?;
        log::info!(
            "Automate {} créé : règle {}, largeur {}, délai {} ms",
            family.name(),
            state.rule.number(),
            state.grid.width(),
            state.delay.as_millis()
        );
        Ok(match family {
            Family::Elementary => Automaton::Elementary(Elementary::from_state(state)),
            Family::Reversible => Automaton::Reversible(Reversible::from_state(state)),
            Family::Totalistic => Automaton::Totalistic(Totalistic::from_state(state)),
        })
    }

    #[must_use]
    pub fn family(&self) -> Family {
        match self {
            Automaton::Elementary(_) => Elementary::FAMILY,
            Automaton::Reversible(_) => Reversible::FAMILY,
            Automaton::Totalistic(_) => Totalistic::FAMILY,
        }
    }

    fn state(&self) -> &State {
        match self {
            Automaton::Elementary(a) => a.state(),
            Automaton::Reversible(a) => a.state(),
            Automaton::Totalistic(a) => a.state(),
        }
    }

    fn state_mut(&mut self) -> &mut State {
        match self {
            Automaton::Elementary(a) => a.state_mut(),
            Automaton::Reversible(a) => a.state_mut(),
            Automaton::Totalistic(a) => a.state_mut(),
        }
    }

    /// Advance one generation. No-op while paused.
    pub fn step(&mut self) {
        match self {
            Automaton::Elementary(a) => a.step(),
            Automaton::Reversible(a) => a.step(),
            Automaton::Totalistic(a) => a.step(),
        }
    }

    #[must_use]
    pub fn should_render(&self) -> bool {
        match self {
            Automaton::Elementary(a) => a.should_render(),
            Automaton::Reversible(a) => a.should_render(),
            Automaton::Totalistic(a) => a.should_render(),
        }
    }

    /// (previous row, current row), the pair an external renderer draws.
    #[must_use]
    pub fn rows(&self) -> (&[Symbol], &[Symbol]) {
        self.state().rows()
    }

    /// Apply a modification, best effort: malformed or inapplicable
    /// modifications are logged and ignored.
    ///
    /// Returns whether the modification took effect.
    pub fn apply(&mut self, modification: Modification) -> bool {
        match self.try_apply(modification) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("{e}");
                false
            }
        }
    }

    /// Same as [`Automaton::apply`] but reports why a modification was refused.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidModification` for a refused modification.
    pub fn try_apply(&mut self, modification: Modification) -> Result<(), CoreError> {
        match (self, modification) {
            (Automaton::Reversible(a), Modification::Reverse) => a.reverse(),
            (this, other) => this.state_mut().apply_common(other),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.state().grid
    }

    #[must_use]
    pub fn rule(&self) -> &RuleTable {
        &self.state().rule
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.state().steps
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state().running
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.state().delay
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.state().palette
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.state().grid.width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BLACK, GRAY, WHITE};
    use crate::seed::SeedBuilder;

    #[test]
    fn rule_labels_are_readable() {
        let presets = crate::presets::Presets::builtin();
        let r150 = presets.rule(Family::Reversible, "Rule 150R").unwrap();
        assert_eq!(Family::Reversible.rule_label(&r150), "Rule 150R");
        let odd = RuleTable::manual(1, Family::Reversible.rule_shape()).unwrap();
        assert_eq!(Family::Reversible.rule_label(&odd), "Table 1");
        let code = presets.rule(Family::Totalistic, "Code 1599").unwrap();
        assert_eq!(Family::Totalistic.rule_label(&code), "Code 1599");
        let r110 = RuleTable::manual(110, Family::Elementary.rule_shape()).unwrap();
        assert_eq!(Family::Elementary.rule_label(&r110), "Rule 110");
    }

    fn build(family: Family, rule: u64, pattern: &str, width: usize) -> Automaton {
        let rule = RuleTable::manual(rule, family.rule_shape()).unwrap();
        let seed = SeedBuilder::new(family.base(), family.seed_rows(), width, 200)
            .unwrap()
            .pattern(pattern)
            .unwrap();
        Automaton::new(
            family,
            rule,
            &seed,
            Duration::from_millis(50),
            Palette::for_base(family.base()),
        )
        .unwrap()
    }

    #[test]
    fn construction_rejects_mismatched_rule() {
        let rule = RuleTable::manual(110, Family::Elementary.rule_shape()).unwrap();
        let seed = SeedBuilder::new(2, 2, 9, 80).unwrap().pattern("1/1").unwrap();
        let err = Automaton::new(
            Family::Reversible,
            rule,
            &seed,
            Duration::from_millis(50),
            Palette::for_base(2),
        );
        assert!(matches!(err, Err(CoreError::InvalidRule(_))));
    }

    #[test]
    fn construction_rejects_mismatched_seed_and_delay() {
        let family = Family::Elementary;
        let rule = RuleTable::manual(110, family.rule_shape()).unwrap();
        let two_rows = SeedBuilder::new(2, 2, 9, 80).unwrap().pattern("1/1").unwrap();
        assert!(matches!(
            Automaton::new(family, rule.clone(), &two_rows, Duration::from_millis(5), Palette::for_base(2)),
            Err(CoreError::InvalidSeed(_))
        ));
        let one_row = SeedBuilder::new(2, 1, 9, 80).unwrap().pattern("1").unwrap();
        assert!(Automaton::new(family, rule, &one_row, Duration::ZERO, Palette::for_base(2)).is_err());
    }

    #[test]
    fn edges_stay_pinned_for_every_family() {
        for (family, rule, pattern) in [
            (Family::Elementary, 30, "1000000000001"),
            (Family::Reversible, 0b1001_0110_0110_1001, "1000000000001/1000000010001"),
            (Family::Totalistic, 1599, "2000000100002"),
        ] {
            let mut ca = build(family, rule, pattern, 13);
            for _ in 0..40 {
                ca.step();
                let grid = ca.grid();
                let last = grid.height() - 1;
                assert_eq!(grid.get(last, 0).unwrap(), grid.get(0, 0).unwrap(), "{family}");
                assert_eq!(grid.get(last, 12).unwrap(), grid.get(0, 12).unwrap(), "{family}");
            }
        }
    }

    #[test]
    fn paused_automaton_does_not_step() {
        let mut ca = build(Family::Elementary, 110, "1", 9);
        assert!(ca.apply(Modification::SetRunning(Some(false))));
        let before = ca.grid().clone();
        ca.step();
        assert_eq!(ca.steps(), 0);
        assert_eq!(ca.grid(), &before);
        assert!(!ca.should_render());
        assert!(ca.apply(Modification::SetRunning(None)));
        ca.step();
        assert_eq!(ca.steps(), 1);
        assert!(ca.should_render());
    }

    #[test]
    fn render_cadence_follows_family() {
        let mut elementary = build(Family::Elementary, 110, "1", 9);
        let mut reversible = build(Family::Reversible, 0, "1/1", 9);
        assert!(!elementary.should_render());
        assert!(reversible.should_render());
        for step in 1..=6u64 {
            elementary.step();
            reversible.step();
            assert_eq!(elementary.should_render(), step % 2 == 1);
            assert_eq!(reversible.should_render(), step % 2 == 0);
        }
    }

    #[test]
    fn modifications_are_best_effort() {
        let mut ca = build(Family::Totalistic, 777, "1", 9);
        let before = ca.palette().clone();
        assert!(!ca.apply(Modification::SetAllColors(vec![BLACK, WHITE])));
        assert_eq!(ca.palette(), &before);
        assert!(ca.apply(Modification::SetAllColors(vec![BLACK, GRAY, WHITE])));
        assert_eq!(ca.palette().color(0), BLACK);

        assert!(!ca.apply(Modification::SetColor { index: 3, color: GRAY }));
        assert!(ca.apply(Modification::SetColor { index: 2, color: GRAY }));
        assert_eq!(ca.palette().color(2), GRAY);

        assert!(!ca.apply(Modification::SetDelay(0)));
        assert!(!ca.apply(Modification::SetDelay(-20)));
        assert_eq!(ca.delay(), Duration::from_millis(50));
        assert!(ca.apply(Modification::SetDelay(120)));
        assert_eq!(ca.delay(), Duration::from_millis(120));

        assert!(matches!(
            ca.try_apply(Modification::Reverse),
            Err(CoreError::InvalidModification(_))
        ));
    }
}
