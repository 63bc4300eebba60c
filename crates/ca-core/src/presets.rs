use crate::automaton::Family;
use crate::error::CoreError;
use crate::grid::Symbol;
use crate::rule::RuleTable;
use crate::seed::{Column, SeedCell, SeedTemplate, TemplateKind};

/// Entrée de menu ouvrant la saisie d'un numéro de règle.
pub const MANUAL_RULE: &str = "Manual Rule";
/// Entrée de menu ouvrant l'éditeur de seed.
pub const MANUAL_SEED: &str = "Manual Seed";
/// Entrée de menu ouvrant la saisie d'un délai en millisecondes.
pub const MANUAL_DELAY: &str = "Manual Delay";

/// Règle nommée : table littérale, index 0 en tête.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedRule {
    pub name: &'static str,
    pub digits: &'static [Symbol],
}

/// Délai nommé entre deux images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedDelay {
    pub name: &'static str,
    pub millis: u64,
}

const ELEMENTARY_RULES: &[NamedRule] = &[
    NamedRule { name: "Rule 30", digits: &[0, 1, 1, 1, 1, 0, 0, 0] },
    NamedRule { name: "Rule 90", digits: &[0, 1, 0, 1, 1, 0, 1, 0] },
    NamedRule { name: "Rule 102", digits: &[0, 1, 1, 0, 0, 1, 1, 0] },
    NamedRule { name: "Rule 110", digits: &[0, 1, 1, 1, 0, 1, 1, 0] },
    NamedRule { name: "Rule 150", digits: &[0, 1, 1, 0, 1, 0, 0, 1] },
];

// Lower half: the elementary rule. Upper half: its complement.
const REVERSIBLE_RULES: &[NamedRule] = &[
    NamedRule {
        name: "Rule 90R",
        digits: &[0, 1, 0, 1, 1, 0, 1, 0, 1, 0, 1, 0, 0, 1, 0, 1],
    },
    NamedRule {
        name: "Rule 150R",
        digits: &[0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0],
    },
    NamedRule {
        name: "Rule 214R",
        digits: &[0, 1, 1, 0, 1, 0, 1, 1, 1, 0, 0, 1, 0, 1, 0, 0],
    },
];

const TOTALISTIC_RULES: &[NamedRule] = &[
    NamedRule { name: "Code 777", digits: &[0, 1, 2, 1, 0, 0, 1] },
    NamedRule { name: "Code 1599", digits: &[0, 2, 0, 2, 1, 0, 2] },
    NamedRule { name: "Code 1635", digits: &[0, 2, 1, 0, 2, 0, 2] },
];

const RANDOM: SeedTemplate = SeedTemplate {
    name: "Random",
    kind: TemplateKind::Random,
};

const ELEMENTARY_SEEDS: &[SeedTemplate] = &[
    SeedTemplate {
        name: "Single Left",
        kind: TemplateKind::Cells(&[SeedCell::new(0, Column::At(0), 1)]),
    },
    SeedTemplate {
        name: "Single Middle",
        kind: TemplateKind::Cells(&[SeedCell::new(0, Column::Middle, 1)]),
    },
    SeedTemplate {
        name: "Single Right",
        kind: TemplateKind::Cells(&[SeedCell::new(0, Column::Last, 1)]),
    },
    RANDOM,
];

const REVERSIBLE_SEEDS: &[SeedTemplate] = &[
    SeedTemplate {
        name: "Single Middle",
        kind: TemplateKind::Cells(&[SeedCell::new(1, Column::Middle, 1)]),
    },
    SeedTemplate {
        name: "Twin Middle",
        kind: TemplateKind::Cells(&[
            SeedCell::new(0, Column::Middle, 1),
            SeedCell::new(1, Column::Middle, 1),
        ]),
    },
    RANDOM,
];

const TOTALISTIC_SEEDS: &[SeedTemplate] = &[
    SeedTemplate {
        name: "Single Middle (1)",
        kind: TemplateKind::Cells(&[SeedCell::new(0, Column::Middle, 1)]),
    },
    SeedTemplate {
        name: "Single Middle (2)",
        kind: TemplateKind::Cells(&[SeedCell::new(0, Column::Middle, 2)]),
    },
    RANDOM,
];

const DELAYS: &[NamedDelay] = &[
    NamedDelay { name: "Very Fast (25ms)", millis: 25 },
    NamedDelay { name: "Fast (50ms)", millis: 50 },
    NamedDelay { name: "Medium (100ms)", millis: 100 },
    NamedDelay { name: "Slow (150ms)", millis: 150 },
    NamedDelay { name: "Very Slow (200ms)", millis: 200 },
];

/// Menus d'une famille.
#[derive(Clone, Debug)]
struct FamilyPresets {
    rules: Vec<NamedRule>,
    seeds: Vec<SeedTemplate>,
}

/// Contenu immuable des menus : règles, seeds et délais nommés.
///
/// Built once at startup and handed to the resolver.
///
/// # Example
/// ```
/// use ca_core::automaton::Family;
/// use ca_core::presets::Presets;
/// let presets = Presets::builtin();
/// let rule = presets.rule(Family::Elementary, "rule 110").unwrap();
/// assert_eq!(rule.number(), 110);
/// assert_eq!(presets.rule_options(Family::Totalistic).last(), Some(&"Manual Rule"));
/// ```
#[derive(Clone, Debug)]
pub struct Presets {
    elementary: FamilyPresets,
    reversible: FamilyPresets,
    totalistic: FamilyPresets,
    delays: Vec<NamedDelay>,
}

impl Presets {
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            elementary: FamilyPresets {
                rules: ELEMENTARY_RULES.to_vec(),
                seeds: ELEMENTARY_SEEDS.to_vec(),
            },
            reversible: FamilyPresets {
                rules: REVERSIBLE_RULES.to_vec(),
                seeds: REVERSIBLE_SEEDS.to_vec(),
            },
            totalistic: FamilyPresets {
                rules: TOTALISTIC_RULES.to_vec(),
                seeds: TOTALISTIC_SEEDS.to_vec(),
            },
            delays: DELAYS.to_vec(),
        }
    }

    fn family(&self, family: Family) -> &FamilyPresets {
        match family {
            Family::Elementary => &self.elementary,
            Family::Reversible => &self.reversible,
            Family::Totalistic => &self.totalistic,
        }
    }

    #[must_use]
    pub fn rules(&self, family: Family) -> &[NamedRule] {
        &self.family(family).rules
    }

    #[must_use]
    pub fn seeds(&self, family: Family) -> &[SeedTemplate] {
        &self.family(family).seeds
    }

    /// Build a named rule. Names compare case-insensitively.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidRule` for an unknown name.
    pub fn rule(&self, family: Family, name: &str) -> Result<RuleTable, CoreError> {
        let named = self
            .rules(family)
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| {
                CoreError::InvalidRule(format!("aucune règle « {name} » pour {}", family.name()))
            })?;
        RuleTable::named(named.name, named.digits, family.rule_shape())
    }

    /// Seed template by name, case-insensitive.
    #[must_use]
    pub fn seed(&self, family: Family, name: &str) -> Option<&SeedTemplate> {
        self.seeds(family)
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Delay preset by name, case-insensitive.
    #[must_use]
    pub fn delay(&self, name: &str) -> Option<&NamedDelay> {
        self.delays
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Rule menu: presets then [`MANUAL_RULE`].
    #[must_use]
    pub fn rule_options(&self, family: Family) -> Vec<&'static str> {
        self.rules(family)
            .iter()
            .map(|r| r.name)
            .chain(std::iter::once(MANUAL_RULE))
            .collect()
    }

    /// Seed menu: templates then [`MANUAL_SEED`].
    #[must_use]
    pub fn seed_options(&self, family: Family) -> Vec<&'static str> {
        self.seeds(family)
            .iter()
            .map(|s| s.name)
            .chain(std::iter::once(MANUAL_SEED))
            .collect()
    }

    /// Delay menu: presets then [`MANUAL_DELAY`].
    #[must_use]
    pub fn delay_options(&self) -> Vec<&'static str> {
        self.delays
            .iter()
            .map(|d| d.name)
            .chain(std::iter::once(MANUAL_DELAY))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_match_their_numbers() {
        let presets = Presets::builtin();
        for (family, name, number) in [
            (Family::Elementary, "Rule 30", 30),
            (Family::Elementary, "Rule 90", 90),
            (Family::Elementary, "Rule 102", 102),
            (Family::Elementary, "Rule 110", 110),
            (Family::Elementary, "Rule 150", 150),
            (Family::Totalistic, "Code 777", 777),
            (Family::Totalistic, "Code 1599", 1599),
            (Family::Totalistic, "Code 1635", 1635),
        ] {
            assert_eq!(presets.rule(family, name).unwrap().number(), number, "{name}");
        }
    }

    #[test]
    fn reversible_rules_are_elementary_plus_complement() {
        let presets = Presets::builtin();
        for named in presets.rules(Family::Reversible) {
            let (lower, upper) = named.digits.split_at(8);
            let elementary: String = named.name.trim_start_matches("Rule ").trim_end_matches('R').into();
            let number: u64 = elementary.parse().unwrap();
            let base = RuleTable::manual(number, Family::Elementary.rule_shape()).unwrap();
            assert_eq!(lower, base.as_slice(), "{}", named.name);
            for (lo, up) in lower.iter().zip(upper) {
                assert_eq!(lo ^ 1, *up, "{}", named.name);
            }
        }
    }

    #[test]
    fn every_preset_builds() {
        let presets = Presets::builtin();
        for family in Family::ALL {
            for named in presets.rules(family) {
                assert!(presets.rule(family, named.name).is_ok());
            }
            assert!(presets.seed(family, "random").is_some());
            assert_eq!(
                presets.seed_options(family).len(),
                presets.seeds(family).len() + 1
            );
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        let presets = Presets::builtin();
        assert!(matches!(
            presets.rule(Family::Elementary, "Rule 1599"),
            Err(CoreError::InvalidRule(_))
        ));
        assert!(presets.seed(Family::Totalistic, "Twin Middle").is_none());
        assert!(presets.delay("Ludicrous").is_none());
        assert_eq!(presets.delay("medium (100ms)").map(|d| d.millis), Some(100));
    }
}
