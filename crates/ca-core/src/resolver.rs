//! Turns user selections into a validated rule, seed and delay.
//!
//! Values given up front (command line, config file) are checked once and
//! fail loudly. Values read through a [`Prompter`] are re-asked until valid.

use std::time::Duration;

use anyhow::{Result, bail};

use crate::automaton::Family;
use crate::error::CoreError;
use crate::presets::{MANUAL_DELAY, MANUAL_RULE, MANUAL_SEED, Presets};
use crate::rule::RuleTable;
use crate::seed::{Seed, SeedBuilder, SeedEditor};

/// Plus long délai accepté en saisie manuelle (ms).
pub const MAX_DELAY_MS: u64 = 10_000;

/// Surface de saisie fournie par la couche d'affichage.
pub trait Prompter {
    /// Show `options` and return the chosen index.
    ///
    /// # Errors
    /// Device failure or user abort.
    fn choose(&mut self, prompt: &str, options: &[&str]) -> Result<usize>;

    /// Read a number in `[0, max]`.
    ///
    /// # Errors
    /// Device failure or user abort.
    fn number(&mut self, prompt: &str, max: u64) -> Result<u64>;

    /// Drive `editor` until the user confirms, then return the seed.
    ///
    /// # Errors
    /// Device failure or user abort.
    fn edit_seed(&mut self, editor: SeedEditor) -> Result<Seed>;

    /// Arrows and digits cannot be entered at the same time.
    fn reduced_input(&self) -> bool {
        false
    }
}

/// Rule source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RuleChoice {
    /// Preset name.
    Named(String),
    /// Decimal rule number.
    Number(u64),
    /// Ask through the prompter.
    #[default]
    Prompt,
}

/// Seed source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SeedChoice {
    /// Template name.
    Named(String),
    /// Dense pattern, rows separated by `/`.
    Pattern(String),
    #[default]
    Prompt,
}

/// Delay source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DelayChoice {
    Named(String),
    Millis(u64),
    #[default]
    Prompt,
}

/// Valeurs résolues, prêtes pour `Automaton::new`.
#[derive(Clone, Debug)]
pub struct Resolved {
    pub family: Family,
    pub rule: RuleTable,
    pub seed: Seed,
    pub delay: Duration,
}

/// Résout règle, seed et délai pour une famille et une largeur données.
pub struct Resolver<'a> {
    presets: &'a Presets,
    family: Family,
    width: usize,
    display_width: usize,
    random_seed: Option<u64>,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(presets: &'a Presets, family: Family, width: usize, display_width: usize) -> Self {
        Self {
            presets,
            family,
            width,
            display_width,
            random_seed: None,
        }
    }

    /// Seed the `Random` template's generator.
    #[must_use]
    pub fn with_random_seed(mut self, seed: Option<u64>) -> Self {
        self.random_seed = seed;
        self
    }

    /// Ask which family to run.
    ///
    /// # Errors
    /// Propagates prompter failures.
    pub fn choose_family(prompter: &mut dyn Prompter) -> Result<Family> {
        let names: Vec<&str> = Family::ALL.iter().map(|f| f.name()).collect();
        loop {
            let index = prompter.choose("Automaton", &names)?;
            if let Some(&family) = Family::ALL.get(index) {
                return Ok(family);
            }
            log::warn!("Choix {index} hors menu, nouvelle saisie");
        }
    }

    /// Resolve everything in the usual order: rule, seed, delay.
    ///
    /// # Errors
    /// A direct choice that fails validation, or a prompter failure.
    pub fn resolve(
        &self,
        rule: &RuleChoice,
        seed: &SeedChoice,
        delay: &DelayChoice,
        prompter: &mut dyn Prompter,
    ) -> Result<Resolved> {
        let rule = self.rule(rule, prompter)?;
        let seed = self.seed(seed, prompter)?;
        let delay = self.delay(delay, prompter)?;
        Ok(Resolved {
            family: self.family,
            rule,
            seed,
            delay,
        })
    }

    /// # Errors
    /// `InvalidRule` for a bad direct choice, or a prompter failure.
    pub fn rule(&self, choice: &RuleChoice, prompter: &mut dyn Prompter) -> Result<RuleTable> {
        let shape = self.family.rule_shape();
        match choice {
            RuleChoice::Named(name) => Ok(self.presets.rule(self.family, name)?),
            RuleChoice::Number(n) => Ok(RuleTable::manual(*n, shape)?),
            RuleChoice::Prompt => {
                let options = self.presets.rule_options(self.family);
                loop {
                    let attempt = match options.get(prompter.choose("Rule", &options)?) {
                        Some(&MANUAL_RULE) => {
                            let max = shape.max_number();
                            let n = prompter.number(&format!("Rule number (0-{max})"), max)?;
                            RuleTable::manual(n, shape)
                        }
                        Some(name) => self.presets.rule(self.family, name),
                        None => Err(CoreError::InvalidRule("choix hors menu".into())),
                    };
                    match attempt {
                        Ok(rule) => return Ok(rule),
                        Err(e) => log::warn!("{e}, nouvelle saisie"),
                    }
                }
            }
        }
    }

    fn builder(&self) -> Result<SeedBuilder, CoreError> {
        SeedBuilder::new(
            self.family.base(),
            self.family.seed_rows(),
            self.width,
            self.display_width,
        )
    }

    /// # Errors
    /// `InvalidSeed` when the width does not fit or a direct choice is
    /// malformed, or a prompter failure.
    pub fn seed(&self, choice: &SeedChoice, prompter: &mut dyn Prompter) -> Result<Seed> {
        let builder = self.builder()?;
        match choice {
            SeedChoice::Named(name) => {
                let Some(template) = self.presets.seed(self.family, name) else {
                    bail!(CoreError::InvalidSeed(format!(
                        "aucun seed « {name} » pour {}",
                        self.family.name()
                    )));
                };
                Ok(builder.template(template, self.random_seed)?)
            }
            SeedChoice::Pattern(text) => Ok(builder.pattern(text)?),
            SeedChoice::Prompt => {
                let options = self.presets.seed_options(self.family);
                loop {
                    let index = prompter.choose("Seed", &options)?;
                    let attempt = match options.get(index) {
                        Some(&MANUAL_SEED) => {
                            let editor = builder.editor(prompter.reduced_input());
                            return prompter.edit_seed(editor);
                        }
                        Some(name) => match self.presets.seed(self.family, name) {
                            Some(template) => builder.template(template, self.random_seed),
                            None => Err(CoreError::InvalidSeed(format!("seed « {name} » inconnu"))),
                        },
                        None => Err(CoreError::InvalidSeed("choix hors menu".into())),
                    };
                    match attempt {
                        Ok(seed) => return Ok(seed),
                        Err(e) => log::warn!("{e}, nouvelle saisie"),
                    }
                }
            }
        }
    }

    /// # Errors
    /// `Config` for a zero or unknown direct delay, or a prompter failure.
    pub fn delay(&self, choice: &DelayChoice, prompter: &mut dyn Prompter) -> Result<Duration> {
        match choice {
            DelayChoice::Named(name) => match self.presets.delay(name) {
                Some(d) => Ok(Duration::from_millis(d.millis)),
                None => bail!(CoreError::Config(format!("aucun délai « {name} »"))),
            },
            DelayChoice::Millis(ms) => Ok(Duration::from_millis(checked_delay(*ms)?)),
            DelayChoice::Prompt => {
                let options = self.presets.delay_options();
                loop {
                    let attempt = match options.get(prompter.choose("Delay", &options)?) {
                        Some(&MANUAL_DELAY) => {
                            let ms = prompter.number("Delay (ms)", MAX_DELAY_MS)?;
                            checked_delay(ms)
                        }
                        Some(name) => self
                            .presets
                            .delay(name)
                            .map(|d| d.millis)
                            .ok_or_else(|| CoreError::Config(format!("délai « {name} » inconnu"))),
                        None => Err(CoreError::Config("choix hors menu".into())),
                    };
                    match attempt {
                        Ok(ms) => return Ok(Duration::from_millis(ms)),
                        Err(e) => log::warn!("{e}, nouvelle saisie"),
                    }
                }
            }
        }
    }
}

fn checked_delay(ms: u64) -> Result<u64, CoreError> {
    if ms == 0 || ms > MAX_DELAY_MS {
        return Err(CoreError::Config(format!(
            "délai {ms} ms hors de [1, {MAX_DELAY_MS}]"
        )));
    }
    Ok(ms)
}
