use std::io::Write;

use anyhow::{Result, bail};
use ca_core::automaton::Automaton;
use ca_core::resolver::Prompter;
use ca_core::seed::{Seed, SeedEditor};
use ca_render::canvas::shade_line;

/// Largeur de grille par défaut sans terminal.
pub const DEFAULT_WIDTH: usize = 79;

/// Prompter sans écran : tout choix manquant est une erreur qui nomme l'option.
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn choose(&mut self, prompt: &str, _options: &[&str]) -> Result<usize> {
        let option = match prompt {
            "Automaton" => "--family",
            "Rule" => "--rule ou --rule-number",
            "Seed" => "--seed ou --pattern",
            "Delay" => "--delay",
            _ => "la configuration",
        };
        bail!("Mode headless : choix « {prompt} » requis, utiliser {option}")
    }

    fn number(&mut self, prompt: &str, _max: u64) -> Result<u64> {
        bail!("Mode headless : saisie « {prompt} » impossible")
    }

    fn edit_seed(&mut self, _editor: SeedEditor) -> Result<Seed> {
        bail!("Mode headless : utiliser --seed ou --pattern")
    }
}

/// Simule `generations` pas et écrit chaque paire de lignes affichable.
///
/// Returns the number of row pairs written.
///
/// # Errors
/// Write failures on `out`.
pub fn run(automaton: &mut Automaton, generations: u64, out: &mut impl Write) -> Result<u64> {
    let base = automaton.family().base();
    let mut written = 0;
    for _ in 0..generations {
        if automaton.should_render() {
            let (top, bottom) = automaton.rows();
            writeln!(out, "{}", shade_line(top, base))?;
            writeln!(out, "{}", shade_line(bottom, base))?;
            written += 1;
        }
        automaton.step();
    }
    out.flush()?;
    log::info!("{written} paires de lignes écrites en {generations} générations");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ca_core::automaton::Family;
    use ca_core::config::SimConfig;
    use ca_core::presets::Presets;
    use ca_core::resolver::{DelayChoice, Resolver, RuleChoice, SeedChoice};

    use super::*;

    #[test]
    fn missing_choice_names_the_option() {
        let presets = Presets::builtin();
        let resolver = Resolver::new(&presets, Family::Elementary, 9, 10);
        let err = resolver
            .resolve(
                &RuleChoice::Number(90),
                &SeedChoice::Prompt,
                &DelayChoice::Millis(10),
                &mut NoPrompt,
            )
            .unwrap_err();
        assert!(err.to_string().contains("--pattern"), "{err}");
    }

    #[test]
    fn rule_90_draws_a_sierpinski_start() {
        let presets = Presets::builtin();
        let resolved = Resolver::new(&presets, Family::Elementary, 9, 10)
            .resolve(
                &RuleChoice::Named("Rule 90".into()),
                &SeedChoice::Pattern("1".into()),
                &DelayChoice::Millis(1),
                &mut NoPrompt,
            )
            .unwrap();
        let mut ca = Automaton::new(
            resolved.family,
            resolved.rule,
            &resolved.seed,
            resolved.delay,
            SimConfig::default().palette_for(Family::Elementary),
        )
        .unwrap();

        let mut out = Vec::new();
        let pairs = run(&mut ca, 4, &mut out).unwrap();
        assert_eq!(pairs, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["    █    ", "   █ █   ", "  █   █  ", " █ █ █ █ "]);
    }

    #[test]
    fn zero_generations_write_nothing() {
        let presets = Presets::builtin();
        let rule = presets.rule(Family::Totalistic, "Code 777").unwrap();
        let seed = ca_core::seed::SeedBuilder::new(3, 1, 5, 6)
            .unwrap()
            .pattern("2")
            .unwrap();
        let mut ca = Automaton::new(
            Family::Totalistic,
            rule,
            &seed,
            Duration::from_millis(5),
            SimConfig::default().palette_for(Family::Totalistic),
        )
        .unwrap();
        let mut out = Vec::new();
        assert_eq!(run(&mut ca, 0, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }
}
