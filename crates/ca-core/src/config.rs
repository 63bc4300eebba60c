use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::automaton::{Family, Modification};
use crate::palette::{BLACK, GRAY, Palette, Rgb, WHITE};
use crate::resolver::{DelayChoice, RuleChoice, SeedChoice};

/// Configuration de la simulation, hot-rechargeable pour la palette et le délai.
///
/// Every field has a sane default; unset choices are asked interactively.
///
/// # Example
/// ```
/// use ca_core::config::SimConfig;
/// let config = SimConfig::default();
/// assert_eq!(config.delay_ms, None);
/// assert!(config.show_sidebar);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SimConfig {
    // === Simulation ===
    /// Famille d'automate. None = demandée au lancement.
    pub family: Option<Family>,
    /// Nom d'une règle prédéfinie ("Rule 110", "Code 1599"...).
    pub rule: Option<String>,
    /// Numéro de règle décimal ; prioritaire sur `rule`.
    pub rule_number: Option<u64>,
    /// Nom d'un template de seed.
    pub seed: Option<String>,
    /// Motif dense ; prioritaire sur `seed`.
    pub pattern: Option<String>,
    /// Délai entre deux images, en millisecondes.
    pub delay_ms: Option<u64>,
    /// Largeur forcée de la grille. None = déduite du terminal.
    pub width: Option<usize>,
    /// Graine du template Random.
    pub random_seed: Option<u64>,

    // === Palette ===
    /// Couleurs des automates binaires (2 entrées).
    pub binary: Vec<Rgb>,
    /// Couleurs des automates 3 couleurs (3 entrées).
    pub ternary: Vec<Rgb>,

    // === UI ===
    pub show_sidebar: bool,
    /// Lignes conservées pour le défilement.
    pub scrollback: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            family: None,
            rule: None,
            rule_number: None,
            seed: None,
            pattern: None,
            delay_ms: None,
            width: None,
            random_seed: None,
            binary: vec![WHITE, BLACK],
            ternary: vec![WHITE, GRAY, BLACK],
            show_sidebar: true,
            scrollback: 512,
        }
    }
}

impl SimConfig {
    /// Clamp display settings and reset palettes of the wrong size.
    /// Called after TOML deserialization.
    ///
    /// `delay_ms` and `width` are left as written: they are direct choices,
    /// validated (and rejected) when the automaton is resolved.
    pub fn clamp_all(&mut self) {
        self.scrollback = self.scrollback.clamp(16, 10_000);
        let defaults = Self::default();
        if self.binary.len() != 2 {
            log::warn!("palette binaire de {} couleurs ignorée", self.binary.len());
            self.binary = defaults.binary;
        }
        if self.ternary.len() != 3 {
            log::warn!("palette ternaire de {} couleurs ignorée", self.ternary.len());
            self.ternary = defaults.ternary;
        }
    }

    /// Palette matching the base of `family`.
    #[must_use]
    pub fn palette_for(&self, family: Family) -> Palette {
        match family.base() {
            2 => Palette::new(self.binary.clone()),
            3 => Palette::new(self.ternary.clone()),
            b => Palette::for_base(b),
        }
    }

    #[must_use]
    pub fn rule_choice(&self) -> RuleChoice {
        match (self.rule_number, &self.rule) {
            (Some(n), _) => RuleChoice::Number(n),
            (None, Some(name)) => RuleChoice::Named(name.clone()),
            (None, None) => RuleChoice::Prompt,
        }
    }

    #[must_use]
    pub fn seed_choice(&self) -> SeedChoice {
        match (&self.pattern, &self.seed) {
            (Some(p), _) => SeedChoice::Pattern(p.clone()),
            (None, Some(name)) => SeedChoice::Named(name.clone()),
            (None, None) => SeedChoice::Prompt,
        }
    }

    #[must_use]
    pub fn delay_choice(&self) -> DelayChoice {
        self.delay_ms.map_or(DelayChoice::Prompt, DelayChoice::Millis)
    }

    /// Modifications for the live settings that differ from `previous`.
    ///
    /// Only palette and delay are live; everything else needs a restart.
    /// Unchanged keys emit nothing, so runtime adjustments survive a reload.
    #[must_use]
    pub fn live_modifications(&self, previous: &SimConfig, family: Family) -> Vec<Modification> {
        let mut mods = Vec::new();
        let palette = self.palette_for(family);
        if palette != previous.palette_for(family) {
            mods.push(Modification::SetAllColors(palette.colors().to_vec()));
        }
        if let Some(ms) = self.delay_ms
            && self.delay_ms != previous.delay_ms
        {
            mods.push(Modification::SetDelay(i64::try_from(ms).unwrap_or(i64::MAX)));
        }
        mods
    }
}

/// Structure TOML intermédiaire : chaque section et chaque champ sont optionnels.
#[derive(Deserialize)]
struct ConfigFile {
    sim: Option<SimSection>,
    palette: Option<PaletteSection>,
    ui: Option<UiSection>,
}

#[derive(Deserialize)]
struct SimSection {
    family: Option<Family>,
    rule: Option<String>,
    rule_number: Option<u64>,
    seed: Option<String>,
    pattern: Option<String>,
    delay_ms: Option<u64>,
    width: Option<usize>,
    random_seed: Option<u64>,
}

#[derive(Deserialize)]
struct PaletteSection {
    binary: Option<Vec<Rgb>>,
    ternary: Option<Vec<Rgb>>,
}

#[derive(Deserialize)]
struct UiSection {
    show_sidebar: Option<bool>,
    scrollback: Option<usize>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema.
pub fn parse_config(content: &str) -> Result<SimConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = SimConfig::default();

    if let Some(s) = file.sim {
        config.family = s.family.or(config.family);
        config.rule = s.rule.or(config.rule);
        config.rule_number = s.rule_number.or(config.rule_number);
        config.seed = s.seed.or(config.seed);
        config.pattern = s.pattern.or(config.pattern);
        config.delay_ms = s.delay_ms.or(config.delay_ms);
        config.width = s.width.or(config.width);
        config.random_seed = s.random_seed.or(config.random_seed);
    }
    if let Some(p) = file.palette {
        if let Some(v) = p.binary {
            config.binary = v;
        }
        if let Some(v) = p.ternary {
            config.ternary = v;
        }
    }
    if let Some(u) = file.ui {
        if let Some(v) = u.show_sidebar {
            config.show_sidebar = v;
        }
        if let Some(v) = u.scrollback {
            config.scrollback = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ca_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<SimConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), SimConfig::default());
    }

    #[test]
    fn partial_sections_merge_over_defaults() {
        let config = parse_config(
            r#"
            [sim]
            family = "Totalistic"
            rule = "Code 1599"
            delay_ms = 0

            [palette]
            ternary = [[0, 0, 0], [255, 0, 0], [255, 255, 255]]
            "#,
        )
        .unwrap();
        assert_eq!(config.family, Some(Family::Totalistic));
        assert_eq!(config.rule_choice(), RuleChoice::Named("Code 1599".into()));
        assert_eq!(config.delay_choice(), DelayChoice::Millis(0));
        assert_eq!(config.palette_for(Family::Totalistic).color(1), (255, 0, 0));
        assert_eq!(config.binary, SimConfig::default().binary);
        assert!(config.show_sidebar);
    }

    #[test]
    fn wrong_palette_size_is_reset() {
        let config = parse_config("[palette]\nbinary = [[1, 2, 3]]\n").unwrap();
        assert_eq!(config.binary, vec![WHITE, BLACK]);
    }

    #[test]
    fn explicit_values_win_over_names() {
        let config = SimConfig {
            rule: Some("Rule 30".into()),
            rule_number: Some(45),
            seed: Some("Random".into()),
            pattern: Some("101".into()),
            ..SimConfig::default()
        };
        assert_eq!(config.rule_choice(), RuleChoice::Number(45));
        assert_eq!(config.seed_choice(), SeedChoice::Pattern("101".into()));
        assert_eq!(config.delay_choice(), DelayChoice::Prompt);
    }

    #[test]
    fn live_modifications_cover_palette_and_delay() {
        let previous = SimConfig::default();
        let config = SimConfig {
            delay_ms: Some(80),
            binary: vec![BLACK, WHITE],
            ..SimConfig::default()
        };
        let mods = config.live_modifications(&previous, Family::Elementary);
        assert_eq!(
            mods,
            vec![
                Modification::SetAllColors(vec![BLACK, WHITE]),
                Modification::SetDelay(80)
            ]
        );
    }

    #[test]
    fn unchanged_live_keys_emit_nothing() {
        let previous = SimConfig {
            delay_ms: Some(80),
            ..SimConfig::default()
        };
        let config = SimConfig {
            scrollback: 64,
            ternary: vec![BLACK, GRAY, WHITE],
            ..previous.clone()
        };
        assert!(config.live_modifications(&previous, Family::Elementary).is_empty());
        assert_eq!(
            config.live_modifications(&previous, Family::Totalistic),
            vec![Modification::SetAllColors(vec![BLACK, GRAY, WHITE])]
        );
    }

    struct NoInput;

    impl crate::resolver::Prompter for NoInput {
        fn choose(&mut self, prompt: &str, _options: &[&str]) -> Result<usize> {
            anyhow::bail!("{prompt}")
        }

        fn number(&mut self, prompt: &str, _max: u64) -> Result<u64> {
            anyhow::bail!("{prompt}")
        }

        fn edit_seed(&mut self, _editor: crate::seed::SeedEditor) -> Result<crate::seed::Seed> {
            anyhow::bail!("seed")
        }
    }

    #[test]
    fn invalid_direct_values_from_file_fail_resolution() {
        let config = parse_config("[sim]\ndelay_ms = 0\nwidth = 1\n").unwrap();
        assert_eq!(config.delay_ms, Some(0));
        assert_eq!(config.width, Some(1));

        let presets = crate::presets::Presets::builtin();
        let resolver = crate::resolver::Resolver::new(&presets, Family::Elementary, 9, 10);
        assert!(resolver.delay(&config.delay_choice(), &mut NoInput).is_err());
        let width = config.width.unwrap_or(9);
        assert!(crate::seed::SeedBuilder::new(2, 1, width, width + 1).is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ui]\nshow_sidebar = false\nscrollback = 2").unwrap();
        let config = load_config(file.path()).unwrap();
        assert!(!config.show_sidebar);
        assert_eq!(config.scrollback, 16);
    }

    #[test]
    fn load_config_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("absent.toml")).is_err());
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[sim]\nfamily = 3\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn shipped_default_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/default.toml");
        let config = load_config(&path).unwrap();
        assert_eq!(config.family, None);
        assert_eq!(config.ternary, SimConfig::default().ternary);
    }
}
