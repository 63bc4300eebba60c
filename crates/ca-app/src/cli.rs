use std::path::PathBuf;

use ca_core::automaton::Family;
use ca_core::config::SimConfig;
use clap::Parser;

/// cellscii : automates cellulaires 1D dans le terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Famille : elementary, reversible, totalistic. Demandée si absente.
    #[arg(long, value_parser = parse_family)]
    pub family: Option<Family>,

    /// Règle prédéfinie, ex. "Rule 110", "Rule 150R", "Code 1599".
    #[arg(long)]
    pub rule: Option<String>,

    /// Numéro de règle décimal (prioritaire sur --rule).
    #[arg(long)]
    pub rule_number: Option<u64>,

    /// Template de seed, ex. "Single Middle", "Random".
    #[arg(long)]
    pub seed: Option<String>,

    /// Motif dense, un chiffre par cellule, lignes séparées par '/'.
    #[arg(long)]
    pub pattern: Option<String>,

    /// Délai entre deux images, en millisecondes.
    #[arg(long)]
    pub delay: Option<u64>,

    /// Largeur de la grille. Défaut : largeur du terminal.
    #[arg(long)]
    pub width: Option<usize>,

    /// Graine du template Random.
    #[arg(long)]
    pub random_seed: Option<u64>,

    /// Entrée réduite (pavé numérique) : 2/8/4/6 = haut/bas/gauche/droite dans l'éditeur.
    #[arg(long, default_value_t = false)]
    pub reduced_input: bool,

    /// Pas de TUI : simule N pas et écrit les lignes sur stdout.
    #[arg(long, value_name = "N")]
    pub headless: Option<u64>,

    /// Masquer la sidebar.
    #[arg(long, default_value_t = false)]
    pub no_sidebar: bool,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

fn parse_family(s: &str) -> Result<Family, String> {
    s.parse().map_err(|e: ca_core::CoreError| e.to_string())
}

impl Cli {
    /// Overlay command-line values on the loaded configuration.
    ///
    /// A name given here replaces both the name and the explicit value
    /// coming from the file, so `--rule` wins over a `rule_number` in TOML.
    pub fn apply_overrides(&self, config: &mut SimConfig) {
        if let Some(family) = self.family {
            config.family = Some(family);
        }
        if let Some(ref name) = self.rule {
            config.rule = Some(name.clone());
            config.rule_number = None;
        }
        if let Some(n) = self.rule_number {
            config.rule_number = Some(n);
        }
        if let Some(ref name) = self.seed {
            config.seed = Some(name.clone());
            config.pattern = None;
        }
        if let Some(ref pattern) = self.pattern {
            config.pattern = Some(pattern.clone());
        }
        if let Some(ms) = self.delay {
            config.delay_ms = Some(ms);
        }
        if let Some(w) = self.width {
            config.width = Some(w);
        }
        if let Some(s) = self.random_seed {
            config.random_seed = Some(s);
        }
        if self.no_sidebar {
            config.show_sidebar = false;
        }
    }
}
