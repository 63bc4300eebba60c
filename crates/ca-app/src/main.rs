use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use ca_core::automaton::Automaton;
use ca_core::config::SimConfig;
use ca_core::presets::Presets;
use ca_core::resolver::{Prompter, Resolver};
use ca_core::seed::grid_width;
use ca_render::ui::canvas_width;
use clap::Parser;
use ratatui::DefaultTerminal;

pub mod app;
pub mod cli;
pub mod headless;
pub mod hotreload;
pub mod prompt;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);
    let presets = Presets::builtin();

    // Simulation sans terminal
    if let Some(generations) = cli.headless {
        return run_headless(&config, &presets, generations);
    }

    let config = Arc::new(ArcSwap::from_pointee(config));

    // 4. Hot-reload config (thread interne notify)
    let _watcher = match hotreload::spawn_config_watcher(&cli.config, &config) {
        Ok(w) => Some(w),
        Err(e) => {
            log::warn!("Hot-reload indisponible : {e}");
            None
        }
    };

    // 5. Initialiser le terminal ratatui
    let mut terminal = ratatui::init();

    // 6. Menus puis boucle principale
    let result = run_interactive(&mut terminal, &config, &presets, cli.reduced_input);

    // 7. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    result
}

/// Menus de démarrage et simulation plein écran.
fn run_interactive(
    terminal: &mut DefaultTerminal,
    config: &Arc<ArcSwap<SimConfig>>,
    presets: &Presets,
    reduced_input: bool,
) -> Result<()> {
    let snapshot = config.load_full();
    let columns = usize::from(canvas_width(terminal.size()?.width, snapshot.show_sidebar));

    let automaton = {
        let mut prompter = prompt::TuiPrompter::new(terminal, reduced_input);
        let family = match snapshot.family {
            Some(f) => f,
            None => Resolver::choose_family(&mut prompter)?,
        };
        prompter.set_palette(snapshot.palette_for(family));
        let (width, display_width) = match snapshot.width {
            Some(w) => (w, w + 1),
            None => (grid_width(columns), columns),
        };
        build_automaton(&snapshot, presets, family, width, display_width, &mut prompter)?
    };

    let mut app = app::App::new(automaton, Arc::clone(config));
    app.run(terminal)
}

fn run_headless(config: &SimConfig, presets: &Presets, generations: u64) -> Result<()> {
    let mut prompter = headless::NoPrompt;
    let family = match config.family {
        Some(f) => f,
        None => Resolver::choose_family(&mut prompter)?,
    };
    let width = config.width.unwrap_or(headless::DEFAULT_WIDTH);
    let mut automaton = build_automaton(config, presets, family, width, width + 1, &mut prompter)?;
    let stdout = std::io::stdout();
    headless::run(&mut automaton, generations, &mut stdout.lock())?;
    Ok(())
}

/// Résout règle, seed et délai puis construit l'automate.
fn build_automaton(
    config: &SimConfig,
    presets: &Presets,
    family: ca_core::automaton::Family,
    width: usize,
    display_width: usize,
    prompter: &mut dyn Prompter,
) -> Result<Automaton> {
    let resolved = Resolver::new(presets, family, width, display_width)
        .with_random_seed(config.random_seed)
        .resolve(
            &config.rule_choice(),
            &config.seed_choice(),
            &config.delay_choice(),
            prompter,
        )?;
    Ok(Automaton::new(
        resolved.family,
        resolved.rule,
        &resolved.seed,
        resolved.delay,
        config.palette_for(family),
    )?)
}

/// Config explicite si présente, sinon valeurs par défaut.
fn resolve_config(cli: &cli::Cli) -> Result<SimConfig> {
    if cli.config.exists() {
        ca_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(SimConfig::default())
    }
}
