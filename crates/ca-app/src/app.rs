use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use arc_swap::ArcSwap;
use ca_core::automaton::{Automaton, Family, Modification};
use ca_core::config::SimConfig;
use ca_core::resolver::MAX_DELAY_MS;
use ca_render::rate::GenerationRate;
use ca_render::scrollback::Scrollback;
use ca_render::ui::{self, RenderState, SimView};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::DefaultTerminal;

/// Attente maximale entre deux lectures clavier quand l'automate est en pause.
const PAUSE_POLL: Duration = Duration::from_millis(100);
/// Pas d'ajustement du délai avec +/-.
const DELAY_STEP_MS: i64 = 10;

/// État de l'application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    Running,
    /// Overlay d'aide affiché ; la simulation continue.
    Help,
    Quitting,
}

/// Boucle principale : simulation, affichage et clavier.
pub struct App {
    pub state: AppState,
    pub automaton: Automaton,
    config: Arc<ArcSwap<SimConfig>>,
    /// Dernière config appliquée à l'automate.
    applied: Arc<SimConfig>,
    history: Scrollback,
    rate: GenerationRate,
    /// Step counter of the last row pair pushed to the history.
    last_pushed: Option<u64>,
    pub show_sidebar: bool,
    rule_label: String,
}

impl App {
    #[must_use]
    pub fn new(automaton: Automaton, config: Arc<ArcSwap<SimConfig>>) -> Self {
        let applied = config.load_full();
        let rule_label = automaton.family().rule_label(automaton.rule());
        Self {
            state: AppState::Running,
            automaton,
            history: Scrollback::new(applied.scrollback),
            rate: GenerationRate::new(16),
            last_pushed: None,
            show_sidebar: applied.show_sidebar,
            rule_label,
            config,
            applied,
        }
    }

    /// Boucle jusqu'à `q`.
    ///
    /// Each pass draws when the automaton has a row pair to show, waits out
    /// the delay while reading the keyboard, then advances one step.
    ///
    /// # Errors
    /// Terminal I/O failures.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            if self.state == AppState::Quitting {
                break;
            }
            self.sync_config();

            let shown = self.automaton.steps();
            let fresh = self.record_frame(Instant::now());
            let running = self.automaton.is_running();
            if fresh || !running {
                terminal.draw(|frame| ui::draw(frame, &self.view()))?;
                let budget = if running {
                    self.automaton.delay()
                } else {
                    PAUSE_POLL
                };
                self.wait(budget)?;
            } else {
                // Generations that are not shown still answer the keyboard.
                while event::poll(Duration::ZERO)? {
                    self.handle_event(&event::read()?);
                }
            }

            self.advance(shown);
        }
        log::info!(
            "Fin de simulation après {} générations",
            self.automaton.steps()
        );
        Ok(())
    }

    /// Push the current row pair if it is due and not already shown.
    fn record_frame(&mut self, now: Instant) -> bool {
        let steps = self.automaton.steps();
        if !self.automaton.should_render() || self.last_pushed == Some(steps) {
            return false;
        }
        let (top, bottom) = self.automaton.rows();
        self.history.push(top, bottom);
        self.rate.observe(now, steps);
        self.last_pushed = Some(steps);
        true
    }

    /// Step once, unless a key already moved the counter past `shown`.
    ///
    /// A reverse leaves a fresh row pair that must be drawn before stepping on.
    fn advance(&mut self, shown: u64) {
        if self.automaton.steps() == shown {
            self.automaton.step();
        }
    }

    /// Lire le clavier pendant `budget`, en sortant tôt si l'on quitte.
    fn wait(&mut self, budget: Duration) -> Result<()> {
        let deadline = Instant::now() + budget;
        while self.state != AppState::Quitting {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            if event::poll(remaining)? {
                self.handle_event(&event::read()?);
            }
        }
        Ok(())
    }

    /// Apply a hot-reloaded configuration once.
    fn sync_config(&mut self) {
        let current = self.config.load_full();
        if Arc::ptr_eq(&current, &self.applied) {
            return;
        }
        for modification in current.live_modifications(&self.applied, self.automaton.family()) {
            self.automaton.apply(modification);
        }
        self.show_sidebar = current.show_sidebar;
        self.applied = current;
    }

    fn render_state(&self) -> RenderState {
        match self.state {
            AppState::Help => RenderState::Help,
            _ if !self.automaton.is_running() => RenderState::Paused,
            _ => RenderState::Running,
        }
    }

    fn view(&self) -> SimView<'_> {
        SimView {
            history: &self.history,
            palette: self.automaton.palette(),
            family: self.automaton.family(),
            rule_label: &self.rule_label,
            width: self.automaton.width(),
            delay: self.automaton.delay(),
            steps: self.automaton.steps(),
            rate: &self.rate,
            state: self.render_state(),
            show_sidebar: self.show_sidebar,
        }
    }

    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(*code),
            Event::Resize(w, h) => log::debug!("Terminal redimensionné : {w}×{h}"),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.state = AppState::Quitting,
            KeyCode::Esc => {
                self.state = if self.state == AppState::Help {
                    AppState::Running
                } else {
                    AppState::Quitting
                };
            }
            KeyCode::Char('?') => {
                self.state = if self.state == AppState::Help {
                    AppState::Running
                } else {
                    AppState::Help
                };
            }
            KeyCode::Char(' ') => {
                self.automaton.apply(Modification::SetRunning(None));
                self.rate.reset();
            }
            KeyCode::Char('r') => {
                if self.automaton.family() == Family::Reversible {
                    self.automaton.apply(Modification::Reverse);
                }
            }
            KeyCode::Char('+' | '=') => self.nudge_delay(DELAY_STEP_MS),
            KeyCode::Char('-') => self.nudge_delay(-DELAY_STEP_MS),
            KeyCode::Char('i') => {
                let inverted = self.automaton.palette().inverted();
                self.automaton
                    .apply(Modification::SetAllColors(inverted.colors().to_vec()));
            }
            KeyCode::Char('s') => self.show_sidebar = !self.show_sidebar,
            _ => {}
        }
    }

    fn nudge_delay(&mut self, delta: i64) {
        let current = i64::try_from(self.automaton.delay().as_millis()).unwrap_or(i64::MAX);
        let max = i64::try_from(MAX_DELAY_MS).unwrap_or(i64::MAX);
        let next = current.saturating_add(delta).clamp(1, max);
        self.automaton.apply(Modification::SetDelay(next));
    }
}
