use anyhow::{Result, bail};
use ca_core::palette::Palette;
use ca_core::resolver::Prompter;
use ca_core::seed::{Seed, SeedEditor, SeedKey};
use ca_render::ui;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::DefaultTerminal;

/// Résultat d'une touche dans un écran de saisie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Pending,
    Done(T),
    Cancelled,
}

/// Curseur d'un menu vertical.
#[derive(Clone, Debug)]
pub struct MenuInput {
    selected: usize,
    len: usize,
}

impl MenuInput {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Up/Down wrap around, Enter confirms, 1-9 pick directly.
    pub fn handle(&mut self, code: KeyCode) -> Outcome<usize> {
        if self.len == 0 {
            return Outcome::Cancelled;
        }
        match code {
            KeyCode::Up => {
                self.selected = self.selected.checked_sub(1).unwrap_or(self.len - 1);
                Outcome::Pending
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % self.len;
                Outcome::Pending
            }
            KeyCode::Enter => Outcome::Done(self.selected),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < self.len {
                    Outcome::Done(index)
                } else {
                    Outcome::Pending
                }
            }
            KeyCode::Esc => Outcome::Cancelled,
            _ => Outcome::Pending,
        }
    }
}

/// Saisie d'un entier borné.
#[derive(Clone, Debug)]
pub struct NumberInput {
    buffer: String,
    max: u64,
    error: Option<String>,
}

impl NumberInput {
    #[must_use]
    pub fn new(max: u64) -> Self {
        Self {
            buffer: String::new(),
            max,
            error: None,
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Digits append, Backspace erases, Enter validates against `max`.
    pub fn handle(&mut self, code: KeyCode) -> Outcome<u64> {
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.buffer.len() < 20 {
                    self.buffer.push(c);
                }
                self.error = None;
                Outcome::Pending
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                self.error = None;
                Outcome::Pending
            }
            KeyCode::Enter => match self.buffer.parse::<u64>() {
                Ok(n) if n <= self.max => Outcome::Done(n),
                Ok(_) | Err(_) => {
                    self.error = Some(format!("entre 0 et {}", self.max));
                    Outcome::Pending
                }
            },
            KeyCode::Esc => Outcome::Cancelled,
            _ => Outcome::Pending,
        }
    }
}

/// Touche clavier → touche de l'éditeur de seed.
#[must_use]
pub fn seed_key(code: KeyCode) -> Option<SeedKey> {
    match code {
        KeyCode::Up => Some(SeedKey::Up),
        KeyCode::Down => Some(SeedKey::Down),
        KeyCode::Left => Some(SeedKey::Left),
        KeyCode::Right => Some(SeedKey::Right),
        KeyCode::Char(c) => c.to_digit(10).map(|d| SeedKey::Digit(d as u8)),
        KeyCode::Tab => Some(SeedKey::ToggleMode),
        KeyCode::Enter => Some(SeedKey::Confirm),
        _ => None,
    }
}

/// Prompter plein écran : menus, saisie numérique et éditeur de seed dans le terminal.
pub struct TuiPrompter<'t> {
    terminal: &'t mut DefaultTerminal,
    reduced_input: bool,
    palette: Palette,
}

impl<'t> TuiPrompter<'t> {
    pub fn new(terminal: &'t mut DefaultTerminal, reduced_input: bool) -> Self {
        Self {
            terminal,
            reduced_input,
            palette: Palette::for_base(2),
        }
    }

    /// Colors used by the seed editor.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }
}

/// Prochaine touche pressée ; les autres événements sont ignorés.
fn next_key() -> Result<Option<KeyCode>> {
    match event::read()? {
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) => Ok(Some(code)),
        _ => Ok(None),
    }
}

impl Prompter for TuiPrompter<'_> {
    fn choose(&mut self, prompt: &str, options: &[&str]) -> Result<usize> {
        let mut input = MenuInput::new(options.len());
        loop {
            let selected = input.selected();
            self.terminal
                .draw(|f| ui::draw_menu(f, prompt, options, selected))?;
            if let Some(code) = next_key()? {
                match input.handle(code) {
                    Outcome::Done(index) => return Ok(index),
                    Outcome::Cancelled => bail!("Saisie annulée : {prompt}"),
                    Outcome::Pending => {}
                }
            }
        }
    }

    fn number(&mut self, prompt: &str, max: u64) -> Result<u64> {
        let mut input = NumberInput::new(max);
        loop {
            self.terminal
                .draw(|f| ui::draw_number(f, prompt, input.buffer(), max, input.error()))?;
            if let Some(code) = next_key()? {
                match input.handle(code) {
                    Outcome::Done(n) => return Ok(n),
                    Outcome::Cancelled => bail!("Saisie annulée : {prompt}"),
                    Outcome::Pending => {}
                }
            }
        }
    }

    fn edit_seed(&mut self, mut editor: SeedEditor) -> Result<Seed> {
        while !editor.is_done() {
            self.terminal
                .draw(|f| ui::draw_seed_editor(f, &editor, &self.palette))?;
            match next_key()? {
                Some(KeyCode::Esc) => bail!("Saisie du seed annulée"),
                Some(code) => {
                    if let Some(key) = seed_key(code) {
                        editor.handle(key);
                    }
                }
                None => {}
            }
        }
        Ok(editor.finish())
    }

    fn reduced_input(&self) -> bool {
        self.reduced_input
    }
}
