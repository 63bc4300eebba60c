use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::CoreError;
use crate::grid::Symbol;

/// Largeur minimale : une colonne intérieure entre les deux bords.
pub const MIN_WIDTH: usize = 3;

/// Grid width for a display `display_width` columns wide.
///
/// Leaves the last display column free and keeps the width odd so that
/// `width / 2` is a true center column.
///
/// # Example
/// ```
/// use ca_core::seed::grid_width;
/// assert_eq!(grid_width(80), 79);
/// assert_eq!(grid_width(81), 79);
/// assert_eq!(grid_width(2), 1);
/// ```
#[must_use]
pub fn grid_width(display_width: usize) -> usize {
    let w = display_width.saturating_sub(1);
    if w % 2 == 0 { w.saturating_sub(1) } else { w }
}

/// Column reference in a template, resolved against the actual grid width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    /// Absolute column, clamped to the last column.
    At(usize),
    /// `width / 2`.
    Middle,
    /// `width - 1`.
    Last,
}

impl Column {
    #[must_use]
    pub fn resolve(self, width: usize) -> usize {
        let last = width.saturating_sub(1);
        match self {
            Column::At(x) => x.min(last),
            Column::Middle => width / 2,
            Column::Last => last,
        }
    }
}

/// Une cellule d'un template : ligne relative au seed, colonne, valeur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedCell {
    pub row: usize,
    pub col: Column,
    pub symbol: Symbol,
}

impl SeedCell {
    #[must_use]
    pub const fn new(row: usize, col: Column, symbol: Symbol) -> Self {
        Self { row, col, symbol }
    }
}

/// Contenu d'un template nommé.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    /// Sparse cells, everything else 0.
    Cells(&'static [SeedCell]),
    /// Chaque cellule tirée uniformément dans `[0, base)`.
    Random,
}

/// Template de seed proposé dans le menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedTemplate {
    pub name: &'static str,
    pub kind: TemplateKind,
}

/// Seed dense, prêt à être copié dans la grille.
///
/// `rows()[0]` is the oldest seeded generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seed {
    rows: Vec<Vec<Symbol>>,
    base: u8,
}

impl Seed {
    #[must_use]
    pub fn rows(&self) -> &[Vec<Symbol>] {
        &self.rows
    }

    #[must_use]
    pub fn base(&self) -> u8 {
        self.base
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Builds seeds of a fixed shape (`rows × width`, symbols in `[0, base)`).
///
/// # Example
/// ```
/// use ca_core::seed::{Column, SeedBuilder, SeedCell, SeedTemplate, TemplateKind};
/// const CELLS: &[SeedCell] = &[SeedCell::new(0, Column::Middle, 1)];
/// let template = SeedTemplate { name: "Single Middle", kind: TemplateKind::Cells(CELLS) };
/// let builder = SeedBuilder::new(2, 1, 7, 80).unwrap();
/// let seed = builder.template(&template, None).unwrap();
/// assert_eq!(seed.rows()[0], vec![0, 0, 0, 1, 0, 0, 0]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedBuilder {
    base: u8,
    rows: usize,
    width: usize,
}

impl SeedBuilder {
    /// # Errors
    /// Returns `CoreError::InvalidSeed` if `width >= display_width`,
    /// `width < MIN_WIDTH` or `base < 2`.
    pub fn new(base: u8, rows: usize, width: usize, display_width: usize) -> Result<Self, CoreError> {
        if width >= display_width {
            return Err(CoreError::InvalidSeed(format!(
                "largeur {width} ≥ largeur d'affichage {display_width}"
            )));
        }
        if base < 2 {
            return Err(CoreError::InvalidSeed(format!("base {base} < 2")));
        }
        if width < MIN_WIDTH {
            return Err(CoreError::InvalidSeed(format!(
                "largeur {width} < {MIN_WIDTH}"
            )));
        }
        Ok(Self { base, rows, width })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn base(&self) -> u8 {
        self.base
    }

    fn empty(&self) -> Vec<Vec<Symbol>> {
        vec![vec![0; self.width]; self.rows]
    }

    /// Expand a named template.
    ///
    /// `rng_seed` makes `TemplateKind::Random` reproducible.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidSeed` if a template cell lies outside the
    /// seeded rows or holds a symbol outside the base.
    pub fn template(&self, template: &SeedTemplate, rng_seed: Option<u64>) -> Result<Seed, CoreError> {
        let mut rows = self.empty();
        match template.kind {
            TemplateKind::Cells(cells) => {
                for cell in cells {
                    if cell.symbol >= self.base {
                        return Err(CoreError::InvalidSeed(format!(
                            "{} : symbole {} hors de la base {}",
                            template.name, cell.symbol, self.base
                        )));
                    }
                    let row = rows.get_mut(cell.row).ok_or_else(|| {
                        CoreError::InvalidSeed(format!(
                            "{} : ligne {} hors du seed ({} lignes)",
                            template.name, cell.row, self.rows
                        ))
                    })?;
                    row[cell.col.resolve(self.width)] = cell.symbol;
                }
            }
            TemplateKind::Random => {
                let mut rng = match rng_seed {
                    Some(s) => StdRng::seed_from_u64(s),
                    None => StdRng::from_entropy(),
                };
                for cell in rows.iter_mut().flatten() {
                    *cell = rng.gen_range(0..self.base);
                }
            }
        }
        log::debug!("Seed « {} » construit ({}×{})", template.name, self.rows, self.width);
        Ok(Seed {
            rows,
            base: self.base,
        })
    }

    /// Parse a typed pattern: one digit per cell, rows separated by `/`,
    /// each row centered in the grid.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidSeed` on a wrong row count, a row wider
    /// than the grid, a non-digit character or a digit outside the base.
    ///
    /// # Example
    /// ```
    /// use ca_core::seed::SeedBuilder;
    /// let builder = SeedBuilder::new(3, 1, 5, 80).unwrap();
    /// let seed = builder.pattern("121").unwrap();
    /// assert_eq!(seed.rows()[0], vec![0, 1, 2, 1, 0]);
    /// assert!(builder.pattern("131").is_err());
    /// ```
    pub fn pattern(&self, text: &str) -> Result<Seed, CoreError> {
        let lines: Vec<&str> = text.trim().split('/').map(str::trim).collect();
        if lines.len() != self.rows {
            return Err(CoreError::InvalidSeed(format!(
                "{} ligne(s) de motif, {} attendue(s)",
                lines.len(),
                self.rows
            )));
        }
        let mut rows = self.empty();
        for (row, line) in rows.iter_mut().zip(&lines) {
            let len = line.chars().count();
            if len > self.width {
                return Err(CoreError::InvalidSeed(format!(
                    "motif de {len} cellules plus large que la grille ({})",
                    self.width
                )));
            }
            let offset = (self.width - len) / 2;
            for (i, ch) in line.chars().enumerate() {
                let digit = ch
                    .to_digit(10)
                    .ok_or_else(|| CoreError::InvalidSeed(format!("caractère '{ch}' invalide")))?;
                if digit >= u32::from(self.base) {
                    return Err(CoreError::InvalidSeed(format!(
                        "chiffre {digit} hors de la base {}",
                        self.base
                    )));
                }
                row[offset + i] = digit as Symbol;
            }
        }
        Ok(Seed {
            rows,
            base: self.base,
        })
    }

    /// Start a manual entry session.
    #[must_use]
    pub fn editor(&self, reduced_input: bool) -> SeedEditor {
        SeedEditor {
            base: self.base,
            rows: self.empty(),
            cursor: (0, 0),
            reduced_input,
            mode: EditMode::Navigate,
            done: false,
        }
    }
}

/// Touche abstraite reçue par l'éditeur de seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedKey {
    Up,
    Down,
    Left,
    Right,
    Digit(u8),
    /// Bascule navigation / saisie (entrée réduite uniquement).
    ToggleMode,
    Confirm,
}

/// Mode of a reduced-input editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditMode {
    /// Digits 2/8/4/6 move the cursor up/down/left/right.
    Navigate,
    /// Digits write cells.
    Enter,
}

/// Saisie manuelle d'un seed, cellule par cellule.
///
/// With full input (keyboard) arrows move and digits write at any time.
/// With reduced input (keypad) digits either move or write depending on
/// the current [`EditMode`].
///
/// # Example
/// ```
/// use ca_core::seed::{SeedBuilder, SeedKey};
/// let mut editor = SeedBuilder::new(2, 1, 5, 80).unwrap().editor(false);
/// editor.handle(SeedKey::Right);
/// editor.handle(SeedKey::Digit(1));
/// editor.handle(SeedKey::Digit(1));
/// editor.handle(SeedKey::Confirm);
/// assert!(editor.is_done());
/// assert_eq!(editor.finish().rows()[0], vec![0, 1, 1, 0, 0]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedEditor {
    base: u8,
    rows: Vec<Vec<Symbol>>,
    cursor: (usize, usize),
    reduced_input: bool,
    mode: EditMode,
    done: bool,
}

impl SeedEditor {
    /// Apply one key. Digits outside `[0, base)` are ignored.
    pub fn handle(&mut self, key: SeedKey) {
        if self.done {
            return;
        }
        let key = self.translate(key);
        let (row, col) = self.cursor;
        let last_row = self.rows.len().saturating_sub(1);
        let last_col = self.width().saturating_sub(1);
        match key {
            SeedKey::Up => self.cursor.0 = row.saturating_sub(1),
            SeedKey::Down => self.cursor.0 = (row + 1).min(last_row),
            SeedKey::Left => self.cursor.1 = col.saturating_sub(1),
            SeedKey::Right => self.cursor.1 = (col + 1).min(last_col),
            SeedKey::Digit(d) if d < self.base => {
                if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
                    *cell = d;
                }
                self.cursor.1 = (col + 1).min(last_col);
            }
            SeedKey::Digit(_) => {}
            SeedKey::ToggleMode => {
                self.mode = match self.mode {
                    EditMode::Navigate => EditMode::Enter,
                    EditMode::Enter => EditMode::Navigate,
                };
            }
            SeedKey::Confirm => self.done = true,
        }
    }

    /// En entrée réduite et mode navigation, le pavé devient des flèches.
    ///
    /// Keypad layout with 1-2-3 on the top row: 2 is up, 8 is down.
    fn translate(&self, key: SeedKey) -> SeedKey {
        if !self.reduced_input || self.mode == EditMode::Enter {
            return key;
        }
        match key {
            SeedKey::Digit(2) => SeedKey::Up,
            SeedKey::Digit(8) => SeedKey::Down,
            SeedKey::Digit(4) => SeedKey::Left,
            SeedKey::Digit(6) => SeedKey::Right,
            SeedKey::Digit(_) => SeedKey::ToggleMode,
            other => other,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    #[must_use]
    pub fn reduced_input(&self) -> bool {
        self.reduced_input
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Symbol>] {
        &self.rows
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn base(&self) -> u8 {
        self.base
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Consume the editor into a seed, confirmed or not.
    #[must_use]
    pub fn finish(self) -> Seed {
        Seed {
            rows: self.rows,
            base: self.base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIGHT: &[SeedCell] = &[SeedCell::new(0, Column::At(10_000), 1)];
    const OUT_OF_BASE: &[SeedCell] = &[SeedCell::new(0, Column::Middle, 2)];
    const SECOND_ROW: &[SeedCell] = &[SeedCell::new(1, Column::Middle, 1)];

    fn cells(name: &'static str, cells: &'static [SeedCell]) -> SeedTemplate {
        SeedTemplate {
            name,
            kind: TemplateKind::Cells(cells),
        }
    }

    #[test]
    fn width_must_fit_display() {
        assert!(matches!(
            SeedBuilder::new(2, 1, 80, 80),
            Err(CoreError::InvalidSeed(_))
        ));
        assert!(SeedBuilder::new(2, 1, 2, 80).is_err());
        assert!(SeedBuilder::new(2, 1, 79, 80).is_ok());
    }

    #[test]
    fn template_columns_are_clamped() {
        let builder = SeedBuilder::new(2, 1, 9, 80).unwrap();
        let seed = builder.template(&cells("right", RIGHT), None).unwrap();
        assert_eq!(seed.rows()[0][8], 1);
        assert_eq!(seed.rows()[0].iter().filter(|&&c| c == 1).count(), 1);
    }

    #[test]
    fn template_rejects_bad_cells() {
        let builder = SeedBuilder::new(2, 1, 9, 80).unwrap();
        assert!(builder.template(&cells("bad", OUT_OF_BASE), None).is_err());
        assert!(builder.template(&cells("row", SECOND_ROW), None).is_err());
        let two_rows = SeedBuilder::new(2, 2, 9, 80).unwrap();
        let seed = two_rows.template(&cells("row", SECOND_ROW), None).unwrap();
        assert_eq!(seed.rows()[1][4], 1);
    }

    #[test]
    fn random_template_is_reproducible() {
        let builder = SeedBuilder::new(3, 2, 31, 80).unwrap();
        let random = SeedTemplate {
            name: "Random",
            kind: TemplateKind::Random,
        };
        let a = builder.template(&random, Some(7)).unwrap();
        let b = builder.template(&random, Some(7)).unwrap();
        assert_eq!(a, b);
        assert!(a.rows().iter().flatten().all(|&c| c < 3));
    }

    #[test]
    fn pattern_validates_shape() {
        let builder = SeedBuilder::new(2, 2, 7, 80).unwrap();
        let seed = builder.pattern("1/010").unwrap();
        assert_eq!(seed.rows()[0], vec![0, 0, 0, 1, 0, 0, 0]);
        assert_eq!(seed.rows()[1], vec![0, 0, 0, 1, 0, 0, 0]);
        assert!(builder.pattern("1").is_err());
        assert!(builder.pattern("1/1x1").is_err());
        assert!(builder.pattern("1/11111111").is_err());
    }

    #[test]
    fn editor_moves_and_writes_within_bounds() {
        let builder = SeedBuilder::new(3, 2, 4, 80).unwrap();
        let mut editor = builder.editor(false);
        editor.handle(SeedKey::Up);
        editor.handle(SeedKey::Left);
        assert_eq!(editor.cursor(), (0, 0));
        editor.handle(SeedKey::Down);
        editor.handle(SeedKey::Down);
        assert_eq!(editor.cursor(), (1, 0));
        editor.handle(SeedKey::Digit(2));
        editor.handle(SeedKey::Digit(5));
        editor.handle(SeedKey::Digit(1));
        editor.handle(SeedKey::Digit(1));
        editor.handle(SeedKey::Digit(1));
        assert_eq!(editor.cursor(), (1, 3));
        editor.handle(SeedKey::Confirm);
        editor.handle(SeedKey::Digit(2));
        let seed = editor.finish();
        assert_eq!(seed.rows()[0], vec![0, 0, 0, 0]);
        assert_eq!(seed.rows()[1], vec![2, 1, 1, 1]);
    }

    #[test]
    fn reduced_input_uses_mode_toggle() {
        let builder = SeedBuilder::new(2, 1, 5, 80).unwrap();
        let mut editor = builder.editor(true);
        editor.handle(SeedKey::Digit(6));
        editor.handle(SeedKey::Digit(6));
        assert_eq!(editor.cursor(), (0, 2));
        assert_eq!(editor.mode(), EditMode::Navigate);
        editor.handle(SeedKey::ToggleMode);
        editor.handle(SeedKey::Digit(1));
        assert_eq!(editor.rows()[0], vec![0, 0, 1, 0, 0]);
        editor.handle(SeedKey::Digit(6));
        assert_eq!(editor.rows()[0], vec![0, 0, 1, 0, 0]);
        assert_eq!(editor.cursor(), (0, 3));
    }

    #[test]
    fn keypad_two_moves_up_and_eight_moves_down() {
        let builder = SeedBuilder::new(2, 2, 5, 80).unwrap();
        let mut editor = builder.editor(true);
        editor.handle(SeedKey::Digit(8));
        assert_eq!(editor.cursor(), (1, 0));
        editor.handle(SeedKey::Digit(2));
        assert_eq!(editor.cursor(), (0, 0));
    }
}
