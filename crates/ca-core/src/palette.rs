use crate::error::CoreError;
use crate::grid::Symbol;

/// Couleur RGB, même convention que les cellules du canvas.
pub type Rgb = (u8, u8, u8);

pub const WHITE: Rgb = (255, 255, 255);
pub const GRAY: Rgb = (128, 128, 128);
pub const BLACK: Rgb = (0, 0, 0);

/// Une couleur par symbole : l'index est la valeur de la cellule.
///
/// # Example
/// ```
/// use ca_core::palette::{Palette, BLACK, WHITE};
/// let palette = Palette::for_base(2);
/// assert_eq!(palette.color(0), WHITE);
/// assert_eq!(palette.color(1), BLACK);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build from an explicit color list.
    #[must_use]
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self { colors }
    }

    /// Default palette for `base` symbols: white → black, gray ramp in between.
    #[must_use]
    pub fn for_base(base: u8) -> Self {
        match base {
            0 | 1 => Self::new(vec![WHITE]),
            2 => Self::new(vec![WHITE, BLACK]),
            3 => Self::new(vec![WHITE, GRAY, BLACK]),
            n => {
                let last = u16::from(n - 1);
                let colors = (0..=last)
                    .map(|i| {
                        let v = (255 - i * 255 / last) as u8;
                        (v, v, v)
                    })
                    .collect();
                Self::new(colors)
            }
        }
    }

    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Color for `symbol`; unknown symbols fall back to the last color.
    #[inline]
    #[must_use]
    pub fn color(&self, symbol: Symbol) -> Rgb {
        self.colors
            .get(usize::from(symbol))
            .or_else(|| self.colors.last())
            .copied()
            .unwrap_or(BLACK)
    }

    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Replace one color.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidModification` if `index` is outside the palette.
    pub fn set(&mut self, index: usize, color: Rgb) -> Result<(), CoreError> {
        let len = self.colors.len();
        let slot = self.colors.get_mut(index).ok_or_else(|| {
            CoreError::InvalidModification(format!("couleur {index} hors palette ({len})"))
        })?;
        *slot = color;
        Ok(())
    }

    /// Replace every color at once. The palette is left untouched on error.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidModification` if `colors.len()` differs from
    /// the palette size.
    pub fn set_all(&mut self, colors: &[Rgb]) -> Result<(), CoreError> {
        if colors.len() != self.colors.len() {
            return Err(CoreError::InvalidModification(format!(
                "{} couleurs fournies, {} attendues",
                colors.len(),
                self.colors.len()
            )));
        }
        self.colors.copy_from_slice(colors);
        Ok(())
    }

    /// Même palette, ordre inversé.
    #[must_use]
    pub fn inverted(&self) -> Self {
        let mut colors = self.colors.clone();
        colors.reverse();
        Self::new(colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palettes_match_base() {
        assert_eq!(Palette::for_base(2).len(), 2);
        assert_eq!(Palette::for_base(3).colors(), &[WHITE, GRAY, BLACK]);
        let five = Palette::for_base(5);
        assert_eq!(five.len(), 5);
        assert_eq!(five.color(0), WHITE);
        assert_eq!(five.color(4), BLACK);
    }

    #[test]
    fn set_all_mismatch_leaves_palette_unchanged() {
        let mut palette = Palette::for_base(3);
        let before = palette.clone();
        assert!(palette.set_all(&[BLACK, WHITE]).is_err());
        assert_eq!(palette, before);
        assert!(palette.set_all(&[BLACK, GRAY, WHITE]).is_ok());
        assert_eq!(palette, before.inverted());
    }

    #[test]
    fn set_checks_index() {
        let mut palette = Palette::for_base(2);
        assert!(palette.set(2, GRAY).is_err());
        palette.set(1, GRAY).unwrap();
        assert_eq!(palette.color(1), GRAY);
    }

    #[test]
    fn unknown_symbol_uses_last_color() {
        let palette = Palette::for_base(2);
        assert_eq!(palette.color(7), BLACK);
    }
}
