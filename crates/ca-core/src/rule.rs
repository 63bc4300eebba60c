use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::grid::Symbol;

/// Comment un voisinage est converti en index de table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Encoding {
    /// Base-`base` number, first cell most significant.
    Positional,
    /// Somme directe des cellules (automates totalistiques).
    Totalistic,
}

/// Forme d'une table de règle : base, taille du voisinage, encodage.
///
/// # Example
/// ```
/// use ca_core::rule::{Encoding, RuleShape};
/// assert_eq!(RuleShape::new(2, 3, Encoding::Positional).len(), 8);
/// assert_eq!(RuleShape::new(2, 4, Encoding::Positional).len(), 16);
/// assert_eq!(RuleShape::new(3, 3, Encoding::Totalistic).len(), 7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleShape {
    /// Number of symbols a cell may hold.
    pub base: u8,
    /// Cells read per output cell.
    pub neighborhood: usize,
    /// Neighborhood → index mapping.
    pub encoding: Encoding,
}

impl RuleShape {
    #[must_use]
    pub const fn new(base: u8, neighborhood: usize, encoding: Encoding) -> Self {
        Self {
            base,
            neighborhood,
            encoding,
        }
    }

    /// Nombre d'entrées de la table.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        let base = usize::from(self.base);
        match self.encoding {
            Encoding::Positional => base.saturating_pow(self.neighborhood as u32),
            Encoding::Totalistic => self.neighborhood * base.saturating_sub(1) + 1,
        }
    }

    /// Largest accepted manual rule number, `base^len - 1`.
    ///
    /// Saturates at `u64::MAX` for shapes whose numbers do not fit.
    #[must_use]
    pub fn max_number(&self) -> u64 {
        u64::from(self.base)
            .checked_pow(self.len() as u32)
            .map_or(u64::MAX, |n| n - 1)
    }
}

/// Table de correspondance voisinage encodé → symbole. Immuable une fois construite.
///
/// # Example
/// ```
/// use ca_core::rule::{Encoding, RuleShape, RuleTable};
/// let rule = RuleTable::manual(110, RuleShape::new(2, 3, Encoding::Positional)).unwrap();
/// assert_eq!(rule.as_slice(), &[0, 1, 1, 1, 0, 1, 1, 0]);
/// assert_eq!(rule.apply(&[1, 0, 0]), 0);
/// assert_eq!(rule.apply(&[0, 0, 1]), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    shape: RuleShape,
    table: Vec<Symbol>,
}

impl RuleTable {
    /// Build a table from its entries, index 0 first.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidRule` if the length does not match the shape
    /// or an entry is outside `[0, base)`.
    pub fn from_digits(digits: &[Symbol], shape: RuleShape) -> Result<Self, CoreError> {
        if digits.len() != shape.len() {
            return Err(CoreError::InvalidRule(format!(
                "la règle doit contenir exactement {} chiffres, reçu {}",
                shape.len(),
                digits.len()
            )));
        }
        if let Some(bad) = digits.iter().find(|&&d| d >= shape.base) {
            return Err(CoreError::InvalidRule(format!(
                "symbole {bad} hors de la base {}",
                shape.base
            )));
        }
        Ok(Self {
            shape,
            table: digits.to_vec(),
        })
    }

    /// Build a built-in rule from its literal table.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidRule` naming the rule if the literal does
    /// not fit `shape`.
    pub fn named(name: &str, digits: &[Symbol], shape: RuleShape) -> Result<Self, CoreError> {
        Self::from_digits(digits, shape).map_err(|e| match e {
            CoreError::InvalidRule(msg) => CoreError::InvalidRule(format!("« {name} » : {msg}")),
            other => other,
        })
    }

    /// Build a table from a decimal rule number.
    ///
    /// The number is written in base `shape.base`, left-padded to the table
    /// length, and stored least-significant digit first: the digit of weight
    /// `base^0` answers the all-zero neighborhood.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidRule` if `value > shape.max_number()`.
    pub fn manual(value: u64, shape: RuleShape) -> Result<Self, CoreError> {
        let max = shape.max_number();
        if value > max {
            return Err(CoreError::InvalidRule(format!(
                "la règle {value} dépasse le maximum {max}"
            )));
        }
        let mut digits = to_base_digits(value, shape.base, shape.len()).ok_or_else(|| {
            CoreError::InvalidRule(format!("base {} non supportée", shape.base))
        })?;
        digits.reverse();
        Self::from_digits(&digits, shape)
    }

    /// Index of `neighborhood` in the table.
    #[inline]
    #[must_use]
    pub fn index(&self, neighborhood: &[Symbol]) -> usize {
        match self.shape.encoding {
            Encoding::Positional => {
                let base = usize::from(self.shape.base);
                neighborhood
                    .iter()
                    .fold(0, |acc, &s| acc * base + usize::from(s))
            }
            Encoding::Totalistic => neighborhood.iter().map(|&s| usize::from(s)).sum(),
        }
    }

    /// Output symbol for `neighborhood`.
    ///
    /// Neighborhoods outside the table (symbols not in the base) map to 0.
    #[inline]
    #[must_use]
    pub fn apply(&self, neighborhood: &[Symbol]) -> Symbol {
        self.table
            .get(self.index(neighborhood))
            .copied()
            .unwrap_or_default()
    }

    /// Numéro décimal de la règle (inverse de [`RuleTable::manual`]).
    ///
    /// # Example
    /// ```
    /// use ca_core::rule::{Encoding, RuleShape, RuleTable};
    /// let shape = RuleShape::new(3, 3, Encoding::Totalistic);
    /// let rule = RuleTable::from_digits(&[0, 2, 0, 2, 1, 0, 2], shape).unwrap();
    /// assert_eq!(rule.number(), 1599);
    /// ```
    #[must_use]
    pub fn number(&self) -> u64 {
        let base = u64::from(self.shape.base);
        self.table
            .iter()
            .rev()
            .fold(0u64, |acc, &d| acc.saturating_mul(base).saturating_add(u64::from(d)))
    }

    #[must_use]
    pub fn shape(&self) -> RuleShape {
        self.shape
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Symbol] {
        &self.table
    }
}

/// Écrit `value` en base `base` sur exactement `len` chiffres, poids fort en tête.
///
/// Returns `None` for bases below 2 or when `value` needs more than `len` digits.
///
/// # Example
/// ```
/// use ca_core::rule::to_base_digits;
/// assert_eq!(to_base_digits(6, 2, 4), Some(vec![0, 1, 1, 0]));
/// assert_eq!(to_base_digits(5, 3, 3), Some(vec![0, 1, 2]));
/// assert_eq!(to_base_digits(9, 3, 2), None);
/// ```
#[must_use]
pub fn to_base_digits(mut value: u64, base: u8, len: usize) -> Option<Vec<Symbol>> {
    if base < 2 {
        return None;
    }
    let b = u64::from(base);
    let mut digits = vec![0; len];
    for slot in digits.iter_mut().rev() {
        *slot = (value % b) as Symbol;
        value /= b;
    }
    if value == 0 { Some(digits) } else { None }
}
