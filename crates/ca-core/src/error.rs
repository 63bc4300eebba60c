use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Rule table of the wrong length, a symbol outside the base, or a manual
    /// rule number outside `[0, base^len - 1]`.
    #[error("Règle invalide : {0}")]
    InvalidRule(String),

    /// Seed wider than the display, too narrow, or malformed.
    #[error("Seed invalide : {0}")]
    InvalidSeed(String),

    /// Modification argument of the wrong shape. Swallowed by `Automaton::apply`.
    #[error("Modification ignorée : {0}")]
    InvalidModification(String),

    /// Grid access outside its bounds.
    #[error("Hors limites : ({row}, {col}) dans une grille {height}×{width}")]
    OutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid height.
        height: usize,
        /// Grid width.
        width: usize,
    },

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}
