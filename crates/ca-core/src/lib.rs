//! Moteur d'automates cellulaires 1D pour cellscii.
//!
//! This crate holds the grid, rule tables, the three automaton families,
//! seed construction, the configuration resolver and the TOML config.
//! It never touches the terminal.

pub mod automaton;
pub mod config;
pub mod error;
pub mod grid;
pub mod palette;
pub mod presets;
pub mod resolver;
pub mod rule;
pub mod seed;

pub use automaton::{Automaton, Family, Modification};
pub use config::SimConfig;
pub use error::CoreError;
pub use grid::{Grid, Symbol};
pub use palette::{Palette, Rgb};
pub use presets::Presets;
pub use resolver::{Prompter, Resolver};
pub use rule::RuleTable;
