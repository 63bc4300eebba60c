use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use ca_core::config::SimConfig;
use notify::{Event, EventKind, RecursiveMode, Watcher};

/// Lance un thread qui surveille le fichier config et met à jour l'ArcSwap.
///
/// Retourne le Watcher (doit rester vivant tant que l'app tourne).
/// Only palette, delay and sidebar visibility are picked up by a running app.
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn spawn_config_watcher(
    config_path: &Path,
    config: &Arc<ArcSwap<SimConfig>>,
) -> Result<impl Watcher + use<>> {
    let config = Arc::clone(config);
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res
            && matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        {
            reload_into(&path, &config);
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Recharge `path` dans `config`. En cas d'erreur l'ancienne config reste en place.
pub fn reload_into(path: &Path, config: &ArcSwap<SimConfig>) -> bool {
    match ca_core::config::load_config(path) {
        Ok(new_config) => {
            config.store(Arc::new(new_config));
            log::info!("Config rechargée depuis {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("Erreur de rechargement config : {e:#}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_swaps_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.toml");
        std::fs::write(&path, "[sim]\ndelay_ms = 42\n").unwrap();
        let config = ArcSwap::from_pointee(SimConfig::default());
        assert!(reload_into(&path, &config));
        assert_eq!(config.load().delay_ms, Some(42));
    }

    #[test]
    fn reload_keeps_previous_config_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.toml");
        std::fs::write(&path, "[sim\n").unwrap();
        let config = ArcSwap::from_pointee(SimConfig {
            delay_ms: Some(7),
            ..SimConfig::default()
        });
        assert!(!reload_into(&path, &config));
        assert_eq!(config.load().delay_ms, Some(7));
    }
}
