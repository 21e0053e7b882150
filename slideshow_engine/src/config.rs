// Run configuration.
//
// `RunConfig` is the single record describing a run: where datasets live,
// which ones to process, where results go, the base seed, and the search
// parameters in `SearchConfig`. It is built once at startup (defaults, then
// an optional JSON file, then command-line overrides) and passed by
// reference into the orchestrator. Nothing in the engine reads global state.
//
// Defaults reproduce the tuned values of earlier contest runs: pair
// verticals within the 20 most recent candidates, re-route 50-slide windows
// 10 000 times, then try 10 000 single-slide relocations.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Strategy for combining vertical photos into slides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    /// Pair each photo with the candidate, among the most recently unpaired
    /// ones, that maximizes combined tag coverage.
    #[default]
    Windowed,
    /// Pair the photo with fewest tags with the one with most, and so on
    /// inwards.
    FoldExtremes,
    /// No pairing: every vertical photo gets its own slide.
    Singletons,
}

/// Parameters for slide building and both optimizers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// How many unpaired candidates the windowed pairing examines.
    pub pairing_window: usize,
    pub pairing: PairingStrategy,
    /// Shuffle the initial slide order before optimizing.
    pub shuffle_initial: bool,
    /// Slides per re-routed window.
    pub reroute_window: usize,
    pub reroute_iterations: usize,
    pub relocate_iterations: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pairing_window: 20,
            pairing: PairingStrategy::Windowed,
            shuffle_initial: false,
            reroute_window: 50,
            reroute_iterations: 10_000,
            relocate_iterations: 10_000,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pairing_window == 0 {
            return Err(ConfigError::ZeroPairingWindow);
        }
        if self.reroute_window < 2 {
            return Err(ConfigError::RerouteWindowTooSmall(self.reroute_window));
        }
        Ok(())
    }
}

/// Everything a run needs, constructed once at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Dataset file names, relative to `data_dir`.
    pub datasets: Vec<String>,
    /// Base seed; each dataset derives its own stream from it.
    pub seed: u64,
    /// Worker threads; 0 lets rayon decide.
    pub threads: usize,
    pub search: SearchConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("datasets"),
            out_dir: PathBuf::from("out"),
            datasets: [
                "a_example.txt",
                "b_lovely_landscapes.txt",
                "c_memorable_moments.txt",
                "d_pet_pictures.txt",
                "e_shiny_selfies.txt",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            seed: 1,
            threads: 0,
            search: SearchConfig::default(),
        }
    }
}

impl RunConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.datasets.len(), 5);
        assert_eq!(config.search.pairing_window, 20);
        assert_eq!(config.search.reroute_window, 50);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = RunConfig::from_json(
            r#"{ "seed": 9, "datasets": ["x.txt"], "search": { "reroute_window": 8, "pairing": "fold_extremes" } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.datasets, vec!["x.txt".to_string()]);
        assert_eq!(config.search.reroute_window, 8);
        assert_eq!(config.search.pairing, PairingStrategy::FoldExtremes);
        assert_eq!(config.search.relocate_iterations, 10_000);
        assert_eq!(config.data_dir, PathBuf::from("datasets"));
    }

    #[test]
    fn json_round_trip() {
        let mut config = RunConfig::default();
        config.search.shuffle_initial = true;
        config.threads = 3;
        let json = config.to_json().unwrap();
        assert_eq!(RunConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            RunConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn rejects_degenerate_windows() {
        let mut search = SearchConfig::default();
        search.pairing_window = 0;
        assert_eq!(search.validate(), Err(ConfigError::ZeroPairingWindow));

        let mut search = SearchConfig::default();
        search.reroute_window = 1;
        assert_eq!(search.validate(), Err(ConfigError::RerouteWindowTooSmall(1)));
    }
}
