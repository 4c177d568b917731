//! Scenario loading, saving and preset lookup.

use std::path::{Path, PathBuf};

use cp_project::{PRESET_NAMES, ProjectError, Scenario};

use crate::error::{AppError, AppResult};

/// Where a run's scenario comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioSource {
    File(PathBuf),
    Preset(String),
}

/// Summary of a preset for listing.
#[derive(Debug, Clone)]
pub struct PresetSummary {
    pub name: String,
    pub description: String,
    pub controller: &'static str,
}

/// Load and validate a scenario file (YAML, or JSON by extension).
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    cp_project::load(path).map_err(|e| match e {
        ProjectError::Io(source) => AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// Validate and write a scenario file.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    cp_project::save(path, scenario).map_err(|e| match e {
        ProjectError::Io(source) => AppError::Io(source),
        other => other.into(),
    })
}

pub fn resolve_scenario(source: &ScenarioSource) -> AppResult<Scenario> {
    match source {
        ScenarioSource::File(path) => load_scenario(path),
        ScenarioSource::Preset(name) => {
            cp_project::preset(name).ok_or_else(|| AppError::UnknownPreset(name.clone()))
        }
    }
}

pub fn list_presets() -> Vec<PresetSummary> {
    PRESET_NAMES
        .iter()
        .filter_map(|name| cp_project::preset(name))
        .map(|scenario| PresetSummary {
            controller: scenario.controller.kind(),
            description: scenario.description.clone().unwrap_or_default(),
            name: scenario.name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_listed_in_order() {
        let presets = list_presets();
        let names: Vec<&str> = presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, PRESET_NAMES);
        assert!(presets.iter().all(|p| !p.description.is_empty()));
    }

    #[test]
    fn unknown_preset_is_reported() {
        let err = resolve_scenario(&ScenarioSource::Preset("nope".into())).unwrap_err();
        assert!(matches!(err, AppError::UnknownPreset(name) if name == "nope"));
    }

    #[test]
    fn missing_file_keeps_path() {
        let path = PathBuf::from("/definitely/not/here.yaml");
        let err = load_scenario(&path).unwrap_err();
        match err {
            AppError::ScenarioFileRead { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
