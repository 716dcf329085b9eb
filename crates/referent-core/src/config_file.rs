use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{MismatchPolicy, ValidatorConfigBuilder};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub validation: Option<ValidationSection>,
    pub journals: Option<JournalsSection>,
    pub cities: Option<CitiesSection>,
    pub display: Option<DisplaySection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSection {
    /// Default style token (`GOST`, `APA`, `MLA`).
    pub style: Option<String>,
    /// Default expected subtype token.
    pub subtype: Option<String>,
    pub mismatch: Option<MismatchPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalsSection {
    /// CSV file with `journal` and `ISSN` columns.
    pub registry_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitiesSection {
    /// Extra abbreviations, e.g. `"Влад." = "Владивосток"`.
    pub extra: Option<BTreeMap<String, String>>,
    /// Drop the built-in abbreviations and use only `extra`.
    pub replace_defaults: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplaySection {
    pub color: Option<bool>,
}

/// Platform config directory path: `<config_dir>/referent/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("referent").join("config.toml"))
}

/// Load config by cascading CWD `.referent.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".referent.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        validation: Some(ValidationSection {
            style: overlay
                .validation
                .as_ref()
                .and_then(|v| v.style.clone())
                .or_else(|| base.validation.as_ref().and_then(|v| v.style.clone())),
            subtype: overlay
                .validation
                .as_ref()
                .and_then(|v| v.subtype.clone())
                .or_else(|| base.validation.as_ref().and_then(|v| v.subtype.clone())),
            mismatch: overlay
                .validation
                .as_ref()
                .and_then(|v| v.mismatch)
                .or_else(|| base.validation.as_ref().and_then(|v| v.mismatch)),
        }),
        journals: Some(JournalsSection {
            registry_path: overlay
                .journals
                .as_ref()
                .and_then(|j| j.registry_path.clone())
                .or_else(|| {
                    base.journals
                        .as_ref()
                        .and_then(|j| j.registry_path.clone())
                }),
        }),
        cities: Some(CitiesSection {
            extra: overlay
                .cities
                .as_ref()
                .and_then(|c| c.extra.clone())
                .or_else(|| base.cities.as_ref().and_then(|c| c.extra.clone())),
            replace_defaults: overlay
                .cities
                .as_ref()
                .and_then(|c| c.replace_defaults)
                .or_else(|| base.cities.as_ref().and_then(|c| c.replace_defaults)),
        }),
        display: Some(DisplaySection {
            color: overlay
                .display
                .as_ref()
                .and_then(|d| d.color)
                .or_else(|| base.display.as_ref().and_then(|d| d.color)),
        }),
    }
}

impl ConfigFile {
    pub fn style(&self) -> Option<&str> {
        self.validation.as_ref()?.style.as_deref()
    }

    pub fn subtype(&self) -> Option<&str> {
        self.validation.as_ref()?.subtype.as_deref()
    }

    pub fn registry_path(&self) -> Option<&str> {
        self.journals.as_ref()?.registry_path.as_deref()
    }

    pub fn color(&self) -> Option<bool> {
        self.display.as_ref()?.color
    }

    /// Apply the city and mismatch settings to a builder. The registry path
    /// is left to the caller, which may override it from flags or env.
    pub fn apply(&self, mut builder: ValidatorConfigBuilder) -> ValidatorConfigBuilder {
        if let Some(policy) = self.validation.as_ref().and_then(|v| v.mismatch) {
            builder = builder.mismatch_policy(policy);
        }
        if let Some(cities) = &self.cities {
            let extra: Vec<(String, String)> = cities
                .extra
                .iter()
                .flatten()
                .map(|(abbr, full)| (abbr.clone(), full.clone()))
                .collect();
            if cities.replace_defaults.unwrap_or(false) {
                builder = builder.set_city_abbreviations(extra);
            } else {
                for (abbr, full) in &extra {
                    builder = builder.add_city_abbreviation(abbr, full);
                }
            }
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_sections() {
        let toml_str = r#"
[validation]
style = "APA"
subtype = "book"
mismatch = "short_circuit"

[journals]
registry_path = "/data/vak.csv"

[cities.extra]
"Влад." = "Владивосток"

[display]
color = false
"#;
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.style(), Some("APA"));
        assert_eq!(parsed.subtype(), Some("book"));
        assert_eq!(parsed.registry_path(), Some("/data/vak.csv"));
        assert_eq!(parsed.color(), Some(false));
        assert_eq!(
            parsed.validation.unwrap().mismatch,
            Some(MismatchPolicy::ShortCircuit)
        );
    }

    #[test]
    fn absent_sections_deserialize_as_none() {
        let parsed: ConfigFile = toml::from_str("[display]\ncolor = true\n").unwrap();
        assert!(parsed.validation.is_none());
        assert!(parsed.style().is_none());
    }

    #[test]
    fn merge_overlay_wins_per_field() {
        let base = ConfigFile {
            validation: Some(ValidationSection {
                style: Some("GOST".into()),
                subtype: Some("book".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            validation: Some(ValidationSection {
                style: Some("MLA".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.style(), Some("MLA"));
        assert_eq!(merged.subtype(), Some("book"));
    }

    #[test]
    fn load_from_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = ConfigFile {
            journals: Some(JournalsSection {
                registry_path: Some("/tmp/vak.csv".into()),
            }),
            ..Default::default()
        };
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.registry_path(), Some("/tmp/vak.csv"));
    }

    #[test]
    fn load_from_path_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[validation\nstyle = ").unwrap();
        assert!(load_from_path(&path).is_none());
        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());
    }

    #[test]
    fn apply_sets_policy_and_cities() {
        let config = ConfigFile {
            validation: Some(ValidationSection {
                mismatch: Some(MismatchPolicy::ShortCircuit),
                ..Default::default()
            }),
            cities: Some(CitiesSection {
                extra: Some(BTreeMap::from([("Влад.".to_string(), "Владивосток".to_string())])),
                replace_defaults: None,
            }),
            ..Default::default()
        };
        let built = config.apply(ValidatorConfigBuilder::new()).build().unwrap();
        assert_eq!(built.mismatch_policy(), MismatchPolicy::ShortCircuit);
    }
}
