//! Extension configuration
//!
//! Settings are resolved once at the boundary and passed explicitly to
//! the triggers. Layers apply in order: defaults, workspace file, editor
//! settings, CLI flags. Each layer only overrides the keys it sets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Compiler used when nothing is configured.
pub const DEFAULT_COMPILER: &str = "your_compiler";

/// Section name used by editors that group settings per language.
pub const SETTINGS_SECTION: &str = "z";

/// Workspace files searched by [`ExtensionConfig::load_default`].
const WORKSPACE_CONFIG_FILES: [&str; 4] = [
    ".z-editor.yaml",
    ".z-editor.yml",
    "z-editor.yaml",
    "z-editor.yml",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid editor settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Settings for the Z editor integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionConfig {
    /// Command used to invoke the external compiler
    pub compiler_path: String,
    /// Extra arguments passed before the source file
    pub compiler_args: Vec<String>,
    /// Compile automatically when a Z file is saved
    pub auto_compile_on_save: bool,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            compiler_path: DEFAULT_COMPILER.to_string(),
            compiler_args: Vec::new(),
            auto_compile_on_save: false,
        }
    }
}

impl ExtensionConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the first readable workspace config file, if there is one
    pub fn load_workspace(workspace_root: &Path) -> Option<Self> {
        for name in WORKSPACE_CONFIG_FILES {
            let candidate = workspace_root.join(name);
            if !candidate.exists() {
                continue;
            }

            match Self::load(&candidate) {
                Ok(config) => {
                    tracing::debug!("Loaded settings from {}", candidate.display());
                    return Some(config);
                }
                Err(e) => tracing::warn!("Ignoring {}: {}", candidate.display(), e),
            }
        }

        None
    }

    /// Load configuration from the workspace, or defaults
    pub fn load_default(workspace_root: &Path) -> Self {
        Self::load_workspace(workspace_root).unwrap_or_default()
    }

    /// Parse settings pushed by an editor on top of the defaults.
    ///
    /// Accepts both `{"z": {"compilerPath": ..}}` and the flat
    /// `{"compilerPath": ..}` shape. `null` yields the defaults.
    pub fn from_settings(settings: &Value) -> Result<Self, ConfigError> {
        Self::default().merge_settings(settings)
    }

    /// Overlay editor settings onto this configuration.
    ///
    /// Keys missing from `settings` (or set to `null`) keep their current
    /// value, so `{}` changes nothing.
    pub fn merge_settings(&self, settings: &Value) -> Result<Self, ConfigError> {
        let section = settings.get(SETTINGS_SECTION).unwrap_or(settings);
        if section.is_null() {
            return Ok(self.clone());
        }

        let overlay: Map<String, Value> = serde_json::from_value(section.clone())?;
        let mut merged = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut merged {
            for (key, value) in overlay {
                if !value.is_null() {
                    fields.insert(key, value);
                }
            }
        }

        Ok(serde_json::from_value(merged)?)
    }

    /// Override the compiler command
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler_path = compiler.into();
        self
    }

    /// Override the extra compiler arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compiler_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable compile-on-save
    pub fn with_auto_compile(mut self, enabled: bool) -> Self {
        self.auto_compile_on_save = enabled;
        self
    }
}

/// Values given on the command line. They win over every other layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub compiler_path: Option<String>,
    pub compiler_args: Option<Vec<String>>,
    pub auto_compile_on_save: Option<bool>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the overrides that are set, keep the rest of `config`
    pub fn apply(&self, mut config: ExtensionConfig) -> ExtensionConfig {
        if let Some(compiler) = &self.compiler_path {
            config.compiler_path = compiler.clone();
        }
        if let Some(args) = &self.compiler_args {
            config.compiler_args = args.clone();
        }
        if let Some(enabled) = self.auto_compile_on_save {
            config.auto_compile_on_save = enabled;
        }
        config
    }
}

/// Every settings source the editor bridge knows about, kept apart so a
/// change to one layer never discards another.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayers {
    /// Workspace file or `--config` file
    pub file: Option<ExtensionConfig>,
    /// Latest settings pushed by the editor
    pub editor: Option<Value>,
    /// Command-line flags
    pub overrides: ConfigOverrides,
}

impl ConfigLayers {
    /// Merge the layers: defaults < file < editor < overrides
    pub fn resolve(&self) -> Result<ExtensionConfig, ConfigError> {
        let base = self.file.clone().unwrap_or_default();
        let merged = match &self.editor {
            Some(settings) => base.merge_settings(settings)?,
            None => base,
        };
        Ok(self.overrides.apply(merged))
    }

    /// Like [`resolve`](Self::resolve), skipping the editor layer if it is
    /// invalid
    pub fn resolve_lossy(&self) -> ExtensionConfig {
        self.resolve().unwrap_or_else(|e| {
            tracing::warn!("Ignoring editor settings: {}", e);
            self.overrides.apply(self.file.clone().unwrap_or_default())
        })
    }
}
