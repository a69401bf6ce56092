//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order
const PROJECT_CONFIG_FILES: [&str; 2] = ["council.toml", ".council.toml"];

/// Prefix of environment overrides; `__` separates nested keys
const ENV_PREFIX: &str = "COUNCIL_";

/// Configuration loader that handles file discovery and merging
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    global_path: Option<PathBuf>,
    project_dir: PathBuf,
    explicit_path: Option<PathBuf>,
    use_env: bool,
}

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `COUNCIL_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./council.toml` or `./.council.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/llm-council/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut loader = Self::discover();
        loader.explicit_path = config_path.cloned();
        loader.extract()
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Loader over the standard locations, relative to the current directory
    pub fn discover() -> Self {
        Self {
            global_path: Self::global_config_path(),
            project_dir: PathBuf::from("."),
            explicit_path: None,
            use_env: true,
        }
    }

    /// Loader over explicit locations and no environment layer
    pub fn with_sources(global_path: Option<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_path,
            project_dir: project_dir.into(),
            explicit_path: None,
            use_env: false,
        }
    }

    pub fn with_explicit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    pub fn with_env(mut self, use_env: bool) -> Self {
        self.use_env = use_env;
        self
    }

    /// Merge every source that exists and deserialize the result
    pub fn extract(&self) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = &self.global_path
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = find_project_config(&self.project_dir) {
            figment = figment.merge(Toml::file(project_path));
        }

        // A missing explicit file is an error rather than a silent skip
        if let Some(path) = &self.explicit_path {
            figment = figment.merge(Toml::file_exact(path));
        }

        if self.use_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        figment.extract().map_err(Box::new)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/llm-council/config.toml if set,
    /// otherwise falls back to ~/.config/llm-council/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("llm-council").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        find_project_config(Path::new("."))
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./council.toml or ./.council.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

fn find_project_config(dir: &Path) -> Option<PathBuf> {
    PROJECT_CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.council.default_mode, "chat");
        assert!(config.search.enabled);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("llm-council"));
    }

    #[test]
    fn test_no_files_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::with_sources(None, dir.path()).extract().unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        fs::write(
            &global,
            "[title]\ntimeout_secs = 5\n\n[openrouter]\ntimeout_secs = 90\n",
        )
        .unwrap();
        fs::write(dir.path().join(".council.toml"), "[title]\ntimeout_secs = 7\n").unwrap();

        let config = ConfigLoader::with_sources(Some(global), dir.path())
            .extract()
            .unwrap();
        assert_eq!(config.title.timeout_secs, 7);
        assert_eq!(config.openrouter.timeout_secs, 90);
    }

    #[test]
    fn test_council_toml_preferred_over_hidden() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("council.toml"), "[council]\ndefault_mode = \"code\"\n").unwrap();
        fs::write(dir.path().join(".council.toml"), "[council]\ndefault_mode = \"image\"\n")
            .unwrap();

        let config = ConfigLoader::with_sources(None, dir.path()).extract().unwrap();
        assert_eq!(config.council.default_mode, "code");
    }

    #[test]
    fn test_explicit_path_has_highest_file_priority() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("council.toml"), "[storage]\ndata_dir = \"project\"\n").unwrap();
        let explicit = dir.path().join("custom.toml");
        fs::write(&explicit, "[storage]\ndata_dir = \"explicit\"\n").unwrap();

        let config = ConfigLoader::with_sources(None, dir.path())
            .with_explicit_path(&explicit)
            .extract()
            .unwrap();
        assert_eq!(config.storage.data_dir, "explicit");
        assert!(config.search.enabled);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = TempDir::new().unwrap();
        let result = ConfigLoader::with_sources(None, dir.path())
            .with_explicit_path(dir.path().join("missing.toml"))
            .extract();
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("council.toml"), "[title\n").unwrap();
        assert!(ConfigLoader::with_sources(None, dir.path()).extract().is_err());
    }
}
