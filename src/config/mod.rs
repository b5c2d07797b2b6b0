mod schema;

pub use schema::{Config, Settings, DEFAULT_OP};

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use strsim::levenshtein;
use thiserror::Error;
use tracing::debug;

use crate::rules::{self, Connective, Rule};

const CONFIG_ENV_VAR: &str = "RULEKIT_CONFIG";

/// a rule name that is not defined in the config
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule '{name}' is not defined in the config")]
pub struct UnknownRule {
    pub name: String,
    /// defined names close to the requested one
    pub suggestions: Vec<String>,
}

pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .join(".rulekit")
        .join("config.json"))
}

/// config path from the --config flag, falling back to env var and default location
pub fn get_config_path_with_override(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => get_config_path(),
    }
}

/// load config from a file, a missing file yields the default config
///
/// the file is read as JSON5 so comments and trailing commas are allowed
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = json5::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    debug!(path = %path.display(), rules = config.rules.len(), "loaded config");
    Ok(config)
}

pub fn load_with_override(path: Option<&Path>) -> Result<Config> {
    let path = get_config_path_with_override(path)?;
    load_from(&path)
}

pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    // ensure directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

pub fn save_with_override(config: &Config, path: Option<&Path>) -> Result<()> {
    let path = get_config_path_with_override(path)?;
    save_to(config, &path)
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: Config = match json5::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid config: {}", e));
        }
    };

    Ok(verify_config(&config))
}

/// check settings and every named rule, returning human-readable problems
pub fn verify_config(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();

    if config.settings.max_depth == 0 {
        errors.push("settings.max_depth: must be at least 1".to_string());
    }

    if let Err(e) = config.settings.default_op.parse::<Connective>() {
        errors.push(format!("settings.default_op: {}", e));
    }

    for (name, text) in &config.rules {
        let prefix = format!("rules.{}", name);

        if name.trim().is_empty() {
            errors.push(format!("{}: rule name must not be empty", prefix));
        }

        let rule = match rules::create_rule_with_limit(text, config.settings.max_depth.max(1)) {
            Ok(rule) => rule,
            Err(e) => {
                errors.push(format!("{}: {}", prefix, e));
                continue;
            }
        };

        for e in rules::validate_rule(&rule) {
            errors.push(format!("{}: {}", prefix, e));
        }
    }

    errors
}

/// look up a named rule's text, with suggestions when the name is unknown
pub fn find_rule<'a>(config: &'a Config, name: &str) -> Result<&'a str, UnknownRule> {
    config
        .rules
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| UnknownRule {
            name: name.to_string(),
            suggestions: suggest_rule_names(config, name),
        })
}

/// defined rule names within the suggestion threshold, closest first
pub fn suggest_rule_names(config: &Config, name: &str) -> Vec<String> {
    let query = name.to_lowercase();
    let threshold = config.settings.suggestion_threshold;

    let mut matches: Vec<(&String, usize)> = config
        .rules
        .keys()
        .map(|k| (k, levenshtein(&query, &k.to_lowercase())))
        .filter(|(_, distance)| *distance <= threshold)
        .collect();

    matches.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    matches.into_iter().map(|(k, _)| k.clone()).collect()
}

/// parse a named rule with the configured depth limit
pub fn load_rule(config: &Config, name: &str) -> Result<Rule> {
    let text = find_rule(config, name)?;
    let rule = rules::create_rule_with_limit(text, config.settings.max_depth)?;
    Ok(rule)
}

pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key.split_once('.') {
        Some(("rules", name)) if !name.is_empty() => {
            config.rules.insert(name.to_string(), value.to_string());
        }
        Some(("settings", "max_depth")) => {
            let depth: usize = value
                .parse()
                .with_context(|| format!("Invalid number: {}", value))?;
            if depth == 0 {
                return Err(anyhow!("max_depth must be at least 1"));
            }
            config.settings.max_depth = depth;
        }
        Some(("settings", "default_op")) => {
            let op: Connective = value.parse()?;
            config.settings.default_op = op.to_string();
        }
        Some(("settings", "suggestion_threshold")) => {
            config.settings.suggestion_threshold = value
                .parse()
                .with_context(|| format!("Invalid number: {}", value))?;
        }
        _ => {
            return Err(anyhow!(
                "Unknown config key: {}. Valid keys: rules.<name>, settings.max_depth, settings.default_op, settings.suggestion_threshold",
                key
            ));
        }
    }

    Ok(())
}

/// remove a named rule, returning its text
pub fn remove_rule(config: &mut Config, name: &str) -> Result<String> {
    match config.rules.remove(name) {
        Some(text) => Ok(text),
        None => Err(UnknownRule {
            name: name.to_string(),
            suggestions: suggest_rule_names(config, name),
        }
        .into()),
    }
}

/// generates a default config with example rules
pub fn default_with_examples() -> Config {
    let mut config = Config::default();

    config.rules.insert(
        "sales_or_marketing".to_string(),
        "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing'))"
            .to_string(),
    );
    config.rules.insert(
        "experienced".to_string(),
        "experience > 5 AND salary < 100000".to_string(),
    );

    config
}
