use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::debug;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::rules::{self, Connective, EvalContext};

use super::error::CommandError;
use super::exit_codes;
use super::output::{self, CheckData, CombineData, EvalData, OutputMode, ParseData, VerifyData};

#[derive(Parser)]
#[command(name = "rulekit")]
#[command(about = "Parse, combine and evaluate boolean attribute rules")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides RULEKIT_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log parser and evaluator activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.json, self.no_json, self.quiet)
    }
}

/// attribute values to evaluate against
#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    /// Context as a JSON object, e.g. '{"age": 35, "department": "Sales"}'
    #[arg(short, long, conflicts_with = "context_file")]
    pub context: Option<String>,

    /// Read the context JSON object from a file
    #[arg(long, value_name = "PATH")]
    pub context_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a rule and show its tree
    Parse {
        /// Rule text, e.g. "age > 30 AND department = 'Sales'"
        rule: String,
    },

    /// Evaluate a rule against a context
    Eval {
        /// Rule text
        rule: String,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Combine two rules under a new AND / OR root
    Combine {
        /// Left rule text
        left: String,

        /// Right rule text
        right: String,

        /// Connective: AND or OR (defaults to settings.default_op)
        #[arg(long)]
        op: Option<String>,

        // optional: evaluate the combined rule as well
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Evaluate named rules from the config, combined in order
    Check {
        /// Rule name(s) from the config
        #[arg(short, long = "rule", required = true, action = clap::ArgAction::Append)]
        rules: Vec<String>,

        /// Connective joining the rules (defaults to settings.default_op)
        #[arg(long)]
        op: Option<String>,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "rules.adult" or "settings.max_depth")
        key: String,
        /// Value to set
        value: String,
    },
    /// Remove a named rule
    Remove {
        /// Rule name
        name: String,
    },
    /// Reset configuration to defaults
    Reset,
    /// Show the default configuration with example rules
    Default,
    /// Verify configuration file for errors
    Verify,
}

pub fn execute(cli: Cli) -> Result<(), CommandError> {
    let output_mode = cli.output_mode();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Parse { rule } => {
            let config = load_config(config_path)?;
            let tree = rules::create_rule_with_limit(&rule, config.settings.max_depth)?;
            let warnings: Vec<String> = rules::validate_rule(&tree)
                .iter()
                .map(ToString::to_string)
                .collect();

            match output_mode {
                OutputMode::Json => output::print_json(&ParseData {
                    action: "parse",
                    rule: tree.to_string(),
                    depth: tree.depth(),
                    operands: tree.operands().len(),
                    ast: &tree,
                    warnings,
                }),
                OutputMode::Text => {
                    print!("{}", output::render_tree(&tree));
                    for warning in &warnings {
                        eprintln!("warning: {}", warning);
                    }
                }
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Eval { rule, context } => {
            let config = load_config(config_path)?;
            let ctx = require_context(&context)?;
            let tree = rules::create_rule_with_limit(&rule, config.settings.max_depth)?;
            let result = rules::evaluate_rule_with_limit(&tree, &ctx, config.settings.max_depth)?;

            match output_mode {
                OutputMode::Json => output::print_json(&EvalData {
                    action: "eval",
                    rule: tree.to_string(),
                    result,
                }),
                OutputMode::Text => println!("{}", result),
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Combine {
            left,
            right,
            op,
            context,
        } => {
            let config = load_config(config_path)?;
            let max_depth = config.settings.max_depth;
            let op = op.unwrap_or_else(|| config.settings.default_op.clone());

            let left = rules::create_rule_with_limit(&left, max_depth)?;
            let right = rules::create_rule_with_limit(&right, max_depth)?;
            let combined = rules::combine_rules(&left, &right, &op)?;

            let result = match load_context(&context)? {
                Some(ctx) => Some(rules::evaluate_rule_with_limit(&combined, &ctx, max_depth)?),
                None => None,
            };

            match output_mode {
                OutputMode::Json => output::print_json(&CombineData {
                    action: "combine",
                    op: connective_of(&combined),
                    rule: combined.to_string(),
                    ast: &combined,
                    result,
                }),
                OutputMode::Text => {
                    println!("{}", combined);
                    if let Some(result) = result {
                        println!("{}", result);
                    }
                }
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Check {
            rules: names,
            op,
            context,
        } => {
            let config = load_config(config_path)?;
            let ctx = require_context(&context)?;
            let op: Connective = op
                .as_deref()
                .unwrap_or(&config.settings.default_op)
                .parse()?;

            let mut trees = Vec::with_capacity(names.len());
            for name in &names {
                trees.push(config::load_rule(&config, name)?);
            }

            let combined = rules::combine_all(&trees, op)
                .ok_or_else(|| CommandError::invalid_args("at least one --rule is required"))?;
            debug!(rules = ?names, %op, "checking named rules");

            let result =
                rules::evaluate_rule_with_limit(&combined, &ctx, config.settings.max_depth)?;

            match output_mode {
                OutputMode::Json => output::print_json(&CheckData {
                    action: "check",
                    rules: names,
                    op: op.as_str(),
                    rule: combined.to_string(),
                    result,
                }),
                OutputMode::Text => println!("{}", result),
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Config { command } => execute_config(command, config_path, output_mode),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "rulekit", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn execute_config(
    command: ConfigCommands,
    config_path: Option<&Path>,
    output_mode: OutputMode,
) -> Result<(), CommandError> {
    match command {
        ConfigCommands::Show => {
            let config = load_config(config_path)?;
            print_config(&config, output_mode)
        }
        ConfigCommands::Path => {
            let path = config::get_config_path_with_override(config_path)?;
            if !output_mode.is_quiet() {
                println!("{}", path.display());
            }
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let mut config = load_config(config_path)?;
            config::set_value(&mut config, &key, &value)
                .map_err(|e| CommandError::config(format!("{:#}", e)))?;

            // a rule that can never evaluate is almost certainly a typo
            if let Some(name) = key.strip_prefix("rules.") {
                let tree = rules::create_rule_with_limit(&value, config.settings.max_depth)?;
                if let Some(e) = rules::validate_rule(&tree).into_iter().next() {
                    return Err(CommandError::from(e));
                }
                debug!(rule = name, "rule validated");
            }

            config::save_with_override(&config, config_path)?;
            if !output_mode.is_quiet() {
                println!("Set {} = {}", key, value);
            }
            Ok(())
        }
        ConfigCommands::Remove { name } => {
            let mut config = load_config(config_path)?;
            config::remove_rule(&mut config, &name)?;
            config::save_with_override(&config, config_path)?;
            if !output_mode.is_quiet() {
                println!("Removed rule '{}'", name);
            }
            Ok(())
        }
        ConfigCommands::Reset => {
            let config = Config::default();
            config::save_with_override(&config, config_path)?;
            if !output_mode.is_quiet() {
                println!("Configuration reset to defaults");
            }
            Ok(())
        }
        ConfigCommands::Default => print_config(&config::default_with_examples(), output_mode),
        ConfigCommands::Verify => {
            let path = config::get_config_path_with_override(config_path)?;
            let errors = config::verify(&path)
                .map_err(|e| CommandError::config(format!("{:#}", e)))?;
            let valid = errors.is_empty();

            match output_mode {
                OutputMode::Json => output::print_json(&VerifyData {
                    action: "verify",
                    path: path.display().to_string(),
                    valid,
                    errors,
                }),
                OutputMode::Text if valid => {
                    println!("✓ Configuration is valid: {}", path.display());
                }
                OutputMode::Text => {
                    println!(
                        "✗ Configuration has {} error(s): {}",
                        errors.len(),
                        path.display()
                    );
                    println!();
                    for error in &errors {
                        println!("  - {}", error);
                    }
                }
                OutputMode::Quiet => {}
            }

            if valid {
                Ok(())
            } else if output_mode.is_json() {
                // the verify result already carries the errors
                std::process::exit(exit_codes::CONFIG_ERROR);
            } else {
                Err(CommandError::config("configuration validation failed"))
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, CommandError> {
    config::load_with_override(path).map_err(|e| CommandError::config(format!("{:#}", e)))
}

fn print_config(config: &Config, output_mode: OutputMode) -> Result<(), CommandError> {
    match output_mode {
        OutputMode::Json => output::print_json(config),
        OutputMode::Text => {
            let json = serde_json::to_string_pretty(config)
                .map_err(|e| CommandError::general(format!("Failed to serialize config: {}", e)))?;
            println!("{}", json);
        }
        OutputMode::Quiet => {}
    }
    Ok(())
}

/// read the context from --context or --context-file, if either was given
fn load_context(args: &ContextArgs) -> Result<Option<EvalContext>, CommandError> {
    let raw = match (&args.context, &args.context_file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => fs::read_to_string(path).map_err(|e| {
            CommandError::invalid_args(format!(
                "failed to read context file {}: {}",
                path.display(),
                e
            ))
        })?,
        (None, None) => return Ok(None),
    };

    let ctx: EvalContext = serde_json::from_str(&raw).map_err(|e| {
        CommandError::invalid_args(format!(
            "context must be a JSON object of integer or string values: {}",
            e
        ))
    })?;

    debug!(attributes = ctx.len(), "loaded evaluation context");
    Ok(Some(ctx))
}

fn require_context(args: &ContextArgs) -> Result<EvalContext, CommandError> {
    load_context(args)?.ok_or_else(|| {
        CommandError::invalid_args("an evaluation context is required (--context or --context-file)")
    })
}

fn connective_of(rule: &rules::Node) -> &'static str {
    match rule {
        rules::Node::Operator { op, .. } => op.as_str(),
        rules::Node::Operand { .. } => "",
    }
}
