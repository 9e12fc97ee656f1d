//! Per-invocation settings resolved from flags, environment, and `~/.claude`.

use crate::error::{HookError, Result};
use clap::builder::FalseyValueParser;
use clap::Args;
use std::path::PathBuf;

/// Config directory name under the home directory
const CONFIG_DIR: &str = ".claude";

/// Default rule file name inside the config directory
const RULES_FILE: &str = "skill-rules.json";

/// Default log directory name inside the config directory
const LOGS_DIR: &str = "logs";

const UNKNOWN_SESSION: &str = "unknown";

/// Flags shared by every subcommand; each falls back to an environment variable
#[derive(Debug, Clone, Default, Args)]
pub struct SettingsArgs {
    /// Claude configuration directory [default: ~/.claude]
    #[arg(long, env = "CLAUDE_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Skill rules file [default: <config-dir>/skill-rules.json]
    #[arg(long, env = "CLAUDE_SKILL_RULES", global = true)]
    pub rules: Option<PathBuf>,

    /// Session log directory [default: <config-dir>/logs]
    #[arg(long, env = "CLAUDE_SESSION_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Session identifier used in log file names
    #[arg(long, env = "CLAUDE_SESSION_ID", global = true)]
    pub session_id: Option<String>,

    /// Do not mirror log events to the gh copilot CLI
    ///
    /// The environment form takes any value; only "", "0", "false", "no",
    /// "n" and "off" leave mirroring on.
    #[arg(
        long,
        env = "CLAUDE_LOG_NO_MIRROR",
        global = true,
        value_parser = FalseyValueParser::new()
    )]
    pub no_mirror: bool,
}

/// Immutable settings for one hook invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub config_dir: PathBuf,
    pub rules_path: PathBuf,
    pub log_dir: PathBuf,
    pub session_id: String,
    pub mirror: bool,
}

impl Settings {
    pub fn resolve(args: &SettingsArgs) -> Result<Self> {
        let config_dir = match &args.config_dir {
            Some(dir) => dir.clone(),
            None => dirs::home_dir().ok_or(HookError::NoHomeDir)?.join(CONFIG_DIR),
        };

        Ok(Self {
            rules_path: args
                .rules
                .clone()
                .unwrap_or_else(|| config_dir.join(RULES_FILE)),
            log_dir: args
                .log_dir
                .clone()
                .unwrap_or_else(|| config_dir.join(LOGS_DIR)),
            session_id: args
                .session_id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_SESSION.to_string()),
            mirror: !args.no_mirror,
            config_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_derive_from_config_dir() {
        let args = SettingsArgs {
            config_dir: Some(PathBuf::from("/tmp/claude")),
            ..Default::default()
        };
        let settings = Settings::resolve(&args).unwrap();
        assert_eq!(
            settings,
            Settings {
                config_dir: PathBuf::from("/tmp/claude"),
                rules_path: PathBuf::from("/tmp/claude/skill-rules.json"),
                log_dir: PathBuf::from("/tmp/claude/logs"),
                session_id: "unknown".to_string(),
                mirror: true,
            }
        );
    }

    #[test]
    fn test_explicit_paths_win() {
        let args = SettingsArgs {
            config_dir: Some(PathBuf::from("/tmp/claude")),
            rules: Some(PathBuf::from("/etc/rules.json")),
            log_dir: Some(PathBuf::from("/var/log/claude")),
            session_id: Some("abc-123".to_string()),
            no_mirror: true,
        };
        let settings = Settings::resolve(&args).unwrap();
        assert_eq!(settings.rules_path, PathBuf::from("/etc/rules.json"));
        assert_eq!(settings.log_dir, PathBuf::from("/var/log/claude"));
        assert_eq!(settings.session_id, "abc-123");
        assert!(!settings.mirror);
    }

    #[test]
    fn test_blank_session_id_is_unknown() {
        let args = SettingsArgs {
            config_dir: Some(PathBuf::from("/tmp/claude")),
            session_id: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(Settings::resolve(&args).unwrap().session_id, "unknown");
    }
}
