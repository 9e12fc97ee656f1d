//! Append-only session event log with sensitive-data redaction.
//!
//! Each event is one JSON line written with a single `write_all` on a file
//! opened in append mode, so concurrent hook processes never interleave
//! partial lines. Events can optionally be mirrored to the `gh copilot` CLI;
//! that call is bounded by a short timeout and every failure is ignored.

use crate::error::{HookError, Result};
use crate::hook::HookInput;
use chrono::Local;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Replacement for anything that looks like a credential
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Longest mirrored summary, in chars
const MIRROR_SUMMARY_CHARS: usize = 500;

/// Longest logged tool input, in chars
const TOOL_INPUT_CHARS: usize = 500;

const MIRROR_TIMEOUT: Duration = Duration::from_secs(2);

lazy_static! {
    static ref SENSITIVE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r#"(?i)password["\s:=]+[^"\s]+"#).unwrap(),
        Regex::new(r#"(?i)api[_-]?key["\s:=]+[^"\s]+"#).unwrap(),
        Regex::new(r#"(?i)secret["\s:=]+[^"\s]+"#).unwrap(),
        Regex::new(r#"(?i)token["\s:=]+[^"\s]+"#).unwrap(),
        Regex::new(r"(?i)authorization:\s*bearer\s+\S+").unwrap(),
    ];
    static ref SENSITIVE_KEY: Regex =
        Regex::new(r"(?i)^(password|passwd|api[_-]?key|secret|token|access[_-]?token|authorization)$")
            .unwrap();
    static ref UNSAFE_FILE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
}

/// Scrub credential-looking substrings from free text
pub fn redact(text: &str) -> String {
    SENSITIVE_PATTERNS
        .iter()
        .fold(text.to_string(), |acc, re| {
            re.replace_all(&acc, REDACTION_MARKER).into_owned()
        })
}

/// Redact every string leaf; values under credential-named keys are dropped whole
pub fn redact_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(redact(s)),
        Value::Array(items) => Value::Array(items.iter().map(redact_value).collect()),
        Value::Object(map) => Value::Object(redact_map(map)),
        other => other.clone(),
    }
}

fn redact_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| {
            let value = if SENSITIVE_KEY.is_match(key) && !value.is_null() {
                Value::String(REDACTION_MARKER.to_string())
            } else {
                redact_value(value)
            };
            (key.clone(), value)
        })
        .collect()
}

/// One line of the session log
#[derive(Debug, Serialize)]
pub struct LogEvent {
    pub timestamp: String,
    pub event_type: String,
    pub session_id: String,
    pub data: Map<String, Value>,
}

/// External CLI that receives a short copy of each event
#[derive(Debug, Clone)]
pub struct Mirror {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Default for Mirror {
    fn default() -> Self {
        Self {
            program: "gh".to_string(),
            args: vec!["copilot".into(), "suggest".into(), "--".into()],
            timeout: MIRROR_TIMEOUT,
        }
    }
}

impl Mirror {
    /// Best-effort send; never returns an error
    pub fn send(&self, payload: &str) {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                debug!("Mirror runtime unavailable: {}", e);
                return;
            }
        };

        match runtime.block_on(self.run(payload)) {
            Ok(()) => debug!("Mirrored event to {}", self.program),
            Err(reason) => debug!("Mirror to {} skipped: {}", self.program, reason),
        }
    }

    async fn run(&self, payload: &str) -> std::result::Result<(), String> {
        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| e.to_string())?;

        let stdin = child.stdin.take();
        let exchange = async {
            if let Some(mut stdin) = stdin {
                stdin.write_all(payload.as_bytes()).await?;
                // Close stdin so the child sees EOF
                drop(stdin);
            }
            child.wait().await
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(format!("exited with {}", status)),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => {
                let _ = child.start_kill();
                Err(format!("timed out after {:?}", self.timeout))
            }
        }
    }
}

/// Writes redacted events to `<log_dir>/session-<date>-<session>.jsonl`
#[derive(Debug, Clone)]
pub struct EventLogger {
    log_dir: PathBuf,
    session_id: String,
    mirror: Option<Mirror>,
}

impl EventLogger {
    pub fn new(log_dir: PathBuf, session_id: impl Into<String>, mirror: Option<Mirror>) -> Self {
        Self {
            log_dir,
            session_id: session_id.into(),
            mirror,
        }
    }

    pub fn session_file(&self) -> PathBuf {
        let date = Local::now().format("%Y-%m-%d");
        let session = UNSAFE_FILE_CHARS.replace_all(&self.session_id, "_");
        self.log_dir.join(format!("session-{}-{}.jsonl", date, session))
    }

    /// Append one event; failures are reported on stderr and swallowed
    pub fn log(&self, event_type: &str, data: Map<String, Value>) {
        let event = LogEvent {
            timestamp: Local::now().to_rfc3339(),
            event_type: event_type.to_string(),
            session_id: self.session_id.clone(),
            data: redact_map(&data),
        };

        match self.append(&event) {
            Ok(path) => debug!("Logged {} to {:?}", event_type, path),
            Err(e) => {
                warn!("Logging error: {}", e);
                return;
            }
        }

        if let Some(mirror) = &self.mirror {
            mirror.send(&mirror_payload(&event));
        }
    }

    fn append(&self, event: &LogEvent) -> Result<PathBuf> {
        let path = self.session_file();
        let write_err = |source| HookError::LogWrite {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.log_dir).map_err(write_err)?;

        let mut line = serde_json::to_string(event).map_err(HookError::LogSerialize)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(write_err)?;
        file.write_all(line.as_bytes()).map_err(write_err)?;

        Ok(path)
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn mirror_payload(event: &LogEvent) -> String {
    let data = serde_json::to_string_pretty(&event.data).unwrap_or_default();
    let summary = truncate_chars(
        &format!("[Claude] {}: {}", event.event_type, data),
        MIRROR_SUMMARY_CHARS,
    );
    format!("{}\n# Claude Code Log", redact(&summary))
}

/// Session lifecycle commands accepted by `log`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogCommand {
    Start,
    End,
    LogTool,
}

fn current_dir() -> String {
    std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn current_user() -> String {
    std::env::var("USERNAME")
        .or_else(|_| std::env::var("USER"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Event type and payload for a lifecycle command
pub fn session_event(
    command: LogCommand,
    input: Option<&HookInput>,
) -> (&'static str, Map<String, Value>) {
    let mut data = Map::new();
    match command {
        LogCommand::Start => {
            data.insert("cwd".into(), Value::String(current_dir()));
            data.insert("user".into(), Value::String(current_user()));
            ("session_start", data)
        }
        LogCommand::End => {
            data.insert("cwd".into(), Value::String(current_dir()));
            ("session_end", data)
        }
        LogCommand::LogTool => {
            let tool = input
                .and_then(|i| i.tool_name.clone())
                .unwrap_or_else(|| "unknown".to_string());
            // Patterns must see string leaves before JSON escaping
            let raw_input = match input.and_then(|i| i.input.as_ref()).map(redact_value) {
                Some(Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => "{}".to_string(),
            };
            data.insert("tool".into(), Value::String(tool));
            data.insert(
                "input".into(),
                Value::String(truncate_chars(&raw_input, TOOL_INPUT_CHARS)),
            );
            ("tool_use", data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Instant;

    fn read_lines(logger: &EventLogger) -> Vec<Value> {
        fs::read_to_string(logger.session_file())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_redact_api_key() {
        let redacted = redact("api_key=abcd1234 please continue");
        assert!(!redacted.contains("abcd1234"));
        assert_eq!(redacted, "[REDACTED] please continue");
    }

    #[test]
    fn test_redact_patterns() {
        for text in [
            "PASSWORD: hunter2",
            "my api-key=\"sk-live-123\"",
            "client secret = s3cr3t",
            "token=eyJhbGciOi",
            "Authorization: Bearer abc.def.ghi",
        ] {
            let redacted = redact(text);
            assert!(redacted.contains(REDACTION_MARKER), "{text} -> {redacted}");
        }
        assert_eq!(redact("nothing to hide"), "nothing to hide");
    }

    #[test]
    fn test_redact_value_recurses() {
        let value = json!({
            "command": "curl -H 'Authorization: Bearer xyz123' https://example.com",
            "nested": ["password=hunter2", 42, true],
            "token": "plain-value",
            "count": 3
        });
        let redacted = redact_value(&value);
        let text = redacted.to_string();
        assert!(!text.contains("xyz123"));
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("plain-value"));
        assert_eq!(redacted["count"], json!(3));
        assert_eq!(redacted["nested"][1], json!(42));
    }

    #[test]
    fn test_log_appends_redacted_lines() {
        let dir = tempfile::tempdir().unwrap();
        let logger = EventLogger::new(dir.path().join("logs"), "sess-1", None);

        logger.log(
            "prompt",
            map(json!({"text": "api_key=abcd1234 please continue"})),
        );
        logger.log("session_end", map(json!({"cwd": "/work"})));

        let raw = fs::read_to_string(logger.session_file()).unwrap();
        assert!(!raw.contains("abcd1234"));
        assert!(raw.contains(REDACTION_MARKER));

        let lines = read_lines(&logger);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event_type"], "prompt");
        assert_eq!(lines[0]["session_id"], "sess-1");
        assert_eq!(lines[1]["data"]["cwd"], "/work");
        assert!(lines[0]["timestamp"].is_string());
    }

    #[test]
    fn test_session_file_name_is_sanitised() {
        let logger = EventLogger::new(PathBuf::from("/tmp/logs"), "../../etc/passwd", None);
        let path = logger.session_file();
        assert_eq!(path.parent(), Some(std::path::Path::new("/tmp/logs")));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("session-"));
        assert!(name.ends_with("-.._.._etc_passwd.jsonl"));
    }

    #[test]
    fn test_log_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();
        let logger = EventLogger::new(blocker.join("logs"), "s", None);
        logger.log("session_start", Map::new());
        assert!(!logger.session_file().exists());
    }

    #[test]
    fn test_mirror_payload_is_bounded_and_redacted() {
        let event = LogEvent {
            timestamp: "t".into(),
            event_type: "tool_use".into(),
            session_id: "s".into(),
            data: map(json!({"input": format!("secret=abc {}", "x".repeat(1000))})),
        };
        let payload = mirror_payload(&event);
        let summary = payload.trim_end_matches("\n# Claude Code Log");
        assert!(summary.chars().count() <= MIRROR_SUMMARY_CHARS);
        assert!(!payload.contains("abc"));
        assert!(payload.ends_with("# Claude Code Log"));
    }

    #[test]
    fn test_mirror_missing_program_is_ignored() {
        let mirror = Mirror {
            program: "definitely-not-a-real-binary-4242".into(),
            args: vec![],
            timeout: Duration::from_millis(200),
        };
        mirror.send("hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_mirror_times_out() {
        let mirror = Mirror {
            program: "sleep".into(),
            args: vec!["5".into()],
            timeout: Duration::from_millis(200),
        };
        let started = Instant::now();
        mirror.send("hello");
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_session_event_tool_use() {
        let input = HookInput {
            tool_name: Some("Bash".into()),
            input: Some(json!({"command": "x".repeat(800)})),
            ..Default::default()
        };
        let (event_type, data) = session_event(LogCommand::LogTool, Some(&input));
        assert_eq!(event_type, "tool_use");
        assert_eq!(data["tool"], "Bash");
        assert_eq!(data["input"].as_str().unwrap().chars().count(), TOOL_INPUT_CHARS);
    }

    #[test]
    fn test_session_event_redacts_quoted_tool_input() {
        let input = HookInput {
            tool_name: Some("Bash".into()),
            input: Some(json!({"command": "psql --password \"s3cret\" -h db"})),
            ..Default::default()
        };
        let (_, data) = session_event(LogCommand::LogTool, Some(&input));
        let logged = data["input"].as_str().unwrap();
        assert!(!logged.contains("s3cret"), "{logged}");
        assert!(logged.contains(REDACTION_MARKER));
        assert!(logged.contains("-h db"));

        let dir = tempfile::tempdir().unwrap();
        let logger = EventLogger::new(dir.path().to_path_buf(), "quoted", None);
        logger.log("tool_use", data);
        let line = fs::read_to_string(logger.session_file()).unwrap();
        assert!(!line.contains("s3cret"));
    }

    #[test]
    fn test_session_event_string_input_is_not_requoted() {
        let input = HookInput {
            input: Some(json!("ls -la")),
            ..Default::default()
        };
        let (_, data) = session_event(LogCommand::LogTool, Some(&input));
        assert_eq!(data["input"], "ls -la");
    }

    #[test]
    fn test_session_event_defaults() {
        let (event_type, data) = session_event(LogCommand::LogTool, None);
        assert_eq!(event_type, "tool_use");
        assert_eq!(data["tool"], "unknown");
        assert_eq!(data["input"], "{}");

        let (event_type, data) = session_event(LogCommand::Start, None);
        assert_eq!(event_type, "session_start");
        assert!(data.contains_key("cwd"));
        assert!(data.contains_key("user"));

        let (event_type, _) = session_event(LogCommand::End, None);
        assert_eq!(event_type, "session_end");
    }
}
