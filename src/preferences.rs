use crate::decision::Limits;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

const FILENAME: &str = "rulewatch.toml";

/// Built-in digest template: the formatted conversation summary followed by
/// the fixed reviewer guidelines.
const DEFAULT_DIGEST_TEMPLATE: &str = "\
Recent conversation to review for rule-worthy learnings:

{{ summary }}

---
Guidelines:
- Did Claude get confused during this session in any way?
- How exactly did it get confused and what information would have resolved that confusion. No additional detail is needed especially if it is something that Claude likely already knows.
- Only update rules for patterns of confusion that will likely recur in future sessions.
- Document knowledge not easily evident from code
    - Locations of tests
    - Commands that can be run that are relevant to the task at hand
    - Architectural design, where to look for, fix, or add certain things
- Do not document bugs being fixed as they will likely be resolved.
- Issues that are abandoned as known issues can be noted.
- Keep rules concise (<50 lines), use bullets/tables where appropriate.
- Clean up, summarize, and delete existing rules as needed.
- If no changes are needed, just say \"No rule updates needed.\"
";

/// Digest template: either an inline Jinja2 string or a path to a template
/// file (relative to the state directory). The template receives one
/// variable, `summary`, holding the formatted snippet lines.
///
/// In TOML this looks like one of:
///
/// ```toml
/// [digest_template]
/// inline = "{{ summary }}"
///
/// # — or —
///
/// [digest_template]
/// file = "digest.tmpl"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DigestTemplate {
    /// An inline Jinja2 template string.
    Inline(String),
    /// Path to a template file (relative to the state directory).
    File(String),
}

impl Default for DigestTemplate {
    fn default() -> Self {
        DigestTemplate::Inline(DEFAULT_DIGEST_TEMPLATE.into())
    }
}

/// User-facing preferences stored as `rulewatch.toml` in the state directory.
#[derive(Debug, Serialize, Deserialize)]
pub struct Preferences {
    /// Substantive user turns required in the new-line window before firing.
    #[serde(default = "default_min_user_turns")]
    pub min_user_turns: usize,

    /// Retained snippets required before a digest is written.
    #[serde(default = "default_min_snippets")]
    pub min_snippets: usize,

    /// How many of the most recent snippets appear in the digest.
    #[serde(default = "default_digest_snippets")]
    pub digest_snippets: usize,

    /// Digest template (inline or file reference).
    #[serde(default)]
    pub digest_template: DigestTemplate,
}

fn default_min_user_turns() -> usize {
    5
}

fn default_min_snippets() -> usize {
    3
}

fn default_digest_snippets() -> usize {
    15
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            min_user_turns: default_min_user_turns(),
            min_snippets: default_min_snippets(),
            digest_snippets: default_digest_snippets(),
            digest_template: DigestTemplate::default(),
        }
    }
}

impl Preferences {
    /// Load preferences from the state directory.
    ///
    /// If the file doesn't exist it is created with defaults. Missing keys
    /// in an existing file are filled in with defaults via serde.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(FILENAME);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let prefs: Preferences = toml::from_str(&contents)
                    .with_context(|| format!("parsing {}", path.display()))?;
                Ok(prefs)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let prefs = Preferences::default();
                let toml_str = toml::to_string_pretty(&prefs)
                    .context("serializing default preferences")?;
                fs::write(&path, &toml_str)
                    .with_context(|| format!("writing default {}", path.display()))?;
                Ok(prefs)
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    pub fn limits(&self) -> Limits {
        Limits {
            min_user_turns: self.min_user_turns,
            min_snippets: self.min_snippets,
            digest_snippets: self.digest_snippets,
        }
    }
}
