use crate::decision::{decide_stop, StopContext, StopDecision};
use crate::preferences::{DigestTemplate, Preferences};
use crate::transcript::{self, TranscriptEntry};
use crate::types::{HookOutput, SessionEndInput, StopInput};
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Remove a file, ignoring "not found" errors.
fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
    }
}

pub struct Session {
    dir: PathBuf,
    session_id: String,
    pub prefs: Preferences,
}

impl Session {
    /// Ensure the state directory exists, load preferences, and return a
    /// `Session` ready for use.
    ///
    /// State lives under a well-known scratch directory rather than the
    /// project tree: the watcher must not dirty the repo it observes.
    pub fn open(session_id: &str) -> Result<Self> {
        let dir = env::temp_dir().join("rulewatch");
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let prefs = Preferences::load(&dir)?;
        Ok(Self {
            dir,
            session_id: session_id.to_string(),
            prefs,
        })
    }

    // ---------------------------------------------------------------
    // Private path helpers
    // ---------------------------------------------------------------

    fn marker_path(&self) -> PathBuf {
        self.dir.join(format!("{}.marker", self.session_id))
    }

    fn context_path(&self) -> PathBuf {
        self.dir.join(format!("{}.context", self.session_id))
    }

    // ---------------------------------------------------------------
    // Watermark
    // ---------------------------------------------------------------

    /// Read this session's watermark: the count of transcript lines already
    /// classified. Missing or corrupt state degrades to zero — a full
    /// re-scan beats a crashed hook.
    fn read_watermark(&self) -> usize {
        fs::read_to_string(self.marker_path())
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Advance the watermark to `line_count`. Only ever called with the
    /// observed transcript length, so the value never regresses.
    fn write_watermark(&self, line_count: usize) -> Result<()> {
        let path = self.marker_path();
        fs::write(&path, line_count.to_string())
            .with_context(|| format!("writing {}", path.display()))
    }

    // ---------------------------------------------------------------
    // Digest template
    // ---------------------------------------------------------------

    /// Resolve the digest template to a string.
    fn load_digest_template(&self) -> Result<String> {
        match &self.prefs.digest_template {
            DigestTemplate::Inline(s) => Ok(s.clone()),
            DigestTemplate::File(filename) => {
                let path = self.dir.join(filename);
                fs::read_to_string(&path)
                    .with_context(|| format!("reading template {}", path.display()))
            }
        }
    }

    // ---------------------------------------------------------------
    // Hook handlers
    // ---------------------------------------------------------------

    pub fn handle_stop(&self, input: &StopInput) -> Result<Option<HookOutput>> {
        // An unreadable or missing transcript is a silent no-op, not an
        // error: either fire a well-formed trigger or produce nothing.
        let contents = match fs::read_to_string(&input.common.transcript_path) {
            Ok(c) => c,
            Err(_) => return Ok(None),
        };

        let line_count = contents.lines().count();
        let watermark = self.read_watermark();
        if line_count <= watermark {
            // Nothing new since the last inspection.
            return Ok(None);
        }

        let window: Vec<TranscriptEntry> = contents
            .lines()
            .skip(watermark)
            .filter_map(transcript::parse_line)
            .collect();

        let template = self.load_digest_template()?;
        let decision = decide_stop(&StopContext {
            window: &window,
            line_count,
            digest_template: &template,
            limits: self.prefs.limits(),
        })
        .context("evaluating stop decision")?;

        match decision {
            StopDecision::Accumulate => Ok(None),
            StopDecision::Consume { watermark } => {
                self.write_watermark(watermark)?;
                Ok(None)
            }
            StopDecision::Fire { watermark, digest } => {
                self.write_watermark(watermark)?;
                let path = self.context_path();
                fs::write(&path, digest)
                    .with_context(|| format!("writing {}", path.display()))?;
                Ok(Some(HookOutput::block(format!(
                    "RULE_CHECK:{}",
                    path.display()
                ))))
            }
        }
    }

    pub fn handle_session_end(&self, _input: &SessionEndInput) -> Result<Option<HookOutput>> {
        remove_if_exists(&self.marker_path())?;
        remove_if_exists(&self.context_path())?;
        Ok(None)
    }
}
