use crate::transcript::{self, Snippet, TranscriptEntry};
use minijinja::{context, Environment};
use std::fmt;

/// Digest lines are collapsed to a single line and capped at this many chars.
const DIGEST_LINE_CAP_CHARS: usize = 300;

// ===================================================================
// Input: all I/O-derived state, gathered by Session before calling decide_stop()
// ===================================================================

pub struct StopContext<'a> {
    /// Parsed entries from the new-line window, in transcript order.
    /// Lines that failed to parse have already been dropped.
    pub window: &'a [TranscriptEntry],
    /// Total line count of the transcript at read time. Becomes the new
    /// watermark whenever the turn threshold is met.
    pub line_count: usize,
    /// Pre-resolved digest template string (minijinja, `summary` variable).
    pub digest_template: &'a str,
    pub limits: Limits,
}

/// Readiness thresholds, resolved from preferences.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Minimum substantive external-user turns in the window before firing.
    pub min_user_turns: usize,
    /// Minimum retained snippets in the window before a digest is worth writing.
    pub min_snippets: usize,
    /// At most this many of the most recent snippets appear in the digest.
    pub digest_snippets: usize,
}

// ===================================================================
// Output: what handle_stop() should do
// ===================================================================

#[derive(Debug)]
pub enum StopDecision {
    /// Turn threshold not reached; leave the watermark alone so the window
    /// keeps accumulating across invocations.
    Accumulate,
    /// Turn threshold reached but too little retained content. The window is
    /// still consumed (watermark advances) so the same turns are never
    /// re-counted, but no digest is produced.
    Consume { watermark: usize },
    /// Fire: consume the window, write the digest, emit the block decision.
    Fire { watermark: usize, digest: String },
}

// ===================================================================
// Error: only template rendering can fail in pure code
// ===================================================================

#[derive(Debug)]
pub enum DecisionError {
    TemplateRender(String),
}

impl fmt::Display for DecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionError::TemplateRender(msg) => write!(f, "template render error: {msg}"),
        }
    }
}

impl std::error::Error for DecisionError {}

// ===================================================================
// Pure entry point
// ===================================================================

pub fn decide_stop(ctx: &StopContext) -> Result<StopDecision, DecisionError> {
    // 1. Tally the window: substantive user turns + retained snippets.
    let mut user_turns = 0usize;
    let mut snippets: Vec<Snippet> = Vec::new();
    for entry in ctx.window {
        let classified = transcript::classify(entry);
        if classified.is_user_turn {
            user_turns += 1;
        }
        snippets.extend(classified.snippets);
    }

    // 2. Stage 1: not enough user turns — keep accumulating.
    if user_turns < ctx.limits.min_user_turns {
        return Ok(StopDecision::Accumulate);
    }

    // 3. Stage 2: the window is consumed either way once the turn threshold
    // is met; a low-content window just produces no artifact.
    if snippets.len() < ctx.limits.min_snippets {
        return Ok(StopDecision::Consume {
            watermark: ctx.line_count,
        });
    }

    // 4. Render the digest from the most recent snippets.
    let summary = summarize(&snippets, ctx.limits.digest_snippets);
    let digest = render_digest(ctx.digest_template, &summary)?;

    Ok(StopDecision::Fire {
        watermark: ctx.line_count,
        digest,
    })
}

// ===================================================================
// Summary formatting
// ===================================================================

/// Format the most recent `max` snippets, one per line, as
/// `[role]: content` with newlines collapsed to spaces and the content
/// capped to a fixed length.
fn summarize(snippets: &[Snippet], max: usize) -> String {
    let start = snippets.len().saturating_sub(max);
    snippets[start..]
        .iter()
        .map(|s| {
            let flat = s.text.replace('\n', " ");
            let capped = match flat.char_indices().nth(DIGEST_LINE_CAP_CHARS) {
                None => flat.as_str(),
                Some((byte_idx, _)) => &flat[..byte_idx],
            };
            format!("[{}]: {}", s.role, capped)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the digest template with the formatted summary.
fn render_digest(template: &str, summary: &str) -> Result<String, DecisionError> {
    let env = Environment::new();
    let tmpl = env
        .template_from_str(template)
        .map_err(|e| DecisionError::TemplateRender(e.to_string()))?;
    tmpl.render(context! { summary })
        .map_err(|e| DecisionError::TemplateRender(e.to_string()))
}
