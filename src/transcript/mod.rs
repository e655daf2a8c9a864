use serde::Deserialize;

/// Content shorter than this (in chars) is treated as noise.
pub const MIN_CONTENT_CHARS: usize = 20;

/// Retained snippet text is capped at this many chars.
pub const SNIPPET_CAP_CHARS: usize = 500;

// ===================================================================
// Top-level transcript entry — one per JSONL line
// ===================================================================

/// A single line in a Claude Code `.jsonl` transcript file.
///
/// Discriminated by the `type` field (camelCase JSON throughout). Only
/// conversation entries carry structure we care about; everything else
/// (progress, system, file-history-snapshot, ...) collapses into `Other`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum TranscriptEntry {
    #[serde(rename = "user")]
    User(ConversationEntry),
    #[serde(rename = "assistant")]
    Assistant(ConversationEntry),
    #[serde(other)]
    Other,
}

// ===================================================================
// Conversation entries (user + assistant share the same shape)
// ===================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntry {
    pub message: Message,

    // --- fields that only appear on some entries ---
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub is_meta: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: MessageContent,
}

/// `message.content` can be a plain string (user text) or an array of
/// content blocks (assistant responses, tool results).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

// ===================================================================
// Content blocks inside message.content[]
// ===================================================================

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text(TextBlock),
    #[serde(rename = "thinking")]
    Thinking(ThinkingBlock),
    #[serde(rename = "tool_use")]
    ToolUse(ToolUseBlock),
    #[serde(rename = "tool_result")]
    ToolResult(ToolResultBlock),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct TextBlock {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ThinkingBlock {
    pub thinking: String,
}

#[derive(Debug, Deserialize)]
pub struct ToolUseBlock {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ToolResultBlock {
    pub tool_use_id: String,
    pub content: serde_json::Value,
    #[serde(default)]
    pub is_error: Option<bool>,
}

// ===================================================================
// Line parsing
// ===================================================================

/// Parse one transcript line. Malformed or non-JSON lines are treated as
/// absence rather than errors — transcripts can contain partial writes and
/// the scan must keep going.
pub fn parse_line(line: &str) -> Option<TranscriptEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    serde_json::from_str(line).ok()
}

// ===================================================================
// Turn classification
// ===================================================================

/// A retained (role, truncated text) pair, ordered by transcript position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub role: String,
    pub text: String,
}

/// What one transcript entry contributes to the readiness evaluation.
///
/// Counting as a user turn and being retained as a snippet are independent
/// outcomes: a substantive external-user message does both.
#[derive(Debug, Default)]
pub struct Classified {
    pub is_user_turn: bool,
    pub snippets: Vec<Snippet>,
}

/// Truncate a string to at most `max` chars on a char boundary.
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Decide what an entry contributes: nothing, a user-turn count, snippets,
/// or both.
///
/// String content is discarded if the entry is a meta record, too short, or
/// shaped like a serialized tool result (`[{` prefix or an embedded
/// `<tool_result` tag — tool results surface as user messages in the
/// transcript). Array content retains each text block above the length
/// threshold as its own snippet and never counts as a user turn.
pub fn classify(entry: &TranscriptEntry) -> Classified {
    let (is_user, conv) = match entry {
        TranscriptEntry::User(c) => (true, c),
        TranscriptEntry::Assistant(c) => (false, c),
        TranscriptEntry::Other => return Classified::default(),
    };

    let role = conv
        .message
        .role
        .as_deref()
        .unwrap_or(if is_user { "user" } else { "assistant" });

    match &conv.message.content {
        MessageContent::Text(content) => {
            if conv.is_meta.unwrap_or(false) || content.chars().count() < MIN_CONTENT_CHARS {
                return Classified::default();
            }
            if content.starts_with("[{") || content.contains("<tool_result") {
                return Classified::default();
            }

            // Only messages attributed to an external (human) actor count
            // toward the turn tally, and markup fragments don't.
            let is_user_turn = is_user
                && conv.user_type.as_deref() == Some("external")
                && !content.starts_with('<');

            Classified {
                is_user_turn,
                snippets: vec![Snippet {
                    role: role.to_string(),
                    text: truncate(content, SNIPPET_CAP_CHARS).to_string(),
                }],
            }
        }
        MessageContent::Blocks(blocks) => {
            let snippets = blocks
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text(t) if t.text.chars().count() > MIN_CONTENT_CHARS => {
                        Some(Snippet {
                            role: role.to_string(),
                            text: truncate(&t.text, SNIPPET_CAP_CHARS).to_string(),
                        })
                    }
                    _ => None,
                })
                .collect();
            Classified {
                is_user_turn: false,
                snippets,
            }
        }
    }
}
