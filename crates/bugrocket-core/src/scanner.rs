//! Fenced code block extraction.
//!
//! A block opens with three backticks or three tildes, an optional language
//! tag glued to the fence, and a line break. It closes at the first run of
//! the same three fence characters. Unterminated blocks never match.

use std::sync::OnceLock;
use regex::{Captures, Regex};
use bugrocket_types::code::{MirroredCode, PLAIN_TEXT};

const FENCE_PATTERN: &str = r"(?s)```([^\s`]*)\r?\n(.*?)```|~~~([^\s~]*)\r?\n(.*?)~~~";

/// One fenced block lifted out of markdown text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    pub language: String,
    pub body: String,
}

impl From<FencedBlock> for MirroredCode {
    fn from(block: FencedBlock) -> Self {
        MirroredCode::new(block.language, block.body)
    }
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(FENCE_PATTERN).expect("fence pattern compiles"))
}

fn block_from(caps: &Captures<'_>) -> FencedBlock {
    let language = caps
        .get(1)
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
        .filter(|tag| !tag.is_empty())
        .unwrap_or(PLAIN_TEXT)
        .to_string();

    let body = caps
        .get(2)
        .or_else(|| caps.get(4))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    FencedBlock { language, body }
}

/// Every well-formed fenced block in `text`, in order of appearance.
pub fn fenced_blocks(text: &str) -> impl Iterator<Item = FencedBlock> + '_ {
    fence_regex().captures_iter(text).map(|caps| block_from(&caps))
}

/// Return the last well-formed fenced block in `text`, if any.
///
/// Earlier blocks are superseded, never merged. The body is trimmed and a
/// missing language tag becomes [`PLAIN_TEXT`].
pub fn last_fenced_block(text: &str) -> Option<FencedBlock> {
    fenced_blocks(text).last()
}

/// A run of a message as the chat view draws it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Prose(String),
    Code(FencedBlock),
}

/// Split `text` into prose and fenced code, in order. Whitespace-only prose
/// between blocks is dropped; an unterminated fence stays prose.
pub fn split_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for caps in fence_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_prose(&mut segments, &text[cursor..whole.start()]);
        segments.push(Segment::Code(block_from(&caps)));
        cursor = whole.end();
    }
    push_prose(&mut segments, &text[cursor..]);
    segments
}

fn push_prose(segments: &mut Vec<Segment>, prose: &str) {
    let prose = prose.trim();
    if !prose.is_empty() {
        segments.push(Segment::Prose(prose.to_string()));
    }
}
