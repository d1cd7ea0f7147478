//! Turns the classifier's raw comma-joined decision string into typed
//! commands.

use crate::command::{Command, CommandKind};

/// Recognized phrase prefixes in match order. Multi-word prefixes sit before
/// any shorter prefix that is a textual prefix of them, so "google search x"
/// never resolves to an unknown "google" segment.
const PREFIXES: &[(&str, CommandKind)] = &[
    ("generate image", CommandKind::GenerateImage),
    ("google search", CommandKind::WebSearch),
    ("youtube search", CommandKind::VideoSearch),
    ("general", CommandKind::GeneralChat),
    ("realtime", CommandKind::RealtimeChat),
    ("content", CommandKind::WriteContent),
    ("system", CommandKind::RunSystemCommand),
    ("open", CommandKind::OpenApp),
    ("close", CommandKind::CloseApp),
    ("play", CommandKind::PlayMedia),
    ("exit", CommandKind::Exit),
];

/// Parse a raw classification string into ordered commands.
///
/// Unrecognized segments are dropped with a warning, segments missing a
/// required argument likewise. Empty input yields an empty vector; the parse
/// itself never fails.
pub fn parse(raw: &str) -> Vec<Command> {
    let mut commands = Vec::new();

    for segment in raw.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let Some((kind, argument)) = match_segment(segment) else {
            tracing::warn!(segment, "dropping unrecognized task segment");
            continue;
        };

        if argument.is_empty() && kind.requires_argument() {
            tracing::warn!(segment, kind = %kind, "dropping segment without argument");
            continue;
        }

        commands.push(Command::new(kind, argument));
    }

    commands
}

fn match_segment(segment: &str) -> Option<(CommandKind, String)> {
    for (prefix, kind) in PREFIXES {
        if !starts_with_ignore_case(segment, prefix) {
            continue;
        }
        // The prefix must end on a word boundary: "generally speaking" is
        // not a "general" segment.
        let rest = &segment[prefix.len()..];
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) && !rest.starts_with('(') {
            continue;
        }
        return Some((*kind, strip_argument(rest)));
    }
    None
}

// All table prefixes are ASCII, so a byte-wise comparison is safe and keeps
// the remainder slice aligned with the original segment.
fn starts_with_ignore_case(segment: &str, prefix: &str) -> bool {
    segment.len() >= prefix.len()
        && segment.is_char_boundary(prefix.len())
        && segment[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn strip_argument(rest: &str) -> String {
    let mut arg = rest.trim();
    if let Some(inner) = arg.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        arg = inner;
    }
    arg.trim().to_string()
}
