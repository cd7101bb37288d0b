//! Logging helpers that keep user-authored text (quest titles, descriptions)
//! on a single log line.

/// Longest preview of user text written to the log, in characters.
const PREVIEW_CHARS: usize = 120;

/// Render user text as one log line. Line breaks, tabs, backslashes and other
/// control characters become visible escapes; anything past the preview
/// length collapses into a trailing `…`.
pub fn escape_log(text: &str) -> String {
    let mut out = String::with_capacity(text.len().min(PREVIEW_CHARS) + 8);
    let mut chars = text.chars();
    for ch in chars.by_ref().take(PREVIEW_CHARS) {
        push_escaped(&mut out, ch);
    }
    if chars.next().is_some() {
        out.push('…');
    }
    out
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if c.is_control() => out.push_str(&format!("\\x{:02X}", u32::from(c))),
        c => out.push(c),
    }
}
