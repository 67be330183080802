//! Terminal rendering for a single comic.

use crate::models::Comic;

const RULE_WIDTH: usize = 49;

/// Render `comic` as a boxed block, wrapping long text at `width` columns.
pub fn render_comic(comic: &Comic, base_url: &str, width: usize) -> String {
    let mut out = String::new();
    let header = format!("┌─ XKCD #{} ", comic.num);
    out.push_str(&rule(&header));
    out.push_str(&format!("│ Title: {}\n", comic.title));
    out.push_str(&format!("│ Date:  {}\n", comic.date()));
    out.push_str(&format!("│ URL:   {}\n", comic.page_url(base_url)));
    out.push_str(&format!("│ Image: {}\n", comic.img));
    if !comic.link.is_empty() {
        out.push_str(&format!("│ Link:  {}\n", comic.link));
    }
    out.push_str(&rule("├─ Alt Text "));
    out.push_str(&format!("│ {}\n", wrap_text(&comic.alt, width)));
    if !comic.transcript.is_empty() {
        out.push_str(&rule("├─ Transcript "));
        out.push_str(&format!("│ {}\n", wrap_text(&comic.transcript, width)));
    }
    out.push_str(&rule("└"));
    out
}

fn rule(prefix: &str) -> String {
    let used = prefix.chars().count();
    format!("{}{}\n", prefix, "─".repeat(RULE_WIDTH.saturating_sub(used)))
}

/// Greedy word wrap. Continuation lines are prefixed with the box border.
///
/// Text that already fits is returned untouched, including its whitespace.
pub fn wrap_text(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        if current.is_empty() {
            current.push_str(word);
        } else if current_len + word_len + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n│ ")
}
