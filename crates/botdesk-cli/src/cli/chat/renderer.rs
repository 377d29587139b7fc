//! Terminal rendering for chat replies and transcripts.
//!
//! Replies stream to the terminal raw as deltas arrive. Stored messages
//! (history, transcripts) go through `render_final`: `termimad` for prose,
//! `syntect` for fenced code blocks.

use std::io::Write;
use std::time::Duration;

use crossterm::style::Color;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

const CODE_THEME: &str = "base16-ocean.dark";

pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    /// `accent` colors headers and bold text.
    pub fn new(accent: Option<Color>) -> Self {
        let mut skin = MadSkin::default_dark();
        if let Some(color) = accent {
            let tc = to_termimad_color(color);
            skin.bold.set_fg(tc);
            skin.headers[0].set_fg(tc);
            skin.headers[1].set_fg(tc);
        }
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render Markdown with highlighted code fences. An unclosed fence is
    /// highlighted up to the end of the text.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut prose = String::new();
        let mut fence: Option<(String, String)> = None;

        for line in markdown.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") {
                match fence.take() {
                    None => {
                        self.flush_prose(&mut prose, &mut output);
                        let lang = trimmed.trim_start_matches('`').trim().to_string();
                        fence = Some((lang, String::new()));
                    }
                    Some((lang, code)) => output.push_str(&self.highlight_code(&code, &lang)),
                }
            } else if let Some((_, code)) = fence.as_mut() {
                code.push_str(line);
                code.push('\n');
            } else {
                prose.push_str(line);
                prose.push('\n');
            }
        }

        if let Some((lang, code)) = fence {
            output.push_str(&self.highlight_code(&code, &lang));
        }
        self.flush_prose(&mut prose, &mut output);
        output
    }

    fn flush_prose(&self, prose: &mut String, output: &mut String) {
        if !prose.is_empty() {
            output.push_str(&self.skin.term_text(prose).to_string());
            prose.clear();
        }
    }

    /// Print one streamed delta as-is.
    pub fn print_streaming_token(&self, token: &str) {
        print!("{token}");
        let _ = std::io::stdout().flush();
    }

    /// Footer under a reply: "| 12 chunks · 1.4s · session 3f2a9c01".
    pub fn print_stats_footer(&self, chunks: usize, elapsed: Duration, session_id: Option<&str>) {
        let dot = console::style("\u{00b7}").dim();
        let mut footer = format!(
            "\n  {} {} {} {} {:.1}s",
            console::style("|").dim(),
            console::style(chunks).dim(),
            console::style(if chunks == 1 { "chunk" } else { "chunks" }).dim(),
            dot,
            console::style(elapsed.as_secs_f64()).dim(),
        );
        if let Some(id) = session_id {
            let short: String = id.chars().take(8).collect();
            footer.push_str(&format!(" {dot} {}", console::style(format!("session {short}")).dim()));
        }
        println!("{footer}");
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let label = if lang.is_empty() { "code" } else { lang };

        let mut output = format!("  {}\n", console::style(format!("--- {label} ---")).dim());
        let Some(theme) = self.theme_set.themes.get(CODE_THEME) else {
            for line in code.lines() {
                output.push_str(&format!("  {line}\n"));
            }
            return output;
        };

        let mut h = HighlightLines::new(syntax, theme);
        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }
        output
    }
}

/// termimad pins its own crossterm version, so colors are mapped across.
fn to_termimad_color(color: Color) -> termimad::crossterm::style::Color {
    use termimad::crossterm::style::Color as T;
    match color {
        Color::Cyan => T::Cyan,
        Color::Green => T::Green,
        Color::Yellow => T::Yellow,
        Color::Magenta => T::Magenta,
        Color::Blue => T::Blue,
        Color::Red => T::Red,
        Color::Rgb { r, g, b } => T::Rgb { r, g, b },
        _ => T::Cyan,
    }
}
