//! Syntax highlighting for the generated-code view using syntect.

use egui::Color32;
use egui::text::LayoutJob;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

const FONT_SIZE: f32 = 12.0;
const PLAIN: Color32 = Color32::LIGHT_GRAY;

/// Syntax and theme sets, plus the layout of the last highlighted text.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    last: Option<(String, LayoutJob)>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: "base16-ocean.dark".to_string(),
            last: None,
        }
    }

    /// Colored spans for `code`. Adjacent spans of the same color are merged.
    pub fn highlight_rust(&self, code: &str) -> Vec<(String, Color32)> {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension("rs")
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let Some(theme) = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            return vec![(code.to_string(), PLAIN)];
        };

        let mut lines = HighlightLines::new(syntax, theme);
        let mut spans: Vec<(String, Color32)> = Vec::new();
        for line in LinesWithEndings::from(code) {
            let styled = lines.highlight_line(line, &self.syntax_set).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "highlighting failed, showing plain line");
                Vec::new()
            });
            if styled.is_empty() {
                push_span(&mut spans, line, PLAIN);
            }
            for (style, text) in styled {
                push_span(&mut spans, text, foreground(style));
            }
        }
        spans
    }

    /// Layout for `code`; reused as long as the text does not change.
    pub fn layout_job(&mut self, code: &str) -> LayoutJob {
        if let Some((cached, job)) = &self.last
            && cached == code
        {
            return job.clone();
        }
        let format = |color| egui::TextFormat {
            font_id: egui::FontId::monospace(FONT_SIZE),
            color,
            ..Default::default()
        };
        let mut job = LayoutJob::default();
        for (text, color) in self.highlight_rust(code) {
            job.append(&text, 0.0, format(color));
        }
        self.last = Some((code.to_string(), job.clone()));
        job
    }
}

fn push_span(spans: &mut Vec<(String, Color32)>, text: &str, color: Color32) {
    match spans.last_mut() {
        Some((prev, c)) if *c == color => prev.push_str(text),
        _ => spans.push((text.to_string(), color)),
    }
}

fn foreground(style: Style) -> Color32 {
    let c = style.foreground;
    Color32::from_rgb(c.r, c.g, c.b)
}

/// Read-only highlighted view.
pub fn code_viewer(ui: &mut egui::Ui, highlighter: &mut Highlighter, code: &str) {
    let job = highlighter.layout_job(code);

    egui::ScrollArea::vertical()
        .id_salt("highlighted_code_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.add(egui::Label::new(job).selectable(true));
        });
}

/// Plain monospace editor. Returns true if the code was modified.
pub fn code_editor(ui: &mut egui::Ui, code: &mut String) -> bool {
    let mut changed = false;

    egui::ScrollArea::vertical()
        .id_salt("code_editor_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let response = ui.add(
                egui::TextEdit::multiline(code)
                    .code_editor()
                    .desired_rows(18)
                    .desired_width(f32::INFINITY),
            );
            changed = response.changed();
        });

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_generated_statements() {
        let highlighter = Highlighter::new();
        let code = "let button1 = Button::new();\nbutton1.set_text(\"OK\");\n";
        let spans = highlighter.highlight_rust(code);
        assert!(!spans.is_empty());
        let joined: String = spans.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(joined, code);
    }

    #[test]
    fn test_layout_job_is_cached() {
        let mut highlighter = Highlighter::new();
        let a = highlighter.layout_job("let x = 42;");
        let b = highlighter.layout_job("let x = 42;");
        assert_eq!(a.text, b.text);
        let c = highlighter.layout_job("let y = 1;");
        assert_eq!(c.text, "let y = 1;");
    }
}
