use super::shaper::{measure, space_width};
use crate::LayoutError;
use crate::fonts::FontFace;

pub const DEFAULT_LINE_HEIGHT: f32 = 1.4;

/// Tolerance for accumulated float error when comparing a line with its limit.
const WIDTH_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy)]
pub struct TextMetricsRequest<'a> {
    pub font: &'a FontFace,
    pub size: f32,
    /// Multiplier applied to `size` to get the line pitch.
    pub line_height: f32,
    pub max_width: f32,
    /// Narrows the first line only; paragraphs with a first-line indent pass it
    /// here so the indented line still fits.
    pub first_line_indent: f32,
}

impl<'a> TextMetricsRequest<'a> {
    pub fn new(font: &'a FontFace, size: f32, max_width: f32) -> Self {
        Self {
            font,
            size,
            line_height: DEFAULT_LINE_HEIGHT,
            max_width,
            first_line_indent: 0.0,
        }
    }

    pub fn line_height(mut self, multiplier: f32) -> Self {
        self.line_height = multiplier;
        self
    }

    pub fn first_line_indent(mut self, indent: f32) -> Self {
        self.first_line_indent = indent;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<WrappedLine>,
    pub line_height_px: f32,
    pub total_height: f32,
}

impl WrappedText {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Greedy word wrap.
///
/// Hard newlines always start a new line and empty source lines are kept.
/// Runs of whitespace collapse to a single space. A word wider than the
/// available width is placed alone on its own line, unmodified.
///
/// # Errors
///
/// Non-positive or non-finite widths, sizes and line-height multipliers are
/// rejected rather than clamped.
pub fn measure_and_wrap(text: &str, req: &TextMetricsRequest<'_>) -> Result<WrappedText, LayoutError> {
    if !req.max_width.is_finite() || req.max_width <= 0.0 {
        return Err(LayoutError::InvalidWidth(req.max_width));
    }
    if !req.size.is_finite() || req.size <= 0.0 {
        return Err(LayoutError::InvalidFontSize(req.size));
    }
    if !req.line_height.is_finite() || req.line_height <= 0.0 {
        return Err(LayoutError::InvalidLineHeight(req.line_height));
    }

    let space = space_width(req.font, req.size);
    let first_width = (req.max_width - req.first_line_indent.max(0.0)).max(0.0);
    let mut lines: Vec<WrappedLine> = Vec::new();

    for source_line in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0f32;

        for word in source_line.split_whitespace() {
            let word_width = measure(word, req.font, req.size);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            let limit = if lines.is_empty() { first_width } else { req.max_width };
            let candidate = current_width + space + word_width;
            if candidate <= limit + WIDTH_EPSILON {
                current.push(' ');
                current.push_str(word);
                current_width = candidate;
            } else {
                lines.push(WrappedLine {
                    text: std::mem::take(&mut current),
                    width: current_width,
                });
                current.push_str(word);
                current_width = word_width;
            }
        }

        lines.push(WrappedLine {
            text: current,
            width: current_width,
        });
    }

    let line_height_px = req.line_height * req.size;
    let total_height = line_height_px * lines.len() as f32;
    Ok(WrappedText {
        lines,
        line_height_px,
        total_height,
    })
}

/// Breaks preformatted text (code) without touching its whitespace.
///
/// Tabs expand to four spaces and lines break at the last character that
/// still fits, so indentation survives exactly.
pub fn wrap_preformatted(text: &str, req: &TextMetricsRequest<'_>) -> Result<WrappedText, LayoutError> {
    if !req.max_width.is_finite() || req.max_width <= 0.0 {
        return Err(LayoutError::InvalidWidth(req.max_width));
    }
    if !req.size.is_finite() || req.size <= 0.0 {
        return Err(LayoutError::InvalidFontSize(req.size));
    }
    if !req.line_height.is_finite() || req.line_height <= 0.0 {
        return Err(LayoutError::InvalidLineHeight(req.line_height));
    }

    let mut lines = Vec::new();
    for source_line in text.lines() {
        let expanded = source_line.replace('\t', "    ");
        let mut current = String::new();
        let mut current_width = 0.0f32;
        for c in expanded.chars() {
            let mut buf = [0u8; 4];
            let advance = measure(c.encode_utf8(&mut buf), req.font, req.size);
            if !current.is_empty() && current_width + advance > req.max_width + WIDTH_EPSILON {
                lines.push(WrappedLine {
                    text: std::mem::take(&mut current),
                    width: current_width,
                });
                current_width = 0.0;
            }
            current.push(c);
            current_width += advance;
        }
        lines.push(WrappedLine {
            text: current,
            width: current_width,
        });
    }
    if lines.is_empty() {
        lines.push(WrappedLine {
            text: String::new(),
            width: 0.0,
        });
    }

    let line_height_px = req.line_height * req.size;
    let total_height = line_height_px * lines.len() as f32;
    Ok(WrappedText {
        lines,
        line_height_px,
        total_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontSet;
    use crate::text::measure;

    fn wrap(text: &str, size: f32, max_width: f32) -> WrappedText {
        let fonts = FontSet::sans();
        let req = TextMetricsRequest::new(&fonts.regular, size, max_width);
        measure_and_wrap(text, &req).unwrap()
    }

    #[test]
    fn lines_fit_within_max_width() {
        let fonts = FontSet::sans();
        let text = "The quick brown fox jumps over the lazy dog while the cursor \
                    advances down the page one line at a time.";
        for max_width in [60.0, 120.0, 200.0, 481.89] {
            let wrapped = wrap(text, 11.0, max_width);
            for line in &wrapped.lines {
                let single_word = !line.text.contains(' ');
                assert!(
                    line.width <= max_width + WIDTH_EPSILON || single_word,
                    "line '{}' is {} wide, limit {}",
                    line.text,
                    line.width,
                    max_width
                );
                assert!((measure(&line.text, &fonts.regular, 11.0) - line.width).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn overlong_word_sits_alone_unmodified() {
        let wrapped = wrap("a Pneumonoultramicroscopicsilicovolcanoconiosis b", 12.0, 50.0);
        let texts: Vec<_> = wrapped.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "Pneumonoultramicroscopicsilicovolcanoconiosis", "b"]);
        assert!(wrapped.lines[1].width > 50.0);
    }

    #[test]
    fn hard_newlines_and_empty_lines_are_kept() {
        let wrapped = wrap("first\n\nthird", 10.0, 300.0);
        let texts: Vec<_> = wrapped.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "", "third"]);
    }

    #[test]
    fn whitespace_runs_collapse() {
        let wrapped = wrap("  spaced \t  out  ", 10.0, 300.0);
        assert_eq!(wrapped.lines.len(), 1);
        assert_eq!(wrapped.lines[0].text, "spaced out");
    }

    #[test]
    fn heights_follow_line_height_multiplier() {
        let fonts = FontSet::sans();
        let req = TextMetricsRequest::new(&fonts.regular, 12.0, 100.0).line_height(1.5);
        let wrapped = measure_and_wrap("one two three four five six seven", &req).unwrap();
        assert!((wrapped.line_height_px - 18.0).abs() < 1e-4);
        assert!((wrapped.total_height - 18.0 * wrapped.line_count() as f32).abs() < 1e-3);
    }

    #[test]
    fn fourteen_lorem_words_per_a4_line() {
        // A4 content width with 20mm margins on both sides.
        let content_width = 595.28 - 2.0 * (20.0 * 72.0 / 25.4);
        let text = vec!["lorem"; 2000].join(" ");
        let wrapped = wrap(&text, 12.0, content_width);
        assert_eq!(wrapped.lines[0].text.split(' ').count(), 14);
        assert_eq!(wrapped.line_count(), 143);
    }

    #[test]
    fn first_line_indent_narrows_only_the_first_line() {
        let fonts = FontSet::sans();
        let text = "word word word word word word";
        let plain = TextMetricsRequest::new(&fonts.regular, 10.0, 100.0);
        let indented = plain.first_line_indent(40.0);
        let a = measure_and_wrap(text, &plain).unwrap();
        let b = measure_and_wrap(text, &indented).unwrap();
        assert!(b.lines[0].text.len() < a.lines[0].text.len());
        assert!(b.lines[0].width <= 60.0 + WIDTH_EPSILON);
    }

    #[test]
    fn rejects_invalid_requests() {
        let fonts = FontSet::sans();
        let zero = TextMetricsRequest::new(&fonts.regular, 12.0, 0.0);
        assert!(matches!(measure_and_wrap("x", &zero), Err(LayoutError::InvalidWidth(_))));
        let nan = TextMetricsRequest::new(&fonts.regular, 12.0, f32::NAN);
        assert!(matches!(measure_and_wrap("x", &nan), Err(LayoutError::InvalidWidth(_))));
        let size = TextMetricsRequest::new(&fonts.regular, -1.0, 100.0);
        assert!(matches!(measure_and_wrap("x", &size), Err(LayoutError::InvalidFontSize(_))));
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let wrapped = wrap("", 12.0, 100.0);
        assert_eq!(wrapped.line_count(), 1);
        assert_eq!(wrapped.lines[0].text, "");
    }
    #[test]
    fn preformatted_keeps_indentation_and_breaks_long_lines() {
        let fonts = FontSet::sans();
        // Courier at 10pt is 6pt per character: 10 characters per 60pt line.
        let req = TextMetricsRequest::new(&fonts.monospace, 10.0, 60.0);
        let wrapped = wrap_preformatted("fn main() {\n\tlet x = 1;\n}", &req).unwrap();
        let texts: Vec<_> = wrapped.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["fn main() ", "{", "    let x ", "= 1;", "}"]);
        for line in &wrapped.lines {
            assert!(line.width <= 60.0 + WIDTH_EPSILON);
        }
    }
}
