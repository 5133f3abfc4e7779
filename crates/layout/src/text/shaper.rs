use crate::encoding::win_ansi_byte;
use crate::fonts::FontFace;

/// Width in points of `text` set in `font` at `size`.
///
/// Characters outside WinAnsi are measured as the `?` they will be drawn as.
pub fn measure(text: &str, font: &FontFace, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| font.metrics.advance(win_ansi_byte(c)) as u32)
        .sum();
    units as f32 * size / 1000.0
}

pub fn space_width(font: &FontFace, size: f32) -> f32 {
    font.metrics.advance(b' ') as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontSet;

    #[test]
    fn measures_from_afm_widths() {
        let fonts = FontSet::sans();
        // l o r e m = 222 + 556 + 333 + 556 + 833
        assert!((measure("lorem", &fonts.regular, 12.0) - 30.0).abs() < 1e-4);
        assert_eq!(measure("", &fonts.regular, 12.0), 0.0);
    }

    #[test]
    fn monospace_is_uniform() {
        let fonts = FontSet::sans();
        let narrow = measure("iiii", &fonts.monospace, 10.0);
        let wide = measure("WWWW", &fonts.monospace, 10.0);
        assert_eq!(narrow, wide);
        assert!((narrow - 24.0).abs() < 1e-4);
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let fonts = FontSet::sans();
        let text = "Pagination";
        assert!(measure(text, &fonts.bold, 11.0) > measure(text, &fonts.regular, 11.0));
    }

    #[test]
    fn unmappable_characters_measure_as_question_mark() {
        let fonts = FontSet::sans();
        assert_eq!(
            measure("中", &fonts.regular, 10.0),
            measure("?", &fonts.regular, 10.0)
        );
    }
}
