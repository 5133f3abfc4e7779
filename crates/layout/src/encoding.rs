//! WinAnsiEncoding (CP-1252), the single-byte encoding every base-14 font is
//! declared with.

/// Encodes one character, falling back to `?` for anything WinAnsi lacks.
pub fn win_ansi_byte(c: char) -> u8 {
    match c as u32 {
        0x20..=0x7E | 0xA0..=0xFF => c as u8,
        _ => match c {
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02C6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8A,
            '\u{2039}' => 0x8B,
            '\u{0152}' => 0x8C,
            '\u{017D}' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02DC}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9A,
            '\u{203A}' => 0x9B,
            '\u{0153}' => 0x9C,
            '\u{017E}' => 0x9E,
            '\u{0178}' => 0x9F,
            '\t' => b' ',
            _ => b'?',
        },
    }
}

pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(win_ansi_byte).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_latin1_pass_through() {
        assert_eq!(to_win_ansi("Ab 1"), b"Ab 1".to_vec());
        assert_eq!(win_ansi_byte('é'), 0xE9);
    }

    #[test]
    fn typographic_punctuation_maps_to_cp1252() {
        assert_eq!(win_ansi_byte('€'), 0x80);
        assert_eq!(win_ansi_byte('\u{2014}'), 0x97);
        assert_eq!(win_ansi_byte('\u{201C}'), 0x93);
        assert_eq!(win_ansi_byte('•'), 0x95);
    }

    #[test]
    fn unmappable_becomes_question_mark() {
        assert_eq!(to_win_ansi("中"), b"?".to_vec());
        assert_eq!(win_ansi_byte('\u{0007}'), b'?');
    }
}
