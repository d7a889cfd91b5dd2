//! Latin-1 text sanitization for the standard PDF fonts
//!
//! The Type1 base fonts only cover WinAnsi. Everything drawn into the PDF
//! goes through [`sanitize_latin1`] first, so rendering never fails on input.

const TAB_WIDTH: usize = 4;

/// Map text into printable Latin-1, keeping newlines
pub fn sanitize_latin1(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\n' => out.push('\n'),
            '\r' => {}
            '\t' => out.extend(std::iter::repeat_n(' ', TAB_WIDTH)),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' | '\u{2023}' | '\u{25CF}' => out.push('*'),
            '\u{2192}' => out.push_str("->"),
            '\u{2190}' => out.push_str("<-"),
            '\u{00A0}' | '\u{2002}'..='\u{200A}' | '\u{202F}' => out.push(' '),
            '\u{200B}' | '\u{FEFF}' => {}
            ' '..='~' | '\u{00A1}'..='\u{00FF}' => out.push(c),
            _ => out.push('?'),
        }
    }

    out
}

/// Encode sanitized text as single-byte WinAnsi
///
/// Callers pass output of [`sanitize_latin1`]; anything else above U+00FF is
/// still mapped to `?` rather than truncated.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
