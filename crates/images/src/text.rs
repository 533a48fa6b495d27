//! Approximate text measurement and line wrapping.
//!
//! The rasterizer does no layout of its own, so line breaks are decided here
//! from per-character width estimates.

/// Estimated advance of `c` in ems.
pub fn char_width(c: char) -> f32 {
    match c {
        ' ' => 0.28,
        'i' | 'j' | 'l' | '.' | ',' | '\'' | '!' | '|' | ':' | ';' => 0.3,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' => 0.38,
        'm' | 'w' => 0.82,
        'M' | 'W' => 0.9,
        'A'..='Z' => 0.66,
        '0'..='9' => 0.58,
        'a'..='z' => 0.54,
        c if c.is_ascii() => 0.6,
        c if is_wide(c) => 1.0,
        _ => 0.7,
    }
}

/// Hangul, CJK, full-width forms and emoji.
fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x11ff
        | 0x2e80..=0x303e
        | 0x3041..=0x33ff
        | 0x3400..=0x4dbf
        | 0x4e00..=0x9fff
        | 0xa960..=0xa97f
        | 0xac00..=0xd7ff
        | 0xf900..=0xfaff
        | 0xfe30..=0xfe4f
        | 0xff00..=0xff60
        | 0xffe0..=0xffe6
        | 0x2600..=0x27bf
        | 0x1f300..=0x1faff
        | 0x20000..=0x3fffd)
}

/// Width in pixels of a single line, including letter spacing after every character.
pub fn text_width(text: &str, font_size: f32, letter_spacing: f32) -> f32 {
    text.chars().map(|c| char_width(c) * font_size + letter_spacing).sum()
}

/// Whether `c` may appear in an XML 1.0 document.
pub fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{d7ff}'
        | '\u{e000}'..='\u{fffd}'
        | '\u{10000}'..)
}

/// Breaks `text` into lines no wider than `max_width`.
///
/// Runs of whitespace collapse to a single space and characters XML cannot
/// carry are dropped. Lines break between words; a word that does not fit on
/// a line of its own is split between characters.
pub fn wrap(text: &str, font_size: f32, letter_spacing: f32, max_width: f32) -> Vec<String> {
    let fits = |s: &str| text_width(s, font_size, letter_spacing) <= max_width;
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word: String = word.chars().filter(|&c| is_xml_char(c)).collect();
        if word.is_empty() {
            continue;
        }
        if current.is_empty() {
            if fits(&word) {
                current.push_str(&word);
                continue;
            }
        } else {
            let candidate = format!("{current} {word}");
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            lines.push(std::mem::take(&mut current));
            if fits(&word) {
                current.push_str(&word);
                continue;
            }
        }
        for c in word.chars() {
            current.push(c);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 10.0, 0.0), 0.0);
        assert_eq!(text_width("가나", 10.0, 0.0), 20.0);
        assert_eq!(text_width("가나", 10.0, -1.0), 18.0);
        assert!(text_width("WWW", 10.0, 0.0) > text_width("iii", 10.0, 0.0));
        assert_eq!(char_width('📢'), 1.0);
    }

    #[test]
    fn test_wrap_words() {
        // Each hangul syllable is 10px wide, a space 2.8px.
        let lines = wrap("가나 다라 마바", 10.0, 0.0, 45.0);
        assert_eq!(lines, vec!["가나 다라", "마바"]);
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        assert_eq!(wrap("  가나 \n\t 다라  ", 10.0, 0.0, 1000.0), vec!["가나 다라"]);
        assert!(wrap("   ", 10.0, 0.0, 1000.0).is_empty());
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let lines = wrap("가나다라마바사", 10.0, 0.0, 30.0);
        assert_eq!(lines, vec!["가나다", "라마바", "사"]);
        let lines = wrap("가 나다라마", 10.0, 0.0, 30.0);
        assert_eq!(lines, vec!["가", "나다라", "마"]);
    }

    #[test]
    fn test_wrap_never_drops_characters() {
        let text = "스터디 킥오프 안내: 알고리즘 문제 풀이 모임을 시작합니다 Supercalifragilistic";
        let lines = wrap(text, 62.0, -1.86, 300.0);
        assert!(lines.len() > 1);
        let joined: String = lines.concat();
        let expected: String = text.split_whitespace().collect();
        assert_eq!(joined.replace(' ', ""), expected);
    }

    #[test]
    fn test_wrap_drops_xml_illegal_chars() {
        assert_eq!(wrap("a\u{1}b \u{1f}\u{8} c\u{ffff}\u{fffe}", 10.0, 0.0, 1000.0), vec!["ab c"]);
        assert_eq!(wrap("가\u{e}나 📢", 10.0, 0.0, 1000.0), vec!["가나 📢"]);
        assert!(wrap("\u{1}\u{2}", 10.0, 0.0, 1000.0).is_empty());
        for c in ['\u{0}', '\u{8}', '\u{b}', '\u{1f}', '\u{fffe}', '\u{ffff}'] {
            assert!(!is_xml_char(c), "char: {c:?}");
        }
        for c in ['\t', '\n', ' ', '가', '\u{fffd}', '📢'] {
            assert!(is_xml_char(c), "char: {c:?}");
        }
    }

    #[test]
    fn test_wrap_narrow_box_keeps_one_char_per_line() {
        assert_eq!(wrap("가나", 10.0, 0.0, 5.0), vec!["가", "나"]);
    }
}
