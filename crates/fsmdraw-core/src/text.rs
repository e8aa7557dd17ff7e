//! Label text engine: LaTeX-style shortcuts and caret arithmetic.
//!
//! Labels are stored raw (with escape sequences) and displayed formatted.
//! The caret lives in raw character positions, so every caret movement has
//! to be validated against the formatted form: a position inside an escape
//! sequence would split it and change what the user sees.

use kurbo::Vec2;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Greek letter names, capital and lowercase codepoints.
const GREEK: [(&str, char, char); 24] = [
    ("Alpha", '\u{0391}', '\u{03B1}'),
    ("Beta", '\u{0392}', '\u{03B2}'),
    ("Gamma", '\u{0393}', '\u{03B3}'),
    ("Delta", '\u{0394}', '\u{03B4}'),
    ("Epsilon", '\u{0395}', '\u{03B5}'),
    ("Zeta", '\u{0396}', '\u{03B6}'),
    ("Eta", '\u{0397}', '\u{03B7}'),
    ("Theta", '\u{0398}', '\u{03B8}'),
    ("Iota", '\u{0399}', '\u{03B9}'),
    ("Kappa", '\u{039A}', '\u{03BA}'),
    ("Lambda", '\u{039B}', '\u{03BB}'),
    ("Mu", '\u{039C}', '\u{03BC}'),
    ("Nu", '\u{039D}', '\u{03BD}'),
    ("Xi", '\u{039E}', '\u{03BE}'),
    ("Omicron", '\u{039F}', '\u{03BF}'),
    ("Pi", '\u{03A0}', '\u{03C0}'),
    ("Rho", '\u{03A1}', '\u{03C1}'),
    // The final-sigma slot (U+03C2) is skipped.
    ("Sigma", '\u{03A3}', '\u{03C3}'),
    ("Tau", '\u{03A4}', '\u{03C4}'),
    ("Upsilon", '\u{03A5}', '\u{03C5}'),
    ("Phi", '\u{03A6}', '\u{03C6}'),
    ("Chi", '\u{03A7}', '\u{03C7}'),
    ("Psi", '\u{03A8}', '\u{03C8}'),
    ("Omega", '\u{03A9}', '\u{03C9}'),
];

const SYMBOLS: [(&str, char); 3] = [
    ("emptyset", '\u{2205}'),
    ("rightarrow", '\u{2192}'),
    ("leftarrow", '\u{2190}'),
];

static SHORTCUT_RE: Lazy<Regex> = Lazy::new(|| {
    let mut names: Vec<String> = Vec::new();
    for (name, _, _) in GREEK {
        names.push(name.to_string());
        names.push(name.to_ascii_lowercase());
    }
    for (name, _) in SYMBOLS {
        names.push(name.to_string());
    }
    // A shortcut is only complete once terminated by a space, which the
    // substitution consumes.
    let pattern = format!(r"\\({}) ", names.join("|"));
    Regex::new(&pattern).unwrap()
});

static SUBSCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([0-9])").unwrap());

fn shortcut_char(name: &str) -> Option<char> {
    for (greek_name, upper, lower) in GREEK {
        if name.eq_ignore_ascii_case(greek_name) {
            let is_upper = name.starts_with(|c: char| c.is_ascii_uppercase());
            return Some(if is_upper { upper } else { lower });
        }
    }
    for (symbol_name, ch) in SYMBOLS {
        if name == symbol_name {
            return Some(ch);
        }
    }
    None
}

/// Convert LaTeX-style shortcuts to their Unicode display form.
///
/// One pass per pattern class, left to right, non-recursive; converted
/// output contains no backslash names, so the function is idempotent.
pub fn convert_latex_shortcuts(raw: &str) -> String {
    let converted = SHORTCUT_RE.replace_all(raw, |caps: &Captures| {
        match shortcut_char(&caps[1]) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    });
    let converted = SUBSCRIPT_RE.replace_all(&converted, |caps: &Captures| {
        let digit = caps[1].chars().next().and_then(|c| c.to_digit(10));
        match digit.and_then(|d| char::from_u32(0x2080 + d)) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    });
    converted.into_owned()
}

/// Character count of the formatted form.
pub fn formatted_len(raw: &str) -> usize {
    convert_latex_shortcuts(raw).chars().count()
}

fn char_split(raw: &str, index: usize) -> (&str, &str) {
    let byte = raw
        .char_indices()
        .nth(index)
        .map(|(b, _)| b)
        .unwrap_or(raw.len());
    raw.split_at(byte)
}

/// True when splitting the raw text at `index` does not break a shortcut.
fn split_is_clean(raw: &str, index: usize, total: usize) -> bool {
    let (before, after) = char_split(raw, index);
    formatted_len(before) + formatted_len(after) == total
}

/// Insert a character at the caret (raw position); returns the new text
/// and caret.
pub fn insert_char(raw: &str, caret: usize, ch: char) -> (String, usize) {
    let caret = caret.min(raw.chars().count());
    let (before, after) = char_split(raw, caret);
    (format!("{before}{ch}{after}"), caret + 1)
}

/// Delete backwards from the caret so that exactly one formatted character
/// disappears; a whole escape sequence counts as one character.
pub fn backspace(raw: &str, caret: usize) -> (String, usize) {
    let caret = caret.min(raw.chars().count());
    if caret == 0 {
        return (raw.to_string(), 0);
    }
    let total = formatted_len(raw);
    let (_, after) = char_split(raw, caret);
    let after = after.to_string();
    let mut k = caret;
    while k > 0 {
        k -= 1;
        let (before, _) = char_split(raw, k);
        let candidate = format!("{before}{after}");
        if formatted_len(&candidate) + 1 == total {
            return (candidate, k);
        }
    }
    (after, 0)
}

/// Move the caret one formatted character to the left.
pub fn caret_left(raw: &str, caret: usize) -> usize {
    let total = formatted_len(raw);
    let mut k = caret.min(raw.chars().count());
    while k > 0 {
        k -= 1;
        if split_is_clean(raw, k, total) {
            return k;
        }
    }
    0
}

/// Move the caret one formatted character to the right.
pub fn caret_right(raw: &str, caret: usize) -> usize {
    let total = formatted_len(raw);
    let len = raw.chars().count();
    let mut k = caret.min(len);
    while k < len {
        k += 1;
        if split_is_clean(raw, k, total) {
            return k;
        }
    }
    len
}

/// Offset that pushes a label from its anchor point out of the way of the
/// path it annotates. The exponent blend keeps labels clear of the stroke
/// near the axes while staying continuous through the diagonals.
pub fn label_offset(width: f64, angle: Option<f64>) -> Vec2 {
    let Some(angle) = angle else {
        return Vec2::ZERO;
    };
    let cos = angle.cos();
    let sin = angle.sin();
    let corner_x = (width / 2.0 + 5.0) * if cos > 0.0 { 1.0 } else { -1.0 };
    let corner_y = 15.0 * if sin > 0.0 { 1.0 } else { -1.0 };
    let slide = sin * sin.abs().powi(40) * corner_x - cos * cos.abs().powi(10) * corner_y;
    Vec2::new(corner_x - sin * slide, corner_y + cos * slide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greek_shortcuts() {
        assert_eq!(convert_latex_shortcuts("\\alpha "), "α");
        assert_eq!(convert_latex_shortcuts("\\Alpha "), "Α");
        assert_eq!(convert_latex_shortcuts("\\sigma "), "σ");
        assert_eq!(convert_latex_shortcuts("\\Omega "), "Ω");
        // Without the terminating space the sequence is still being typed.
        assert_eq!(convert_latex_shortcuts("\\alpha"), "\\alpha");
    }

    #[test]
    fn test_symbol_shortcuts() {
        assert_eq!(convert_latex_shortcuts("\\emptyset "), "∅");
        // The terminating space is part of the pattern and is consumed.
        assert_eq!(convert_latex_shortcuts("a \\rightarrow b"), "a →b");
        assert_eq!(convert_latex_shortcuts("\\leftarrow "), "←");
    }

    #[test]
    fn test_subscripts() {
        assert_eq!(convert_latex_shortcuts("q_0"), "q₀");
        assert_eq!(convert_latex_shortcuts("q_0q_1"), "q₀q₁");
        // Only single digits are subscripted.
        assert_eq!(convert_latex_shortcuts("q_10"), "q₁0");
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let once = convert_latex_shortcuts("\\beta q_2 \\rightarrow x");
        assert_eq!(convert_latex_shortcuts(&once), once);
    }

    #[test]
    fn test_insert_char() {
        let (text, caret) = insert_char("ab", 1, 'x');
        assert_eq!(text, "axb");
        assert_eq!(caret, 2);
    }

    #[test]
    fn test_backspace_plain() {
        let (text, caret) = backspace("abc", 2);
        assert_eq!(text, "ac");
        assert_eq!(caret, 1);
        let (text, caret) = backspace("abc", 0);
        assert_eq!(text, "abc");
        assert_eq!(caret, 0);
    }

    #[test]
    fn test_backspace_removes_whole_escape() {
        // "\alpha " formats to one character, so one backspace at the end
        // removes all seven raw characters.
        let (text, caret) = backspace("\\alpha ", 7);
        assert_eq!(text, "");
        assert_eq!(caret, 0);

        let (text, caret) = backspace("x\\alpha y", 9);
        assert_eq!(text, "x\\alpha ");
        assert_eq!(caret, 8);
        let (text, caret) = backspace(&text, caret);
        assert_eq!(text, "x");
        assert_eq!(caret, 1);
    }

    #[test]
    fn test_caret_skips_escape_interior() {
        let raw = "x\\alpha y";
        // From the end: past 'y', then the whole escape, then 'x'.
        let caret = caret_left(raw, 9);
        assert_eq!(caret, 8);
        let caret = caret_left(raw, caret);
        assert_eq!(caret, 1);
        let caret = caret_left(raw, caret);
        assert_eq!(caret, 0);

        let caret = caret_right(raw, 1);
        assert_eq!(caret, 8);
        assert_eq!(caret_right(raw, 8), 9);
        assert_eq!(caret_right(raw, 9), 9);
    }

    #[test]
    fn test_label_offset_axes() {
        // Label directly to the right of its anchor.
        let offset = label_offset(40.0, Some(0.0));
        assert!((offset.x - 25.0).abs() < 1e-6);
        // The slide term cancels the vertical corner push exactly on the axis.
        assert!(offset.y.abs() < 1e-6);

        // No angle means no offset.
        assert_eq!(label_offset(40.0, None), Vec2::ZERO);
    }

    #[test]
    fn test_label_offset_continuous_at_diagonal() {
        let eps = 1e-6;
        let below = label_offset(40.0, Some(std::f64::consts::FRAC_PI_4 - eps));
        let above = label_offset(40.0, Some(std::f64::consts::FRAC_PI_4 + eps));
        assert!((below.x - above.x).abs() < 1e-3);
        assert!((below.y - above.y).abs() < 1e-3);
    }
}
