use once_cell::sync::Lazy;
use regex::Regex;

/// Expand PDF ligature code points into their ASCII letters.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Join a reference that was wrapped across lines into a single line.
///
/// Removes hyphenation at line breaks (`передви-\nжение`), puts a space
/// between words glued together by copy-paste (`почвеПочвоведение`),
/// expands ligatures and collapses whitespace.
pub fn clean_multiline_reference(text: &str) -> String {
    static HYPHEN_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\n\s*").unwrap());
    static GLUED_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-zа-яё])([A-ZА-ЯЁ])").unwrap());

    let text = HYPHEN_BREAK.replace_all(text, "");
    let text = GLUED_WORDS.replace_all(&text, "$1 $2");
    let text = expand_ligatures(&text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphenated_line_break() {
        assert_eq!(
            clean_multiline_reference("Передви-\n   жение солей"),
            "Передвижение солей"
        );
    }

    #[test]
    fn test_glued_words_are_split() {
        assert_eq!(
            clean_multiline_reference("в почвеПочвоведение"),
            "в почве Почвоведение"
        );
        assert_eq!(clean_multiline_reference("endOf line"), "end Of line");
    }

    #[test]
    fn test_ligatures() {
        assert_eq!(
            clean_multiline_reference("E\u{FB03}cient \u{FB01}les"),
            "Efficient files"
        );
        assert_eq!(expand_ligatures("\u{FB05}ory \u{FB06}ep"), "story step");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            clean_multiline_reference("  Иванов\tИ.И.\n\n Статья  "),
            "Иванов И.И. Статья"
        );
    }

    #[test]
    fn test_hyphen_inside_line_kept() {
        assert_eq!(clean_multiline_reference("ун-та, 2001"), "ун-та, 2001");
    }
}
