/// Strip trailing punctuation and unbalanced closing brackets.
///
/// References often wrap identifiers in parentheses or end them with a
/// period; DOIs themselves may legitimately contain balanced brackets
/// (`10.1016/0021-9681(87)90171-8`).
fn trim_identifier(value: &str) -> &str {
    let mut value = value.trim_end_matches(['.', ',', ';', ':']);

    for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
        while value.ends_with(close) && value.matches(close).count() > value.matches(open).count()
        {
            value = &value[..value.len() - close.len_utf8()];
            value = value.trim_end_matches(['.', ',', ';', ':']);
        }
    }

    value
}

/// Normalize a DOI captured by the pattern library.
pub fn clean_doi(doi: &str) -> String {
    trim_identifier(doi.trim()).to_string()
}

/// Normalize a URL captured by the pattern library.
pub fn clean_url(url: &str) -> String {
    trim_identifier(url.trim()).to_string()
}

/// Number of digits in an ISBN, ignoring hyphens and spaces. A trailing
/// `X` check character counts as a digit.
fn isbn_digit_count(isbn: &str) -> usize {
    isbn.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .count()
}

/// Whether an ISBN has the 13-digit form required for validation.
pub fn is_valid_isbn13(isbn: &str) -> bool {
    let only_allowed = isbn
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-' || c == ' ');
    only_allowed && isbn_digit_count(isbn) == 13
}
