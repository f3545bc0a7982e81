use std::fmt::Display;

#[inline]
pub fn is_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    is_alphabetic(c) || is_numeric(c)
}

/// Joins displayable items with `separator`.
pub fn join<T: Display>(items: impl IntoIterator<Item = T>, separator: &str) -> String {
    items.into_iter().map(|item| item.to_string()).collect::<Vec<String>>().join(separator)
}

/// Returns the byte index of the `}` closing the `{` at `open`, honouring nested braces.
pub fn find_closing_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0;

    for (index, c) in text[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;

                if depth == 0 {
                    return Some(open + index);
                }
            },
            _ => {},
        }
    }

    None
}
