//! Text scanning around a caret.
//!
//! All offsets are byte offsets into the document and must fall on char
//! boundaries; anything else yields empty results.

/// Check if a character is part of an identifier.
///
/// Uses Unicode Standard Annex #31 rules for identifier characters.
#[inline]
pub fn is_word_character(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Identifier characters plus the path separators used in variable paths.
#[inline]
pub fn is_path_character(c: char) -> bool {
    is_word_character(c) || c == '.' || c == ':'
}

pub fn char_before(text: &str, offset: usize) -> Option<char> {
    text.get(..offset)?.chars().next_back()
}

pub fn char_after(text: &str, offset: usize) -> Option<char> {
    text.get(offset..)?.chars().next()
}

/// Text left of the caret back to the nearest whitespace (or `stop` char).
pub fn word_before(text: &str, offset: usize, stop: impl Fn(char) -> bool) -> &str {
    let Some(prefix) = text.get(..offset) else {
        return "";
    };
    let start = prefix
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace() || stop(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &prefix[start..]
}

/// Text right of the caret up to the nearest whitespace (or `stop` char).
pub fn word_after(text: &str, offset: usize, stop: impl Fn(char) -> bool) -> &str {
    let Some(suffix) = text.get(offset..) else {
        return "";
    };
    let end = suffix
        .char_indices()
        .find(|(_, c)| c.is_whitespace() || stop(*c))
        .map(|(i, _)| i)
        .unwrap_or(suffix.len());
    &suffix[..end]
}

/// Find the boundaries of a path (`page.author.name`) at the given byte offset.
///
/// The caret may sit right after the last character. Returns `None` if there
/// is no path character on either side.
pub fn find_path_boundaries(text: &str, offset: usize) -> Option<(usize, usize)> {
    let prefix = text.get(..offset)?;
    let suffix = text.get(offset..)?;
    let start = prefix
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_path_character(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(offset);
    let end = offset
        + suffix
            .char_indices()
            .find(|(_, c)| !is_path_character(*c))
            .map(|(i, _)| i)
            .unwrap_or(suffix.len());
    (start < end).then_some((start, end))
}

/// Extract the path at the caret, trimmed of leading/trailing separators.
///
/// # Example
/// ```
/// use antlers::ide::text_utils::extract_path_at_cursor;
///
/// let line = "{{ page.author.name }}";
/// assert_eq!(extract_path_at_cursor(line, 9), Some("page.author.name"));
/// assert_eq!(extract_path_at_cursor(line, 2), None);
/// ```
pub fn extract_path_at_cursor(text: &str, offset: usize) -> Option<&str> {
    let (start, end) = find_path_boundaries(text, offset)?;
    let path = text[start..end].trim_matches(|c| c == '.' || c == ':');
    (!path.is_empty()).then_some(path)
}

/// Whether the text before `offset`, skipping the word being typed and any
/// whitespace, ends with `marker`.
pub fn preceded_by(text: &str, offset: usize, marker: char) -> bool {
    let Some(prefix) = text.get(..offset) else {
        return false;
    };
    let rest = prefix.trim_end_matches(is_word_character).trim_end();
    rest.ends_with(marker)
}
