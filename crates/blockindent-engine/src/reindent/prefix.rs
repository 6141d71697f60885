//! Pure string operations on indentation prefixes.

/// True iff `indentation` begins with all of `old`, in order.
pub fn has_prefix(old: &str, indentation: &str) -> bool {
    indentation.starts_with(old)
}

/// Swap the leading `old` of `indentation` for `new`, keeping the remainder.
///
/// Returns `None` when `old` is not a prefix of `indentation`.
pub fn replace_prefix(old: &str, new: &str, indentation: &str) -> Option<String> {
    let rest = indentation.strip_prefix(old)?;
    let mut out = String::with_capacity(new.len() + rest.len());
    out.push_str(new);
    out.push_str(rest);
    Some(out)
}

/// The leading whitespace run of a line
pub fn extract_indentation(line: &str) -> &str {
    let end = line
        .find(|c: char| !matches!(c, ' ' | '\t' | '\x0c'))
        .unwrap_or_else(|| line.trim_end_matches(['\r', '\n']).len());
    &line[..end]
}
