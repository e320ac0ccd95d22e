//! Identifier sanitization.

/// Turn an arbitrary metadata name into a valid identifier.
///
/// Obfuscated metadata routinely carries names with punctuation or leading
/// digits. Every character that cannot appear in an identifier becomes `_`,
/// and a leading digit gets a `_` prefix. The empty name becomes `_`.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        out.push('_');
    }
    out.extend(
        name.chars()
            .map(|c| if c == '_' || c.is_alphanumeric() { c } else { '_' }),
    );
    if out.is_empty() {
        out.push('_');
    }
    out
}
