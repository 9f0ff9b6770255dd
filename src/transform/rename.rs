//! Contact renaming.
//!
//! The replacement is a raw substring substitution over the whole file
//! content, not a field-aware edit, so it also touches matches outside `FN`.

/// Returns true if any of `contents` contains `old`.
pub fn contains_name<S: AsRef<str>>(contents: &[S], old: &str) -> bool {
    !old.is_empty() && contents.iter().any(|c| c.as_ref().contains(old))
}

/// Replaces every occurrence of `old` with `new`, or returns `None` when
/// `old` does not occur.
///
/// # Example
///
/// ```rust
/// use contactpack::transform::replace_contact_name;
///
/// let out = replace_contact_name("FN:Kontak 01\nFN:Kontak 02", "Kontak", "Teman");
/// assert_eq!(out.as_deref(), Some("FN:Teman 01\nFN:Teman 02"));
/// assert_eq!(replace_contact_name("FN:Ani", "Budi", "X"), None);
/// ```
pub fn replace_contact_name(content: &str, old: &str, new: &str) -> Option<String> {
    if old.is_empty() || !content.contains(old) {
        return None;
    }
    Some(content.replace(old, new))
}
