//! Slug policy: which slug a note gets.
//!
//! A client-supplied slug is used verbatim. When the client leaves it empty
//! the slug is derived from the title via a transliterating slugify (the
//! `slug` crate maps non-ASCII to ASCII and collapses separators), capped at
//! [`SLUG_MAX_LEN`] characters.

/// Maximum stored slug length.
pub const SLUG_MAX_LEN: usize = 100;

/// Resolve the slug to persist for a note.
pub fn resolve(candidate: &str, title: &str) -> String {
    let candidate = candidate.trim();
    if !candidate.is_empty() {
        return candidate.to_string();
    }

    let mut generated = slug::slugify(title);
    generated.truncate(SLUG_MAX_LEN);
    generated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_slug_used_verbatim() {
        assert_eq!(resolve("test_slug", "Заметка"), "test_slug");
    }

    #[test]
    fn test_empty_slug_derived_from_title() {
        assert_eq!(resolve("", "Заметка"), "zametka");
        assert_eq!(resolve("   ", "Hello World!"), "hello-world");
    }

    #[test]
    fn test_generated_slug_is_capped() {
        let title = "word ".repeat(50);
        let generated = resolve("", &title);
        assert!(generated.len() <= SLUG_MAX_LEN);
    }
}
