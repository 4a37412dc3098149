/// Longest slug the `slug` columns accept.
pub const MAX_SLUG_LEN: usize = 50;

/// Lowercase ASCII words joined by single hyphens, cut to [`MAX_SLUG_LEN`].
///
/// Non-ASCII letters are dropped rather than transliterated.
#[must_use]
pub fn slugify(title: &str) -> String {
    let joined = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let mut slug: String = joined.chars().take(MAX_SLUG_LEN).collect();
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
