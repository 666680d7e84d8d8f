use url::Url;

/// Canonical form of a URL for use as a cache key.
///
/// Scheme and host are lowercased and an empty path becomes `/` (both by the
/// parser); the fragment is dropped. `/a` and `/a/` stay distinct. Input that
/// does not parse as an absolute URL is only trimmed and lowercased.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.into()
        }
        Err(_) => trimmed.to_ascii_lowercase(),
    }
}
