//! Page id extraction.

use once_cell::sync::Lazy;
use regex::Regex;

static RAW_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{32}$").unwrap());
static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});
static HEX_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9a-fA-F]{32}").unwrap());
static UUID_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .unwrap()
});

/// Extract a page id from a raw id, a hyphenated UUID, or a page URL.
///
/// The result is 32 lowercase hex digits without hyphens. For URLs the id is
/// taken from the path when possible, so view ids in the query string are
/// ignored.
///
/// # Example
///
/// ```
/// use ntnmark::ids::extract_page_id;
///
/// let id = extract_page_id("https://www.notion.so/team/Roadmap-0123456789abcdef0123456789ABCDEF?v=1");
/// assert_eq!(id.as_deref(), Some("0123456789abcdef0123456789abcdef"));
/// ```
pub fn extract_page_id(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if RAW_ID.is_match(s) {
        return Some(s.to_lowercase());
    }
    if UUID.is_match(s) {
        return Some(normalize_id(s));
    }

    if let Some(path) = url_path(s) {
        if let Some(m) = HEX_RUN.find(path) {
            return Some(m.as_str().to_lowercase());
        }
        if let Some(m) = UUID_RUN.find(path) {
            return Some(normalize_id(m.as_str()));
        }
    }

    HEX_RUN.find(s).map(|m| m.as_str().to_lowercase())
}

fn normalize_id(id: &str) -> String {
    id.replace('-', "").to_lowercase()
}

/// Path component of an absolute URL, without query or fragment.
fn url_path(s: &str) -> Option<&str> {
    let (scheme, rest) = s.split_once("://")?;
    if scheme.is_empty() || rest.is_empty() {
        return None;
    }
    let rest = rest.split(|c| c == '?' || c == '#').next().unwrap_or("");
    Some(rest.find('/').map_or("", |i| &rest[i..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_raw_and_uuid() {
        assert_eq!(extract_page_id(ID).as_deref(), Some(ID));
        assert_eq!(
            extract_page_id(" 0123456789ABCDEF0123456789ABCDEF ").as_deref(),
            Some(ID)
        );
        assert_eq!(
            extract_page_id("01234567-89ab-cdef-0123-456789abcdef").as_deref(),
            Some(ID)
        );
    }

    #[test]
    fn test_urls() {
        let slug = format!("https://www.notion.so/My-Page-{}", ID);
        assert_eq!(extract_page_id(&slug).as_deref(), Some(ID));

        let uuid = "https://notion.so/01234567-89ab-cdef-0123-456789abcdef";
        assert_eq!(extract_page_id(uuid).as_deref(), Some(ID));

        let with_view = format!(
            "https://www.notion.so/{}?v=ffffffffffffffffffffffffffffffff",
            ID
        );
        assert_eq!(extract_page_id(&with_view).as_deref(), Some(ID));
    }

    #[test]
    fn test_query_only_fallback() {
        let url = format!("https://example.com/open?id={}", ID);
        assert_eq!(extract_page_id(&url).as_deref(), Some(ID));
    }

    #[test]
    fn test_no_id() {
        assert_eq!(extract_page_id(""), None);
        assert_eq!(extract_page_id("not an id"), None);
        assert_eq!(extract_page_id("https://www.notion.so/"), None);
    }

    #[test]
    fn test_url_path() {
        assert_eq!(url_path("https://host/a/b?x=1#f"), Some("/a/b"));
        assert_eq!(url_path("https://host"), Some(""));
        assert_eq!(url_path("no scheme"), None);
    }
}
