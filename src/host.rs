//! Host matching — extraction du hostname et règles de correspondance.
//!
//! Aucune dépendance vers le reste du crate : ces fonctions sont pures et
//! ne paniquent jamais, quelle que soit l'entrée.

use url::Url;

/// Extracts the hostname of `url`, lower-cased.
///
/// Returns an empty string when the input does not parse as an absolute URL
/// or has no host (`mailto:`, `data:`, `about:blank`...). An empty host never
/// matches an allow-list entry or a suffix rule.
pub fn host_of(url: &str) -> String {
    Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .unwrap_or_default()
}

/// Loose domain match: `host` equals `needle` or contains it anywhere.
///
/// This is a substring test, not a strict suffix test. It catches unknown
/// subdomains of a partner domain (`pay.kuriersoft.ch`) and also accepts
/// unrelated hosts embedding the needle (`kuriersoft.ch.evil.com`). The
/// second case is an accepted risk of the rule sets using this matcher.
pub fn matches_suffix(host: &str, needle: &str) -> bool {
    if host.is_empty() || needle.is_empty() {
        return false;
    }
    host == needle || host.contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of_basic() {
        assert_eq!(host_of("https://shop.example.ch/cart"), "shop.example.ch");
        assert_eq!(host_of("http://Shop.Example.CH:8080/x?y=1"), "shop.example.ch");
    }

    #[test]
    fn test_host_of_unparseable_is_empty() {
        assert_eq!(host_of("not a url"), "");
        assert_eq!(host_of("shop.example.ch/cart"), "");
        assert_eq!(host_of(""), "");
    }

    #[test]
    fn test_host_of_hostless_schemes() {
        assert_eq!(host_of("mailto:order@example.ch"), "");
        assert_eq!(host_of("about:blank"), "");
        assert_eq!(host_of("data:text/html,<p>x</p>"), "");
    }

    #[test]
    fn test_matches_suffix_subdomain() {
        assert!(matches_suffix("pay.example-platform.ch", "example-platform.ch"));
        assert!(matches_suffix("example-platform.ch", "example-platform.ch"));
    }

    #[test]
    fn test_matches_suffix_is_loose_substring() {
        // Substring match on purpose: an unrelated domain embedding the needle
        // is trusted too.
        assert!(matches_suffix(
            "notexample-platform.ch.evil.com",
            "example-platform.ch"
        ));
    }

    #[test]
    fn test_matches_suffix_empty_never_matches() {
        assert!(!matches_suffix("", "example-platform.ch"));
        assert!(!matches_suffix("shop.example.ch", ""));
        assert!(!matches_suffix("", ""));
    }

    #[test]
    fn test_matches_suffix_unrelated() {
        assert!(!matches_suffix("example.com", "example-platform.ch"));
    }
}
