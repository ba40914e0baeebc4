use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9\-]+[a-zA-Z0-9._%+\-]*@[a-zA-Z0-9\-]+[a-zA-Z0-9.\-]*\.[a-zA-Z]{2,4}")
        .expect("valid regex")
});

/// Finds email-like strings in free text (profile bios, page bodies).
///
/// Matches are lowercased and deduplicated in first-seen order.
#[must_use]
pub fn find_emails(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in EMAIL_RE.find_iter(text) {
        let email = m.as_str().trim_end_matches('.').to_lowercase();
        if !found.contains(&email) {
            found.push(email);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_address_in_bio() {
        let text = "Face yoga coach 🌿 collab: Hello.Studio@Example.com | DM for rates";
        assert_eq!(find_emails(text), vec!["hello.studio@example.com"]);
    }

    #[test]
    fn finds_multiple_and_dedups() {
        let text = "biz: a@brand.co\nalt: b-team@mail.example.org\nagain A@BRAND.CO";
        assert_eq!(
            find_emails(text),
            vec!["a@brand.co", "b-team@mail.example.org"]
        );
    }

    #[test]
    fn no_match_returns_empty() {
        assert!(find_emails("no contact info here @handle").is_empty());
    }
}
