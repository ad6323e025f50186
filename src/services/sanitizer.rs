use std::sync::LazyLock;

use regex::Regex;

static PICTOGRAPHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}",
        r"\x{1F900}-\x{1F9FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}\x{FE0F}\x{200D}]"
    ))
    .expect("valid regex")
});

static CONTACT_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*(?:[-*\x{2022}][ \t]*)?(?:email|phone):.*$").expect("valid regex")
});

static VERIFY_BOILERPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)you can verify.*$").expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Prepares assistant text for speech synthesis: no pictographs, no contact
/// details read aloud, single-spaced. The transcript keeps the original text.
pub fn sanitize_for_voice(text: &str) -> String {
    let text = PICTOGRAPHS.replace_all(text, "");
    let text = CONTACT_LINES.replace_all(&text, "");
    let text = VERIFY_BOILERPLATE.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}
