pub mod food;
pub mod profile;

/// Case-insensitive check that any text contains any of the keywords.
///
/// Keywords are expected in lowercase.
pub(crate) fn mentions_any(texts: &[String], keywords: &[&str]) -> bool {
    texts.iter().any(|text| {
        let text = text.to_lowercase();
        keywords.iter().any(|keyword| text.contains(keyword))
    })
}
