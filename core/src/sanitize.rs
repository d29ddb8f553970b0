//! HTML injection boundary
//!
//! Every record field documented as markup (`content`, FAQ answers, card
//! fields) passes through [`HtmlSanitizer::prepare`] before it reaches the
//! surface. Plain text (headings, table cells, questions) never does; the
//! surface escapes it.

use crate::config::HtmlPolicy;

/// Prefix given to ids kept by sanitization so they never collide with ids
/// the renderer assigns
pub const USER_ID_PREFIX: &str = "user-content-";

/// Applies an [`HtmlPolicy`] to untrusted markup
pub struct HtmlSanitizer {
    policy: HtmlPolicy,
    cleaner: ammonia::Builder<'static>,
}

impl HtmlSanitizer {
    pub fn new(policy: HtmlPolicy) -> Self {
        let mut cleaner = ammonia::Builder::default();
        cleaner
            .add_generic_attributes(&["class", "id"])
            .id_prefix(Some(USER_ID_PREFIX));
        Self { policy, cleaner }
    }

    /// Turn untrusted markup into markup safe to inject under the policy
    pub fn prepare(&self, markup: &str) -> String {
        match self.policy {
            HtmlPolicy::Sanitize => self.cleaner.clean(markup).to_string(),
            HtmlPolicy::Trust => markup.to_string(),
            HtmlPolicy::Escape => escape_text(markup),
        }
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new(HtmlPolicy::default())
    }
}

/// Escape text for use in element content or a quoted attribute value
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
