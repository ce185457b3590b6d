//! Shared helpers for markup generation.

/// Opening delimiter for display math.
const DISPLAY_OPEN: &str = r"\[";
/// Closing delimiter for display math.
const DISPLAY_CLOSE: &str = r"\]";

/// Escape text for safe inclusion in HTML content or attribute values.
///
/// # Examples
///
/// ```
/// use kb_renderer::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">"#), "&lt;a href=&quot;x&quot;&gt;");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a raw math expression in display-math delimiters.
///
/// The expression is not escaped or otherwise altered.
///
/// # Examples
///
/// ```
/// use kb_renderer::math_display;
///
/// assert_eq!(math_display(r"\frac{a}{b}"), r"\[\frac{a}{b}\]");
/// ```
#[must_use]
pub fn math_display(expr: &str) -> String {
    format!("{DISPLAY_OPEN}{expr}{DISPLAY_CLOSE}")
}
