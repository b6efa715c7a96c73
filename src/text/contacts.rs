//! Contact span repair.
//!
//! Kerning-justified PDFs often come out of the merger with a space between
//! every glyph of an email address, a profile URL or a phone number. Each span
//! class is matched with a pattern that tolerates horizontal whitespace
//! between glyphs, and every space or tab inside a match is removed. Text
//! outside the matches is never touched.
//!
//! Span classes are repaired in a fixed order: emails, URLs, the word
//! `linkedin`, phone numbers, then letter-spaced capitals. Patterns only
//! accept spaces and tabs, so a span never crosses a line break.

use lazy_static::lazy_static;
use regex::Regex;

/// Horizontal whitespace allowed between glyphs.
const H: &str = r"[ \t]";

/// Characters of the local part of an email address.
const LOCAL: &str = r"[a-z0-9._%+\-]";

/// Characters of a host name label.
const LABEL: &str = r"[a-z0-9\-]";

/// Characters of a URL path segment.
const PATH: &str = r"[^\s|/]";

/// A letter-spaced run (`j o h n`) or a solid token (`john`), over `class`.
///
/// The letter-spaced form is tried first and needs at least two glyphs.
fn token(class: &str) -> String {
    format!("(?:{class}(?:{H}{class})+|{class}+)")
}

/// A dotted host name: `example . c o m`.
fn host() -> String {
    let label = token(LABEL);
    format!("{label}(?:{H}*\\.{H}*{label})+")
}

/// One `/` of a URL path and the segment after it.
///
/// A letter-spaced segment is only taken when it is followed by another `/`,
/// or, with three or more glyphs, by whitespace or the end of the line. A
/// single glyph such as the `a` in `/a and more` therefore never pulls in
/// the next word.
fn path_element() -> String {
    let next_glyph = format!("(?:{H}{PATH})");
    format!(
        r"{H}*/(?:{H}*{PATH}{next_glyph}+{H}*/)*(?:{H}*(?:{PATH}{next_glyph}{{2,}}(?:[ \t\r]|(?m:$))|{PATH}+))?"
    )
}

/// Keyword whose letters may be separated by horizontal whitespace.
fn spaced(word: &str) -> String {
    let letters: Vec<String> = word.chars().map(|c| c.to_string()).collect();
    letters.join(&format!("{H}*"))
}

lazy_static! {
    static ref RE_EMAIL: Regex = Regex::new(&format!(
        r"(?i)\b{local}{H}*@{H}*{host}\b",
        local = token(LOCAL),
        host = host(),
    ))
    .unwrap();

    /// Scheme URLs: `h t t p s : / / host/path`
    static ref RE_URL_SCHEME: Regex = Regex::new(&format!(
        r"(?i)\b{http}(?:{H}*s)?{H}*:{H}*/{H}*/{H}*{host}(?:{path})*",
        http = spaced("http"),
        host = host(),
        path = path_element(),
    ))
    .unwrap();

    /// Bare URLs with a path: `linkedin . com / in / jane`
    static ref RE_URL_BARE: Regex = Regex::new(&format!(
        r"(?i)\b{label}(?:{H}*\.{H}*{label})*{H}*\.{H}*(?:{com}|{org}|{net}|{io})(?:{path})+",
        label = token(LABEL),
        com = spaced("com"),
        org = spaced("org"),
        net = spaced("net"),
        io = spaced("io"),
        path = path_element(),
    ))
    .unwrap();

    static ref RE_LINKEDIN: Regex =
        Regex::new(&format!(r"(?i)\b{}\b", spaced("linkedin"))).unwrap();

    /// Optional `+`, then seven or more digits with single space or hyphen separators
    static ref RE_PHONE: Regex = Regex::new(r"\+?\d(?:[ \-]?\d){6,}").unwrap();

    /// Three or more single capitals separated by single spaces
    static ref RE_SPACED_CAPS: Regex = Regex::new(r"\b[A-Z](?: [A-Z]){2,}\b").unwrap();
}

/// Remove every space and tab inside each match of `pattern`.
///
/// Whitespace that ends a match marks the span boundary and is kept.
fn despace_spans(text: &str, pattern: &Regex) -> String {
    pattern
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let span = &caps[0];
            let body = span.trim_end_matches(&[' ', '\t', '\r'][..]);
            let mut repaired: String = body.chars().filter(|c| *c != ' ' && *c != '\t').collect();
            repaired.push_str(&span[body.len()..]);
            repaired
        })
        .into_owned()
}

/// Repair letter-spaced emails, URLs, phone numbers and capitals.
///
/// Running the function on its own output changes nothing.
///
/// # Examples
///
/// ```
/// use pdf_salvage::text::normalize_contacts;
///
/// assert_eq!(
///     normalize_contacts("j o h n @ e x a m p l e . c o m"),
///     "john@example.com"
/// );
/// assert_eq!(normalize_contacts("Tel: +1 555 123 4567"), "Tel: +15551234567");
/// ```
pub fn normalize_contacts(text: &str) -> String {
    let text = despace_spans(text, &RE_EMAIL);
    let text = despace_spans(&text, &RE_URL_SCHEME);
    let text = despace_spans(&text, &RE_URL_BARE);
    let text = despace_spans(&text, &RE_LINKEDIN);
    let text = despace_spans(&text, &RE_PHONE);
    despace_spans(&text, &RE_SPACED_CAPS)
}
