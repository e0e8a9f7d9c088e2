// src/core/sanitize.rs

/// `"staten-island"` → `"Staten Island"`. Only the first char of each word changes.
pub fn capitalize_words(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut cs = word.chars();
            match cs.next() {
                Some(first) => first.to_uppercase().chain(cs).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn strip_tabs(s: &str) -> String {
    s.replace('\t', "")
}

/// Empty string means "not present".
pub fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
