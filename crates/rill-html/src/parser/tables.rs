//! Element tables for lenient HTML nesting.

/// Elements that never have content. Their opening tag is immediately
/// followed by a close and they are never pushed on the open stack.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "command", "embed", "frame", "hr", "img", "input",
    "isindex", "keygen", "link", "meta", "param", "source", "track", "wbr",
    // Common SVG leaf elements.
    "path", "circle", "ellipse", "line", "rect", "use", "stop", "polyline", "polygon",
];

/// Form controls that cannot contain one another.
const FORM_TAGS: &[&str] = &[
    "input", "option", "optgroup", "select", "button", "datalist", "textarea",
];

/// Returns true if `name` is a void element.
#[must_use]
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// The open elements that an opening `name` tag implicitly closes.
///
/// Only the innermost open element is ever checked: while it is in this
/// set it is closed, and the check repeats on the next one.
#[must_use]
pub fn implied_closes(name: &str) -> &'static [&'static str] {
    match name {
        "tr" => &["tr", "th", "td"],
        "th" => &["th"],
        "td" => &["thead", "th", "td"],
        "body" => &["head", "link", "script"],
        "li" => &["li"],
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => &["p"],
        "select" | "input" | "output" | "button" | "datalist" | "textarea" => FORM_TAGS,
        "option" => &["option"],
        "optgroup" => &["optgroup"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("br"));
        assert!(is_void_element("img"));
        assert!(!is_void_element("div"));
        // Lookup is exact; callers fold case first.
        assert!(!is_void_element("BR"));
    }

    #[test]
    fn test_implied_closes() {
        assert_eq!(implied_closes("li"), &["li"]);
        assert!(implied_closes("h3").contains(&"p"));
        assert!(implied_closes("select").contains(&"textarea"));
        assert!(implied_closes("div").is_empty());
    }
}
