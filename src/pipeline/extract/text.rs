use scraper::ElementRef;

/// Elements whose text never renders
const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "template"];

/// Every run of whitespace becomes one space; ends are trimmed.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn visible_text_nodes<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    element.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            None
        } else {
            Some(&**text)
        }
    })
}

/// Single-value text of an element, e.g. a table cell or a heading.
pub fn inline_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&visible_text_nodes(element).collect::<String>())
}

/// Text nodes of an element, each collapsed, empty ones dropped, joined with `separator`.
pub fn joined_text(element: ElementRef<'_>, separator: &str) -> String {
    visible_text_nodes(element)
        .map(collapse_whitespace)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
