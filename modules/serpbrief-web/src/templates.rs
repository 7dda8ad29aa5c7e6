use dioxus::prelude::VirtualDom;
use pulldown_cmark::{html, Options, Parser};

/// Render a VirtualDom into a complete HTML document string.
pub fn render_to_html(dom: &VirtualDom) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\">{}</html>",
        dioxus::ssr::render(dom)
    )
}

/// Render Markdown to an HTML fragment for in-page display. The download
/// keeps the verbatim Markdown; this is only for the results view.
pub fn render_markdown_html(markdown: &str) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_renders_headings_and_lists() {
        let rendered = render_markdown_html("# Outline\n\n- keyword one\n- keyword two\n");
        assert!(rendered.contains("<h1>Outline</h1>"));
        assert!(rendered.contains("<li>keyword one</li>"));
    }

    #[test]
    fn markdown_tables_enabled() {
        let rendered = render_markdown_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(rendered.contains("<table>"));
    }
}
