//! Re-serialization of parsed markup with link targets made absolute.
//!
//! `scraper` does not let us edit attributes in place, so fragments are written
//! back out by walking the node tree, rewriting `a[href]` and `img[src]` on
//! the way. Pages with verbatim links keep their anchors; images are always
//! made absolute so the report can embed them.

use std::borrow::Cow;

use ego_tree::NodeRef;
use scraper::node::{Element, Node};
use trending_core::LinkPolicy;
use url::Url;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Already absolute: has a scheme (`https:`, `mailto:`) or is protocol-relative.
pub fn is_absolute(target: &str) -> bool {
    let target = target.trim();
    target.starts_with("//") || Url::parse(target).is_ok()
}

/// Prefixes `base` to a relative target. Absolute targets come back unchanged.
pub fn absolutize<'a>(base: &str, target: &'a str) -> Cow<'a, str> {
    if is_absolute(target) {
        return Cow::Borrowed(target);
    }
    let relative = target.trim();
    let relative = relative.strip_prefix("./").unwrap_or(relative);
    Cow::Owned(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    ))
}

pub(crate) struct MarkupWriter<'a> {
    base: &'a str,
    policy: LinkPolicy,
}

impl<'a> MarkupWriter<'a> {
    pub(crate) fn new(base: &'a str, policy: LinkPolicy) -> Self {
        Self { base, policy }
    }

    pub(crate) fn write(&self, node: NodeRef<'_, Node>) -> String {
        let mut out = String::new();
        self.visit_node(node, &mut out, false);
        out
    }

    fn visit_node(&self, node: NodeRef<'_, Node>, out: &mut String, raw_text: bool) {
        match node.value() {
            Node::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&html_escape::encode_text(&**text));
                }
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Element(element) => self.visit_element(node, element, out),
            _ => {
                for child in node.children() {
                    self.visit_node(child, out, raw_text);
                }
            }
        }
    }

    fn visit_element(&self, node: NodeRef<'_, Node>, element: &Element, out: &mut String) {
        let tag = element.name();
        out.push('<');
        out.push_str(tag);
        for (name, value) in element.attrs() {
            let value = self.rewrite_attr(tag, name, value);
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(&value));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&tag) {
            return;
        }
        let raw_text = matches!(tag, "script" | "style");
        for child in node.children() {
            self.visit_node(child, out, raw_text);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    fn rewrite_attr<'v>(&self, tag: &str, name: &str, value: &'v str) -> Cow<'v, str> {
        match (tag, name) {
            ("a", "href") if self.policy == LinkPolicy::Verbatim => Cow::Borrowed(value),
            ("a", "href") | ("img", "src") => absolutize(self.base, value),
            _ => Cow::Borrowed(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first(html: &str, css: &str, policy: LinkPolicy) -> String {
        let doc = Html::parse_document(html);
        let sel = Selector::parse(css).unwrap();
        let element = doc.select(&sel).next().unwrap();
        MarkupWriter::new("https://host/page/", policy).write(*element)
    }

    #[test]
    fn absolutize_prefixes_relative_targets_only() {
        assert_eq!(absolutize("https://host/page/", "plot.png"), "https://host/page/plot.png");
        assert_eq!(absolutize("https://host/page/", "./a/b.html"), "https://host/page/a/b.html");
        assert_eq!(absolutize("https://host/page/", "https://other/x"), "https://other/x");
        assert_eq!(absolutize("https://host/page/", "//cdn/x.gif"), "//cdn/x.gif");
        assert_eq!(absolutize("https://host/page/", "mailto:a@b"), "mailto:a@b");
    }

    #[test]
    fn nested_links_are_rewritten_and_text_escaped() {
        let out = first(
            r#"<div><p>a &lt; b <a href="x.html">x</a></p><img src="p.png"><br><span title="q&quot;">t</span></div>"#,
            "div",
            LinkPolicy::Rewrite,
        );
        assert_eq!(
            out,
            r#"<div><p>a &lt; b <a href="https://host/page/x.html">x</a></p><img src="https://host/page/p.png"><br><span title="q&quot;">t</span></div>"#
        );
    }

    #[test]
    fn verbatim_policy_keeps_anchors_but_not_images() {
        let out = first(
            r#"<p><a href="x.html">x</a><img src="x.png"></p>"#,
            "p",
            LinkPolicy::Verbatim,
        );
        assert_eq!(
            out,
            r#"<p><a href="x.html">x</a><img src="https://host/page/x.png"></p>"#
        );
    }

    #[test]
    fn script_bodies_are_not_escaped() {
        let out = first("<script>if (a < b) {}</script>", "script", LinkPolicy::Rewrite);
        assert_eq!(out, "<script>if (a < b) {}</script>");
    }
}
