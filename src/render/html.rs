//! Markup serialization for the overlay

use crate::render::{OverlayElement, OverlayNode, OverlayTree, PAGE_NUMBER_CLASS};

/// Escape text for use as element content
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

impl OverlayNode {
    fn write_html(&self, out: &mut String) {
        match self {
            OverlayNode::Element(element) => element.write_html(out),
            OverlayNode::Text(text) => out.push_str(&escape_text(text)),
            OverlayNode::PageNumber => {
                out.push_str(&format!("<span class=\"{}\"></span>", PAGE_NUMBER_CLASS));
            }
        }
    }
}

impl OverlayElement {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if let Some(id) = self.id {
            out.push_str(&format!(" id=\"{}\"", escape_attr(id)));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", self.classes.join(" ")));
        }
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
        }
        if !self.style.is_empty() {
            let style = self
                .style
                .iter()
                .map(|(property, value)| format!("{}: {};", property, value))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&format!(" style=\"{}\"", escape_attr(&style)));
        }
        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str(&format!("</{}>", self.tag));
    }
}

impl OverlayTree {
    /// Markup of the page-break container
    pub fn to_html(&self) -> String {
        self.pages.to_html()
    }

    /// Markup of each top-level element, in insertion order
    pub fn fragments(&self) -> Vec<String> {
        self.in_insertion_order()
            .iter()
            .map(|element| element.to_html())
            .collect()
    }
}
