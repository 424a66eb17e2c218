//! Overlay construction
//!
//! The overlay is a non-editable tree of page-break units injected ahead of
//! the content. Each unit is a spacer that pushes content down by one content
//! area, followed by a breaker bar holding the page footer, the gap between
//! pages and the next page's header. The header of the very first page lives
//! in a separate element because the first unit's header belongs to page two.

use crate::config::{px, PaginationConfig};
use crate::document::{Document, RegionKind};
use smallvec::SmallVec;

/// Marker attribute identifying the overlay root in the rendered tree
pub const PAGINATION_ATTR: &str = "data-rm-pagination";
/// Class of the breaker bar inside each page-break unit
pub const BREAKER_CLASS: &str = "breaker";
/// Class of the standalone first-page header
pub const FIRST_HEADER_CLASS: &str = "rm-first-page-header";
/// Class of the live page-number marker
pub const PAGE_NUMBER_CLASS: &str = "rm-page-number";
/// Class of one page-break unit
pub const PAGE_BREAK_CLASS: &str = "rm-page-break";

/// A node of the overlay tree
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayNode {
    Element(OverlayElement),
    Text(String),
    /// Insertion point of the page number; the value comes from CSS counters
    PageNumber,
}

/// An element of the overlay tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayElement {
    pub tag: &'static str,
    pub id: Option<&'static str>,
    pub classes: SmallVec<[&'static str; 2]>,
    pub attributes: Vec<(&'static str, String)>,
    pub style: Vec<(&'static str, String)>,
    pub children: Vec<OverlayNode>,
}

impl OverlayElement {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    pub fn div(class: &'static str) -> Self {
        Self::new("div").class(class)
    }

    pub fn id(mut self, id: &'static str) -> Self {
        self.id = Some(id);
        self
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.style.push((property, value.into()));
        self
    }

    pub fn child(mut self, child: OverlayElement) -> Self {
        self.children.push(OverlayNode::Element(child));
        self
    }

    pub fn nodes(mut self, nodes: impl IntoIterator<Item = OverlayNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }

    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &OverlayElement> + '_ {
        self.children.iter().filter_map(|node| match node {
            OverlayNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First descendant element (depth-first) carrying `class`
    pub fn find_class(&self, class: &str) -> Option<&OverlayElement> {
        for element in self.elements() {
            if element.has_class(class) {
                return Some(element);
            }
            if let Some(found) = element.find_class(class) {
                return Some(found);
            }
        }
        None
    }

    /// Visible text, with page-number markers contributing nothing
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                OverlayNode::Element(element) => text.push_str(&element.text_content()),
                OverlayNode::Text(t) => text.push_str(t),
                OverlayNode::PageNumber => {}
            }
        }
        text
    }
}

/// A complete overlay: the first-page header plus the page-break units
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayTree {
    pub first_header: OverlayElement,
    pub pages: OverlayElement,
}

impl OverlayTree {
    pub fn page_count(&self) -> usize {
        self.pages.elements().count()
    }

    /// Page-break units in order
    pub fn units(&self) -> impl Iterator<Item = &OverlayElement> + '_ {
        self.pages.elements()
    }

    /// Top-level elements in the order the host inserts them ahead of the
    /// content. The page-break container comes first and lays out no height of
    /// its own, so the first header sits at the top of the flow and the first
    /// unit's spacer reaches past it.
    pub fn in_insertion_order(&self) -> [&OverlayElement; 2] {
        [&self.pages, &self.first_header]
    }
}

/// Split `text` at the first occurrence of `placeholder`, turning it into a
/// page-number marker. Later occurrences stay literal.
pub fn substitute_placeholder(text: &str, placeholder: &str) -> (Vec<OverlayNode>, bool) {
    let mut nodes = Vec::new();
    let found = match text.find(placeholder) {
        Some(at) if !placeholder.is_empty() => {
            let (before, rest) = text.split_at(at);
            let after = &rest[placeholder.len()..];
            if !before.is_empty() {
                nodes.push(OverlayNode::Text(before.to_string()));
            }
            nodes.push(OverlayNode::PageNumber);
            if !after.is_empty() {
                nodes.push(OverlayNode::Text(after.to_string()));
            }
            true
        }
        _ => {
            if !text.is_empty() {
                nodes.push(OverlayNode::Text(text.to_string()));
            }
            false
        }
    };
    (nodes, found)
}

/// Builds overlays from a document snapshot and a configuration.
///
/// Pure: the same inputs always give the same tree, and the document is only read.
pub struct OverlayBuilder<'a> {
    doc: &'a Document,
    config: &'a PaginationConfig,
}

impl<'a> OverlayBuilder<'a> {
    pub fn new(doc: &'a Document, config: &'a PaginationConfig) -> Self {
        Self { doc, config }
    }

    pub fn build(&self, page_count: usize) -> OverlayTree {
        let page_count = page_count.max(1);
        let mut pages = OverlayElement::new("div")
            .id("pages")
            .attr(PAGINATION_ATTR, "true");

        for index in 0..page_count {
            pages = pages.child(self.page_unit(index == 0));
        }
        log::debug!("built overlay with {} page(s)", page_count);

        OverlayTree {
            first_header: self.first_header(),
            pages,
        }
    }

    /// Content of a running region: the document node when present, the
    /// static string otherwise
    fn region_content(&self, kind: RegionKind, fallback: &str) -> Vec<OverlayNode> {
        let placeholder = self.config.chrome.page_placeholder.as_str();
        match self.doc.region(kind) {
            Some(region) => {
                let mut pending = true;
                region
                    .blocks()
                    .iter()
                    .map(|block| {
                        let children = if pending {
                            let (nodes, found) = substitute_placeholder(&block.text, placeholder);
                            pending = !found;
                            nodes
                        } else if block.text.is_empty() {
                            Vec::new()
                        } else {
                            vec![OverlayNode::Text(block.text.clone())]
                        };
                        OverlayNode::Element(OverlayElement::new(block.kind.tag()).nodes(children))
                    })
                    .collect()
            }
            None => substitute_placeholder(fallback, placeholder).0,
        }
    }

    fn static_content(&self, text: &str) -> Vec<OverlayNode> {
        substitute_placeholder(text, &self.config.chrome.page_placeholder).0
    }

    fn page_unit(&self, first: bool) -> OverlayElement {
        let g = &self.config.geometry;
        let content_area = g.content_area_height();
        let spacer_height = if first {
            g.header_allowance() + content_area
        } else {
            content_area
        };

        let spacer = OverlayElement::div("page")
            .style("position", "relative")
            .style("float", "left")
            .style("clear", "both")
            .style("margin-top", px(spacer_height));

        OverlayElement::div(PAGE_BREAK_CLASS)
            .child(spacer)
            .child(self.breaker())
    }

    fn breaker(&self) -> OverlayElement {
        let g = &self.config.geometry;
        let chrome = &self.config.chrome;

        let footer = OverlayElement::div("rm-page-footer")
            .style("height", px(g.footer_height))
            .style("overflow", "hidden")
            .child(
                OverlayElement::div("rm-page-footer-left")
                    .nodes(self.region_content(RegionKind::Footer, &chrome.footer_left)),
            )
            .child(
                OverlayElement::div("rm-page-footer-right")
                    .nodes(self.static_content(&chrome.footer_right)),
            );

        let border = g.page_gap_border_size;
        let gap = OverlayElement::div("rm-pagination-gap")
            .style("height", px(g.page_gap))
            .style("border-left", format!("{} solid", px(border)))
            .style("border-right", format!("{} solid", px(border)))
            .style("position", "relative")
            .style("width", format!("calc(100% + {}) !important", px(border * 2.0)))
            .style("left", px(-border))
            .style("background-color", g.gap_background.clone())
            .style("border-left-color", g.gap_background.clone())
            .style("border-right-color", g.gap_background.clone());

        let header = OverlayElement::div("rm-page-header")
            .style("height", px(g.header_height))
            .style("overflow", "hidden")
            .child(
                OverlayElement::div("rm-page-header-left")
                    .nodes(self.static_content(&chrome.header_left)),
            )
            .child(
                OverlayElement::div("rm-page-header-right")
                    .nodes(self.region_content(RegionKind::Header, &chrome.header_right)),
            );

        OverlayElement::div(BREAKER_CLASS)
            .style(
                "width",
                "calc(100% + var(--rm-margin-left) + var(--rm-margin-right))",
            )
            .style("margin-left", "calc(-1 * var(--rm-margin-left))")
            .style("margin-right", "calc(-1 * var(--rm-margin-right))")
            .style("position", "relative")
            .style("float", "left")
            .style("clear", "both")
            .style("left", "0px")
            .style("right", "0px")
            .style("z-index", "2")
            .child(footer)
            .child(gap)
            .child(header)
    }

    fn first_header(&self) -> OverlayElement {
        let g = &self.config.geometry;
        let chrome = &self.config.chrome;
        OverlayElement::div(FIRST_HEADER_CLASS)
            .style("position", "relative")
            .style("height", px(g.header_height))
            .style("overflow", "hidden")
            .child(
                OverlayElement::div("rm-first-page-header-left")
                    .nodes(self.static_content(&chrome.header_left)),
            )
            .child(
                OverlayElement::div("rm-first-page-header-right")
                    .nodes(self.region_content(RegionKind::Header, &chrome.header_right)),
            )
    }
}

/// Build an overlay of `page_count` pages
pub fn build_overlay(doc: &Document, config: &PaginationConfig, page_count: usize) -> OverlayTree {
    OverlayBuilder::new(doc, config).build(page_count)
}
