//! Running header/footer content nodes
//!
//! A document holds at most one header node, always its first top-level node,
//! and at most one footer node, always its last. Their blocks are the
//! authoritative text of the running header/footer drawn by the overlay.

use super::{Block, BlockKind, Document, NodeKind};
use crate::editing::{MarkerKey, Step, Transaction};
use crate::render::escape_text;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Attribute naming the node type on a container element
pub const DATA_TYPE_ATTR: &str = "data-type";

#[derive(Error, Debug, PartialEq)]
pub enum ContentError {
    #[error("Expected a <div> container, found <{0}>")]
    NotAContainer(String),
    #[error("Container data-type is {found:?}, expected \"{expected}\"")]
    WrongType {
        expected: &'static str,
        found: Option<String>,
    },
    #[error("Unsupported block element <{0}>")]
    UnsupportedBlock(String),
}

/// Which running region a node feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Header,
    Footer,
}

impl RegionKind {
    /// Value of the `data-type` attribute for this region
    pub fn data_type(self) -> &'static str {
        match self {
            RegionKind::Header => "header",
            RegionKind::Footer => "footer",
        }
    }

    pub fn from_data_type(value: &str) -> Option<Self> {
        match value {
            "header" => Some(RegionKind::Header),
            "footer" => Some(RegionKind::Footer),
            _ => None,
        }
    }
}

/// A block element inside a container, as handed over by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockElement {
    pub tag: String,
    pub text: String,
}

/// A tagged container element, as handed over by the host
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerElement {
    pub tag: String,
    pub attributes: FxHashMap<String, String>,
    pub children: Vec<BlockElement>,
}

/// Header or footer content node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionNode {
    kind: RegionKind,
    blocks: Vec<Block>,
}

impl RegionNode {
    /// Create a node; an empty block list gets one empty paragraph
    pub fn new(kind: RegionKind, mut blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            blocks.push(Block::paragraph(""));
        }
        Self { kind, blocks }
    }

    /// Minimal content block holding `text`
    pub fn from_text(kind: RegionKind, text: &str) -> Self {
        Self::new(kind, vec![Block::paragraph(text)])
    }

    /// Parse a `div[data-type="header"|"footer"]` container
    pub fn parse(kind: RegionKind, element: &ContainerElement) -> Result<Self, ContentError> {
        if element.tag != "div" {
            return Err(ContentError::NotAContainer(element.tag.clone()));
        }
        let found = element.attributes.get(DATA_TYPE_ATTR);
        if found.map(String::as_str) != Some(kind.data_type()) {
            return Err(ContentError::WrongType {
                expected: kind.data_type(),
                found: found.cloned(),
            });
        }

        let blocks = element
            .children
            .iter()
            .map(|child| {
                BlockKind::from_tag(&child.tag)
                    .map(|kind| Block {
                        kind,
                        text: child.text.clone(),
                    })
                    .ok_or_else(|| ContentError::UnsupportedBlock(child.tag.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(kind, blocks))
    }

    /// Serialize back to a container element
    pub fn to_container(&self) -> ContainerElement {
        let mut attributes = FxHashMap::default();
        attributes.insert(DATA_TYPE_ATTR.to_string(), self.kind.data_type().to_string());
        attributes.insert("style".to_string(), "display: none;".to_string());
        ContainerElement {
            tag: "div".to_string(),
            attributes,
            children: self
                .blocks
                .iter()
                .map(|block| BlockElement {
                    tag: block.kind.tag().to_string(),
                    text: block.text.clone(),
                })
                .collect(),
        }
    }

    /// Markup for the document flow; the container itself is never displayed
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div {}=\"{}\" style=\"display: none;\">",
            DATA_TYPE_ATTR,
            self.kind.data_type()
        );
        for block in &self.blocks {
            let tag = block.kind.tag();
            html.push_str(&format!("<{tag}>{}</{tag}>", escape_text(&block.text)));
        }
        html.push_str("</div>");
        html
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Plain text of all blocks, one line per block
    pub fn text_content(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build the transaction that installs `text` as the region's content.
///
/// An instance already sitting in the canonical slot is replaced in place;
/// anything else (missing, misplaced, duplicated) is removed and a single node
/// is inserted at the slot. The transaction always carries a header/footer
/// marker, even when the text is unchanged.
pub(crate) fn set_region_content(doc: &Document, kind: RegionKind, text: &str) -> Transaction {
    let node = NodeKind::Region(RegionNode::from_text(kind, text));
    let existing: Vec<usize> = doc
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, n)| n.kind.region_kind() == Some(kind))
        .map(|(i, _)| i)
        .collect();

    let slot = match kind {
        RegionKind::Header => 0,
        RegionKind::Footer => doc.len().saturating_sub(1),
    };

    let mut tx = Transaction::new();
    if existing.as_slice() == [slot] {
        tx = tx.step(Step::Replace { index: slot, node });
    } else {
        for &index in existing.iter().rev() {
            tx = tx.step(Step::Remove { index });
        }
        let index = match kind {
            RegionKind::Header => 0,
            RegionKind::Footer => doc.len() - existing.len(),
        };
        tx = tx.step(Step::Insert { index, node });
    }
    tx.with_marker(MarkerKey::HeaderFooter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(data_type: &str, children: &[(&str, &str)]) -> ContainerElement {
        let mut attributes = FxHashMap::default();
        attributes.insert(DATA_TYPE_ATTR.to_string(), data_type.to_string());
        ContainerElement {
            tag: "div".to_string(),
            attributes,
            children: children
                .iter()
                .map(|(tag, text)| BlockElement {
                    tag: tag.to_string(),
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_parse_header_container() {
        let element = container("header", &[("p", "Draft"), ("h2", "Chapter")]);
        let node = RegionNode::parse(RegionKind::Header, &element).unwrap();
        assert_eq!(node.blocks().len(), 2);
        assert_eq!(node.blocks()[1].kind, BlockKind::Heading { level: 2 });
        assert_eq!(node.text_content(), "Draft\nChapter");
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        let element = container("footer", &[("p", "x")]);
        assert_eq!(
            RegionNode::parse(RegionKind::Header, &element),
            Err(ContentError::WrongType {
                expected: "header",
                found: Some("footer".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_rejects_non_block_child() {
        let element = container("footer", &[("span", "x")]);
        assert_eq!(
            RegionNode::parse(RegionKind::Footer, &element),
            Err(ContentError::UnsupportedBlock("span".to_string()))
        );
    }

    #[test]
    fn test_empty_container_gets_paragraph() {
        let node = RegionNode::parse(RegionKind::Footer, &container("footer", &[])).unwrap();
        assert_eq!(node.blocks(), &[Block::paragraph("")]);
    }

    #[test]
    fn test_container_round_trip() {
        let node = RegionNode::from_text(RegionKind::Footer, "Page {page}");
        let parsed = RegionNode::parse(RegionKind::Footer, &node.to_container()).unwrap();
        assert_eq!(parsed, node);
    }

    #[test]
    fn test_to_html_hidden_and_escaped() {
        let node = RegionNode::from_text(RegionKind::Header, "R&D <draft>");
        assert_eq!(
            node.to_html(),
            "<div data-type=\"header\" style=\"display: none;\"><p>R&amp;D &lt;draft&gt;</p></div>"
        );
    }
}
