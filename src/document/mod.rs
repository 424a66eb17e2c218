//! Content document: body blocks plus the header/footer content model

mod block;
mod region;

pub use block::{Block, BlockKind};
pub use region::{
    BlockElement, ContainerElement, ContentError, RegionKind, RegionNode, DATA_TYPE_ATTR,
};

use crate::editing::{Step, Transaction, TransitionResult};

/// Stable identifier for top-level nodes that survives edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeId(pub u64);

/// Content of a top-level node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Running header or footer content
    Region(RegionNode),
    /// Flowing body block
    Body(Block),
}

impl NodeKind {
    pub fn region_kind(&self) -> Option<RegionKind> {
        match self {
            NodeKind::Region(region) => Some(region.kind()),
            NodeKind::Body(_) => None,
        }
    }
}

/// A top-level document node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

/// The content document
#[derive(Debug, Clone)]
pub struct Document {
    /// Top-level nodes in order
    nodes: Vec<Node>,
    /// Bumped on every transition that changes nodes
    version: u64,
    /// Next node ID to assign
    next_node_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding one empty paragraph
    pub fn new() -> Self {
        Self::from_nodes(Vec::new())
    }

    /// Create a document from body blocks
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        Self::from_nodes(blocks.into_iter().map(NodeKind::Body).collect())
    }

    /// Create a document from arbitrary top-level content, normalizing the
    /// header/footer slots
    pub fn from_nodes(kinds: Vec<NodeKind>) -> Self {
        let mut doc = Self {
            nodes: Vec::with_capacity(kinds.len()),
            version: 0,
            next_node_id: 0,
        };
        for kind in kinds {
            let node = doc.make_node(kind);
            doc.nodes.push(node);
        }
        doc.normalize();
        doc
    }

    fn make_node(&mut self, kind: NodeKind) -> Node {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        Node { id, kind }
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of top-level nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Body blocks in order
    pub fn body(&self) -> impl Iterator<Item = &Block> + '_ {
        self.nodes.iter().filter_map(|n| match &n.kind {
            NodeKind::Body(block) => Some(block),
            NodeKind::Region(_) => None,
        })
    }

    /// The header node, if the first node is one
    pub fn header(&self) -> Option<&RegionNode> {
        match self.nodes.first().map(|n| &n.kind) {
            Some(NodeKind::Region(region)) if region.kind() == RegionKind::Header => Some(region),
            _ => None,
        }
    }

    /// The footer node, if the last node is one
    pub fn footer(&self) -> Option<&RegionNode> {
        match self.nodes.last().map(|n| &n.kind) {
            Some(NodeKind::Region(region)) if region.kind() == RegionKind::Footer => Some(region),
            _ => None,
        }
    }

    pub fn region(&self, kind: RegionKind) -> Option<&RegionNode> {
        match kind {
            RegionKind::Header => self.header(),
            RegionKind::Footer => self.footer(),
        }
    }

    pub fn header_text(&self) -> Option<String> {
        self.header().map(RegionNode::text_content)
    }

    pub fn footer_text(&self) -> Option<String> {
        self.footer().map(RegionNode::text_content)
    }

    /// Transaction replacing the header content with `text`
    pub fn set_header_content(&self, text: &str) -> Transaction {
        region::set_region_content(self, RegionKind::Header, text)
    }

    /// Transaction replacing the footer content with `text`
    pub fn set_footer_content(&self, text: &str) -> Transaction {
        region::set_region_content(self, RegionKind::Footer, text)
    }

    /// Apply a transaction.
    ///
    /// Steps that point outside the node sequence are skipped. The result is
    /// always normalized, so callers never observe a duplicated or misplaced
    /// header/footer.
    pub fn apply(&mut self, tx: &Transaction) -> TransitionResult {
        let mut changed = false;

        for step in &tx.steps {
            changed |= self.apply_step(step);
        }

        if changed {
            self.normalize();
            self.version += 1;
        }

        TransitionResult {
            version: self.version,
            doc_changed: changed,
            markers: tx.markers.clone(),
        }
    }

    fn apply_step(&mut self, step: &Step) -> bool {
        match step {
            Step::Insert { index, node } => {
                if *index > self.nodes.len() {
                    log::warn!("insert at {} past end of {} nodes", index, self.nodes.len());
                    return false;
                }
                let node = self.make_node(node.clone());
                self.nodes.insert(*index, node);
                true
            }
            Step::Replace { index, node } => {
                if *index >= self.nodes.len() {
                    log::warn!("replace at {} past end of {} nodes", index, self.nodes.len());
                    return false;
                }
                let node = self.make_node(node.clone());
                self.nodes[*index] = node;
                true
            }
            Step::Remove { index } => {
                if *index >= self.nodes.len() {
                    log::warn!("remove at {} past end of {} nodes", index, self.nodes.len());
                    return false;
                }
                self.nodes.remove(*index);
                true
            }
            Step::SetText { index, text } => match self.nodes.get_mut(*index) {
                Some(Node {
                    kind: NodeKind::Body(block),
                    ..
                }) => {
                    block.text = text.clone();
                    true
                }
                _ => {
                    log::warn!("set text at {} does not address a body block", index);
                    false
                }
            },
        }
    }

    /// Enforce the header/footer slot invariant and reindex.
    ///
    /// The last header and the last footer in node order win; the header moves
    /// to the front, the footer to the back, and at least one body block remains.
    fn normalize(&mut self) {
        let mut header = None;
        let mut footer = None;
        let mut body = Vec::with_capacity(self.nodes.len());
        let mut dropped = 0usize;

        for node in self.nodes.drain(..) {
            match node.kind.region_kind() {
                Some(RegionKind::Header) => dropped += usize::from(header.replace(node).is_some()),
                Some(RegionKind::Footer) => dropped += usize::from(footer.replace(node).is_some()),
                None => body.push(node),
            }
        }

        if dropped > 0 {
            log::warn!("dropped {} duplicate header/footer node(s)", dropped);
        }

        if body.is_empty() {
            let node = self.make_node(NodeKind::Body(Block::paragraph("")));
            body.push(node);
        }

        self.nodes.extend(header);
        self.nodes.extend(body);
        self.nodes.extend(footer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::MarkerKey;

    fn region(kind: RegionKind, text: &str) -> NodeKind {
        NodeKind::Region(RegionNode::from_text(kind, text))
    }

    #[test]
    fn test_new_document() {
        let doc = Document::new();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.body().count(), 1);
        assert!(doc.header().is_none());
        assert!(doc.footer().is_none());
    }

    #[test]
    fn test_from_nodes_moves_regions_to_slots() {
        let doc = Document::from_nodes(vec![
            region(RegionKind::Footer, "foot"),
            NodeKind::Body(Block::paragraph("body")),
            region(RegionKind::Header, "head"),
        ]);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.header_text().as_deref(), Some("head"));
        assert_eq!(doc.footer_text().as_deref(), Some("foot"));
    }

    #[test]
    fn test_from_nodes_drops_duplicates() {
        let doc = Document::from_nodes(vec![
            region(RegionKind::Header, "old"),
            region(RegionKind::Header, "new"),
            NodeKind::Body(Block::paragraph("body")),
        ]);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.header_text().as_deref(), Some("new"));
    }

    #[test]
    fn test_set_header_content_twice() {
        let mut doc = Document::from_blocks([Block::paragraph("body")]);

        let tx = doc.set_header_content("Draft v1");
        assert!(tx.has_marker(MarkerKey::HeaderFooter));
        doc.apply(&tx);
        assert_eq!(doc.header_text().as_deref(), Some("Draft v1"));

        let tx = doc.set_header_content("Draft v2");
        assert!(matches!(tx.steps.as_slice(), [Step::Replace { index: 0, .. }]));
        doc.apply(&tx);

        let headers = doc
            .nodes()
            .iter()
            .filter(|n| n.kind.region_kind() == Some(RegionKind::Header))
            .count();
        assert_eq!(headers, 1);
        assert_eq!(doc.header_text().as_deref(), Some("Draft v2"));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_set_footer_content_appends_then_replaces() {
        let mut doc = Document::from_blocks([Block::paragraph("a"), Block::paragraph("b")]);
        doc.apply(&doc.set_footer_content("Page {page}"));
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.footer_text().as_deref(), Some("Page {page}"));

        doc.apply(&doc.set_footer_content("Page {page} of many"));
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.footer_text().as_deref(), Some("Page {page} of many"));
        assert_eq!(doc.body().count(), 2);
    }

    #[test]
    fn test_same_text_still_marked() {
        let mut doc = Document::new();
        doc.apply(&doc.set_footer_content("x"));
        let tx = doc.set_footer_content("x");
        assert!(tx.forces_rebuild());
        let result = doc.apply(&tx);
        assert!(result.forces_rebuild());
    }

    #[test]
    fn test_marker_only_transaction_keeps_version() {
        let mut doc = Document::new();
        let result = doc.apply(&Transaction::resync());
        assert!(!result.doc_changed);
        assert_eq!(result.version, 0);
        assert!(result.has_marker(MarkerKey::PageCount));
    }

    #[test]
    fn test_set_text_keeps_node_id() {
        let mut doc = Document::from_blocks([Block::paragraph("one")]);
        let id = doc.nodes()[0].id;
        let result = doc.apply(&Transaction::new().step(Step::SetText {
            index: 0,
            text: "two".to_string(),
        }));
        assert!(result.doc_changed);
        assert_eq!(result.version, 1);
        assert_eq!(doc.nodes()[0].id, id);
        assert_eq!(doc.nodes()[0].kind, NodeKind::Body(Block::paragraph("two")));
    }

    #[test]
    fn test_out_of_range_steps_ignored() {
        let mut doc = Document::new();
        let result = doc.apply(&Transaction::new().step(Step::Remove { index: 7 }));
        assert!(!result.doc_changed);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_removing_last_body_keeps_paragraph() {
        let mut doc = Document::new();
        doc.apply(&Transaction::new().step(Step::Remove { index: 0 }));
        assert_eq!(doc.body().count(), 1);
    }
}
