//! Block-level content

/// The kind of block element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockKind {
    /// Regular paragraph
    #[default]
    Paragraph,
    /// Heading with level (1-6)
    Heading { level: u8 },
    /// List item
    ListItem,
}

impl BlockKind {
    /// Block kind for a container child tag, if it is a block element
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "p" => Some(BlockKind::Paragraph),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse().ok()?;
                Some(BlockKind::Heading { level })
            }
            "li" => Some(BlockKind::ListItem),
            _ => None,
        }
    }

    /// Tag this block serializes to
    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "p",
            BlockKind::Heading { level } => match level {
                1 => "h1",
                2 => "h2",
                3 => "h3",
                4 => "h4",
                5 => "h5",
                _ => "h6",
            },
            BlockKind::ListItem => "li",
        }
    }
}

/// A block of flowing text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

impl Block {
    /// Create a new paragraph block
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            text: text.into(),
        }
    }
}
