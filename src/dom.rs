//! Two-pass deserialization through an intermediate tree.
//!
//! The PARSE phase turns the token stream into a [`DomNode`] tree, checking structure only.
//! The BUILD phase walks the tree against a [`TypeDescriptor`], constructing composites,
//! resolving field names and coercing scalar text. The tree knows nothing about the target
//! type, so the same tree can be built into different types.
//!
//! ```rust
//! use schema_json::source::StrSource;
//! use schema_json::{DomDeserializer, DomNode, Schema, Value};
//!
//! let dom = DomDeserializer::new();
//! let tree = dom.parse(StrSource::new("[[1,2],[3]]")).unwrap();
//! assert!(matches!(tree, DomNode::Array { .. }));
//!
//! let value = dom.build(&tree, &Vec::<Vec<u8>>::descriptor()).unwrap();
//! assert_eq!(value.and_then(|v| v.as_array().map(Vec::len)), Some(2));
//! ```

use crate::coerce::coerce;
use crate::de::{self, Deserializer};
use crate::lexer::{Token, Tokenizer, DEFAULT_MAX_DEPTH};
use crate::schema::{CompositeDescriptor, TypeDescriptor, TypeKind};
use crate::source::CharSource;
use crate::{Error, Result, Value};

/// A node of the document tree.
///
/// `name` is the member key for object members and empty for the root and for array
/// elements. Only scalar nodes carry text; it is kept exactly as the tokenizer produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Object { name: String, children: Vec<DomNode> },
    Array { name: String, elements: Vec<DomNode> },
    Scalar { name: String, raw: String },
}

impl DomNode {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            DomNode::Object { name, .. }
            | DomNode::Array { name, .. }
            | DomNode::Scalar { name, .. } => name,
        }
    }

    /// Member or element nodes; empty for scalars.
    #[must_use]
    pub fn children(&self) -> &[DomNode] {
        match self {
            DomNode::Object { children, .. } => children,
            DomNode::Array { elements, .. } => elements,
            DomNode::Scalar { .. } => &[],
        }
    }

    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        match self {
            DomNode::Scalar { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, this one included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(DomNode::node_count).sum::<usize>()
    }

    const fn kind(&self) -> &'static str {
        match self {
            DomNode::Object { .. } => "object",
            DomNode::Array { .. } => "array",
            DomNode::Scalar { .. } => "scalar",
        }
    }
}

/// The tree-building deserializer.
///
/// Objects and arrays may nest up to [`DEFAULT_MAX_DEPTH`] levels unless another limit is
/// set with [`DomDeserializer::with_max_depth`].
#[derive(Debug, Clone, Copy)]
pub struct DomDeserializer {
    max_depth: usize,
}

impl Default for DomDeserializer {
    fn default() -> Self {
        DomDeserializer {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DomDeserializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// PARSE: reads a whole document into a tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSyntax`] for structural defects such as an unterminated
    /// object or array, and [`Error::Io`] when the source fails.
    pub fn parse<S: CharSource>(&self, source: S) -> Result<DomNode> {
        let mut tokenizer = Tokenizer::with_max_depth(source, self.max_depth);
        let first = de::document_start(&mut tokenizer)?;
        let root = parse_node(&mut tokenizer, first, String::new())?;
        de::document_end(&mut tokenizer)?;
        log::trace!("parsed document tree of {} nodes", root.node_count());
        Ok(root)
    }

    /// BUILD: materializes a tree against a target type.
    ///
    /// Returns `Ok(None)` when the target is a collection or map, which is left unset.
    ///
    /// # Errors
    ///
    /// Returns the value, construction and field errors described on
    /// [`Deserializer::deserialize_value`].
    pub fn build(&self, node: &DomNode, target: &TypeDescriptor) -> Result<Option<Value>> {
        build_node(node, target)
    }
}

impl Deserializer for DomDeserializer {
    fn deserialize_value<S: CharSource>(
        &mut self,
        source: S,
        target: &TypeDescriptor,
    ) -> Result<Value> {
        de::check_root(target)?;
        let tree = self.parse(source)?;
        self.build(&tree, target)?
            .ok_or_else(|| de::absent_root(target))
    }
}

fn parse_node<S: CharSource>(
    tokenizer: &mut Tokenizer<S>,
    token: Token,
    name: String,
) -> Result<DomNode> {
    match token {
        Token::OpenObject => {
            let mut children = Vec::new();
            while let Some(field) = de::next_member(tokenizer)? {
                let value = de::next_value(tokenizer, &field)?;
                children.push(parse_node(tokenizer, value, field)?);
            }
            Ok(DomNode::Object { name, children })
        }
        Token::OpenArray => {
            let mut elements = Vec::new();
            while let Some(element) = de::next_element(tokenizer)? {
                elements.push(parse_node(tokenizer, element, String::new())?);
            }
            Ok(DomNode::Array { name, elements })
        }
        Token::QuotedText(raw) | Token::RawFragment(raw) => Ok(DomNode::Scalar { name, raw }),
        other => Err(Error::syntax(&format!("value expected, found {}", other))),
    }
}

fn build_node(node: &DomNode, target: &TypeDescriptor) -> Result<Option<Value>> {
    match (node, target.kind()) {
        (DomNode::Scalar { raw, .. }, _) => coerce(raw, target),
        (_, TypeKind::Unsupported(_)) => Ok(None),
        (DomNode::Object { children, .. }, TypeKind::Composite(composite)) => {
            build_object(children, composite).map(Some)
        }
        (DomNode::Array { elements, .. }, TypeKind::Array(element)) => {
            let values = elements
                .iter()
                .map(|node| build_node(node, element))
                .collect::<Result<Vec<_>>>()?;
            Ok(values.into_iter().collect::<Option<Vec<_>>>().map(Value::Array))
        }
        (node, _) => Err(de::mismatch(target, node.kind())),
    }
}

fn build_object(children: &[DomNode], composite: &CompositeDescriptor) -> Result<Value> {
    let mut record = composite.instantiate()?;
    for child in children {
        let field = composite.resolve(child.name())?;
        let value = build_node(child, field.ty())?;
        de::assign(&mut record, composite, field, value)?;
    }
    Ok(Value::Object(record))
}
