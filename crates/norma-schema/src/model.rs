//! # Schema Model
//!
//! A schema is a small tree of nodes. Each node is one of three shapes:
//!
//! - [`SchemaNode::Leaf`]: a full rule set ([`LeafSchema`]) naming one or
//!   more candidate types;
//! - [`SchemaNode::Object`]: shorthand for a leaf of type `object` whose
//!   `properties` is the given map;
//! - [`SchemaNode::Array`]: shorthand for a leaf of type `array` whose
//!   `element` is the given node.
//!
//! Rules that may be given either as data or as an inline function are
//! tagged variants ([`DefaultValue`], [`CheckSpec`], [`TransformSpec`]), so
//! the engine dispatches on them in exactly one place per rule.
//!
//! ## Construction
//!
//! ```
//! use norma_schema::{LeafSchema, SchemaNode};
//!
//! let schema = SchemaNode::object([
//!     ("name", LeafSchema::new("string").require().to("trim").into()),
//!     ("age", LeafSchema::new("number").check("min", 0).into()),
//!     ("tags", SchemaNode::array(LeafSchema::new("string").into())),
//! ]);
//! assert_eq!(schema.node_count(), 5);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use norma_core::{Value, Violation};

use crate::context::{
    CheckContext, CheckFn, DefaultContext, DefaultFn, TransformContext, TransformFn,
};

/// Field name → node, in declaration order.
pub type Properties = IndexMap<String, SchemaNode>;

/// Type name of the structural object handler.
pub const OBJECT: &str = "object";
/// Type name of the structural array handler.
pub const ARRAY: &str = "array";

// ─── Rule Variants ───────────────────────────────────────────────────

/// Value used when the input is absent.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Callback(DefaultFn),
}

impl DefaultValue {
    /// Produce the default for one field.
    pub fn resolve(&self, ctx: &DefaultContext<'_>) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Callback(f) => f(ctx),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => write!(f, "Literal({value})"),
            DefaultValue::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Constraint applied after type matching succeeds.
#[derive(Clone)]
pub enum CheckSpec {
    /// Registered checks by name, each with its parameter. All must pass.
    Named(IndexMap<String, Value>),
    Callback(CheckFn),
}

impl fmt::Debug for CheckSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckSpec::Named(checks) => f.debug_map().entries(checks.iter()).finish(),
            CheckSpec::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Output mutation applied after checks pass.
#[derive(Clone)]
pub enum TransformSpec {
    /// Registered transforms by name, applied left to right.
    Named(Vec<String>),
    Callback(TransformFn),
}

impl fmt::Debug for TransformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformSpec::Named(names) => f.debug_list().entries(names.iter()).finish(),
            TransformSpec::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

// ─── Leaf Schema ─────────────────────────────────────────────────────

/// The full rule set for one node.
///
/// Fields are public so hosts can build schemas however they like; the
/// builder methods are a convenience. Nothing here is checked until the
/// schema is asserted against an engine's registries.
#[derive(Debug, Clone, Default)]
pub struct LeafSchema {
    /// Candidate type names, tried in order.
    pub types: Vec<String>,
    pub require: bool,
    pub nullable: bool,
    pub default: Option<DefaultValue>,
    /// Allowed values (`enum`).
    pub allowed: Option<Vec<Value>>,
    /// Disables coercion and rejects undeclared object keys for this node.
    pub strict: bool,
    pub check: Option<CheckSpec>,
    pub to: Option<TransformSpec>,
    pub properties: Option<Properties>,
    pub element: Option<Box<SchemaNode>>,
}

impl LeafSchema {
    /// A leaf with the given comma-separated candidate type list.
    pub fn new(types: &str) -> Self {
        Self {
            types: split_list(types),
            ..Self::default()
        }
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.iter().any(|t| t == name)
    }

    /// More than one candidate type.
    pub fn is_union(&self) -> bool {
        self.types.len() > 1
    }

    /// The candidate list joined back into its declared form.
    pub fn type_list(&self) -> String {
        self.types.join(",")
    }

    pub fn require(mut self) -> Self {
        self.require = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&DefaultContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Callback(Arc::new(f)));
        self
    }

    pub fn one_of<I, V>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed = Some(allowed.into_iter().map(Into::into).collect());
        self
    }

    /// Add a named check. Replaces an inline check callback.
    pub fn check(mut self, name: &str, param: impl Into<Value>) -> Self {
        let mut checks = match self.check.take() {
            Some(CheckSpec::Named(checks)) => checks,
            _ => IndexMap::new(),
        };
        checks.insert(name.to_string(), param.into());
        self.check = Some(CheckSpec::Named(checks));
        self
    }

    pub fn check_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&CheckContext<'_>, &Value) -> Vec<Violation> + Send + Sync + 'static,
    {
        self.check = Some(CheckSpec::Callback(Arc::new(f)));
        self
    }

    /// Append named transforms (comma-separated). Replaces an inline
    /// transform callback.
    pub fn to(mut self, names: &str) -> Self {
        let mut list = match self.to.take() {
            Some(TransformSpec::Named(list)) => list,
            _ => Vec::new(),
        };
        list.extend(split_list(names));
        self.to = Some(TransformSpec::Named(list));
        self
    }

    pub fn to_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&TransformContext<'_>, Value) -> Value + Send + Sync + 'static,
    {
        self.to = Some(TransformSpec::Callback(Arc::new(f)));
        self
    }

    pub fn property(mut self, key: &str, node: SchemaNode) -> Self {
        self.properties
            .get_or_insert_with(Properties::new)
            .insert(key.to_string(), node);
        self
    }

    pub fn properties<I, K>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, SchemaNode)>,
        K: Into<String>,
    {
        self.properties = Some(properties.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }

    pub fn element(mut self, node: SchemaNode) -> Self {
        self.element = Some(Box::new(node));
        self
    }
}

/// Split a comma-joined list, trimming blanks around names.
pub(crate) fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|s| s.trim().to_string()).collect()
}

// ─── Schema Node ─────────────────────────────────────────────────────

/// One node of a schema tree.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Leaf(Arc<LeafSchema>),
    Object(Properties),
    Array(Box<SchemaNode>),
}

impl From<LeafSchema> for SchemaNode {
    fn from(leaf: LeafSchema) -> Self {
        SchemaNode::Leaf(Arc::new(leaf))
    }
}

impl SchemaNode {
    /// Object shorthand from `(field, node)` pairs.
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, SchemaNode)>,
        K: Into<String>,
    {
        SchemaNode::Object(properties.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Array shorthand.
    pub fn array(element: SchemaNode) -> Self {
        SchemaNode::Array(Box::new(element))
    }

    /// The leaf rule set this node stands for. Shorthand nodes are lowered
    /// one level; their children are left as given.
    pub fn to_leaf(&self) -> Arc<LeafSchema> {
        match self {
            SchemaNode::Leaf(leaf) => Arc::clone(leaf),
            SchemaNode::Object(properties) => Arc::new(LeafSchema {
                types: vec![OBJECT.to_string()],
                properties: Some(properties.clone()),
                ..LeafSchema::default()
            }),
            SchemaNode::Array(element) => Arc::new(LeafSchema {
                types: vec![ARRAY.to_string()],
                element: Some(element.clone()),
                ..LeafSchema::default()
            }),
        }
    }

    /// The rule set of this node without copying its children. Leaves are
    /// borrowed; shorthand nodes yield a bare leaf of the structural type.
    /// Children are reached through [`Self::properties`] and
    /// [`Self::element`].
    pub fn rules(&self) -> Cow<'_, LeafSchema> {
        match self {
            SchemaNode::Leaf(leaf) => Cow::Borrowed(leaf.as_ref()),
            SchemaNode::Object(_) => Cow::Owned(LeafSchema::new(OBJECT)),
            SchemaNode::Array(_) => Cow::Owned(LeafSchema::new(ARRAY)),
        }
    }

    /// Declared properties, in declaration order.
    pub fn properties(&self) -> Option<&Properties> {
        match self {
            SchemaNode::Leaf(leaf) => leaf.properties.as_ref(),
            SchemaNode::Object(properties) => Some(properties),
            SchemaNode::Array(_) => None,
        }
    }

    /// Declared element node.
    pub fn element(&self) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Leaf(leaf) => leaf.element.as_deref(),
            SchemaNode::Array(element) => Some(element),
            SchemaNode::Object(_) => None,
        }
    }

    /// Lower every shorthand node in the tree to its leaf form.
    pub fn normalize(self) -> SchemaNode {
        let mut leaf = match self {
            SchemaNode::Leaf(leaf) => Arc::try_unwrap(leaf).unwrap_or_else(|shared| (*shared).clone()),
            SchemaNode::Object(properties) => LeafSchema {
                types: vec![OBJECT.to_string()],
                properties: Some(properties),
                ..LeafSchema::default()
            },
            SchemaNode::Array(element) => LeafSchema {
                types: vec![ARRAY.to_string()],
                element: Some(element),
                ..LeafSchema::default()
            },
        };
        leaf.properties = leaf.properties.map(|properties| {
            properties
                .into_iter()
                .map(|(k, node)| (k, node.normalize()))
                .collect()
        });
        leaf.element = leaf.element.map(|node| Box::new(node.normalize()));
        SchemaNode::Leaf(Arc::new(leaf))
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        let children: usize = match self {
            SchemaNode::Leaf(leaf) => {
                leaf.properties
                    .iter()
                    .flat_map(|p| p.values())
                    .map(SchemaNode::node_count)
                    .sum::<usize>()
                    + leaf.element.as_ref().map_or(0, |e| e.node_count())
            }
            SchemaNode::Object(properties) => properties.values().map(SchemaNode::node_count).sum(),
            SchemaNode::Array(element) => element.node_count(),
        };
        1 + children
    }
}
