//! Core node types.

use std::fmt;

use crate::component::Component;
use crate::geometry::RectTransform;

/// Unique identifier for a node.
///
/// Ids are allocated from a monotonic counter and never reused, so an id
/// that outlives its node stops resolving instead of aliasing a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Creates a new node ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node state flags (bitfield).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFlags(u32);

impl NodeFlags {
    /// Node is active itself (its ancestors may still be inactive).
    pub const ACTIVE: u32 = 1 << 0;
    /// Node is the root of a control built by the injection engine.
    pub const CONTROL: u32 = 1 << 1;

    /// Default flags for a new node.
    pub const DEFAULT: Self = Self(Self::ACTIVE);

    /// Creates new flags with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Sets or clears a flag.
    #[inline]
    pub fn assign(&mut self, flag: u32, on: bool) {
        if on {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A single node of the host tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// State flags.
    pub flags: NodeFlags,
    /// Geometry relative to the parent.
    pub rect: RectTransform,
    pub(crate) components: Vec<Component>,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            flags: NodeFlags::DEFAULT,
            rect: RectTransform::default(),
            components: Vec::new(),
        }
    }

    /// Node identifier.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent node (None for roots).
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered children.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Attached components.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Returns true if the node itself is active.
    #[inline]
    #[must_use]
    pub const fn is_active_self(&self) -> bool {
        self.flags.has(NodeFlags::ACTIVE)
    }
}
