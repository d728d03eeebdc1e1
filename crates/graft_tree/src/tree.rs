//! Node arena for the host hierarchy.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use graft_shared::Vec2;
use parking_lot::Mutex;

use crate::component::{Component, ComponentType};
use crate::geometry::{Rect, RectTransform};
use crate::node::{Node, NodeFlags, NodeId};

/// A tree shared between the host driver and the injection engine.
pub type SharedTree = Arc<Mutex<UiTree>>;

/// Manages the host node hierarchy.
pub struct UiTree {
    /// Nodes indexed by ID.
    nodes: HashMap<NodeId, Node>,
    /// Root node IDs, in creation order.
    roots: Vec<NodeId>,
    /// ID counter for generating unique IDs.
    next_id: u64,
}

impl UiTree {
    /// Creates a new empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::with_capacity(256),
            roots: Vec::with_capacity(16),
            next_id: 1,
        }
    }

    /// Wraps the tree for shared ownership.
    #[must_use]
    pub fn into_shared(self) -> SharedTree {
        Arc::new(Mutex::new(self))
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    // =========================================================================
    // STRUCTURE
    // =========================================================================

    /// Creates a root node of the given size.
    pub fn create_root(&mut self, name: impl Into<String>, size: Vec2) -> NodeId {
        let id = self.alloc_id();
        let mut node = Node::new(id, name);
        node.rect = RectTransform::sized(size);
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Appends a new child with a default transform.
    ///
    /// Returns `None` if the parent does not exist.
    pub fn create_child(&mut self, parent: NodeId, name: impl Into<String>) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.alloc_id();
        let mut node = Node::new(id, name);
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        self.nodes.get_mut(&parent)?.children.push(id);
        Some(id)
    }

    /// Returns true if the node is alive.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Gets a node by ID.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Gets mutable access to a node.
    #[must_use]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Node name.
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(Node::name)
    }

    /// Renames a node.
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> bool {
        self.nodes
            .get_mut(&id)
            .map(|node| node.name = name.into())
            .is_some()
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(Node::parent)
    }

    /// Returns the children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |node| node.children.as_slice())
    }

    /// Returns all root nodes.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Walks up to the top-most ancestor.
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.nodes.get(&id)?;
        while let Some(parent) = current.parent.and_then(|p| self.nodes.get(&p)) {
            current = parent;
        }
        Some(current.id)
    }

    /// Returns true if `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Finds a direct child by name.
    #[must_use]
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.name(child) == Some(name))
    }

    /// Follows a `/`-separated path of child names.
    ///
    /// Empty segments are skipped, so `""` resolves to `from` itself.
    #[must_use]
    pub fn find_path(&self, from: NodeId, path: &str) -> Option<NodeId> {
        if !self.contains(from) {
            return None;
        }
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(from, |node, segment| self.find_child(node, segment))
    }

    /// Breadth-first search for a node named `name`, `from` included.
    #[must_use]
    pub fn find_descendant(&self, from: NodeId, name: &str) -> Option<NodeId> {
        if !self.contains(from) {
            return None;
        }
        let mut queue = VecDeque::from([from]);
        while let Some(id) = queue.pop_front() {
            if self.name(id) == Some(name) {
                return Some(id);
            }
            queue.extend(self.children(id).iter().copied());
        }
        None
    }

    /// Moves a node under a new parent, keeping its local transform.
    ///
    /// Fails (returns false) for dead nodes or if the move would create a
    /// cycle.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> bool {
        if !self.contains(id) || !self.contains(new_parent) || self.is_ancestor_or_self(id, new_parent)
        {
            return false;
        }
        if self.parent(id) == Some(new_parent) {
            return true;
        }
        self.detach(id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(new_parent);
        }
        if let Some(parent) = self.nodes.get_mut(&new_parent) {
            parent.children.push(id);
        }
        true
    }

    /// Moves a node to the end of its parent's children.
    pub fn set_last_sibling(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let Some(node) = self.nodes.get_mut(&parent) else {
            return false;
        };
        node.children.retain(|&child| child != id);
        node.children.push(id);
        true
    }

    fn detach(&mut self, id: NodeId) {
        match self.parent(id) {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(&parent) {
                    node.children.retain(|&child| child != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }
    }

    /// Deep-clones `template` (transform, flags, components, children) and
    /// appends the copy under `parent`.
    pub fn instantiate(&mut self, template: NodeId, parent: NodeId) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let order: Vec<NodeId> = self.descendants(template).collect();
        let mut mapping: HashMap<NodeId, NodeId> = HashMap::with_capacity(order.len());

        for source in order {
            let original = self.nodes.get(&source)?.clone();
            let target_parent = if source == template {
                parent
            } else {
                *mapping.get(&original.parent?)?
            };

            let id = self.alloc_id();
            let copy = Node {
                id,
                name: original.name,
                parent: Some(target_parent),
                children: Vec::new(),
                flags: original.flags,
                rect: original.rect,
                components: original.components,
            };
            self.nodes.insert(id, copy);
            self.nodes.get_mut(&target_parent)?.children.push(id);
            mapping.insert(source, id);
        }

        mapping.get(&template).copied()
    }

    /// Clones only the node itself: name, transform and flags. No children,
    /// no components.
    pub fn instantiate_shallow(
        &mut self,
        template: NodeId,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Option<NodeId> {
        let (flags, rect) = {
            let source = self.nodes.get(&template)?;
            (source.flags, source.rect)
        };
        let id = self.create_child(parent, name)?;
        let node = self.nodes.get_mut(&id)?;
        node.flags = flags;
        node.flags.clear(NodeFlags::CONTROL);
        node.rect = rect;
        Some(id)
    }

    /// Removes a node and all its children.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.detach(id);
        let doomed: Vec<NodeId> = self.descendants(id).collect();
        for node in doomed {
            self.nodes.remove(&node);
        }
        true
    }

    /// Pre-order traversal of `from` and everything below it.
    pub fn descendants(&self, from: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        NodeDfsIterator {
            tree: self,
            stack: if self.contains(from) { vec![from] } else { Vec::new() },
        }
    }

    /// Returns all node IDs in depth-first order.
    pub fn iter_dfs(&self) -> impl Iterator<Item = NodeId> + '_ {
        NodeDfsIterator {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    // =========================================================================
    // STATE
    // =========================================================================

    /// Activates or deactivates a node.
    pub fn set_active(&mut self, id: NodeId, active: bool) -> bool {
        self.nodes
            .get_mut(&id)
            .map(|node| node.flags.assign(NodeFlags::ACTIVE, active))
            .is_some()
    }

    /// Returns true if the node itself is active.
    #[must_use]
    pub fn is_active_self(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(Node::is_active_self)
    }

    /// Returns true if the node and all its ancestors are active.
    #[must_use]
    pub fn is_active_in_hierarchy(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.nodes.get(&current) {
                Some(node) if node.is_active_self() => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Sets or clears a flag.
    pub fn set_flag(&mut self, id: NodeId, flag: u32, on: bool) -> bool {
        self.nodes
            .get_mut(&id)
            .map(|node| node.flags.assign(flag, on))
            .is_some()
    }

    /// Returns true if the flag is set.
    #[must_use]
    pub fn has_flag(&self, id: NodeId, flag: u32) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.flags.has(flag))
    }

    // =========================================================================
    // GEOMETRY
    // =========================================================================

    /// Local transform of a node.
    #[must_use]
    pub fn rect(&self, id: NodeId) -> Option<&RectTransform> {
        self.nodes.get(&id).map(|node| &node.rect)
    }

    /// Mutable local transform of a node.
    #[must_use]
    pub fn rect_mut(&mut self, id: NodeId) -> Option<&mut RectTransform> {
        self.nodes.get_mut(&id).map(|node| &mut node.rect)
    }

    /// Resolved rectangle of a node in tree space.
    #[must_use]
    pub fn world_rect(&self, id: NodeId) -> Option<Rect> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.nodes.get(&current)?;
            chain.push(&node.rect);
            cursor = node.parent;
        }

        let mut transforms = chain.into_iter().rev();
        let mut rect = transforms.next()?.resolve_root();
        for transform in transforms {
            rect = transform.resolve(rect);
        }
        Some(rect)
    }

    /// Rectangle of `id` expressed relative to the bottom-left corner of
    /// `space`.
    #[must_use]
    pub fn rect_in_space_of(&self, id: NodeId, space: NodeId) -> Option<Rect> {
        let target = self.world_rect(id)?;
        let origin = self.world_rect(space)?;
        Some(Rect::new(
            target.x - origin.x,
            target.y - origin.y,
            target.width,
            target.height,
        ))
    }

    // =========================================================================
    // COMPONENTS
    // =========================================================================

    /// Components attached to a node.
    #[must_use]
    pub fn components(&self, id: NodeId) -> &[Component] {
        self.nodes
            .get(&id)
            .map_or(&[], |node| node.components.as_slice())
    }

    /// Mutable component list of a node.
    #[must_use]
    pub fn components_mut(&mut self, id: NodeId) -> Option<&mut Vec<Component>> {
        self.nodes.get_mut(&id).map(|node| &mut node.components)
    }

    /// First component of type `T` on the node.
    #[must_use]
    pub fn get<T: ComponentType>(&self, id: NodeId) -> Option<&T> {
        self.components(id).iter().find_map(T::from_component)
    }

    /// Mutable first component of type `T` on the node.
    #[must_use]
    pub fn get_mut<T: ComponentType>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes
            .get_mut(&id)?
            .components
            .iter_mut()
            .find_map(T::from_component_mut)
    }

    /// Returns true if the node carries a `T`.
    #[must_use]
    pub fn has<T: ComponentType>(&self, id: NodeId) -> bool {
        self.get::<T>(id).is_some()
    }

    /// Attaches `value`, replacing an existing component of the same type.
    pub fn insert<T: ComponentType>(&mut self, id: NodeId, value: T) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if let Some(existing) = node.components.iter_mut().find_map(T::from_component_mut) {
            *existing = value;
        } else {
            node.components.push(value.into_component());
        }
        true
    }

    /// Attaches an untyped component, replacing one of the same kind.
    pub fn insert_component(&mut self, id: NodeId, component: Component) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let kind = std::mem::discriminant(&component);
        if let Some(existing) = node
            .components
            .iter_mut()
            .find(|existing| std::mem::discriminant(&**existing) == kind)
        {
            *existing = component;
        } else {
            node.components.push(component);
        }
        true
    }

    /// Returns the node's `T`, attaching `init()` first if it has none.
    pub fn get_or_insert_with<T: ComponentType>(
        &mut self,
        id: NodeId,
        init: impl FnOnce() -> T,
    ) -> Option<&mut T> {
        let node = self.nodes.get_mut(&id)?;
        let position = node
            .components
            .iter()
            .position(|component| T::from_component(component).is_some());
        let index = if let Some(index) = position {
            index
        } else {
            node.components.push(init().into_component());
            node.components.len() - 1
        };
        node.components.get_mut(index).and_then(T::from_component_mut)
    }

    /// Detaches and returns the node's `T`.
    pub fn remove<T: ComponentType>(&mut self, id: NodeId) -> Option<T> {
        let node = self.nodes.get_mut(&id)?;
        let index = node
            .components
            .iter()
            .position(|component| T::from_component(component).is_some())?;
        T::take(node.components.remove(index))
    }

    /// First node carrying a `T` in pre-order, starting with `id` itself.
    /// Inactive nodes are included.
    #[must_use]
    pub fn find_in_children<T: ComponentType>(&self, id: NodeId) -> Option<NodeId> {
        self.descendants(id).find(|&node| self.has::<T>(node))
    }

    /// First node carrying a `T` walking up from `id` itself.
    #[must_use]
    pub fn find_in_parents<T: ComponentType>(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if !self.contains(current) {
                return None;
            }
            if self.has::<T>(current) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }
}

impl Default for UiTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first iterator over the tree.
struct NodeDfsIterator<'a> {
    tree: &'a UiTree,
    stack: Vec<NodeId>,
}

impl Iterator for NodeDfsIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        // Push children in reverse order so they're processed left-to-right
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{GridLayout, Text};

    fn sample() -> (UiTree, NodeId, NodeId, NodeId) {
        let mut tree = UiTree::new();
        let root = tree.create_root("Canvas", Vec2::new(800.0, 600.0));
        let window = tree.create_child(root, "Window").unwrap();
        let content = tree.create_child(window, "Content").unwrap();
        (tree, root, window, content)
    }

    #[test]
    fn test_tree_hierarchy() {
        let (tree, root, window, content) = sample();

        assert_eq!(tree.children(root), &[window]);
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.root_of(content), Some(root));
        assert_eq!(tree.find_path(root, "Window/Content"), Some(content));
        assert_eq!(tree.find_path(root, "Window/Missing"), None);
        assert_eq!(tree.find_descendant(root, "Content"), Some(content));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let (mut tree, root, window, _) = sample();
        assert!(tree.destroy(window));
        let fresh = tree.create_child(root, "Window").unwrap();

        assert_ne!(fresh, window);
        assert!(!tree.contains(window));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let (mut tree, root, window, content) = sample();

        assert!(!tree.reparent(window, content));
        assert!(tree.reparent(content, root));
        assert_eq!(tree.children(root), &[window, content]);
        assert!(tree.children(window).is_empty());
    }

    #[test]
    fn test_instantiate_is_deep() {
        let (mut tree, root, window, content) = sample();
        tree.insert(content, Text::new("hello"));
        tree.create_child(content, "Leaf").unwrap();

        let copy = tree.instantiate(window, root).unwrap();
        let copy_content = tree.find_path(copy, "Content").unwrap();

        assert_ne!(copy_content, content);
        assert_eq!(tree.get::<Text>(copy_content).unwrap().text, "hello");
        assert!(tree.find_child(copy_content, "Leaf").is_some());
        assert_eq!(tree.children(root), &[window, copy]);
    }

    #[test]
    fn test_instantiate_shallow_drops_children_and_components() {
        let (mut tree, root, window, _) = sample();
        tree.insert(window, GridLayout::default());

        let copy = tree.instantiate_shallow(window, root, "Clone").unwrap();
        assert!(tree.children(copy).is_empty());
        assert!(tree.components(copy).is_empty());
        assert_eq!(tree.rect(copy), tree.rect(window));
    }

    #[test]
    fn test_component_insert_replaces() {
        let (mut tree, _, _, content) = sample();
        tree.insert(content, Text::new("a"));
        tree.insert(content, Text::new("b"));

        assert_eq!(tree.components(content).len(), 1);
        assert_eq!(tree.remove::<Text>(content).unwrap().text, "b");
        assert!(!tree.has::<Text>(content));
    }

    #[test]
    fn test_find_in_children_includes_inactive() {
        let (mut tree, root, window, content) = sample();
        tree.insert(content, Text::new("deep"));
        tree.set_active(window, false);

        assert_eq!(tree.find_in_children::<Text>(root), Some(content));
        assert!(!tree.is_active_in_hierarchy(content));
        assert!(tree.is_active_self(content));
        assert_eq!(tree.find_in_parents::<Text>(content), Some(content));
    }

    #[test]
    fn test_world_rect_follows_parents() {
        let (mut tree, _, window, content) = sample();
        *tree.rect_mut(window).unwrap() = RectTransform::fill();
        *tree.rect_mut(content).unwrap() = RectTransform::top_strip(-100.0, 50.0);

        let rect = tree.world_rect(content).unwrap();
        assert_eq!(rect, Rect::new(0.0, 450.0, 800.0, 50.0));
    }

    #[test]
    fn test_dfs_order() {
        let (mut tree, root, window, content) = sample();
        let side = tree.create_child(root, "Side").unwrap();

        let order: Vec<_> = tree.iter_dfs().collect();
        assert_eq!(order, vec![root, window, content, side]);
    }
}
