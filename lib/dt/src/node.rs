use crate::prop::Property;
use alloc::{boxed::Box, string::String, vec, vec::Vec};

/// Mutable device tree, nodes held in an arena and addressed by id.
///
/// Nodes are only ever added; the boot sequence patches the tree in place
/// and hands it over whole, node teardown belongs to whoever owns the tree
/// afterwards.
pub struct DeviceTree {
    pub root_id: usize,
    pub container: Vec<Node>,
}

pub struct Node {
    pub node_id: usize,
    pub parent_id: usize,
    pub full_name: Box<str>,
    pub node_name: Box<str>,
    pub unit_addr: Box<str>,
    pub children: Vec<usize>,
    pub props: Vec<Property>,
}

impl Node {
    pub fn get_property(&self, name: impl AsRef<str>) -> Option<&Property> {
        let name = name.as_ref();
        self.props.iter().find(|prop| prop.name.as_ref().eq(name))
    }

    /// Attach a property, replacing any existing property with the same
    /// name. A node never carries two properties of one name.
    pub fn set_property(&mut self, prop: Property) {
        match self.props.iter_mut().find(|p| p.name == prop.name) {
            Some(existing) => *existing = prop,
            None => self.props.push(prop),
        }
    }

    /// Remove a property by name. Returns whether it was present.
    pub fn remove_property(&mut self, name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        let before = self.props.len();
        self.props.retain(|prop| !prop.name.as_ref().eq(name));
        self.props.len() != before
    }

    /// Whether the node's `compatible` string list contains `compat`.
    pub fn is_compatible(&self, compat: impl AsRef<str>) -> bool {
        let compat = compat.as_ref();
        match self.get_property("compatible") {
            Some(prop) => match prop.value_as_strlist() {
                Ok(list) => list.contains(&compat),
                Err(_) => false,
            },
            None => false,
        }
    }
}

impl DeviceTree {
    pub fn new(root_name: impl AsRef<str>) -> DeviceTree {
        let root = Self::build_node(0, 0, root_name.as_ref());
        DeviceTree {
            root_id: 0,
            container: vec![root],
        }
    }

    fn build_node(node_id: usize, parent_id: usize, name: &str) -> Node {
        let (node_name, unit_addr) = match name.split_once('@') {
            Some((node_name, unit_addr)) => (node_name, unit_addr),
            None => (name, ""),
        };
        Node {
            node_id,
            parent_id,
            full_name: String::from(name).into_boxed_str(),
            node_name: String::from(node_name).into_boxed_str(),
            unit_addr: String::from(unit_addr).into_boxed_str(),
            children: vec![],
            props: vec![],
        }
    }

    pub fn node(&self, node_id: usize) -> &Node {
        &self.container[node_id]
    }

    pub fn node_mut(&mut self, node_id: usize) -> &mut Node {
        &mut self.container[node_id]
    }

    pub fn is_root(&self, node: &Node) -> bool {
        self.get_parent(node).node_id == node.node_id
    }

    pub fn get_parent(&self, node: &Node) -> &Node {
        &self.container[node.parent_id]
    }

    pub fn get_children<'b>(&'b self, node: &Node) -> impl Iterator<Item = &'b Node> {
        node.children.iter().map(|x| &self.container[*x])
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    fn full_path(&self, node: &Node) -> String {
        if self.is_root(node) {
            String::from("")
        } else {
            self.full_path(self.get_parent(node)) + "/" + node.full_name.as_ref()
        }
    }

    pub fn get_full_path(&self, node: &Node) -> Box<str> {
        self.full_path(node).into_boxed_str()
    }

    /// Create a new node under `parent_id` and return its id.
    pub fn new_child(&mut self, parent_id: usize, name: impl AsRef<str>) -> usize {
        let node_id = self.container.len();
        let node = Self::build_node(node_id, parent_id, name.as_ref());
        self.container.push(node);
        self.container[parent_id].children.push(node_id);
        node_id
    }

    /// Direct child of `parent_id` with the given full name (`i2cm@a1000`).
    pub fn find_child(&self, parent_id: usize, full_name: impl AsRef<str>) -> Option<usize> {
        let full_name = full_name.as_ref();
        self.container[parent_id]
            .children
            .iter()
            .copied()
            .find(|&id| self.container[id].full_name.as_ref().eq(full_name))
    }

    /// Every node whose `compatible` list contains `compat`, in depth-first
    /// order starting at the root.
    ///
    /// The match set is snapshotted before it is returned, so callers may
    /// freely create nodes while walking it.
    pub fn find_compatible(&self, compat: impl AsRef<str>) -> Vec<usize> {
        let compat = compat.as_ref();
        let mut res = vec![];
        let mut stack = vec![self.root_id];
        while let Some(node_id) = stack.pop() {
            let node = &self.container[node_id];
            if node.is_compatible(compat) {
                res.push(node_id);
            }
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
        }
        res
    }

    /// Look a node up by absolute path, `/xscom@0/i2cm@a1000`.
    pub fn get_node(&self, path: impl AsRef<str>) -> Option<&Node> {
        let path_str = path.as_ref();
        let mut node = &self.container[self.root_id];
        for section in path_str.split('/') {
            if section.trim().is_empty() {
                continue;
            }
            let mut found = false;
            for subnode in self.get_children(node) {
                if subnode.full_name.as_ref().eq(section) {
                    node = subnode;
                    found = true;
                    break;
                }
            }
            if !found {
                return None;
            }
        }
        Some(node)
    }
}
