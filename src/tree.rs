//! The addressable data tree.
//!
//! A tree is assembled from an input graph in one depth-first, pre-order
//! pass. Assembly finishes (and every input error is detected) before
//! anything reaches a sink; the finished tree is then replayed onto the
//! sink node by node and rendered there.

use crate::address::PathAddress;
use crate::error::TreeError;
use crate::node::{ScalarValue, TreeNode, Value};
use crate::sink::{SessionHandle, SinkOp, TreeSink};
use crate::warehouse::Warehouse;
use std::collections::HashMap;
use std::num::NonZeroI32;
use tracing::{debug, info};

/// Deepest address, in segments, a built tree may hold. Canonical text
/// nests one YAML level per segment under the document mapping, and
/// serde_yaml stops re-parsing past 128 levels.
pub const MAX_DEPTH: usize = 127;

#[derive(Debug, Clone)]
struct Slot {
    node: TreeNode,
    children: Vec<usize>,
}

/// An immutable tree of typed nodes keyed by [`PathAddress`].
///
/// Nodes are kept in creation order, which is the pre-order of the input
/// graph: map entries in insertion order, sequence items by position.
#[derive(Debug, Clone)]
pub struct DataTree {
    name: String,
    slots: Vec<Slot>,
    index: HashMap<PathAddress, usize>,
}

fn sink_error(operation: SinkOp, address: &str, code: NonZeroI32) -> TreeError {
    TreeError::Sink {
        operation,
        address: address.to_string(),
        code: code.get(),
    }
}

impl DataTree {
    /// Builds a tree named `name` from `graph`, which must be a map.
    pub fn build(name: &str, graph: &Value) -> Result<Self, TreeError> {
        let mut warehouse = Warehouse::new();
        let (tree, _) = Self::build_into(name, graph, &mut warehouse)?;
        Ok(tree)
    }

    /// Builds a tree and replays it onto `sink`, returning the session the
    /// sink allocated for it.
    pub fn build_into<S: TreeSink + ?Sized>(
        name: &str,
        graph: &Value,
        sink: &mut S,
    ) -> Result<(Self, SessionHandle), TreeError> {
        let tree = Self::assemble(name, graph)?;
        let handle = tree.emit(sink)?;
        info!(root = name, nodes = tree.len(), session = %handle, "data tree built");
        Ok((tree, handle))
    }

    fn assemble(name: &str, graph: &Value) -> Result<Self, TreeError> {
        let Value::Map(entries) = graph else {
            return Err(TreeError::RootNotMap(graph.type_name()));
        };
        let mut tree = Self::with_root(name)?;
        for (key, value) in entries {
            tree.visit(0, key, value)?;
        }
        Ok(tree)
    }

    fn visit(&mut self, parent: usize, name: &str, value: &Value) -> Result<(), TreeError> {
        let address = self.slots[parent].node.address().child(name)?;
        if address.depth() > MAX_DEPTH {
            return Err(TreeError::TooDeep {
                address: address.to_string(),
                limit: MAX_DEPTH,
            });
        }
        match value {
            Value::List(items) => {
                let id = self.attach(parent, TreeNode::sequence(address))?;
                for (position, item) in items.iter().enumerate() {
                    self.visit(id, &position.to_string(), item)?;
                }
            }
            Value::Map(entries) => {
                let id = self.attach(parent, TreeNode::map(address))?;
                for (key, item) in entries {
                    self.visit(id, key, item)?;
                }
            }
            other => {
                let scalar =
                    ScalarValue::from_value(other).ok_or_else(|| TreeError::UnsupportedType {
                        address: address.to_string(),
                        type_name: other.type_name().to_string(),
                    })?;
                self.attach(parent, TreeNode::scalar(address, scalar))?;
            }
        }
        Ok(())
    }

    /// A tree holding only its root map.
    pub(crate) fn with_root(name: &str) -> Result<Self, TreeError> {
        let root = PathAddress::root(name)?;
        let mut index = HashMap::new();
        index.insert(root.clone(), 0);
        Ok(Self {
            name: name.to_string(),
            slots: vec![Slot {
                node: TreeNode::map(root),
                children: Vec::new(),
            }],
            index,
        })
    }

    /// Appends `node` as the last child of the slot `parent`.
    pub(crate) fn attach(&mut self, parent: usize, node: TreeNode) -> Result<usize, TreeError> {
        if self.index.contains_key(node.address()) {
            return Err(TreeError::DuplicateAddress(node.address().to_string()));
        }
        let id = self.slots.len();
        self.index.insert(node.address().clone(), id);
        self.slots.push(Slot {
            node,
            children: Vec::new(),
        });
        self.slots[parent].children.push(id);
        Ok(id)
    }

    /// Replays every node onto `sink` in creation order, then renders.
    pub fn emit<S: TreeSink + ?Sized>(&self, sink: &mut S) -> Result<SessionHandle, TreeError> {
        let handle = sink
            .create_session(&self.name)
            .map_err(|code| sink_error(SinkOp::CreateSession, &self.name, code))?;

        for node in self.iter().skip(1) {
            let address = node.address().to_string();
            let parent = node
                .address()
                .parent()
                .map(|p| p.to_string())
                .unwrap_or_default();
            debug!(%address, kind = %node.kind(), "emitting node");

            sink.add_sub_tree(handle, &parent, node.name())
                .map_err(|code| sink_error(SinkOp::AddSubTree, &address, code))?;
            sink.set_kind(handle, &address, node.kind())
                .map_err(|code| sink_error(SinkOp::SetKind, &address, code))?;

            if let Some(value) = node.value() {
                let (operation, status) = match value {
                    ScalarValue::Int(v) => {
                        (SinkOp::SetIntValue, sink.set_int_value(handle, &address, *v))
                    }
                    ScalarValue::Real(v) => {
                        (SinkOp::SetRealValue, sink.set_real_value(handle, &address, *v))
                    }
                    ScalarValue::Bool(v) => {
                        (SinkOp::SetBoolValue, sink.set_bool_value(handle, &address, *v))
                    }
                    ScalarValue::Str(v) => {
                        (SinkOp::SetStringValue, sink.set_string_value(handle, &address, v))
                    }
                };
                status.map_err(|code| sink_error(operation, &address, code))?;
            }
        }

        let root = self.root().address().to_string();
        sink.render(handle)
            .map_err(|code| sink_error(SinkOp::Render, &root, code))?;
        Ok(handle)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &TreeNode {
        &self.slots[0].node
    }

    pub fn get(&self, address: &PathAddress) -> Option<&TreeNode> {
        self.index.get(address).map(|&id| &self.slots[id].node)
    }

    /// Looks a node up by its textual address; the trailing `/` is optional.
    pub fn lookup(&self, path: &str) -> Option<&TreeNode> {
        let address: PathAddress = path.parse().ok()?;
        self.get(&address)
    }

    /// Direct children of `address`, in creation order.
    pub fn children<'a>(
        &'a self,
        address: &PathAddress,
    ) -> impl Iterator<Item = &'a TreeNode> + use<'a> {
        let ids: &'a [usize] = match self.index.get(address) {
            Some(&id) => &self.slots[id].children,
            None => &[],
        };
        ids.iter().map(move |&id| &self.slots[id].node)
    }

    /// All nodes in pre-order, root first.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.slots.iter().map(|slot| &slot.node)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
