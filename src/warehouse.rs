//! In-memory [`TreeSink`] holding any number of trees.
//!
//! Each session owns one tree whose root is a map. Nodes are registered
//! with `add_sub_tree`, typed once with `set_kind` and, for scalars, given
//! exactly one value. Rule violations are reported with the fault codes
//! below.

use crate::address::PathAddress;
use crate::node::{NodeKind, ScalarValue, TreeNode};
use crate::sink::{SessionHandle, SinkResult, TreeSink};
use crate::tree::DataTree;
use std::collections::HashMap;
use std::num::NonZeroI32;
use tracing::{debug, info};

const fn fault(code: i32) -> NonZeroI32 {
    match NonZeroI32::new(code) {
        Some(code) => code,
        None => panic!("fault codes are nonzero"),
    }
}

pub const UNKNOWN_SESSION: NonZeroI32 = fault(1);
pub const MALFORMED_ADDRESS: NonZeroI32 = fault(2);
pub const ADDRESS_NOT_FOUND: NonZeroI32 = fault(3);
/// Child added under a scalar or a node with no kind yet.
pub const NOT_COMPOSITE: NonZeroI32 = fault(4);
/// Sequence child not named by the next position.
pub const SEQUENCE_INDEX: NonZeroI32 = fault(5);
pub const DUPLICATE_ADDRESS: NonZeroI32 = fault(6);
pub const KIND_ALREADY_SET: NonZeroI32 = fault(7);
pub const NOT_SCALAR: NonZeroI32 = fault(8);
pub const VALUE_ALREADY_SET: NonZeroI32 = fault(9);
/// Render found a node without a kind, or a scalar without a value.
pub const INCOMPLETE_NODE: NonZeroI32 = fault(10);

#[derive(Debug)]
struct Pending {
    address: PathAddress,
    parent: Option<usize>,
    kind: Option<NodeKind>,
    value: Option<ScalarValue>,
    children: usize,
}

#[derive(Debug)]
struct Session {
    name: String,
    nodes: Vec<Pending>,
    index: HashMap<PathAddress, usize>,
    rendered: Option<String>,
}

impl Session {
    fn find(&self, address: &str) -> SinkResult<usize> {
        let address: PathAddress = address.parse().map_err(|_| MALFORMED_ADDRESS)?;
        self.index.get(&address).copied().ok_or(ADDRESS_NOT_FOUND)
    }

    fn store(&mut self, address: &str, value: ScalarValue) -> SinkResult {
        let id = self.find(address)?;
        let node = &mut self.nodes[id];
        if node.kind != Some(NodeKind::Scalar) {
            return Err(NOT_SCALAR);
        }
        if node.value.is_some() {
            return Err(VALUE_ALREADY_SET);
        }
        debug!(session = %self.name, %address, ty = value.type_name(), "value stored");
        node.value = Some(value);
        Ok(())
    }

    fn snapshot(&self) -> SinkResult<DataTree> {
        let mut tree = DataTree::with_root(&self.name).map_err(|_| MALFORMED_ADDRESS)?;
        for pending in self.nodes.iter().skip(1) {
            let node = match (pending.kind, &pending.value) {
                (Some(NodeKind::Scalar), Some(value)) => {
                    TreeNode::scalar(pending.address.clone(), value.clone())
                }
                (Some(NodeKind::Sequence), None) => TreeNode::sequence(pending.address.clone()),
                (Some(NodeKind::Map), None) => TreeNode::map(pending.address.clone()),
                _ => return Err(INCOMPLETE_NODE),
            };
            let parent = pending.parent.ok_or(INCOMPLETE_NODE)?;
            tree.attach(parent, node).map_err(|_| DUPLICATE_ADDRESS)?;
        }
        Ok(tree)
    }
}

#[derive(Debug, Default)]
pub struct Warehouse {
    sessions: Vec<Session>,
}

impl Warehouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The tree held by a session, as it stands now.
    pub fn snapshot(&self, handle: SessionHandle) -> SinkResult<DataTree> {
        self.session(handle)?.snapshot()
    }

    /// Output of the most recent `render` of a session.
    pub fn rendered(&self, handle: SessionHandle) -> Option<&str> {
        self.session(handle).ok()?.rendered.as_deref()
    }

    fn session(&self, handle: SessionHandle) -> SinkResult<&Session> {
        self.sessions
            .get(handle.raw() as usize)
            .ok_or(UNKNOWN_SESSION)
    }

    fn session_mut(&mut self, handle: SessionHandle) -> SinkResult<&mut Session> {
        self.sessions
            .get_mut(handle.raw() as usize)
            .ok_or(UNKNOWN_SESSION)
    }
}

impl TreeSink for Warehouse {
    fn create_session(&mut self, root_name: &str) -> SinkResult<SessionHandle> {
        let root = PathAddress::root(root_name).map_err(|_| MALFORMED_ADDRESS)?;
        let raw = u32::try_from(self.sessions.len()).map_err(|_| UNKNOWN_SESSION)?;
        let mut index = HashMap::new();
        index.insert(root.clone(), 0);
        self.sessions.push(Session {
            name: root_name.to_string(),
            nodes: vec![Pending {
                address: root,
                parent: None,
                kind: Some(NodeKind::Map),
                value: None,
                children: 0,
            }],
            index,
            rendered: None,
        });
        let handle = SessionHandle::new(raw);
        debug!(session = %handle, root_name, "session created");
        Ok(handle)
    }

    fn add_sub_tree(&mut self, handle: SessionHandle, parent: &str, name: &str) -> SinkResult {
        let session = self.session_mut(handle)?;
        let parent_id = session.find(parent)?;
        let parent_node = &session.nodes[parent_id];
        match parent_node.kind {
            Some(NodeKind::Map) => {}
            Some(NodeKind::Sequence) => {
                if name != parent_node.children.to_string() {
                    return Err(SEQUENCE_INDEX);
                }
            }
            _ => return Err(NOT_COMPOSITE),
        }
        let address = parent_node
            .address
            .child(name)
            .map_err(|_| MALFORMED_ADDRESS)?;
        if session.index.contains_key(&address) {
            return Err(DUPLICATE_ADDRESS);
        }

        debug!(session = %handle, %address, "sub-tree added");
        let id = session.nodes.len();
        session.index.insert(address.clone(), id);
        session.nodes.push(Pending {
            address,
            parent: Some(parent_id),
            kind: None,
            value: None,
            children: 0,
        });
        session.nodes[parent_id].children += 1;
        Ok(())
    }

    fn set_kind(&mut self, handle: SessionHandle, address: &str, kind: NodeKind) -> SinkResult {
        let session = self.session_mut(handle)?;
        let id = session.find(address)?;
        let node = &mut session.nodes[id];
        if node.kind.is_some() {
            return Err(KIND_ALREADY_SET);
        }
        node.kind = Some(kind);
        Ok(())
    }

    fn set_int_value(&mut self, handle: SessionHandle, address: &str, value: i64) -> SinkResult {
        self.session_mut(handle)?
            .store(address, ScalarValue::Int(value))
    }

    fn set_real_value(&mut self, handle: SessionHandle, address: &str, value: f64) -> SinkResult {
        self.session_mut(handle)?
            .store(address, ScalarValue::Real(value))
    }

    fn set_bool_value(&mut self, handle: SessionHandle, address: &str, value: bool) -> SinkResult {
        self.session_mut(handle)?
            .store(address, ScalarValue::Bool(value))
    }

    fn set_string_value(
        &mut self,
        handle: SessionHandle,
        address: &str,
        value: &str,
    ) -> SinkResult {
        self.session_mut(handle)?
            .store(address, ScalarValue::Str(value.to_string()))
    }

    fn render(&mut self, handle: SessionHandle) -> SinkResult {
        let session = self.session_mut(handle)?;
        let text = session.snapshot()?.serialize();
        info!(session = %handle, "rendered tree\n{}", text);
        session.rendered = Some(text);
        Ok(())
    }
}
