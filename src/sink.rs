//! The boundary a tree is replayed onto while it is built.
//!
//! Every operation reports failure as a nonzero status code. Addresses are
//! passed in their canonical text form (`PathAddress::to_string`).

use crate::node::NodeKind;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroI32;

/// Opaque reference to one tree held by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionHandle(u32);

impl SessionHandle {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub type SinkResult<T = ()> = Result<T, NonZeroI32>;

pub trait TreeSink {
    fn create_session(&mut self, root_name: &str) -> SinkResult<SessionHandle>;

    fn add_sub_tree(&mut self, handle: SessionHandle, parent: &str, name: &str) -> SinkResult;

    fn set_kind(&mut self, handle: SessionHandle, address: &str, kind: NodeKind) -> SinkResult;

    fn set_int_value(&mut self, handle: SessionHandle, address: &str, value: i64) -> SinkResult;

    fn set_real_value(&mut self, handle: SessionHandle, address: &str, value: f64) -> SinkResult;

    fn set_bool_value(&mut self, handle: SessionHandle, address: &str, value: bool) -> SinkResult;

    fn set_string_value(&mut self, handle: SessionHandle, address: &str, value: &str)
    -> SinkResult;

    /// Export/diagnostic dump of the whole session.
    fn render(&mut self, handle: SessionHandle) -> SinkResult;
}

/// Identifies the sink operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOp {
    CreateSession,
    AddSubTree,
    SetKind,
    SetIntValue,
    SetRealValue,
    SetBoolValue,
    SetStringValue,
    Render,
}

impl fmt::Display for SinkOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SinkOp::CreateSession => "create_session",
            SinkOp::AddSubTree => "add_sub_tree",
            SinkOp::SetKind => "set_kind",
            SinkOp::SetIntValue => "set_int_value",
            SinkOp::SetRealValue => "set_real_value",
            SinkOp::SetBoolValue => "set_bool_value",
            SinkOp::SetStringValue => "set_string_value",
            SinkOp::Render => "render",
        })
    }
}
