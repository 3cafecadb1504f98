pub mod address;
pub mod error;
pub mod node;
pub mod render;
pub mod sink;
pub mod storage;
pub mod tree;
pub mod warehouse;

pub use address::PathAddress;
pub use error::TreeError;
pub use node::{NodeKind, ScalarValue, TreeNode, Value};
pub use render::RenderOptions;
pub use sink::{SessionHandle, SinkOp, TreeSink};
pub use tree::{DataTree, MAX_DEPTH};
pub use warehouse::Warehouse;
