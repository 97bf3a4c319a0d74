//! 图核心模块
//!
//! 定义节点、边和图的核心数据结构

mod edge;
mod graph;
mod node;

pub use edge::{Edge, EdgeId, EdgeState};
pub use graph::Graph;
pub use node::{Node, NodeId, NodeScratch};
