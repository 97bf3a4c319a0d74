//! GraphFlow - 带权图算法引擎
//!
//! 泛型节点值与泛型边权的有向/无向图，内置七个经典算法：
//! - 广度优先遍历（BFS）
//! - 单源最短路（Dijkstra / Bellman-Ford）
//! - 最小生成树（Kruskal / Prim）
//! - 网络流（Ford-Fulkerson / Edmonds-Karp / 最小费用流）
//!
//! 算法结果写入每个节点的草稿状态（距离、父节点）并通过可选的
//! 观察者钩子对外播报边高亮与节点敲定事件，供展示层消费。

pub mod algorithm;
pub mod error;
pub mod graph;
pub mod observer;
pub mod types;

// 重导出常用类型
pub use algorithm::MaxFlowOutcome;
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, EdgeState, Graph, Node, NodeId};
pub use observer::GraphObserver;
pub use types::FlowWeight;

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
