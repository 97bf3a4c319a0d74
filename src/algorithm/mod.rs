//! 图算法模块
//!
//! 七个算法入口都实现为 `Graph` 的扩展 `impl` 块：
//! 遍历（BFS）、最短路（Dijkstra / Bellman-Ford）、最小生成树
//! （Kruskal / Prim）、流量族（Ford-Fulkerson / Edmonds-Karp /
//! 最小费用流）。每个入口先重置草稿状态再校验参数。

mod max_flow;
mod min_cost_flow;
mod mst;
mod shortest_path;
mod traversal;

pub use max_flow::MaxFlowOutcome;
