//! 算法进度观察钩子
//!
//! 外部展示层（画布、动画）只能依赖这两个通道观察算法副作用，
//! 不允许直接读取引擎内部结构。

use crate::graph::{EdgeState, NodeId};

/// 图算法观察者
///
/// 回调在算法循环内部同步触发。实现方不得在回调中修改正在迭代的图，
/// 否则行为未定义。
pub trait GraphObserver {
    /// 边的高亮状态发生变化（标记/撤销树边、流量着色、重置）
    fn edge_state_changed(&self, _from: NodeId, _to: NodeId, _state: EdgeState) {}

    /// 算法敲定一个节点（BFS 出队、Dijkstra 取最小值）
    fn node_focused(&self, _node: NodeId) {}
}
