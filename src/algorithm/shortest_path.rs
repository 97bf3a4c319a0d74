//! 单源最短路算法族
//!
//! Dijkstra 与 Bellman-Ford 共享同一个松弛原语：发现更短路径时更新
//! 距离/父节点，把胜出的边标记为树边，并把被替换的旧父边降级。
//! 权重通过调用方提供的转换闭包映射为数值，算法本身对权重类型不可知。

use crate::error::Result;
use crate::graph::{EdgeState, Graph, NodeId};
use priority_queue::PriorityQueue;
use std::cmp::Ordering;
use tracing::trace;

/// 最近优先的距离排序（`PriorityQueue` 弹出最大优先级，这里反转）
#[derive(Debug, Clone, Copy, PartialEq)]
struct NearestFirst(f64);

impl Eq for NearestFirst {}

impl PartialOrd for NearestFirst {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NearestFirst {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.total_cmp(&self.0)
    }
}

impl<T, K> Graph<T, K> {
    /// 松弛一条弧
    ///
    /// 距离改善时把 (from, to) 标记为树边；若 to 原来已有父边，
    /// 先把旧父边降回空闲状态。
    pub(crate) fn relax(&mut self, from: NodeId, to: NodeId, converted: f64) -> bool {
        let candidate = self.distance(from) + converted;
        if self.distance(to) > candidate {
            if let Some(prev) = self.parent(to) {
                self.set_arc_state(prev, to, EdgeState::Idle);
            }
            self.set_arc_state(from, to, EdgeState::OnTree);

            let s = self.scratch_mut(to);
            s.distance = candidate;
            s.parent = Some(from);
            true
        } else {
            false
        }
    }

    /// Dijkstra 最短路
    ///
    /// 反复取出未访问的最小距离节点并松弛其所有出边。
    /// 前置条件（文档约定，不做检查）：不允许负权边。
    pub fn dijkstra<F>(&mut self, root: NodeId, conv: F) -> Result<()>
    where
        F: Fn(&K) -> f64,
    {
        self.reset_scratch();
        self.ensure_registered(root)?;
        self.dijkstra_impl(root, &conv);
        Ok(())
    }

    pub(crate) fn dijkstra_impl(&mut self, root: NodeId, conv: &dyn Fn(&K) -> f64) {
        self.scratch_mut(root).distance = 0.0;

        let mut queue: PriorityQueue<NodeId, NearestFirst> = PriorityQueue::new();
        for id in self.node_ids() {
            queue.push(id, NearestFirst(self.distance(id)));
        }

        while let Some((u, _)) = queue.pop() {
            self.focus_node(u);
            let arcs: Vec<(NodeId, f64)> = self
                .out_arcs(u)
                .into_iter()
                .filter_map(|(v, eid)| self.edge_by_id(eid).map(|e| (v, conv(e.weight()))))
                .collect();
            for (v, w) in arcs {
                if self.relax(u, v, w) {
                    // 已弹出的节点不在队列里，change_priority 自然忽略
                    queue.change_priority(&v, NearestFirst(self.distance(v)));
                }
            }
        }
    }

    /// Bellman-Ford 最短路
    ///
    /// 对全部弧做 |V| 轮松弛，然后做一轮校验：仍有弧可以松弛说明
    /// 存在松弛顺序可达的负权环，返回 `Ok(false)`（不是错误）。
    /// 这是唯一容忍负权边的算法，因此最小费用流用它在带负费用
    /// 反向弧的残余图上播种。
    pub fn bellman_ford<F>(&mut self, root: NodeId, conv: F) -> Result<bool>
    where
        F: Fn(&K) -> f64,
    {
        self.reset_scratch();
        self.ensure_registered(root)?;
        Ok(self.bellman_ford_impl(root, &conv))
    }

    pub(crate) fn bellman_ford_impl(&mut self, root: NodeId, conv: &dyn Fn(&K) -> f64) -> bool {
        self.scratch_mut(root).distance = 0.0;

        // 弧快照：权重在松弛期间不变
        let sources = self.adjacency_sources();
        let mut arcs: Vec<(NodeId, NodeId, f64)> = Vec::new();
        for &u in &sources {
            for (v, eid) in self.out_arcs(u) {
                if let Some(e) = self.edge_by_id(eid) {
                    arcs.push((u, v, conv(e.weight())));
                }
            }
        }

        let passes = sources.len();
        for round in 0..passes {
            let mut relaxed = 0usize;
            for &(u, v, w) in &arcs {
                if self.relax(u, v, w) {
                    relaxed += 1;
                }
            }
            trace!(round, relaxed, "bellman-ford 松弛轮结束");
            if relaxed == 0 {
                break;
            }
        }

        for &(u, v, w) in &arcs {
            if self.distance(v) > self.distance(u) + w {
                return false;
            }
        }
        true
    }
}
