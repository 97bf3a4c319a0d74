//! 最大流算法族（Ford-Fulkerson / Edmonds-Karp）
//!
//! 两个入口共享同一套残余图记账，只在增广路径的搜索策略上不同：
//! Ford-Fulkerson 用零权松弛（任意路径即可保证正确性），
//! Edmonds-Karp 固定用 BFS 拿到边数最短的增广路径。
//! 权重类型在编译期就约束为 `FlowWeight`，不存在运行期类型检查。

use crate::error::{Error, Result};
use crate::graph::{Edge, EdgeState, Graph, NodeId};
use crate::types::FlowWeight;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// 最大流结果
///
/// `source_side` / `sink_side` 是按节点注册顺序给出的最小割两侧划分：
/// 残余图上从源点可达的节点构成 S 侧，其余构成 T 侧。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxFlowOutcome {
    /// 最大流量
    pub value: i64,
    /// 最小割的源点侧节点
    pub source_side: Vec<NodeId>,
    /// 最小割的汇点侧节点
    pub sink_side: Vec<NodeId>,
}

/// 增广路径的搜索策略
#[derive(Debug, Clone, Copy)]
enum AugmentSearch {
    /// 零权松弛，得到任意可达路径
    Relaxation,
    /// BFS，得到边数最短路径
    Breadth,
}

impl<T> Graph<T, FlowWeight> {
    /// Ford-Fulkerson 最大流
    ///
    /// 增广路径由零权转换下的松弛搜索给出（任意路径）。返回最大流量
    /// 与最小割划分。结束后饱和弧标记为 `Saturated`，载流弧标记为
    /// `Carrying`；被摘除的饱和弧已全部挂回，正向邻接结构保持完整。
    pub fn ford_fulkerson(&mut self, source: NodeId, sink: NodeId) -> Result<MaxFlowOutcome> {
        self.max_flow(source, sink, AugmentSearch::Relaxation)
    }

    /// Edmonds-Karp 最大流
    ///
    /// 与 [`Self::ford_fulkerson`] 契约相同，但固定用 BFS 搜索增广
    /// 路径，保证多项式轮数上界。
    pub fn edmonds_karp(&mut self, source: NodeId, sink: NodeId) -> Result<MaxFlowOutcome> {
        self.max_flow(source, sink, AugmentSearch::Breadth)
    }

    fn max_flow(
        &mut self,
        source: NodeId,
        sink: NodeId,
        search: AugmentSearch,
    ) -> Result<MaxFlowOutcome> {
        self.reset_scratch();
        self.ensure_registered(source)?;
        self.ensure_registered(sink)?;

        // 饱和弧从邻接视图摘下停靠在这里，反向流把它解饱和时挂回。
        // 入场时就没有剩余容量的弧（零容量边、上一次运行留下的满流弧）
        // 先行摘停，搜索只会看到真正的残余弧。
        let mut parked: HashMap<(NodeId, NodeId), Edge<FlowWeight>> = HashMap::new();
        self.park_spent_arcs(&mut parked);

        let value = match self.augment_loop(source, sink, search, &mut parked) {
            Ok(value) => value,
            Err(e) => {
                for (_, edge) in parked {
                    self.reattach_arc(edge);
                }
                return Err(e);
            }
        };

        // 最小割划分要在残余图上做：饱和弧还停靠在外面
        self.reset_scratch();
        self.bfs_impl(source);
        let mut source_side = Vec::new();
        let mut sink_side = Vec::new();
        for id in self.node_ids() {
            if self.distance(id).is_finite() {
                source_side.push(id);
            } else {
                sink_side.push(id);
            }
        }

        for (_, e) in parked {
            self.reattach_arc(e);
        }

        for eid in self.edge_ids() {
            let state = match self.edge_by_id(eid).map(|e| *e.weight()) {
                Some(w) if w.available() == 0 => EdgeState::Saturated,
                Some(w) if w.flow != 0 => EdgeState::Carrying,
                _ => EdgeState::Idle,
            };
            self.set_edge_state(eid, state);
        }

        debug!(value, s = source_side.len(), t = sink_side.len(), "最大流结束");
        Ok(MaxFlowOutcome {
            value,
            source_side,
            sink_side,
        })
    }

    /// 把当前没有剩余容量的弧全部摘停
    ///
    /// 增广搜索沿邻接视图走且不看容量，循环的不变量是"视图里的弧
    /// 都有正残余"，入场前必须先建立这个不变量。
    fn park_spent_arcs(&mut self, parked: &mut HashMap<(NodeId, NodeId), Edge<FlowWeight>>) {
        let mut spent: Vec<(NodeId, NodeId)> = Vec::new();
        for u in self.adjacency_sources() {
            for (v, eid) in self.out_arcs(u) {
                if let Some(e) = self.edge_by_id(eid) {
                    if e.weight().available() <= 0 {
                        spent.push((u, v));
                    }
                }
            }
        }
        for (u, v) in spent {
            if let Some(e) = self.detach_arc(u, v) {
                parked.insert((u, v), e);
            }
        }
    }

    fn augment_loop(
        &mut self,
        source: NodeId,
        sink: NodeId,
        search: AugmentSearch,
        parked: &mut HashMap<(NodeId, NodeId), Edge<FlowWeight>>,
    ) -> Result<i64> {
        let mut value: i64 = 0;

        loop {
            self.reset_scratch();
            match search {
                AugmentSearch::Relaxation => self.dijkstra_impl(source, &|_| 0.0),
                AugmentSearch::Breadth => self.bfs_impl(source),
            }
            if self.distance(sink).is_infinite() {
                break;
            }

            let path = self.walk_to(sink);
            if path.len() < 2 {
                break;
            }

            let mut bottleneck = i64::MAX;
            for pair in path.windows(2) {
                match self.arc_weight(pair[0], pair[1]) {
                    Some(w) => bottleneck = bottleneck.min(w.available()),
                    None => {
                        return Err(Error::Internal(
                            "增广路径上的弧不在邻接视图中".to_string(),
                        ))
                    }
                }
            }
            if bottleneck <= 0 {
                return Err(Error::Internal(
                    "增广路径上出现零残余弧".to_string(),
                ));
            }

            for pair in path.windows(2) {
                let (u, v) = (pair[0], pair[1]);

                let saturated = match self.arc_weight_mut(u, v) {
                    Some(w) => {
                        w.flow += bottleneck;
                        w.available() == 0
                    }
                    None => {
                        return Err(Error::Internal(
                            "增广路径上的弧不在邻接视图中".to_string(),
                        ))
                    }
                };

                // 镜像残余弧：优先唤醒停靠的饱和弧，其次原地回退，
                // 都没有时新建一条负流量的反向弧
                if let Some(mut e) = parked.remove(&(v, u)) {
                    e.weight.flow -= bottleneck;
                    self.reattach_arc(e);
                } else if let Some(w) = self.arc_weight_mut(v, u) {
                    w.flow -= bottleneck;
                } else {
                    self.attach_arc(v, u, FlowWeight::new(-bottleneck, 0));
                }

                if saturated {
                    if let Some(e) = self.detach_arc(u, v) {
                        parked.insert((u, v), e);
                    }
                }
            }

            value += bottleneck;
            debug!(bottleneck, hops = path.len() - 1, value, "完成一轮增广");
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 五节点网络，从 5 到 1 的最大流为 8（割 {5} 的出弧容量之和）
    fn pipeline() -> (Graph<u32, FlowWeight>, Vec<NodeId>, Vec<(usize, usize, i64)>) {
        let mut g = Graph::directed();
        let ids = g.add_nodes([1, 2, 3, 4, 5]).unwrap();
        let caps = vec![
            (2, 0, 4),
            (4, 0, 3),
            (1, 0, 1),
            (2, 1, 1),
            (3, 2, 4),
            (1, 3, 2),
            (4, 1, 2),
            (4, 3, 3),
        ];
        for &(f, t, c) in &caps {
            g.add_edge(ids[f], ids[t], FlowWeight::with_capacity(c)).unwrap();
        }
        (g, ids, caps)
    }

    fn cut_capacity(
        ids: &[NodeId],
        caps: &[(usize, usize, i64)],
        source_side: &[NodeId],
    ) -> i64 {
        caps.iter()
            .filter(|&&(f, t, _)| {
                source_side.contains(&ids[f]) && !source_side.contains(&ids[t])
            })
            .map(|&(_, _, c)| c)
            .sum()
    }

    #[test]
    fn test_ford_fulkerson_pipeline() {
        let (mut g, ids, caps) = pipeline();
        let out = g.ford_fulkerson(ids[4], ids[0]).unwrap();

        assert_eq!(out.value, 8);
        // 流量等于报告的最小割容量
        assert_eq!(out.value, cut_capacity(&ids, &caps, &out.source_side));
        assert_eq!(out.source_side, vec![ids[4]]);
        assert_eq!(out.sink_side, vec![ids[0], ids[1], ids[2], ids[3]]);
    }

    #[test]
    fn test_edmonds_karp_matches_ford_fulkerson() {
        let (mut g, ids, caps) = pipeline();
        let ek = g.edmonds_karp(ids[4], ids[0]).unwrap();

        let (mut g2, ids2, _) = pipeline();
        let ff = g2.ford_fulkerson(ids2[4], ids2[0]).unwrap();

        assert_eq!(ek.value, ff.value);
        assert_eq!(ek.value, cut_capacity(&ids, &caps, &ek.source_side));
    }

    #[test]
    fn test_chain_bottleneck() {
        let mut g: Graph<u32, FlowWeight> = Graph::directed();
        let ids = g.add_nodes([1, 2, 3]).unwrap();
        g.add_edge(ids[0], ids[1], FlowWeight::with_capacity(5)).unwrap();
        g.add_edge(ids[1], ids[2], FlowWeight::with_capacity(3)).unwrap();

        let out = g.edmonds_karp(ids[0], ids[2]).unwrap();
        assert_eq!(out.value, 3);

        // 瓶颈弧饱和，上游弧载流
        assert_eq!(
            g.edge(ids[1], ids[2]).map(|e| e.state()),
            Some(EdgeState::Saturated)
        );
        assert_eq!(
            g.edge(ids[0], ids[1]).map(|e| e.state()),
            Some(EdgeState::Carrying)
        );
    }

    #[test]
    fn test_forward_arcs_restored() {
        let (mut g, ids, caps) = pipeline();
        g.ford_fulkerson(ids[4], ids[0]).unwrap();

        // 所有原始正向弧都还挂在邻接视图里，包括被摘停过的饱和弧
        for &(f, t, _) in &caps {
            assert!(g.edge(ids[f], ids[t]).is_some());
        }
    }

    #[test]
    fn test_zero_capacity_arc_does_not_block_search() {
        // 零容量直达弧不挡路，流量走 1→2→3 绕行
        let build = || {
            let mut g: Graph<u32, FlowWeight> = Graph::directed();
            let ids = g.add_nodes([1, 2, 3]).unwrap();
            g.add_edge(ids[0], ids[2], FlowWeight::with_capacity(0)).unwrap();
            g.add_edge(ids[0], ids[1], FlowWeight::with_capacity(5)).unwrap();
            g.add_edge(ids[1], ids[2], FlowWeight::with_capacity(5)).unwrap();
            (g, ids)
        };

        let (mut g, ids) = build();
        let ek = g.edmonds_karp(ids[0], ids[2]).unwrap();
        assert_eq!(ek.value, 5);
        // 零容量弧只是摘停，结束时挂回邻接视图
        assert!(g.edge(ids[0], ids[2]).is_some());

        let (mut g, ids) = build();
        assert_eq!(g.ford_fulkerson(ids[0], ids[2]).unwrap().value, 5);
    }

    #[test]
    fn test_sink_unreachable() {
        let mut g: Graph<u32, FlowWeight> = Graph::directed();
        let a = g.add_node(1).unwrap();
        let b = g.add_node(2).unwrap();
        let out = g.ford_fulkerson(a, b).unwrap();

        assert_eq!(out.value, 0);
        assert_eq!(out.source_side, vec![a]);
        assert_eq!(out.sink_side, vec![b]);
    }

    #[test]
    fn test_unknown_endpoint() {
        let (mut g, ids, _) = pipeline();
        assert!(matches!(
            g.edmonds_karp(ids[0], NodeId::new(99)),
            Err(Error::UnknownNode(_))
        ));
    }
}
