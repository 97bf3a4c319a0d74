//! 最小费用流（供需平衡）
//!
//! 连续最短增广路径法：挂一个临时超级源点连向所有盈余节点，
//! 反复用 Bellman-Ford（费用作权重，容忍残余图上的负费用反向弧）
//! 找到费用最近的亏空节点并沿路径推流，直到供需两侧全部结清。
//! 本算法把 `FlowWeight` 的 `flow` 字段解释为单位费用，
//! `capacity` 解释为剩余容量。

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, NodeId};
use crate::types::FlowWeight;
use std::collections::HashMap;
use tracing::debug;

/// 临时超级源点的保留句柄，`add_node` 的分配从 1 开始，永不碰撞
const SUPER_SOURCE: NodeId = NodeId(0);

impl<T> Graph<T, FlowWeight> {
    /// 最小费用流
    ///
    /// `excess` 为节点到正盈余量的映射，`deficit` 为节点到负亏空量的
    /// 映射，两侧总量必须抵消，否则报 `Imbalance`。残余图出现负费用环
    /// 时报 `NegativeCycle`；仍有盈余但已无可达亏空节点时报
    /// `Unreachable`。返回总费用（可以为负）。无论成功失败，返回前都
    /// 会拆除超级源点并挂回摘停的饱和弧，原有弧全部保留在邻接视图中，
    /// 只有残余容量发生变化。
    pub fn min_cost_flow(
        &mut self,
        excess: HashMap<NodeId, i64>,
        deficit: HashMap<NodeId, i64>,
    ) -> Result<i64> {
        self.reset_scratch();

        for &id in excess.keys().chain(deficit.keys()) {
            self.ensure_registered(id)?;
        }
        let supply: i64 = excess.values().sum();
        let demand: i64 = deficit.values().sum();
        if supply + demand != 0 {
            return Err(Error::Imbalance { supply, demand });
        }

        // 入场时就没有剩余容量的弧先行摘停：Bellman-Ford 沿邻接视图
        // 找最便宜路径且不看容量，视图里的弧必须都推得动流量
        let mut parked: HashMap<(NodeId, NodeId), Edge<FlowWeight>> = HashMap::new();
        let mut spent: Vec<(NodeId, NodeId)> = Vec::new();
        for u in self.adjacency_sources() {
            for (v, eid) in self.out_arcs(u) {
                if let Some(e) = self.edge_by_id(eid) {
                    if e.weight().capacity <= 0 {
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

        let mut ex = excess;
        let mut dx = deficit;
        for &node in ex.keys() {
            self.attach_arc(SUPER_SOURCE, node, FlowWeight::new(0, i64::MAX));
        }

        let mut total: i64 = 0;

        while !ex.is_empty() {
            self.reset_scratch();
            if !self.bellman_ford_impl(SUPER_SOURCE, &|w| w.flow as f64) {
                self.dismantle_super_source(parked);
                return Err(Error::NegativeCycle);
            }

            // 费用最近的亏空节点，平票按节点 ID 取小
            let target = match dx
                .keys()
                .map(|&n| (self.distance(n), n))
                .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            {
                Some((d, n)) if d.is_finite() => n,
                _ => {
                    self.dismantle_super_source(parked);
                    return Err(Error::Unreachable);
                }
            };

            let path = self.walk_to(target);
            if path.len() < 2 {
                self.dismantle_super_source(parked);
                return Err(Error::Internal(
                    "亏空节点可达但父链无法回溯到超级源点".to_string(),
                ));
            }
            let first = path[1];

            // 瓶颈：路径剩余容量、起点剩余盈余、终点剩余亏空三者取小
            let mut bottleneck = i64::MAX;
            let mut path_cost: i64 = 0;
            for pair in path.windows(2) {
                match self.arc_weight(pair[0], pair[1]) {
                    Some(w) => {
                        bottleneck = bottleneck.min(w.capacity);
                        path_cost += w.flow;
                    }
                    None => {
                        self.dismantle_super_source(parked);
                        return Err(Error::Internal(
                            "增广路径上的弧不在邻接视图中".to_string(),
                        ));
                    }
                }
            }
            bottleneck = bottleneck
                .min(ex.get(&first).copied().unwrap_or(0))
                .min(dx.get(&target).map(|d| -d).unwrap_or(0));
            if bottleneck <= 0 {
                self.dismantle_super_source(parked);
                return Err(Error::Internal(
                    "增广路径瓶颈流量为零".to_string(),
                ));
            }

            for pair in path.windows(2) {
                let (u, v) = (pair[0], pair[1]);

                let (cost, saturated) = match self.arc_weight_mut(u, v) {
                    Some(w) => {
                        w.capacity -= bottleneck;
                        (w.flow, w.capacity == 0)
                    }
                    None => {
                        self.dismantle_super_source(parked);
                        return Err(Error::Internal(
                            "增广路径上的弧不在邻接视图中".to_string(),
                        ));
                    }
                };

                // 镜像残余弧带反号费用，推回去的流量以此抵扣
                if let Some(mut e) = parked.remove(&(v, u)) {
                    e.weight.capacity += bottleneck;
                    self.reattach_arc(e);
                } else if let Some(w) = self.arc_weight_mut(v, u) {
                    w.capacity += bottleneck;
                } else {
                    self.attach_arc(v, u, FlowWeight::new(-cost, bottleneck));
                }

                if saturated {
                    if let Some(e) = self.detach_arc(u, v) {
                        parked.insert((u, v), e);
                    }
                }
            }

            total += bottleneck * path_cost;
            debug!(bottleneck, path_cost, total, "推流一条最短费用路径");

            if let Some(e) = ex.get_mut(&first) {
                *e -= bottleneck;
                if *e == 0 {
                    ex.remove(&first);
                    self.detach_arc(SUPER_SOURCE, first);
                }
            }
            if let Some(d) = dx.get_mut(&target) {
                *d += bottleneck;
                if *d == 0 {
                    dx.remove(&target);
                }
            }
        }

        self.dismantle_super_source(parked);
        debug!(total, "最小费用流结束");
        Ok(total)
    }

    /// 拆除超级源点：挂回摘停的饱和弧，再清掉超级源点名下的全部弧
    fn dismantle_super_source(&mut self, parked: HashMap<(NodeId, NodeId), Edge<FlowWeight>>) {
        for (_, e) in parked {
            self.reattach_arc(e);
        }
        self.purge_adjacency(SUPER_SOURCE);
        self.reset_scratch();
    }
}
