//! 最小生成树算法（仅限无向图）
//!
//! Kruskal 按权重全局排序加并查集；Prim 从根出发逐步吞并跨界最小边。
//! 两者都把选中的边标记为树边并返回总权重。

use crate::error::{Error, Result};
use crate::graph::{EdgeId, EdgeState, Graph, NodeId};
use std::collections::{HashMap, HashSet};
use tracing::debug;

impl<T, K> Graph<T, K> {
    /// Kruskal 最小生成树
    ///
    /// 边按转换后权重升序逐条尝试，端点已在同一连通分组则跳过，
    /// 选满 `|V| - 1` 条提前结束。非连通图不报错，返回最小生成森林。
    pub fn kruskal<F>(&mut self, conv: F) -> Result<f64>
    where
        F: Fn(&K) -> f64,
    {
        self.reset_scratch();
        if self.is_directed() {
            return Err(Error::InvalidOperation(
                "Kruskal 要求无向图".to_string(),
            ));
        }

        // 从边记录池取边：无向边一条记录只计一次，镜像腿不会重复
        let mut arcs: Vec<(EdgeId, NodeId, NodeId, f64)> = Vec::new();
        for eid in self.edge_ids() {
            if let Some(e) = self.edge_by_id(eid) {
                arcs.push((eid, e.from(), e.to(), conv(e.weight())));
            }
        }
        arcs.sort_by(|a, b| a.3.total_cmp(&b.3));

        // 分组重标号式并查集：合并时把整组改挂到对方的组号下
        let mut group: HashMap<NodeId, usize> = self
            .node_ids()
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();

        let target = self.node_count().saturating_sub(1);
        let mut chosen = 0usize;
        let mut total = 0.0;

        for (eid, from, to, w) in arcs {
            if chosen == target {
                break;
            }
            let (gf, gt) = match (group.get(&from), group.get(&to)) {
                (Some(&gf), Some(&gt)) => (gf, gt),
                _ => continue,
            };
            if gf == gt {
                continue;
            }
            for g in group.values_mut() {
                if *g == gt {
                    *g = gf;
                }
            }
            self.set_edge_state(eid, EdgeState::OnTree);
            total += w;
            chosen += 1;
        }

        debug!(chosen, total, "kruskal 完成");
        Ok(total)
    }

    /// Prim 最小生成树
    ///
    /// 从 `root` 开始维护已吞并节点集，每轮在所有恰好一端在集合内的
    /// 边里取全局最小者。图非连通时边界会提前枯竭，报 `InvalidOperation`。
    pub fn prim<F>(&mut self, root: NodeId, conv: F) -> Result<f64>
    where
        F: Fn(&K) -> f64,
    {
        self.reset_scratch();
        if self.node_count() == 0 {
            return Err(Error::InvalidOperation(
                "Prim 要求图中至少有一个节点".to_string(),
            ));
        }
        self.ensure_registered(root)?;

        let mut in_tree: HashSet<NodeId> = HashSet::new();
        in_tree.insert(root);
        self.focus_node(root);

        let mut total = 0.0;
        while in_tree.len() < self.node_count() {
            // 跨界边里的全局最小者
            let mut best: Option<(EdgeId, NodeId, f64)> = None;
            for &u in &in_tree {
                for (v, eid) in self.out_arcs(u) {
                    if in_tree.contains(&v) {
                        continue;
                    }
                    let w = match self.edge_by_id(eid) {
                        Some(e) => conv(e.weight()),
                        None => continue,
                    };
                    if best.map(|(_, _, bw)| w < bw).unwrap_or(true) {
                        best = Some((eid, v, w));
                    }
                }
            }

            let (eid, v, w) = best.ok_or_else(|| {
                Error::InvalidOperation("Prim 无法覆盖全图：图不连通".to_string())
            })?;
            self.set_edge_state(eid, EdgeState::OnTree);
            in_tree.insert(v);
            self.focus_node(v);
            total += w;
        }

        debug!(nodes = in_tree.len(), total, "prim 完成");
        Ok(total)
    }
}
