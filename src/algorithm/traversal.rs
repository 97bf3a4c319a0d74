//! 广度优先遍历
//!
//! 流量族的基础构件：Edmonds-Karp 用它找增广路径，
//! 最大流结束后用它划分最小割的 S/T 两侧。

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use std::collections::VecDeque;

impl<T, K> Graph<T, K> {
    /// 广度优先遍历
    ///
    /// FIFO 队列展开。结束后每个可达节点 `distance = 0` 且 `parent`
    /// 指向发现它的前驱（父链即按边数最短的路径树）；
    /// 不可达节点保持 +inf 哨兵。
    pub fn bfs(&mut self, root: NodeId) -> Result<()> {
        self.reset_scratch();
        self.ensure_registered(root)?;
        self.bfs_impl(root);
        Ok(())
    }

    /// 不重置、不校验的内部版本，流量族循环内复用
    pub(crate) fn bfs_impl(&mut self, root: NodeId) {
        self.scratch_mut(root).distance = 0.0;

        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(u) = queue.pop_front() {
            self.focus_node(u);
            for (v, _) in self.out_arcs(u) {
                if self.distance(v).is_infinite() {
                    let s = self.scratch_mut(v);
                    s.distance = 0.0;
                    s.parent = Some(u);
                    queue.push_back(v);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn diamond() -> (Graph<u32, f64>, Vec<NodeId>) {
        // 1 -> 2 -> 4
        //  \-> 3 -/      5 孤立
        let mut g = Graph::directed();
        let ids = g.add_nodes([1, 2, 3, 4, 5]).unwrap();
        g.add_edge(ids[0], ids[1], 1.0).unwrap();
        g.add_edge(ids[0], ids[2], 1.0).unwrap();
        g.add_edge(ids[1], ids[3], 1.0).unwrap();
        g.add_edge(ids[2], ids[3], 1.0).unwrap();
        (g, ids)
    }

    #[test]
    fn test_bfs_labels() {
        let (mut g, ids) = diamond();
        g.bfs(ids[0]).unwrap();

        for &n in &ids[..4] {
            assert_eq!(g.distance(n), 0.0);
        }
        assert!(g.distance(ids[4]).is_infinite());
        assert_eq!(g.parent(ids[4]), None);

        // 父链构成按边数最短的树：4 的前驱是 2（FIFO 先发现）
        assert_eq!(g.parent(ids[0]), None);
        assert_eq!(g.parent(ids[1]), Some(ids[0]));
        assert_eq!(g.parent(ids[2]), Some(ids[0]));
        assert_eq!(g.parent(ids[3]), Some(ids[1]));
    }

    #[test]
    fn test_bfs_resets_previous_run() {
        let (mut g, ids) = diamond();
        g.bfs(ids[0]).unwrap();
        g.bfs(ids[4]).unwrap();

        assert_eq!(g.distance(ids[4]), 0.0);
        for &n in &ids[..4] {
            assert!(g.distance(n).is_infinite());
            assert_eq!(g.parent(n), None);
        }
    }

    #[test]
    fn test_bfs_unknown_root() {
        let (mut g, _) = diamond();
        assert!(matches!(
            g.bfs(NodeId::new(999)),
            Err(Error::UnknownNode(_))
        ));
    }
}
