//! 图数据结构
//!
//! 节点注册表 + 邻接视图 + 边记录池。所有修改都经过 `&mut self`，
//! 引擎按约定单线程运行，同一张图同一时刻最多执行一个算法。

use super::edge::{Edge, EdgeId, EdgeState};
use super::node::{Node, NodeId, NodeScratch};
use crate::error::{Error, Result};
use crate::observer::GraphObserver;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// 图
///
/// `digraph` 在构造时固定。无向图的一条边只保存一条记录，
/// 两个方向的邻接视图指向同一个权重/状态单元，天然保持同步。
pub struct Graph<T, K> {
    /// 是否有向
    digraph: bool,
    /// 节点注册表（保持插入顺序，决定平票时的确定性遍历顺序）
    nodes: IndexMap<NodeId, Node<T>>,
    /// 值到节点 ID 的索引（按值判重）
    value_index: HashMap<T, NodeId>,
    /// 出边邻接视图
    out: IndexMap<NodeId, IndexMap<NodeId, EdgeId>>,
    /// 入边邻接视图
    incoming: IndexMap<NodeId, IndexMap<NodeId, EdgeId>>,
    /// 边记录池
    edges: IndexMap<EdgeId, Edge<K>>,
    /// 每个节点的算法草稿状态（缺省视为 +inf / None）
    scratch: HashMap<NodeId, NodeScratch>,
    /// 下一个节点 ID（0 保留给超级源点）
    next_node_id: u64,
    /// 下一个边 ID
    next_edge_id: u64,
    /// 可选的进度观察者
    observer: Option<Box<dyn GraphObserver>>,
}

impl<T, K> Graph<T, K> {
    /// 创建新图
    pub fn new(digraph: bool) -> Self {
        Self {
            digraph,
            nodes: IndexMap::new(),
            value_index: HashMap::new(),
            out: IndexMap::new(),
            incoming: IndexMap::new(),
            edges: IndexMap::new(),
            scratch: HashMap::new(),
            next_node_id: 1,
            next_edge_id: 1,
            observer: None,
        }
    }

    /// 创建有向图
    pub fn directed() -> Self {
        Self::new(true)
    }

    /// 创建无向图
    pub fn undirected() -> Self {
        Self::new(false)
    }

    /// 是否有向
    pub fn is_directed(&self) -> bool {
        self.digraph
    }

    /// 注册进度观察者
    pub fn set_observer(&mut self, observer: Box<dyn GraphObserver>) {
        self.observer = Some(observer);
    }

    /// 移除进度观察者
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    // ==================== 查询 ====================

    /// 获取节点
    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(&id)
    }

    /// 按插入顺序遍历所有节点
    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.values()
    }

    /// 按插入顺序获取所有节点 ID
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// 获取节点数量
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 获取连接两个节点的边
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge<K>> {
        let eid = self.out.get(&from)?.get(&to)?;
        self.edges.get(eid)
    }

    /// 获取边记录数量（无向图一对镜像腿计为一条）
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 获取邻居（出边指向的节点）
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        self.out
            .get(&id)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default()
    }

    /// 获取前驱（入边来源的节点）
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.incoming
            .get(&id)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default()
    }

    /// 获取节点出度
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.out.get(&id).map(|m| m.len()).unwrap_or(0)
    }

    /// 获取节点入度
    pub fn in_degree(&self, id: NodeId) -> usize {
        self.incoming.get(&id).map(|m| m.len()).unwrap_or(0)
    }

    /// 读取节点的标号距离（上一次算法运行的结果，未触达为 +inf）
    pub fn distance(&self, id: NodeId) -> f64 {
        self.scratch
            .get(&id)
            .map(|s| s.distance)
            .unwrap_or(f64::INFINITY)
    }

    /// 读取节点的父节点回溯引用
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.scratch.get(&id).and_then(|s| s.parent)
    }

    // ==================== 边操作 ====================

    /// 添加边（严格模式：两个端点都必须已注册）
    ///
    /// 对已存在的 (from, to) 重复插入会原地更新权重并返回原有边 ID。
    /// 无向图中正反两个方向共享同一条记录，权重与状态同步更新。
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: K) -> Result<EdgeId> {
        self.ensure_registered(from)?;
        self.ensure_registered(to)?;

        if let Some(&eid) = self.out.get(&from).and_then(|m| m.get(&to)) {
            if let Some(e) = self.edges.get_mut(&eid) {
                e.weight = weight;
            }
            return Ok(eid);
        }

        let id = self.attach_arc(from, to, weight);
        if !self.digraph {
            self.out.entry(to).or_default().insert(from, id);
            self.incoming.entry(from).or_default().insert(to, id);
        }
        Ok(id)
    }

    /// 删除边
    ///
    /// 两个端点必须已注册；两点间不存在边时为空操作。
    /// 只摘除指定方向：无向图的镜像腿需要调用方另行删除。
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        self.ensure_registered(from)?;
        self.ensure_registered(to)?;
        self.detach_arc(from, to);
        Ok(())
    }

    // ==================== 算法内部支撑 ====================

    pub(crate) fn ensure_registered(&self, id: NodeId) -> Result<()> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(Error::UnknownNode(format!("{:?}", id)))
        }
    }

    /// 插入一条单向弧，不校验端点注册，不创建镜像（残余弧、超级源点专用）
    pub(crate) fn attach_arc(&mut self, from: NodeId, to: NodeId, weight: K) -> EdgeId {
        let id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;
        self.out.entry(from).or_default().insert(to, id);
        self.incoming.entry(to).or_default().insert(from, id);
        self.edges.insert(id, Edge::new(id, from, to, weight));
        id
    }

    /// 摘除一条单向弧
    ///
    /// 只有当记录不再被任何邻接视图引用时才取出记录返回；
    /// 无向图的另一条腿仍在时返回 `None` 并保留记录。
    pub(crate) fn detach_arc(&mut self, from: NodeId, to: NodeId) -> Option<Edge<K>> {
        let eid = self.out.get_mut(&from)?.shift_remove(&to)?;
        if let Some(m) = self.incoming.get_mut(&to) {
            m.shift_remove(&from);
        }

        let still_referenced = self
            .out
            .get(&to)
            .map(|m| m.get(&from) == Some(&eid))
            .unwrap_or(false);
        if still_referenced {
            None
        } else {
            self.edges.shift_remove(&eid)
        }
    }

    /// 把 `detach_arc` 取出的弧挂回邻接视图
    pub(crate) fn reattach_arc(&mut self, edge: Edge<K>) {
        let (id, from, to) = (edge.id(), edge.from(), edge.to());
        self.out.entry(from).or_default().insert(to, id);
        self.incoming.entry(to).or_default().insert(from, id);
        self.edges.insert(id, edge);
    }

    pub(crate) fn has_arc(&self, from: NodeId, to: NodeId) -> bool {
        self.out
            .get(&from)
            .map(|m| m.contains_key(&to))
            .unwrap_or(false)
    }

    pub(crate) fn arc_weight(&self, from: NodeId, to: NodeId) -> Option<&K> {
        self.edge(from, to).map(|e| e.weight())
    }

    pub(crate) fn arc_weight_mut(&mut self, from: NodeId, to: NodeId) -> Option<&mut K> {
        let eid = *self.out.get(&from)?.get(&to)?;
        self.edges.get_mut(&eid).map(|e| &mut e.weight)
    }

    /// 某个节点的出边快照（节点 ID 与边 ID，按插入顺序）
    pub(crate) fn out_arcs(&self, id: NodeId) -> Vec<(NodeId, EdgeId)> {
        self.out
            .get(&id)
            .map(|m| m.iter().map(|(&to, &eid)| (to, eid)).collect())
            .unwrap_or_default()
    }

    pub(crate) fn edge_by_id(&self, id: EdgeId) -> Option<&Edge<K>> {
        self.edges.get(&id)
    }

    pub(crate) fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().copied().collect()
    }

    /// 邻接表里的全部源节点（含临时超级源点），Bellman-Ford 以此计轮数
    pub(crate) fn adjacency_sources(&self) -> Vec<NodeId> {
        self.out.keys().copied().collect()
    }

    /// 摘除某个节点名下的全部出入弧并清掉它的邻接条目与草稿状态
    ///
    /// `remove_node` 与最小费用流拆除临时超级源点时共用。
    pub(crate) fn purge_adjacency(&mut self, id: NodeId) {
        let successors: Vec<NodeId> = self
            .out
            .get(&id)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        for to in successors {
            self.detach_arc(id, to);
        }

        let predecessors: Vec<NodeId> = self
            .incoming
            .get(&id)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        for from in predecessors {
            self.detach_arc(from, id);
        }

        self.out.shift_remove(&id);
        self.incoming.shift_remove(&id);
        self.scratch.remove(&id);
    }

    pub(crate) fn scratch_mut(&mut self, id: NodeId) -> &mut NodeScratch {
        self.scratch.entry(id).or_default()
    }

    /// 重置草稿状态：距离 +inf、父节点 None、边状态 Idle
    ///
    /// 每个算法入口先调用，再做可能失败的校验，保证失败也不泄漏状态。
    pub(crate) fn reset_scratch(&mut self) {
        self.scratch.clear();
        let ids: Vec<EdgeId> = self.edges.keys().copied().collect();
        for id in ids {
            self.set_edge_state(id, EdgeState::Idle);
        }
    }

    /// 设置边的高亮状态，变化时通知观察者
    pub(crate) fn set_edge_state(&mut self, id: EdgeId, state: EdgeState) {
        let notify = match self.edges.get_mut(&id) {
            Some(e) if e.state != state => {
                e.state = state;
                Some((e.from(), e.to()))
            }
            _ => None,
        };
        if let (Some((from, to)), Some(obs)) = (notify, self.observer.as_ref()) {
            obs.edge_state_changed(from, to, state);
        }
    }

    /// 按 (from, to) 设置弧的高亮状态
    pub(crate) fn set_arc_state(&mut self, from: NodeId, to: NodeId, state: EdgeState) {
        if let Some(&eid) = self.out.get(&from).and_then(|m| m.get(&to)) {
            self.set_edge_state(eid, state);
        }
    }

    /// 通知观察者某个节点被算法敲定
    pub(crate) fn focus_node(&self, id: NodeId) {
        if let Some(obs) = self.observer.as_ref() {
            obs.node_focused(id);
        }
    }

    /// 沿父节点回溯引用重建从根到 `end` 的路径
    pub(crate) fn walk_to(&self, end: NodeId) -> SmallVec<[NodeId; 8]> {
        let mut walk: SmallVec<[NodeId; 8]> = SmallVec::new();
        let mut cur = Some(end);
        while let Some(n) = cur {
            walk.push(n);
            cur = self.parent(n);
        }
        walk.reverse();
        walk
    }
}

impl<T, K> Graph<T, K>
where
    T: Clone + Eq + Hash + fmt::Debug,
{
    // ==================== 节点操作 ====================

    /// 添加节点
    ///
    /// 与已注册节点值相等时报 `DuplicateNode`。
    pub fn add_node(&mut self, value: T) -> Result<NodeId> {
        if self.value_index.contains_key(&value) {
            return Err(Error::DuplicateNode(format!("{:?}", value)));
        }

        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;

        self.value_index.insert(value.clone(), id);
        self.nodes.insert(id, Node::new(id, value));
        self.out.insert(id, IndexMap::new());
        self.incoming.insert(id, IndexMap::new());

        Ok(id)
    }

    /// 批量添加节点
    pub fn add_nodes<I>(&mut self, values: I) -> Result<Vec<NodeId>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut ids = Vec::new();
        for v in values {
            ids.push(self.add_node(v)?);
        }
        Ok(ids)
    }

    /// 通过值查找节点 ID
    pub fn node_id(&self, value: &T) -> Option<NodeId> {
        self.value_index.get(value).copied()
    }

    /// 删除节点
    ///
    /// 注销节点并从所有邻居的邻接视图中摘除关联的边，调用返回后
    /// 不允许残留悬空引用。
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        let node = self
            .nodes
            .shift_remove(&id)
            .ok_or_else(|| Error::UnknownNode(format!("{:?}", id)))?;
        self.value_index.remove(node.value());
        self.purge_adjacency(id);

        Ok(())
    }

    /// 批量删除节点
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> Result<()> {
        for &id in ids {
            self.remove_node(id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_basic() {
        let mut graph: Graph<&str, f64> = Graph::directed();

        let a = graph.add_node("a").unwrap();
        let b = graph.add_node("b").unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node_id(&"a"), Some(a));

        let e = graph.add_edge(a, b, 2.5).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge(a, b).map(|e| e.id()), Some(e));
        assert!(graph.edge(b, a).is_none());

        assert_eq!(graph.neighbors(a), vec![b]);
        assert_eq!(graph.predecessors(b), vec![a]);
        assert_eq!(graph.out_degree(a), 1);
        assert_eq!(graph.in_degree(b), 1);
    }

    #[test]
    fn test_duplicate_node() {
        let mut graph: Graph<u32, f64> = Graph::directed();
        graph.add_node(1).unwrap();
        assert!(matches!(
            graph.add_node(1),
            Err(Error::DuplicateNode(_))
        ));
    }

    #[test]
    fn test_add_edge_strict() {
        let mut graph: Graph<u32, f64> = Graph::directed();
        let a = graph.add_node(1).unwrap();
        assert!(matches!(
            graph.add_edge(a, NodeId::new(99), 1.0),
            Err(Error::UnknownNode(_))
        ));
    }

    #[test]
    fn test_edge_update_in_place() {
        let mut graph: Graph<u32, f64> = Graph::directed();
        let a = graph.add_node(1).unwrap();
        let b = graph.add_node(2).unwrap();

        let e1 = graph.add_edge(a, b, 1.0).unwrap();
        let e2 = graph.add_edge(a, b, 7.0).unwrap();
        assert_eq!(e1, e2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge(a, b).map(|e| *e.weight()), Some(7.0));
    }

    #[test]
    fn test_undirected_shared_record() {
        let mut graph: Graph<u32, f64> = Graph::undirected();
        let a = graph.add_node(1).unwrap();
        let b = graph.add_node(2).unwrap();

        let e = graph.add_edge(a, b, 3.0).unwrap();
        // 两个方向都可见，指向同一条记录
        assert_eq!(graph.edge(a, b).map(|e| e.id()), Some(e));
        assert_eq!(graph.edge(b, a).map(|e| e.id()), Some(e));
        assert_eq!(graph.edge_count(), 1);

        // 从反方向更新权重，正方向同步变化
        graph.add_edge(b, a, 9.0).unwrap();
        assert_eq!(graph.edge(a, b).map(|e| *e.weight()), Some(9.0));

        // 只摘除一条腿，另一条腿存活
        graph.remove_edge(a, b).unwrap();
        assert!(graph.edge(a, b).is_none());
        assert_eq!(graph.edge(b, a).map(|e| e.id()), Some(e));
        assert_eq!(graph.edge_count(), 1);

        graph.remove_edge(b, a).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_remove_missing_edge_is_noop() {
        let mut graph: Graph<u32, f64> = Graph::directed();
        let a = graph.add_node(1).unwrap();
        let b = graph.add_node(2).unwrap();

        assert!(graph.remove_edge(a, b).is_ok());
        assert!(matches!(
            graph.remove_edge(a, NodeId::new(42)),
            Err(Error::UnknownNode(_))
        ));
    }

    #[test]
    fn test_remove_node_no_dangling() {
        let mut graph: Graph<u32, f64> = Graph::directed();
        let a = graph.add_node(1).unwrap();
        let b = graph.add_node(2).unwrap();
        let c = graph.add_node(3).unwrap();

        graph.add_edge(a, b, 1.0).unwrap();
        graph.add_edge(b, c, 1.0).unwrap();
        graph.add_edge(c, a, 1.0).unwrap();

        graph.remove_node(b).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.neighbors(a), Vec::<NodeId>::new());
        assert_eq!(graph.predecessors(c), Vec::<NodeId>::new());
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edge(c, a).is_some());

        // 值可以重新注册
        assert!(graph.add_node(2).is_ok());
    }

    #[test]
    fn test_remove_node_undirected() {
        let mut graph: Graph<u32, f64> = Graph::undirected();
        let a = graph.add_node(1).unwrap();
        let b = graph.add_node(2).unwrap();
        graph.add_edge(a, b, 1.0).unwrap();

        graph.remove_node(a).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.neighbors(b), Vec::<NodeId>::new());
        assert_eq!(graph.predecessors(b), Vec::<NodeId>::new());
    }
}
