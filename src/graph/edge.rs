//! 边定义

use crate::graph::node::NodeId;
use serde::{Deserialize, Serialize};

/// 边 ID（图内唯一句柄）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// 边的高亮状态
///
/// 供外部展示层着色使用：空闲、最短路/生成树边、饱和弧、载流弧。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeState {
    Idle,
    OnTree,
    Saturated,
    Carrying,
}

/// 边
///
/// 从 `from` 指向 `to` 的带权弧。无向图中同一条记录同时挂在两个方向的
/// 邻接视图下，权重与高亮状态天然保持同步。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<K> {
    id: EdgeId,
    from: NodeId,
    to: NodeId,
    pub(crate) weight: K,
    pub(crate) state: EdgeState,
}

impl<K> Edge<K> {
    pub(crate) fn new(id: EdgeId, from: NodeId, to: NodeId, weight: K) -> Self {
        Self {
            id,
            from,
            to,
            weight,
            state: EdgeState::Idle,
        }
    }

    /// 获取边 ID
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// 获取源节点 ID
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// 获取目标节点 ID
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// 获取权重
    pub fn weight(&self) -> &K {
        &self.weight
    }

    /// 获取高亮状态
    pub fn state(&self) -> EdgeState {
        self.state
    }
}
