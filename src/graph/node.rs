//! 节点定义
//!
//! 节点身份由不可变的用户值决定；算法草稿状态（距离、父节点）
//! 保存在图持有的独立表中，通过句柄寻址。

use serde::{Deserialize, Serialize};

/// 节点 ID（图内唯一句柄）
///
/// `NodeId(0)` 保留给最小费用流的临时超级源点，`add_node` 从 1 开始分配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// 节点
///
/// 用户值的身份包装。两个节点相等当且仅当值相等；值注册后不再变化，
/// 因此节点可以安全地用作映射键。可变的算法状态不在这里。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node<T> {
    id: NodeId,
    value: T,
}

impl<T> Node<T> {
    pub(crate) fn new(id: NodeId, value: T) -> Self {
        Self { id, value }
    }

    /// 获取节点 ID
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// 获取节点值
    pub fn value(&self) -> &T {
        &self.value
    }
}

/// 每个节点的算法草稿状态
///
/// 每次算法入口都会整体重置：距离为正无穷哨兵，父节点为空。
#[derive(Debug, Clone, Copy)]
pub struct NodeScratch {
    /// 标号距离（未触达时为 +inf）
    pub distance: f64,
    /// 发现该节点的前驱
    pub parent: Option<NodeId>,
}

impl Default for NodeScratch {
    fn default() -> Self {
        Self {
            distance: f64::INFINITY,
            parent: None,
        }
    }
}
