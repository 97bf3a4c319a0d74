//! 通用权重类型定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 流量权重
///
/// 流量算法族使用的权重特化类型。`flow` 为当前流量（在残余反向弧上可以为负），
/// `capacity` 为正向剩余容量。最小费用流算法复用同一结构，把 `flow` 字段
/// 解释为单位费用，`capacity` 解释为剩余容量。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowWeight {
    /// 当前流量（最小费用流场景下为单位费用）
    pub flow: i64,
    /// 剩余容量
    pub capacity: i64,
}

impl FlowWeight {
    pub fn new(flow: i64, capacity: i64) -> Self {
        Self { flow, capacity }
    }

    /// 仅给定容量的零流权重
    pub fn with_capacity(capacity: i64) -> Self {
        Self { flow: 0, capacity }
    }

    /// 正向可用容量
    pub fn available(&self) -> i64 {
        self.capacity - self.flow
    }
}

impl fmt::Display for FlowWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.flow, self.capacity)
    }
}
