//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("节点已存在: {0}")]
    DuplicateNode(String),

    #[error("节点未注册: {0}")]
    UnknownNode(String),

    #[error("无效操作: {0}")]
    InvalidOperation(String),

    #[error("供需不平衡: 总供给 {supply}, 总需求 {demand}")]
    Imbalance { supply: i64, demand: i64 },

    #[error("检测到可达的负权环")]
    NegativeCycle,

    #[error("剩余供给无法到达任何需求节点")]
    Unreachable,

    #[error("内部错误: {0}")]
    Internal(String),
}
