use crate::nn::NodeId;
use thiserror::Error;

/// 计算图、模型参数、网络层与优化器共用的错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("表达式属于计算图{got}，不能在计算图{expected}中使用")]
    ForeignExpression { expected: u64, got: u64 },
    #[error("节点{0}不存在")]
    NodeNotFound(NodeId),
    #[error("无效操作：{0}")]
    InvalidOperation(String),
    #[error("形状不匹配（预期{expected:?}，实际{got:?}）：{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    #[error("下标{index}越界（长度为{len}）：{message}")]
    IndexOutOfRange {
        index: usize,
        len: usize,
        message: String,
    },
    #[error("计算错误：{0}")]
    ComputationError(String),
    #[error("参数名`{0}`已存在")]
    DuplicateName(String),
    #[error("参数`{0}`不存在")]
    ParameterNotFound(String),
}
