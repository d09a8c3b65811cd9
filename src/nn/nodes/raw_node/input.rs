use super::TraitNode;

/// 常量输入节点，不接收梯度
#[derive(Debug, Clone)]
pub(in crate::nn) struct Input;

impl TraitNode for Input {
    fn name(&self) -> &'static str {
        "Input"
    }

    fn is_leaf(&self) -> bool {
        true
    }
}
