use super::TraitNode;
use crate::nn::ParameterId;

/// 模型参数在某张计算图中的副本。反向传播后，其梯度按`ParameterId`汇总
#[derive(Debug, Clone)]
pub(in crate::nn) struct Parameter {
    param_id: ParameterId,
}

impl Parameter {
    pub(in crate::nn) fn new(param_id: ParameterId) -> Self {
        Self { param_id }
    }

    pub(in crate::nn) fn param_id(&self) -> ParameterId {
        self.param_id
    }
}

impl TraitNode for Parameter {
    fn name(&self) -> &'static str {
        "Parameter"
    }

    fn is_leaf(&self) -> bool {
        true
    }
}
