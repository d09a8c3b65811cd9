use super::super::{TraitNode, check_parent_count, check_same_shape};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 逐元素相乘（Hadamard积）
///
/// forward: a ⊙ b
/// backward: 对a为g ⊙ b，对b为g ⊙ a
#[derive(Debug, Clone)]
pub(in crate::nn) struct CMult;

impl CMult {
    pub(in crate::nn) fn new(parent_count: usize) -> Result<Self, GraphError> {
        check_parent_count("CMult", parent_count, 2)?;
        Ok(Self)
    }
}

impl TraitNode for CMult {
    fn name(&self) -> &'static str {
        "CMult"
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_same_shape(self.name(), parents)?;
        Ok(parents[0] * parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let other = parents[1 - index];
        Ok(upstream * other)
    }
}
