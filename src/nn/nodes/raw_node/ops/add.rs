use super::super::{TraitNode, check_min_parent_count, check_same_shape};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 逐元素相加（2个及以上同形父节点）
#[derive(Debug, Clone)]
pub(in crate::nn) struct Add;

impl Add {
    pub(in crate::nn) fn new(parent_count: usize) -> Result<Self, GraphError> {
        check_min_parent_count("Add", parent_count, 2)?;
        Ok(Self)
    }
}

impl TraitNode for Add {
    fn name(&self) -> &'static str {
        "Add"
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_same_shape(self.name(), parents)?;
        let mut value = parents[0].clone();
        for parent in &parents[1..] {
            value.add_assign_tensor(parent);
        }
        Ok(value)
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream.clone())
    }
}
