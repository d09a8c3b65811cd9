use super::super::{TraitNode, check_same_shape};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 把若干同形节点（通常是逐词的损失）加总成一个节点
#[derive(Debug, Clone)]
pub(in crate::nn) struct Sum;

impl Sum {
    pub(in crate::nn) fn new(parent_count: usize) -> Result<Self, GraphError> {
        if parent_count == 0 {
            return Err(GraphError::InvalidOperation(
                "sum节点至少需要1个父节点".to_string(),
            ));
        }
        Ok(Self)
    }
}

impl TraitNode for Sum {
    fn name(&self) -> &'static str {
        "Sum"
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
