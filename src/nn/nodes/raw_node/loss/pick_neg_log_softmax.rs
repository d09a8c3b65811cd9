use super::super::{TraitNode, check_parent_count};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 对列向量x做softmax后取第`index`个分量的负对数，即单个样本的交叉熵损失
///
/// forward: -log softmax(x)[index]，形状为[1, 1]
/// backward: g · (softmax(x) - onehot(index))
#[derive(Debug, Clone)]
pub(in crate::nn) struct PickNegLogSoftmax {
    index: usize,
}

impl PickNegLogSoftmax {
    pub(in crate::nn) fn new(parent_count: usize, index: usize) -> Result<Self, GraphError> {
        check_parent_count("PickNegLogSoftmax", parent_count, 1)?;
        Ok(Self { index })
    }

    fn check_input(&self, x: &Tensor) -> Result<(), GraphError> {
        if !x.is_column() {
            return Err(GraphError::ShapeMismatch {
                expected: vec![x.rows(), 1],
                got: x.shape().to_vec(),
                message: "PickNegLogSoftmax的输入须为列向量".to_string(),
            });
        }
        if self.index >= x.rows() {
            return Err(GraphError::IndexOutOfRange {
                index: self.index,
                len: x.rows(),
                message: "PickNegLogSoftmax的目标类别超出了输入的维度".to_string(),
            });
        }
        Ok(())
    }
}

impl TraitNode for PickNegLogSoftmax {
    fn name(&self) -> &'static str {
        "PickNegLogSoftmax"
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let x = parents[0];
        self.check_input(x)?;
        let log_probs = x.log_softmax();
        Ok(Tensor::scalar(-log_probs.data_as_slice()[self.index]))
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let g = upstream.number().ok_or_else(|| {
            GraphError::ComputationError(format!(
                "PickNegLogSoftmax的上游梯度须为标量，但得到形状{:?}",
                upstream.shape()
            ))
        })?;
        let mut grad = parents[0].softmax();
        grad.data_as_slice_mut()[self.index] -= 1.0;
        Ok(g * grad)
    }
}
