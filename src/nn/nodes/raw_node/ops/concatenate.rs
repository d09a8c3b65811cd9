use super::super::{TraitNode, check_matrix, check_min_parent_count};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 沿行方向拼接若干列数相同的节点。反向时把上游梯度按行切回各父节点
#[derive(Debug, Clone)]
pub(in crate::nn) struct Concatenate;

impl Concatenate {
    pub(in crate::nn) fn new(parent_count: usize) -> Result<Self, GraphError> {
        check_min_parent_count("Concatenate", parent_count, 1)?;
        Ok(Self)
    }
}

impl TraitNode for Concatenate {
    fn name(&self) -> &'static str {
        "Concatenate"
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let first = parents[0];
        check_matrix(self.name(), first)?;
        for other in &parents[1..] {
            check_matrix(self.name(), other)?;
            if other.shape()[1] != first.shape()[1] {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![other.shape()[0], first.shape()[1]],
                    got: other.shape().to_vec(),
                    message: "Concatenate节点的所有父节点列数须一致".to_string(),
                });
            }
        }
        Ok(Tensor::concat_rows(parents))
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let start: usize = parents[..index].iter().map(|p| p.rows()).sum();
        let end = start + parents[index].rows();
        Ok(upstream.slice_rows(start, end))
    }
}
