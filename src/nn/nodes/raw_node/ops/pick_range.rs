use super::super::{TraitNode, check_parent_count};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 取父节点的第[start, end)行
#[derive(Debug, Clone)]
pub(in crate::nn) struct PickRange {
    start: usize,
    end: usize,
}

impl PickRange {
    pub(in crate::nn) fn new(parent_count: usize, start: usize, end: usize) -> Result<Self, GraphError> {
        check_parent_count("PickRange", parent_count, 1)?;
        if start >= end {
            return Err(GraphError::InvalidOperation(format!(
                "PickRange的区间[{start}, {end})为空"
            )));
        }
        Ok(Self { start, end })
    }
}

impl TraitNode for PickRange {
    fn name(&self) -> &'static str {
        "PickRange"
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let rows = parents[0].rows();
        if self.end > rows {
            return Err(GraphError::IndexOutOfRange {
                index: self.end,
                len: rows,
                message: format!("PickRange的区间[{}, {})超出了父节点的行数", self.start, self.end),
            });
        }
        Ok(parents[0].slice_rows(self.start, self.end))
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream.pad_rows(parents[0].rows(), self.start))
    }
}
