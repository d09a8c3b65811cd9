use super::super::{TraitNode, check_matrix};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 仿射变换节点，父节点依次为`[b, W1, x1, W2, x2, ...]`
///
/// forward: b + Σ Wi·xi
/// backward: 对b为g，对Wi为g·xiᵀ，对xi为Wiᵀ·g
#[derive(Debug, Clone)]
pub(in crate::nn) struct AffineTransform;

impl AffineTransform {
    pub(in crate::nn) fn new(parent_count: usize) -> Result<Self, GraphError> {
        if parent_count < 3 || parent_count % 2 == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "AffineTransform节点需要[b, W1, x1, W2, x2, ...]形式的奇数个（至少3个）父节点，但得到{parent_count}个"
            )));
        }
        Ok(Self)
    }
}

impl TraitNode for AffineTransform {
    fn name(&self) -> &'static str {
        "AffineTransform"
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let mut value = parents[0].clone();
        check_matrix(self.name(), &value)?;
        for pair in parents[1..].chunks(2) {
            let (w, x) = (pair[0], pair[1]);
            check_matrix(self.name(), w)?;
            check_matrix(self.name(), x)?;
            if w.shape()[1] != x.shape()[0] {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![w.shape()[1], x.shape()[1]],
                    got: x.shape().to_vec(),
                    message: format!("权重{:?}无法与输入相乘", w.shape()),
                });
            }
            let product = w.mat_mul(x);
            if !product.is_same_shape(&value) {
                return Err(GraphError::ShapeMismatch {
                    expected: value.shape().to_vec(),
                    got: product.shape().to_vec(),
                    message: "W·x的形状与偏置不一致".to_string(),
                });
            }
            value.add_assign_tensor(&product);
        }
        Ok(value)
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if index == 0 {
            Ok(upstream.clone())
        } else if index % 2 == 1 {
            let x = parents[index + 1];
            Ok(upstream.mat_mul(&x.transpose()))
        } else {
            let w = parents[index - 1];
            Ok(w.transpose().mat_mul(upstream))
        }
    }
}
