/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : ComputationGraph VJP 反向传播
 */

use super::core::{ComputationGraph, Expression};
use super::error::GraphError;
use super::gradients::Gradients;
use crate::nn::nodes::{NodeType, TraitNode};
use crate::tensor::Tensor;

impl ComputationGraph {
    /// 从标量损失`loss`开始，按创建顺序的逆序把梯度传回所有上游节点。
    /// 若损失尚未计算，会先做一次增量前向传播
    pub fn backward(&mut self, loss: Expression) -> Result<(), GraphError> {
        let loss_id = self.resolve(loss)?;
        let loss_shape = self.incremental_forward(loss)?.shape().to_vec();
        if loss_shape != [1, 1] {
            return Err(GraphError::InvalidOperation(format!(
                "反向传播要求损失为标量[1, 1]，但得到{loss_shape:?}"
            )));
        }

        for node in self.nodes_mut() {
            node.clear_grad();
        }
        self.nodes_mut()[loss_id.index()].set_grad(Tensor::ones(&[1, 1]));

        for index in (0..=loss_id.index()).rev() {
            let parent_grads = {
                let node = &self.nodes()[index];
                let upstream = match node.grad() {
                    Some(grad) if !node.is_leaf() => grad,
                    _ => continue,
                };
                let value = node.value().ok_or_else(|| {
                    GraphError::ComputationError(format!("{node}没有值，无法计算梯度"))
                })?;
                let parents = self.parent_values(node)?;
                (0..parents.len())
                    .map(|i| {
                        node.raw_node()
                            .calc_grad_to_parent(i, &parents, value, upstream)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            };
            let parent_ids = self.nodes()[index].parents().to_vec();
            for (parent_id, grad) in parent_ids.into_iter().zip(parent_grads) {
                self.nodes_mut()[parent_id.index()].accumulate_grad(grad)?;
            }
        }
        Ok(())
    }

    /// 汇总上次`backward`后各参数与查找表行的梯度。
    /// 同一参数在图中出现多次（如同一个词被查了多次）时梯度会被累加
    pub fn gradients(&self) -> Gradients {
        let mut grads = Gradients::default();
        for node in self.nodes() {
            let Some(grad) = node.grad() else {
                continue;
            };
            match node.raw_node() {
                NodeType::Parameter(p) => grads.accumulate_param(p.param_id(), grad),
                NodeType::Lookup(l) => grads.accumulate_lookup(l.table_id(), l.row(), grad),
                _ => {}
            }
        }
        grads
    }

    /// 某个节点在上次`backward`后的梯度（测试与调试用）
    pub fn grad(&self, expr: Expression) -> Result<Option<&Tensor>, GraphError> {
        let id = self.resolve(expr)?;
        Ok(self.get_node(id)?.grad())
    }
}
