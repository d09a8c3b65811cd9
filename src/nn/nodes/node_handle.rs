use super::raw_node::{NodeType, TraitNode};
use super::NodeId;
use crate::nn::GraphError;
use crate::tensor::Tensor;
use std::fmt;

/// 计算图中的一个节点：节点类型、父节点编号，以及前向值与反向梯度的缓存
#[derive(Debug, Clone)]
pub(in crate::nn) struct NodeHandle {
    id: NodeId,
    raw_node: NodeType,
    parents: Vec<NodeId>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl NodeHandle {
    pub(in crate::nn) fn new(
        id: NodeId,
        raw_node: NodeType,
        parents: Vec<NodeId>,
        value: Option<Tensor>,
    ) -> Self {
        Self {
            id,
            raw_node,
            parents,
            value,
            grad: None,
        }
    }

    pub(in crate::nn) fn id(&self) -> NodeId {
        self.id
    }

    pub(in crate::nn) fn raw_node(&self) -> &NodeType {
        &self.raw_node
    }

    pub(in crate::nn) fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// 叶子节点（输入、参数、查找表行）的值在创建时给定
    pub(in crate::nn) fn is_leaf(&self) -> bool {
        self.raw_node.is_leaf()
    }

    pub(in crate::nn) fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    pub(in crate::nn) fn set_value(&mut self, value: Tensor) {
        self.value = Some(value);
    }

    pub(in crate::nn) fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    pub(in crate::nn) fn set_grad(&mut self, grad: Tensor) {
        self.grad = Some(grad);
    }

    pub(in crate::nn) fn clear_grad(&mut self) {
        self.grad = None;
    }

    /// 累加来自某个子节点的梯度
    pub(in crate::nn) fn accumulate_grad(&mut self, grad: Tensor) -> Result<(), GraphError> {
        match self.grad.as_mut() {
            Some(existing) => {
                if !existing.is_same_shape(&grad) {
                    return Err(GraphError::ShapeMismatch {
                        expected: existing.shape().to_vec(),
                        got: grad.shape().to_vec(),
                        message: format!("{self}收到的梯度形状与已累积的梯度不一致"),
                    });
                }
                existing.add_assign_tensor(&grad);
            }
            None => self.grad = Some(grad),
        }
        Ok(())
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "节点[{}{}]", self.raw_node.name(), self.id())
    }
}
