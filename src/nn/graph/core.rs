/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : ComputationGraph 核心：节点存储、表达式校验与前向传播
 */

use super::error::GraphError;
use crate::nn::nodes::{NodeHandle, NodeId, NodeType, TraitNode};
use crate::tensor::Tensor;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// 计算图中某个节点的句柄。句柄记录了创建它的图的编号，
/// 拿到别的图里使用会得到`GraphError::ForeignExpression`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Expression {
    graph_id: u64,
    node_id: NodeId,
}

impl Expression {
    pub fn graph_id(&self) -> u64 {
        self.graph_id
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }
}

/// 单次使用的有向无环计算图。节点按创建顺序追加，创建顺序即拓扑序。
///
/// 叶子节点（输入、参数、查找表行）在创建时就复制好了值，
/// 所以图不借用模型，模型可以在图存活期间被优化器修改
#[derive(Debug)]
pub struct ComputationGraph {
    id: u64,
    nodes: Vec<NodeHandle>,
}

impl Default for ComputationGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputationGraph {
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
        }
    }

    /// 进程内唯一的图编号
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    // ========== 节点管理 ==========

    pub(in crate::nn::graph) fn resolve(&self, expr: Expression) -> Result<NodeId, GraphError> {
        if expr.graph_id != self.id {
            return Err(GraphError::ForeignExpression {
                expected: self.id,
                got: expr.graph_id,
            });
        }
        if expr.node_id.index() >= self.nodes.len() {
            return Err(GraphError::NodeNotFound(expr.node_id));
        }
        Ok(expr.node_id)
    }

    pub(in crate::nn::graph) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(id.index()).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn::graph) fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }

    pub(in crate::nn::graph) fn nodes_mut(&mut self) -> &mut [NodeHandle] {
        &mut self.nodes
    }

    pub(in crate::nn::graph) fn push_node(
        &mut self,
        raw_node: NodeType,
        parents: Vec<NodeId>,
        value: Option<Tensor>,
    ) -> Expression {
        let node_id = NodeId(self.nodes.len());
        self.nodes
            .push(NodeHandle::new(node_id, raw_node, parents, value));
        Expression {
            graph_id: self.id,
            node_id,
        }
    }

    /// 校验所有父表达式属于本图后再追加节点
    pub(in crate::nn::graph) fn add_node(
        &mut self,
        raw_node: NodeType,
        parents: &[Expression],
    ) -> Result<Expression, GraphError> {
        let parent_ids = parents
            .iter()
            .map(|p| self.resolve(*p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.push_node(raw_node, parent_ids, None))
    }

    // ========== 前向传播 ==========

    /// 重新计算`expr`及其之前创建的所有非叶子节点，返回`expr`的值
    pub fn forward(&mut self, expr: Expression) -> Result<&Tensor, GraphError> {
        let target = self.resolve(expr)?;
        for index in 0..=target.index() {
            if !self.nodes[index].is_leaf() {
                self.compute_node(index)?;
            }
        }
        self.value(expr)
    }

    /// 只计算尚无值的节点。逐步生成时每一步都只需算新追加的那部分
    pub fn incremental_forward(&mut self, expr: Expression) -> Result<&Tensor, GraphError> {
        let target = self.resolve(expr)?;
        for index in 0..=target.index() {
            if self.nodes[index].value().is_none() {
                self.compute_node(index)?;
            }
        }
        self.value(expr)
    }

    /// 返回已计算好的节点值
    pub fn value(&self, expr: Expression) -> Result<&Tensor, GraphError> {
        let id = self.resolve(expr)?;
        let node = self.get_node(id)?;
        node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("{node}没有值，请先执行forward"))
        })
    }

    fn compute_node(&mut self, index: usize) -> Result<(), GraphError> {
        let value = {
            let node = &self.nodes[index];
            let parents = self.parent_values(node)?;
            node.raw_node().calc_value_by_parents(&parents)?
        };
        self.nodes[index].set_value(value);
        Ok(())
    }

    pub(in crate::nn::graph) fn parent_values<'a>(
        &'a self,
        node: &NodeHandle,
    ) -> Result<Vec<&'a Tensor>, GraphError> {
        node.parents()
            .iter()
            .map(|parent_id| {
                let parent = self.get_node(*parent_id)?;
                parent.value().ok_or_else(|| {
                    GraphError::ComputationError(format!(
                        "{node}的父节点{parent}没有值。不该触及本错误，否则说明crate代码有问题"
                    ))
                })
            })
            .collect()
    }
}
