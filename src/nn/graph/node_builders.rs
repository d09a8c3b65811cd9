/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : ComputationGraph 节点创建方法
 */

use super::core::{ComputationGraph, Expression};
use super::error::GraphError;
use crate::nn::nodes::raw_node::{
    Add, AffineTransform, CMult, Concatenate, Input, Logistic, Lookup, Parameter, PickNegLogSoftmax,
    PickRange, Rectify, Sum, Tanh,
};
use crate::nn::{LookupParameterId, ParameterCollection, ParameterId};
use crate::tensor::Tensor;

impl ComputationGraph {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓叶子节点↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    /// 常量输入
    pub fn input(&mut self, value: Tensor) -> Expression {
        self.push_node(Input.into(), Vec::new(), Some(value))
    }

    /// 把模型参数的当前值复制进本图
    pub fn parameter(
        &mut self,
        model: &ParameterCollection,
        id: ParameterId,
    ) -> Result<Expression, GraphError> {
        let value = model.parameter(id)?.clone();
        Ok(self.push_node(Parameter::new(id).into(), Vec::new(), Some(value)))
    }

    /// 取查找表的第`row`行（形状[dim, 1]）
    pub fn lookup(
        &mut self,
        model: &ParameterCollection,
        id: LookupParameterId,
        row: usize,
    ) -> Result<Expression, GraphError> {
        let value = model.lookup_row(id, row)?.clone();
        Ok(self.push_node(Lookup::new(id, row).into(), Vec::new(), Some(value)))
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑叶子节点↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    /// `xs`形如`[b, W1, x1, W2, x2, ...]`，结果为`b + Σ Wi·xi`
    pub fn affine_transform(&mut self, xs: &[Expression]) -> Result<Expression, GraphError> {
        let node = AffineTransform::new(xs.len())?;
        self.add_node(node.into(), xs)
    }

    pub fn add(&mut self, xs: &[Expression]) -> Result<Expression, GraphError> {
        let node = Add::new(xs.len())?;
        self.add_node(node.into(), xs)
    }

    /// 逐元素相乘
    pub fn cmult(&mut self, a: Expression, b: Expression) -> Result<Expression, GraphError> {
        let node = CMult::new(2)?;
        self.add_node(node.into(), &[a, b])
    }

    pub fn tanh(&mut self, x: Expression) -> Result<Expression, GraphError> {
        let node = Tanh::new(1)?;
        self.add_node(node.into(), &[x])
    }

    pub fn logistic(&mut self, x: Expression) -> Result<Expression, GraphError> {
        let node = Logistic::new(1)?;
        self.add_node(node.into(), &[x])
    }

    pub fn rectify(&mut self, x: Expression) -> Result<Expression, GraphError> {
        let node = Rectify::new(1)?;
        self.add_node(node.into(), &[x])
    }

    /// 按行（纵向）拼接
    pub fn concatenate(&mut self, xs: &[Expression]) -> Result<Expression, GraphError> {
        let node = Concatenate::new(xs.len())?;
        self.add_node(node.into(), xs)
    }

    /// 取第[start, end)行
    pub fn pick_range(
        &mut self,
        x: Expression,
        start: usize,
        end: usize,
    ) -> Result<Expression, GraphError> {
        let node = PickRange::new(1, start, end)?;
        self.add_node(node.into(), &[x])
    }

    /// 把同形节点加总，常用于把逐词损失汇总成整体损失
    pub fn sum(&mut self, xs: &[Expression]) -> Result<Expression, GraphError> {
        let node = Sum::new(xs.len())?;
        self.add_node(node.into(), xs)
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /// 交叉熵损失：`-log softmax(x)[index]`
    pub fn pick_neg_log_softmax(
        &mut self,
        x: Expression,
        index: usize,
    ) -> Result<Expression, GraphError> {
        let node = PickNegLogSoftmax::new(1, index)?;
        self.add_node(node.into(), &[x])
    }
}
