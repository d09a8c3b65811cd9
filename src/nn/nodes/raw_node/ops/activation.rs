/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 逐元素激活函数节点。三者的导数都可以只由本节点的值求出，
 *                 所以反向传播时不需要再访问父节点
 */

use super::super::{TraitNode, check_parent_count};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// Tanh激活函数节点
///
/// forward: tanh(x)
/// backward: d(tanh)/dx = 1 - tanh²(x)
#[derive(Debug, Clone)]
pub(in crate::nn) struct Tanh;

impl Tanh {
    pub(in crate::nn) fn new(parent_count: usize) -> Result<Self, GraphError> {
        check_parent_count("Tanh", parent_count, 1)?;
        Ok(Self)
    }
}

impl TraitNode for Tanh {
    fn name(&self) -> &'static str {
        "Tanh"
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].tanh())
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let tanh_squared = value * value;
        let local_grad = 1.0 - &tanh_squared;
        Ok(upstream * &local_grad)
    }
}

/// Logistic（sigmoid）激活函数节点
///
/// forward: σ(x) = 1 / (1 + e^(-x))
/// backward: σ(x)·(1 - σ(x))
#[derive(Debug, Clone)]
pub(in crate::nn) struct Logistic;

impl Logistic {
    pub(in crate::nn) fn new(parent_count: usize) -> Result<Self, GraphError> {
        check_parent_count("Logistic", parent_count, 1)?;
        Ok(Self)
    }
}

impl TraitNode for Logistic {
    fn name(&self) -> &'static str {
        "Logistic"
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].sigmoid())
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let one_minus = 1.0 - value;
        let local_grad = value * &one_minus;
        Ok(upstream * &local_grad)
    }
}

/// ReLU激活函数节点
///
/// forward: max(0, x)
/// backward: x > 0 时为1，否则为0
#[derive(Debug, Clone)]
pub(in crate::nn) struct Rectify;

impl Rectify {
    pub(in crate::nn) fn new(parent_count: usize) -> Result<Self, GraphError> {
        check_parent_count("Rectify", parent_count, 1)?;
        Ok(Self)
    }
}

impl TraitNode for Rectify {
    fn name(&self) -> &'static str {
        "Rectify"
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].rectify())
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let mask = value.map(|v| if v > 0.0 { 1.0 } else { 0.0 });
        Ok(upstream * &mask)
    }
}
