/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 合并层：对多个输入各乘一个独立权重后相加，再加偏置，
 *                 等价于对拼接后的输入做一次全连接
 */

use super::unbound_error;
use crate::nn::{ComputationGraph, Expression, GraphError, ParameterCollection, ParameterId};

#[derive(Debug, Clone)]
struct AffineMerge {
    weights: Vec<ParameterId>,
    bias: ParameterId,
    exprs: Option<(Vec<Expression>, Expression)>,
}

impl AffineMerge {
    fn new(
        model: &mut ParameterCollection,
        name: &str,
        input_dims: &[usize],
        output_dim: usize,
    ) -> Result<Self, GraphError> {
        let weights = input_dims
            .iter()
            .enumerate()
            .map(|(k, &dim)| model.add_parameters(&format!("{name}_W{}", k + 1), &[output_dim, dim]))
            .collect::<Result<Vec<_>, _>>()?;
        let bias = model.add_parameters(&format!("{name}_b"), &[output_dim, 1])?;
        Ok(Self {
            weights,
            bias,
            exprs: None,
        })
    }

    fn new_graph(
        &mut self,
        cg: &mut ComputationGraph,
        model: &ParameterCollection,
    ) -> Result<(), GraphError> {
        let weights = self
            .weights
            .iter()
            .map(|&w| cg.parameter(model, w))
            .collect::<Result<Vec<_>, _>>()?;
        let bias = cg.parameter(model, self.bias)?;
        self.exprs = Some((weights, bias));
        Ok(())
    }

    /// 用前`xs.len()`个权重合并输入
    fn build(
        &self,
        cg: &mut ComputationGraph,
        xs: &[Expression],
        layer: &str,
    ) -> Result<Expression, GraphError> {
        let (weights, bias) = self.exprs.as_ref().ok_or_else(|| unbound_error(layer))?;
        let mut args = Vec::with_capacity(1 + 2 * xs.len());
        args.push(*bias);
        for (w, x) in weights.iter().zip(xs) {
            args.push(*w);
            args.push(*x);
        }
        cg.affine_transform(&args)
    }
}

/// 两路输入的合并层：W1·x1 + W2·x2 + b
#[derive(Debug, Clone)]
pub struct Merge2Layer {
    inner: AffineMerge,
}

impl Merge2Layer {
    pub fn new(
        model: &mut ParameterCollection,
        name: &str,
        input1_dim: usize,
        input2_dim: usize,
        output_dim: usize,
    ) -> Result<Self, GraphError> {
        let inner = AffineMerge::new(model, name, &[input1_dim, input2_dim], output_dim)?;
        Ok(Self { inner })
    }

    pub fn new_graph(
        &mut self,
        cg: &mut ComputationGraph,
        model: &ParameterCollection,
    ) -> Result<(), GraphError> {
        self.inner.new_graph(cg, model)
    }

    pub fn build(
        &self,
        cg: &mut ComputationGraph,
        x1: Expression,
        x2: Expression,
    ) -> Result<Expression, GraphError> {
        self.inner.build(cg, &[x1, x2], "Merge2Layer")
    }
}

/// 三路输入的合并层：W1·x1 + W2·x2 + W3·x3 + b
#[derive(Debug, Clone)]
pub struct Merge3Layer {
    inner: AffineMerge,
}

impl Merge3Layer {
    pub fn new(
        model: &mut ParameterCollection,
        name: &str,
        input_dims: [usize; 3],
        output_dim: usize,
    ) -> Result<Self, GraphError> {
        let inner = AffineMerge::new(model, name, &input_dims, output_dim)?;
        Ok(Self { inner })
    }

    pub fn new_graph(
        &mut self,
        cg: &mut ComputationGraph,
        model: &ParameterCollection,
    ) -> Result<(), GraphError> {
        self.inner.new_graph(cg, model)
    }

    pub fn build(
        &self,
        cg: &mut ComputationGraph,
        x1: Expression,
        x2: Expression,
        x3: Expression,
    ) -> Result<Expression, GraphError> {
        self.inner.build(cg, &[x1, x2, x3], "Merge3Layer")
    }
}

/// 最多三路输入的合并层。输入k（1 ≤ k ≤ 3）路时只用前k个权重，
/// 用于合并长度不定（最多3句）的历史编码
#[derive(Debug, Clone)]
pub struct MergeMax3Layer {
    inner: AffineMerge,
}

impl MergeMax3Layer {
    pub fn new(
        model: &mut ParameterCollection,
        name: &str,
        input_dims: [usize; 3],
        output_dim: usize,
    ) -> Result<Self, GraphError> {
        let inner = AffineMerge::new(model, name, &input_dims, output_dim)?;
        Ok(Self { inner })
    }

    pub fn new_graph(
        &mut self,
        cg: &mut ComputationGraph,
        model: &ParameterCollection,
    ) -> Result<(), GraphError> {
        self.inner.new_graph(cg, model)
    }

    pub fn build(&self, cg: &mut ComputationGraph, xs: &[Expression]) -> Result<Expression, GraphError> {
        if xs.is_empty() || xs.len() > 3 {
            return Err(GraphError::InvalidOperation(format!(
                "MergeMax3Layer只接受1到3个输入，但得到{}个",
                xs.len()
            )));
        }
        self.inner.build(cg, xs, "MergeMax3Layer")
    }
}
