mod input;
mod lookup;
mod loss;
mod ops;
mod parameter;

pub(in crate::nn) use input::Input;
pub(in crate::nn) use lookup::Lookup;
pub(in crate::nn) use loss::PickNegLogSoftmax;
pub(in crate::nn) use ops::*;
pub(in crate::nn) use parameter::Parameter;

use crate::nn::GraphError;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Debug, Clone)]
pub(in crate::nn) enum NodeType {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓叶子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Input(Input),
    Parameter(Parameter),
    Lookup(Lookup),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑叶子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    AffineTransform(AffineTransform),
    Add(Add),
    CMult(CMult),
    Tanh(Tanh),
    Logistic(Logistic),
    Rectify(Rectify),
    Concatenate(Concatenate),
    PickRange(PickRange),
    Sum(Sum),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    PickNegLogSoftmax(PickNegLogSoftmax),
}

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    fn name(&self) -> &'static str;

    fn is_leaf(&self) -> bool {
        false
    }

    // 根据父节点的值计算本节点的值（调用时所有父节点的值都已计算好）
    fn calc_value_by_parents(&self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "{}节点的值在创建时给定，不由父节点计算",
            self.name()
        )))
    }

    /// 给定上游梯度`upstream`（损失对本节点值的梯度），计算损失对第`index`个父节点的梯度（VJP）
    fn calc_grad_to_parent(
        &self,
        _index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        _upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "{}节点没有父节点，不应向其父节点传播梯度",
            self.name()
        )))
    }
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓节点构造时的校验↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
fn check_parent_count(name: &str, got: usize, expected: usize) -> Result<(), GraphError> {
    if got != expected {
        return Err(GraphError::InvalidOperation(format!(
            "{name}节点需要{expected}个父节点，但得到{got}个"
        )));
    }
    Ok(())
}

fn check_min_parent_count(name: &str, got: usize, min: usize) -> Result<(), GraphError> {
    if got < min {
        return Err(GraphError::InvalidOperation(format!(
            "{name}节点至少需要{min}个父节点"
        )));
    }
    Ok(())
}

fn check_matrix(name: &str, tensor: &Tensor) -> Result<(), GraphError> {
    if tensor.dimension() != 2 {
        return Err(GraphError::InvalidOperation(format!(
            "{name}节点只接受2阶张量，但得到形状{:?}",
            tensor.shape()
        )));
    }
    Ok(())
}

fn check_same_shape(name: &str, parents: &[&Tensor]) -> Result<(), GraphError> {
    let first = parents[0];
    for other in &parents[1..] {
        if !first.is_same_shape(other) {
            return Err(GraphError::ShapeMismatch {
                expected: first.shape().to_vec(),
                got: other.shape().to_vec(),
                message: format!("{name}节点的所有父节点形状须一致"),
            });
        }
    }
    Ok(())
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑节点构造时的校验↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
