/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 反向传播后按参数汇总的梯度
 */

use crate::nn::{LookupParameterId, ParameterId};
use crate::tensor::Tensor;
use std::collections::BTreeMap;

/// 一次反向传播得到的、按参数汇总后的梯度集合，交给优化器使用
#[derive(Debug, Clone, Default)]
pub struct Gradients {
    params: BTreeMap<ParameterId, Tensor>,
    lookups: BTreeMap<(LookupParameterId, usize), Tensor>,
}

impl Gradients {
    pub fn param(&self, id: ParameterId) -> Option<&Tensor> {
        self.params.get(&id)
    }

    pub fn lookup_row(&self, id: LookupParameterId, row: usize) -> Option<&Tensor> {
        self.lookups.get(&(id, row))
    }

    pub fn params(&self) -> impl Iterator<Item = (ParameterId, &Tensor)> {
        self.params.iter().map(|(id, grad)| (*id, grad))
    }

    pub fn lookups(&self) -> impl Iterator<Item = (LookupParameterId, usize, &Tensor)> {
        self.lookups
            .iter()
            .map(|(&(id, row), grad)| (id, row, grad))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.lookups.is_empty()
    }

    /// 所有梯度元素的平方和，梯度裁剪用
    pub fn squared_norm(&self) -> f32 {
        self.params.values().map(Tensor::squared_norm).sum::<f32>()
            + self.lookups.values().map(Tensor::squared_norm).sum::<f32>()
    }

    pub(in crate::nn) fn accumulate_param(&mut self, id: ParameterId, grad: &Tensor) {
        match self.params.get_mut(&id) {
            Some(existing) => existing.add_assign_tensor(grad),
            None => {
                self.params.insert(id, grad.clone());
            }
        }
    }

    pub(in crate::nn) fn accumulate_lookup(
        &mut self,
        id: LookupParameterId,
        row: usize,
        grad: &Tensor,
    ) {
        match self.lookups.get_mut(&(id, row)) {
            Some(existing) => existing.add_assign_tensor(grad),
            None => {
                self.lookups.insert((id, row), grad.clone());
            }
        }
    }
}
