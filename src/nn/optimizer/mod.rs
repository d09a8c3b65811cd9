/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 优化器模块
 */

mod sgd;

pub use sgd::SimpleSgd;

use crate::nn::{GraphError, Gradients, ParameterCollection};

/// 优化器核心 trait
///
/// 训练循环：
/// ```ignore
/// let mut cg = ComputationGraph::new();
/// let loss = /* 构图 */;
/// cg.forward(loss)?;
/// cg.backward(loss)?;
/// optimizer.update(&mut model, &cg.gradients(), 1.0)?;
/// ```
pub trait Optimizer {
    /// 用一次反向传播得到的梯度更新模型参数，`scale`为额外的梯度缩放系数
    fn update(
        &mut self,
        model: &mut ParameterCollection,
        grads: &Gradients,
        scale: f32,
    ) -> Result<(), GraphError>;

    /// 一个训练轮次（epoch）结束，按衰减策略调整学习率
    fn update_epoch(&mut self);

    /// 获取学习率
    fn learning_rate(&self) -> f32;

    /// 设置学习率
    fn set_learning_rate(&mut self, lr: f32);
}
