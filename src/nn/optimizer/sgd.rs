/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 带梯度裁剪与轮次衰减的随机梯度下降
 */

use super::Optimizer;
use crate::nn::{GraphError, Gradients, ParameterCollection};
use crate::tensor::Tensor;

/// 朴素 SGD：θ ← θ - η·scale·∇θ
///
/// - 全局范数裁剪：所有梯度的 L2 范数超过阈值时，整体按比例缩小到阈值
/// - 轮次衰减：η = η0 / (1 + epoch·decay)
#[derive(Debug, Clone)]
pub struct SimpleSgd {
    eta0: f32,
    eta: f32,
    eta_decay: f32,
    epoch: f32,
    clipping_enabled: bool,
    clip_threshold: f32,
    clips: u64,
    updates: u64,
}

impl Default for SimpleSgd {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl SimpleSgd {
    pub fn new(learning_rate: f32) -> Self {
        Self {
            eta0: learning_rate,
            eta: learning_rate,
            eta_decay: 0.0,
            epoch: 0.0,
            clipping_enabled: true,
            clip_threshold: 5.0,
            clips: 0,
            updates: 0,
        }
    }

    pub fn with_decay(mut self, eta_decay: f32) -> Self {
        self.eta_decay = eta_decay;
        self
    }

    pub fn with_clip_threshold(mut self, clip_threshold: f32) -> Self {
        self.clip_threshold = clip_threshold;
        self
    }

    pub fn without_clipping(mut self) -> Self {
        self.clipping_enabled = false;
        self
    }

    /// 被裁剪过的更新次数
    pub fn clips(&self) -> u64 {
        self.clips
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn status(&self) -> String {
        format!(
            "[epoch={} eta={} clips={} updates={}]",
            self.epoch, self.eta, self.clips, self.updates
        )
    }

    fn clip_scale(&mut self, grads: &Gradients) -> f32 {
        if !self.clipping_enabled {
            return 1.0;
        }
        let norm = grads.squared_norm().sqrt();
        if norm > self.clip_threshold {
            self.clips += 1;
            self.clip_threshold / norm
        } else {
            1.0
        }
    }
}

fn apply_step(target: &mut Tensor, grad: &Tensor, step: f32, what: String) -> Result<(), GraphError> {
    if !target.is_same_shape(grad) {
        return Err(GraphError::ShapeMismatch {
            expected: target.shape().to_vec(),
            got: grad.shape().to_vec(),
            message: format!("{what}的梯度形状与参数不一致"),
        });
    }
    target.add_assign_tensor(&(-step * grad));
    Ok(())
}

impl Optimizer for SimpleSgd {
    fn update(
        &mut self,
        model: &mut ParameterCollection,
        grads: &Gradients,
        scale: f32,
    ) -> Result<(), GraphError> {
        let step = self.eta * scale * self.clip_scale(grads);
        for (id, grad) in grads.params() {
            apply_step(model.parameter_mut(id)?, grad, step, format!("{id:?}"))?;
        }
        for (id, row, grad) in grads.lookups() {
            apply_step(
                model.lookup_row_mut(id, row)?,
                grad,
                step,
                format!("{id:?}第{row}行"),
            )?;
        }
        self.updates += 1;
        Ok(())
    }

    fn update_epoch(&mut self) {
        self.epoch += 1.0;
        self.eta = self.eta0 / (1.0 + self.epoch * self.eta_decay);
    }

    fn learning_rate(&self) -> f32 {
        self.eta
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.eta0 = lr;
        self.eta = lr / (1.0 + self.epoch * self.eta_decay);
    }
}
