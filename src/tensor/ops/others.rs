use crate::errors::TensorError;
use crate::tensor::Tensor;
use approx::AbsDiffEq;
use std::cmp::PartialEq;

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl AbsDiffEq for Tensor {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.is_same_shape(other)
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓逐元素函数↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Tensor {
    /// 对每个元素应用`f`，返回新张量
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Tensor {
        Tensor::from_array(self.data.mapv(f))
    }

    pub fn tanh(&self) -> Tensor {
        self.map(f32::tanh)
    }

    /// logistic函数：1 / (1 + e^(-x))，按正负分支计算以避免溢出
    pub fn sigmoid(&self) -> Tensor {
        self.map(|x| {
            if x >= 0.0 {
                1.0 / (1.0 + (-x).exp())
            } else {
                let e = x.exp();
                e / (1.0 + e)
            }
        })
    }

    /// ReLU：max(0, x)
    pub fn rectify(&self) -> Tensor {
        self.map(|x| x.max(0.0))
    }

    pub fn exp(&self) -> Tensor {
        self.map(f32::exp)
    }

    pub fn ln(&self) -> Tensor {
        self.map(f32::ln)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑逐元素函数↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓归约↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Tensor {
    /// 对张量中的所有元素求和
    pub fn sum_all(&self) -> f32 {
        self.data.sum()
    }

    /// 所有元素的平方和（梯度裁剪时求范数用）
    pub fn squared_norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// 返回最大元素的（行优先）下标；若有多个最大值，取第一个
    pub fn argmax(&self) -> usize {
        let mut best_idx = 0;
        let mut best_val = f32::NEG_INFINITY;
        for (idx, &val) in self.data.iter().enumerate() {
            if val > best_val {
                best_val = val;
                best_idx = idx;
            }
        }
        best_idx
    }

    /// 列向量的log-softmax（数值稳定版本）：x - max - ln(Σ exp(x - max))
    pub fn log_softmax(&self) -> Tensor {
        assert!(
            self.is_column(),
            "{}",
            TensorError::NotColumnVector(self.shape().to_vec())
        );
        let max = self.data.fold(f32::NEG_INFINITY, |acc, &x| acc.max(x));
        let ln_sum = self.data.mapv(|x| (x - max).exp()).sum().ln();
        Tensor::from_array(self.data.mapv(|x| (x - max) - ln_sum))
    }

    /// 列向量的softmax
    pub fn softmax(&self) -> Tensor {
        self.log_softmax().exp()
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑归约↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
