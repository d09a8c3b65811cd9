/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18 10:20:41
 * @Description  : 张量（Tensor）。本crate中的张量恒为2阶：
 *                 列向量的形状为[n, 1]，权重矩阵的形状为[out, in]
 */

use ndarray::{Array, IxDyn};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::errors::TensorError;

mod ops {
    pub mod add;
    pub mod mat_mul;
    pub mod mul;
    pub mod others;
    pub mod sub;
}

mod print;
mod property;
mod shape;


/// 定义张量的结构体。本crate只用到矩阵与列向量（标量视为形状为[1, 1]的矩阵）。
/// 内部数据始终保持标准（行优先、连续）内存布局，`data_as_slice`依赖这一点。
#[derive(Debug, Clone)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量。`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        let expected: usize = shape.iter().product();
        assert!(
            data.len() == expected,
            "{}",
            TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        );
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).unwrap();
        Tensor { data }
    }

    /// 创建一个列向量，形状为`[data.len(), 1]`
    pub fn new_column(data: &[f32]) -> Tensor {
        Tensor::new(data, &[data.len(), 1])
    }

    /// 创建一个全零张量
    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// 创建一个全一张量
    pub fn ones(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::ones(IxDyn(shape)),
        }
    }

    /// 创建一个标量张量（形状为[1, 1]）
    pub fn scalar(value: f32) -> Tensor {
        Tensor::new(&[value], &[1, 1])
    }

    /// 用给定的随机数生成器创建一个随机张量，其值在[min, max]的闭区间
    pub fn new_uniform_with_rng<R: Rng + ?Sized>(
        min: f32,
        max: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Tensor {
        let uniform = Uniform::new_inclusive(min, max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(rng))
            .collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }

    /// 包装一个ndarray数组，并保证其为标准内存布局
    pub(crate) fn from_array(data: Array<f32, IxDyn>) -> Tensor {
        if data.is_standard_layout() {
            Tensor { data }
        } else {
            Tensor {
                data: data.as_standard_layout().into_owned(),
            }
        }
    }
}
