use super::Tensor;
use crate::errors::{Operator, TensorError};
use ndarray::{Array, Axis, IxDyn, Slice};

impl Tensor {
    /// 矩阵为[n, m]，列向量为[n, 1]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 判断张量是否为标量
    pub fn is_scalar(&self) -> bool {
        self.shape().is_empty() || self.shape().iter().all(|x| *x == 1)
    }

    /// 是否为列向量[n, 1]
    pub fn is_column(&self) -> bool {
        self.dimension() == 2 && self.shape()[1] == 1
    }

    /// 行数（首个维度）
    pub fn rows(&self) -> usize {
        self.shape().first().copied().unwrap_or(1)
    }

    /// 转置（仅限2阶张量）
    pub fn transpose(&self) -> Self {
        assert!(
            self.dimension() == 2,
            "{}",
            TensorError::NotMatrix(self.shape().to_vec())
        );
        Tensor::from_array(self.data.t().to_owned())
    }

    /// 将多个张量沿首个维度（行）拼接起来。除首个维度外，其余维度须一致。
    pub fn concat_rows(tensors: &[&Self]) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);
        let tail = &tensors[0].shape()[1..];
        for t in tensors.iter().skip(1) {
            assert!(
                &t.shape()[1..] == tail,
                "{}",
                TensorError::OperatorError {
                    operator: Operator::Concat,
                    tensor1_shape: tensors[0].shape().to_vec(),
                    tensor2_shape: t.shape().to_vec(),
                }
            );
        }
        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        let data = ndarray::concatenate(Axis(0), &views).unwrap();
        Tensor::from_array(data)
    }

    /// 取出第[start, end)行，返回一个新的张量
    pub fn slice_rows(&self, start: usize, end: usize) -> Self {
        let rows = self.rows();
        assert!(
            start < end && end <= rows,
            "{}",
            TensorError::RowRangeOutOfBounds { start, end, rows }
        );
        let sliced = self.data.slice_axis(Axis(0), Slice::from(start..end));
        Tensor::from_array(sliced.to_owned())
    }

    /// `slice_rows`的逆操作：生成一个共`total_rows`行的全零张量，并把本张量放在第`start`行开始处
    pub fn pad_rows(&self, total_rows: usize, start: usize) -> Self {
        let rows = self.rows();
        let end = start + rows;
        assert!(
            end <= total_rows,
            "{}",
            TensorError::RowRangeOutOfBounds {
                start,
                end,
                rows: total_rows,
            }
        );
        let mut shape = self.shape().to_vec();
        shape[0] = total_rows;
        let mut data = Array::zeros(IxDyn(&shape));
        data.slice_axis_mut(Axis(0), Slice::from(start..end))
            .assign(&self.data);
        Tensor::from_array(data)
    }
}
