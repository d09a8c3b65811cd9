/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18 10:12:03
 * @Description  : 张量层面的错误类型
 */

use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },
    #[error("张量列表为空")]
    EmptyList,
    #[error("张量须为2阶（矩阵或列向量），但收到的形状为{0:?}")]
    NotMatrix(Vec<usize>),
    #[error("张量须为列向量[n, 1]，但收到的形状为{0:?}")]
    NotColumnVector(Vec<usize>),
    #[error("行区间[{start}, {end})越界，张量共{rows}行")]
    RowRangeOutOfBounds { start: usize, end: usize, rows: usize },
    #[error("数据长度{data_len}与形状{shape:?}不符")]
    DataShapeMismatch { data_len: usize, shape: Vec<usize> },
}
