/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @Description  : 本类仅包含一些属性方法，不包含任何运算方法，所以不会需要用到mut
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18 10:24:12
 */

use super::Tensor;

impl Tensor {
    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 转化为纯数（number）。若为标量，则返回Some(number)，否则返回None
    pub fn number(&self) -> Option<f32> {
        if self.is_scalar() {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    /// 以（行优先的）切片形式访问数据
    pub fn data_as_slice(&self) -> &[f32] {
        self.data
            .as_slice()
            .expect("张量数据须为标准内存布局，否则说明crate代码有问题")
    }

    /// 以（行优先的）可变切片形式访问数据
    pub fn data_as_slice_mut(&mut self) -> &mut [f32] {
        self.data
            .as_slice_mut()
            .expect("张量数据须为标准内存布局，否则说明crate代码有问题")
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data_as_slice().to_vec()
    }

    /// 所有元素中是否存在非有限值（NaN或无穷）
    pub fn has_non_finite(&self) -> bool {
        self.data.iter().any(|x| !x.is_finite())
    }
}
