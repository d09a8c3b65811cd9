/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : Layer 模块 - 组合节点构建常见网络结构
 *
 * 每个层在构造时向 ParameterCollection 分配一次参数；
 * 每张新计算图开始时都须先调用 `new_graph` 把参数重新绑定进该图，然后才能构图
 */

mod birnn;
mod dense;
mod lstm;
mod merge;

pub use birnn::BiLstmLayer;
pub use dense::DenseLayer;
pub use lstm::LstmBuilder;
pub use merge::{Merge2Layer, Merge3Layer, MergeMax3Layer};

use crate::nn::GraphError;

fn unbound_error(layer: &str) -> GraphError {
    GraphError::InvalidOperation(format!("{layer}尚未绑定到计算图，请先调用new_graph"))
}
