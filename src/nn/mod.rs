/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18 11:02:37
 * @Description  : 负责神经网络（neural network）的构建：动态计算图、模型参数、网络层与优化器
 */

mod graph;
pub mod layer;
mod model;
mod nodes;
pub mod optimizer;

pub use graph::{ComputationGraph, Expression, GraphError, Gradients};
pub use layer::{BiLstmLayer, DenseLayer, LstmBuilder, Merge2Layer, Merge3Layer, MergeMax3Layer};
pub use model::{DEFAULT_INIT_SEED, LookupParameterId, ParameterCollection, ParameterId};
pub use nodes::NodeId;
pub use optimizer::{Optimizer, SimpleSgd};

#[cfg(test)]
mod tests;
