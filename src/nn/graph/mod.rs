/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 动态计算图：每个训练样本/每次生成都新建一张图，用完即弃
 */

mod backward;
mod core;
mod error;
mod gradients;
mod node_builders;

pub use self::core::{ComputationGraph, Expression};
pub use error::GraphError;
pub use gradients::Gradients;
