//! # Poem Gen
//!
//! `poem_gen`用纯rust实现了一个基于动态计算图的中文古诗生成器：
//! 上一句经双向LSTM编码，与之前至多3句的编码一起融合后初始化LSTM解码器，逐字生成下一句。
//!
//! - [`tensor`]：2阶张量（矩阵与列向量）
//! - [`nn`]：动态计算图、自动求导、参数集合、LSTM等网络层与SGD优化器
//! - [`poem`]：词典与语料、生成网络、训练/生成流程、模型文件存取
//!

pub mod errors;
pub mod nn;
pub mod poem;
pub mod tensor;
pub mod utils;
