/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 应用层错误类型
 */

use std::io;

use thiserror::Error;

use super::dict::DictError;
use crate::nn::GraphError;

/// 应用层（读语料、训练、生成、存取模型）的错误
#[derive(Error, Debug)]
pub enum PoemError {
    #[error("IO错误：{0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Dict(#[from] DictError),
    #[error("二进制（反）序列化失败：{0}")]
    Bincode(#[from] bincode::Error),
    #[error("JSON（反）序列化失败：{0}")]
    Json(#[from] serde_json::Error),
    #[error("模型文件格式错误：{0}")]
    Checkpoint(String),
    #[error("状态错误：{0}")]
    InvalidState(String),
}
