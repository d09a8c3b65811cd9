/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 模型与训练的配置。可从JSON文件读取（缺省字段取默认值），再由命令行参数覆盖
 */

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::PoemError;
use crate::nn::DEFAULT_INIT_SEED;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub word_embedding_dim: usize,
    pub enc_stacked_layer_num: usize,
    pub enc_h_dim: usize,
    pub dec_stacked_layer_num: usize,
    pub dec_h_dim: usize,
    /// 参数初始化所用的随机种子
    pub init_seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            word_embedding_dim: 50,
            enc_stacked_layer_num: 3,
            enc_h_dim: 500,
            dec_stacked_layer_num: 3,
            dec_h_dim: 500,
            init_seed: DEFAULT_INIT_SEED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub max_epoch: usize,
    /// 每训练多少首诗输出一次进度（trace级别）
    pub report_freq: usize,
    /// 打乱训练顺序所用的随机种子
    pub shuffle_seed: u64,
    pub learning_rate: f32,
    pub lr_decay: f32,
    pub clip_threshold: f32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_epoch: 4,
            report_freq: 1000,
            shuffle_seed: 1314,
            learning_rate: 0.1,
            lr_decay: 0.0,
            clip_threshold: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub train: TrainConfig,
}

impl AppConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PoemError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// 未指定模型路径时的默认文件名：`poemgen_{词向量维度}_{编码器隐藏维度}_{解码器隐藏维度}.model`
pub fn default_model_path(cfg: &ModelConfig) -> String {
    format!(
        "poemgen_{}_{}_{}.model",
        cfg.word_embedding_dim, cfg.enc_h_dim, cfg.dec_h_dim
    )
}
