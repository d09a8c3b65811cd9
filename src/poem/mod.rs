/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 中文古诗生成：语料与词典、生成网络、训练/生成流程、模型文件
 */

pub mod checkpoint;
mod config;
mod corpus;
mod dict;
mod error;
mod generator;
mod handler;
mod time_stat;

pub use config::{AppConfig, ModelConfig, TrainConfig, default_model_path};
pub use corpus::{Poem, Sentence, read_train_data, slice_utf8_sentence};
pub use dict::{Dict, DictError, EOS_OUTPUT, UNK_STR};
pub use error::PoemError;
pub use generator::{Hyperparams, MAX_HISTORY_LEN, POEM_SENT_NUM, PoemGenerator};
pub use handler::{EpochStat, PoemGeneratorHandler};
pub use time_stat::TimeStat;

#[cfg(test)]
mod tests;
