mod generator;

use crate::poem::{ModelConfig, Poem, PoemGeneratorHandler};

/// 每行一首诗：句间TAB，字间空格
const TINY_CORPUS: &str = "春 眠 不 觉 晓\t处 处 闻 啼 鸟\t夜 来 风 雨 声\t花 落 知 多 少\n\
白 日 依 山 尽\t黄 河 入 海 流\t欲 穷 千 里 目\t更 上 一 层 楼\n\
床 前 明 月 光\t疑 是 地 上 霜\t举 头 望 明 月\t低 头 思 故 乡\n";

fn tiny_config() -> ModelConfig {
    ModelConfig {
        word_embedding_dim: 4,
        enc_stacked_layer_num: 1,
        enc_h_dim: 3,
        dec_stacked_layer_num: 2,
        dec_h_dim: 3,
        init_seed: 42,
    }
}

/// 读入小语料并构建好模型的handler
fn prepared_handler() -> (PoemGeneratorHandler, Vec<Poem>) {
    let mut handler = PoemGeneratorHandler::new();
    let poems = handler.read_train_data(TINY_CORPUS.as_bytes()).unwrap();
    handler.finish_reading_training_data(&tiny_config()).unwrap();
    handler.build_model().unwrap();
    (handler, poems)
}
