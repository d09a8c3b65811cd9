/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 命令行入口：`train`训练并保存模型，`generate`加载模型并以给定首句生成一首诗
 */

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueHint};
use log::error;

use poem_gen::poem::{AppConfig, PoemError, PoemGeneratorHandler, default_model_path};

#[derive(Parser)]
#[command(author, version, about = "基于动态计算图的中文古诗生成器")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 用语料训练模型并存盘
    Train(TrainArgs),
    /// 加载模型，以给定首句生成一首诗
    Generate(GenerateArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// 训练语料：每行一首诗，句间TAB，词间空格
    #[arg(long, value_hint = ValueHint::FilePath)]
    training_data: PathBuf,

    /// 模型保存路径，缺省为`poemgen_{词向量维度}_{编码器维度}_{解码器维度}.model`
    #[arg(long, value_hint = ValueHint::FilePath)]
    model: Option<PathBuf>,

    /// JSON配置文件，命令行参数优先于其中的同名项
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[arg(long)]
    max_epoch: Option<usize>,

    #[arg(long)]
    word_embedding_dim: Option<usize>,

    #[arg(long)]
    enc_stacked_layer_num: Option<usize>,

    #[arg(long)]
    enc_h_dim: Option<usize>,

    #[arg(long)]
    dec_stacked_layer_num: Option<usize>,

    #[arg(long)]
    dec_h_dim: Option<usize>,
}

#[derive(Args)]
struct GenerateArgs {
    /// 首句，按字切分（空格会被忽略）
    #[arg(long)]
    first_seq: String,

    #[arg(long, value_hint = ValueHint::FilePath)]
    model: PathBuf,
}

impl TrainArgs {
    fn resolve_config(&self) -> Result<AppConfig, PoemError> {
        let mut cfg = match &self.config {
            Some(path) => AppConfig::from_json_file(path)?,
            None => AppConfig::default(),
        };
        let model = &mut cfg.model;
        if let Some(v) = self.word_embedding_dim {
            model.word_embedding_dim = v;
        }
        if let Some(v) = self.enc_stacked_layer_num {
            model.enc_stacked_layer_num = v;
        }
        if let Some(v) = self.enc_h_dim {
            model.enc_h_dim = v;
        }
        if let Some(v) = self.dec_stacked_layer_num {
            model.dec_stacked_layer_num = v;
        }
        if let Some(v) = self.dec_h_dim {
            model.dec_h_dim = v;
        }
        if let Some(v) = self.max_epoch {
            cfg.train.max_epoch = v;
        }
        Ok(cfg)
    }
}

fn train(args: &TrainArgs) -> Result<(), PoemError> {
    let cfg = args.resolve_config()?;
    let model_path = args
        .model
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_model_path(&cfg.model)));

    let mut handler = PoemGeneratorHandler::new();
    let poems = handler.read_train_data_file(&args.training_data)?;
    handler.finish_reading_training_data(&cfg.model)?;
    handler.build_model()?;
    handler.train(&poems, &cfg.train)?;
    handler.save_model(&model_path)
}

fn generate(args: &GenerateArgs) -> Result<(), PoemError> {
    let mut handler = PoemGeneratorHandler::new();
    handler.load_model(&args.model)?;
    for line in handler.generate(&args.first_seq)? {
        println!("{line}");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Train(args) => train(args),
        Command::Generate(args) => generate(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
