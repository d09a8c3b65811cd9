/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 训练与生成的流程编排
 *
 * 训练：read_train_data → finish_reading_training_data → build_model → train → save_model
 * 生成：load_model → generate
 */

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use log::{debug, info, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::PoemError;
use super::checkpoint;
use super::config::{ModelConfig, TrainConfig};
use super::corpus::{self, Poem};
use super::dict::{Dict, EOS_OUTPUT, UNK_STR};
use super::generator::{Hyperparams, PoemGenerator};
use super::time_stat::TimeStat;
use crate::nn::{ComputationGraph, DEFAULT_INIT_SEED, Optimizer, SimpleSgd};

/// 一个训练轮次的统计
#[derive(Debug, Clone, PartialEq)]
pub struct EpochStat {
    /// 从1开始
    pub epoch: usize,
    pub loss_sum: f64,
    pub trained: usize,
    /// 不足两句而被跳过的诗
    pub skipped: usize,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct PoemGeneratorHandler {
    dict: Dict,
    hp: Option<Hyperparams>,
    init_seed: u64,
    generator: Option<PoemGenerator>,
}

impl Default for PoemGeneratorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl PoemGeneratorHandler {
    pub fn new() -> Self {
        Self {
            dict: Dict::new(),
            hp: None,
            init_seed: DEFAULT_INIT_SEED,
            generator: None,
        }
    }

    pub fn dict(&self) -> &Dict {
        &self.dict
    }

    pub fn hyperparams(&self) -> Option<&Hyperparams> {
        self.hp.as_ref()
    }

    pub fn generator(&self) -> Option<&PoemGenerator> {
        self.generator.as_ref()
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓训练↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub fn read_train_data<R: BufRead>(&mut self, reader: R) -> Result<Vec<Poem>, PoemError> {
        if self.dict.is_frozen() {
            return Err(PoemError::InvalidState(
                "词典已冻结，不能再读入训练语料".to_string(),
            ));
        }
        corpus::read_train_data(reader, &mut self.dict)
    }

    pub fn read_train_data_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<Poem>, PoemError> {
        let path = path.as_ref();
        info!("reading training data from {} ...", path.display());
        let poems = self.read_train_data(BufReader::new(File::open(path)?))?;
        info!("{} poems read , vocabulary size : {}", poems.len(), self.dict.size());
        Ok(poems)
    }

    /// 语料读完：加入句末标记，冻结词典，设置UNK，并据此确定超参数
    pub fn finish_reading_training_data(&mut self, cfg: &ModelConfig) -> Result<(), PoemError> {
        self.dict.convert_word(EOS_OUTPUT)?;
        self.dict.freeze();
        self.dict.set_unk(UNK_STR)?;
        self.hp = Some(Hyperparams::from_config(cfg, self.dict.size()));
        self.init_seed = cfg.init_seed;
        Ok(())
    }

    pub fn build_model(&mut self) -> Result<(), PoemError> {
        let hp = self.hp.ok_or_else(|| {
            PoemError::InvalidState(
                "超参数尚未确定，请先调用finish_reading_training_data".to_string(),
            )
        })?;
        let generator = PoemGenerator::build_model(hp, self.dict.clone(), self.init_seed)?;
        generator.model_info();
        self.generator = Some(generator);
        Ok(())
    }

    pub fn train(
        &mut self,
        poems: &[Poem],
        cfg: &TrainConfig,
    ) -> Result<Vec<EpochStat>, PoemError> {
        let generator = self.generator.as_mut().ok_or_else(model_not_ready)?;
        let mut sgd = SimpleSgd::new(cfg.learning_rate)
            .with_decay(cfg.lr_decay)
            .with_clip_threshold(cfg.clip_threshold);
        let report_freq = cfg.report_freq.max(1);
        let mut rng = StdRng::seed_from_u64(cfg.shuffle_seed);
        let mut order = (0..poems.len()).collect::<Vec<_>>();
        let mut stats = Vec::with_capacity(cfg.max_epoch);

        info!("train at {} poems", poems.len());
        for epoch in 1..=cfg.max_epoch {
            info!("--------- {}/{} ---------", epoch, cfg.max_epoch);
            order.shuffle(&mut rng);
            let mut stat = TimeStat::start();
            let mut skipped = 0;
            let mut since_report = 0;
            for &idx in &order {
                let poem = &poems[idx];
                if poem.len() < 2 {
                    debug!("跳过第{}首：只有{}句", idx + 1, poem.len());
                    skipped += 1;
                    continue;
                }
                let mut cg = ComputationGraph::new();
                let loss = generator.build_graph(&mut cg, poem)?;
                let loss_value = cg.forward(loss)?.number().ok_or_else(|| {
                    PoemError::InvalidState("损失须为标量".to_string())
                })?;
                cg.backward(loss)?;
                sgd.update(generator.model_mut(), &cg.gradients(), 1.0)?;
                stat.add_loss(loss_value);

                since_report += 1;
                if since_report == report_freq {
                    trace!(
                        "{} has been trained since last report. {}",
                        since_report,
                        sgd.status()
                    );
                    since_report = 0;
                }
            }
            sgd.update_epoch();
            info!(
                "---------- {} epoch end --------\nTime cost {:.3} s\nsum E = {}",
                epoch,
                stat.elapsed().as_secs_f64(),
                stat.loss_sum()
            );
            stats.push(EpochStat {
                epoch,
                loss_sum: stat.loss_sum(),
                trained: stat.count(),
                skipped,
                elapsed: stat.elapsed(),
            });
        }
        info!("training done .");
        Ok(stats)
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑训练↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /// 以一句（按UTF-8字符切分，忽略空格）为首句生成一首诗，返回各句文本
    pub fn generate(&mut self, first_seq: &str) -> Result<Vec<String>, PoemError> {
        let generator = self.generator.as_mut().ok_or_else(model_not_ready)?;
        let seed = corpus::slice_utf8_sentence(first_seq)
            .iter()
            .map(|w| generator.dict().lookup_word(w))
            .collect::<Result<Vec<_>, _>>()?;

        let mut cg = ComputationGraph::new();
        let poem = generator.generate(&mut cg, &seed)?;
        let dict = generator.dict();
        poem.iter()
            .map(|sentence| {
                sentence
                    .iter()
                    .map(|&idx| dict.convert_index(idx).map_err(PoemError::from))
                    .collect::<Result<String, _>>()
            })
            .collect()
    }

    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<(), PoemError> {
        let generator = self.generator.as_ref().ok_or_else(model_not_ready)?;
        checkpoint::save(generator, path)
    }

    pub fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<(), PoemError> {
        let generator = checkpoint::load(path)?;
        generator.model_info();
        self.dict = generator.dict().clone();
        self.hp = Some(*generator.hyperparams());
        self.generator = Some(generator);
        Ok(())
    }
}

fn model_not_ready() -> PoemError {
    PoemError::InvalidState("模型尚未构建或加载".to_string())
}
