/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 古诗生成网络
 *
 * 每生成一句诗：
 *   1. 上一句的词向量经双向LSTM编码，拼接正反向各层的最终隐藏状态；
 *   2. 经全连接层 + ReLU得到该句的编码，放入长度至多为3的历史窗口（最新的在最前）；
 *   3. 历史窗口经MergeMax3Layer融合，按解码器层数切块，作为解码器各层的初始状态
 *      （细胞状态 = 块，隐藏状态 = tanh(块)）；
 *   4. 解码器从SOS开始逐词输出，每步经全连接层得到词表上的打分。
 */

use std::collections::VecDeque;

use log::info;
use serde::{Deserialize, Serialize};

use super::config::ModelConfig;
use super::corpus::{Poem, Sentence};
use super::dict::{Dict, EOS_OUTPUT};
use crate::nn::{
    BiLstmLayer, ComputationGraph, DenseLayer, Expression, GraphError, LookupParameterId,
    LstmBuilder, MergeMax3Layer, ParameterCollection, ParameterId,
};

/// 历史窗口的最大长度（句数）
pub const MAX_HISTORY_LEN: usize = 3;
/// 生成的一首诗的句数（含首句）
pub const POEM_SENT_NUM: usize = 4;

/// 决定模型结构的超参数，随模型一起存盘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperparams {
    pub word_embedding_dim: usize,
    pub word_dict_size: usize,
    pub enc_h_dim: usize,
    pub enc_stacked_layer_num: usize,
    pub enc_hidden_layer_output_dim: usize,
    pub enc_output_layer_output_dim: usize,
    pub dec_h_dim: usize,
    pub dec_stacked_layer_num: usize,
}

impl Hyperparams {
    /// 由配置与词表大小推出全部超参数：
    /// 编码器隐藏层输出维度 = ⌊enc_h × enc_layers × 1.5⌋，
    /// 编码器输出层维度 = dec_h × dec_layers（恰好切成解码器各层的初始状态）
    pub fn from_config(cfg: &ModelConfig, word_dict_size: usize) -> Self {
        let enc_hidden = (cfg.enc_h_dim * cfg.enc_stacked_layer_num) as f64 * 1.5;
        Self {
            word_embedding_dim: cfg.word_embedding_dim,
            word_dict_size,
            enc_h_dim: cfg.enc_h_dim,
            enc_stacked_layer_num: cfg.enc_stacked_layer_num,
            enc_hidden_layer_output_dim: enc_hidden as usize,
            enc_output_layer_output_dim: cfg.dec_h_dim * cfg.dec_stacked_layer_num,
            dec_h_dim: cfg.dec_h_dim,
            dec_stacked_layer_num: cfg.dec_stacked_layer_num,
        }
    }
}

/// 网络各层，以及它们在当前计算图中的绑定
#[derive(Debug, Clone)]
struct PoemNet {
    bi_enc: BiLstmLayer,
    dec: LstmBuilder,
    enc_hidden_layer: DenseLayer,
    enc_output_layer: MergeMax3Layer,
    dec_output_layer: DenseLayer,
    words_lookup: LookupParameterId,
    dec_sos: ParameterId,
    dec_eos: ParameterId,
    dec_sos_expr: Option<Expression>,
}

impl PoemNet {
    fn new(model: &mut ParameterCollection, hp: &Hyperparams) -> Result<Self, GraphError> {
        let bi_enc = BiLstmLayer::new(
            model,
            "enc",
            hp.enc_stacked_layer_num,
            hp.word_embedding_dim,
            hp.enc_h_dim,
        )?;
        let dec = LstmBuilder::new(
            model,
            "dec",
            hp.dec_stacked_layer_num,
            hp.word_embedding_dim,
            hp.dec_h_dim,
        )?;
        let enc_hidden_layer = DenseLayer::new(
            model,
            "enc_hidden",
            bi_enc.final_h_dim(),
            hp.enc_hidden_layer_output_dim,
        )?;
        let enc_output_layer = MergeMax3Layer::new(
            model,
            "enc_output",
            [hp.enc_hidden_layer_output_dim; MAX_HISTORY_LEN],
            hp.enc_output_layer_output_dim,
        )?;
        let dec_output_layer =
            DenseLayer::new(model, "dec_output", hp.dec_h_dim, hp.word_dict_size)?;
        let words_lookup =
            model.add_lookup_parameters("words_lookup", hp.word_dict_size, hp.word_embedding_dim)?;
        let dec_sos = model.add_parameters("dec_SOS", &[hp.word_embedding_dim, 1])?;
        let dec_eos = model.add_parameters("dec_EOS", &[hp.word_embedding_dim, 1])?;
        Ok(Self {
            bi_enc,
            dec,
            enc_hidden_layer,
            enc_output_layer,
            dec_output_layer,
            words_lookup,
            dec_sos,
            dec_eos,
            dec_sos_expr: None,
        })
    }

    fn new_graph(
        &mut self,
        cg: &mut ComputationGraph,
        model: &ParameterCollection,
    ) -> Result<(), GraphError> {
        self.bi_enc.new_graph(cg, model)?;
        self.dec.new_graph(cg, model)?;
        self.enc_hidden_layer.new_graph(cg, model)?;
        self.enc_output_layer.new_graph(cg, model)?;
        self.dec_output_layer.new_graph(cg, model)?;
        self.dec_sos_expr = Some(cg.parameter(model, self.dec_sos)?);
        // EOS向量目前不参与计算
        cg.parameter(model, self.dec_eos)?;
        Ok(())
    }

    fn dec_sos_expr(&self) -> Result<Expression, GraphError> {
        self.dec_sos_expr.ok_or_else(|| {
            GraphError::InvalidOperation("网络尚未绑定到计算图，请先调用new_graph".to_string())
        })
    }

    /// 编码`prev`句并更新历史窗口，随后用融合结果初始化解码器
    fn condition_decoder(
        &mut self,
        cg: &mut ComputationGraph,
        model: &ParameterCollection,
        prev: &[usize],
        history: &mut VecDeque<Expression>,
    ) -> Result<(), GraphError> {
        let xs = prev
            .iter()
            .map(|&w| cg.lookup(model, self.words_lookup, w))
            .collect::<Result<Vec<_>, _>>()?;
        self.bi_enc.build_graph(cg, &xs)?;
        let final_h = self.bi_enc.final_h()?;
        let h_combined = cg.concatenate(&final_h)?;
        let enc_hidden = self.enc_hidden_layer.build(cg, h_combined)?;
        let enc_hidden = cg.rectify(enc_hidden)?;

        history.push_front(enc_hidden);
        history.truncate(MAX_HISTORY_LEN);
        let merged = self
            .enc_output_layer
            .build(cg, history.make_contiguous())?;

        let layers = self.dec.layers();
        let h_dim = self.dec.hidden_dim();
        let mut init = Vec::with_capacity(2 * layers);
        for layer in 0..layers {
            init.push(cg.pick_range(merged, layer * h_dim, (layer + 1) * h_dim)?);
        }
        for layer in 0..layers {
            let c = init[layer];
            init.push(cg.tanh(c)?);
        }
        self.dec.start_new_sequence(&init)
    }

    /// 解码器走一步，返回词表上的打分（未归一化）
    fn decode_step(
        &mut self,
        cg: &mut ComputationGraph,
        prev_word: Expression,
    ) -> Result<Expression, GraphError> {
        let h = self.dec.add_input(cg, prev_word)?;
        self.dec_output_layer.build(cg, h)
    }
}

/// 古诗生成器：超参数、模型参数、词典与网络结构
#[derive(Debug)]
pub struct PoemGenerator {
    hp: Hyperparams,
    model: ParameterCollection,
    dict: Dict,
    eos_id: usize,
    net: PoemNet,
}

impl PoemGenerator {
    /// 按超参数分配全部参数。词典须已冻结且大小与超参数中的词表大小一致
    pub fn build_model(hp: Hyperparams, dict: Dict, init_seed: u64) -> Result<Self, GraphError> {
        if !dict.is_frozen() {
            return Err(GraphError::InvalidOperation(
                "构建模型前词典须先冻结".to_string(),
            ));
        }
        if dict.size() != hp.word_dict_size {
            return Err(GraphError::InvalidOperation(format!(
                "词典大小{}与超参数中的词表大小{}不一致",
                dict.size(),
                hp.word_dict_size
            )));
        }
        let eos_id = dict.lookup_word(EOS_OUTPUT).map_err(|_| {
            GraphError::InvalidOperation(format!("词典中缺少句末标记`{EOS_OUTPUT}`"))
        })?;
        let mut model = ParameterCollection::with_seed(init_seed);
        let net = PoemNet::new(&mut model, &hp)?;
        Ok(Self {
            hp,
            model,
            dict,
            eos_id,
            net,
        })
    }

    pub fn model_info(&self) {
        let hp = &self.hp;
        info!(
            "----------------- Model Info ---------------\n\
             word vocabulary size : {} with dimension : {}\n\
             encoder stacked layer number : {} with dimension : {}\n\
             encoder hidden layer output dim : {}\n\
             encoder output layer output dim : {}\n\
             decoder stacked layer number : {} with dimension : {}\n\
             parameter tensors : {} , scalars : {}",
            hp.word_dict_size,
            hp.word_embedding_dim,
            hp.enc_stacked_layer_num,
            hp.enc_h_dim,
            hp.enc_hidden_layer_output_dim,
            hp.enc_output_layer_output_dim,
            hp.dec_stacked_layer_num,
            hp.dec_h_dim,
            self.model.tensor_count(),
            self.model.parameter_count()
        );
    }

    /// 为一首诗构建训练图：对每一句（第2句起）以前文为条件逐词预测，
    /// 句末再预测一次`EOS_OUTPUT`。返回所有逐词损失之和
    pub fn build_graph(
        &mut self,
        cg: &mut ComputationGraph,
        poem: &Poem,
    ) -> Result<Expression, GraphError> {
        if poem.len() < 2 {
            return Err(GraphError::InvalidOperation(format!(
                "一首诗至少需要2句才能构建训练图，但只有{}句",
                poem.len()
            )));
        }
        self.net.new_graph(cg, &self.model)?;
        let sos = self.net.dec_sos_expr()?;

        let mut history = VecDeque::with_capacity(MAX_HISTORY_LEN + 1);
        let mut losses = Vec::new();
        for pair in poem.windows(2) {
            let (cur_seq, gen_seq) = (&pair[0], &pair[1]);
            self.net
                .condition_decoder(cg, &self.model, cur_seq, &mut history)?;

            let mut pre_word = sos;
            for &gold in gen_seq {
                let scores = self.net.decode_step(cg, pre_word)?;
                losses.push(cg.pick_neg_log_softmax(scores, gold)?);
                pre_word = cg.lookup(&self.model, self.net.words_lookup, gold)?;
            }
            let scores = self.net.decode_step(cg, pre_word)?;
            losses.push(cg.pick_neg_log_softmax(scores, self.eos_id)?);
        }
        cg.sum(&losses)
    }

    /// 以`first_seq`为首句，贪心解码出共`POEM_SENT_NUM`句、每句与首句等长的诗
    pub fn generate(
        &mut self,
        cg: &mut ComputationGraph,
        first_seq: &[usize],
    ) -> Result<Vec<Sentence>, GraphError> {
        if first_seq.is_empty() {
            return Err(GraphError::InvalidOperation("首句不能为空".to_string()));
        }
        let sent_len = first_seq.len();
        self.net.new_graph(cg, &self.model)?;
        let sos = self.net.dec_sos_expr()?;

        let mut history = VecDeque::with_capacity(MAX_HISTORY_LEN + 1);
        let mut poem: Vec<Sentence> = Vec::with_capacity(POEM_SENT_NUM);
        poem.push(first_seq.to_vec());
        for generating_idx in 1..POEM_SENT_NUM {
            self.net
                .condition_decoder(cg, &self.model, &poem[generating_idx - 1], &mut history)?;

            let mut pre_word = sos;
            let mut gen_seq = Sentence::with_capacity(sent_len);
            for _ in 0..sent_len {
                let scores = self.net.decode_step(cg, pre_word)?;
                let predicted = cg.incremental_forward(scores)?.argmax();
                gen_seq.push(predicted);
                pre_word = cg.lookup(&self.model, self.net.words_lookup, predicted)?;
            }
            poem.push(gen_seq);
        }
        Ok(poem)
    }

    pub fn hyperparams(&self) -> &Hyperparams {
        &self.hp
    }

    pub fn model(&self) -> &ParameterCollection {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ParameterCollection {
        &mut self.model
    }

    pub fn dict(&self) -> &Dict {
        &self.dict
    }

    pub fn eos_id(&self) -> usize {
        self.eos_id
    }
}
