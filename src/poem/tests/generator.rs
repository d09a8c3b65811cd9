use super::{TINY_CORPUS, tiny_config};
use crate::assert_err;
use approx::assert_abs_diff_eq;

use crate::nn::{ComputationGraph, GraphError, Optimizer, SimpleSgd};
use crate::poem::{
    Dict, EOS_OUTPUT, Hyperparams, ModelConfig, POEM_SENT_NUM, Poem, PoemGenerator, UNK_STR,
    read_train_data,
};
use crate::tensor::Tensor;

fn frozen_dict() -> (Dict, Vec<Vec<Vec<usize>>>) {
    let mut dict = Dict::new();
    let poems = read_train_data(TINY_CORPUS.as_bytes(), &mut dict).unwrap();
    dict.convert_word(EOS_OUTPUT).unwrap();
    dict.freeze();
    dict.set_unk(UNK_STR).unwrap();
    (dict, poems)
}

fn tiny_generator() -> (PoemGenerator, Vec<Vec<Vec<usize>>>) {
    let (dict, poems) = frozen_dict();
    let hp = Hyperparams::from_config(&tiny_config(), dict.size());
    (PoemGenerator::build_model(hp, dict, 42).unwrap(), poems)
}

#[test]
fn test_hyperparams_derived_dims() {
    let hp = Hyperparams::from_config(&ModelConfig::default(), 100);
    // ⌊500 × 3 × 1.5⌋
    assert_eq!(hp.enc_hidden_layer_output_dim, 2250);
    assert_eq!(hp.enc_output_layer_output_dim, 1500);
    assert_eq!(hp.word_dict_size, 100);

    let hp = Hyperparams::from_config(&tiny_config(), 10);
    // ⌊3 × 1 × 1.5⌋
    assert_eq!(hp.enc_hidden_layer_output_dim, 4);
    assert_eq!(hp.enc_output_layer_output_dim, 6);
}

#[test]
fn test_build_model_requires_frozen_dict() {
    let mut dict = Dict::new();
    dict.convert_word(EOS_OUTPUT).unwrap();
    let hp = Hyperparams::from_config(&tiny_config(), dict.size());
    assert_err!(
        PoemGenerator::build_model(hp, dict, 1),
        GraphError::InvalidOperation(msg) if msg.contains("冻结")
    );
}

#[test]
fn test_build_model_requires_matching_vocab_size() {
    let (dict, _) = frozen_dict();
    let hp = Hyperparams::from_config(&tiny_config(), dict.size() + 1);
    assert_err!(
        PoemGenerator::build_model(hp, dict, 1),
        GraphError::InvalidOperation(_)
    );
}

#[test]
fn test_build_model_allocates_all_parameters() {
    let (generator, _) = tiny_generator();
    let hp = *generator.hyperparams();
    let model = generator.model();
    // 双向编码器：2个方向 × 1层 × 12个张量，加SOS/EOS哨兵
    // 解码器：2层 × 12个张量
    // 编码器隐藏层2 + 编码器输出层4 + 解码器输出层2 + 查找表1 + 解码器SOS/EOS 2
    assert_eq!(model.tensor_count(), 2 * 12 + 2 + 2 * 12 + 2 + 4 + 2 + 1 + 2);
    let lookup = model.lookup_ids().next().unwrap();
    assert_eq!(model.lookup_size(lookup).unwrap(), hp.word_dict_size);
    assert_eq!(model.lookup_dim(lookup).unwrap(), hp.word_embedding_dim);
    assert_eq!(
        generator.dict().convert_index(generator.eos_id()).unwrap(),
        EOS_OUTPUT
    );
}

#[test]
fn test_build_graph_loss_is_positive_scalar() {
    let (mut generator, poems) = tiny_generator();
    let mut cg = ComputationGraph::new();
    let loss = generator.build_graph(&mut cg, &poems[0]).unwrap();
    let value = cg.forward(loss).unwrap();
    assert_eq!(value.shape(), &[1, 1]);
    assert!(value.number().unwrap() > 0.0);
}

#[test]
fn test_build_graph_rejects_single_sentence() {
    let (mut generator, poems) = tiny_generator();
    let mut cg = ComputationGraph::new();
    let single = vec![poems[0][0].clone()];
    assert_err!(
        generator.build_graph(&mut cg, &single),
        GraphError::InvalidOperation(msg) if msg.contains("至少需要2句")
    );
}

#[test]
fn test_build_graph_with_long_poem_caps_history() {
    let (mut generator, poems) = tiny_generator();
    // 6句：历史窗口会被截断到3
    let mut long_poem = poems[0].clone();
    long_poem.extend(poems[1].iter().take(2).cloned());
    let mut cg = ComputationGraph::new();
    let loss = generator.build_graph(&mut cg, &long_poem).unwrap();
    cg.backward(loss).unwrap();
    assert!(!cg.gradients().is_empty());
}

#[test]
fn test_sgd_steps_reduce_loss_on_one_poem() {
    let (mut generator, poems) = tiny_generator();
    let poem = &poems[1];
    let mut sgd = SimpleSgd::new(0.1);

    let mut losses = Vec::new();
    for _ in 0..20 {
        let mut cg = ComputationGraph::new();
        let loss = generator.build_graph(&mut cg, poem).unwrap();
        losses.push(cg.forward(loss).unwrap().number().unwrap());
        cg.backward(loss).unwrap();
        sgd.update(generator.model_mut(), &cg.gradients(), 1.0).unwrap();
    }
    assert!(losses[19] < losses[0], "损失没有下降：{losses:?}");
}

#[test]
fn test_generate_shape_and_determinism() {
    let (mut generator, poems) = tiny_generator();
    let seed = poems[2][0].clone();

    let mut cg = ComputationGraph::new();
    let poem = generator.generate(&mut cg, &seed).unwrap();
    assert_eq!(poem.len(), POEM_SENT_NUM);
    assert_eq!(poem[0], seed);
    let vocab = generator.hyperparams().word_dict_size;
    for sentence in &poem {
        assert_eq!(sentence.len(), seed.len());
        assert!(sentence.iter().all(|&w| w < vocab));
    }

    let mut cg = ComputationGraph::new();
    assert_eq!(generator.generate(&mut cg, &seed).unwrap(), poem);
}

#[test]
fn test_generate_rejects_empty_seed() {
    let (mut generator, _) = tiny_generator();
    let mut cg = ComputationGraph::new();
    assert_err!(
        generator.generate(&mut cg, &[]),
        GraphError::InvalidOperation(_)
    );
}

/// 编码器隐藏层更宽的模型，使不同句子的编码（ReLU之后）几乎不可能相同
fn wide_generator() -> (PoemGenerator, Vec<Poem>) {
    let (dict, poems) = frozen_dict();
    let cfg = ModelConfig {
        word_embedding_dim: 6,
        enc_stacked_layer_num: 1,
        enc_h_dim: 8,
        dec_stacked_layer_num: 2,
        dec_h_dim: 4,
        init_seed: 42,
    };
    let hp = Hyperparams::from_config(&cfg, dict.size());
    (PoemGenerator::build_model(hp, dict, 42).unwrap(), poems)
}

/// 把历史窗口中较旧两句对应的合并权重清零，合并结果只取决于最新一句的编码
fn zero_older_history_weights(generator: &mut PoemGenerator) {
    let model = generator.model_mut();
    for name in ["enc_output_W2", "enc_output_W3"] {
        let id = model
            .parameter_ids()
            .find(|&id| model.parameter_name(id).unwrap() == name)
            .unwrap();
        let shape = model.parameter(id).unwrap().shape().to_vec();
        model.set_parameter(id, Tensor::zeros(&shape)).unwrap();
    }
}

fn poem_loss(generator: &mut PoemGenerator, poem: &[Vec<usize>]) -> f32 {
    let mut cg = ComputationGraph::new();
    let loss = generator.build_graph(&mut cg, &poem.to_vec()).unwrap();
    cg.forward(loss).unwrap().number().unwrap()
}

#[test]
fn test_history_window_puts_newest_sentence_first() {
    let (mut generator, poems) = wide_generator();
    zero_older_history_weights(&mut generator);
    let (s1, s2) = (poems[0][1].clone(), poems[0][2].clone());

    // 第3句的损失 = L([x, s1, s2]) - L([x, s1])；合并层只看最新一句时，它与首句x无关
    let mut third_sentence_loss = |first: &Vec<usize>| {
        let with_third = poem_loss(&mut generator, &[first.clone(), s1.clone(), s2.clone()]);
        let without_third = poem_loss(&mut generator, &[first.clone(), s1.clone()]);
        with_third - without_third
    };
    let a = third_sentence_loss(&poems[1][0]);
    let b = third_sentence_loss(&poems[2][0]);
    assert_abs_diff_eq!(a, b, epsilon = 1e-3);
}

#[test]
fn test_generate_conditions_on_predicted_sentence() {
    let (mut generator, poems) = wide_generator();
    let mut sgd = SimpleSgd::new(0.1);
    for poem in poems.iter().cycle().take(30) {
        let mut cg = ComputationGraph::new();
        let loss = generator.build_graph(&mut cg, poem).unwrap();
        cg.backward(loss).unwrap();
        sgd.update(generator.model_mut(), &cg.gradients(), 1.0).unwrap();
    }
    zero_older_history_weights(&mut generator);

    let seed = poems[0][0].clone();
    let mut cg = ComputationGraph::new();
    let from_seed = generator.generate(&mut cg, &seed).unwrap();

    // 合并层只看最新一句时，第i+1句只由第i句（生成出的那句）决定
    let mut cg = ComputationGraph::new();
    let from_second = generator.generate(&mut cg, &from_seed[1]).unwrap();
    assert_eq!(from_seed[2], from_second[1]);
    assert_eq!(from_seed[3], from_second[2]);
}
