use crate::nn::{ComputationGraph, Gradients, Optimizer, ParameterCollection, ParameterId, SimpleSgd};
use approx::assert_abs_diff_eq;

/// 损失为`copies`份相同的 -log softmax(p)[0] 之和
fn grads_of_repeated_loss(model: &ParameterCollection, p: ParameterId, copies: usize) -> Gradients {
    let mut cg = ComputationGraph::new();
    let p_expr = cg.parameter(model, p).unwrap();
    let losses = (0..copies)
        .map(|_| cg.pick_neg_log_softmax(p_expr, 0).unwrap())
        .collect::<Vec<_>>();
    let loss = cg.sum(&losses).unwrap();
    cg.backward(loss).unwrap();
    cg.gradients()
}

#[test]
fn test_sgd_update() {
    let mut model = ParameterCollection::new();
    let p = model.add_parameters("p", &[3, 1]).unwrap();
    let table = model.add_lookup_parameters("table", 2, 3).unwrap();
    let before = model.parameter(p).unwrap().clone();
    let row_before = model.lookup_row(table, 1).unwrap().clone();

    let mut cg = ComputationGraph::new();
    let p_expr = cg.parameter(&model, p).unwrap();
    let row = cg.lookup(&model, table, 1).unwrap();
    let y = cg.add(&[p_expr, row]).unwrap();
    let loss = cg.pick_neg_log_softmax(y, 2).unwrap();
    cg.backward(loss).unwrap();
    let grads = cg.gradients();

    let mut sgd = SimpleSgd::new(0.1);
    assert_eq!(sgd.learning_rate(), 0.1);
    sgd.update(&mut model, &grads, 0.5).unwrap();

    let g = grads.param(p).unwrap();
    assert_abs_diff_eq!(
        model.parameter(p).unwrap(),
        &(&before - &(0.05 * g)),
        epsilon = 1e-6
    );
    let g_row = grads.lookup_row(table, 1).unwrap();
    assert_abs_diff_eq!(
        model.lookup_row(table, 1).unwrap(),
        &(&row_before - &(0.05 * g_row)),
        epsilon = 1e-6
    );
    assert_eq!(sgd.updates(), 1);
    assert_eq!(sgd.clips(), 0);
}

#[test]
fn test_sgd_clips_global_norm() {
    let mut model = ParameterCollection::new();
    let p = model.add_parameters("p", &[3, 1]).unwrap();
    let before = model.parameter(p).unwrap().clone();

    let grads = grads_of_repeated_loss(&model, p, 20);
    let norm = grads.squared_norm().sqrt();
    assert!(norm > 5.0);

    let mut sgd = SimpleSgd::default();
    sgd.update(&mut model, &grads, 1.0).unwrap();
    assert_eq!(sgd.clips(), 1);

    // 裁剪后实际走的梯度范数恰为阈值5
    let g = grads.param(p).unwrap();
    let expected = &before - &((0.1 * 5.0 / norm) * g);
    assert_abs_diff_eq!(model.parameter(p).unwrap(), &expected, epsilon = 1e-6);
}

#[test]
fn test_sgd_without_clipping() {
    let mut model = ParameterCollection::new();
    let p = model.add_parameters("p", &[3, 1]).unwrap();
    let before = model.parameter(p).unwrap().clone();

    let grads = grads_of_repeated_loss(&model, p, 20);
    let mut sgd = SimpleSgd::new(0.01).without_clipping();
    sgd.update(&mut model, &grads, 1.0).unwrap();
    assert_eq!(sgd.clips(), 0);

    let expected = &before - &(0.01 * grads.param(p).unwrap());
    assert_abs_diff_eq!(model.parameter(p).unwrap(), &expected, epsilon = 1e-6);
}

#[test]
fn test_sgd_epoch_decay() {
    let mut sgd = SimpleSgd::new(0.1).with_decay(0.5);
    sgd.update_epoch();
    assert_abs_diff_eq!(sgd.learning_rate(), 0.1 / 1.5, epsilon = 1e-7);
    sgd.update_epoch();
    assert_abs_diff_eq!(sgd.learning_rate(), 0.1 / 2.0, epsilon = 1e-7);

    sgd.set_learning_rate(0.3);
    assert_abs_diff_eq!(sgd.learning_rate(), 0.3 / 2.0, epsilon = 1e-7);

    // 默认不衰减
    let mut plain = SimpleSgd::default();
    plain.update_epoch();
    assert_eq!(plain.learning_rate(), 0.1);
    assert!(plain.status().contains("epoch=1"));
}

#[test]
fn test_sgd_with_empty_gradients_is_noop() {
    let mut model = ParameterCollection::new();
    let p = model.add_parameters("p", &[2, 1]).unwrap();
    let before = model.parameter(p).unwrap().clone();
    let mut sgd = SimpleSgd::default().with_clip_threshold(1.0);
    let grads = Gradients::default();
    assert!(grads.is_empty());
    sgd.update(&mut model, &grads, 1.0).unwrap();
    assert_eq!(model.parameter(p).unwrap(), &before);
}
