use super::assert_gradients_match_finite_difference;
use crate::nn::{ComputationGraph, ParameterCollection};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_backward_pick_neg_log_softmax_analytic() {
    let mut model = ParameterCollection::new();
    let x = model.add_parameters("x", &[3, 1]).unwrap();
    model
        .set_parameter(x, Tensor::new_column(&[1.0, 2.0, 3.0]))
        .unwrap();

    let mut cg = ComputationGraph::new();
    let x_expr = cg.parameter(&model, x).unwrap();
    let loss = cg.pick_neg_log_softmax(x_expr, 1).unwrap();
    cg.forward(loss).unwrap();
    cg.backward(loss).unwrap();

    // softmax(1, 2, 3) - onehot(1)
    let expected = Tensor::new_column(&[0.090_031, 0.244_728 - 1.0, 0.665_241]);
    assert_abs_diff_eq!(cg.gradients().param(x).unwrap(), &expected, epsilon = 1e-5);
}

#[test]
fn test_backward_clears_previous_gradients() {
    let mut model = ParameterCollection::new();
    let x = model.add_parameters("x", &[3, 1]).unwrap();

    let mut cg = ComputationGraph::new();
    let x_expr = cg.parameter(&model, x).unwrap();
    let loss = cg.pick_neg_log_softmax(x_expr, 0).unwrap();
    cg.backward(loss).unwrap();
    let first = cg.gradients().param(x).unwrap().clone();
    cg.backward(loss).unwrap();
    assert_eq!(cg.gradients().param(x).unwrap(), &first);
}

#[test]
fn test_backward_does_not_reach_unrelated_parameters() {
    let mut model = ParameterCollection::new();
    let used = model.add_parameters("used", &[2, 1]).unwrap();
    let unused = model.add_parameters("unused", &[2, 1]).unwrap();

    let mut cg = ComputationGraph::new();
    let used_expr = cg.parameter(&model, used).unwrap();
    let unused_expr = cg.parameter(&model, unused).unwrap();
    let loss = cg.pick_neg_log_softmax(used_expr, 0).unwrap();
    cg.backward(loss).unwrap();

    let grads = cg.gradients();
    assert!(grads.param(used).is_some());
    assert!(grads.param(unused).is_none());
    assert_eq!(cg.grad(unused_expr).unwrap(), None);
}

#[test]
fn test_gradient_check_affine_transform() {
    let mut model = ParameterCollection::new();
    let b = model.add_parameters("b", &[2, 1]).unwrap();
    let w1 = model.add_parameters("w1", &[2, 3]).unwrap();
    let x1 = model.add_parameters("x1", &[3, 1]).unwrap();
    let w2 = model.add_parameters("w2", &[2, 2]).unwrap();
    let x2 = model.add_parameters("x2", &[2, 1]).unwrap();

    assert_gradients_match_finite_difference(&mut model, |cg, m| {
        let ids = [b, w1, x1, w2, x2];
        let exprs = ids
            .iter()
            .map(|&id| cg.parameter(m, id))
            .collect::<Result<Vec<_>, _>>()?;
        let y = cg.affine_transform(&exprs)?;
        cg.pick_neg_log_softmax(y, 1)
    });
}

#[test]
fn test_gradient_check_add_and_cmult() {
    let mut model = ParameterCollection::new();
    let a = model.add_parameters("a", &[3, 1]).unwrap();
    let b = model.add_parameters("b", &[3, 1]).unwrap();
    let c = model.add_parameters("c", &[3, 1]).unwrap();

    assert_gradients_match_finite_difference(&mut model, |cg, m| {
        let (a, b, c) = (cg.parameter(m, a)?, cg.parameter(m, b)?, cg.parameter(m, c)?);
        let ab = cg.cmult(a, b)?;
        // c出现两次，梯度须累加
        let y = cg.add(&[ab, c, c])?;
        cg.pick_neg_log_softmax(y, 0)
    });
}

#[test]
fn test_gradient_check_tanh_and_logistic() {
    let mut model = ParameterCollection::new();
    let a = model.add_parameters("a", &[2, 1]).unwrap();
    let b = model.add_parameters("b", &[3, 1]).unwrap();

    assert_gradients_match_finite_difference(&mut model, |cg, m| {
        let (a, b) = (cg.parameter(m, a)?, cg.parameter(m, b)?);
        let ta = cg.tanh(a)?;
        let lb = cg.logistic(b)?;
        let y = cg.concatenate(&[ta, lb])?;
        cg.pick_neg_log_softmax(y, 2)
    });
}

#[test]
fn test_gradient_check_rectify() {
    let mut model = ParameterCollection::new();
    let a = model.add_parameters("a", &[4, 1]).unwrap();
    // 远离0，避免差分跨过ReLU的拐点
    model
        .set_parameter(a, Tensor::new_column(&[0.5, -0.7, 1.2, -0.3]))
        .unwrap();

    assert_gradients_match_finite_difference(&mut model, |cg, m| {
        let a = cg.parameter(m, a)?;
        let y = cg.rectify(a)?;
        cg.pick_neg_log_softmax(y, 2)
    });
}

#[test]
fn test_gradient_check_concatenate_and_pick_range() {
    let mut model = ParameterCollection::new();
    let x = model.add_parameters("x", &[4, 1]).unwrap();
    let y = model.add_parameters("y", &[2, 1]).unwrap();

    assert_gradients_match_finite_difference(&mut model, |cg, m| {
        let (x, y) = (cg.parameter(m, x)?, cg.parameter(m, y)?);
        let cat = cg.concatenate(&[x, y])?;
        let mid = cg.pick_range(cat, 1, 5)?;
        cg.pick_neg_log_softmax(mid, 3)
    });
}

#[test]
fn test_gradient_check_lookup_and_sum() {
    let mut model = ParameterCollection::new();
    let table = model.add_lookup_parameters("table", 5, 3).unwrap();
    let w = model.add_parameters("w", &[4, 3]).unwrap();
    let b = model.add_parameters("b", &[4, 1]).unwrap();

    // 第2行被查了两次，第1、3、4行未被使用
    assert_gradients_match_finite_difference(&mut model, |cg, m| {
        let (w, b) = (cg.parameter(m, w)?, cg.parameter(m, b)?);
        let mut losses = Vec::new();
        for (word, target) in [(0, 1), (2, 3), (2, 0)] {
            let x = cg.lookup(m, table, word)?;
            let y = cg.affine_transform(&[b, w, x])?;
            losses.push(cg.pick_neg_log_softmax(y, target)?);
        }
        cg.sum(&losses)
    });
}
