mod graph_backward;
mod model;
mod optimizer;

use crate::nn::{ComputationGraph, Expression, GraphError, ParameterCollection};

/// 在一张新图中构造损失并前向计算，返回标量损失值
fn eval_loss<F>(model: &ParameterCollection, build: &F) -> f32
where
    F: Fn(&mut ComputationGraph, &ParameterCollection) -> Result<Expression, GraphError>,
{
    let mut cg = ComputationGraph::new();
    let loss = build(&mut cg, model).unwrap();
    cg.forward(loss).unwrap().number().unwrap()
}

fn assert_close(numeric: f32, analytic: f32, what: &str) {
    let tolerance = 1e-2 * (1.0 + numeric.abs().max(analytic.abs()));
    assert!(
        (numeric - analytic).abs() <= tolerance,
        "{what}: 数值梯度{numeric}与解析梯度{analytic}相差过大"
    );
}

/// 用中心差分逐元素检查反向传播得到的参数与查找表梯度
fn assert_gradients_match_finite_difference<F>(model: &mut ParameterCollection, build: F)
where
    F: Fn(&mut ComputationGraph, &ParameterCollection) -> Result<Expression, GraphError>,
{
    let eps = 1e-2_f32;

    let mut cg = ComputationGraph::new();
    let loss = build(&mut cg, model).unwrap();
    cg.backward(loss).unwrap();
    let grads = cg.gradients();

    for id in model.parameter_ids() {
        let name = model.parameter_name(id).unwrap().to_string();
        for k in 0..model.parameter(id).unwrap().size() {
            let analytic = grads.param(id).map_or(0.0, |g| g.data_as_slice()[k]);
            let original = model.parameter(id).unwrap().data_as_slice()[k];

            model.parameter_mut(id).unwrap().data_as_slice_mut()[k] = original + eps;
            let plus = eval_loss(model, &build);
            model.parameter_mut(id).unwrap().data_as_slice_mut()[k] = original - eps;
            let minus = eval_loss(model, &build);
            model.parameter_mut(id).unwrap().data_as_slice_mut()[k] = original;

            let numeric = (plus - minus) / (2.0 * eps);
            assert_close(numeric, analytic, &format!("{name}[{k}]"));
        }
    }

    for id in model.lookup_ids() {
        let name = model.lookup_name(id).unwrap().to_string();
        for row in 0..model.lookup_size(id).unwrap() {
            for k in 0..model.lookup_dim(id).unwrap() {
                let analytic = grads
                    .lookup_row(id, row)
                    .map_or(0.0, |g| g.data_as_slice()[k]);
                let original = model.lookup_row(id, row).unwrap().data_as_slice()[k];

                model.lookup_row_mut(id, row).unwrap().data_as_slice_mut()[k] = original + eps;
                let plus = eval_loss(model, &build);
                model.lookup_row_mut(id, row).unwrap().data_as_slice_mut()[k] = original - eps;
                let minus = eval_loss(model, &build);
                model.lookup_row_mut(id, row).unwrap().data_as_slice_mut()[k] = original;

                let numeric = (plus - minus) / (2.0 * eps);
                assert_close(numeric, analytic, &format!("{name}[{row}][{k}]"));
            }
        }
    }
}
