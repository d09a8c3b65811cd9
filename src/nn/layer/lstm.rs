/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 多层堆叠 LSTM，逐步喂入输入构图
 *
 * 公式（x_t 为本层输入，下层的 h_t 即上层的 x_t）:
 *   i_t = σ(W_xi·x_t + W_hi·h_{t-1} + b_i)     # 输入门
 *   f_t = σ(W_xf·x_t + W_hf·h_{t-1} + b_f)     # 遗忘门
 *   g_t = tanh(W_xg·x_t + W_hg·h_{t-1} + b_g)  # 候选细胞
 *   o_t = σ(W_xo·x_t + W_ho·h_{t-1} + b_o)     # 输出门
 *   c_t = f_t ⊙ c_{t-1} + i_t ⊙ g_t            # 细胞状态
 *   h_t = o_t ⊙ tanh(c_t)                      # 隐藏状态
 *
 * 权重布局: W_x* 为 [hidden, input]，W_h* 为 [hidden, hidden]，b_* 为 [hidden, 1]
 */

use super::unbound_error;
use crate::nn::{ComputationGraph, Expression, GraphError, ParameterCollection, ParameterId};
use crate::tensor::Tensor;

const GATES: [&str; 4] = ["i", "f", "g", "o"];
const INPUT_GATE: usize = 0;
const FORGET_GATE: usize = 1;
const CELL_GATE: usize = 2;
const OUTPUT_GATE: usize = 3;

#[derive(Debug, Clone)]
struct LstmLayerParams {
    w_x: [ParameterId; 4],
    w_h: [ParameterId; 4],
    b: [ParameterId; 4],
}

#[derive(Debug, Clone, Copy)]
struct LstmLayerExprs {
    w_x: [Expression; 4],
    w_h: [Expression; 4],
    b: [Expression; 4],
}

/// 多层堆叠 LSTM
///
/// 用法：`new_graph` → `start_new_sequence` → 多次 `add_input` → `final_h`/`final_c`
#[derive(Debug, Clone)]
pub struct LstmBuilder {
    input_dim: usize,
    hidden_dim: usize,
    params: Vec<LstmLayerParams>,
    exprs: Vec<LstmLayerExprs>,
    // 各层当前状态；None 表示零状态（序列刚开始且未给初始状态）
    c: Vec<Option<Expression>>,
    h: Vec<Option<Expression>>,
}

impl LstmBuilder {
    /// 分配`layers`层LSTM的参数，参数名以`name`为前缀。遗忘门偏置初始化为1，其余偏置为0
    pub fn new(
        model: &mut ParameterCollection,
        name: &str,
        layers: usize,
        input_dim: usize,
        hidden_dim: usize,
    ) -> Result<Self, GraphError> {
        if layers == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "LSTM`{name}`至少需要1层"
            )));
        }
        let mut params = Vec::with_capacity(layers);
        for layer in 0..layers {
            let layer_input_dim = if layer == 0 { input_dim } else { hidden_dim };
            let prefix = format!("{name}_{layer}");
            let w_x = alloc_gates(model, &prefix, "W_x", &[hidden_dim, layer_input_dim])?;
            let w_h = alloc_gates(model, &prefix, "W_h", &[hidden_dim, hidden_dim])?;
            let b = alloc_gates(model, &prefix, "b_", &[hidden_dim, 1])?;
            for (gate, id) in b.iter().enumerate() {
                let init = if gate == FORGET_GATE {
                    Tensor::ones(&[hidden_dim, 1])
                } else {
                    Tensor::zeros(&[hidden_dim, 1])
                };
                model.set_parameter(*id, init)?;
            }
            params.push(LstmLayerParams { w_x, w_h, b });
        }
        Ok(Self {
            input_dim,
            hidden_dim,
            params,
            exprs: Vec::new(),
            c: Vec::new(),
            h: Vec::new(),
        })
    }

    pub fn layers(&self) -> usize {
        self.params.len()
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    /// 把参数绑定进新的计算图，并清空状态
    pub fn new_graph(
        &mut self,
        cg: &mut ComputationGraph,
        model: &ParameterCollection,
    ) -> Result<(), GraphError> {
        let mut exprs = Vec::with_capacity(self.params.len());
        for p in &self.params {
            exprs.push(LstmLayerExprs {
                w_x: bind_gates(cg, model, &p.w_x)?,
                w_h: bind_gates(cg, model, &p.w_h)?,
                b: bind_gates(cg, model, &p.b)?,
            });
        }
        self.exprs = exprs;
        self.c = vec![None; self.params.len()];
        self.h = vec![None; self.params.len()];
        Ok(())
    }

    /// 开始一条新序列。`init`为空表示零状态；否则须含`2 × layers`个表达式，
    /// 前`layers`个为各层细胞状态，后`layers`个为各层隐藏状态
    pub fn start_new_sequence(&mut self, init: &[Expression]) -> Result<(), GraphError> {
        self.ensure_bound()?;
        let layers = self.layers();
        if init.is_empty() {
            self.c = vec![None; layers];
            self.h = vec![None; layers];
        } else if init.len() == 2 * layers {
            self.c = init[..layers].iter().copied().map(Some).collect();
            self.h = init[layers..].iter().copied().map(Some).collect();
        } else {
            return Err(GraphError::InvalidOperation(format!(
                "LSTM初始状态须为空或含{}个表达式（前{layers}个为细胞状态，后{layers}个为隐藏状态），但得到{}个",
                2 * layers,
                init.len()
            )));
        }
        Ok(())
    }

    /// 喂入一步输入，返回顶层的隐藏状态
    pub fn add_input(
        &mut self,
        cg: &mut ComputationGraph,
        x: Expression,
    ) -> Result<Expression, GraphError> {
        self.ensure_bound()?;
        let mut input = x;
        for layer in 0..self.layers() {
            let e = self.exprs[layer];
            let h_prev = self.h[layer];
            let gate_pre = |cg: &mut ComputationGraph, k: usize| match h_prev {
                Some(h) => cg.affine_transform(&[e.b[k], e.w_x[k], input, e.w_h[k], h]),
                None => cg.affine_transform(&[e.b[k], e.w_x[k], input]),
            };

            let pre_i = gate_pre(cg, INPUT_GATE)?;
            let i = cg.logistic(pre_i)?;
            let pre_f = gate_pre(cg, FORGET_GATE)?;
            let f = cg.logistic(pre_f)?;
            let pre_g = gate_pre(cg, CELL_GATE)?;
            let g = cg.tanh(pre_g)?;
            let pre_o = gate_pre(cg, OUTPUT_GATE)?;
            let o = cg.logistic(pre_o)?;

            let i_g = cg.cmult(i, g)?;
            let c = match self.c[layer] {
                Some(c_prev) => {
                    let f_c = cg.cmult(f, c_prev)?;
                    cg.add(&[f_c, i_g])?
                }
                None => i_g,
            };
            let tanh_c = cg.tanh(c)?;
            let h = cg.cmult(o, tanh_c)?;

            self.c[layer] = Some(c);
            self.h[layer] = Some(h);
            input = h;
        }
        Ok(input)
    }

    /// 各层（自底向上）最后的隐藏状态
    pub fn final_h(&self) -> Result<Vec<Expression>, GraphError> {
        self.ensure_bound()?;
        collect_states(&self.h, "隐藏")
    }

    /// 各层（自底向上）最后的细胞状态
    pub fn final_c(&self) -> Result<Vec<Expression>, GraphError> {
        self.ensure_bound()?;
        collect_states(&self.c, "细胞")
    }

    fn ensure_bound(&self) -> Result<(), GraphError> {
        if self.exprs.is_empty() {
            return Err(unbound_error("LstmBuilder"));
        }
        Ok(())
    }
}

fn alloc_gates(
    model: &mut ParameterCollection,
    prefix: &str,
    kind: &str,
    shape: &[usize],
) -> Result<[ParameterId; 4], GraphError> {
    let mut ids = Vec::with_capacity(4);
    for gate in GATES {
        ids.push(model.add_parameters(&format!("{prefix}_{kind}{gate}"), shape)?);
    }
    Ok([ids[0], ids[1], ids[2], ids[3]])
}

fn bind_gates(
    cg: &mut ComputationGraph,
    model: &ParameterCollection,
    ids: &[ParameterId; 4],
) -> Result<[Expression; 4], GraphError> {
    Ok([
        cg.parameter(model, ids[0])?,
        cg.parameter(model, ids[1])?,
        cg.parameter(model, ids[2])?,
        cg.parameter(model, ids[3])?,
    ])
}

fn collect_states(states: &[Option<Expression>], kind: &str) -> Result<Vec<Expression>, GraphError> {
    states
        .iter()
        .map(|s| {
            s.ok_or_else(|| {
                GraphError::InvalidOperation(format!(
                    "LSTM尚无{kind}状态：序列以零状态开始且还没有任何输入"
                ))
            })
        })
        .collect()
}
