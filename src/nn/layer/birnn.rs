/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 双向 LSTM 编码器
 *
 * 正向 LSTM 依次读入 SOS、x_1 … x_n；反向 LSTM 依次读入 EOS、x_n … x_1。
 * SOS/EOS 是可学习的哨兵向量，维度与输入相同
 */

use super::{LstmBuilder, unbound_error};
use crate::nn::{ComputationGraph, Expression, GraphError, ParameterCollection, ParameterId};

#[derive(Debug, Clone)]
pub struct BiLstmLayer {
    l2r: LstmBuilder,
    r2l: LstmBuilder,
    sos: ParameterId,
    eos: ParameterId,
    sentinels: Option<(Expression, Expression)>,
}

impl BiLstmLayer {
    pub fn new(
        model: &mut ParameterCollection,
        name: &str,
        layers: usize,
        input_dim: usize,
        hidden_dim: usize,
    ) -> Result<Self, GraphError> {
        let l2r = LstmBuilder::new(model, &format!("{name}_l2r"), layers, input_dim, hidden_dim)?;
        let r2l = LstmBuilder::new(model, &format!("{name}_r2l"), layers, input_dim, hidden_dim)?;
        let sos = model.add_parameters(&format!("{name}_SOS"), &[input_dim, 1])?;
        let eos = model.add_parameters(&format!("{name}_EOS"), &[input_dim, 1])?;
        Ok(Self {
            l2r,
            r2l,
            sos,
            eos,
            sentinels: None,
        })
    }

    /// `final_h`拼接后的维度：hidden_dim × layers × 2
    pub fn final_h_dim(&self) -> usize {
        self.l2r.hidden_dim() * self.l2r.layers() * 2
    }

    pub fn new_graph(
        &mut self,
        cg: &mut ComputationGraph,
        model: &ParameterCollection,
    ) -> Result<(), GraphError> {
        self.l2r.new_graph(cg, model)?;
        self.r2l.new_graph(cg, model)?;
        let sos = cg.parameter(model, self.sos)?;
        let eos = cg.parameter(model, self.eos)?;
        self.sentinels = Some((sos, eos));
        Ok(())
    }

    /// 双向编码整个序列，之后可用`final_h`取最终状态
    pub fn build_graph(
        &mut self,
        cg: &mut ComputationGraph,
        xs: &[Expression],
    ) -> Result<(), GraphError> {
        self.build_graph_with_outputs(cg, xs).map(|_| ())
    }

    /// 同`build_graph`，并返回与输入位置对齐的(正向输出, 反向输出)
    pub fn build_graph_with_outputs(
        &mut self,
        cg: &mut ComputationGraph,
        xs: &[Expression],
    ) -> Result<Vec<(Expression, Expression)>, GraphError> {
        let (sos, eos) = self.sentinels.ok_or_else(|| unbound_error("BiLstmLayer"))?;

        self.l2r.start_new_sequence(&[])?;
        self.l2r.add_input(cg, sos)?;
        let forward = xs
            .iter()
            .map(|&x| self.l2r.add_input(cg, x))
            .collect::<Result<Vec<_>, _>>()?;

        self.r2l.start_new_sequence(&[])?;
        self.r2l.add_input(cg, eos)?;
        let mut backward = xs
            .iter()
            .rev()
            .map(|&x| self.r2l.add_input(cg, x))
            .collect::<Result<Vec<_>, _>>()?;
        backward.reverse();

        Ok(forward.into_iter().zip(backward).collect())
    }

    /// 正向各层最终隐藏状态，后接反向各层最终隐藏状态
    pub fn final_h(&self) -> Result<Vec<Expression>, GraphError> {
        let mut hs = self.l2r.final_h()?;
        hs.extend(self.r2l.final_h()?);
        Ok(hs)
    }
}
