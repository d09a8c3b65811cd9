use super::unbound_error;
use crate::nn::{ComputationGraph, Expression, GraphError, ParameterCollection, ParameterId};

/// 全连接层：W·x + b，W 为 [output, input]，b 为 [output, 1]
#[derive(Debug, Clone)]
pub struct DenseLayer {
    w: ParameterId,
    b: ParameterId,
    exprs: Option<(Expression, Expression)>,
}

impl DenseLayer {
    pub fn new(
        model: &mut ParameterCollection,
        name: &str,
        input_dim: usize,
        output_dim: usize,
    ) -> Result<Self, GraphError> {
        let w = model.add_parameters(&format!("{name}_W"), &[output_dim, input_dim])?;
        let b = model.add_parameters(&format!("{name}_b"), &[output_dim, 1])?;
        Ok(Self { w, b, exprs: None })
    }

    pub fn new_graph(
        &mut self,
        cg: &mut ComputationGraph,
        model: &ParameterCollection,
    ) -> Result<(), GraphError> {
        let w = cg.parameter(model, self.w)?;
        let b = cg.parameter(model, self.b)?;
        self.exprs = Some((w, b));
        Ok(())
    }

    pub fn build(&self, cg: &mut ComputationGraph, x: Expression) -> Result<Expression, GraphError> {
        let (w, b) = self.exprs.ok_or_else(|| unbound_error("DenseLayer"))?;
        cg.affine_transform(&[b, w, x])
    }
}
