/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 模型参数集合：负责所有可学习张量的分配、初始化与持久化。
 *                 计算图只在构图时复制参数的值，训练时由优化器直接更新这里的张量
 */

mod serialization;

use crate::nn::GraphError;
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

/// 参数初始化所用随机数生成器的默认种子
pub const DEFAULT_INIT_SEED: u64 = 1234;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupParameterId(usize);

#[derive(Debug, Clone)]
struct NamedParameter {
    name: String,
    value: Tensor,
}

/// 查找表：`rows`个形状为[dim, 1]的行向量
#[derive(Debug, Clone)]
struct NamedLookup {
    name: String,
    dim: usize,
    rows: Vec<Tensor>,
}

/// 分配顺序中的一项，序列化按此顺序进行
#[derive(Debug, Clone, Copy)]
enum Slot {
    Dense(ParameterId),
    Lookup(LookupParameterId),
}

#[derive(Debug)]
pub struct ParameterCollection {
    params: Vec<NamedParameter>,
    lookups: Vec<NamedLookup>,
    order: Vec<Slot>,
    names: HashSet<String>,
    rng: StdRng,
}

impl Default for ParameterCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterCollection {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_INIT_SEED)
    }

    /// 指定参数初始化的随机种子。同样的种子与同样的分配顺序得到完全一样的初始参数
    pub fn with_seed(seed: u64) -> Self {
        Self {
            params: Vec::new(),
            lookups: Vec::new(),
            order: Vec::new(),
            names: HashSet::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓分配↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    /// 分配一个形状为`shape`的参数，并用Glorot均匀分布初始化：U(-s, s)，s = √(6 / Σdims)
    pub fn add_parameters(&mut self, name: &str, shape: &[usize]) -> Result<ParameterId, GraphError> {
        if shape.len() != 2 || shape.contains(&0) {
            return Err(GraphError::InvalidOperation(format!(
                "参数`{name}`的形状须为不含0的2阶形状，但得到{shape:?}"
            )));
        }
        self.register_name(name)?;
        let scale = (6.0 / shape.iter().sum::<usize>() as f32).sqrt();
        let value = Tensor::new_uniform_with_rng(-scale, scale, shape, &mut self.rng);
        let id = ParameterId(self.params.len());
        self.params.push(NamedParameter {
            name: name.to_string(),
            value,
        });
        self.order.push(Slot::Dense(id));
        Ok(id)
    }

    /// 分配一个`size`行、每行`dim`维的查找表。每行按U(-s, s)，s = √(6 / dim)初始化
    pub fn add_lookup_parameters(
        &mut self,
        name: &str,
        size: usize,
        dim: usize,
    ) -> Result<LookupParameterId, GraphError> {
        if size == 0 || dim == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "查找表`{name}`的行数与维度都须大于0，但得到{size}行{dim}维"
            )));
        }
        self.register_name(name)?;
        let scale = (6.0 / dim as f32).sqrt();
        let rows = (0..size)
            .map(|_| Tensor::new_uniform_with_rng(-scale, scale, &[dim, 1], &mut self.rng))
            .collect();
        let id = LookupParameterId(self.lookups.len());
        self.lookups.push(NamedLookup {
            name: name.to_string(),
            dim,
            rows,
        });
        self.order.push(Slot::Lookup(id));
        Ok(id)
    }

    fn register_name(&mut self, name: &str) -> Result<(), GraphError> {
        if !self.names.insert(name.to_string()) {
            return Err(GraphError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑分配↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓访问↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    fn entry(&self, id: ParameterId) -> Result<&NamedParameter, GraphError> {
        self.params
            .get(id.0)
            .ok_or_else(|| GraphError::ParameterNotFound(format!("{id:?}")))
    }

    fn table(&self, id: LookupParameterId) -> Result<&NamedLookup, GraphError> {
        self.lookups
            .get(id.0)
            .ok_or_else(|| GraphError::ParameterNotFound(format!("{id:?}")))
    }

    pub fn parameter(&self, id: ParameterId) -> Result<&Tensor, GraphError> {
        Ok(&self.entry(id)?.value)
    }

    pub(crate) fn parameter_mut(&mut self, id: ParameterId) -> Result<&mut Tensor, GraphError> {
        self.params
            .get_mut(id.0)
            .map(|p| &mut p.value)
            .ok_or_else(|| GraphError::ParameterNotFound(format!("{id:?}")))
    }

    pub fn parameter_name(&self, id: ParameterId) -> Result<&str, GraphError> {
        Ok(&self.entry(id)?.name)
    }

    /// 覆盖某个参数的值（形状须一致），如把LSTM遗忘门偏置设为1
    pub fn set_parameter(&mut self, id: ParameterId, value: Tensor) -> Result<(), GraphError> {
        let current = self.parameter_mut(id)?;
        if !current.is_same_shape(&value) {
            return Err(GraphError::ShapeMismatch {
                expected: current.shape().to_vec(),
                got: value.shape().to_vec(),
                message: format!("无法覆盖参数{id:?}的值"),
            });
        }
        *current = value;
        Ok(())
    }

    pub fn lookup_row(&self, id: LookupParameterId, row: usize) -> Result<&Tensor, GraphError> {
        let table = self.table(id)?;
        table.rows.get(row).ok_or_else(|| GraphError::IndexOutOfRange {
            index: row,
            len: table.rows.len(),
            message: format!("查找表`{}`没有这一行", table.name),
        })
    }

    pub(crate) fn lookup_row_mut(
        &mut self,
        id: LookupParameterId,
        row: usize,
    ) -> Result<&mut Tensor, GraphError> {
        let table = self
            .lookups
            .get_mut(id.0)
            .ok_or_else(|| GraphError::ParameterNotFound(format!("{id:?}")))?;
        if row >= table.rows.len() {
            return Err(GraphError::IndexOutOfRange {
                index: row,
                len: table.rows.len(),
                message: format!("查找表`{}`没有这一行", table.name),
            });
        }
        Ok(&mut table.rows[row])
    }

    pub fn lookup_name(&self, id: LookupParameterId) -> Result<&str, GraphError> {
        Ok(&self.table(id)?.name)
    }

    /// 查找表的行数
    pub fn lookup_size(&self, id: LookupParameterId) -> Result<usize, GraphError> {
        Ok(self.table(id)?.rows.len())
    }

    pub fn lookup_dim(&self, id: LookupParameterId) -> Result<usize, GraphError> {
        Ok(self.table(id)?.dim)
    }

    pub fn parameter_ids(&self) -> impl Iterator<Item = ParameterId> + use<> {
        (0..self.params.len()).map(ParameterId)
    }

    pub fn lookup_ids(&self) -> impl Iterator<Item = LookupParameterId> + use<> {
        (0..self.lookups.len()).map(LookupParameterId)
    }

    /// 参数张量（含查找表）的个数
    pub fn tensor_count(&self) -> usize {
        self.order.len()
    }

    /// 所有可学习标量的总数
    pub fn parameter_count(&self) -> usize {
        let dense: usize = self.params.iter().map(|p| p.value.size()).sum();
        let lookup: usize = self.lookups.iter().map(|l| l.rows.len() * l.dim).sum();
        dense + lookup
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑访问↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}
