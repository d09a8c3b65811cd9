/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : ParameterCollection 底层参数序列化（save_params/load_params）
 *
 * 格式（全部小端）：
 *   魔数 "PGPR" | 版本 u32 | 张量个数 u32 |
 *   每个张量：名称长度 u32 | 名称(UTF-8) | 阶数 u32 | 各维 u32 | f32 数据
 * 张量按分配顺序写出；查找表写成一个[rows, dim]的矩阵
 */

use super::{ParameterCollection, Slot};
use crate::nn::GraphError;
use std::io::{Read, Write};

/// 参数流魔数
const PARAMS_MAGIC: &[u8; 4] = b"PGPR";
/// 参数流版本
const PARAMS_VERSION: u32 = 1;

fn write_bytes<W: Write>(writer: &mut W, bytes: &[u8], what: &str) -> Result<(), GraphError> {
    writer
        .write_all(bytes)
        .map_err(|e| GraphError::ComputationError(format!("写入{what}失败: {e}")))
}

fn write_u32<W: Write>(writer: &mut W, value: u32, what: &str) -> Result<(), GraphError> {
    write_bytes(writer, &value.to_le_bytes(), what)
}

fn read_bytes<R: Read>(reader: &mut R, len: usize, what: &str) -> Result<Vec<u8>, GraphError> {
    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .map_err(|e| GraphError::ComputationError(format!("读取{what}失败: {e}")))?;
    Ok(buf)
}

fn read_u32<R: Read>(reader: &mut R, what: &str) -> Result<u32, GraphError> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| GraphError::ComputationError(format!("读取{what}失败: {e}")))?;
    Ok(u32::from_le_bytes(buf))
}

impl ParameterCollection {
    /// 张量在流中的名称与形状
    fn slot_signature(&self, slot: Slot) -> (&str, Vec<usize>) {
        match slot {
            Slot::Dense(id) => {
                let p = &self.params[id.0];
                (p.name.as_str(), p.value.shape().to_vec())
            }
            Slot::Lookup(id) => {
                let l = &self.lookups[id.0];
                (l.name.as_str(), vec![l.rows.len(), l.dim])
            }
        }
    }

    /// 按分配顺序写出全部参数
    pub fn save_params<W: Write>(&self, writer: &mut W) -> Result<(), GraphError> {
        write_bytes(writer, PARAMS_MAGIC, "魔数")?;
        write_u32(writer, PARAMS_VERSION, "版本")?;
        write_u32(writer, self.order.len() as u32, "参数数量")?;

        for &slot in &self.order {
            let (name, shape) = self.slot_signature(slot);
            write_u32(writer, name.len() as u32, "名称长度")?;
            write_bytes(writer, name.as_bytes(), "名称")?;
            write_u32(writer, shape.len() as u32, "形状维度")?;
            for &dim in &shape {
                write_u32(writer, dim as u32, "形状")?;
            }

            let bytes: Vec<u8> = match slot {
                Slot::Dense(id) => self.params[id.0]
                    .value
                    .data_as_slice()
                    .iter()
                    .flat_map(|v| v.to_le_bytes())
                    .collect(),
                Slot::Lookup(id) => self.lookups[id.0]
                    .rows
                    .iter()
                    .flat_map(|row| row.data_as_slice().iter().flat_map(|v| v.to_le_bytes()))
                    .collect(),
            };
            write_bytes(writer, &bytes, &format!("参数`{name}`的数据"))?;
        }

        writer
            .flush()
            .map_err(|e| GraphError::ComputationError(format!("刷新缓冲区失败: {e}")))
    }

    /// 读入`save_params`写出的参数流。
    ///
    /// 本集合须已按与保存时相同的结构分配好：张量个数、顺序、名称与形状都必须完全一致。
    /// 任何不一致都会报错，且此时本集合的参数保持不变
    pub fn load_params<R: Read>(&mut self, reader: &mut R) -> Result<(), GraphError> {
        let magic = read_bytes(reader, 4, "魔数")?;
        if magic.as_slice() != PARAMS_MAGIC {
            return Err(GraphError::ComputationError(
                "无效的参数流：魔数不符，请确保数据由save_params()写出".to_string(),
            ));
        }
        let version = read_u32(reader, "版本")?;
        if version != PARAMS_VERSION {
            return Err(GraphError::ComputationError(format!(
                "不支持的参数流版本: {version}"
            )));
        }
        let count = read_u32(reader, "参数数量")? as usize;
        if count != self.order.len() {
            return Err(GraphError::InvalidOperation(format!(
                "参数流中有{count}个张量，但模型中有{}个",
                self.order.len()
            )));
        }

        let mut loaded: Vec<Vec<f32>> = Vec::with_capacity(count);
        for &slot in &self.order {
            let (name, shape) = self.slot_signature(slot);

            let name_len = read_u32(reader, "名称长度")? as usize;
            if name_len != name.len() {
                return Err(GraphError::ParameterNotFound(format!(
                    "长度为{name_len}字节的名称（模型中此位置的参数为`{name}`）"
                )));
            }
            let got_name = String::from_utf8(read_bytes(reader, name_len, "名称")?)
                .map_err(|e| GraphError::ComputationError(format!("名称编码无效: {e}")))?;
            if got_name != name {
                return Err(GraphError::ParameterNotFound(format!(
                    "{got_name}（模型中此位置的参数为`{name}`）"
                )));
            }

            let ndim = read_u32(reader, "形状维度")? as usize;
            if ndim != shape.len() {
                return Err(GraphError::ShapeMismatch {
                    message: format!("参数`{name}`的阶数应为{}，但流中为{ndim}", shape.len()),
                    expected: shape,
                    got: vec![ndim],
                });
            }
            let got_shape = (0..ndim)
                .map(|_| read_u32(reader, "形状").map(|d| d as usize))
                .collect::<Result<Vec<_>, _>>()?;
            if got_shape != shape {
                return Err(GraphError::ShapeMismatch {
                    expected: shape,
                    got: got_shape,
                    message: format!("参数`{name}`的形状与模型不一致"),
                });
            }

            let len: usize = shape.iter().product();
            let bytes = read_bytes(reader, len * 4, &format!("参数`{name}`的数据"))?;
            let data = bytes
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            loaded.push(data);
        }

        for (index, data) in loaded.into_iter().enumerate() {
            match self.order[index] {
                Slot::Dense(id) => {
                    self.params[id.0]
                        .value
                        .data_as_slice_mut()
                        .copy_from_slice(&data);
                }
                Slot::Lookup(id) => {
                    let table = &mut self.lookups[id.0];
                    let dim = table.dim;
                    for (row, chunk) in table.rows.iter_mut().zip(data.chunks(dim)) {
                        row.data_as_slice_mut().copy_from_slice(chunk);
                    }
                }
            }
        }
        Ok(())
    }
}
