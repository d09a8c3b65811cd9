/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 词典：词 ↔ 下标的双向映射
 *
 * 冻结前`convert_word`会为新词分配下标；冻结后词典不再增长，
 * 未登录词（设置过UNK时）统一映射到UNK
 */

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 句末输出标记
pub const EOS_OUTPUT: &str = "EOS_OUTPUT";
/// 未登录词标记
pub const UNK_STR: &str = "UNK_STR";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictError {
    #[error("词典已冻结且未设置UNK，无法查到词`{0}`")]
    UnknownWord(String),
    #[error("下标{index}越界，词典大小为{size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("词典尚未冻结，不能设置UNK")]
    NotFrozen,
    #[error("UNK已设置过，不能重复设置")]
    UnkAlreadySet,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dict {
    words: Vec<String>,
    index: HashMap<String, usize>,
    frozen: bool,
    unk_id: Option<usize>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// 词 → 下标。未冻结时新词会被加入词典；冻结后等同于`lookup_word`
    pub fn convert_word(&mut self, word: &str) -> Result<usize, DictError> {
        if let Some(&id) = self.index.get(word) {
            return Ok(id);
        }
        if self.frozen {
            return self.lookup_word(word);
        }
        Ok(self.push_word(word))
    }

    /// 只读查询：已有词返回其下标；未登录词在冻结且设置了UNK时返回UNK下标
    pub fn lookup_word(&self, word: &str) -> Result<usize, DictError> {
        match self.index.get(word) {
            Some(&id) => Ok(id),
            None => match (self.frozen, self.unk_id) {
                (true, Some(unk)) => Ok(unk),
                _ => Err(DictError::UnknownWord(word.to_string())),
            },
        }
    }

    /// 下标 → 词
    pub fn convert_index(&self, index: usize) -> Result<&str, DictError> {
        self.words
            .get(index)
            .map(String::as_str)
            .ok_or(DictError::IndexOutOfRange {
                index,
                size: self.words.len(),
            })
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// 冻结后设置UNK词（若该词不在词典中则加入），只能设置一次
    pub fn set_unk(&mut self, word: &str) -> Result<usize, DictError> {
        if !self.frozen {
            return Err(DictError::NotFrozen);
        }
        if self.unk_id.is_some() {
            return Err(DictError::UnkAlreadySet);
        }
        let id = match self.index.get(word) {
            Some(&id) => id,
            None => self.push_word(word),
        };
        self.unk_id = Some(id);
        Ok(id)
    }

    pub fn unk_id(&self) -> Option<usize> {
        self.unk_id
    }

    pub fn size(&self) -> usize {
        self.words.len()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    fn push_word(&mut self, word: &str) -> usize {
        let id = self.words.len();
        self.words.push(word.to_string());
        self.index.insert(word.to_string(), id);
        id
    }
}
