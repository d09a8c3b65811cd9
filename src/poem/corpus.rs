/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 训练语料的读取与首句切分
 */

use std::io::BufRead;

use log::debug;

use super::PoemError;
use super::dict::Dict;

/// 一句诗：词下标序列
pub type Sentence = Vec<usize>;
/// 一首诗：若干句
pub type Poem = Vec<Sentence>;

/// 读取训练语料：每行一首诗，句与句之间以TAB分隔，句内的词以空格分隔。
/// 所有词都经`dict`转换为下标（词典须未冻结，以便收录新词）
pub fn read_train_data<R: BufRead>(reader: R, dict: &mut Dict) -> Result<Vec<Poem>, PoemError> {
    let mut poems = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            debug!("跳过第{}行：空行", line_no + 1);
            continue;
        }
        let mut poem = Poem::new();
        for sentence in line.split('\t') {
            let words = sentence
                .split(' ')
                .filter(|w| !w.is_empty())
                .map(|w| dict.convert_word(w))
                .collect::<Result<Sentence, _>>()?;
            if !words.is_empty() {
                poem.push(words);
            }
        }
        poems.push(poem);
    }
    Ok(poems)
}

/// 把UTF-8字符串切成单个字符（丢弃空格），用于切分生成时的首句
pub fn slice_utf8_sentence(s: &str) -> Vec<String> {
    s.chars()
        .filter(|&c| c != ' ')
        .map(|c| c.to_string())
        .collect()
}
