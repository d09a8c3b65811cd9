/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 模型文件的存取
 *
 * 文件布局：
 *   魔数`PGCK` | 版本号(u32, 小端) | bincode编码的(超参数, 词典) | 参数流（见`ParameterCollection::save_params`）
 * 写入时先写同目录下的`<文件名>.tmp`，写完再改名，避免中途失败留下半个文件
 */

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use bincode::Options;
use log::info;

use super::PoemError;
use super::dict::Dict;
use super::generator::{Hyperparams, PoemGenerator};
use crate::nn::DEFAULT_INIT_SEED;

const MAGIC: &[u8; 4] = b"PGCK";
const VERSION: u32 = 1;
/// 头部（超参数与词典）编码后的字节数上限
const HEADER_LIMIT: u64 = 64 << 20;

/// 定长整数编码，并限制头部大小，避免按损坏的长度前缀分配内存
fn header_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(HEADER_LIMIT)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

pub fn save<P: AsRef<Path>>(generator: &PoemGenerator, path: P) -> Result<(), PoemError> {
    let path = path.as_ref();
    info!("saving model ...");
    let tmp = tmp_path(path);
    let written = write_file(generator, &tmp).and_then(|()| Ok(fs::rename(&tmp, path)?));
    if let Err(e) = written {
        // 临时文件可能不存在，删除失败无需处理
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    info!("saved to {}", path.display());
    Ok(())
}

fn write_file(generator: &PoemGenerator, path: &Path) -> Result<(), PoemError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_to(generator, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<PoemGenerator, PoemError> {
    let path = path.as_ref();
    info!("loading model from {} ...", path.display());
    let mut reader = BufReader::new(File::open(path)?);
    let generator = read_from(&mut reader)?;
    info!("loaded");
    Ok(generator)
}

pub fn write_to<W: Write>(generator: &PoemGenerator, writer: &mut W) -> Result<(), PoemError> {
    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    header_options().serialize_into(&mut *writer, &(generator.hyperparams(), generator.dict()))?;
    generator.model().save_params(writer)?;
    Ok(())
}

pub fn read_from<R: Read>(reader: &mut R) -> Result<PoemGenerator, PoemError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(PoemError::Checkpoint(format!(
            "魔数应为{MAGIC:?}，但读到{magic:?}"
        )));
    }
    let mut version = [0u8; 4];
    reader.read_exact(&mut version)?;
    let version = u32::from_le_bytes(version);
    if version != VERSION {
        return Err(PoemError::Checkpoint(format!(
            "不支持的版本号{version}（当前为{VERSION}）"
        )));
    }

    let (hp, dict): (Hyperparams, Dict) = header_options().deserialize_from(&mut *reader)?;
    if dict.size() != hp.word_dict_size {
        return Err(PoemError::Checkpoint(format!(
            "词典大小{}与存储的词表大小{}不一致",
            dict.size(),
            hp.word_dict_size
        )));
    }
    let mut generator = PoemGenerator::build_model(hp, dict, DEFAULT_INIT_SEED)?;
    generator.model_mut().load_params(reader)?;
    Ok(generator)
}
