//! # 解析器模块
//!
//! 把 NWChem 输出日志解码为 [`LogDocument`]。
//!
//! ## 流程
//! ```text
//! 日志文本 ─┬─ splitter ─┬─ preamble  -> 前导信息
//!           │            └─ job (×N)  -> 作业记录
//!           └─ tddft                  -> TDDFT 根
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: splitter, preamble, job, tddft, numeric

pub mod job;
pub mod numeric;
pub mod preamble;
pub mod splitter;
pub mod tddft;

pub use job::parse_job;
pub use preamble::parse_preamble;
pub use splitter::split_jobs;
pub use tddft::parse_tddft_roots;

use crate::error::{NwlogError, Result};
use crate::models::LogDocument;

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// 解析 NWChem 输出文件
///
/// `.gz` 结尾的日志先解压；非 UTF-8 字节替换为 U+FFFD 而不是整体失败。
pub fn parse_log_file(path: &Path) -> Result<LogDocument> {
    if !path.is_file() {
        return Err(NwlogError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let bytes = read_log_bytes(path).map_err(|e| NwlogError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(parse_log_content(&String::from_utf8_lossy(&bytes)))
}

/// 读取日志原始字节，按扩展名选择解压方式
fn read_log_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    if !is_gzip(path) {
        return fs::read(path);
    }

    let mut bytes = Vec::new();
    GzDecoder::new(File::open(path)?).read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// 是否为 gzip 压缩的日志
pub fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// 从字符串内容解析完整日志
///
/// 不会失败：空日志或没有作业边界的日志得到空文档。
pub fn parse_log_content(content: &str) -> LogDocument {
    let split = split_jobs(content);

    LogDocument {
        preamble: parse_preamble(split.preamble),
        jobs: split.jobs.into_iter().map(parse_job).collect(),
        tddft: parse_tddft_roots(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_log() {
        let doc = parse_log_content("");
        assert!(doc.is_empty());
        assert!(doc.preamble.is_empty());
        assert!(doc.tddft.is_empty());
    }

    #[test]
    fn test_parse_log_without_markers() {
        let doc = parse_log_content("program = nwchem\n Total DFT energy = -1.0\n");
        assert_eq!(doc.len(), 0);
        assert!(doc.preamble.is_empty());
    }

    #[test]
    fn test_parse_two_jobs() {
        let content = r#"
    hostname        = node042
    program         = nwchem

                                NWChem Input Module
                                -------------------
                                 NWChem DFT Module
         Total DFT energy =      -1.0
                                NWChem Input Module
                                -------------------
                                 NWChem DFT Module
         Total DFT energy =      -2.0
 calculations not reaching convergence
                                NWChem Input Module
                                -------------------
                                 CITATION
"#;
        let doc = parse_log_content(content);

        assert_eq!(doc.preamble["hostname"], "node042");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get(0).map(|j| j.job_type.as_str()), Some("NWChem DFT Module"));
        assert!(!doc.jobs[0].has_error);
        assert!(doc.jobs[1].has_error);
        assert!(doc.has_error());
    }

    const SMALL_LOG: &str = r#"
    hostname        = node042
                                NWChem Input Module
                                 NWChem SCF Module
         Total SCF energy =      -1.0
"#;

    #[test]
    fn test_parse_gzip_log() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let path = std::env::temp_dir().join("nwlog_gzip_test.nwout.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(SMALL_LOG.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let doc = parse_log_file(&path).unwrap();
        assert_eq!(doc, parse_log_content(SMALL_LOG));
        assert_eq!(doc.len(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let path = std::env::temp_dir().join("nwlog_invalid_utf8_test.nwout");
        let mut bytes = SMALL_LOG.as_bytes().to_vec();
        bytes.extend_from_slice(b" comment \xff\xfe here\n");
        fs::write(&path, &bytes).unwrap();

        let doc = parse_log_file(&path).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.jobs[0].energies.len(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_is_gzip() {
        assert!(is_gzip(Path::new("run/water.nwout.gz")));
        assert!(is_gzip(Path::new("water.out.GZ")));
        assert!(!is_gzip(Path::new("water.nwout")));
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_log_file(Path::new("definitely_missing.nwout"));
        assert!(matches!(result, Err(NwlogError::FileNotFound { .. })));
    }
}
