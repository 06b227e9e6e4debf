//! # 日志文件收集器
//!
//! 根据输入路径和模式收集待解析的 NWChem 日志列表。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - glob 模式匹配（逗号分隔多模式）
//! - 递归目录搜索，结果按路径排序
//!
//! ## 依赖关系
//! - 被 `commands/parse.rs` 和 `commands/summary.rs` 调用
//! - 使用 `walkdir` 遍历目录
//! - 使用 `glob` 匹配文件名

use crate::error::{NwlogError, Result};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// NWChem 日志常见扩展名，含 gzip 压缩版本
pub const DEFAULT_LOG_PATTERN: &str = "*.nwout,*.out,*.log,*.nwout.gz,*.out.gz,*.log.gz";

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器，默认匹配常见日志扩展名
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: compile_patterns(DEFAULT_LOG_PATTERN).unwrap_or_default(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let patterns = compile_patterns(pattern)?;
        if !patterns.is_empty() {
            self.patterns = patterns;
        }
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 检查输入是否为单文件
    pub fn is_single_file(&self) -> bool {
        self.input.is_file()
    }

    /// 收集所有匹配的文件
    ///
    /// 单文件输入不做模式过滤；输入不存在时返回 `DirectoryNotFound`。
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }

        if !self.input.is_dir() {
            return Err(NwlogError::DirectoryNotFound {
                path: self.input.display().to_string(),
            });
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|entry| self.matches_patterns(entry.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        Ok(files)
    }

    /// 当前模式的可读形式，用于 NoFilesFound 报错
    pub fn pattern_display(&self) -> String {
        self.patterns
            .iter()
            .map(Pattern::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// 检查文件是否匹配任一模式
    fn matches_patterns(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        self.patterns.iter().any(|p| p.matches(filename))
    }
}

fn compile_patterns(pattern: &str) -> Result<Vec<Pattern>> {
    pattern
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Pattern::new(s).map_err(|e| {
                NwlogError::InvalidArgument(format!("invalid pattern '{}': {}", s, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_pattern_matching() {
        let collector = FileCollector::new(PathBuf::from("."));
        assert!(collector.matches_patterns(Path::new("water.nwout")));
        assert!(collector.matches_patterns(Path::new("runs/h2o-opt.out")));
        assert!(!collector.matches_patterns(Path::new("water.nw")));
        assert!(collector.matches_patterns(Path::new("water.nwout.gz")));
        assert!(!collector.matches_patterns(Path::new("water.nw.gz")));

        let collector = FileCollector::new(PathBuf::from("."))
            .with_pattern("job?.nwo, *.txt")
            .unwrap();
        assert!(collector.matches_patterns(Path::new("job1.nwo")));
        assert!(!collector.matches_patterns(Path::new("job12.nwo")));
        assert!(collector.matches_patterns(Path::new("notes.txt")));
        assert_eq!(collector.pattern_display(), "job?.nwo,*.txt");
    }

    #[test]
    fn test_invalid_pattern() {
        let result = FileCollector::new(PathBuf::from(".")).with_pattern("[a-");
        assert!(matches!(result, Err(NwlogError::InvalidArgument(_))));
    }

    #[test]
    fn test_collect_directory() {
        let root = std::env::temp_dir().join("nwlog_collector_test");
        let nested = root.join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join("b.nwout"), "").unwrap();
        fs::write(root.join("a.log"), "").unwrap();
        fs::write(root.join("input.nw"), "").unwrap();
        fs::write(nested.join("c.out"), "").unwrap();

        let flat = FileCollector::new(root.clone()).collect().unwrap();
        let names: Vec<_> = flat
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.log", "b.nwout"]);

        let deep = FileCollector::new(root.clone())
            .recursive(true)
            .collect()
            .unwrap();
        assert_eq!(deep.len(), 3);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_collect_missing_input() {
        let result = FileCollector::new(PathBuf::from("no_such_dir_for_nwlog")).collect();
        assert!(matches!(result, Err(NwlogError::DirectoryNotFound { .. })));
    }
}
