//! # 作业切分
//!
//! NWChem 每次读取输入时都会打印 "NWChem Input Module" 横幅，
//! 以此把日志切成前导部分和若干作业块。
//!
//! ```text
//! <preamble> NWChem Input Module <job 1> NWChem Input Module <job 2> ... <CITATION ...>
//! ```
//!
//! 最后一个块若含有 "CITATION"，则是运行结束后的文献信息，直接丢弃。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用

/// 作业边界标记
pub const JOB_MARKER: &str = "NWChem Input Module";

/// 运行结束后文献块的标记
pub const CITATION_MARKER: &str = "CITATION";

/// 切分结果：前导部分 + 作业块（均不含边界标记本身）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLog<'a> {
    pub preamble: &'a str,
    pub jobs: Vec<&'a str>,
}

/// 切分日志
///
/// 没有任何边界标记时返回空前导和零个作业。
pub fn split_jobs(content: &str) -> SplitLog<'_> {
    let mut chunks = content.split(JOB_MARKER);
    let head = chunks.next().unwrap_or("");
    let mut jobs: Vec<&str> = chunks.collect();

    if jobs.is_empty() {
        return SplitLog {
            preamble: "",
            jobs,
        };
    }

    if jobs
        .last()
        .is_some_and(|last| last.contains(CITATION_MARKER))
    {
        jobs.pop();
    }

    SplitLog {
        preamble: head,
        jobs,
    }
}
