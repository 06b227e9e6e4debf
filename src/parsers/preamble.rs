//! # 前导信息解析
//!
//! 日志第一个作业之前的 job information 段落，形如：
//!
//! ```text
//!     hostname        = node042
//!     program         = nwchem
//!     date            = Mon Sep 21 10:02:13 2015
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用

use std::collections::BTreeMap;

/// 解析前导部分的 `key = value` 行
///
/// 键取第一个 `=` 之前的文本，值取最后一个 `=` 之后的文本。
pub fn parse_preamble(preamble: &str) -> BTreeMap<String, String> {
    let mut info = BTreeMap::new();

    for line in preamble.lines() {
        let (Some(first), Some(last)) = (line.find('='), line.rfind('=')) else {
            continue;
        };

        let key = line[..first].trim();
        let value = line[last + 1..].trim();
        info.insert(key.to_string(), value.to_string());
    }

    info
}
