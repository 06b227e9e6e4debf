//! # 数值记号处理
//!
//! NWChem 的 Hessian 等数组以 Fortran 格式打印（`1.234D-02`），
//! 解析前需把 `D` 指数标记换成 `e`。
//!
//! ## 依赖关系
//! - 被 `parsers/job.rs`, `parsers/tddft.rs` 使用

/// 把 Fortran `D`/`d` 指数标记转换为标准的 `e`
pub fn normalize_fortran(token: &str) -> String {
    token.replace(['D', 'd'], "e")
}

/// 解析可能带 Fortran 指数的浮点数，NaN 与无穷视为无效
pub fn parse_fortran_float(token: &str) -> Option<f64> {
    normalize_fortran(token)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// 解析一串浮点记号，任意一个失败则整体返回 None
pub fn parse_fortran_floats<'a, I>(tokens: I) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens.into_iter().map(parse_fortran_float).collect()
}

/// 解析一串普通浮点记号，任意一个失败则整体返回 None
pub fn parse_floats<'a, I>(tokens: I) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens
        .into_iter()
        .map(|t| t.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect()
}

/// 不含小数点的记号视为标签（列号等），而非数据
pub fn is_label_token(token: &str) -> bool {
    !token.contains('.')
}

/// 按顺序每三个值组成一个 (x, y, z)，不足三个的尾部丢弃
pub fn into_triples(values: &[f64]) -> Vec<[f64; 3]> {
    values
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fortran_float() {
        assert_eq!(parse_fortran_float("1.5D+02"), Some(150.0));
        assert_eq!(parse_fortran_float("-2.5d-01"), Some(-0.25));
        assert_eq!(parse_fortran_float("3.0E+00"), Some(3.0));
        assert_eq!(parse_fortran_float("0.125"), Some(0.125));
        assert_eq!(parse_fortran_float("abc"), None);
    }

    #[test]
    fn test_parse_floats_all_or_nothing() {
        assert_eq!(parse_floats(["1.0", "-2.0"]), Some(vec![1.0, -2.0]));
        assert_eq!(parse_floats(["1.0", "x"]), None);
        assert_eq!(
            parse_fortran_floats(["1.0D+00", "2.0D+00"]),
            Some(vec![1.0, 2.0])
        );
    }

    #[test]
    fn test_non_finite_tokens_are_rejected() {
        assert_eq!(parse_fortran_float("NaN"), None);
        assert_eq!(parse_fortran_float("inf"), None);
        assert_eq!(parse_fortran_float("-Infinity"), None);
        assert_eq!(parse_floats(["1.0", "NaN"]), None);
        assert_eq!(parse_floats(["infinity"]), None);
    }

    #[test]
    fn test_is_label_token() {
        assert!(is_label_token("2"));
        assert!(!is_label_token("4.18890D+01"));
    }

    #[test]
    fn test_into_triples() {
        let flat = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let triples = into_triples(&flat);
        assert_eq!(triples, vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }
}
