//! 配置错误.

use thiserror::Error;

/// 纹理特征配置错误. 在任何扫描开始之前返回, 参数不会被静默修正.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// 粗糙度参数为负数或不是有限值.
    #[error("粗糙度参数必须为非负有限值, 实际为 {0}")]
    InvalidCoarseness(f64),

    /// 邻域距离为 0.
    #[error("邻域距离必须至少为 1")]
    ZeroNeighborhoodDistance,

    /// 邻域距离超过扫描范围内的最大边长.
    ///
    /// 第一个参数为配置的距离, 第二个参数为扫描范围内的最大边长.
    #[error("邻域距离 {0} 超过了扫描范围内的最大边长 {1}")]
    NeighborhoodTooLarge(usize, usize),

    /// 某个矩阵最大列数被配置为 0. 参数为字段名.
    #[error("矩阵最大列数 `{0}` 不能为 0")]
    ZeroMaxWidth(&'static str),

    /// 没有选择任何矩阵类别.
    #[error("至少需要选择一种纹理矩阵")]
    NoFamilies,

    /// 没有选择任何聚合策略.
    #[error("至少需要选择一种聚合策略")]
    NoAggregations,
}
