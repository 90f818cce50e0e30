//! 纹理特征计算配置.
//!
//! 配置文件解析不在本 crate 范围内. 启用 `serde` feature 后,
//! 外部解析器可以直接反序列化得到 [`TextureConfig`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregation, DistanceWeighting};
use crate::consts::{DEFAULT_COARSENESS, DEFAULT_NEIGHBORHOOD_DISTANCE};
use crate::features::NameStyle;
use crate::matrix::MatrixFamily;
use crate::scan::{Dim, NeighborhoodNorm};
use crate::volume::GreyLevelVolume;

mod error;

pub use error::ConfigError;

/// 纹理矩阵构建与聚合参数.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextureConfig {
    /// NGLDM 邻域距离 `d`.
    pub neighborhood_distance: usize,

    /// NGLDM 粗糙度参数 `c`. 灰度差不超过 `c` 的邻居被视为依赖.
    pub coarseness: f64,

    /// NGLDM 邻域度量.
    pub neighborhood_norm: NeighborhoodNorm,

    /// GLRLM 最大列数. `None` 时取扫描范围内的最大边长.
    pub max_run_length: Option<usize>,

    /// GLSZM 最大列数. `None` 时取 ROI 体素总数. 更大的区域计入最后一列.
    pub max_zone_size: Option<usize>,

    /// GLDZM 最大列数. `None` 时由扫描范围内的最短边长决定.
    pub max_distance: Option<usize>,

    /// 合并方向前对 GLRLM 各方向矩阵的加权方式.
    pub distance_weighting: DistanceWeighting,

    /// 需要计算的矩阵类别, 按此顺序输出.
    pub families: Vec<MatrixFamily>,

    /// 需要计算的聚合策略, 按此顺序输出.
    pub aggregations: Vec<Aggregation>,

    /// 特征命名风格.
    pub name_style: NameStyle,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            neighborhood_distance: DEFAULT_NEIGHBORHOOD_DISTANCE,
            coarseness: DEFAULT_COARSENESS,
            neighborhood_norm: NeighborhoodNorm::default(),
            max_run_length: None,
            max_zone_size: None,
            max_distance: None,
            distance_weighting: DistanceWeighting::default(),
            families: MatrixFamily::ALL.to_vec(),
            aggregations: Aggregation::ALL.to_vec(),
            name_style: NameStyle::default(),
        }
    }
}

impl TextureConfig {
    /// 检查与体数据无关的参数.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.coarseness.is_finite() || self.coarseness < 0.0 {
            return Err(ConfigError::InvalidCoarseness(self.coarseness));
        }
        if self.neighborhood_distance == 0 {
            return Err(ConfigError::ZeroNeighborhoodDistance);
        }
        for (name, width) in [
            ("max_run_length", self.max_run_length),
            ("max_zone_size", self.max_zone_size),
            ("max_distance", self.max_distance),
        ] {
            if width == Some(0) {
                return Err(ConfigError::ZeroMaxWidth(name));
            }
        }
        if self.families.is_empty() {
            return Err(ConfigError::NoFamilies);
        }
        if self.aggregations.is_empty() {
            return Err(ConfigError::NoAggregations);
        }
        Ok(())
    }

    /// 检查全部参数, 包括邻域距离不得超过 `volume` 在所选聚合策略扫描范围内的最大边长.
    ///
    /// 平面扫描的范围为 `max(h, w)`, 立体扫描为 `max(z, h, w)`. 同时选择两者时取较小者.
    pub fn validate_for(&self, volume: &GreyLevelVolume) -> Result<(), ConfigError> {
        self.validate()?;
        let (z, h, w) = volume.shape();
        let extent = self
            .aggregations
            .iter()
            .map(|a| match a.dim() {
                Dim::Planar => h.max(w),
                Dim::Volumetric => z.max(h).max(w),
            })
            .min()
            .unwrap_or(0);
        if self.neighborhood_distance > extent {
            return Err(ConfigError::NeighborhoodTooLarge(
                self.neighborhood_distance,
                extent,
            ));
        }
        Ok(())
    }
}
