//! 纹理特征计算入口.
//!
//! 一个 [`TextureExtractor`] 绑定一个体数据和一份配置, 对配置选中的每个
//! `矩阵类别 × 聚合策略` 输出一个 [`FeatureVector`]. 配置在任何扫描之前校验,
//! 校验失败时不产生任何输出.
//!
//! 强度-体积直方图特征不依赖纹理矩阵, 由 [`TextureExtractor::intensity_volume`] 单独给出,
//! 命名风格与纹理特征一致.

use std::collections::HashMap;

use log::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::aggregate::Aggregation;
use crate::config::{ConfigError, TextureConfig};
use crate::features::{feature_name, FeatureValue, Statistic};
use crate::ivh::IntensityVolumeFeatures;
use crate::matrix::{MatrixFamily, MatrixGroups, ScanReport};
use crate::scan::{Dim, DistanceMap};
use crate::volume::GreyLevelVolume;

/// 一个矩阵类别在一种聚合策略下的有序特征表.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FeatureVector {
    family: MatrixFamily,
    aggregation: Aggregation,
    features: Vec<(&'static str, FeatureValue)>,
    report: ScanReport,
}

impl FeatureVector {
    /// 矩阵类别.
    #[inline]
    pub fn family(&self) -> MatrixFamily {
        self.family
    }

    /// 聚合策略.
    #[inline]
    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// 特征表前缀, 如 `glrlm_2D_avg`.
    pub fn prefix(&self) -> String {
        format!(
            "{}_{}_{}",
            self.family.tag(),
            self.aggregation.dim().tag(),
            self.aggregation.tag()
        )
    }

    /// 按输出顺序排列的 (名称, 值).
    #[inline]
    pub fn features(&self) -> &[(&'static str, FeatureValue)] {
        &self.features
    }

    /// 按名称查找特征值.
    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.features
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    /// 扫描中被排除或截断的元素统计.
    #[inline]
    pub fn report(&self) -> &ScanReport {
        &self.report
    }

    /// 特征个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// 是否没有任何特征?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// 纹理特征计算器.
pub struct TextureExtractor<'a> {
    volume: &'a GreyLevelVolume,
    config: &'a TextureConfig,
    planar_distance: Option<DistanceMap>,
    volumetric_distance: Option<DistanceMap>,
}

impl<'a> TextureExtractor<'a> {
    /// 校验 `config` 并创建计算器.
    pub fn new(
        volume: &'a GreyLevelVolume,
        config: &'a TextureConfig,
    ) -> Result<Self, ConfigError> {
        config.validate_for(volume)?;
        Ok(Self {
            volume,
            config,
            planar_distance: None,
            volumetric_distance: None,
        })
    }

    /// 使用外部计算的距离图代替自动计算. 距离图只用于 `dim` 维度的 GLDZM.
    ///
    /// 形状与体数据不一致时程序 panic.
    pub fn with_distance_map(mut self, dim: Dim, map: DistanceMap) -> Self {
        assert_eq!(map.shape(), self.volume.shape(), "距离图与体数据形状不一致");
        match dim {
            Dim::Planar => self.planar_distance = Some(map),
            Dim::Volumetric => self.volumetric_distance = Some(map),
        }
        self
    }

    /// 构建 `family` 在 `dim` 下的全部矩阵组.
    pub fn matrix_groups(&self, family: MatrixFamily, dim: Dim) -> MatrixGroups {
        let distance = match dim {
            Dim::Planar => self.planar_distance.as_ref(),
            Dim::Volumetric => self.volumetric_distance.as_ref(),
        };
        family.build_groups_validated(self.volume, dim, self.config, distance)
    }

    /// 计算单个 `family × aggregation` 的特征表.
    pub fn extract(&self, family: MatrixFamily, aggregation: Aggregation) -> FeatureVector {
        let groups = self.matrix_groups(family, aggregation.dim());
        self.reduce(family, aggregation, &groups)
    }

    /// 按配置顺序计算全部选中的 `family × aggregation`.
    ///
    /// 同一类别同一维度的矩阵组只构建一次, 供多个聚合策略共享.
    pub fn extract_all(&self) -> Vec<FeatureVector> {
        let cfg = self.config;
        let mut ans = Vec::with_capacity(cfg.families.len() * cfg.aggregations.len());
        for &family in cfg.families.iter() {
            let mut cache: HashMap<Dim, MatrixGroups> = HashMap::with_capacity(2);
            for &aggregation in cfg.aggregations.iter() {
                let groups = cache
                    .entry(aggregation.dim())
                    .or_insert_with(|| self.matrix_groups(family, aggregation.dim()));
                ans.push(self.reduce(family, aggregation, groups));
            }
        }
        ans
    }

    /// 计算整个 ROI 的强度-体积直方图特征, 按配置的命名风格输出 (名称, 值).
    pub fn intensity_volume(&self) -> Vec<(&'static str, FeatureValue)> {
        IntensityVolumeFeatures::compute(self.volume).named(self.config.name_style)
    }

    fn reduce(
        &self,
        family: MatrixFamily,
        aggregation: Aggregation,
        groups: &MatrixGroups,
    ) -> FeatureVector {
        let values = aggregation.reduce(
            groups,
            self.config.distance_weighting,
            self.volume.spacing(),
        );
        let features = Statistic::for_family(family)
            .iter()
            .filter_map(|s| {
                let name = feature_name(family, *s, self.config.name_style)?;
                Some((name, values.get(*s)))
            })
            .collect();
        let ans = FeatureVector {
            family,
            aggregation,
            features,
            report: groups.report,
        };
        debug!("{} 计算完成, {} 个特征", ans.prefix(), ans.len());
        ans
    }
}
