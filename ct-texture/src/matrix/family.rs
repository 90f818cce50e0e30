//! 四类纹理矩阵的构建.

use std::ops::AddAssign;

use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::TextureMatrix;
use crate::config::{ConfigError, TextureConfig};
use crate::scan::{Dependences, Dim, DistanceMap, Offset, Runs, Zones};
use crate::volume::GreyLevelVolume;

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};

        /// 借助 `rayon`, 并行地对每个水平切片下标实施 `op` 操作. 结果按切片顺序排列.
        fn map_slices<T, F>(len_z: usize, op: F) -> Vec<T>
        where
            T: Send,
            F: Fn(usize) -> T + Sync + Send,
        {
            (0..len_z).into_par_iter().map(op).collect()
        }
    } else {
        /// 依次对每个水平切片下标实施 `op` 操作.
        fn map_slices<T, F>(len_z: usize, op: F) -> Vec<T>
        where
            F: Fn(usize) -> T,
        {
            (0..len_z).map(op).collect()
        }
    }
}

/// 纹理矩阵类别.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatrixFamily {
    /// 灰度游程矩阵 (GLRLM), 列为游程长度 - 1.
    RunLength,

    /// 灰度区域大小矩阵 (GLSZM), 列为区域大小 - 1.
    SizeZone,

    /// 灰度区域距离矩阵 (GLDZM), 列为区域最小边界距离 - 1.
    DistanceZone,

    /// 邻域灰度依赖矩阵 (NGLDM), 列为依赖计数.
    Dependence,
}

impl MatrixFamily {
    /// 全部类别.
    pub const ALL: [MatrixFamily; 4] = [
        MatrixFamily::RunLength,
        MatrixFamily::SizeZone,
        MatrixFamily::DistanceZone,
        MatrixFamily::Dependence,
    ];

    /// 短名, 用于特征表前缀.
    pub fn tag(self) -> &'static str {
        match self {
            MatrixFamily::RunLength => "glrlm",
            MatrixFamily::SizeZone => "glszm",
            MatrixFamily::DistanceZone => "gldzm",
            MatrixFamily::Dependence => "ngldm",
        }
    }

    /// 是否按方向分别构建矩阵? 只有游程矩阵如此.
    #[inline]
    pub fn has_directions(self) -> bool {
        matches!(self, MatrixFamily::RunLength)
    }

    /// 矩阵列数. 由配置给出, 或由 `volume` 在 `dim` 下的几何尺寸决定.
    ///
    /// 同一个体数据的所有切片共用这一列数, 以便合并.
    pub fn width(self, volume: &GreyLevelVolume, dim: Dim, config: &TextureConfig) -> usize {
        let (z, h, w) = volume.shape();
        let in_scope = match dim {
            Dim::Planar => vec![h, w],
            Dim::Volumetric => vec![z, h, w],
        };
        match self {
            MatrixFamily::RunLength => config
                .max_run_length
                .unwrap_or_else(|| in_scope.iter().copied().max().unwrap_or(0)),
            MatrixFamily::SizeZone => config
                .max_zone_size
                .unwrap_or_else(|| volume.region_len().max(1)),
            // 最短边长的一半 (向上取整) 也要包含在内, 故 + 1.
            MatrixFamily::DistanceZone => config.max_distance.unwrap_or_else(|| {
                in_scope
                    .iter()
                    .map(|v| num::Integer::div_ceil(v, &2))
                    .min()
                    .unwrap_or(0)
                    + 1
            }),
            MatrixFamily::Dependence => {
                crate::scan::neighborhood_offsets(
                    dim,
                    config.neighborhood_distance,
                    config.neighborhood_norm,
                )
                .count()
                    + 1
            }
        }
    }

    /// 对 `scope` 整体扫描一次, 返回各方向的矩阵 (无方向的类别只有一个矩阵).
    ///
    /// `scope` 可以是整个体数据, 也可以是单个切片的子体数据.
    /// GLDZM 未提供 `distance` 时按 `dim` 自动计算距离图.
    /// 调用者负责保证 `config` 已通过校验且 `width` 至少为 1.
    ///
    /// # 返回值
    ///
    /// 方向矩阵列表, 以及扫描过程中被排除或截断的元素统计.
    pub(crate) fn build(
        self,
        scope: &GreyLevelVolume,
        dim: Dim,
        width: usize,
        config: &TextureConfig,
        distance: Option<&DistanceMap>,
    ) -> (Vec<TextureMatrix>, ScanReport) {
        assert!(width > 0, "矩阵列数必须至少为 1");
        let rows = scope.grey_levels().len();
        let voxels = scope.region_len();
        let mut report = ScanReport::default();

        let matrices = match self {
            MatrixFamily::RunLength => dim
                .directions()
                .iter()
                .map(|dir| {
                    let mut m = TextureMatrix::zeros(rows, width, voxels);
                    let mut scratch = scope.scratch();
                    for run in Runs::new(scope, &mut scratch, *dir) {
                        if run.length > width {
                            report.dropped_runs += 1;
                            continue;
                        }
                        m.increment(run.grey_index, run.length - 1);
                    }
                    m
                })
                .collect(),
            MatrixFamily::SizeZone => {
                report.region_voxels += voxels;
                let mut m = TextureMatrix::zeros(rows, width, voxels);
                let mut scratch = scope.scratch();
                for zone in Zones::new(scope, &mut scratch, dim) {
                    report.zone_voxels += zone.size;
                    let k = if zone.size > width {
                        report.clipped_zones += 1;
                        width - 1
                    } else {
                        zone.size - 1
                    };
                    m.increment(zone.grey_index, k);
                }
                vec![m]
            }
            MatrixFamily::DistanceZone => {
                let built;
                let distance = match distance {
                    Some(d) => d,
                    None => {
                        built = DistanceMap::build(scope, dim);
                        &built
                    }
                };
                report.region_voxels += voxels;
                let mut m = TextureMatrix::zeros(rows, width, voxels);
                let mut scratch = scope.scratch();
                for zone in Zones::new(scope, &mut scratch, dim).with_distance(distance) {
                    report.zone_voxels += zone.size;
                    match zone.min_distance {
                        Some(0) | None => {
                            warn!(
                                "区域 (灰度级下标 {}, 大小 {}) 的最小边界距离为 0, 已排除",
                                zone.grey_index, zone.size
                            );
                            report.boundary_inconsistencies += 1;
                        }
                        Some(d) if d as usize > width => report.dropped_zones += 1,
                        Some(d) => m.increment(zone.grey_index, d as usize - 1),
                    }
                }
                vec![m]
            }
            MatrixFamily::Dependence => {
                let mut m = TextureMatrix::zeros(rows, width, voxels);
                let deps = Dependences::new(
                    scope,
                    dim,
                    config.neighborhood_distance,
                    config.neighborhood_norm,
                    config.coarseness,
                );
                assert!(deps.neighborhood_len() < width);
                for dep in deps {
                    m.increment(dep.grey_index, dep.count);
                }
                vec![m]
            }
        };
        (matrices, report)
    }

    /// 按 `dim` 构建全部矩阵组.
    ///
    /// [`Dim::Planar`] 下每个水平切片一组 (包括没有 ROI 体素的切片),
    /// [`Dim::Volumetric`] 下整个体数据只有一组. 每组内按方向排列.
    ///
    /// 启用 `rayon` feature 时各切片并行构建, 结果仍按切片顺序排列.
    ///
    /// # 错误
    ///
    /// `config` 未通过 [`TextureConfig::validate_for`] 时不做任何扫描, 直接返回错误.
    pub fn build_groups(
        self,
        volume: &GreyLevelVolume,
        dim: Dim,
        config: &TextureConfig,
        distance: Option<&DistanceMap>,
    ) -> Result<MatrixGroups, ConfigError> {
        config.validate_for(volume)?;
        Ok(self.build_groups_validated(volume, dim, config, distance))
    }

    /// 同 [`MatrixFamily::build_groups`], 但 `config` 已经校验过.
    pub(crate) fn build_groups_validated(
        self,
        volume: &GreyLevelVolume,
        dim: Dim,
        config: &TextureConfig,
        distance: Option<&DistanceMap>,
    ) -> MatrixGroups {
        let width = self.width(volume, dim, config);
        let directions: &'static [Offset] = if self.has_directions() {
            dim.directions()
        } else {
            &[]
        };

        let per_scope: Vec<(Vec<TextureMatrix>, ScanReport)> = match dim {
            Dim::Volumetric => vec![self.build(volume, dim, width, config, distance)],
            Dim::Planar => {
                let build_slice = |z: usize| {
                    let scope = volume.slice_volume(z);
                    let slice_distance = distance.map(|d| d.slice(z));
                    self.build(&scope, dim, width, config, slice_distance.as_ref())
                };
                map_slices(volume.len_z(), build_slice)
            }
        };

        let mut report = ScanReport::default();
        let groups = per_scope
            .into_iter()
            .map(|(matrices, r)| {
                report += r;
                matrices
            })
            .collect();
        debug!(
            "{} {} 矩阵构建完成: 列数 {}, {:?}",
            self.tag(),
            dim.tag(),
            width,
            report
        );
        MatrixGroups {
            groups,
            directions,
            report,
        }
    }
}

/// 扫描中可恢复异常的统计. 这些元素被排除或截断, 扫描照常继续.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanReport {
    /// 最小边界距离为 0 的区域个数 (距离图与 ROI 不一致).
    pub boundary_inconsistencies: usize,

    /// 长于矩阵列数而被丢弃的游程个数.
    pub dropped_runs: usize,

    /// 距离超出矩阵列数而被丢弃的区域个数.
    pub dropped_zones: usize,

    /// 大小超出矩阵列数而计入最后一列的区域个数.
    pub clipped_zones: usize,

    /// 被区域扫描覆盖的体素个数.
    pub zone_voxels: usize,

    /// 参与区域扫描的 ROI 体素个数. 非区域类别为 0.
    pub region_voxels: usize,
}

impl ScanReport {
    /// 是否没有任何元素被排除或截断?
    pub fn is_clean(&self) -> bool {
        self.boundary_inconsistencies == 0
            && self.dropped_runs == 0
            && self.dropped_zones == 0
            && self.clipped_zones == 0
    }

    /// 区域覆盖率 `zone_voxels / region_voxels`. 每个 ROI 体素恰好落入一个区域时为 `1.0`.
    ///
    /// 非区域类别或 ROI 为空时返回 `None`.
    pub fn zone_coverage(&self) -> Option<f64> {
        (self.region_voxels > 0).then(|| self.zone_voxels as f64 / self.region_voxels as f64)
    }
}

impl AddAssign for ScanReport {
    fn add_assign(&mut self, rhs: Self) {
        self.boundary_inconsistencies += rhs.boundary_inconsistencies;
        self.dropped_runs += rhs.dropped_runs;
        self.dropped_zones += rhs.dropped_zones;
        self.clipped_zones += rhs.clipped_zones;
        self.zone_voxels += rhs.zone_voxels;
        self.region_voxels += rhs.region_voxels;
    }
}

/// 一个矩阵类别在某一扫描维度下的全部矩阵.
#[derive(Debug, Clone)]
pub struct MatrixGroups {
    /// 外层按切片 (立体模式只有一组), 内层按方向.
    pub groups: Vec<Vec<TextureMatrix>>,

    /// 内层各矩阵对应的游程方向. 无方向的类别为空.
    pub directions: &'static [Offset],

    /// 全部组的异常统计之和.
    pub report: ScanReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NOT_IN_REGION as NAN;
    use ndarray::{array, Array3};

    fn cfg() -> TextureConfig {
        TextureConfig::default()
    }

    fn groups(
        family: MatrixFamily,
        vol: &GreyLevelVolume,
        dim: Dim,
        c: &TextureConfig,
    ) -> MatrixGroups {
        family.build_groups(vol, dim, c, None).unwrap()
    }

    /// 4x4 单切片, 两个灰度级.
    fn two_level_4x4() -> GreyLevelVolume {
        let data = array![[
            [1.0, 1.0, 2.0, 2.0],
            [1.0, 2.0, 2.0, 1.0],
            [2.0, 2.0, 1.0, 1.0],
            [1.0, 2.0, 1.0, 2.0]
        ]];
        GreyLevelVolume::new(data, [1.0; 3])
    }

    #[test]
    fn test_sum_equals_processed() {
        let vol = two_level_4x4();
        let c = cfg();

        let runs = groups(MatrixFamily::RunLength, &vol, Dim::Planar, &c);
        assert_eq!(runs.groups.len(), 1);
        assert_eq!(runs.groups[0].len(), 4);
        for (m, dir) in runs.groups[0].iter().zip(runs.directions) {
            let mut scratch = vol.scratch();
            let n = Runs::new(&vol, &mut scratch, *dir).count();
            assert_eq!(m.total(), n as f64);
            // 每条游程的长度之和等于 ROI 体素数.
            let covered: f64 = m
                .col_sums()
                .iter()
                .enumerate()
                .map(|(k, c)| c * (k + 1) as f64)
                .sum();
            assert_eq!(covered, 16.0);
        }

        let zones = groups(MatrixFamily::SizeZone, &vol, Dim::Planar, &c);
        let mut scratch = vol.scratch();
        let n = Zones::new(&vol, &mut scratch, Dim::Planar).count();
        assert_eq!(zones.groups[0][0].total(), n as f64);
        assert_eq!(zones.report.zone_voxels, 16);

        let deps = groups(MatrixFamily::Dependence, &vol, Dim::Planar, &c);
        assert_eq!(deps.groups[0][0].total(), 16.0);
        assert_eq!(deps.groups[0][0].cols(), 9);
    }

    #[test]
    fn test_corner_hole_scenario() {
        let data = array![[[NAN, 5.0, 5.0], [5.0, 5.0, 5.0], [5.0, 5.0, 5.0]]];
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        let g = groups(MatrixFamily::SizeZone, &vol, Dim::Planar, &cfg());
        let m = &g.groups[0][0];
        assert_eq!(m.total(), 1.0);
        assert_eq!(m.counts()[(0, 7)], 1.0);
        assert_eq!(g.report.region_voxels, 8);
        assert_eq!(g.report.zone_coverage(), Some(1.0));
        assert!(g.report.is_clean());

        let g = groups(MatrixFamily::RunLength, &vol, Dim::Planar, &cfg());
        assert_eq!(g.report.zone_coverage(), None);
    }

    #[test]
    fn test_single_voxel() {
        let data = array![[[NAN, NAN, NAN], [NAN, 3.0, NAN], [NAN, NAN, NAN]]];
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        for family in [MatrixFamily::SizeZone, MatrixFamily::DistanceZone] {
            let g = groups(family, &vol, Dim::Planar, &cfg());
            let m = &g.groups[0][0];
            assert_eq!(m.total(), 1.0);
            assert_eq!(m.counts()[(0, 0)], 1.0);
        }
    }

    #[test]
    fn test_empty_slices_are_kept() {
        let data = array![[[1.0, 2.0]], [[NAN, NAN]], [[2.0, 2.0]]];
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        let g = groups(MatrixFamily::DistanceZone, &vol, Dim::Planar, &cfg());
        assert_eq!(g.groups.len(), 3);
        assert_eq!(g.groups[1][0].total(), 0.0);
        assert_eq!(g.groups[1][0].voxels(), 0);
        assert!(g.report.is_clean());
    }

    #[test]
    fn test_long_runs_dropped() {
        let vol = GreyLevelVolume::new(Array3::from_elem((1, 1, 5), 1.0), [1.0; 3]);
        let c = TextureConfig {
            max_run_length: Some(3),
            ..cfg()
        };
        let g = groups(MatrixFamily::RunLength, &vol, Dim::Planar, &c);
        // 0° 方向上唯一的游程长度为 5, 被丢弃.
        assert_eq!(g.groups[0][0].total(), 0.0);
        assert_eq!(g.report.dropped_runs, 1);
        // 90° 方向上是 5 条长度为 1 的游程.
        assert_eq!(g.groups[0][2].counts()[(0, 0)], 5.0);
    }

    #[test]
    fn test_large_zones_clipped() {
        let vol = GreyLevelVolume::new(Array3::from_elem((1, 2, 3), 1.0), [1.0; 3]);
        let c = TextureConfig {
            max_zone_size: Some(4),
            ..cfg()
        };
        let g = groups(MatrixFamily::SizeZone, &vol, Dim::Planar, &c);
        assert_eq!(g.groups[0][0].counts()[(0, 3)], 1.0);
        assert_eq!(g.report.clipped_zones, 1);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_scan() {
        let vol = GreyLevelVolume::new(Array3::from_elem((1, 2, 3), 1.0), [1.0; 3]);
        let c = TextureConfig {
            max_zone_size: Some(0),
            ..cfg()
        };
        let ans = MatrixFamily::SizeZone.build_groups(&vol, Dim::Planar, &c, None);
        assert!(matches!(ans, Err(ConfigError::ZeroMaxWidth("max_zone_size"))));

        let c = TextureConfig {
            neighborhood_distance: 4,
            ..cfg()
        };
        let ans = MatrixFamily::Dependence.build_groups(&vol, Dim::Planar, &c, None);
        assert!(matches!(ans, Err(ConfigError::NeighborhoodTooLarge(4, 3))));
    }

    #[test]
    fn test_inconsistent_distance_map() {
        let vol = GreyLevelVolume::new(Array3::from_elem((1, 2, 2), 1.0), [1.0; 3]);
        let bad = DistanceMap::from_raw(array![[[1, 1], [1, 0]]]);
        let width = MatrixFamily::DistanceZone.width(&vol, Dim::Planar, &cfg());
        let (ms, report) =
            MatrixFamily::DistanceZone.build(&vol, Dim::Planar, width, &cfg(), Some(&bad));
        assert_eq!(ms[0].total(), 0.0);
        assert_eq!(report.boundary_inconsistencies, 1);

        // 正确的距离图不会触发该分支.
        let good = DistanceMap::build(&vol, Dim::Planar);
        let (ms, report) =
            MatrixFamily::DistanceZone.build(&vol, Dim::Planar, width, &cfg(), Some(&good));
        assert_eq!(ms[0].total(), 1.0);
        assert_eq!(report.boundary_inconsistencies, 0);
    }

    #[test]
    fn test_widths() {
        let vol = GreyLevelVolume::new(Array3::from_elem((2, 5, 4), 1.0), [1.0; 3]);
        let c = cfg();
        assert_eq!(MatrixFamily::RunLength.width(&vol, Dim::Planar, &c), 5);
        assert_eq!(MatrixFamily::SizeZone.width(&vol, Dim::Planar, &c), 40);
        assert_eq!(MatrixFamily::DistanceZone.width(&vol, Dim::Planar, &c), 3);
        assert_eq!(MatrixFamily::DistanceZone.width(&vol, Dim::Volumetric, &c), 2);
        assert_eq!(MatrixFamily::Dependence.width(&vol, Dim::Volumetric, &c), 27);
    }

    #[test]
    fn test_fresh_copy_is_idempotent() {
        let vol = two_level_4x4();
        let c = cfg();
        for family in MatrixFamily::ALL {
            let a = groups(family, &vol, Dim::Volumetric, &c);
            let b = groups(family, &vol, Dim::Volumetric, &c);
            assert_eq!(a.groups, b.groups);
        }
    }
}
