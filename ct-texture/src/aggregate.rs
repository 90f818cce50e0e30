//! 矩阵聚合策略.
//!
//! 聚合策略只决定特征导出与矩阵求和的先后顺序, 导出公式本身与策略无关.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::STATISTIC_COUNT;
use crate::features::{FeatureValue, Statistic, TextureFeatures};
use crate::matrix::{MatrixGroups, TextureMatrix};
use crate::scan::{Dim, Offset};

/// 聚合策略.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Aggregation {
    /// 逐切片逐方向导出特征, 再取算术平均.
    Average2d,

    /// 逐切片合并各方向矩阵后导出特征, 再对切片取算术平均.
    SliceMerge2d,

    /// 合并全部切片全部方向的矩阵, 只导出一次特征.
    Merge2d,

    /// 整体扫描, 逐方向导出特征, 再取算术平均.
    Average3d,

    /// 整体扫描, 合并全部方向的矩阵, 只导出一次特征.
    Merge3d,
}

impl Aggregation {
    /// 全部策略.
    pub const ALL: [Aggregation; 5] = [
        Aggregation::Average2d,
        Aggregation::SliceMerge2d,
        Aggregation::Merge2d,
        Aggregation::Average3d,
        Aggregation::Merge3d,
    ];

    /// 该策略所需的扫描维度.
    #[inline]
    pub fn dim(self) -> Dim {
        match self {
            Aggregation::Average2d | Aggregation::SliceMerge2d | Aggregation::Merge2d => {
                Dim::Planar
            }
            Aggregation::Average3d | Aggregation::Merge3d => Dim::Volumetric,
        }
    }

    /// 短名, 用于特征表前缀.
    pub fn tag(self) -> &'static str {
        match self {
            Aggregation::Average2d | Aggregation::Average3d => "avg",
            Aggregation::SliceMerge2d => "dmrg",
            Aggregation::Merge2d | Aggregation::Merge3d => "mrg",
        }
    }

    /// 将 `groups` 归约为一组特征.
    ///
    /// `weighting` 不为 [`DistanceWeighting::None`] 时, 合并方向之前每个方向矩阵乘以
    /// `1 / ‖方向 ⊙ spacing‖`. 逐方向求平均的策略不受其影响.
    pub fn reduce(
        self,
        groups: &MatrixGroups,
        weighting: DistanceWeighting,
        spacing: [f64; 3],
    ) -> TextureFeatures {
        let weights = weighting.weights(groups.directions, spacing);
        let merge_group = |group: &[TextureMatrix]| -> Option<TextureMatrix> {
            match &weights {
                Some(ws) => {
                    assert_eq!(ws.len(), group.len());
                    let scaled: Vec<_> = group
                        .iter()
                        .zip(ws)
                        .map(|(m, w)| m.scaled(*w))
                        .collect();
                    TextureMatrix::merge_all(&scaled)
                }
                None => TextureMatrix::merge_all(group),
            }
        };

        match self {
            Aggregation::Average2d | Aggregation::Average3d => {
                let mut acc = FeatureAccumulator::new();
                for m in groups.groups.iter().flatten() {
                    acc.push(&TextureFeatures::derive(m));
                }
                acc.finish()
            }
            Aggregation::SliceMerge2d => {
                let mut acc = FeatureAccumulator::new();
                for merged in groups.groups.iter().filter_map(|g| merge_group(g.as_slice())) {
                    acc.push(&TextureFeatures::derive(&merged));
                }
                acc.finish()
            }
            Aggregation::Merge2d | Aggregation::Merge3d => {
                let per_group: Vec<_> = groups
                    .groups
                    .iter()
                    .filter_map(|g| merge_group(g.as_slice()))
                    .collect();
                let merged = TextureMatrix::merge_all(&per_group)
                    .unwrap_or_else(|| TextureMatrix::zeros(0, 0, 0));
                TextureFeatures::derive(&merged)
            }
        }
    }
}

/// 方向距离加权方式.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceWeighting {
    /// 不加权.
    #[default]
    None,

    /// 曼哈顿距离 `Σ|d_i s_i|`.
    Manhattan,

    /// 欧氏距离 `sqrt(Σ (d_i s_i)²)`.
    Euclidean,

    /// 切比雪夫距离 `max |d_i s_i|`.
    Chebyshev,
}

impl DistanceWeighting {
    /// 方向 `(dz, dh, dw)` 在体素分辨率 `spacing` 下的长度.
    pub fn norm(self, (dz, dh, dw): Offset, spacing: [f64; 3]) -> f64 {
        let comps = [
            dz as f64 * spacing[0],
            dh as f64 * spacing[1],
            dw as f64 * spacing[2],
        ];
        match self {
            DistanceWeighting::None => 1.0,
            DistanceWeighting::Manhattan => comps.iter().map(|v| v.abs()).sum(),
            DistanceWeighting::Euclidean => comps.iter().map(|v| v * v).sum::<f64>().sqrt(),
            DistanceWeighting::Chebyshev => comps.iter().fold(0.0, |acc, v| v.abs().max(acc)),
        }
    }

    /// 各方向的权重 `1 / norm`. 不加权或没有方向时返回 `None`.
    pub fn weights(self, directions: &[Offset], spacing: [f64; 3]) -> Option<Vec<f64>> {
        if self == DistanceWeighting::None || directions.is_empty() {
            return None;
        }
        Some(
            directions
                .iter()
                .map(|d| 1.0 / self.norm(*d, spacing))
                .collect(),
        )
    }
}

/// 逐统计量的算术平均累加器.
///
/// 每个样本都计入分母. 某个样本的统计量未计算时按 0 累加;
/// 只有当所有样本的该统计量都未计算时, 结果才为 [`FeatureValue::NotComputed`].
#[derive(Debug, Clone)]
pub struct FeatureAccumulator {
    sums: [f64; STATISTIC_COUNT],
    computed: [usize; STATISTIC_COUNT],
    samples: usize,
}

impl Default for FeatureAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureAccumulator {
    /// 创建空累加器.
    pub fn new() -> Self {
        Self {
            sums: [0.0; STATISTIC_COUNT],
            computed: [0; STATISTIC_COUNT],
            samples: 0,
        }
    }

    /// 累加一个样本.
    pub fn push(&mut self, features: &TextureFeatures) {
        self.samples += 1;
        for (stat, v) in features.iter() {
            if let Some(v) = v.value() {
                self.sums[stat as usize] += v;
                self.computed[stat as usize] += 1;
            }
        }
    }

    /// 已累加的样本个数.
    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// 求平均. 没有任何样本时全部为 [`FeatureValue::NotComputed`].
    pub fn finish(self) -> TextureFeatures {
        let mut values = [FeatureValue::NotComputed; STATISTIC_COUNT];
        for stat in Statistic::ALL {
            let i = stat as usize;
            if self.computed[i] > 0 {
                values[i] = FeatureValue::Value(self.sums[i] / self.samples as f64);
            }
        }
        TextureFeatures::from_values(values)
    }
}
