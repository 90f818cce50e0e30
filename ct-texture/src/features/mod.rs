//! 由单个纹理矩阵导出标量统计量.
//!
//! 记灰度级下标为 `g`, 列分箱为 `k`, 公式中使用 1 起始的 `i = g + 1`, `j = k + 1`.
//! `R` 为行和, `C` 为列和, `N` 为总计数, `P = M / N`.
//!
//! # 退化输入
//!
//! `N = 0` 时所有统计量为 `0.0`. 唯一的例外是百分比统计量:
//! 若矩阵来源区域没有任何 ROI 体素, 其值为 [`FeatureValue::NotComputed`].

use ndarray::Zip;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::STATISTIC_COUNT;
use crate::matrix::{MatrixFamily, TextureMatrix};

mod names;

pub use names::{feature_name, NameStyle};

/// 纹理矩阵统计量. 顺序即输出顺序.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Statistic {
    /// `Σ C / j² / N`.
    ShortEmphasis,
    /// `Σ C · j² / N`.
    LongEmphasis,
    /// `Σ R / i² / N`.
    LowGreyEmphasis,
    /// `Σ R · i² / N`.
    HighGreyEmphasis,
    /// `Σ M / (i² j²) / N`.
    ShortLowGreyEmphasis,
    /// `Σ M · i² / j² / N`.
    ShortHighGreyEmphasis,
    /// `Σ M · j² / i² / N`.
    LongLowGreyEmphasis,
    /// `Σ M · i² j² / N`.
    LongHighGreyEmphasis,
    /// `Σ R² / N`.
    GreyNonUniformity,
    /// `Σ R² / N²`.
    GreyNonUniformityNorm,
    /// `Σ C² / N`.
    SecondaryNonUniformity,
    /// `Σ C² / N²`.
    SecondaryNonUniformityNorm,
    /// `N / ROI 体素数`.
    Percentage,
    /// `Σ P (i - μ_i)²`.
    GreyVariance,
    /// `Σ P (j - μ_j)²`.
    SecondaryVariance,
    /// `-Σ P log2 P`.
    Entropy,
    /// `Σ P²`. 只对 NGLDM 输出.
    Energy,
}

impl Statistic {
    /// 全部统计量.
    pub const ALL: [Statistic; STATISTIC_COUNT] = [
        Statistic::ShortEmphasis,
        Statistic::LongEmphasis,
        Statistic::LowGreyEmphasis,
        Statistic::HighGreyEmphasis,
        Statistic::ShortLowGreyEmphasis,
        Statistic::ShortHighGreyEmphasis,
        Statistic::LongLowGreyEmphasis,
        Statistic::LongHighGreyEmphasis,
        Statistic::GreyNonUniformity,
        Statistic::GreyNonUniformityNorm,
        Statistic::SecondaryNonUniformity,
        Statistic::SecondaryNonUniformityNorm,
        Statistic::Percentage,
        Statistic::GreyVariance,
        Statistic::SecondaryVariance,
        Statistic::Entropy,
        Statistic::Energy,
    ];

    /// `family` 输出的统计量.
    pub fn for_family(family: MatrixFamily) -> &'static [Statistic] {
        match family {
            MatrixFamily::Dependence => &Self::ALL,
            _ => &Self::ALL[..STATISTIC_COUNT - 1],
        }
    }
}

/// 特征值. 参考定义中无意义的特征以 [`FeatureValue::NotComputed`] 显式标记,
/// 不会以 `0.0` 冒充.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FeatureValue {
    /// 已计算的数值.
    Value(f64),

    /// 未计算 (参考定义中无意义).
    NotComputed,
}

impl FeatureValue {
    /// 数值. 未计算时返回 `None`.
    #[inline]
    pub fn value(self) -> Option<f64> {
        match self {
            FeatureValue::Value(v) => Some(v),
            FeatureValue::NotComputed => None,
        }
    }
}

/// 单个矩阵的全部统计量.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureFeatures {
    values: [FeatureValue; STATISTIC_COUNT],
}

impl TextureFeatures {
    /// 从 `m` 计算全部统计量. 纯函数.
    pub fn derive(m: &TextureMatrix) -> Self {
        let n = m.total();
        let percentage = if m.voxels() == 0 {
            FeatureValue::NotComputed
        } else {
            FeatureValue::Value(n / m.voxels() as f64)
        };
        if n <= 0.0 {
            let mut values = [FeatureValue::Value(0.0); STATISTIC_COUNT];
            values[Statistic::Percentage as usize] = percentage;
            return Self { values };
        }

        let rows = m.row_sums();
        let cols = m.col_sums();
        let p = m.probabilities();
        let sq = |x: usize| ((x + 1) * (x + 1)) as f64;

        let short = cols.iter().enumerate().map(|(k, c)| c / sq(k)).sum::<f64>() / n;
        let long = cols.iter().enumerate().map(|(k, c)| c * sq(k)).sum::<f64>() / n;
        let low_grey = rows.iter().enumerate().map(|(g, r)| r / sq(g)).sum::<f64>() / n;
        let high_grey = rows.iter().enumerate().map(|(g, r)| r * sq(g)).sum::<f64>() / n;

        let (mut slg, mut shg, mut llg, mut lhg) = (0.0, 0.0, 0.0, 0.0);
        let (mut mean_i, mut mean_j, mut entropy, mut energy) = (0.0, 0.0, 0.0, 0.0);
        for ((g, k), v) in m.counts().indexed_iter() {
            let (ii, jj) = (sq(g), sq(k));
            slg += v / (ii * jj);
            shg += v * ii / jj;
            llg += v * jj / ii;
            lhg += v * ii * jj;

            let pv = p[(g, k)];
            mean_i += pv * (g + 1) as f64;
            mean_j += pv * (k + 1) as f64;
            if pv > 0.0 {
                entropy -= pv * pv.log2();
            }
            energy += pv * pv;
        }

        let mut grey_var = 0.0;
        let mut secondary_var = 0.0;
        Zip::indexed(&p).for_each(|(g, k), pv| {
            grey_var += pv * ((g + 1) as f64 - mean_i).powi(2);
            secondary_var += pv * ((k + 1) as f64 - mean_j).powi(2);
        });

        let grey_nu = rows.iter().map(|r| r * r).sum::<f64>();
        let secondary_nu = cols.iter().map(|c| c * c).sum::<f64>();

        use FeatureValue::Value;
        Self {
            values: [
                Value(short),
                Value(long),
                Value(low_grey),
                Value(high_grey),
                Value(slg / n),
                Value(shg / n),
                Value(llg / n),
                Value(lhg / n),
                Value(grey_nu / n),
                Value(grey_nu / (n * n)),
                Value(secondary_nu / n),
                Value(secondary_nu / (n * n)),
                percentage,
                Value(grey_var),
                Value(secondary_var),
                Value(entropy),
                Value(energy),
            ],
        }
    }

    /// 获取统计量 `stat` 的值.
    #[inline]
    pub fn get(&self, stat: Statistic) -> FeatureValue {
        self.values[stat as usize]
    }

    /// 按 [`Statistic::ALL`] 顺序迭代 (统计量, 值).
    pub fn iter(&self) -> impl Iterator<Item = (Statistic, FeatureValue)> + '_ {
        Statistic::ALL.into_iter().zip(self.values.iter().copied())
    }

    /// 由逐统计量的值直接构建.
    pub(crate) fn from_values(values: [FeatureValue; STATISTIC_COUNT]) -> Self {
        Self { values }
    }
}
