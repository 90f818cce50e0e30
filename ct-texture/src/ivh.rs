//! 强度-体积直方图 (IVH) 特征.
//!
//! 对整数灰度级 `i ∈ [min, max]`, 体积分数 `ν(i) = 1 - #{v < i} / N_v`,
//! 强度分数 `γ(i) = (i - min) / (max - min)`.
//!
//! ROI 为空或只含一个灰度级时, 全部特征为 [`FeatureValue::NotComputed`].

use num::ToPrimitive;

use crate::features::{FeatureValue, NameStyle};
use crate::volume::GreyLevelVolume;

const READABLE: [&str; 6] = [
    "volume_at_intensity_fraction_10",
    "volume_at_intensity_fraction_90",
    "intensity_at_volume_fraction_10",
    "intensity_at_volume_fraction_90",
    "volume_at_intensity_fraction_difference",
    "intensity_at_volume_fraction_difference",
];

const ONTOLOGY: [&str; 6] = [
    "Fivh.V10",
    "Fivh.V90",
    "Fivh.I10",
    "Fivh.I90",
    "Fivh.V10minusV90",
    "Fivh.I10minusI90",
];

/// IVH 特征.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IntensityVolumeFeatures {
    /// 强度分数至少为 10% 处的体积分数.
    pub v10: FeatureValue,
    /// 强度分数至少为 90% 处的体积分数.
    pub v90: FeatureValue,
    /// 体积分数不超过 10% 的最小灰度级.
    pub i10: FeatureValue,
    /// 体积分数不超过 90% 的最小灰度级.
    pub i90: FeatureValue,
    /// `|V10 - V90|`.
    pub v10_minus_v90: FeatureValue,
    /// `|I10 - I90|`.
    pub i10_minus_i90: FeatureValue,
}

impl IntensityVolumeFeatures {
    const NOT_COMPUTED: Self = Self {
        v10: FeatureValue::NotComputed,
        v90: FeatureValue::NotComputed,
        i10: FeatureValue::NotComputed,
        i90: FeatureValue::NotComputed,
        v10_minus_v90: FeatureValue::NotComputed,
        i10_minus_i90: FeatureValue::NotComputed,
    };

    /// 由 `volume` 的 ROI 体素计算.
    pub fn compute(volume: &GreyLevelVolume) -> Self {
        let levels = volume.grey_levels();
        if levels.len() < 2 {
            return Self::NOT_COMPUTED;
        }
        let (Some(min), Some(max)) = (
            levels[0].round().to_i64(),
            levels[levels.len() - 1].round().to_i64(),
        ) else {
            return Self::NOT_COMPUTED;
        };
        if min >= max {
            return Self::NOT_COMPUTED;
        }

        let mut values: Vec<f64> = volume.region_iter().map(|(_, v)| v).collect();
        values.sort_unstable_by(f64::total_cmp);
        let n = values.len() as f64;

        // (i, γ(i), ν(i))
        let curve: Vec<(f64, f64, f64)> = (min..=max)
            .map(|i| {
                let i = i as f64;
                let smaller = values.partition_point(|v| *v < i);
                let gamma = (i - min as f64) / (max - min) as f64;
                (i, gamma, 1.0 - smaller as f64 / n)
            })
            .collect();

        let volume_at = |frac: f64| {
            curve
                .iter()
                .find(|(_, gamma, _)| *gamma >= frac)
                .map_or(FeatureValue::NotComputed, |(_, _, nu)| FeatureValue::Value(*nu))
        };
        let intensity_at = |frac: f64| {
            curve
                .iter()
                .find(|(_, _, nu)| *nu <= frac)
                .map_or(FeatureValue::NotComputed, |(i, _, _)| FeatureValue::Value(*i))
        };
        let abs_diff = |a: FeatureValue, b: FeatureValue| match (a.value(), b.value()) {
            (Some(a), Some(b)) => FeatureValue::Value((a - b).abs()),
            _ => FeatureValue::NotComputed,
        };

        let (v10, v90) = (volume_at(0.1), volume_at(0.9));
        let (i10, i90) = (intensity_at(0.1), intensity_at(0.9));
        Self {
            v10,
            v90,
            i10,
            i90,
            v10_minus_v90: abs_diff(v10, v90),
            i10_minus_i90: abs_diff(i10, i90),
        }
    }

    /// 按输出顺序排列的 (名称, 值).
    pub fn named(&self, style: NameStyle) -> Vec<(&'static str, FeatureValue)> {
        let names = match style {
            NameStyle::Readable => &READABLE,
            NameStyle::Ontology => &ONTOLOGY,
        };
        let values = [
            self.v10,
            self.v90,
            self.i10,
            self.i90,
            self.v10_minus_v90,
            self.i10_minus_i90,
        ];
        names.iter().copied().zip(values).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NOT_IN_REGION as NAN;
    use ndarray::{array, Array3};

    fn f64_eq(a: FeatureValue, b: f64) -> bool {
        a.value().is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_single_level_not_computed() {
        let vol = GreyLevelVolume::new(Array3::from_elem((1, 2, 2), 3.0), [1.0; 3]);
        let f = IntensityVolumeFeatures::compute(&vol);
        assert!(f
            .named(NameStyle::Ontology)
            .iter()
            .all(|(_, v)| *v == FeatureValue::NotComputed));

        let empty = GreyLevelVolume::new(Array3::from_elem((1, 2, 2), NAN), [1.0; 3]);
        assert_eq!(
            IntensityVolumeFeatures::compute(&empty),
            IntensityVolumeFeatures::NOT_COMPUTED
        );
    }

    #[test]
    fn test_ten_levels() {
        // 灰度 1..=10 各一个体素, 外加一个 ROI 外体素.
        let mut data = Array3::from_elem((1, 1, 11), NAN);
        for i in 0..10 {
            data[(0, 0, i)] = (i + 1) as f64;
        }
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        let f = IntensityVolumeFeatures::compute(&vol);
        // γ(i) = (i - 1) / 9: 第一个 γ >= 0.1 的是 i = 2, ν(2) = 0.9.
        assert!(f64_eq(f.v10, 0.9));
        // γ >= 0.9 的第一个是 i = 10 (γ(9) = 8/9 < 0.9), ν(10) = 0.1.
        assert!(f64_eq(f.v90, 0.1));
        assert!(f64_eq(f.i10, 10.0));
        assert!(f64_eq(f.i90, 2.0));
        assert!(f64_eq(f.v10_minus_v90, 0.8));
        assert!(f64_eq(f.i10_minus_i90, 8.0));
    }

    #[test]
    fn test_two_levels() {
        let vol = GreyLevelVolume::new(array![[[1.0, 1.0, 1.0, 2.0]]], [1.0; 3]);
        let f = IntensityVolumeFeatures::compute(&vol);
        // ν(1) = 1, ν(2) = 0.25.
        assert!(f64_eq(f.v10, 0.25));
        assert_eq!(f.i10, FeatureValue::NotComputed);
        assert!(f64_eq(f.i90, 2.0));
        assert_eq!(f.i10_minus_i90, FeatureValue::NotComputed);
        assert_eq!(f.named(NameStyle::Readable)[0].0, "volume_at_intensity_fraction_10");
    }
}
