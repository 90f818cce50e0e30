//! 特征命名.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Statistic;
use crate::matrix::MatrixFamily;

/// 特征命名风格.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NameStyle {
    /// 可读名称, 如 `short_run_emphasis`.
    #[default]
    Readable,

    /// 影像组学标准化倡议 (IBSI) 的特征代码, 如 `Frlm.sre`.
    Ontology,
}

const RUN_LENGTH_READABLE: [&str; 16] = [
    "short_run_emphasis",
    "long_run_emphasis",
    "low_grey_level_run_emphasis",
    "high_grey_level_run_emphasis",
    "short_run_low_grey_level_emphasis",
    "short_run_high_grey_level_emphasis",
    "long_run_low_grey_level_emphasis",
    "long_run_high_grey_level_emphasis",
    "grey_level_non_uniformity",
    "grey_level_non_uniformity_normalized",
    "run_length_non_uniformity",
    "run_length_non_uniformity_normalized",
    "run_percentage",
    "grey_level_variance",
    "run_length_variance",
    "run_entropy",
];

const RUN_LENGTH_ONTOLOGY: [&str; 16] = [
    "Frlm.sre",
    "Frlm.lre",
    "Frlm.lgre",
    "Frlm.hgre",
    "Frlm.srlge",
    "Frlm.srhge",
    "Frlm.lrlge",
    "Frlm.lrhge",
    "Frlm.glnu",
    "Frlm.glnu.norm",
    "Frlm.rlnu",
    "Frlm.rlnu.norm",
    "Frlm.r.perc",
    "Frlm.gl.var",
    "Frlm.rl.var",
    "Frlm.rl.entr",
];

const SIZE_ZONE_READABLE: [&str; 16] = [
    "small_zone_emphasis",
    "large_zone_emphasis",
    "low_grey_level_zone_emphasis",
    "high_grey_level_zone_emphasis",
    "small_zone_low_grey_level_emphasis",
    "small_zone_high_grey_level_emphasis",
    "large_zone_low_grey_level_emphasis",
    "large_zone_high_grey_level_emphasis",
    "grey_level_non_uniformity",
    "grey_level_non_uniformity_normalized",
    "zone_size_non_uniformity",
    "zone_size_non_uniformity_normalized",
    "zone_percentage",
    "grey_level_variance",
    "zone_size_variance",
    "zone_size_entropy",
];

const SIZE_ZONE_ONTOLOGY: [&str; 16] = [
    "Fszm.sze",
    "Fszm.lze",
    "Fszm.lgze",
    "Fszm.hgze",
    "Fszm.szlge",
    "Fszm.szhge",
    "Fszm.lzlge",
    "Fszm.lzhge",
    "Fszm.glnu",
    "Fszm.glnu.norm",
    "Fszm.zsnu",
    "Fszm.zsnu.norm",
    "Fszm.z.perc",
    "Fszm.gl.var",
    "Fszm.zs.var",
    "Fszm.zs.entr",
];

const DISTANCE_ZONE_READABLE: [&str; 16] = [
    "small_distance_emphasis",
    "large_distance_emphasis",
    "low_grey_level_zone_emphasis",
    "high_grey_level_zone_emphasis",
    "small_distance_low_grey_level_emphasis",
    "small_distance_high_grey_level_emphasis",
    "large_distance_low_grey_level_emphasis",
    "large_distance_high_grey_level_emphasis",
    "grey_level_non_uniformity",
    "grey_level_non_uniformity_normalized",
    "zone_distance_non_uniformity",
    "zone_distance_non_uniformity_normalized",
    "zone_percentage",
    "grey_level_variance",
    "zone_distance_variance",
    "zone_distance_entropy",
];

const DISTANCE_ZONE_ONTOLOGY: [&str; 16] = [
    "Fdzm.sde",
    "Fdzm.lde",
    "Fdzm.lgze",
    "Fdzm.hgze",
    "Fdzm.sdlge",
    "Fdzm.sdhge",
    "Fdzm.ldlge",
    "Fdzm.ldhge",
    "Fdzm.glnu",
    "Fdzm.glnu.norm",
    "Fdzm.zdnu",
    "Fdzm.zdnu.norm",
    "Fdzm.z.perc",
    "Fdzm.gl.var",
    "Fdzm.zd.var",
    "Fdzm.zd.entr",
];

const DEPENDENCE_READABLE: [&str; 17] = [
    "low_dependence_emphasis",
    "high_dependence_emphasis",
    "low_grey_level_count_emphasis",
    "high_grey_level_count_emphasis",
    "low_dependence_low_grey_level_emphasis",
    "low_dependence_high_grey_level_emphasis",
    "high_dependence_low_grey_level_emphasis",
    "high_dependence_high_grey_level_emphasis",
    "grey_level_non_uniformity",
    "grey_level_non_uniformity_normalized",
    "dependence_count_non_uniformity",
    "dependence_count_non_uniformity_normalized",
    "dependence_count_percentage",
    "grey_level_variance",
    "dependence_count_variance",
    "dependence_count_entropy",
    "dependence_count_energy",
];

const DEPENDENCE_ONTOLOGY: [&str; 17] = [
    "Fngl.lde",
    "Fngl.hde",
    "Fngl.lgce",
    "Fngl.hgce",
    "Fngl.ldlge",
    "Fngl.ldhge",
    "Fngl.hdlge",
    "Fngl.hdhge",
    "Fngl.glnu",
    "Fngl.glnu.norm",
    "Fngl.dcnu",
    "Fngl.dcnu.norm",
    "Fngl.dc.perc",
    "Fngl.gl.var",
    "Fngl.dc.var",
    "Fngl.dc.entr",
    "Fngl.dc.energy",
];

/// 获取 `family` 的统计量 `stat` 在 `style` 风格下的名称.
/// 该类别不输出 `stat` 时返回 `None`.
pub fn feature_name(
    family: MatrixFamily,
    stat: Statistic,
    style: NameStyle,
) -> Option<&'static str> {
    let table: &[&str] = match (family, style) {
        (MatrixFamily::RunLength, NameStyle::Readable) => &RUN_LENGTH_READABLE,
        (MatrixFamily::RunLength, NameStyle::Ontology) => &RUN_LENGTH_ONTOLOGY,
        (MatrixFamily::SizeZone, NameStyle::Readable) => &SIZE_ZONE_READABLE,
        (MatrixFamily::SizeZone, NameStyle::Ontology) => &SIZE_ZONE_ONTOLOGY,
        (MatrixFamily::DistanceZone, NameStyle::Readable) => &DISTANCE_ZONE_READABLE,
        (MatrixFamily::DistanceZone, NameStyle::Ontology) => &DISTANCE_ZONE_ONTOLOGY,
        (MatrixFamily::Dependence, NameStyle::Readable) => &DEPENDENCE_READABLE,
        (MatrixFamily::Dependence, NameStyle::Ontology) => &DEPENDENCE_ONTOLOGY,
    };
    table.get(stat as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_cover_family_statistics() {
        for family in MatrixFamily::ALL {
            for style in [NameStyle::Readable, NameStyle::Ontology] {
                let names: HashSet<_> = Statistic::for_family(family)
                    .iter()
                    .map(|s| feature_name(family, *s, style).unwrap())
                    .collect();
                assert_eq!(names.len(), Statistic::for_family(family).len());
            }
        }
    }

    #[test]
    fn test_energy_only_for_dependence() {
        assert_eq!(
            feature_name(MatrixFamily::RunLength, Statistic::Energy, NameStyle::Ontology),
            None
        );
        assert_eq!(
            feature_name(MatrixFamily::Dependence, Statistic::Energy, NameStyle::Ontology),
            Some("Fngl.dc.energy")
        );
        assert_eq!(
            feature_name(MatrixFamily::SizeZone, Statistic::Percentage, NameStyle::Readable),
            Some("zone_percentage")
        );
    }
}
