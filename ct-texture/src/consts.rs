//! 通用常量.

/// ROI 外 (或已被扫描消耗) 的体素值.
pub const NOT_IN_REGION: f64 = f64::NAN;

/// NGLDM 默认邻域距离.
pub const DEFAULT_NEIGHBORHOOD_DISTANCE: usize = 1;

/// NGLDM 默认粗糙度参数.
pub const DEFAULT_COARSENESS: f64 = 0.0;

/// 每个纹理矩阵最多导出的统计量个数 (16 个通用统计量 + NGLDM 能量).
pub const STATISTIC_COUNT: usize = 17;

/// 二维游程方向个数 (0°, 45°, 90°, 135°).
pub const PLANAR_DIRECTION_COUNT: usize = 4;

/// 三维游程方向个数.
pub const VOLUMETRIC_DIRECTION_COUNT: usize = 13;

/// 体素是否位于 ROI 内 (且尚未被消耗)?
#[inline]
pub fn is_in_region(v: f64) -> bool {
    !v.is_nan()
}
