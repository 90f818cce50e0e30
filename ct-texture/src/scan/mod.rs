//! 纹理扫描器: 距离图, 连通区域, 游程和邻域依赖.
//!
//! 所有扫描器都以 `(z, h, w)` 模式访问体数据.
//! [`Dim::Planar`] 模式下邻接关系只在水平切片内部成立 (偏移量的 `dz` 分量恒为 0),
//! [`Dim::Volumetric`] 模式下邻接关系跨越切片.

use either::Either;
use itertools::iproduct;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::{PLANAR_DIRECTION_COUNT, VOLUMETRIC_DIRECTION_COUNT};
use crate::Idx3d;

pub mod dependence;
pub mod distance;
pub mod run;
pub mod zone;

pub use dependence::Dependences;
pub use distance::DistanceMap;
pub use run::Runs;
pub use zone::{Zone, Zones};

/// 有符号三维偏移量 `(dz, dh, dw)`.
pub type Offset = (isize, isize, isize);

/// 扫描维度.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dim {
    /// 逐水平切片 (2D) 扫描.
    Planar,

    /// 整体 (3D) 扫描.
    Volumetric,
}

/// 邻域距离的度量方式.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NeighborhoodNorm {
    /// `max(|dz|, |dh|, |dw|) <= d`.
    #[default]
    Chebyshev,

    /// `dz^2 + dh^2 + dw^2 <= d^2`.
    Euclidean,
}

/// 6-邻接 (面邻接) 偏移量. 前 4 个位于水平切片内.
const FACE_OFFSETS: [Offset; 6] = [
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
    (-1, 0, 0),
    (1, 0, 0),
];

/// 二维游程方向: 0°, 45°, 90°, 135°.
const PLANAR_DIRECTIONS: [Offset; PLANAR_DIRECTION_COUNT] =
    [(0, 0, 1), (0, -1, 1), (0, -1, 0), (0, -1, -1)];

/// 三维游程方向: 第一个非零分量为正的全部 26-邻接偏移量.
const VOLUMETRIC_DIRECTIONS: [Offset; VOLUMETRIC_DIRECTION_COUNT] = [
    (0, 0, 1),
    (0, 1, -1),
    (0, 1, 0),
    (0, 1, 1),
    (1, -1, -1),
    (1, -1, 0),
    (1, -1, 1),
    (1, 0, -1),
    (1, 0, 0),
    (1, 0, 1),
    (1, 1, -1),
    (1, 1, 0),
    (1, 1, 1),
];

impl Dim {
    /// 面邻接偏移量: 平面模式 4 个, 立体模式 6 个.
    #[inline]
    pub fn face_offsets(self) -> &'static [Offset] {
        match self {
            Dim::Planar => &FACE_OFFSETS[..4],
            Dim::Volumetric => &FACE_OFFSETS,
        }
    }

    /// 游程扫描方向: 平面模式 4 个, 立体模式 13 个. 任意两个方向互不相反.
    #[inline]
    pub fn directions(self) -> &'static [Offset] {
        match self {
            Dim::Planar => &PLANAR_DIRECTIONS,
            Dim::Volumetric => &VOLUMETRIC_DIRECTIONS,
        }
    }

    /// 短名, 用于特征表前缀.
    pub fn tag(self) -> &'static str {
        match self {
            Dim::Planar => "2D",
            Dim::Volumetric => "3D",
        }
    }
}

/// 计算 `pos + offset`. 结果越界 (包括下溢) 时返回 `None`.
#[inline]
pub(crate) fn step((z, h, w): Idx3d, (dz, dh, dw): Offset, shape: Idx3d) -> Option<Idx3d> {
    let z = z.checked_add_signed(dz).filter(|v| *v < shape.0)?;
    let h = h.checked_add_signed(dh).filter(|v| *v < shape.1)?;
    let w = w.checked_add_signed(dw).filter(|v| *v < shape.2)?;
    Some((z, h, w))
}

/// 计算 `pos - offset`. 结果越界时返回 `None`.
#[inline]
pub(crate) fn step_back(pos: Idx3d, (dz, dh, dw): Offset, shape: Idx3d) -> Option<Idx3d> {
    step(pos, (-dz, -dh, -dw), shape)
}

/// 距离 `d` 以内的全部非零邻域偏移量, 按字典序排列.
///
/// 平面模式下 `dz` 恒为 0.
pub fn neighborhood_offsets(
    dim: Dim,
    d: usize,
    norm: NeighborhoodNorm,
) -> impl Iterator<Item = Offset> {
    let r = d as isize;
    let it = match dim {
        Dim::Planar => Either::Left(iproduct!(-r..=r, -r..=r).map(|(h, w)| (0, h, w))),
        Dim::Volumetric => Either::Right(iproduct!(-r..=r, -r..=r, -r..=r)),
    };
    it.filter(move |&(z, h, w)| {
        let within = match norm {
            NeighborhoodNorm::Chebyshev => true,
            NeighborhoodNorm::Euclidean => z * z + h * h + w * w <= r * r,
        };
        within && (z, h, w) != (0, 0, 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_direction_counts() {
        assert_eq!(Dim::Planar.directions().len(), 4);
        assert_eq!(Dim::Volumetric.directions().len(), 13);
        assert_eq!(Dim::Planar.face_offsets().len(), 4);
        assert_eq!(Dim::Volumetric.face_offsets().len(), 6);
        assert!(Dim::Planar.face_offsets().iter().all(|o| o.0 == 0));
    }

    #[test]
    fn test_no_opposite_directions() {
        for dim in [Dim::Planar, Dim::Volumetric] {
            let dirs: HashSet<Offset> = dim.directions().iter().copied().collect();
            assert_eq!(dirs.len(), dim.directions().len());
            for &(z, h, w) in dim.directions() {
                assert!(!dirs.contains(&(-z, -h, -w)));
            }
        }
        // 三维方向恰好覆盖 26-邻域的一半.
        let all: HashSet<Offset> = Dim::Volumetric
            .directions()
            .iter()
            .flat_map(|&(z, h, w)| [(z, h, w), (-z, -h, -w)])
            .collect();
        assert_eq!(all.len(), 26);
    }

    #[test]
    fn test_step() {
        let shape = (1, 3, 3);
        assert_eq!(step((0, 0, 0), (0, -1, 0), shape), None);
        assert_eq!(step((0, 2, 2), (0, 0, 1), shape), None);
        assert_eq!(step((0, 1, 1), (0, -1, 1), shape), Some((0, 0, 2)));
        assert_eq!(step((0, 1, 1), (1, 0, 0), shape), None);
        assert_eq!(step_back((0, 1, 1), (0, 0, 1), shape), Some((0, 1, 0)));
    }

    #[test]
    fn test_neighborhood_sizes() {
        use NeighborhoodNorm::*;
        assert_eq!(neighborhood_offsets(Dim::Planar, 1, Chebyshev).count(), 8);
        assert_eq!(neighborhood_offsets(Dim::Volumetric, 1, Chebyshev).count(), 26);
        assert_eq!(neighborhood_offsets(Dim::Planar, 1, Euclidean).count(), 4);
        assert_eq!(neighborhood_offsets(Dim::Volumetric, 1, Euclidean).count(), 6);
        assert_eq!(neighborhood_offsets(Dim::Planar, 2, Chebyshev).count(), 24);
        assert_eq!(neighborhood_offsets(Dim::Planar, 2, Euclidean).count(), 12);
    }
}
