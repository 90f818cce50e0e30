//! 到 ROI 边界的距离图 (4-/6-邻接距离变换).

use std::mem;

use log::debug;
use ndarray::{Array3, Axis};

use super::{step, Dim};
use crate::volume::GreyLevelVolume;
use crate::Idx3d;

/// 每个 ROI 体素离开 ROI 所需的最少面邻接步数.
///
/// ROI 外的体素值为 0, ROI 内的体素值至少为 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    data: Array3<u32>,
}

impl DistanceMap {
    /// 通过逐层腐蚀计算距离图.
    ///
    /// 边界体素 (至少有一个面邻居位于 ROI 外或数组外) 的距离为 1.
    /// 此后每剥离一层外壳, 新一层的距离加 1, 已赋值的体素不会再被访问.
    /// 孤立体素的距离为 1.
    ///
    /// [`Dim::Planar`] 模式下只考虑切片内的 4 个面邻居, 因此各切片互不影响.
    pub fn build(volume: &GreyLevelVolume, dim: Dim) -> Self {
        let shape = volume.shape();
        let offsets = dim.face_offsets();
        let mut data = Array3::<u32>::zeros(shape);

        // 当前外壳与下一层外壳.
        let mut surf1 = Vec::with_capacity(1024);
        let mut surf2 = Vec::with_capacity(1024);

        for (pos, _) in volume.region_iter() {
            let is_surface = offsets.iter().any(|o| {
                step(pos, *o, shape)
                    .and_then(|p| volume.get(p))
                    .is_none()
            });
            if is_surface {
                data[pos] = 1;
                surf1.push(pos);
            }
        }

        let mut dist = 1u32;
        while !surf1.is_empty() {
            dist += 1;
            for pos in surf1.drain(..) {
                for o in offsets {
                    let Some(next) = step(pos, *o, shape) else {
                        continue;
                    };
                    if data[next] == 0 && volume.get(next).is_some() {
                        data[next] = dist;
                        surf2.push(next);
                    }
                }
            }
            mem::swap(&mut surf1, &mut surf2);
        }
        debug!("距离图构建完成, 最大距离 {}", dist - 1);
        Self { data }
    }

    /// 直接使用外部计算的距离图. 调用者负责保证形状与体数据一致.
    #[inline]
    pub fn from_raw(data: Array3<u32>) -> Self {
        Self { data }
    }

    /// 获取 `pos` 处的距离. 越界时返回 0.
    #[inline]
    pub fn get(&self, pos: Idx3d) -> u32 {
        self.data.get(pos).copied().unwrap_or(0)
    }

    /// 距离图形状 `(z, h, w)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 复制第 `z` 层为只有一层的距离图, 与 [`GreyLevelVolume::slice_volume`] 对应.
    /// 越界时 panic.
    pub fn slice(&self, z: usize) -> DistanceMap {
        let data = self
            .data
            .index_axis(Axis(0), z)
            .insert_axis(Axis(0))
            .to_owned();
        Self { data }
    }

    /// 最大距离. 空 ROI 时为 0.
    pub fn max_distance(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}
