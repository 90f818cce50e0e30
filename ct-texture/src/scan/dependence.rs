//! 邻域灰度依赖扫描 (NGLDM).

use super::{neighborhood_offsets, step, Dim, NeighborhoodNorm, Offset};
use crate::volume::GreyLevelVolume;
use crate::Idx3d;

/// 一个中心体素的依赖计数.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dependence {
    /// 中心体素的灰度级下标.
    pub grey_index: usize,

    /// 与中心体素灰度差不超过粗糙度参数的 ROI 邻居个数.
    pub count: usize,
}

/// 以每个 ROI 体素为中心恰好一次的依赖扫描迭代器. 只读, 不消耗任何体素.
pub struct Dependences<'a> {
    volume: &'a GreyLevelVolume,
    offsets: Vec<Offset>,
    coarseness: f64,
    centers: Box<dyn Iterator<Item = (Idx3d, f64)> + 'a>,
}

impl<'a> Dependences<'a> {
    /// 邻域由距离 `d` 和度量 `norm` 决定. 平面模式只考虑同一切片内的邻居.
    pub fn new(
        volume: &'a GreyLevelVolume,
        dim: Dim,
        d: usize,
        norm: NeighborhoodNorm,
        coarseness: f64,
    ) -> Self {
        assert!(coarseness >= 0.0);
        Self {
            volume,
            offsets: neighborhood_offsets(dim, d, norm).collect(),
            coarseness,
            centers: Box::new(volume.region_iter()),
        }
    }

    /// 邻域大小 (不含中心). 依赖计数的取值范围为 `0..=neighborhood_len()`.
    #[inline]
    pub fn neighborhood_len(&self) -> usize {
        self.offsets.len()
    }
}

impl Iterator for Dependences<'_> {
    type Item = Dependence;

    fn next(&mut self) -> Option<Self::Item> {
        let (pos, v) = self.centers.next()?;
        let Some(grey_index) = self.volume.grey_index(v) else {
            unreachable!("灰度级列表覆盖全部 ROI 体素值")
        };
        let shape = self.volume.shape();
        let count = self
            .offsets
            .iter()
            .filter_map(|o| step(pos, *o, shape))
            .filter_map(|p| self.volume.get(p))
            .filter(|n| (n - v).abs() <= self.coarseness)
            .count();
        Some(Dependence { grey_index, count })
    }
}
