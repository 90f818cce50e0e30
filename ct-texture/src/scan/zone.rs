//! 同灰度连通区域 (zone) 提取.

use std::collections::VecDeque;

use super::{step, Dim, DistanceMap, Offset};
use crate::volume::{GreyLevelVolume, RasterIter, ScratchVolume};

/// 一个极大的同灰度面连通区域.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Zone {
    /// 灰度级下标.
    pub grey_index: usize,

    /// 体素个数, 至少为 1.
    pub size: usize,

    /// 区域内体素的最小边界距离. 未提供距离图时为 `None`.
    pub min_distance: Option<u32>,
}

/// 按光栅序发现并消耗全部连通区域的迭代器.
///
/// 每发现一个未消耗的体素, 就从它出发广度优先地收集所有面邻接
/// (平面 4-邻接, 立体 6-邻接) 的同灰度体素, 并在入队时将其消耗.
/// 因此同一个 [`ScratchVolume`] 只能被完整扫描一次, 再次扫描得不到任何区域.
pub struct Zones<'a> {
    volume: &'a GreyLevelVolume,
    scratch: &'a mut ScratchVolume,
    distance: Option<&'a DistanceMap>,
    offsets: &'static [Offset],
    cursor: RasterIter,
    bfs_q: VecDeque<crate::Idx3d>,
}

impl<'a> Zones<'a> {
    /// 在 `scratch` 上扫描. `scratch` 应当是 `volume` 的副本.
    pub fn new(volume: &'a GreyLevelVolume, scratch: &'a mut ScratchVolume, dim: Dim) -> Self {
        assert_eq!(volume.shape(), scratch.shape());
        Self {
            volume,
            cursor: RasterIter::new(scratch.shape()),
            scratch,
            distance: None,
            offsets: dim.face_offsets(),
            bfs_q: VecDeque::with_capacity(16),
        }
    }

    /// 附加距离图, 使每个区域携带最小边界距离.
    pub fn with_distance(mut self, distance: &'a DistanceMap) -> Self {
        assert_eq!(self.volume.shape(), distance.shape());
        self.distance = Some(distance);
        self
    }

    /// 从已被取出的种子体素出发, 收集整个区域.
    fn flood(&mut self, seed: crate::Idx3d, v: f64) -> Zone {
        let Some(grey_index) = self.volume.grey_index(v) else {
            unreachable!("灰度级列表覆盖全部 ROI 体素值")
        };
        let shape = self.scratch.shape();
        let mut size = 0;
        let mut min_distance = self.distance.map(|_| u32::MAX);

        self.bfs_q.push_back(seed);
        while let Some(cur) = self.bfs_q.pop_front() {
            size += 1;
            if let (Some(m), Some(dm)) = (min_distance.as_mut(), self.distance) {
                *m = (*m).min(dm.get(cur));
            }
            for o in self.offsets {
                let Some(next) = step(cur, *o, shape) else {
                    continue;
                };
                if self.scratch.get(next) == Some(v) {
                    self.scratch.take(next);
                    self.bfs_q.push_back(next);
                }
            }
        }
        Zone {
            grey_index,
            size,
            min_distance,
        }
    }
}

impl Iterator for Zones<'_> {
    type Item = Zone;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(pos) = self.cursor.next() {
            if let Some(v) = self.scratch.take(pos) {
                return Some(self.flood(pos, v));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NOT_IN_REGION as NAN;
    use ndarray::{array, Array3};

    #[test]
    fn test_corner_hole_single_zone() {
        let data = array![[[NAN, 5.0, 5.0], [5.0, 5.0, 5.0], [5.0, 5.0, 5.0]]];
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        let mut scratch = vol.scratch();
        let zones: Vec<_> = Zones::new(&vol, &mut scratch, Dim::Planar).collect();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].size, 8);
        assert_eq!(zones[0].grey_index, 0);
        // 每个 ROI 体素恰好落入一个区域.
        let covered: usize = zones.iter().map(|z| z.size).sum();
        assert_eq!(covered, vol.region_len());
    }

    #[test]
    fn test_diagonal_is_not_connected() {
        let data = array![[[1.0, 2.0], [2.0, 1.0]]];
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        let mut scratch = vol.scratch();
        let zones: Vec<_> = Zones::new(&vol, &mut scratch, Dim::Planar).collect();
        assert_eq!(zones.len(), 4);
        assert!(zones.iter().all(|z| z.size == 1));
    }

    #[test]
    fn test_planar_vs_volumetric() {
        let vol = GreyLevelVolume::new(Array3::from_elem((2, 2, 2), 3.0), [1.0; 3]);
        let mut s1 = vol.scratch();
        assert_eq!(Zones::new(&vol, &mut s1, Dim::Planar).count(), 2);
        let mut s2 = vol.scratch();
        let zones: Vec<_> = Zones::new(&vol, &mut s2, Dim::Volumetric).collect();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].size, 8);
    }

    #[test]
    fn test_consumption_contract() {
        let data = array![[[1.0, 1.0, 2.0], [2.0, 1.0, 2.0]]];
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        let mut scratch = vol.scratch();
        let first: Vec<_> = Zones::new(&vol, &mut scratch, Dim::Planar).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(scratch.remaining(), 0);
        // 已消耗的副本上再扫描一次, 什么也得不到.
        assert_eq!(Zones::new(&vol, &mut scratch, Dim::Planar).count(), 0);
        // 新副本得到相同结果, 原体数据未被修改.
        let mut fresh = vol.scratch();
        let second: Vec<_> = Zones::new(&vol, &mut fresh, Dim::Planar).collect();
        assert_eq!(first, second);
        assert_eq!(vol.region_len(), 6);
    }

    #[test]
    fn test_min_distance() {
        let vol = GreyLevelVolume::new(Array3::from_elem((1, 5, 5), 1.0), [1.0; 3]);
        let dm = DistanceMap::build(&vol, Dim::Planar);
        let mut scratch = vol.scratch();
        let zones: Vec<_> = Zones::new(&vol, &mut scratch, Dim::Planar)
            .with_distance(&dm)
            .collect();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].min_distance, Some(1));
    }

    #[test]
    fn test_single_voxel_zone() {
        let data = array![[[NAN, NAN], [NAN, 7.0]]];
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        let dm = DistanceMap::build(&vol, Dim::Planar);
        let mut scratch = vol.scratch();
        let zones: Vec<_> = Zones::new(&vol, &mut scratch, Dim::Planar)
            .with_distance(&dm)
            .collect();
        assert_eq!(
            zones,
            vec![Zone {
                grey_index: 0,
                size: 1,
                min_distance: Some(1)
            }]
        );
    }
}
