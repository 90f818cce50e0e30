//! 沿固定方向的同灰度游程编码.

use super::{step, step_back, Offset};
use crate::volume::{GreyLevelVolume, RasterIter, ScratchVolume};

/// 一条极大的同灰度游程.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Run {
    /// 灰度级下标.
    pub grey_index: usize,

    /// 游程长度, 至少为 1.
    pub length: usize,
}

/// 沿单一方向按光栅序发现并消耗全部游程的迭代器.
///
/// 游程的起点是一个未消耗的 ROI 体素, 且它沿方向的前驱体素不具有相同的值.
/// 从起点出发沿方向前进, 逐个消耗同值体素直到遇到不同值或边界.
///
/// 每个方向需要一份独立的 [`ScratchVolume`].
pub struct Runs<'a> {
    volume: &'a GreyLevelVolume,
    scratch: &'a mut ScratchVolume,
    direction: Offset,
    cursor: RasterIter,
}

impl<'a> Runs<'a> {
    /// 在 `scratch` 上沿 `direction` 扫描. `scratch` 应当是 `volume` 的副本.
    pub fn new(
        volume: &'a GreyLevelVolume,
        scratch: &'a mut ScratchVolume,
        direction: Offset,
    ) -> Self {
        assert_eq!(volume.shape(), scratch.shape());
        assert_ne!(direction, (0, 0, 0));
        Self {
            volume,
            cursor: RasterIter::new(scratch.shape()),
            scratch,
            direction,
        }
    }

    /// 是否为游程起点? 前驱由原体数据判断, 与扫描顺序无关.
    #[inline]
    fn is_run_start(&self, pos: crate::Idx3d, v: f64) -> bool {
        step_back(pos, self.direction, self.volume.shape())
            .and_then(|p| self.volume.get(p))
            .map_or(true, |prev| prev != v)
    }

    fn walk(&mut self, start: crate::Idx3d, v: f64) -> Run {
        let Some(grey_index) = self.volume.grey_index(v) else {
            unreachable!("灰度级列表覆盖全部 ROI 体素值")
        };
        let shape = self.scratch.shape();
        let mut length = 0;
        let mut cur = Some(start);
        while let Some(pos) = cur.filter(|p| self.scratch.get(*p) == Some(v)) {
            self.scratch.take(pos);
            length += 1;
            cur = step(pos, self.direction, shape);
        }
        Run { grey_index, length }
    }
}

impl Iterator for Runs<'_> {
    type Item = Run;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(pos) = self.cursor.next() {
            let Some(v) = self.scratch.get(pos) else {
                continue;
            };
            if self.is_run_start(pos, v) {
                return Some(self.walk(pos, v));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NOT_IN_REGION as NAN;
    use crate::scan::Dim;
    use ndarray::{array, Array3};

    fn runs(vol: &GreyLevelVolume, dir: Offset) -> Vec<Run> {
        let mut scratch = vol.scratch();
        Runs::new(vol, &mut scratch, dir).collect()
    }

    fn lengths(vol: &GreyLevelVolume, dir: Offset) -> Vec<usize> {
        let mut ans: Vec<_> = runs(vol, dir).iter().map(|r| r.length).collect();
        ans.sort_unstable();
        ans
    }

    #[test]
    fn test_horizontal_runs() {
        let data = array![[[1.0, 1.0, 2.0, 2.0], [1.0, 2.0, 2.0, 2.0]]];
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        assert_eq!(
            runs(&vol, (0, 0, 1)),
            vec![
                Run {
                    grey_index: 0,
                    length: 2
                },
                Run {
                    grey_index: 1,
                    length: 2
                },
                Run {
                    grey_index: 0,
                    length: 1
                },
                Run {
                    grey_index: 1,
                    length: 3
                },
            ]
        );
    }

    #[test]
    fn test_anti_diagonal_start_found_later() {
        // 45° 方向 (向右上) 的前驱位于下一行, 光栅序稍后才会扫到.
        let data = array![[[9.0, 3.0], [3.0, 9.0]]];
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        assert_eq!(lengths(&vol, (0, -1, 1)), vec![1, 1, 2]);
        assert_eq!(lengths(&vol, (0, -1, -1)), vec![1, 1, 2]);
    }

    #[test]
    fn test_run_sum_equals_region() {
        let data = array![
            [[1.0, 2.0, NAN], [1.0, 1.0, 2.0], [2.0, NAN, 2.0]],
            [[2.0, 2.0, 1.0], [NAN, 1.0, 1.0], [2.0, 2.0, 2.0]]
        ];
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        for dim in [Dim::Planar, Dim::Volumetric] {
            for &dir in dim.directions() {
                let total: usize = runs(&vol, dir).iter().map(|r| r.length).sum();
                assert_eq!(total, vol.region_len());
            }
        }
    }

    #[test]
    fn test_nan_breaks_run() {
        let data = array![[[4.0, 4.0, NAN, 4.0]]];
        let vol = GreyLevelVolume::new(data, [1.0; 3]);
        assert_eq!(lengths(&vol, (0, 0, 1)), vec![1, 2]);
    }

    #[test]
    fn test_consumed_copy_yields_nothing() {
        let vol = GreyLevelVolume::new(Array3::from_elem((1, 3, 3), 1.0), [1.0; 3]);
        let mut scratch = vol.scratch();
        assert_eq!(Runs::new(&vol, &mut scratch, (0, -1, 0)).count(), 3);
        assert_eq!(Runs::new(&vol, &mut scratch, (0, -1, 0)).count(), 0);
        assert_eq!(lengths(&vol, (0, -1, 0)), vec![3, 3, 3]);
    }

    #[test]
    fn test_volumetric_z_run() {
        let vol = GreyLevelVolume::new(Array3::from_elem((3, 1, 1), 5.0), [1.0; 3]);
        assert_eq!(lengths(&vol, (1, 0, 0)), vec![3]);
        assert_eq!(lengths(&vol, (0, 0, 1)), vec![1, 1, 1]);
    }
}
