use ndarray::Array3;

use crate::consts::{is_in_region, NOT_IN_REGION};
use crate::Idx3d;

/// 可被扫描消耗的体数据副本.
///
/// 区域扫描和游程扫描会把访问过的体素置为 [`NOT_IN_REGION`],
/// 保证同一次扫描中每个体素至多被计数一次. 这些修改只发生在副本上,
/// 原始的 [`super::GreyLevelVolume`] 不受影响.
///
/// 对同一个副本再次扫描不会得到任何区域或游程.
#[derive(Debug, Clone)]
pub struct ScratchVolume {
    data: Array3<f64>,
}

impl ScratchVolume {
    #[inline]
    pub(crate) fn new(data: Array3<f64>) -> Self {
        Self { data }
    }

    /// 数据形状 `(z, h, w)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 获取 `pos` 处尚未被消耗的 ROI 体素值. 越界, 位于 ROI 外或已被消耗时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx3d) -> Option<f64> {
        self.data.get(pos).copied().filter(|v| is_in_region(*v))
    }

    /// 取出 `pos` 处的体素值并将其标记为已消耗.
    #[inline]
    pub fn take(&mut self, pos: Idx3d) -> Option<f64> {
        let cell = self.data.get_mut(pos)?;
        let v = *cell;
        *cell = NOT_IN_REGION;
        is_in_region(v).then_some(v)
    }

    /// 剩余 (未被消耗的) ROI 体素个数.
    pub fn remaining(&self) -> usize {
        self.data.iter().filter(|v| is_in_region(**v)).count()
    }
}
