//! 离散化后的 3D 灰度体数据.
//!
//! 体数据按照 `(z, h, w)` 模式存储, 即 (切片, 行, 列).
//! ROI 之外的体素以 [`NOT_IN_REGION`] (`NaN`) 标记, 不参与任何扫描.

use std::collections::BTreeSet;
use std::ops::Index;

use ndarray::{Array3, ArrayView2, ArrayView3, Axis, Zip};
use ordered_float::NotNan;

use crate::consts::{is_in_region, NOT_IN_REGION};
use crate::{Idx2d, Idx3d};

mod iter;
mod scratch;

pub use iter::RasterIter;
pub use scratch::ScratchVolume;

/// 离散化灰度体数据, 包括体素值, 体内出现的全部灰度级和体素分辨率.
///
/// 该结构创建后只读. 会破坏数据的扫描 (区域, 游程) 只在
/// [`ScratchVolume`] 副本上进行.
#[derive(Debug, Clone)]
pub struct GreyLevelVolume {
    data: Array3<f64>,

    /// 升序、无重复.
    grey_levels: Vec<f64>,

    /// 单位: 毫米. 顺序为 `[z, h, w]`.
    spacing: [f64; 3],
}

impl Index<Idx3d> for GreyLevelVolume {
    type Output = f64;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl GreyLevelVolume {
    /// 从 `(z, h, w)` 格式的离散化数据直接创建, 灰度级列表由数据计算得到.
    ///
    /// `spacing` 必须全部为正的有限值, 否则程序 panic. 体素值 `-0.0` 被视为 `0.0`.
    pub fn new(mut data: Array3<f64>, spacing: [f64; 3]) -> Self {
        assert_spacing(&spacing);
        data.mapv_inplace(unsigned_zero);
        let grey_levels = distinct_grey_levels(data.view());
        Self {
            data,
            grey_levels,
            spacing,
        }
    }

    /// 使用外部 (离散化阶段) 给出的灰度级列表创建.
    ///
    /// # 注意
    ///
    /// `grey_levels` 必须严格升序, 且包含 ROI 内出现的每一个值, 否则程序 panic.
    /// 列表中允许存在体内未出现的灰度级 (对应矩阵行全为 0).
    pub fn with_grey_levels(
        mut data: Array3<f64>,
        mut grey_levels: Vec<f64>,
        spacing: [f64; 3],
    ) -> Self {
        assert_spacing(&spacing);
        data.mapv_inplace(unsigned_zero);
        grey_levels.iter_mut().for_each(|g| *g = unsigned_zero(*g));
        assert!(
            grey_levels.windows(2).all(|v| v[0] < v[1]),
            "灰度级列表必须严格升序"
        );
        let ans = Self {
            data,
            grey_levels,
            spacing,
        };
        assert!(
            ans.data
                .iter()
                .filter(|v| is_in_region(**v))
                .all(|v| ans.grey_index(*v).is_some()),
            "灰度级列表未覆盖 ROI 内的全部体素值"
        );
        ans
    }

    /// 根据 (已离散化的) 扫描数据和标注掩膜创建. `pred` 返回 `true`
    /// 的标注体素属于 ROI, 其余体素被置为 [`NOT_IN_REGION`].
    ///
    /// `scan` 和 `mask` 形状不一致时程序 panic.
    pub fn from_masked<T>(
        scan: ArrayView3<T>,
        mask: ArrayView3<u8>,
        pred: fn(u8) -> bool,
        spacing: [f64; 3],
    ) -> Self
    where
        T: Copy + Into<f64>,
    {
        assert_eq!(scan.shape(), mask.shape(), "扫描和掩膜形状不一致");
        let data = Zip::from(&scan).and(&mask).map_collect(|&v, &m| {
            if pred(m) {
                v.into()
            } else {
                NOT_IN_REGION
            }
        });
        Self::new(data, spacing)
    }

    /// 体数据形状 `(z, h, w)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 水平切片个数.
    #[inline]
    pub fn len_z(&self) -> usize {
        self.shape().0
    }

    /// 水平切片形状 `(h, w)`.
    #[inline]
    pub fn slice_shape(&self) -> Idx2d {
        let (_, h, w) = self.shape();
        (h, w)
    }

    /// 体内出现的全部灰度级, 升序.
    #[inline]
    pub fn grey_levels(&self) -> &[f64] {
        &self.grey_levels
    }

    /// 灰度值 `v` 在灰度级列表中的位置 (即纹理矩阵的行号).
    #[inline]
    pub fn grey_index(&self, v: f64) -> Option<usize> {
        let v = unsigned_zero(v);
        self.grey_levels
            .binary_search_by(|g| g.total_cmp(&v))
            .ok()
    }

    /// 获取 `pos` 处的 ROI 体素值. 越界或位于 ROI 外时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx3d) -> Option<f64> {
        self.data.get(pos).copied().filter(|v| is_in_region(*v))
    }

    /// 体素分辨率 `[z, h, w]`, 单位为毫米.
    #[inline]
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// ROI 体素总个数.
    pub fn region_len(&self) -> usize {
        self.data.iter().filter(|v| is_in_region(**v)).count()
    }

    /// 第 `z` 层水平切片上的 ROI 体素个数. 越界时 panic.
    pub fn slice_region_len(&self, z: usize) -> usize {
        self.slice_at(z)
            .iter()
            .filter(|v| is_in_region(**v))
            .count()
    }

    /// 获取第 `z` 层水平切片视图. 越界时 panic.
    #[inline]
    pub fn slice_at(&self, z: usize) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(0), z)
    }

    /// 将第 `z` 层水平切片复制为只有一层的子体数据.
    ///
    /// 子体数据沿用本体的灰度级列表, 因此两者构建的矩阵行号一致, 可以直接合并.
    pub fn slice_volume(&self, z: usize) -> GreyLevelVolume {
        let data = self
            .slice_at(z)
            .insert_axis(Axis(0))
            .to_owned();
        Self {
            data,
            grey_levels: self.grey_levels.clone(),
            spacing: self.spacing,
        }
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// 获取能按行优先序迭代 ROI 体素 (位置, 值) 的迭代器.
    pub fn region_iter(&self) -> impl Iterator<Item = (Idx3d, f64)> + '_ {
        self.data
            .indexed_iter()
            .filter(|(_, v)| is_in_region(**v))
            .map(|(pos, v)| (pos, *v))
    }

    /// 创建一份可被扫描消耗的数据副本.
    #[inline]
    pub fn scratch(&self) -> ScratchVolume {
        ScratchVolume::new(self.data.clone())
    }
}

/// 收集 ROI 内出现的全部灰度级, 升序、无重复.
fn distinct_grey_levels(data: ArrayView3<f64>) -> Vec<f64> {
    data.iter()
        .filter_map(|v| NotNan::new(*v).ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(NotNan::into_inner)
        .collect()
}

/// 将 `-0.0` 变为 `0.0`, 其余值 (包括 `NaN`) 不变.
///
/// 离散化 (如 `(-0.3f64).round()`) 常常产生 `-0.0`, 而灰度级查找按 `total_cmp` 区分正负零.
#[inline]
fn unsigned_zero(v: f64) -> f64 {
    v + 0.0
}

#[inline]
fn assert_spacing(spacing: &[f64; 3]) {
    assert!(
        spacing.iter().all(|s| s.is_finite() && *s > 0.0),
        "体素分辨率必须为正"
    );
}
