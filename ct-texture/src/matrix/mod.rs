//! 纹理计数矩阵.
//!
//! 行号为灰度级下标 `g`, 列号为第二度量的分箱 `k`
//! (游程长度 - 1, 区域大小 - 1, 距离 - 1 或依赖计数).

use std::ops::AddAssign;

use ndarray::{Array1, Array2, ArrayView2, Axis};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod family;

pub use family::{MatrixFamily, MatrixGroups, ScanReport};

/// 二维纹理计数矩阵, 同时记录构建它所用的 ROI 体素个数 (百分比统计量的分母).
///
/// 矩阵尺寸在构建时确定, 此后不再改变. 所有元素非负.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextureMatrix {
    counts: Array2<f64>,
    voxels: usize,
}

impl TextureMatrix {
    /// 创建 `rows * cols` 的全零矩阵, 其来源区域共有 `voxels` 个 ROI 体素.
    #[inline]
    pub fn zeros(rows: usize, cols: usize, voxels: usize) -> Self {
        Self {
            counts: Array2::zeros((rows, cols)),
            voxels,
        }
    }

    /// 由已有计数创建. 计数必须全部非负.
    pub fn from_counts(counts: Array2<f64>, voxels: usize) -> Self {
        assert!(counts.iter().all(|v| *v >= 0.0), "计数必须非负");
        Self { counts, voxels }
    }

    /// 计数加一. 越界时 panic, 调用者应当先检查分箱范围.
    #[inline]
    pub fn increment(&mut self, g: usize, k: usize) {
        self.counts[(g, k)] += 1.0;
    }

    /// 行数 (灰度级个数).
    #[inline]
    pub fn rows(&self) -> usize {
        self.counts.nrows()
    }

    /// 列数 (第二度量分箱个数).
    #[inline]
    pub fn cols(&self) -> usize {
        self.counts.ncols()
    }

    /// 计数矩阵视图.
    #[inline]
    pub fn counts(&self) -> ArrayView2<'_, f64> {
        self.counts.view()
    }

    /// 百分比统计量的分母.
    #[inline]
    pub fn voxels(&self) -> usize {
        self.voxels
    }

    /// 全部计数之和 `N`.
    #[inline]
    pub fn total(&self) -> f64 {
        self.counts.sum()
    }

    /// 行和 `R[g]`.
    #[inline]
    pub fn row_sums(&self) -> Array1<f64> {
        self.counts.sum_axis(Axis(1))
    }

    /// 列和 `C[k]`.
    #[inline]
    pub fn col_sums(&self) -> Array1<f64> {
        self.counts.sum_axis(Axis(0))
    }

    /// 概率矩阵 `P = M / N`. `N = 0` 时为全零矩阵.
    pub fn probabilities(&self) -> Array2<f64> {
        let n = self.total();
        if n > 0.0 {
            &self.counts / n
        } else {
            Array2::zeros(self.counts.raw_dim())
        }
    }

    /// 所有计数乘以 `factor`, 体素个数不变. 用于按方向距离加权.
    pub fn scaled(&self, factor: f64) -> Self {
        assert!(factor.is_finite() && factor >= 0.0);
        Self {
            counts: &self.counts * factor,
            voxels: self.voxels,
        }
    }

    /// 逐元素合并一组矩阵. 空输入返回 `None`.
    ///
    /// 各矩阵形状必须一致, 否则程序 panic.
    pub fn merge_all<'a, I>(it: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a TextureMatrix>,
    {
        let mut it = it.into_iter();
        let mut ans = it.next()?.clone();
        for m in it {
            ans += m;
        }
        Some(ans)
    }
}

impl AddAssign<&TextureMatrix> for TextureMatrix {
    /// 逐元素相加, 体素个数也相加.
    fn add_assign(&mut self, rhs: &TextureMatrix) {
        assert_eq!(self.counts.dim(), rhs.counts.dim(), "矩阵形状不一致");
        self.counts += &rhs.counts;
        self.voxels += rhs.voxels;
    }
}
