use crate::Idx3d;

/// 三维行优先 (光栅序) 索引迭代器, 依次增长 `w`, `h`, `z`.
///
/// 虽然如下函数也能实现相同的功能:
///
/// ```
/// type Idx3d = (usize, usize, usize);
///
/// fn raster_auto((z, h, w): Idx3d) -> impl Iterator<Item = Idx3d> {
///     (0..z).flat_map(move |a| (0..h).flat_map(move |b| (0..w).map(move |c| (a, b, c))))
/// }
/// ```
///
/// 但扫描器需要在迭代过程中保存、恢复游标, 手写结构更方便.
#[derive(Debug, Clone)]
pub struct RasterIter {
    cur: Idx3d,
    shape: Idx3d,
}

impl RasterIter {
    /// 从 `(0, 0, 0)` 开始遍历形状为 `shape` 的数组.
    #[inline]
    pub fn new(shape: Idx3d) -> Self {
        Self {
            cur: (0, 0, 0),
            shape,
        }
    }
}

impl Iterator for RasterIter {
    type Item = Idx3d;

    fn next(&mut self) -> Option<Self::Item> {
        let (z, h, w) = self.shape;
        if z == 0 || h == 0 || w == 0 || self.cur.0 == z {
            return None;
        }
        let ret_pos = self.cur;
        let (cz, ch, cw) = &mut self.cur;
        if *cw + 1 < w {
            *cw += 1;
        } else if *ch + 1 < h {
            *cw = 0;
            *ch += 1;
        } else {
            *cw = 0;
            *ch = 0;
            *cz += 1;
        }
        Some(ret_pos)
    }
}
