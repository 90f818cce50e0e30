#![warn(missing_docs)]

//! 影像组学纹理矩阵库. 从离散化、已限定 ROI 的 3D 灰度体数据出发,
//! 构建灰度游程矩阵 (GLRLM), 灰度区域大小矩阵 (GLSZM), 灰度区域距离矩阵 (GLDZM)
//! 和邻域灰度依赖矩阵 (NGLDM), 按多种策略聚合, 并导出标量纹理特征.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 体数据按照 `(z, h, w)` 模式存储, 即 (切片, 行, 列). ROI 之外的体素为 `NaN`.
//! 2. 图像读取, 重采样, 灰度离散化和表格输出均不在本 crate 范围内.
//! 3. 配置错误在任何扫描开始之前以 [`ConfigError`] 返回. 其它非期望情况下
//!   (如合并形状不同的矩阵) 程序会直接 panic.
//!
//! # 模块
//!
//! ### 体数据 ✅
//!
//! 实现位于 `ct-texture/src/volume`. 会破坏数据的扫描只在副本上进行,
//! 调用者的体数据始终不变.
//!
//! ### 扫描器 ✅
//!
//! 距离图 (逐层腐蚀), 连通区域 (广度优先搜索), 方向游程和邻域依赖.
//!
//! 实现位于 `ct-texture/src/scan`.
//!
//! ### 纹理矩阵与聚合 ✅
//!
//! 四类矩阵共用一条流水线: `矩阵类别 × 聚合策略 × 特征导出`.
//!
//! 实现位于 `ct-texture/src/matrix`, `ct-texture/src/aggregate.rs`.
//!
//! ### 特征导出 ✅
//!
//! 每个矩阵 16 个统计量 (NGLDM 另有能量), 支持可读名称和 IBSI 代码两种命名.
//!
//! 实现位于 `ct-texture/src/features`.
//!
//! ### 强度-体积直方图 ✅
//!
//! 不经过纹理矩阵流水线, [`TextureExtractor::extract_all`] 不包含这些特征.
//! 通过 [`TextureExtractor::intensity_volume`] 或 [`IntensityVolumeFeatures::compute`] 单独计算.
//!
//! 实现位于 `ct-texture/src/ivh.rs`.
//!
//! # 示例
//!
//! ```
//! use ct_texture::prelude::*;
//! use ndarray::Array3;
//!
//! let data = Array3::from_shape_fn((2, 4, 4), |(z, h, w)| ((z + h * w) % 3) as f64);
//! let volume = GreyLevelVolume::new(data, [2.0, 0.7, 0.7]);
//! let config = TextureConfig::default();
//! let extractor = TextureExtractor::new(&volume, &config).unwrap();
//! for fv in extractor.extract_all() {
//!     assert!(!fv.is_empty());
//! }
//! ```

/// 二维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx2d = (usize, usize);

/// 三维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

pub mod aggregate;
pub mod config;
pub mod consts;
pub mod extract;
pub mod features;
pub mod ivh;
pub mod matrix;
pub mod prelude;
pub mod scan;
pub mod volume;

pub use aggregate::{Aggregation, DistanceWeighting, FeatureAccumulator};
pub use config::{ConfigError, TextureConfig};
pub use extract::{FeatureVector, TextureExtractor};
pub use features::{FeatureValue, NameStyle, Statistic, TextureFeatures};
pub use ivh::IntensityVolumeFeatures;
pub use matrix::{MatrixFamily, MatrixGroups, ScanReport, TextureMatrix};
pub use scan::{Dim, DistanceMap, NeighborhoodNorm};
pub use volume::GreyLevelVolume;
