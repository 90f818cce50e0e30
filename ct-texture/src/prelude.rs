//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx3d};

pub use crate::aggregate::{Aggregation, DistanceWeighting};
pub use crate::config::{ConfigError, TextureConfig};
pub use crate::extract::{FeatureVector, TextureExtractor};
pub use crate::features::{FeatureValue, NameStyle, Statistic};
pub use crate::ivh::IntensityVolumeFeatures;
pub use crate::matrix::{MatrixFamily, TextureMatrix};
pub use crate::scan::{Dim, DistanceMap, NeighborhoodNorm};
pub use crate::volume::GreyLevelVolume;

pub use crate::consts::NOT_IN_REGION;
