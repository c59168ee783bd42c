//! Chart repositories and version resolution

pub mod coordinates;
pub mod index;
pub mod resolve;

pub use coordinates::{PackageCoordinates, ResolvedKey};
pub use index::{ChartVersion, RepositoryIndex, StaticIndex};
pub use resolve::{Repository, SourceResolver};
