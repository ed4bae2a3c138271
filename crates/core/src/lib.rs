mod catalog;
pub use catalog::{Catalog, CatalogEntry};

mod embedding_cache;
pub use embedding_cache::{EmbeddingMatrix, build_embedding_matrix};

mod similarity;
pub use similarity::{NORM_EPSILON, RankedResult, l2_normalize, top_k};

pub mod prompts;
pub use prompts::{Profile, ProjectDetails};
