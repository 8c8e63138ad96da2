//! Coffee Log Common Library
//!
//! 袋写真から抽出したコーヒーを既存カタログと照合する純粋ロジック。
//! ファイルI/Oを持たないので、CLI以外（Web等）からも使える。

pub mod types;
mod lenient;
pub mod error;
pub mod normalize;
pub mod similarity;
pub mod matcher;
pub mod parser;

pub use types::{BagExtraction, CoffeeDescriptor, MatchResult};
pub use error::{Error, Result};
pub use normalize::{extract_terms, normalize};
pub use similarity::{
    are_likely_same_by_name, characteristic_similarity, name_similarity, DEFAULT_NAME_THRESHOLD,
};
pub use matcher::{
    combined_score, find_best_match, find_best_match_by_name_only, score_candidates,
    MatchThresholds, DEFAULT_MATCH_THRESHOLD, DEFAULT_ROASTER_THRESHOLD,
};
pub use parser::{extract_json, parse_bag_extraction};
