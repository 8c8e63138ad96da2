//! 既存コーヒーとの照合
//!
//! 新しく撮影された袋のコーヒーが、同じロースターの既存コーヒーの
//! どれと同一かを判定する。候補の絞り込み（ロースター単位）は呼び出し側の責務。

use crate::similarity::{characteristic_similarity, name_similarity, DEFAULT_NAME_THRESHOLD};
use crate::types::{CoffeeDescriptor, MatchResult};
use serde::{Deserialize, Serialize};

/// 特徴ベース照合の既定閾値
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

/// ロースター名照合の既定閾値
pub const DEFAULT_ROASTER_THRESHOLD: f64 = 0.7;

/// 最終スコアにおける特徴類似度の重み
pub const CHARACTERISTIC_WEIGHT: f64 = 0.7;

/// 最終スコアにおける名前類似度の重み
pub const NAME_WEIGHT: f64 = 0.3;

/// 照合の閾値一式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    /// 特徴+名前の合成スコア
    pub coffee: f64,
    /// 名前のみの照合
    pub name: f64,
    /// ロースター名
    pub roaster: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            coffee: DEFAULT_MATCH_THRESHOLD,
            name: DEFAULT_NAME_THRESHOLD,
            roaster: DEFAULT_ROASTER_THRESHOLD,
        }
    }
}

/// 1候補の合成スコア
pub fn combined_score(target: &CoffeeDescriptor, candidate: &CoffeeDescriptor) -> f64 {
    let char_score = characteristic_similarity(target, candidate);
    let name_score = name_similarity(&target.name, &candidate.name);
    CHARACTERISTIC_WEIGHT * char_score + NAME_WEIGHT * name_score
}

/// 全候補の合成スコア（診断表示用、候補と同じ順）
pub fn score_candidates(target: &CoffeeDescriptor, candidates: &[CoffeeDescriptor]) -> Vec<f64> {
    candidates
        .iter()
        .map(|candidate| combined_score(target, candidate))
        .collect()
}

/// 最も一致する既存コーヒーを探す
///
/// 合成スコアが `threshold` 以上の候補のうち最高のものを返す。
/// 同点なら先に現れた候補を採用するので、候補は作成順など安定した順で渡すこと。
/// 該当なしは `None`（新規コーヒーとして扱う想定）。
pub fn find_best_match<'a>(
    target: &CoffeeDescriptor,
    candidates: &'a [CoffeeDescriptor],
    threshold: f64,
) -> Option<MatchResult<'a>> {
    select_best(candidates, threshold, |candidate| combined_score(target, candidate))
}

/// 名前だけで最も一致する既存コーヒーを探す
///
/// 特徴情報を持たない呼び出し元向け。同点の扱いは `find_best_match` と同じ。
pub fn find_best_match_by_name_only<'a>(
    target_name: &str,
    candidates: &'a [CoffeeDescriptor],
    threshold: f64,
) -> Option<MatchResult<'a>> {
    select_best(candidates, threshold, |candidate| {
        name_similarity(target_name, &candidate.name)
    })
}

fn select_best<'a, F>(
    candidates: &'a [CoffeeDescriptor],
    threshold: f64,
    score_fn: F,
) -> Option<MatchResult<'a>>
where
    F: Fn(&CoffeeDescriptor) -> f64,
{
    let mut best: Option<MatchResult<'a>> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let score = score_fn(candidate);
        // NaN の閾値・スコアはどちらも一致させない
        let qualifies = score >= threshold;
        if !qualifies {
            continue;
        }

        // 同点は先勝ち
        if best.map_or(true, |b| score > b.score) {
            best = Some(MatchResult {
                descriptor: candidate,
                index,
                score,
            });
        }
    }

    best
}
