//! カタログ内の重複コーヒー検出
//!
//! 取り込み時の照合をすり抜けた重複（閾値変更前の登録、同時取り込み等）を
//! 後から洗い出して統合する。比較は同じロースター内のみ。

use crate::catalog::Catalog;
use crate::error::Result;
use coffee_log_common::{find_best_match, CoffeeDescriptor};
use rayon::prelude::*;
use tracing::info;

/// 重複ペア
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicatePair {
    pub roaster_id: u64,
    /// 残す側（先に登録されたコーヒー）
    pub keep: u64,
    /// 統合される側
    pub duplicate: u64,
    pub score: f64,
}

/// 重複候補を探す
///
/// ロースターごとに作成順で走査し、各コーヒーをそれより前の（重複でない）
/// コーヒーと照合する。ロースター単位で並列に処理する。
pub fn find_duplicates(catalog: &Catalog, threshold: f64) -> Vec<DuplicatePair> {
    let roaster_ids: Vec<u64> = catalog.roasters.iter().map(|r| r.id).collect();

    let mut pairs: Vec<DuplicatePair> = roaster_ids
        .par_iter()
        .flat_map_iter(|&roaster_id| duplicates_within(catalog, roaster_id, threshold))
        .collect();

    pairs.sort_by_key(|p| (p.roaster_id, p.duplicate));
    pairs
}

fn duplicates_within(catalog: &Catalog, roaster_id: u64, threshold: f64) -> Vec<DuplicatePair> {
    let (ids, descriptors) = catalog.descriptors_of(roaster_id);

    let mut pairs = Vec::new();
    let mut canonical_ids: Vec<u64> = Vec::new();
    let mut canonical: Vec<CoffeeDescriptor> = Vec::new();

    for (id, descriptor) in ids.into_iter().zip(descriptors) {
        match find_best_match(&descriptor, &canonical, threshold) {
            Some(matched) => pairs.push(DuplicatePair {
                roaster_id,
                keep: canonical_ids[matched.index],
                duplicate: id,
                score: matched.score,
            }),
            None => {
                canonical_ids.push(id);
                canonical.push(descriptor);
            }
        }
    }

    pairs
}

/// 重複ペアを統合する。付け替えた袋の総数を返す
pub fn merge_duplicates(catalog: &mut Catalog, pairs: &[DuplicatePair]) -> Result<usize> {
    let mut moved = 0;
    for pair in pairs {
        moved += catalog.merge_coffee(pair.keep, pair.duplicate)?;
        info!("コーヒー #{} を #{} に統合", pair.duplicate, pair.keep);
    }
    Ok(moved)
}
