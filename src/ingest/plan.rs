//! 1件分の取り込み判断と反映

use crate::catalog::Catalog;
use crate::error::{CoffeeLogError, Result};
use chrono::NaiveDate;
use coffee_log_common::{find_best_match, score_candidates, BagExtraction, MatchThresholds};
use tracing::{debug, warn};

/// ロースターの判断
#[derive(Debug, Clone, PartialEq)]
pub enum RoasterDecision {
    Existing { id: u64, name: String },
    New { name: String },
}

/// コーヒーの判断
#[derive(Debug, Clone, PartialEq)]
pub enum CoffeeDecision {
    /// 既存コーヒーに袋を追加
    Existing { id: u64, name: String, score: f64 },
    /// 新しいコーヒーとして登録
    New,
}

/// 取り込み計画
#[derive(Debug, Clone)]
pub struct IngestPlan {
    pub source_key: String,
    pub roaster: RoasterDecision,
    pub coffee: CoffeeDecision,
    pub extraction: BagExtraction,
}

/// 反映結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOutcome {
    pub roaster_id: u64,
    pub coffee_id: u64,
    pub bag_id: u64,
    pub created_roaster: bool,
    pub created_coffee: bool,
}

/// 抽出結果をカタログと照合して計画を立てる
///
/// カタログは変更しない。コーヒー名・ロースター名が空ならエラー。
pub fn plan_ingest(
    catalog: &Catalog,
    extraction: BagExtraction,
    source_key: &str,
    thresholds: &MatchThresholds,
) -> Result<IngestPlan> {
    if !extraction.coffee.is_valid() {
        return Err(CoffeeLogError::InvalidExtraction("コーヒー名がありません".into()));
    }
    let roaster_name = extraction.roaster_name.trim();
    if roaster_name.is_empty() {
        return Err(CoffeeLogError::InvalidExtraction("ロースター名がありません".into()));
    }

    let Some(roaster) = catalog.find_roaster_by_name(roaster_name, thresholds.roaster) else {
        return Ok(IngestPlan {
            source_key: source_key.to_string(),
            roaster: RoasterDecision::New {
                name: roaster_name.to_string(),
            },
            coffee: CoffeeDecision::New,
            extraction,
        });
    };

    let (ids, candidates) = catalog.descriptors_of(roaster.id);
    if tracing::enabled!(tracing::Level::DEBUG) {
        for (candidate, score) in candidates.iter().zip(score_candidates(&extraction.coffee, &candidates)) {
            debug!("  候補 {} : {:.3}", candidate.name, score);
        }
    }

    let coffee = match find_best_match(&extraction.coffee, &candidates, thresholds.coffee) {
        Some(matched) => CoffeeDecision::Existing {
            id: ids[matched.index],
            name: matched.descriptor.name.clone(),
            score: matched.score,
        },
        None => CoffeeDecision::New,
    };

    Ok(IngestPlan {
        source_key: source_key.to_string(),
        roaster: RoasterDecision::Existing {
            id: roaster.id,
            name: roaster.name.clone(),
        },
        coffee,
        extraction,
    })
}

/// 計画をカタログに反映する
///
/// 既存コーヒーに付ける場合は、空いている特徴とテイスティングノートを補う。
pub fn apply_plan(catalog: &mut Catalog, plan: IngestPlan) -> Result<IngestOutcome> {
    let IngestPlan {
        source_key,
        roaster,
        coffee,
        extraction,
    } = plan;

    let (roaster_id, created_roaster) = match roaster {
        RoasterDecision::Existing { id, .. } => (id, false),
        RoasterDecision::New { name } => (catalog.add_roaster(&name), true),
    };

    let (coffee_id, created_coffee) = match coffee {
        CoffeeDecision::Existing { id, .. } => {
            let existing = catalog
                .coffee_mut(id)
                .ok_or(CoffeeLogError::CoffeeNotFound(id))?;
            existing.absorb(&extraction.coffee);
            existing.add_tasting_notes(&extraction.tasting_notes);
            (id, false)
        }
        CoffeeDecision::New => {
            let id = catalog.add_coffee(
                roaster_id,
                extraction.coffee.clone(),
                extraction.roast_level.clone(),
                &extraction.tasting_notes,
            )?;
            (id, true)
        }
    };

    let roast_date = extraction.roast_date.as_deref().and_then(parse_roast_date);
    let bag_id = catalog.add_bag(coffee_id, roast_date, extraction.weight_grams, &source_key)?;
    catalog.mark_ingested(&source_key);

    Ok(IngestOutcome {
        roaster_id,
        coffee_id,
        bag_id,
        created_roaster,
        created_coffee,
    })
}

/// 焙煎日（YYYY-MM-DD / YYYY/MM/DD）。読めなければ None
pub fn parse_roast_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
        .ok();
    if parsed.is_none() {
        warn!("焙煎日を解釈できません: {}", value);
    }
    parsed
}
