use chrono::{DateTime, NaiveDate, Utc};
use coffee_log_common::CoffeeDescriptor;
use serde::{Deserialize, Serialize};

/// ロースター
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roaster {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// コーヒー（ロースターの特定の商品・ロット）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coffee {
    pub id: u64,
    pub roaster_id: u64,

    #[serde(flatten)]
    pub descriptor: CoffeeDescriptor,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roast_level: Option<String>,

    #[serde(default)]
    pub tasting_notes: Vec<String>,

    pub created_at: DateTime<Utc>,
}

impl Coffee {
    /// 空いているフィールドだけを他の記述で埋める
    ///
    /// 既存の値は上書きしない。埋めたフィールド数を返す。
    pub fn absorb(&mut self, other: &CoffeeDescriptor) -> usize {
        let d = &mut self.descriptor;
        let mut filled = 0;
        filled += fill(&mut d.origin_country, &other.origin_country);
        filled += fill(&mut d.region, &other.region);
        filled += fill(&mut d.farm, &other.farm);
        filled += fill(&mut d.process, &other.process);
        filled += fill(&mut d.variety, &other.variety);
        if d.altitude.is_none() && other.altitude.is_some() {
            d.altitude = other.altitude;
            filled += 1;
        }
        filled
    }

    /// テイスティングノートを重複なしで追加
    pub fn add_tasting_notes(&mut self, notes: &[String]) {
        for note in notes {
            let note = note.trim();
            if note.is_empty() {
                continue;
            }
            let folded = note.to_lowercase();
            if !self.tasting_notes.iter().any(|n| n.to_lowercase() == folded) {
                self.tasting_notes.push(note.to_string());
            }
        }
    }
}

fn fill(slot: &mut Option<String>, value: &Option<String>) -> usize {
    let empty = slot.as_deref().map_or(true, |s| s.trim().is_empty());
    match value.as_deref().map(str::trim) {
        Some(v) if empty && !v.is_empty() => {
            *slot = Some(v.to_string());
            1
        }
        _ => 0,
    }
}

/// 袋（購入単位）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bag {
    pub id: u64,
    pub coffee_id: u64,

    #[serde(default)]
    pub roast_date: Option<NaiveDate>,

    #[serde(default)]
    pub weight_grams: Option<f64>,

    /// 取り込み元ファイルの冪等キー
    pub source_key: String,

    pub added_at: DateTime<Utc>,
}

/// カタログの件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub roasters: usize,
    pub coffees: usize,
    pub bags: usize,
}
