//! 照合まわりの型定義
//!
//! - CoffeeDescriptor: 照合に使うコーヒーの特徴（新規抽出・既存カタログ共通）
//! - MatchResult: 最良一致の候補とスコア
//! - BagExtraction: 画像AIが袋写真から抽出した生データ

use crate::lenient::{
    deserialize_altitude, deserialize_notes, deserialize_required_text, deserialize_text,
    deserialize_weight,
};
use serde::{Deserialize, Serialize};

/// コーヒーの特徴量
///
/// `name` 以外はすべて任意。AI抽出データは欠損が多いため、
/// 空文字・空白のみのフィールドは「値なし」として扱う。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoffeeDescriptor {
    #[serde(alias = "coffeeName", deserialize_with = "deserialize_required_text")]
    pub name: String,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_text"
    )]
    pub origin_country: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_text"
    )]
    pub region: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_text"
    )]
    pub farm: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_text"
    )]
    pub process: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_text"
    )]
    pub variety: Option<String>,

    /// 標高（m）。照合スコアには使わない
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_altitude"
    )]
    pub altitude: Option<f64>,
}

impl CoffeeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 名前が空でなければ有効
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// 照合結果
///
/// `index` は候補スライス内の位置。呼び出し側はこれで自前のIDに戻す。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub descriptor: &'a CoffeeDescriptor,
    pub index: usize,
    pub score: f64,
}

/// 袋写真の抽出結果（画像AIの出力）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BagExtraction {
    #[serde(alias = "roaster", deserialize_with = "deserialize_required_text")]
    pub roaster_name: String,

    #[serde(flatten)]
    pub coffee: CoffeeDescriptor,

    /// 焙煎日（YYYY-MM-DD想定、AIの出力そのまま）
    #[serde(deserialize_with = "deserialize_text")]
    pub roast_date: Option<String>,

    #[serde(deserialize_with = "deserialize_text")]
    pub roast_level: Option<String>,

    /// 重さ（g）
    #[serde(deserialize_with = "deserialize_weight")]
    pub weight_grams: Option<f64>,

    #[serde(deserialize_with = "deserialize_notes")]
    pub tasting_notes: Vec<String>,
}
