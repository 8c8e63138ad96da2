//! 画像AI出力の寛容なデシリアライズ
//!
//! AIは型を守らないことが多い（null、単位付き文字列、カンマ区切りの配列など）。
//! 解釈できない値はエラーにせず「値なし」にする。

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

lazy_static::lazy_static! {
    // 1: 3桁区切りの数値（"1,900" / "1.900"）、2: 通常の数値（"1850" / "1.5" / "0,5"）
    static ref NUMBER_RE: Regex =
        Regex::new(r"(?:(\d{1,3}(?:[.,]\d{3})+)|(\d+(?:[.,]\d+)?))(?:\D|$)").unwrap();
    static ref NOTE_SEPARATOR_RE: Regex = Regex::new(r"[,;、/]").unwrap();
}

/// 文字列中の最初の数値を取り出す
///
/// 区切り文字の後ろがちょうど3桁なら桁区切りとみなす（"1.900 masl" → 1900）。
pub(crate) fn parse_leading_number(s: &str) -> Option<f64> {
    let caps = NUMBER_RE.captures(s)?;
    if let Some(grouped) = caps.get(1) {
        return grouped.as_str().replace([',', '.'], "").parse().ok();
    }
    caps.get(2)?.as_str().replace(',', ".").parse().ok()
}

/// 重さ（g）。単位付き文字列は g に換算する
pub(crate) fn parse_weight_grams(s: &str) -> Option<f64> {
    let value = parse_leading_number(s)?;
    let lower = s.to_lowercase();
    let grams = if lower.contains("kg") {
        value * 1000.0
    } else if lower.contains("oz") {
        value * 28.3495
    } else if lower.contains("lb") {
        value * 453.592
    } else {
        value
    };
    Some(grams)
}

fn number_or_text(value: Option<Value>, parse: fn(&str) -> Option<f64>) -> Option<f64> {
    value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse(&s),
        _ => None,
    })
}

/// 標高（m）。数値・文字列どちらでも受け付ける
pub(crate) fn deserialize_altitude<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(number_or_text(value, parse_leading_number))
}

/// 重さ（g）。"250g" / "12 oz" なども受け付ける
pub(crate) fn deserialize_weight<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(number_or_text(value, parse_weight_grams))
}

/// 任意のテキスト。文字列以外は None
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// 必須テキスト。文字列以外は空文字（後段の検証で弾かれる）
pub(crate) fn deserialize_required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_text(deserializer)?.unwrap_or_default())
}

/// テイスティングノート。配列・区切り文字列・null を受け付ける
pub(crate) fn deserialize_notes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let notes: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => NOTE_SEPARATOR_RE.split(&s).map(str::to_string).collect(),
        _ => Vec::new(),
    };

    Ok(notes
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect())
}
