//! 画像AIレスポンスパーサー
//!
//! 袋写真の解析レスポンスからJSONを抽出し、BagExtractionにパースする

use crate::error::{Error, Result};
use crate::types::BagExtraction;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
///
/// # Examples
/// ```
/// use coffee_log_common::extract_json;
///
/// let response = "結果です: {\"name\": \"Kenya AA\"}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"name\": \"Kenya AA\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 生の {...} を探す
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 袋写真の解析レスポンスをパース
///
/// # Returns
/// * `Ok(BagExtraction)` - パース成功（名前の妥当性は呼び出し側で確認する）
/// * `Err` - JSONが見つからないかパース失敗
pub fn parse_bag_extraction(response: &str) -> Result<BagExtraction> {
    let json_str = extract_json(response)?;
    let extraction: BagExtraction = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("袋データ JSONパースエラー: {}", e)))?;
    Ok(extraction)
}
