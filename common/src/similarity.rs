//! 類似度計算
//!
//! ## 名前類似度
//! 語集合のJaccard係数に、部分一致・産地語・精製語のボーナスを加算する。
//!
//! ## 特徴類似度
//! 産地・地域・農園・精製・品種を重み付きで比較する。
//! 片方にしか値がないフィールドは比較対象から外す（不一致扱いしない）。

use crate::normalize::{extract_terms, normalize};
use crate::types::CoffeeDescriptor;

/// 名前だけで同一とみなす既定の閾値
pub const DEFAULT_NAME_THRESHOLD: f64 = 0.7;

/// 名前に含まれていれば産地の手がかりになる語
///
/// "el salvador" のような複数語もあるので、語集合ではなく正規化後の名前全体に対して部分一致で探す。
pub const ORIGIN_WORDS: &[&str] = &[
    "honduras",
    "el salvador",
    "ethiopia",
    "kenya",
    "colombia",
    "brazil",
    "guatemala",
    "costa rica",
];

/// 名前に含まれていれば精製方法の手がかりになる語
pub const PROCESS_WORDS: &[&str] = &["honey", "washed", "natural", "anaerobic", "fermented"];

const SUBSTRING_BONUS: f64 = 0.2;
const ORIGIN_BONUS: f64 = 0.15;
const PROCESS_BONUS: f64 = 0.10;

/// 特徴フィールドの比較方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldRule {
    /// 完全一致（大文字小文字無視）
    Exact,
    /// どちらかがもう一方を含む
    Contains,
}

/// (重み, 比較方法, 取り出し)
type FieldSpec = (f64, FieldRule, fn(&CoffeeDescriptor) -> Option<&str>);

const FIELDS: &[FieldSpec] = &[
    (3.0, FieldRule::Exact, origin_country),
    (2.5, FieldRule::Contains, region),
    (2.0, FieldRule::Contains, farm),
    (1.5, FieldRule::Exact, process),
    (1.0, FieldRule::Contains, variety),
];

fn origin_country(d: &CoffeeDescriptor) -> Option<&str> {
    d.origin_country.as_deref()
}

fn region(d: &CoffeeDescriptor) -> Option<&str> {
    d.region.as_deref()
}

fn farm(d: &CoffeeDescriptor) -> Option<&str> {
    d.farm.as_deref()
}

fn process(d: &CoffeeDescriptor) -> Option<&str> {
    d.process.as_deref()
}

fn variety(d: &CoffeeDescriptor) -> Option<&str> {
    d.variety.as_deref()
}

/// 名前の類似度（0.0〜1.0）
///
/// どちらかの語集合が空なら 0。
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let terms_a = extract_terms(a);
    let terms_b = extract_terms(b);
    if terms_a.is_empty() || terms_b.is_empty() {
        return 0.0;
    }

    let intersection = terms_a.intersection(&terms_b).count();
    let union = terms_a.union(&terms_b).count();
    let jaccard = intersection as f64 / union as f64;

    let norm_a = normalize(a);
    let norm_b = normalize(b);

    let mut bonus = 0.0;
    if norm_a.contains(&norm_b) || norm_b.contains(&norm_a) {
        bonus += SUBSTRING_BONUS;
    }
    if shares_word(&norm_a, &norm_b, ORIGIN_WORDS) {
        bonus += ORIGIN_BONUS;
    }
    if shares_word(&norm_a, &norm_b, PROCESS_WORDS) {
        bonus += PROCESS_BONUS;
    }

    (jaccard + bonus).min(1.0)
}

/// 名前類似度が閾値以上か
pub fn are_likely_same_by_name(a: &str, b: &str, threshold: f64) -> bool {
    name_similarity(a, b) >= threshold
}

/// 語彙のいずれかが両方の名前に現れるか
///
/// "el salvador" のような複数語も拾えるよう、正規化済みの名前全体で探す。
fn shares_word(norm_a: &str, norm_b: &str, lexicon: &[&str]) -> bool {
    lexicon
        .iter()
        .any(|word| norm_a.contains(word) && norm_b.contains(word))
}

/// 特徴の類似度（0.0〜1.0）
///
/// 両方に値があるフィールドだけを重み付きで比較する。
/// 比較できるフィールドが一つもなければ 0（一致の根拠なし）。
pub fn characteristic_similarity(target: &CoffeeDescriptor, candidate: &CoffeeDescriptor) -> f64 {
    let mut score: f64 = 0.0;
    let mut total_weight: f64 = 0.0;

    for &(weight, rule, field) in FIELDS {
        let (Some(a), Some(b)) = (comparable(field(target)), comparable(field(candidate))) else {
            continue;
        };

        total_weight += weight;
        let matched = match rule {
            FieldRule::Exact => a == b,
            FieldRule::Contains => a.contains(&b) || b.contains(&a),
        };
        if matched {
            score += weight;
        }
    }

    if total_weight > 0.0 {
        score / total_weight
    } else {
        0.0
    }
}

/// 比較用に小文字化・トリム。空なら None
fn comparable(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(
        origin: Option<&str>,
        region: Option<&str>,
        farm: Option<&str>,
    ) -> CoffeeDescriptor {
        CoffeeDescriptor {
            name: "test".to_string(),
            origin_country: origin.map(String::from),
            region: region.map(String::from),
            farm: farm.map(String::from),
            ..Default::default()
        }
    }

    // =============================================
    // name_similarity テスト
    // =============================================

    #[test]
    fn test_reordered_names_match() {
        let score = name_similarity("El Salvador Honey La Hondurita", "Honey El Salvador La Hondurita");
        assert!(score >= 0.7, "score = {}", score);
        assert!(are_likely_same_by_name(
            "El Salvador Honey La Hondurita",
            "Honey El Salvador La Hondurita",
            DEFAULT_NAME_THRESHOLD
        ));

        assert!(are_likely_same_by_name(
            "Ethiopia Yirgacheffe Natural",
            "Natural Ethiopia Yirgacheffe",
            DEFAULT_NAME_THRESHOLD
        ));
    }

    #[test]
    fn test_different_names_do_not_match() {
        let score = name_similarity("Colombia Huila Washed", "Brazil Santos");
        assert!(score < 0.7, "score = {}", score);
        assert!(!are_likely_same_by_name("Colombia Huila Washed", "Brazil Santos", DEFAULT_NAME_THRESHOLD));
    }

    #[test]
    fn test_extra_process_word_still_matches() {
        // Jaccard 2/3 + 部分一致 0.2 + 産地 0.15 → 上限 1.0
        let score = name_similarity("Kenya AA Kiambu", "Kenya AA Kiambu Washed");
        assert!(score >= 0.7);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_similarity_is_one() {
        for name in ["Yirgacheffe", "Kenya AA Kiambu", "Finca Santa Teresa Gesha"] {
            assert!((name_similarity(name, name) - 1.0).abs() < 1e-9, "name: {}", name);
        }
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("Kenya AA Kiambu", "Kenya AA Kiambu Washed"),
            ("Colombia Huila Washed", "Brazil Santos"),
            ("Guatemala Huehuetenango", "Huehuetenango Natural"),
            ("Costa Rica Tarrazu Honey", "Honey Tarrazu"),
        ];
        for (a, b) in pairs {
            assert_eq!(name_similarity(a, b), name_similarity(b, a), "{} / {}", a, b);
        }
    }

    #[test]
    fn test_empty_terms_score_zero() {
        assert_eq!(name_similarity("", "Kenya"), 0.0);
        assert_eq!(name_similarity("Kenya", "AA"), 0.0);
        assert_eq!(name_similarity("Coffee", "Coffee"), 0.0);
    }

    #[test]
    fn test_pattern_bonuses() {
        // 語は共有しないが、産地・精製語の部分一致でボーナスが付く
        // "ethiopian" ⊃ "ethiopia", "naturals" ⊃ "natural"
        let score = name_similarity("Ethiopian Naturals", "Ethiopia Natural Guji");
        // Jaccard 0/5 + 産地 0.15 + 精製 0.10
        assert!((score - 0.25).abs() < 1e-9, "score = {}", score);
    }

    #[test]
    fn test_multi_word_origin_bonus() {
        // "el" は語にならないが "el salvador" は産地語として拾う
        let score = name_similarity("El Salvador Pacamara", "El Salvador Bourbon");
        // Jaccard 1/3 + 産地 0.15
        assert!((score - (1.0 / 3.0 + 0.15)).abs() < 1e-9, "score = {}", score);
    }

    #[test]
    fn test_score_is_bounded() {
        let score = name_similarity("Honey Kenya Washed", "Kenya Honey Washed Natural");
        assert!((0.0..=1.0).contains(&score));
    }

    // =============================================
    // characteristic_similarity テスト
    // =============================================

    #[test]
    fn test_characteristic_substring_fields() {
        let target = descriptor(Some("Ethiopia"), Some("Sidama"), Some("Bensa"));
        let candidate = descriptor(Some("Ethiopia"), Some("Sidama"), Some("Bensa Washing Station"));
        let score = characteristic_similarity(&target, &candidate);
        assert!(score > 0.8, "score = {}", score);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_characteristic_case_insensitive() {
        let target = descriptor(Some("ETHIOPIA"), Some("sidama"), None);
        let candidate = descriptor(Some(" ethiopia "), Some("Sidama Zone"), None);
        assert!((characteristic_similarity(&target, &candidate) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_characteristic_weighted_mismatch() {
        // 産地一致 3.0 / 地域不一致 2.5
        let target = descriptor(Some("Kenya"), Some("Nyeri"), None);
        let candidate = descriptor(Some("Kenya"), Some("Kiambu"), None);
        let score = characteristic_similarity(&target, &candidate);
        assert!((score - 3.0 / 5.5).abs() < 1e-9, "score = {}", score);
    }

    #[test]
    fn test_characteristic_exact_fields_do_not_substring() {
        let target = CoffeeDescriptor {
            process: Some("washed".into()),
            ..CoffeeDescriptor::new("a")
        };
        let candidate = CoffeeDescriptor {
            process: Some("semi-washed".into()),
            ..CoffeeDescriptor::new("b")
        };
        assert_eq!(characteristic_similarity(&target, &candidate), 0.0);
    }

    #[test]
    fn test_characteristic_no_comparable_fields() {
        let target = descriptor(Some("Ethiopia"), None, None);
        let candidate = descriptor(None, Some("Sidama"), None);
        assert_eq!(characteristic_similarity(&target, &candidate), 0.0);

        // 空文字・空白のみは値なし扱い
        let target = descriptor(Some(""), Some("  "), None);
        let candidate = descriptor(Some("Ethiopia"), Some("Sidama"), None);
        assert_eq!(characteristic_similarity(&target, &candidate), 0.0);
    }

    #[test]
    fn test_characteristic_missing_field_is_not_mismatch() {
        let target = descriptor(Some("Ethiopia"), None, Some("Bensa"));
        let candidate = descriptor(Some("Ethiopia"), Some("Sidama"), None);
        assert!((characteristic_similarity(&target, &candidate) - 1.0).abs() < 1e-9);
    }
}
