//! コーヒー名の正規化
//!
//! 袋の表記揺れ（大文字小文字・記号・"Coffee" などの汎用語）を吸収して、
//! 名前同士を比較できる形にそろえる。

use regex::Regex;
use std::collections::HashSet;

/// 照合では意味を持たない汎用語
pub const STOP_WORDS: &[&str] = &["coffee", "café", "espresso", "roasted", "roast", "bean", "beans"];

/// この長さ以下のトークンは語として扱わない（"aa", "el" など）
const MIN_TERM_LEN: usize = 2;

lazy_static::lazy_static! {
    // 単語文字・空白・ハイフン以外
    static ref SYMBOL_RE: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref STOP_WORD_RE: Regex = Regex::new(&format!(r"\b(?:{})\b", STOP_WORDS.join("|"))).unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// コーヒー名を正規化する
///
/// 小文字化 → 記号除去 → 汎用語除去 → 空白の圧縮・トリム。
/// 空文字列は空文字列のまま返す。
pub fn normalize(name: &str) -> String {
    if name.trim().is_empty() {
        return String::new();
    }

    let lowered = name.to_lowercase();
    let stripped = SYMBOL_RE.replace_all(&lowered, "");
    let without_stop_words = STOP_WORD_RE.replace_all(&stripped, " ");
    WHITESPACE_RE
        .replace_all(&without_stop_words, " ")
        .trim()
        .to_string()
}

/// 正規化した名前から比較用の語集合を取り出す
pub fn extract_terms(name: &str) -> HashSet<String> {
    normalize(name)
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TERM_LEN)
        .map(str::to_string)
        .collect()
}
