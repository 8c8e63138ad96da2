//! 袋データ取り込みモジュール
//!
//! 画像AIの解析結果ファイルを1件ずつカタログと照合し、
//! 既存コーヒーへの袋追加か新規コーヒー登録かを決めて反映する。
//!
//! ## 処理フロー
//! 1. ファイル内容のSHA-256で冪等キーを作り、取り込み済みならスキップ
//! 2. レスポンスからBagExtractionをパース
//! 3. ロースター・コーヒーを照合して計画を立てる
//! 4. 計画を反映（後続ファイルは反映後のカタログで照合される）

pub mod plan;

pub use plan::{apply_plan, plan_ingest, CoffeeDecision, IngestOutcome, IngestPlan, RoasterDecision};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::scanner::ExtractionFile;
use coffee_log_common::{parse_bag_extraction, MatchThresholds};
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// 取り込みオプション
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub thresholds: MatchThresholds,
    /// 進捗バーを表示する
    pub show_progress: bool,
}

/// ファイルごとの結果
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// 既存コーヒーに袋を追加
    Attached { coffee_id: u64, coffee_name: String, score: f64 },
    /// 新規コーヒーを登録
    Created { coffee_id: u64, new_roaster: bool },
    /// 取り込み済み
    AlreadyIngested,
    /// 読み込み・パース・検証の失敗
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub file_name: String,
    pub status: FileStatus,
}

/// 取り込み結果のまとめ
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    pub reports: Vec<FileReport>,
}

impl IngestSummary {
    pub fn attached(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Attached { .. }))
    }

    pub fn created_coffees(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Created { .. }))
    }

    pub fn created_roasters(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Created { new_roaster: true, .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::AlreadyIngested))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.status)).count()
    }
}

/// ファイル内容の冪等キー（SHA-256 hex）
pub fn idempotency_key(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// 解析結果ファイルをまとめて取り込む
///
/// 1件の失敗でバッチ全体は止めない。カタログの保存は呼び出し側で行う。
pub fn ingest_files(
    catalog: &mut Catalog,
    files: &[ExtractionFile],
    options: &IngestOptions,
) -> IngestSummary {
    let progress = if options.show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut summary = IngestSummary::default();

    for file in files {
        progress.set_message(file.file_name.clone());

        let status = match std::fs::read(&file.path) {
            Ok(content) => ingest_content(catalog, &content, &options.thresholds),
            Err(e) => Err(e.into()),
        }
        .unwrap_or_else(|e| FileStatus::Failed(e.to_string()));

        match &status {
            FileStatus::Attached { coffee_name, score, .. } => {
                info!("{}: 既存コーヒー「{}」に追加 ({:.2})", file.file_name, coffee_name, score)
            }
            FileStatus::Created { coffee_id, new_roaster } => info!(
                "{}: 新規コーヒー #{}{}",
                file.file_name,
                coffee_id,
                if *new_roaster { "（新規ロースター）" } else { "" }
            ),
            FileStatus::AlreadyIngested => info!("{}: 取り込み済み、スキップ", file.file_name),
            FileStatus::Failed(reason) => warn!("{}: 取り込み失敗: {}", file.file_name, reason),
        }

        summary.reports.push(FileReport {
            file_name: file.file_name.clone(),
            status,
        });
        progress.inc(1);
    }

    progress.finish_and_clear();
    summary
}

/// レスポンス1件を取り込む
pub fn ingest_content(
    catalog: &mut Catalog,
    content: &[u8],
    thresholds: &MatchThresholds,
) -> Result<FileStatus> {
    let key = idempotency_key(content);
    if catalog.is_ingested(&key) {
        return Ok(FileStatus::AlreadyIngested);
    }

    let response = String::from_utf8_lossy(content);
    let extraction = parse_bag_extraction(&response)?;
    let plan = plan_ingest(catalog, extraction, &key, thresholds)?;

    let attached = match &plan.coffee {
        CoffeeDecision::Existing { name, score, .. } => Some((name.clone(), *score)),
        CoffeeDecision::New => None,
    };

    let outcome = apply_plan(catalog, plan)?;
    Ok(match attached {
        Some((coffee_name, score)) => FileStatus::Attached {
            coffee_id: outcome.coffee_id,
            coffee_name,
            score,
        },
        None => FileStatus::Created {
            coffee_id: outcome.coffee_id,
            new_roaster: outcome.created_roaster,
        },
    })
}
