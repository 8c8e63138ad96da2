use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coffee-log")]
#[command(about = "コーヒー袋写真の解析結果を取り込み・照合するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像AIの解析結果ファイル（またはフォルダ）をカタログに取り込む
    Ingest {
        /// 解析結果ファイル/フォルダのパス
        #[arg(required = true)]
        path: PathBuf,

        /// カタログファイル（省略時は設定・環境変数・既定の順）
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// ドライラン（カタログを保存せず判断だけ表示）
        #[arg(long)]
        dry_run: bool,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// コーヒー照合の閾値（0.0-1.0）
        #[arg(short, long, value_parser = parse_threshold)]
        threshold: Option<f64>,
    },

    /// 1件のコーヒーを候補リストと照合
    Match {
        /// 照合対象（CoffeeDescriptorのJSON）
        #[arg(required = true)]
        target: PathBuf,

        /// 候補（CoffeeDescriptor配列のJSON、作成順）
        #[arg(required = true)]
        candidates: PathBuf,

        /// 閾値（省略時は設定値）
        #[arg(short, long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// 名前だけで照合
        #[arg(long)]
        name_only: bool,
    },

    /// カタログ内の重複コーヒーを検出・統合
    Dedupe {
        /// カタログファイル
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// 照合の閾値（0.0-1.0）
        #[arg(short, long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// 検出した重複を統合して保存
        #[arg(long)]
        apply: bool,
    },

    /// 2つのコーヒー名の類似度を表示
    Similarity {
        a: String,
        b: String,
    },

    /// コーヒー名の正規化結果と語集合を表示
    Normalize {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// カタログの内容を表示
    Catalog {
        /// カタログファイル
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// コーヒー照合の閾値を設定
        #[arg(long, value_parser = parse_threshold)]
        set_coffee_threshold: Option<f64>,

        /// 名前照合の閾値を設定
        #[arg(long, value_parser = parse_threshold)]
        set_name_threshold: Option<f64>,

        /// ロースター照合の閾値を設定
        #[arg(long, value_parser = parse_threshold)]
        set_roaster_threshold: Option<f64>,

        /// 既定のカタログファイルを設定
        #[arg(long)]
        set_catalog: Option<PathBuf>,
    },
}

/// 閾値は 0.0〜1.0 の有限値のみ
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("数値ではありません: {}", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("0.0〜1.0 で指定してください: {}", s))
    }
}
