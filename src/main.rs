use clap::Parser;
use coffee_log::{catalog, cli, config, dedupe, error, ingest, scanner};
use coffee_log_common::{
    extract_terms, find_best_match, find_best_match_by_name_only, name_similarity, normalize,
    score_candidates, CoffeeDescriptor,
};
use catalog::Catalog;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Ingest { path, catalog, dry_run, recursive, threshold } => {
            println!("☕ coffee-log - 取り込み\n");

            let catalog_path = config.resolve_catalog_path(catalog)?;
            let thresholds = config.thresholds_with(threshold, None)?;

            // 1. Scan
            println!("[1/3] 解析結果をスキャン中...");
            let files = scanner::scan_extractions(&path, recursive)?;
            println!("✔ {}件のファイルを検出\n", files.len());

            if files.is_empty() {
                return Err(error::CoffeeLogError::FileNotFound(path.display().to_string()));
            }

            // 2. Match & apply
            println!("[2/3] カタログと照合中...{}", if dry_run { " (ドライラン)" } else { "" });
            let mut catalog = Catalog::load(&catalog_path)?;
            let options = ingest::IngestOptions {
                thresholds,
                show_progress: !cli.verbose,
            };
            let summary = ingest::ingest_files(&mut catalog, &files, &options);

            for report in &summary.reports {
                match &report.status {
                    ingest::FileStatus::Attached { coffee_id, coffee_name, score } => println!(
                        "  {} → 既存 #{} {} ({:.2})",
                        report.file_name, coffee_id, coffee_name, score
                    ),
                    ingest::FileStatus::Created { coffee_id, new_roaster } => println!(
                        "  {} → 新規 #{}{}",
                        report.file_name,
                        coffee_id,
                        if *new_roaster { " (新規ロースター)" } else { "" }
                    ),
                    ingest::FileStatus::AlreadyIngested => {
                        println!("  {} → 取り込み済み", report.file_name)
                    }
                    ingest::FileStatus::Failed(reason) => {
                        println!("  {} → 失敗: {}", report.file_name, reason)
                    }
                }
            }
            println!(
                "✔ 追加 {} / 新規コーヒー {} (新規ロースター {}) / スキップ {} / 失敗 {}\n",
                summary.attached(),
                summary.created_coffees(),
                summary.created_roasters(),
                summary.skipped(),
                summary.failed()
            );

            // 3. Save
            if dry_run {
                println!("[3/3] ドライランのため保存しません");
            } else {
                println!("[3/3] カタログを保存中...");
                catalog.save(&catalog_path)?;
                println!("✔ カタログを保存: {}", catalog_path.display());
            }

            println!("\n✅ 取り込み完了");
        }

        Commands::Match { target, candidates, threshold, name_only } => {
            let target: CoffeeDescriptor = read_json(&target)?;
            let candidates: Vec<CoffeeDescriptor> = read_json(&candidates)?;

            let (result, scores) = if name_only {
                let threshold = config.thresholds_with(None, threshold)?.name;
                let scores: Vec<f64> = candidates
                    .iter()
                    .map(|c| name_similarity(&target.name, &c.name))
                    .collect();
                (find_best_match_by_name_only(&target.name, &candidates, threshold), scores)
            } else {
                let threshold = config.thresholds_with(threshold, None)?.coffee;
                (
                    find_best_match(&target, &candidates, threshold),
                    score_candidates(&target, &candidates),
                )
            };

            println!("照合対象: {}", target.name);
            for (i, (candidate, score)) in candidates.iter().zip(&scores).enumerate() {
                println!("  [{}] {:.3}  {}", i, score, candidate.name);
            }

            match result {
                Some(matched) => println!(
                    "\n✔ 一致: [{}] {} ({:.3})",
                    matched.index, matched.descriptor.name, matched.score
                ),
                None => println!("\n一致なし（新規コーヒー）"),
            }
        }

        Commands::Dedupe { catalog, threshold, apply } => {
            let catalog_path = config.resolve_catalog_path(catalog)?;
            let threshold = config.thresholds_with(threshold, None)?.coffee;
            let mut catalog = Catalog::load(&catalog_path)?;

            let pairs = dedupe::find_duplicates(&catalog, threshold);
            if pairs.is_empty() {
                println!("重複は見つかりませんでした");
                return Ok(());
            }

            println!("重複候補: {}件", pairs.len());
            for pair in &pairs {
                let name = |id| {
                    catalog
                        .coffee(id)
                        .map(|c| c.descriptor.name.clone())
                        .unwrap_or_default()
                };
                println!(
                    "  #{} {}  ←  #{} {} ({:.3})",
                    pair.keep,
                    name(pair.keep),
                    pair.duplicate,
                    name(pair.duplicate),
                    pair.score
                );
            }

            if apply {
                let moved = dedupe::merge_duplicates(&mut catalog, &pairs)?;
                catalog.save(&catalog_path)?;
                println!("\n✔ {}件を統合（袋 {}件を付け替え）", pairs.len(), moved);
            } else {
                println!("\n統合するには --apply を指定してください");
            }
        }

        Commands::Similarity { a, b } => {
            let score = name_similarity(&a, &b);
            println!("{:.3}", score);
            if score >= config.thresholds.name {
                println!("✔ 同じコーヒー名とみなします (閾値 {:.2})", config.thresholds.name);
            }
        }

        Commands::Normalize { names } => {
            for name in names {
                let mut terms: Vec<String> = extract_terms(&name).into_iter().collect();
                terms.sort();
                println!("{} → \"{}\" {:?}", name, normalize(&name), terms);
            }
        }

        Commands::Catalog { catalog } => {
            let catalog_path = config.resolve_catalog_path(catalog)?;
            let catalog = Catalog::load(&catalog_path)?;
            let stats = catalog.stats();

            println!("カタログ: {}", catalog_path.display());
            println!(
                "  ロースター {} / コーヒー {} / 袋 {}\n",
                stats.roasters, stats.coffees, stats.bags
            );
            for roaster in &catalog.roasters {
                println!("{} (#{})", roaster.name, roaster.id);
                for coffee in catalog.coffees_of(roaster.id) {
                    println!(
                        "  #{} {} [{}] 袋{}",
                        coffee.id,
                        coffee.descriptor.name,
                        coffee.descriptor.origin_country.as_deref().unwrap_or("-"),
                        catalog.bags_of(coffee.id).len()
                    );
                }
            }
        }

        Commands::Config {
            show,
            set_coffee_threshold,
            set_name_threshold,
            set_roaster_threshold,
            set_catalog,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(t) = set_coffee_threshold {
                config.thresholds.coffee = t;
                changed = true;
            }
            if let Some(t) = set_name_threshold {
                config.thresholds.name = t;
                changed = true;
            }
            if let Some(t) = set_roaster_threshold {
                config.thresholds.roaster = t;
                changed = true;
            }
            if let Some(path) = set_catalog {
                config.catalog_path = Some(path);
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  コーヒー照合の閾値: {:.2}", config.thresholds.coffee);
                println!("  名前照合の閾値: {:.2}", config.thresholds.name);
                println!("  ロースター照合の閾値: {:.2}", config.thresholds.roaster);
                println!("  カタログ: {}", config.resolve_catalog_path(None)?.display());
            }
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(error::CoffeeLogError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
