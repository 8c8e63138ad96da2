//! カタログスナップショット
//!
//! ロースター・コーヒー・袋をJSONファイルに保持する。
//! 取り込み済みファイルの冪等キーも合わせて記録する。

mod types;

pub use types::{Bag, CatalogStats, Coffee, Roaster};

use crate::error::{CoffeeLogError, Result};
use chrono::{NaiveDate, Utc};
use coffee_log_common::{name_similarity, CoffeeDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 次に払い出すID（全エンティティ共通）
    next_id: u64,
    #[serde(default)]
    pub roasters: Vec<Roaster>,
    #[serde(default)]
    pub coffees: Vec<Coffee>,
    #[serde(default)]
    pub bags: Vec<Bag>,
    #[serde(default)]
    ingested_keys: BTreeSet<String>,
}

impl Catalog {
    const CURRENT_VERSION: u32 = 1;

    /// カタログファイルを読み込み
    ///
    /// ファイルがなければ空のカタログ。壊れている場合はエラー（黙って捨てない）。
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("カタログなし、新規作成: {}", path.display());
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let catalog: Catalog = serde_json::from_reader(reader)
            .map_err(|e| CoffeeLogError::InvalidCatalog(format!("{}: {}", path.display(), e)))?;

        if catalog.version != Self::CURRENT_VERSION {
            return Err(CoffeeLogError::InvalidCatalog(format!(
                "未対応のバージョン {} (対応: {})",
                catalog.version,
                Self::CURRENT_VERSION
            )));
        }

        Ok(catalog)
    }

    /// カタログファイルを保存
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_roaster(&mut self, name: &str) -> u64 {
        let id = self.allocate_id();
        self.roasters.push(Roaster {
            id,
            name: name.trim().to_string(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn add_coffee(
        &mut self,
        roaster_id: u64,
        descriptor: CoffeeDescriptor,
        roast_level: Option<String>,
        tasting_notes: &[String],
    ) -> Result<u64> {
        if self.roaster(roaster_id).is_none() {
            return Err(CoffeeLogError::RoasterNotFound(roaster_id));
        }

        let id = self.allocate_id();
        let mut coffee = Coffee {
            id,
            roaster_id,
            descriptor,
            roast_level,
            tasting_notes: Vec::new(),
            created_at: Utc::now(),
        };
        coffee.add_tasting_notes(tasting_notes);
        self.coffees.push(coffee);
        Ok(id)
    }

    pub fn add_bag(
        &mut self,
        coffee_id: u64,
        roast_date: Option<NaiveDate>,
        weight_grams: Option<f64>,
        source_key: &str,
    ) -> Result<u64> {
        if self.coffee(coffee_id).is_none() {
            return Err(CoffeeLogError::CoffeeNotFound(coffee_id));
        }

        let id = self.allocate_id();
        self.bags.push(Bag {
            id,
            coffee_id,
            roast_date,
            weight_grams,
            source_key: source_key.to_string(),
            added_at: Utc::now(),
        });
        Ok(id)
    }

    pub fn roaster(&self, id: u64) -> Option<&Roaster> {
        self.roasters.iter().find(|r| r.id == id)
    }

    pub fn coffee(&self, id: u64) -> Option<&Coffee> {
        self.coffees.iter().find(|c| c.id == id)
    }

    pub fn coffee_mut(&mut self, id: u64) -> Option<&mut Coffee> {
        self.coffees.iter_mut().find(|c| c.id == id)
    }

    /// ロースターのコーヒー（作成順）
    pub fn coffees_of(&self, roaster_id: u64) -> Vec<&Coffee> {
        let mut coffees: Vec<&Coffee> = self
            .coffees
            .iter()
            .filter(|c| c.roaster_id == roaster_id)
            .collect();
        coffees.sort_by_key(|c| c.id);
        coffees
    }

    /// 照合用にIDと記述を並べて取り出す（作成順）
    pub fn descriptors_of(&self, roaster_id: u64) -> (Vec<u64>, Vec<CoffeeDescriptor>) {
        self.coffees_of(roaster_id)
            .into_iter()
            .map(|c| (c.id, c.descriptor.clone()))
            .unzip()
    }

    pub fn bags_of(&self, coffee_id: u64) -> Vec<&Bag> {
        self.bags.iter().filter(|b| b.coffee_id == coffee_id).collect()
    }

    /// ロースターを名前で探す
    ///
    /// 大文字小文字を無視した完全一致を優先し、なければ名前類似度が
    /// `threshold` 以上で最も高いもの（同点は先に登録された方）。
    pub fn find_roaster_by_name(&self, name: &str, threshold: f64) -> Option<&Roaster> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        if let Some(exact) = self
            .roasters
            .iter()
            .find(|r| r.name.trim().to_lowercase() == wanted)
        {
            return Some(exact);
        }

        let mut best: Option<(&Roaster, f64)> = None;
        for roaster in &self.roasters {
            let score = name_similarity(name, &roaster.name);
            if score >= threshold && best.map_or(true, |(_, s)| score > s) {
                best = Some((roaster, score));
            }
        }

        if let Some((roaster, score)) = best {
            debug!("ロースター類似一致: {} → {} ({:.2})", name, roaster.name, score);
        }
        best.map(|(roaster, _)| roaster)
    }

    pub fn is_ingested(&self, key: &str) -> bool {
        self.ingested_keys.contains(key)
    }

    pub fn mark_ingested(&mut self, key: &str) {
        self.ingested_keys.insert(key.to_string());
    }

    /// 重複コーヒーを統合する
    ///
    /// `duplicate` の袋を `keep` に付け替え、空いている特徴を補ってから
    /// `duplicate` を削除する。付け替えた袋の数を返す。
    pub fn merge_coffee(&mut self, keep: u64, duplicate: u64) -> Result<usize> {
        if keep == duplicate {
            return Ok(0);
        }

        let dup_index = self
            .coffees
            .iter()
            .position(|c| c.id == duplicate)
            .ok_or(CoffeeLogError::CoffeeNotFound(duplicate))?;
        if self.coffee(keep).is_none() {
            return Err(CoffeeLogError::CoffeeNotFound(keep));
        }

        let removed = self.coffees.remove(dup_index);
        if let Some(target) = self.coffee_mut(keep) {
            target.absorb(&removed.descriptor);
            target.add_tasting_notes(&removed.tasting_notes);
            if target.roast_level.is_none() {
                target.roast_level = removed.roast_level;
            }
        }

        let mut moved = 0;
        for bag in self.bags.iter_mut().filter(|b| b.coffee_id == duplicate) {
            bag.coffee_id = keep;
            moved += 1;
        }
        Ok(moved)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            roasters: self.roasters.len(),
            coffees: self.coffees.len(),
            bags: self.bags.len(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            next_id: 1,
            roasters: Vec::new(),
            coffees: Vec::new(),
            bags: Vec::new(),
            ingested_keys: BTreeSet::new(),
        }
    }
}
