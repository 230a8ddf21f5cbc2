//! セーブ/ロード機能。[`SaveStore`] 経由でゲーム状態を読み書きする。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 全スナップショットに書き込む。フィールド追加時にインクリメントする。
//! - 旧バージョンや一部欠けたスナップショットは、フィールド単位で新規ゲームの
//!   デフォルト値に上書きマージする（各 state 構造体の `#[serde(default)]`）。
//!   フィールド追加だけなら既存セーブは無効にならない。
//! - 整数フィールドは `3.0` のような整数値の浮動小数も受け付ける。
//! - 未知のフィールドは無視する。
//! - JSON として壊れている、または構造が合わないデータは破棄して新規開始する。

use thiserror::Error;

use crate::config::{PRESTIGE_DISCOUNT_CAP, SAVE_VERSION, STORAGE_KEY};
use crate::logging;

use super::catalog::{Catalog, EffectType};
use super::stage::{FIRST_STAGE, TOTAL_STAGES};
use super::state::{GameState, Resource};
use super::storage::{SaveStore, StorageError};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// スナップショットを JSON にシリアライズする。
pub fn encode(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// スナップショットをパースする。欠けたフィールドは新規ゲームの値で補完。
/// 構造の合わないデータは None。
pub fn decode(json: &str, catalog: &Catalog) -> Option<GameState> {
    let mut state: GameState = match serde_json::from_str(json) {
        Ok(s) => s,
        Err(e) => {
            logging::warn(&format!("save data unreadable, discarding: {e}"));
            return None;
        }
    };
    if state.version != SAVE_VERSION {
        logging::info(&format!(
            "migrating save data (saved={}, current={})",
            state.version, SAVE_VERSION
        ));
        state.version = SAVE_VERSION.to_string();
    }
    sanitize(&mut state, catalog);
    Some(state)
}

/// 読み込んだ状態を不変条件の範囲に戻す。正常な状態はそのまま。
fn sanitize(state: &mut GameState, catalog: &Catalog) {
    state.current_stage = state.current_stage.clamp(FIRST_STAGE, TOTAL_STAGES);

    for &resource in Resource::all() {
        let slot = state.resources.get_mut(resource);
        if !slot.is_finite() || *slot < 0.0 {
            *slot = 0.0;
        }
    }

    for (id, count) in state.upgrades.iter_mut() {
        if let Some(max) = catalog.get(id).and_then(|u| u.max_purchases) {
            *count = (*count).min(max);
        }
    }
    state.upgrades.retain(|_, count| *count > 0);

    // 解放アップグレードを所持していればプレステージは解放済み（旧セーブにはフラグがない）
    let owns_unlock = catalog
        .iter()
        .filter(|u| u.effect_type == EffectType::UnlockPrestige)
        .any(|u| state.purchase_count(&u.id) > 0);
    if owns_unlock {
        state.prestige_unlocked = true;
    }

    let stats = &mut state.statistics;
    for value in [&mut stats.total_earned, &mut stats.play_time] {
        if !value.is_finite() || *value < 0.0 {
            *value = 0.0;
        }
    }

    let bonuses = &mut state.prestige.permanent_bonuses;
    if !bonuses.production_multiplier.is_finite() || bonuses.production_multiplier < 1.0 {
        bonuses.production_multiplier = 1.0;
    }
    if !bonuses.cost_reduction.is_finite() {
        bonuses.cost_reduction = 0.0;
    }
    bonuses.cost_reduction = bonuses.cost_reduction.clamp(0.0, PRESTIGE_DISCOUNT_CAP);

    if !state.last_save_time.is_finite() || state.last_save_time < 0.0 {
        state.last_save_time = 0.0;
    }
}

/// セーブスロットを上書きする。`last_save_time` には書き込み時の `now` を入れる。
pub fn save_game(store: &mut dyn SaveStore, state: &mut GameState, now: f64) -> Result<(), SaveError> {
    state.last_save_time = now;
    state.version = SAVE_VERSION.to_string();
    let json = encode(state)?;
    store.set(STORAGE_KEY, &json)?;
    Ok(())
}

/// セーブスロットを読む。ストレージ障害も破損データも「セーブなし」扱い。
/// 破損データは毎回読み直さないよう削除する。
pub fn load_game(store: &mut dyn SaveStore, catalog: &Catalog) -> Option<GameState> {
    let json = match store.get(STORAGE_KEY) {
        Ok(Some(j)) => j,
        Ok(None) => return None,
        Err(e) => {
            logging::warn(&format!("could not read save: {e}"));
            return None;
        }
    };

    let state = decode(&json, catalog);
    if state.is_none() {
        if let Err(e) = store.remove(STORAGE_KEY) {
            logging::warn(&format!("could not discard corrupt save: {e}"));
        }
    }
    state
}

/// セーブスロットを削除する（ハードリセット用）。
pub fn clear_save(store: &mut dyn SaveStore) {
    if let Err(e) = store.remove(STORAGE_KEY) {
        logging::warn(&format!("could not clear save: {e}"));
    }
}
