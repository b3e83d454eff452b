// ============================================
// src/save_data.rs
// セーブデータの構造と読み書きロジック
// ============================================

use bincode::config::standard;
use bincode::{Decode, Encode};
use chrono::{DateTime, TimeZone, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::SaveError;

const SAVE_FILE_BIN: &str = "save_data.bin";
const SAVE_FILE_JSON: &str = "save_data.json"; // デバッグ用
/// 保存しておく履歴の最大件数
const HISTORY_LIMIT: usize = 100;

/// 1セッションごとの記録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub timestamp: DateTime<Utc>,
    pub score: u32,
    pub total: u32,
    /// 間違えたカタカナ (出題順)
    pub missed: Vec<String>,
}

/// bincode用の内部表現（DateTimeをi64に変換）
#[derive(Encode, Decode)]
struct QuizRecordBin {
    timestamp_secs: i64,
    score: u32,
    total: u32,
    missed: Vec<String>,
}

impl From<&QuizRecord> for QuizRecordBin {
    fn from(record: &QuizRecord) -> Self {
        Self {
            timestamp_secs: record.timestamp.timestamp(),
            score: record.score,
            total: record.total,
            missed: record.missed.clone(),
        }
    }
}

impl From<QuizRecordBin> for QuizRecord {
    fn from(bin: QuizRecordBin) -> Self {
        Self {
            timestamp: Utc
                .timestamp_opt(bin.timestamp_secs, 0)
                .single()
                .unwrap_or_default(),
            score: bin.score,
            total: bin.total,
            missed: bin.missed,
        }
    }
}

/// プレイヤーの成績データ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub sessions_played: u32,
    pub best_score: u32,
    pub total_correct: u32,
    pub total_answered: u32,
    /// 過去のセッション記録 (古い順)
    pub history: Vec<QuizRecord>,
}

/// bincode用の内部表現
#[derive(Encode, Decode)]
struct PlayerDataBin {
    sessions_played: u32,
    best_score: u32,
    total_correct: u32,
    total_answered: u32,
    history: Vec<QuizRecordBin>,
}

impl From<&PlayerData> for PlayerDataBin {
    fn from(data: &PlayerData) -> Self {
        Self {
            sessions_played: data.sessions_played,
            best_score: data.best_score,
            total_correct: data.total_correct,
            total_answered: data.total_answered,
            history: data.history.iter().map(QuizRecordBin::from).collect(),
        }
    }
}

impl From<PlayerDataBin> for PlayerData {
    fn from(bin: PlayerDataBin) -> Self {
        Self {
            sessions_played: bin.sessions_played,
            best_score: bin.best_score,
            total_correct: bin.total_correct,
            total_answered: bin.total_answered,
            history: bin.history.into_iter().map(QuizRecord::from).collect(),
        }
    }
}

impl PlayerData {
    // MARK:セーブファイルの置き場所を取得する関数
    pub fn default_data_dir() -> Option<PathBuf> {
        ProjectDirs::from("jp", "Fukumoto0141", "KATAQUIZ")
            .map(|proj_dirs| proj_dirs.data_dir().to_path_buf())
    }

    /// セッション結果を反映する。ベストスコア更新なら true
    pub fn record_session(&mut self, score: u32, total: u32, missed: &[&str]) -> bool {
        self.sessions_played += 1;
        self.total_correct += score;
        self.total_answered += total;

        let new_best = score > self.best_score;
        if new_best {
            self.best_score = score;
        }

        self.history.push(QuizRecord {
            timestamp: Utc::now(),
            score,
            total,
            missed: missed.iter().map(|glyph| glyph.to_string()).collect(),
        });
        // 古い記録から捨てる
        if self.history.len() > HISTORY_LIMIT {
            let overflow = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..overflow);
        }
        new_best
    }

    /// 正答率 (0.0 - 1.0)
    pub fn accuracy(&self) -> f64 {
        if self.total_answered == 0 {
            return 0.0;
        }
        self.total_correct as f64 / self.total_answered as f64
    }

    /// MARK:データをファイルに保存する (バイナリ + JSON)
    pub fn save_to(&self, dir: &Path) -> Result<(), SaveError> {
        // ディレクトリがまだなければ作成する
        fs::create_dir_all(dir)?;

        // --- 1. バイナリ形式で保存 (本番用) ---
        let encoded = bincode::encode_to_vec(PlayerDataBin::from(self), standard())?;
        let mut writer = BufWriter::new(File::create(dir.join(SAVE_FILE_BIN))?);
        writer.write_all(&encoded)?;
        writer.flush()?;

        // --- 2. JSON形式で保存 (デバッグ用) ---
        let json = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(SAVE_FILE_JSON), json)?;

        debug!(dir = %dir.display(), sessions = self.sessions_played, "save data written");
        Ok(())
    }

    /// MARK:ファイルからデータを読み込む (バイナリ優先、JSONフォールバック)
    pub fn load_from(dir: &Path) -> Self {
        let bin_path = dir.join(SAVE_FILE_BIN);
        if bin_path.exists() {
            match Self::read_bin(&bin_path) {
                Ok(data) => return data,
                Err(err) => warn!(path = %bin_path.display(), %err, "binary save data unreadable"),
            }
        }

        let json_path = dir.join(SAVE_FILE_JSON);
        if json_path.exists() {
            match Self::read_json(&json_path) {
                Ok(data) => return data,
                Err(err) => warn!(path = %json_path.display(), %err, "JSON save data unreadable"),
            }
        }

        // どちらも失敗した場合はデフォルト
        Self::default()
    }

    fn read_bin(path: &Path) -> Result<Self, SaveError> {
        let buffer = fs::read(path)?;
        let (bin_data, _) = bincode::decode_from_slice::<PlayerDataBin, _>(&buffer, standard())?;
        Ok(PlayerData::from(bin_data))
    }

    fn read_json(path: &Path) -> Result<Self, SaveError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
