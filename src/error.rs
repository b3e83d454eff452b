// ============================================
// src/error.rs
// エラー型の定義
// ============================================

use thiserror::Error;

/// 回答入力の検証エラー (SessionFinished 以外は再入力で回復する)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("Invalid input. Please enter a number.")]
    NotANumber,
    #[error("Invalid choice. Please select a number between {min} and {max}.")]
    OutOfRange { min: usize, max: usize },
    #[error("The quiz is already finished.")]
    SessionFinished,
}

/// クイズ進行中のエラー
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("character table needs at least {needed} entries, found {found}")]
    TableTooSmall { needed: usize, found: usize },
    #[error("session already finished; restart to ask more questions")]
    SessionFinished,
    #[error("input closed before an answer was given")]
    InputClosed,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// セーブデータの読み書きエラー
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
