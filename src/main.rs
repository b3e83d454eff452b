// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// `src/katakana.rs` をモジュールとして読み込む
mod katakana;
use katakana::KATAKANA_TABLE;

mod console_io;
use console_io::ConsoleIo;

mod error;
use error::QuizError;

mod quiz;
use quiz::{QUESTIONS_PER_SESSION, QuizEngine};

// セーブデータモジュール
mod save_data;
use save_data::PlayerData;

// --------------------------------------------------
// コマンドライン引数
// --------------------------------------------------

/// カタカナ → ローマ字の4択クイズ
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 乱数シード (同じ値なら同じ順番で出題される)
    #[arg(long)]
    seed: Option<u64>,

    /// セーブデータの保存先ディレクトリ
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// セーブデータを読み書きしない
    #[arg(long, conflicts_with = "data_dir")]
    no_save: bool,

    /// 保存済みの成績を表示して終了する
    #[arg(long)]
    stats: bool,
}

/// 引数を解決した実行設定
struct Settings {
    seed: Option<u64>,
    /// None ならセーブしない
    data_dir: Option<PathBuf>,
    stats_only: bool,
}

impl Settings {
    fn from_cli(cli: Cli) -> Self {
        let data_dir = if cli.no_save {
            None
        } else {
            cli.data_dir.or_else(PlayerData::default_data_dir)
        };
        Self {
            seed: cli.seed,
            data_dir,
            stats_only: cli.stats,
        }
    }
}

// --------------------------------------------------
// メイン関数
// --------------------------------------------------

fn main() -> ExitCode {
    init_tracing();
    let settings = Settings::from_cli(Cli::parse());

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// ログは標準エラーへ (RUST_LOG で変更可、既定は warn)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(settings: &Settings) -> Result<(), QuizError> {
    let mut player_data = settings
        .data_dir
        .as_deref()
        .map(PlayerData::load_from)
        .unwrap_or_default();
    let mut io = ConsoleIo::stdio();

    if settings.stats_only {
        io.show_stats(&player_data)?;
        return Ok(());
    }

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut engine = QuizEngine::new(KATAKANA_TABLE, rng)?;

    let mut score = engine.run_session(&mut io)?;
    loop {
        if player_data.record_session(score, QUESTIONS_PER_SESSION, engine.missed()) {
            info!(score, "new best score");
        }
        if let Some(dir) = settings.data_dir.as_deref() {
            // 保存に失敗してもクイズは続ける
            if let Err(err) = player_data.save_to(dir) {
                warn!(dir = %dir.display(), %err, "failed to save progress");
            }
        }

        if io.ask_restart()? {
            score = engine.restart(&mut io)?;
        } else {
            io.farewell()?;
            engine.terminate();
            info!(
                state = ?engine.state(),
                last_score = engine.session().score,
                sessions = player_data.sessions_played,
                "quiz terminated"
            );
            break;
        }
    }
    Ok(())
}
