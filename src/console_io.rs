// ============================================
// src/console_io.rs
// コンソールへの表示と入力の読み取り
// ============================================

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use console::style;

use crate::error::ChoiceError;
use crate::quiz::{Grade, QUESTIONS_PER_SESSION, Question};
use crate::save_data::PlayerData;

const RESTART_PROMPT: &str = "Do you want to restart the quiz? (yes/no): ";
/// 統計表示で出す直近の記録数
const RECENT_SESSIONS: usize = 5;

/// 入力元と出力先をまとめたもの (テストでは Cursor と Vec を使う)
pub struct ConsoleIo<R, W> {
    input: R,
    output: W,
}

impl ConsoleIo<StdinLock<'static>, Stdout> {
    /// 標準入出力を使う
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleIo<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// プロンプトを出して1行読む。入力が終わっていれば None
    pub fn read_line_prompted(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    pub fn show_question(&mut self, question: &Question) -> io::Result<()> {
        writeln!(
            self.output,
            "\nWhat is the correct Katakana character for the romaji '{}'?",
            question.romaji
        )?;
        for (i, glyph) in question.options.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, glyph)?;
        }
        Ok(())
    }

    pub fn show_input_error(&mut self, err: &ChoiceError) -> io::Result<()> {
        writeln!(self.output, "{}", style(err).yellow())
    }

    pub fn show_grade(&mut self, grade: &Grade) -> io::Result<()> {
        match grade {
            Grade::Correct => writeln!(self.output, "{}", style("Correct!").green().bold()),
            Grade::Wrong {
                correct_glyph,
                correct_position,
            } => {
                let message = format!("Wrong! The correct answer was '{correct_glyph}'");
                writeln!(self.output, "{}", style(message).red())?;
                // 正解の選択肢に * を付けてもう一度表示
                writeln!(self.output, "{correct_position}. {correct_glyph} *")
            }
        }
    }

    pub fn show_score(&mut self, score: u32) -> io::Result<()> {
        writeln!(self.output, "Score: {score}/{QUESTIONS_PER_SESSION}")
    }

    pub fn show_final(&mut self, score: u32) -> io::Result<()> {
        writeln!(
            self.output,
            "Quiz Completed! Your final score is {score}/{QUESTIONS_PER_SESSION}"
        )
    }

    /// "yes" (大文字小文字を区別しない) のときだけ true
    pub fn ask_restart(&mut self) -> io::Result<bool> {
        let answer = self.read_line_prompted(RESTART_PROMPT)?;
        Ok(answer.is_some_and(|line| line.trim().eq_ignore_ascii_case("yes")))
    }

    pub fn farewell(&mut self) -> io::Result<()> {
        writeln!(self.output, "Thank you for playing!")
    }

    /// セーブデータの集計を表示する
    pub fn show_stats(&mut self, data: &PlayerData) -> io::Result<()> {
        writeln!(self.output, "Sessions played: {}", data.sessions_played)?;
        writeln!(
            self.output,
            "Best score: {}/{QUESTIONS_PER_SESSION}",
            data.best_score
        )?;
        writeln!(
            self.output,
            "Accuracy: {:.1}% ({}/{})",
            data.accuracy() * 100.0,
            data.total_correct,
            data.total_answered
        )?;

        if data.history.is_empty() {
            return Ok(());
        }
        writeln!(self.output, "Recent sessions:")?;
        for record in data.history.iter().rev().take(RECENT_SESSIONS) {
            write!(
                self.output,
                "  {}  {}/{}",
                record.timestamp.format("%Y-%m-%d %H:%M"),
                record.score,
                record.total
            )?;
            if !record.missed.is_empty() {
                write!(self.output, "  missed: {}", record.missed.join(", "))?;
            }
            writeln!(self.output)?;
        }
        Ok(())
    }
}
