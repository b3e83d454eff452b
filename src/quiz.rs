// ============================================
// src/quiz.rs
// 出題・採点・リスタートの進行ロジック
// ============================================

use std::io::{BufRead, Write};

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{debug, info};

use crate::console_io::ConsoleIo;
use crate::error::{ChoiceError, QuizError};
use crate::katakana::{Kana, glyph_for_romaji};

/// 1セッションあたりの問題数
pub const QUESTIONS_PER_SESSION: u32 = 10;
/// 選択肢の数 (正解1 + ダミー3)
pub const OPTION_COUNT: usize = 4;

const ANSWER_PROMPT: &str = "Enter the number of your choice: ";

// --------------------------------------------------
// データ構造
// --------------------------------------------------

/// 1問分の出題内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub romaji: &'static str,
    pub correct: &'static str,
    /// 表示順の選択肢 (正解をちょうど1つ含む)
    pub options: Vec<&'static str>,
}

impl Question {
    /// 表の中からランダムに1問作る
    pub fn generate<R: Rng + ?Sized>(table: &[Kana], rng: &mut R) -> Result<Self, QuizError> {
        ensure_table_size(table)?;

        let romaji_list: Vec<&'static str> = table.iter().map(|kana| kana.romaji).collect();
        let too_small = || QuizError::TableTooSmall {
            needed: OPTION_COUNT,
            found: table.len(),
        };
        let romaji = *romaji_list.choose(rng).ok_or_else(too_small)?;
        let correct = glyph_for_romaji(table, romaji).ok_or_else(too_small)?;

        Ok(Self {
            romaji,
            correct,
            options: build_options(table, correct, rng),
        })
    }

    /// 正解が何番目に表示されているか (1始まり)
    pub fn correct_position(&self) -> usize {
        self.options
            .iter()
            .position(|glyph| *glyph == self.correct)
            .map_or(0, |idx| idx + 1)
    }
}

/// 正解 + 重複なしのダミー3つをシャッフルして返す
pub fn build_options<R: Rng + ?Sized>(
    table: &[Kana],
    correct: &'static str,
    rng: &mut R,
) -> Vec<&'static str> {
    let mut others: Vec<&'static str> = table
        .iter()
        .map(|kana| kana.glyph)
        .filter(|glyph| *glyph != correct)
        .collect();
    others.shuffle(rng);

    let mut options = Vec::with_capacity(OPTION_COUNT);
    options.push(correct);
    options.extend(others.into_iter().take(OPTION_COUNT - 1));
    options.shuffle(rng);
    options
}

/// 入力文字列を選択肢番号に変換する (1..=option_count)
pub fn parse_choice(input: &str, option_count: usize) -> Result<usize, ChoiceError> {
    let value: i64 = input.trim().parse().map_err(|_| ChoiceError::NotANumber)?;
    let out_of_range = ChoiceError::OutOfRange {
        min: 1,
        max: option_count,
    };
    let choice = usize::try_from(value).map_err(|_| out_of_range.clone())?;
    if (1..=option_count).contains(&choice) {
        Ok(choice)
    } else {
        Err(out_of_range)
    }
}

/// 採点結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grade {
    Correct,
    Wrong {
        correct_glyph: &'static str,
        correct_position: usize,
    },
}

/// セッションの状態 (スコアと進捗)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSession {
    pub score: u32,
    pub question_index: u32,
    pub finished: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuizState {
    NotStarted,
    Asking,
    Grading,
    Finished,
    Terminated,
}

// --------------------------------------------------
// クイズ本体
// --------------------------------------------------

pub struct QuizEngine<R> {
    table: &'static [Kana],
    rng: R,
    session: QuizSession,
    state: QuizState,
    /// 今回のセッションで間違えた文字
    missed: Vec<&'static str>,
}

impl<R: Rng> QuizEngine<R> {
    pub fn new(table: &'static [Kana], rng: R) -> Result<Self, QuizError> {
        ensure_table_size(table)?;
        Ok(Self {
            table,
            rng,
            session: QuizSession::default(),
            state: QuizState::NotStarted,
            missed: Vec::new(),
        })
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn missed(&self) -> &[&'static str] {
        &self.missed
    }

    /// 次の問題を作る。終了したセッションでは restart が必要
    pub fn pick_question(&mut self) -> Result<Question, QuizError> {
        if self.session.finished {
            return Err(QuizError::SessionFinished);
        }
        let question = Question::generate(self.table, &mut self.rng)?;
        self.state = QuizState::Asking;
        debug!(
            romaji = question.romaji,
            correct = question.correct,
            options = ?question.options,
            "question picked"
        );
        Ok(question)
    }

    /// 回答を検証して採点する。不正な入力ではセッションを進めない
    pub fn submit_answer(&mut self, question: &Question, input: &str) -> Result<Grade, ChoiceError> {
        if self.session.finished {
            return Err(ChoiceError::SessionFinished);
        }
        let choice = parse_choice(input, question.options.len())?;
        self.state = QuizState::Grading;

        let grade = if question.options[choice - 1] == question.correct {
            self.session.score += 1;
            Grade::Correct
        } else {
            self.missed.push(question.correct);
            Grade::Wrong {
                correct_glyph: question.correct,
                correct_position: question.correct_position(),
            }
        };

        self.session.question_index += 1;
        if self.session.question_index >= QUESTIONS_PER_SESSION {
            self.session.finished = true;
            self.state = QuizState::Finished;
        }
        Ok(grade)
    }

    /// 10問出題して最終スコアを返す
    pub fn run_session<I: BufRead, W: Write>(
        &mut self,
        io: &mut ConsoleIo<I, W>,
    ) -> Result<u32, QuizError> {
        // 終了済みなら何も表示しない
        if self.session.finished {
            return Ok(self.session.score);
        }

        while !self.session.finished {
            let question = self.pick_question()?;
            io.show_question(&question)?;

            // 正しい番号が入力されるまで聞き直す
            let grade = loop {
                let Some(line) = io.read_line_prompted(ANSWER_PROMPT)? else {
                    return Err(QuizError::InputClosed);
                };
                match self.submit_answer(&question, &line) {
                    Ok(grade) => break grade,
                    Err(err) => {
                        debug!(input = line.trim(), %err, "answer rejected");
                        io.show_input_error(&err)?;
                    }
                }
            };

            io.show_grade(&grade)?;
            io.show_score(self.session.score)?;
        }

        io.show_final(self.session.score)?;
        info!(score = self.session.score, missed = ?self.missed, "session finished");
        Ok(self.session.score)
    }

    /// スコアをリセットしてもう一度セッションを始める
    pub fn restart<I: BufRead, W: Write>(
        &mut self,
        io: &mut ConsoleIo<I, W>,
    ) -> Result<u32, QuizError> {
        self.reset();
        self.run_session(io)
    }

    pub fn terminate(&mut self) {
        self.state = QuizState::Terminated;
    }

    fn reset(&mut self) {
        self.session = QuizSession::default();
        self.missed.clear();
        self.state = QuizState::NotStarted;
    }
}

fn ensure_table_size(table: &[Kana]) -> Result<(), QuizError> {
    if table.len() < OPTION_COUNT {
        return Err(QuizError::TableTooSmall {
            needed: OPTION_COUNT,
            found: table.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::katakana::KATAKANA_TABLE;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use std::io::Cursor;

    fn engine(seed: u64) -> QuizEngine<StdRng> {
        QuizEngine::new(KATAKANA_TABLE, StdRng::seed_from_u64(seed)).unwrap()
    }

    fn console(input: &str) -> ConsoleIo<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleIo::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output_of(io: ConsoleIo<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(io.into_output()).unwrap()
    }

    #[test]
    fn options_are_four_distinct_with_one_correct() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let q = Question::generate(KATAKANA_TABLE, &mut rng).unwrap();
            assert_eq!(q.options.len(), OPTION_COUNT);
            let distinct: HashSet<_> = q.options.iter().collect();
            assert_eq!(distinct.len(), OPTION_COUNT);
            assert_eq!(q.options.iter().filter(|g| **g == q.correct).count(), 1);
            assert_eq!(glyph_for_romaji(KATAKANA_TABLE, q.romaji), Some(q.correct));
        }
    }

    #[test]
    fn distractors_never_repeat_the_correct_glyph() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let options = build_options(KATAKANA_TABLE, "ア", &mut rng);
            assert_eq!(options.iter().filter(|g| **g == "ア").count(), 1);
        }
    }

    #[test]
    fn correct_glyph_appears_in_every_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let positions: HashSet<usize> = (0..200)
            .map(|_| Question::generate(KATAKANA_TABLE, &mut rng).unwrap().correct_position())
            .collect();
        assert_eq!(positions, HashSet::from([1, 2, 3, 4]));
    }

    #[test]
    fn tiny_table_is_rejected() {
        const TINY: &[Kana] = &[
            Kana { glyph: "ア", romaji: "a" },
            Kana { glyph: "イ", romaji: "i" },
        ];
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            Question::generate(TINY, &mut rng),
            Err(QuizError::TableTooSmall { needed: 4, found: 2 })
        ));
        assert!(QuizEngine::new(&[], StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn parse_choice_accepts_only_one_to_four() {
        assert_eq!(parse_choice("2", 4), Ok(2));
        assert_eq!(parse_choice("  4 \n", 4), Ok(4));
        assert_eq!(parse_choice("abc", 4), Err(ChoiceError::NotANumber));
        assert_eq!(parse_choice("", 4), Err(ChoiceError::NotANumber));
        assert_eq!(
            parse_choice("0", 4),
            Err(ChoiceError::OutOfRange { min: 1, max: 4 })
        );
        assert_eq!(
            parse_choice("-1", 4),
            Err(ChoiceError::OutOfRange { min: 1, max: 4 })
        );
        assert_eq!(
            parse_choice("5", 4),
            Err(ChoiceError::OutOfRange { min: 1, max: 4 })
        );
    }

    #[test]
    fn invalid_answer_does_not_advance() {
        let mut engine = engine(1);
        let q = engine.pick_question().unwrap();
        assert!(engine.submit_answer(&q, "abc").is_err());
        assert!(engine.submit_answer(&q, "9").is_err());
        assert_eq!(engine.session(), &QuizSession::default());
        assert_eq!(engine.state(), QuizState::Asking);
    }

    #[test]
    fn correct_and_wrong_answers_are_graded() {
        let mut engine = engine(2);
        let q = engine.pick_question().unwrap();
        let right = q.correct_position();
        let wrong = if right == 1 { 2 } else { 1 };

        assert_eq!(engine.submit_answer(&q, &right.to_string()), Ok(Grade::Correct));
        assert_eq!(engine.session().score, 1);
        assert_eq!(engine.session().question_index, 1);

        assert_eq!(
            engine.submit_answer(&q, &wrong.to_string()),
            Ok(Grade::Wrong {
                correct_glyph: q.correct,
                correct_position: right,
            })
        );
        assert_eq!(engine.session().score, 1);
        assert_eq!(engine.session().question_index, 2);
        assert_eq!(engine.missed(), &[q.correct]);
    }

    #[test]
    fn score_is_monotonic_and_bounded() {
        let mut engine = engine(9);
        let mut rng = StdRng::seed_from_u64(99);
        let mut last_score = 0;
        while !engine.session().finished {
            let q = engine.pick_question().unwrap();
            let before = engine.session().question_index;
            let choice = rng.random_range(1..=OPTION_COUNT);
            engine.submit_answer(&q, &choice.to_string()).unwrap();

            let session = engine.session();
            assert_eq!(session.question_index, before + 1);
            assert!(session.score == last_score || session.score == last_score + 1);
            assert!(session.score <= session.question_index);
            last_score = session.score;
        }
        assert_eq!(engine.session().question_index, QUESTIONS_PER_SESSION);
        assert_eq!(engine.state(), QuizState::Finished);
    }

    #[test]
    fn session_asks_exactly_ten_questions() {
        let mut engine = engine(5);
        let mut io = console(&"1\n".repeat(10));
        let score = engine.run_session(&mut io).unwrap();

        assert!(score <= QUESTIONS_PER_SESSION);
        assert!(engine.session().finished);
        let out = output_of(io);
        assert_eq!(out.matches("What is the correct Katakana character").count(), 10);
        assert_eq!(out.matches("Score: ").count(), 10);
        assert!(out.contains(&format!("Quiz Completed! Your final score is {score}/10")));
    }

    #[test]
    fn bad_input_is_reprompted() {
        let mut engine = engine(6);
        let input = format!("abc\n2\n{}", "1\n".repeat(9));
        let mut io = console(&input);
        engine.run_session(&mut io).unwrap();

        let out = output_of(io);
        assert_eq!(out.matches("Invalid input. Please enter a number.").count(), 1);
        assert_eq!(out.matches(ANSWER_PROMPT).count(), 11);
        assert_eq!(engine.session().question_index, 10);
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut engine = engine(8);
        let mut io = console("1\n1\n");
        assert!(matches!(
            engine.run_session(&mut io),
            Err(QuizError::InputClosed)
        ));
        assert_eq!(engine.session().question_index, 2);
    }

    #[test]
    fn restart_runs_a_fresh_session() {
        let mut engine = engine(4);
        let mut io = console(&"1\n".repeat(20));
        engine.run_session(&mut io).unwrap();
        assert_eq!(engine.state(), QuizState::Finished);

        let score = engine.restart(&mut io).unwrap();
        assert_eq!(engine.session().question_index, 10);
        assert_eq!(engine.session().score, score);
        assert!(score <= QUESTIONS_PER_SESSION);
        assert!(engine.session().finished);
        let out = output_of(io);
        assert_eq!(out.matches("What is the correct Katakana character").count(), 20);
        assert_eq!(out.matches("Quiz Completed!").count(), 2);
    }

    #[test]
    fn restart_clears_score_and_progress() {
        let mut engine = engine(11);
        let mut io = console(&"1\n".repeat(10));
        engine.run_session(&mut io).unwrap();
        assert_eq!(engine.session().question_index, 10);

        // 入力が尽きた状態で restart すると最初の問題で止まる
        assert!(matches!(
            engine.restart(&mut io),
            Err(QuizError::InputClosed)
        ));
        assert_eq!(engine.session(), &QuizSession::default());
        assert!(engine.missed().is_empty());
        assert_eq!(engine.state(), QuizState::Asking);
    }

    #[test]
    fn finished_session_rejects_more_questions() {
        let mut engine = engine(12);
        let mut io = console(&"3\n".repeat(10));
        let score = engine.run_session(&mut io).unwrap();
        let question = Question::generate(KATAKANA_TABLE, &mut StdRng::seed_from_u64(1)).unwrap();

        for _ in 0..5 {
            assert!(matches!(
                engine.pick_question(),
                Err(QuizError::SessionFinished)
            ));
            assert_eq!(
                engine.submit_answer(&question, &question.correct_position().to_string()),
                Err(ChoiceError::SessionFinished)
            );
        }
        assert_eq!(engine.session().question_index, QUESTIONS_PER_SESSION);
        assert_eq!(engine.session().score, score);
        assert_eq!(engine.state(), QuizState::Finished);
    }

    #[test]
    fn finished_session_does_not_ask_again() {
        let mut engine = engine(10);
        let mut io = console(&"2\n".repeat(10));
        let first = engine.run_session(&mut io).unwrap();
        assert_eq!(engine.run_session(&mut io).unwrap(), first);
        assert_eq!(engine.session().question_index, 10);

        let out = output_of(io);
        assert_eq!(out.matches("What is the correct Katakana character").count(), 10);
        assert_eq!(out.matches("Quiz Completed!").count(), 1);

        engine.terminate();
        assert_eq!(engine.state(), QuizState::Terminated);
    }
}
