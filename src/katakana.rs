/*
 * src/katakana.rs
 * カタカナとローマ字の対応表を管理するモジュール
 */

/// カタカナ1文字とそのローマ字
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Kana {
    pub glyph: &'static str,  // 表示用 (カタカナ)
    pub romaji: &'static str, // 出題用 (ローマ字)
}

/// 清音 46 文字 (五十音順)
pub const KATAKANA_TABLE: &[Kana] = &[
    // ア行
    Kana { glyph: "ア", romaji: "a" },
    Kana { glyph: "イ", romaji: "i" },
    Kana { glyph: "ウ", romaji: "u" },
    Kana { glyph: "エ", romaji: "e" },
    Kana { glyph: "オ", romaji: "o" },

    // カ行
    Kana { glyph: "カ", romaji: "ka" },
    Kana { glyph: "キ", romaji: "ki" },
    Kana { glyph: "ク", romaji: "ku" },
    Kana { glyph: "ケ", romaji: "ke" },
    Kana { glyph: "コ", romaji: "ko" },

    // サ行
    Kana { glyph: "サ", romaji: "sa" },
    Kana { glyph: "シ", romaji: "shi" },
    Kana { glyph: "ス", romaji: "su" },
    Kana { glyph: "セ", romaji: "se" },
    Kana { glyph: "ソ", romaji: "so" },

    // タ行
    Kana { glyph: "タ", romaji: "ta" },
    Kana { glyph: "チ", romaji: "chi" },
    Kana { glyph: "ツ", romaji: "tsu" },
    Kana { glyph: "テ", romaji: "te" },
    Kana { glyph: "ト", romaji: "to" },

    // ナ行
    Kana { glyph: "ナ", romaji: "na" },
    Kana { glyph: "ニ", romaji: "ni" },
    Kana { glyph: "ヌ", romaji: "nu" },
    Kana { glyph: "ネ", romaji: "ne" },
    Kana { glyph: "ノ", romaji: "no" },

    // ハ行
    Kana { glyph: "ハ", romaji: "ha" },
    Kana { glyph: "ヒ", romaji: "hi" },
    Kana { glyph: "フ", romaji: "fu" },
    Kana { glyph: "ヘ", romaji: "he" },
    Kana { glyph: "ホ", romaji: "ho" },

    // マ行
    Kana { glyph: "マ", romaji: "ma" },
    Kana { glyph: "ミ", romaji: "mi" },
    Kana { glyph: "ム", romaji: "mu" },
    Kana { glyph: "メ", romaji: "me" },
    Kana { glyph: "モ", romaji: "mo" },

    // ヤ行
    Kana { glyph: "ヤ", romaji: "ya" },
    Kana { glyph: "ユ", romaji: "yu" },
    Kana { glyph: "ヨ", romaji: "yo" },

    // ラ行
    Kana { glyph: "ラ", romaji: "ra" },
    Kana { glyph: "リ", romaji: "ri" },
    Kana { glyph: "ル", romaji: "ru" },
    Kana { glyph: "レ", romaji: "re" },
    Kana { glyph: "ロ", romaji: "ro" },

    // ワ行
    Kana { glyph: "ワ", romaji: "wa" },
    Kana { glyph: "ヲ", romaji: "wo" },
    Kana { glyph: "ン", romaji: "n" },
];

/// ローマ字からカタカナを逆引きする (ローマ字は表の中で一意)
pub fn glyph_for_romaji(table: &[Kana], romaji: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|kana| kana.romaji == romaji)
        .map(|kana| kana.glyph)
}
