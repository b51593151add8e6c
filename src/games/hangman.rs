//! A single shared hangman board.
//!
//! There is one game at a time for the whole world; anyone can start a word,
//! anyone can guess. Seven wrong guesses lose the board.

use rand::Rng;

const MAX_WRONG: u8 = 7;

/// Words the board falls back to when a game is started without one.
const STOCK_WORDS: &[&str] = &[
    "lantern", "ember", "citadel", "whisper", "marble", "griffin", "harvest",
];

/// Result of playing a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Letter accepted; the game continues.
    Continue,
    /// Letter rejected: reused, out of range, or no game running.
    Rejected,
    /// That guess completed the word.
    Win,
    /// That guess used the last life.
    Loss,
}

/// The shared board state.
#[derive(Debug, Default)]
pub struct Hangman {
    word: String,
    used: [bool; 26],
    wrong: u8,
    ended: bool,
    started: bool,
}

impl Hangman {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new game. An empty word draws from the stock list.
    pub fn start(&mut self, word: &str, rng: &mut impl Rng) {
        let word = word.trim().to_lowercase();
        self.word = if word.chars().all(|c| c.is_ascii_lowercase()) && !word.is_empty() {
            word
        } else {
            STOCK_WORDS[rng.gen_range(0..STOCK_WORDS.len())].to_string()
        };
        self.used = [false; 26];
        self.wrong = 0;
        self.ended = false;
        self.started = true;
    }

    pub fn in_progress(&self) -> bool {
        self.started && !self.ended
    }

    /// Guess a letter.
    pub fn try_letter(&mut self, letter: char) -> GuessOutcome {
        if !self.in_progress() || !letter.is_ascii_lowercase() {
            return GuessOutcome::Rejected;
        }
        let idx = (letter as u8 - b'a') as usize;
        if self.used[idx] {
            return GuessOutcome::Rejected;
        }
        self.used[idx] = true;

        if !self.word.contains(letter) {
            self.wrong += 1;
            if self.wrong >= MAX_WRONG {
                self.ended = true;
                return GuessOutcome::Loss;
            }
            return GuessOutcome::Continue;
        }

        if self.is_solved() {
            self.ended = true;
            GuessOutcome::Win
        } else {
            GuessOutcome::Continue
        }
    }

    fn is_solved(&self) -> bool {
        self.word
            .bytes()
            .all(|b| self.used[(b - b'a') as usize])
    }

    /// The gallows drawing, revealed letters, and used-letter list.
    pub fn status(&self) -> String {
        if !self.started {
            return "No hangman game yet. Try \"hangman start <word>\".\n\r".to_string();
        }

        let mut out = String::from("Mystery Word: ");
        for b in self.word.bytes() {
            if self.used[(b - b'a') as usize] {
                out.push_str(&format!(" {} ", b as char));
            } else {
                out.push_str(" _ ");
            }
        }
        out.push_str("\n\r");

        let w = self.wrong;
        let at = |n: u8, c: char| if w > n { c } else { ' ' };
        out.push_str("       _________________\n\r");
        out.push_str("       |               |\n\r");
        out.push_str(&format!("       |               {}\n\r", at(0, 'O')));
        out.push_str(&format!(
            "       |              {}{}{}\n\r",
            at(1, '\\'),
            at(2, '|'),
            at(3, '/')
        ));
        out.push_str(&format!("       |               {}\n\r", at(4, '|')));
        out.push_str(&format!(
            "   ____|____          {} {}\n\r",
            at(5, '/'),
            at(6, '\\')
        ));
        out.push_str("  /         \\\n\r");
        out.push_str(" /           \\\n\r");

        out.push_str("Letters Used: ");
        for i in 0..26u8 {
            if self.used[i as usize] {
                out.push_str(&format!("{} ", (b'a' + i) as char));
            }
        }
        out
    }
}
