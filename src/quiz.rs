//! Powerup quiz
//!
//! Collecting a powerup asks a multiple-choice security question. A correct
//! answer pays a score bonus and arms the shield.

use rand::Rng;
use rand::seq::IndexedRandom;

/// A multiple-choice question with three options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quiz {
    pub question: &'static str,
    pub options: [&'static str; 3],
    /// Index of the right option
    pub correct: usize,
}

/// Question bank
pub const QUESTIONS: &[Quiz] = &[
    Quiz {
        question: "What does 'phishing' mean?",
        options: [
            "A scam to steal personal info",
            "A type of fish",
            "A network protocol",
        ],
        correct: 0,
    },
    Quiz {
        question: "What is a firewall?",
        options: [
            "Blocks unauthorized access",
            "A wall that prevents fires",
            "A type of computer virus",
        ],
        correct: 0,
    },
    Quiz {
        question: "What is a 'VPN' used for?",
        options: [
            "Encrypting your connection",
            "A type of virus scan",
            "To speed up your PC",
        ],
        correct: 0,
    },
];

impl Quiz {
    /// Pick a random question from the bank
    pub fn pick(rng: &mut impl Rng) -> Self {
        *QUESTIONS.choose(rng).unwrap_or(&QUESTIONS[0])
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }
}
