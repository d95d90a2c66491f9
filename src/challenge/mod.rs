//! Human-verification challenges presented before login. Each challenge is
//! a tagged variant carrying exactly what its evaluation needs: the ordered
//! words for arrangement, a single expected choice for the selection kinds.

pub mod store;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

/// Attempt budget per challenge.
pub const MAX_ATTEMPTS: i32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeKind {
    SentenceArrangement,
    IntentSelection,
    ImageMatch,
}

impl ChallengeKind {
    pub const ALL: [Self; 3] = [
        Self::SentenceArrangement,
        Self::IntentSelection,
        Self::ImageMatch,
    ];

    /// Tag stored in the `kind` column and returned to the caller.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SentenceArrangement => "SENTENCE_ARRANGEMENT",
            Self::IntentSelection => "INTENT_SELECTION",
            Self::ImageMatch => "IMAGE_MATCH",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SENTENCE_ARRANGEMENT" => Some(Self::SentenceArrangement),
            "INTENT_SELECTION" => Some(Self::IntentSelection),
            "IMAGE_MATCH" => Some(Self::ImageMatch),
            _ => None,
        }
    }
}

/// Lifecycle of a stored challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeState {
    Pending,
    Consumed,
    Expired,
}

impl ChallengeState {
    #[must_use]
    pub fn of(
        consumed_at: Option<DateTime<Utc>>,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        if consumed_at.is_some() {
            Self::Consumed
        } else if now >= expires_at {
            Self::Expired
        } else {
            Self::Pending
        }
    }
}

/// One challenge with its canonical answer.
#[derive(Clone, Debug)]
pub enum Challenge {
    SentenceArrangement {
        words: Vec<String>,
    },
    IntentSelection {
        statement: String,
        intents: Vec<String>,
        answer: String,
    },
    ImageMatch {
        subject: String,
        choices: Vec<String>,
        answer: String,
    },
}

impl Challenge {
    #[must_use]
    pub const fn kind(&self) -> ChallengeKind {
        match self {
            Self::SentenceArrangement { .. } => ChallengeKind::SentenceArrangement,
            Self::IntentSelection { .. } => ChallengeKind::IntentSelection,
            Self::ImageMatch { .. } => ChallengeKind::ImageMatch,
        }
    }

    /// Question text shown to the caller.
    #[must_use]
    pub fn question(&self) -> String {
        match self {
            Self::SentenceArrangement { .. } => {
                "Arrange these words to form a logical sentence".to_string()
            }
            Self::IntentSelection { statement, .. } => {
                format!("What is the intent of: '{statement}'?")
            }
            Self::ImageMatch { subject, .. } => {
                format!("Select the word that best matches: '{subject}'")
            }
        }
    }

    /// Options offered to the caller. The order-sensitive kind shuffles so
    /// the presented order never leaks the answer.
    #[must_use]
    pub fn presented_options(&self, rng: &mut impl Rng) -> Vec<String> {
        match self {
            Self::SentenceArrangement { words } => {
                let mut options = words.clone();
                options.shuffle(rng);
                options
            }
            Self::IntentSelection { intents, .. } => intents.clone(),
            Self::ImageMatch { choices, .. } => choices.clone(),
        }
    }

    /// Canonical answer persisted alongside the challenge, never returned
    /// to the caller.
    #[must_use]
    pub fn answer(&self) -> Vec<String> {
        match self {
            Self::SentenceArrangement { words } => words.clone(),
            Self::IntentSelection { answer, .. } | Self::ImageMatch { answer, .. } => {
                vec![answer.clone()]
            }
        }
    }

    #[must_use]
    pub fn evaluate(&self, submission: &[String]) -> bool {
        evaluate(self.kind(), &self.answer(), submission)
    }
}

/// Checks a submission against a canonical answer. Arrangement compares the
/// full ordered sequence, the selection kinds expect exactly one value equal
/// to the answer.
#[must_use]
pub fn evaluate(kind: ChallengeKind, canonical: &[String], submission: &[String]) -> bool {
    match kind {
        ChallengeKind::SentenceArrangement => !canonical.is_empty() && submission == canonical,
        ChallengeKind::IntentSelection | ChallengeKind::ImageMatch => {
            canonical.len() == 1 && submission.len() == 1 && submission[0] == canonical[0]
        }
    }
}

const SENTENCES: [&[&str]; 3] = [
    &["The", "cat", "sits", "on", "the", "mat"],
    &["Strong", "passwords", "protect", "accounts"],
    &["The", "quick", "brown", "fox", "jumps"],
];

const INTENT_PROMPTS: [(&str, &str); 3] = [
    ("I want to buy a laptop", "Request"),
    ("How do I reset my password", "Question"),
    ("This product is amazing", "Statement"),
];

const INTENTS: [&str; 4] = ["Question", "Request", "Statement", "Complaint"];

const IMAGE_PROMPTS: [(&str, &str); 3] = [
    ("Programming", "Coding"),
    ("Recipes", "Cooking"),
    ("Ballet", "Dancing"),
];

const IMAGE_CHOICES: [&str; 4] = ["Coding", "Cooking", "Dancing", "Singing"];

/// Picks a kind uniformly at random, then a canned prompt of that kind.
#[must_use]
pub fn pick(rng: &mut impl Rng) -> Challenge {
    let kind = ChallengeKind::ALL[rng.gen_range(0..ChallengeKind::ALL.len())];

    pick_of_kind(kind, rng)
}

#[must_use]
pub fn pick_of_kind(kind: ChallengeKind, rng: &mut impl Rng) -> Challenge {
    match kind {
        ChallengeKind::SentenceArrangement => {
            let words = SENTENCES[rng.gen_range(0..SENTENCES.len())];

            Challenge::SentenceArrangement {
                words: words.iter().map(ToString::to_string).collect(),
            }
        }
        ChallengeKind::IntentSelection => {
            let (statement, answer) = INTENT_PROMPTS[rng.gen_range(0..INTENT_PROMPTS.len())];

            Challenge::IntentSelection {
                statement: statement.to_string(),
                intents: INTENTS.iter().map(ToString::to_string).collect(),
                answer: answer.to_string(),
            }
        }
        ChallengeKind::ImageMatch => {
            let (subject, answer) = IMAGE_PROMPTS[rng.gen_range(0..IMAGE_PROMPTS.len())];

            Challenge::ImageMatch {
                subject: subject.to_string(),
                choices: IMAGE_CHOICES.iter().map(ToString::to_string).collect(),
                answer: answer.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashSet;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn kind_tags_round_trip() {
        for kind in ChallengeKind::ALL {
            assert_eq!(ChallengeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ChallengeKind::parse("SOMETHING_ELSE"), None);
    }

    #[test]
    fn state_follows_consumption_and_expiry() {
        let now = Utc::now();
        let later = now + Duration::minutes(5);

        assert_eq!(
            ChallengeState::of(None, later, now),
            ChallengeState::Pending
        );
        assert_eq!(
            ChallengeState::of(Some(now), later, now),
            ChallengeState::Consumed
        );
        assert_eq!(
            ChallengeState::of(None, now - Duration::minutes(1), now),
            ChallengeState::Expired
        );
    }

    #[test]
    fn sentence_arrangement_is_order_sensitive() {
        let challenge = Challenge::SentenceArrangement {
            words: strings(&["The", "cat", "sits", "on", "the", "mat"]),
        };

        assert!(challenge.evaluate(&strings(&["The", "cat", "sits", "on", "the", "mat"])));
        assert!(!challenge.evaluate(&strings(&["cat", "The", "sits", "on", "the", "mat"])));
        assert!(!challenge.evaluate(&strings(&["The", "cat", "sits", "on", "the"])));
        assert!(!challenge.evaluate(&[]));
    }

    #[test]
    fn intent_selection_requires_exactly_one_answer() {
        let challenge = Challenge::IntentSelection {
            statement: "I want to buy a laptop".to_string(),
            intents: strings(&INTENTS),
            answer: "Request".to_string(),
        };

        assert!(challenge.evaluate(&strings(&["Request"])));
        assert!(!challenge.evaluate(&strings(&["Request", "Question"])));
        assert!(!challenge.evaluate(&strings(&["Question"])));
        assert!(!challenge.evaluate(&[]));
    }

    #[test]
    fn image_match_compares_the_single_choice() {
        let challenge = Challenge::ImageMatch {
            subject: "Programming".to_string(),
            choices: strings(&IMAGE_CHOICES),
            answer: "Coding".to_string(),
        };

        assert!(challenge.evaluate(&strings(&["Coding"])));
        assert!(!challenge.evaluate(&strings(&["Cooking"])));
    }

    #[test]
    fn evaluate_rejects_corrupt_canonical_answers() {
        assert!(!evaluate(
            ChallengeKind::SentenceArrangement,
            &[],
            &strings(&["anything"])
        ));
        assert!(!evaluate(
            ChallengeKind::IntentSelection,
            &[],
            &strings(&["Request"])
        ));
    }

    #[test]
    fn arrangement_options_are_a_permutation_of_the_words() {
        let mut rng = rand::thread_rng();
        let challenge = pick_of_kind(ChallengeKind::SentenceArrangement, &mut rng);

        let mut options = challenge.presented_options(&mut rng);
        let mut words = match &challenge {
            Challenge::SentenceArrangement { words } => words.clone(),
            _ => unreachable!(),
        };

        options.sort();
        words.sort();
        assert_eq!(options, words);
    }

    #[test]
    fn selection_options_keep_their_order() {
        let mut rng = rand::thread_rng();
        let challenge = pick_of_kind(ChallengeKind::IntentSelection, &mut rng);

        assert_eq!(challenge.presented_options(&mut rng), strings(&INTENTS));
    }

    #[test]
    fn selection_answers_are_offered_among_the_options() {
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            match pick_of_kind(ChallengeKind::IntentSelection, &mut rng) {
                Challenge::IntentSelection {
                    intents, answer, ..
                } => assert!(intents.contains(&answer)),
                _ => unreachable!(),
            }

            match pick_of_kind(ChallengeKind::ImageMatch, &mut rng) {
                Challenge::ImageMatch {
                    choices, answer, ..
                } => assert!(choices.contains(&answer)),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn pick_reaches_every_kind() {
        let mut rng = rand::thread_rng();
        let kinds: HashSet<&'static str> = (0..200)
            .map(|_| pick(&mut rng).kind().as_str())
            .collect();

        assert_eq!(kinds.len(), ChallengeKind::ALL.len());
    }
}
