//! Password policy evaluation.
//!
//! Checks a candidate password against the account password rules and
//! classifies its strength for the strength meter:
//! - Minimum length
//! - Letter requirements (upper and lower separately, or any letter)
//! - At least one digit
//!
//! Evaluation is pure and cheap, it runs on every keystroke.

use serde::{Deserialize, Serialize};
use std::fmt;

// Defaults for password requirements
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const DEFAULT_LETTER_RULE: LetterRule = LetterRule::UpperAndLower;

/// Which letter requirement the policy enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterRule {
    /// One lowercase and one uppercase letter, checked as two rules
    UpperAndLower,
    /// Any letter at all, checked as a single rule
    AnyLetter,
}

/// Strength classification shown next to the meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Good,
    Strong,
}

impl StrengthLabel {
    /// Label text as displayed in the form
    pub fn display_text(&self) -> &'static str {
        match self {
            StrengthLabel::Weak => "Yếu",
            StrengthLabel::Medium => "Trung bình",
            StrengthLabel::Good => "Khá",
            StrengthLabel::Strong => "Mạnh",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Medium => "Medium",
            StrengthLabel::Good => "Good",
            StrengthLabel::Strong => "Strong",
        };
        f.pad(name)
    }
}

/// Result of evaluating one candidate password
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyResult {
    pub violations: Vec<String>,
    pub score: u8,
    pub label: Option<StrengthLabel>,
    pub fraction: f32,
}

impl PolicyResult {
    fn neutral() -> Self {
        Self {
            violations: Vec::new(),
            score: 0,
            label: None,
            fraction: 0.0,
        }
    }

    /// True when the password breaks none of the rules
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations joined the way the form shows them under a single field
    pub fn joined_violations(&self) -> String {
        self.violations.join(", ")
    }
}

/// Per-rule findings for a password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordValidationDetails {
    pub meets_length: bool,
    pub has_uppercase: bool,
    pub has_lowercase: bool,
    pub has_letter: bool,
    pub has_digit: bool,
}

/// Configurable password rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordRules {
    pub min_length: usize,
    pub letter_rule: LetterRule,
}

impl Default for PasswordRules {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            letter_rule: DEFAULT_LETTER_RULE,
        }
    }
}

impl PasswordRules {
    pub fn new(min_length: usize, letter_rule: LetterRule) -> Self {
        Self {
            min_length,
            letter_rule,
        }
    }

    /// Relaxed rule set that accepts any letter
    pub fn relaxed() -> Self {
        Self::new(MIN_PASSWORD_LENGTH, LetterRule::AnyLetter)
    }

    /// Number of rules a password is scored against
    pub fn rule_count(&self) -> u8 {
        match self.letter_rule {
            LetterRule::UpperAndLower => 4,
            LetterRule::AnyLetter => 3,
        }
    }

    /// Collects the per-rule findings in a single pass over the password
    pub fn details(&self, password: &str) -> PasswordValidationDetails {
        let mut details = PasswordValidationDetails {
            meets_length: password.chars().count() >= self.min_length,
            has_uppercase: false,
            has_lowercase: false,
            has_letter: false,
            has_digit: false,
        };
        for c in password.chars() {
            details.has_uppercase |= c.is_uppercase();
            details.has_lowercase |= c.is_lowercase();
            details.has_letter |= c.is_alphabetic();
            details.has_digit |= c.is_ascii_digit();
        }
        details
    }

    /// Evaluates a candidate password
    ///
    /// The empty password yields a neutral result: no violations and no label.
    pub fn evaluate(&self, password: &str) -> PolicyResult {
        if password.is_empty() {
            return PolicyResult::neutral();
        }

        let details = self.details(password);
        let mut violations = Vec::new();

        if !details.meets_length {
            violations.push(format!("at least {} characters", self.min_length));
        }
        match self.letter_rule {
            LetterRule::UpperAndLower => {
                if !details.has_lowercase {
                    violations.push("at least one lowercase letter".to_string());
                }
                if !details.has_uppercase {
                    violations.push("at least one uppercase letter".to_string());
                }
            },
            LetterRule::AnyLetter => {
                if !details.has_letter {
                    violations.push("at least one letter".to_string());
                }
            },
        }
        if !details.has_digit {
            violations.push("at least one digit".to_string());
        }

        let rule_count = self.rule_count();
        let score = rule_count.saturating_sub(violations.len() as u8);

        PolicyResult {
            label: Some(self.label_for(score)),
            fraction: f32::from(score) / f32::from(rule_count),
            score,
            violations,
        }
    }

    fn label_for(&self, score: u8) -> StrengthLabel {
        match score {
            s if s >= self.rule_count() => StrengthLabel::Strong,
            0 | 1 => StrengthLabel::Weak,
            2 => StrengthLabel::Medium,
            _ => StrengthLabel::Good,
        }
    }
}

/// Evaluates a password under the default rule set
pub fn evaluate(password: &str) -> PolicyResult {
    PasswordRules::default().evaluate(password)
}
