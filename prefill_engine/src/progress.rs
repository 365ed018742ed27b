use crate::config::WordCountRules;

/// Where a word count falls relative to the good-length band.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum LengthStatus {
    TooShort,
    Good,
    TooLong,
}

impl LengthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LengthStatus::TooShort => "Needs more words",
            LengthStatus::Good => "Good length",
            LengthStatus::TooLong => "Consider shortening",
        }
    }
}

/// Counts the whitespace-delimited tokens of a text.
///
/// Punctuation-only tokens count as words.
///
/// ```
/// assert_eq!(prefill_engine::progress::word_count("Hello , world!\n"), 3);
/// ```
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Both `rules.min` and `rules.max` belong to the good band.
pub fn length_status(count: usize, rules: &WordCountRules) -> LengthStatus {
    if count < rules.min {
        LengthStatus::TooShort
    } else if count > rules.max {
        LengthStatus::TooLong
    } else {
        LengthStatus::Good
    }
}

/// The two-line feedback shown in the info field of a second-round link.
///
/// The thresholds are not checked: an inverted band gives contradictory feedback.
pub fn progress_message(count: usize, rules: &WordCountRules) -> String {
    let first = format!("Session 1: {} words written", count);
    let second = match length_status(count, rules) {
        LengthStatus::TooShort => format!(
            "Add about {} more words to reach {}",
            rules.target.saturating_sub(count),
            rules.target
        ),
        LengthStatus::TooLong => format!(
            "Consider making it shorter by about {} words",
            count.saturating_sub(rules.target)
        ),
        LengthStatus::Good => "Good length - you can edit or submit".to_string(),
    };
    format!("{}\n{}", first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: WordCountRules = WordCountRules::DEFAULT_RULES;

    #[test]
    fn tokenization() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("  one   two\tthree\nfour  "), 4);
        // Not a linguistic count.
        assert_eq!(word_count("- -- ... ?"), 4);
        assert_eq!(word_count("don't stop-me now"), 3);
    }

    #[test]
    fn boundaries_are_good() {
        assert_eq!(length_status(240, &RULES), LengthStatus::Good);
        assert_eq!(length_status(260, &RULES), LengthStatus::Good);
        assert_eq!(length_status(239, &RULES), LengthStatus::TooShort);
        assert_eq!(length_status(261, &RULES), LengthStatus::TooLong);
    }

    #[test]
    fn messages() {
        assert_eq!(
            progress_message(239, &RULES),
            "Session 1: 239 words written\nAdd about 11 more words to reach 250"
        );
        assert_eq!(
            progress_message(261, &RULES),
            "Session 1: 261 words written\nConsider making it shorter by about 11 words"
        );
        assert_eq!(
            progress_message(240, &RULES),
            "Session 1: 240 words written\nGood length - you can edit or submit"
        );
        assert_eq!(
            progress_message(260, &RULES),
            "Session 1: 260 words written\nGood length - you can edit or submit"
        );
        assert_eq!(
            progress_message(0, &RULES),
            "Session 1: 0 words written\nAdd about 250 more words to reach 250"
        );
    }

    #[test]
    fn inverted_rules_do_not_panic() {
        let rules = WordCountRules {
            target: 100,
            min: 300,
            max: 50,
        };
        // Below min and above target at the same time.
        assert_eq!(
            progress_message(200, &rules),
            "Session 1: 200 words written\nAdd about 0 more words to reach 100"
        );
    }
}
