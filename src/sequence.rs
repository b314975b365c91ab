use std::time::Duration;

use crate::morse::code_for;
use crate::timing::TimingConfig;

pub const WORD_SEPARATOR: &str = "|";

/// One timed step of a playback sequence. Durations are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pulse {
        duration: u64,
        symbol: char,
        code: &'static str,
        letter: char,
    },
    Gap {
        duration: u64,
    },
    LetterComplete {
        letter: char,
    },
    WordBreak,
}

impl Event {
    pub fn duration_ms(&self) -> u64 {
        match self {
            Event::Pulse { duration, .. } | Event::Gap { duration } => *duration,
            Event::LetterComplete { .. } | Event::WordBreak => 0,
        }
    }
}

/// Expands `message` into the light's on/off schedule.
///
/// Words are split on single spaces so repeated spaces produce empty words,
/// each still followed by a long gap and a word break. Characters without a
/// Morse code emit nothing.
pub fn build_sequence(message: &str, timing: &TimingConfig) -> Vec<Event> {
    let mut sequence = Vec::new();
    let words: Vec<&str> = message.split(' ').collect();

    for (word_index, word) in words.iter().enumerate() {
        let letters: Vec<char> = word.chars().collect();

        for (letter_index, &letter) in letters.iter().enumerate() {
            let Some(code) = code_for(letter) else {
                continue;
            };

            let symbol_count = code.chars().count();
            for (symbol_index, symbol) in code.chars().enumerate() {
                let duration = if symbol == '.' { timing.on_short } else { timing.on_long };
                sequence.push(Event::Pulse {
                    duration,
                    symbol,
                    code,
                    letter,
                });
                if symbol_index + 1 < symbol_count {
                    sequence.push(Event::Gap {
                        duration: timing.off_short,
                    });
                }
            }

            sequence.push(Event::LetterComplete { letter });

            if letter_index + 1 < letters.len() {
                sequence.push(Event::Gap {
                    duration: timing.off_medium,
                });
            }
        }

        if word_index + 1 < words.len() {
            sequence.push(Event::Gap {
                duration: timing.off_long,
            });
            sequence.push(Event::WordBreak);
        }
    }

    sequence
}

/// Full transliteration of `message`: codes space-joined, words joined by " | ".
pub fn build_full_display(message: &str) -> String {
    message
        .split(' ')
        .map(|word| word.chars().filter_map(code_for).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(&format!(" {} ", WORD_SEPARATOR))
}

/// Wall time of one pass over `sequence`.
pub fn sequence_duration(sequence: &[Event]) -> Duration {
    Duration::from_millis(sequence.iter().map(Event::duration_ms).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaps_of(sequence: &[Event], ms: u64) -> usize {
        sequence
            .iter()
            .filter(|e| matches!(e, Event::Gap { duration } if *duration == ms))
            .count()
    }

    #[test]
    fn sos_starts_and_ends_as_expected() {
        let t = TimingConfig::default();
        let seq = build_sequence("SOS", &t);
        let dot = |letter| Event::Pulse {
            duration: 200,
            symbol: '.',
            code: "...",
            letter,
        };
        assert_eq!(seq[0], dot('S'));
        assert_eq!(seq[1], Event::Gap { duration: 200 });
        assert_eq!(seq[2], dot('S'));
        assert_eq!(seq[3], Event::Gap { duration: 200 });
        assert_eq!(seq[4], dot('S'));
        assert_eq!(seq[5], Event::LetterComplete { letter: 'S' });
        assert_eq!(seq[6], Event::Gap { duration: 500 });
        assert_eq!(
            seq[7],
            Event::Pulse {
                duration: 400,
                symbol: '-',
                code: "---",
                letter: 'O',
            }
        );
        assert_eq!(seq.last(), Some(&Event::LetterComplete { letter: 'S' }));
        assert!(!seq.contains(&Event::WordBreak));
        // 3 letters * (3 pulses + 2 gaps + 1 marker) + 2 letter gaps
        assert_eq!(seq.len(), 20);
    }

    #[test]
    fn structural_counts_follow_message_shape() {
        let t = TimingConfig {
            on_short: 10,
            on_long: 30,
            off_short: 11,
            off_medium: 33,
            off_long: 77,
        };
        let message = "HELLO WORLD 73";
        let seq = build_sequence(message, &t);

        let symbols: usize = message
            .chars()
            .filter_map(code_for)
            .map(|c| c.len())
            .sum();
        let pulses = seq.iter().filter(|e| matches!(e, Event::Pulse { .. })).count();
        assert_eq!(pulses, symbols);

        let intra: usize = message
            .chars()
            .filter_map(code_for)
            .map(|c| c.len() - 1)
            .sum();
        assert_eq!(gaps_of(&seq, 11), intra);

        let letter_gaps: usize = message.split(' ').map(|w| w.chars().count() - 1).sum();
        assert_eq!(gaps_of(&seq, 33), letter_gaps);

        assert_eq!(gaps_of(&seq, 77), 2);
        assert_eq!(seq.iter().filter(|e| **e == Event::WordBreak).count(), 2);
        let completes = seq
            .iter()
            .filter(|e| matches!(e, Event::LetterComplete { .. }))
            .count();
        assert_eq!(completes, 12);
    }

    #[test]
    fn unmapped_characters_emit_nothing() {
        let t = TimingConfig::default();
        assert!(build_sequence("???", &t).is_empty());
        let with = build_sequence("E#", &t);
        let pulses = with.iter().filter(|e| matches!(e, Event::Pulse { .. })).count();
        assert_eq!(pulses, 1);
        assert!(!with
            .iter()
            .any(|e| matches!(e, Event::LetterComplete { letter } if *letter == '#')));
    }

    #[test]
    fn word_break_follows_long_gap() {
        let seq = build_sequence("E T", &TimingConfig::default());
        assert_eq!(
            seq,
            vec![
                Event::Pulse {
                    duration: 200,
                    symbol: '.',
                    code: ".",
                    letter: 'E',
                },
                Event::LetterComplete { letter: 'E' },
                Event::Gap { duration: 1500 },
                Event::WordBreak,
                Event::Pulse {
                    duration: 400,
                    symbol: '-',
                    code: "-",
                    letter: 'T',
                },
                Event::LetterComplete { letter: 'T' },
            ]
        );
    }

    #[test]
    fn empty_message_builds_empty_sequence() {
        assert!(build_sequence("", &TimingConfig::default()).is_empty());
        assert_eq!(build_full_display(""), "");
    }

    #[test]
    fn sequence_is_deterministic() {
        let t = TimingConfig::default();
        let a = build_sequence("MORSE WATCHER 2024.", &t);
        let b = build_sequence("MORSE WATCHER 2024.", &t);
        assert_eq!(a, b);
    }

    #[test]
    fn full_display_joins_codes_and_words() {
        assert_eq!(build_full_display("SOS"), "... --- ...");
        assert_eq!(build_full_display("SOS OK"), "... --- ... | --- -.-");
        assert_eq!(build_full_display("E?T"), ". -");
    }

    #[test]
    fn duration_sums_pulses_and_gaps() {
        let seq = build_sequence("E T", &TimingConfig::default());
        assert_eq!(sequence_duration(&seq), Duration::from_millis(200 + 1500 + 400));
    }
}
