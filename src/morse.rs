use std::collections::HashMap;
use std::sync::OnceLock;

const MORSE_TABLE: [(char, &str); 38] = [
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
];

static MORSE_MAP: OnceLock<HashMap<char, &'static str>> = OnceLock::new();

fn morse_map() -> &'static HashMap<char, &'static str> {
    MORSE_MAP.get_or_init(|| MORSE_TABLE.iter().copied().collect())
}

/// Morse code for `ch`, or `None` when the character has no mapping.
///
/// Lookup is exact: only upper-case letters, digits, `.` and `,` are mapped.
pub fn code_for(ch: char) -> Option<&'static str> {
    morse_map().get(&ch).copied()
}

pub fn is_mapped(ch: char) -> bool {
    morse_map().contains_key(&ch)
}
