use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;

/// Fuzzy answer acceptance. Both the given and the correct answer are
/// expanded into variant sets by a pipeline of cumulative normalization
/// filters; the guess is accepted when any given-variant is a long-enough
/// substring of any correct-variant.
pub fn answer_matches(given: &str, correct: &str, min_matching_characters: usize) -> bool {
    let correct_variants = answer_variants(correct);
    let given_variants = answer_variants(given);
    tracing::debug!(?correct_variants, ?given_variants, "checking answer");

    for correct_variant in &correct_variants {
        for given_variant in &given_variants {
            let guess = given_variant.trim();
            if guess.is_empty() {
                continue;
            }
            let needed = min_matching_characters.min(correct_variant.chars().count());
            if guess.chars().count() >= needed && correct_variant.contains(guess) {
                return true;
            }
        }
    }

    false
}

/// Every normalized spelling a string might reasonably be matched under.
/// Each filter runs over all variants produced so far, and its outputs are
/// added to the set.
pub fn answer_variants(answer: &str) -> Vec<String> {
    let filters: &[fn(&str) -> Vec<String>] = &[
        fold_accents,
        spell_out_numbers,
        expand_symbols,
        strip_leading_article,
        drop_spaces,
        drop_punctuation,
    ];

    let mut variants = vec![answer.to_lowercase()];
    for filter in filters {
        let expanded: Vec<String> = variants.iter().flat_map(|v| filter(v)).collect();
        variants = variants.into_iter().chain(expanded).unique().collect();
    }
    variants
}

fn fold_accents(text: &str) -> Vec<String> {
    let folded: String = text.chars().map(fold_char).collect();
    if folded != text {
        vec![folded]
    } else {
        vec![]
    }
}

// Input is already lowercased, so only lowercase forms appear here.
fn fold_char(c: char) -> char {
    match c {
        'à'..='å' => 'a',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        'š' => 's',
        'ž' => 'z',
        _ => c,
    }
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+(?:[.,][0-9]+)?").expect("number pattern"))
}

fn spell_out_numbers(text: &str) -> Vec<String> {
    let pattern = number_pattern();
    if !pattern.is_match(text) {
        return vec![];
    }
    let spelled = pattern.replace_all(text, |captures: &regex::Captures| spell_number(&captures[0]));
    vec![spelled.into_owned()]
}

/// "3.5" and "3,5" both become "three point five".
fn spell_number(text: &str) -> String {
    let mut parts = text.splitn(2, ['.', ',']);
    let whole = parts.next().unwrap_or_default();
    let mut words = match whole.parse::<u64>() {
        Ok(n) => spell_integer(n),
        Err(_) => return text.to_string(),
    };
    if let Some(fraction) = parts.next() {
        words.push_str(" point");
        for digit in fraction.chars().filter_map(|c| c.to_digit(10)) {
            words.push(' ');
            words.push_str(ONES[digit as usize]);
        }
    }
    words
}

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "ten", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 3] = [
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

fn spell_integer(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    if n < 100 {
        let tens = TENS[(n / 10) as usize];
        return if n % 10 == 0 {
            tens.to_string()
        } else {
            format!("{tens}-{}", ONES[(n % 10) as usize])
        };
    }
    if n < 1_000 {
        let mut words = format!("{} hundred", ONES[(n / 100) as usize]);
        if n % 100 != 0 {
            words.push(' ');
            words.push_str(&spell_integer(n % 100));
        }
        return words;
    }
    for (scale, name) in SCALES {
        if n >= scale {
            let mut words = format!("{} {name}", spell_integer(n / scale));
            if n % scale != 0 {
                words.push(' ');
                words.push_str(&spell_integer(n % scale));
            }
            return words;
        }
    }
    unreachable!("u64 values below one thousand are handled above")
}

fn expand_symbols(text: &str) -> Vec<String> {
    [("&", "and"), ("%", "percent")]
        .into_iter()
        .filter(|(symbol, _)| text.contains(symbol))
        .map(|(symbol, word)| text.replace(symbol, word))
        .collect()
}

fn strip_leading_article(text: &str) -> Vec<String> {
    ["a ", "an ", "the "]
        .iter()
        .filter_map(|article| text.strip_prefix(article).map(str::to_string))
        .collect()
}

fn drop_spaces(text: &str) -> Vec<String> {
    vec![text.chars().filter(|c| *c != ' ').collect()]
}

fn drop_punctuation(text: &str) -> Vec<String> {
    vec![text
        .chars()
        .filter(|c| !"'().,\"-".contains(*c))
        .collect()]
}
