use serde::{Deserialize, Serialize};

use crate::{DecodeError, ReceiveSet, MAX_SETS, MAX_VALUES, TEXT_SEPARATOR, VALUE_SEPARATOR};

/// How numeric tokens that are not valid numbers are treated.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Use the longest numeric prefix of the token, or 0 when there is none.
    #[default]
    Lenient,
    /// Reject the whole input on the first token that is not a number.
    Strict,
}

/// Non-empty tokens of `input`, split on both `,` and `;`.
pub fn tokens(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| c == VALUE_SEPARATOR || c == TEXT_SEPARATOR)
        .filter(|token| !token.is_empty())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn starts_with_ignore_case(s: &str, word: &str) -> bool {
    s.get(..word.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(word))
}

/// Parses the leading number of `token` the way C's `atof` does: leading whitespace is skipped,
/// `inf`, `infinity` and `nan` are accepted in any case, trailing garbage is ignored and a token
/// without any digits is `0.0`.
pub fn parse_lenient(token: &str) -> f32 {
    let s = token.trim_start();
    let bytes = s.as_bytes();

    let (negative, mut end) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };

    // covers "infinity" too
    let special = if starts_with_ignore_case(&s[end..], "inf") {
        Some(f32::INFINITY)
    } else if starts_with_ignore_case(&s[end..], "nan") {
        Some(f32::NAN)
    } else {
        None
    };
    if let Some(value) = special {
        return if negative { -value } else { value };
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0.0;
    }

    if let Some(b'e' | b'E') = bytes.get(end) {
        let mut exp = end + 1;
        if let Some(b'+' | b'-') = bytes.get(exp) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}

/// Parses `x,y,z,...;` into at most `receive_sets` triples.
///
/// The input must end with `;`. Tokens past `receive_sets * 3` are ignored, but the kept
/// tokens must form whole triples.
pub fn decode(
    input: &str,
    receive_sets: usize,
    policy: ParsePolicy,
) -> Result<ReceiveSet, DecodeError> {
    if !input.ends_with(TEXT_SEPARATOR) {
        return Err(DecodeError::MalformedTerminator);
    }

    let receive_sets = receive_sets.min(MAX_SETS);
    let mut values = [0.0_f32; MAX_VALUES];
    let mut count = 0;

    for (index, token) in tokens(input).take(receive_sets * 3).enumerate() {
        values[count] = match policy {
            ParsePolicy::Lenient => parse_lenient(token),
            ParsePolicy::Strict => token.parse::<f32>().map_err(|_| DecodeError::MalformedToken {
                index,
                token: token.to_string(),
            })?,
        };
        count += 1;
    }

    if count % 3 != 0 {
        return Err(DecodeError::IncompleteTriple { values: count });
    }

    Ok(ReceiveSet::from_values(&values[..(count / 3).min(receive_sets) * 3]))
}
