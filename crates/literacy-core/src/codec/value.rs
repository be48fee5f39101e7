//! Encoding/decoding between session results and the flat model value.
//!
//! Layout, space separated:
//!
//! ```text
//! flashCount elapsedSecs finishCount r r r r r r r incorrect...
//! ```
//!
//! Counts are 1-based word positions, `r` are reserved fields, and absent
//! numbers are written as the literal `null`. Incorrect words follow in
//! ascending order as 1-based positions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Number of fixed fields before the incorrect-word list.
pub const FIXED_FIELDS: usize = 10;
/// Token written for an absent number.
pub const ABSENT: &str = "null";
pub const SEPARATOR: &str = " ";

/// The observable outcome of an attempt; what the codec reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub flash_word_index: Option<usize>,
    pub finish_word_index: Option<usize>,
    pub elapsed_secs: u64,
    pub incorrect_indices: BTreeSet<usize>,
}

impl SessionResult {
    /// 1-based position of the flash word.
    pub fn flash_count(&self) -> Option<usize> {
        self.flash_word_index.map(|i| i + 1)
    }

    /// 1-based position of the last word read.
    pub fn finish_count(&self) -> Option<usize> {
        self.finish_word_index.map(|i| i + 1)
    }
}

fn field(value: Option<impl ToString>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| v.to_string())
}

/// Serialize a result into the model value.
pub fn encode(result: &SessionResult) -> String {
    let mut fields = Vec::with_capacity(FIXED_FIELDS + result.incorrect_indices.len());
    fields.push(field(result.flash_count()));
    fields.push(result.elapsed_secs.to_string());
    fields.push(field(result.finish_count()));
    fields.extend(std::iter::repeat(ABSENT.to_string()).take(FIXED_FIELDS - 3));
    fields.extend(result.incorrect_indices.iter().map(|i| (i + 1).to_string()));
    fields.join(SEPARATOR)
}

/// Parse a 1-based count token into a 0-based index.
fn parse_count(token: &str) -> Result<Option<usize>, String> {
    if token == ABSENT {
        return Ok(None);
    }
    match token.parse::<usize>() {
        Ok(0) => Err(format!("position '{token}' must be 1 or greater")),
        Ok(n) => Ok(Some(n - 1)),
        Err(_) => Err(format!("'{token}' is not a number")),
    }
}

fn parse_elapsed(token: &str) -> Result<u64, String> {
    if token == ABSENT {
        return Ok(0);
    }
    token
        .parse::<u64>()
        .map_err(|_| format!("elapsed time '{token}' is not a number"))
}

/// Lenient decode: anything unparseable is logged and dropped.
///
/// Short input decodes whatever prefix is present; an absent or garbage
/// elapsed time reads as 0.
pub fn decode(value: &str) -> SessionResult {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let token = |i: usize| tokens.get(i).copied().unwrap_or(ABSENT);

    if !tokens.is_empty() && tokens.len() < FIXED_FIELDS {
        tracing::warn!(
            tokens = tokens.len(),
            expected = FIXED_FIELDS,
            "short literacy value, decoding available prefix"
        );
    }

    let flash_word_index = parse_count(token(0)).unwrap_or_else(|e| {
        tracing::warn!("dropping flash count: {e}");
        None
    });
    let elapsed_secs = parse_elapsed(token(1)).unwrap_or_else(|e| {
        tracing::warn!("dropping {e}");
        0
    });
    let finish_word_index = parse_count(token(2)).unwrap_or_else(|e| {
        tracing::warn!("dropping finish count: {e}");
        None
    });

    let incorrect_indices = tokens
        .iter()
        .skip(FIXED_FIELDS)
        .filter_map(|t| match parse_count(t) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!("dropping incorrect word: {e}");
                None
            }
        })
        .collect();

    SessionResult {
        flash_word_index,
        finish_word_index,
        elapsed_secs,
        incorrect_indices,
    }
}

/// Validating decode. Rejects short input and any token that is neither a
/// number nor the absent marker where a number belongs.
pub fn decode_strict(value: &str) -> Result<SessionResult, SessionError> {
    let malformed = SessionError::MalformedSerializedValue;
    let tokens: Vec<&str> = value.split(SEPARATOR).collect();
    if tokens.len() < FIXED_FIELDS {
        return Err(malformed(format!(
            "expected at least {FIXED_FIELDS} fields, found {}",
            tokens.len()
        )));
    }

    let flash_word_index = parse_count(tokens[0]).map_err(malformed)?;
    let elapsed_secs = parse_elapsed(tokens[1]).map_err(malformed)?;
    let finish_word_index = parse_count(tokens[2]).map_err(malformed)?;

    let mut incorrect_indices = BTreeSet::new();
    for token in &tokens[FIXED_FIELDS..] {
        match parse_count(token).map_err(malformed)? {
            Some(index) => {
                incorrect_indices.insert(index);
            }
            None => return Err(malformed("incorrect word cannot be absent".into())),
        }
    }

    Ok(SessionResult {
        flash_word_index,
        finish_word_index,
        elapsed_secs,
        incorrect_indices,
    })
}
