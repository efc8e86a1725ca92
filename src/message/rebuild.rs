//! Rebuild codes: compact persisted form of QC messages
//!
//! A rebuild code holds a message's tag and its six canonical fields. Its text
//! form is a single token; several tokens joined with `;` form the persisted
//! string for a record. Delimiters occurring inside values are escaped with a
//! backslash, and each set carries its member count so that an empty set and a
//! set holding one empty name stay distinct.
//!
//! ```text
//! ConstantValue|12|4|1:3|1:sst|40|30
//! ```

use super::{MessageFields, QcMessage};
use crate::constants::rebuild_grammar::{
    COUNT_SEPARATOR, ESCAPE, FIELD_COUNT, FIELD_DELIMITER, LIST_DELIMITER, RESERVED,
    TOKEN_DELIMITER,
};
use crate::error::MessageError;
use crate::flag::Flag;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Encoded form of a single message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildCode {
    tag: String,
    fields: MessageFields,
}

impl RebuildCode {
    /// Rebuild code for a message
    pub fn new(message: &dyn QcMessage) -> Self {
        Self::from_parts(message.tag(), message.fields().clone())
    }

    pub fn from_parts(tag: impl Into<String>, fields: MessageFields) -> Self {
        Self {
            tag: tag.into(),
            fields,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn fields(&self) -> &MessageFields {
        &self.fields
    }

    pub fn into_fields(self) -> MessageFields {
        self.fields
    }
}

impl fmt::Display for RebuildCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices: Vec<String> = self
            .fields
            .column_indices
            .iter()
            .map(usize::to_string)
            .collect();
        let names: Vec<String> = self.fields.column_names.iter().map(|n| escape(n)).collect();

        let parts = [
            escape(&self.tag),
            self.fields.line_number.to_string(),
            self.fields.flag.code().to_string(),
            encode_set(&indices),
            encode_set(&names),
            escape(&self.fields.field_value),
            escape(&self.fields.valid_value),
        ];

        f.write_str(&parts.join(&FIELD_DELIMITER.to_string()))
    }
}

impl FromStr for RebuildCode {
    type Err = MessageError;

    /// Parse a single token
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let parts = split_unescaped(code, FIELD_DELIMITER);
        if parts.len() != FIELD_COUNT {
            return Err(MessageError::malformed(
                code,
                format!("expected {} fields, found {}", FIELD_COUNT, parts.len()),
            ));
        }

        let tag = unescape(code, parts[0])?;
        if tag.is_empty() {
            return Err(MessageError::malformed(code, "empty message tag"));
        }

        let line_number = parts[1].parse::<usize>().map_err(|e| {
            MessageError::malformed(code, format!("invalid line number '{}': {}", parts[1], e))
        })?;

        let flag_code = parts[2].parse::<i8>().map_err(|e| {
            MessageError::malformed(code, format!("invalid flag '{}': {}", parts[2], e))
        })?;
        let flag = Flag::try_from(flag_code)?;

        let column_indices = decode_set(code, parts[3])?
            .into_iter()
            .map(|index| {
                index.parse::<usize>().map_err(|e| {
                    MessageError::malformed(code, format!("invalid column index '{}': {}", index, e))
                })
            })
            .collect::<Result<BTreeSet<usize>, _>>()?;

        let column_names: BTreeSet<String> = decode_set(code, parts[4])?.into_iter().collect();

        let fields = MessageFields::new(
            line_number,
            column_indices,
            column_names,
            flag,
            unescape(code, parts[5])?,
            unescape(code, parts[6])?,
        );

        Ok(Self { tag, fields })
    }
}

/// Encode messages as one persisted string
pub fn encode_messages<'a, I>(messages: I) -> String
where
    I: IntoIterator<Item = &'a Arc<dyn QcMessage>>,
{
    let tokens: Vec<String> = messages
        .into_iter()
        .map(|message| message.rebuild_code().to_string())
        .collect();

    tokens.join(&TOKEN_DELIMITER.to_string())
}

/// Split a persisted string into rebuild codes, skipping empty tokens
pub fn parse_codes(codes: &str) -> Result<Vec<RebuildCode>, MessageError> {
    split_unescaped(codes, TOKEN_DELIMITER)
        .into_iter()
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if RESERVED.contains(&c) {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn unescape(code: &str, raw: &str) -> Result<String, MessageError> {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            match chars.next() {
                Some(escaped) => value.push(escaped),
                None => return Err(MessageError::malformed(code, "dangling escape character")),
            }
        } else {
            value.push(c);
        }
    }
    Ok(value)
}

/// Split on a delimiter that is not preceded by an escape. Escapes are kept so
/// nested fields can be split again before unescaping.
fn split_unescaped(text: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (position, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if c == delimiter {
            parts.push(&text[start..position]);
            start = position + c.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

fn encode_set(members: &[String]) -> String {
    format!(
        "{}{}{}",
        members.len(),
        COUNT_SEPARATOR,
        members.join(&LIST_DELIMITER.to_string())
    )
}

fn decode_set(code: &str, raw: &str) -> Result<Vec<String>, MessageError> {
    let (count, members) = raw
        .split_once(COUNT_SEPARATOR)
        .ok_or_else(|| MessageError::malformed(code, format!("set '{}' has no count", raw)))?;

    let count = count.parse::<usize>().map_err(|e| {
        MessageError::malformed(code, format!("invalid set count '{}': {}", count, e))
    })?;

    if count == 0 {
        if !members.is_empty() {
            return Err(MessageError::malformed(
                code,
                format!("set '{}' declares no members but has some", raw),
            ));
        }
        return Ok(Vec::new());
    }

    let decoded = split_unescaped(members, LIST_DELIMITER)
        .into_iter()
        .map(|member| unescape(code, member))
        .collect::<Result<Vec<_>, _>>()?;

    if decoded.len() != count {
        return Err(MessageError::malformed(
            code,
            format!("set declares {} members, found {}", count, decoded.len()),
        ));
    }

    Ok(decoded)
}
