use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single questionnaire answer exactly as the survey form submitted it.
///
/// Answers are heterogeneous: plain text, numbers (often sent as strings),
/// multi-select lists, tables of records (growth rates, contracts) and small
/// records (expense allocation). Nothing is validated up front; the scoring
/// rules read what they need and fall back when a value is missing or has an
/// unexpected shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<AnswerValue>),
    Record(BTreeMap<String, AnswerValue>),
}

impl AnswerValue {
    /// Builds a record answer such as an expense allocation row.
    pub fn record<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<AnswerValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        AnswerValue::Record(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Whether the form counts this value as filled in.
    ///
    /// Null, `false`, the empty string and numeric zero are unanswered. Empty
    /// lists and records still count as answered.
    pub fn is_answered(&self) -> bool {
        match self {
            AnswerValue::Null => false,
            AnswerValue::Bool(flag) => *flag,
            AnswerValue::Number(value) => *value != 0.0 && !value.is_nan(),
            AnswerValue::Text(text) => !text.is_empty(),
            AnswerValue::List(_) | AnswerValue::Record(_) => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric reading of the answer. Text is parsed by its leading number so
    /// "12.5%" reads as 12.5 and "n/a" reads as nothing.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) if value.is_finite() => Some(*value),
            AnswerValue::Text(text) => parse_leading_number(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AnswerValue]> {
        match self {
            AnswerValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, AnswerValue>> {
        match self {
            AnswerValue::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Numeric field of a record answer; anything unreadable counts as zero.
    pub fn field_number(&self, field: &str) -> f64 {
        self.as_record()
            .and_then(|fields| fields.get(field))
            .and_then(AnswerValue::as_number)
            .unwrap_or(0.0)
    }

    /// Monthly growth rates from a growth table answer, `None` when the answer
    /// is not a table.
    pub fn growth_rates(&self) -> Option<Vec<f64>> {
        self.as_list()
            .map(|rows| rows.iter().map(|row| row.field_number("rate")).collect())
    }

    /// Contract durations (months) from a contract table answer, `None` when
    /// the answer is not a table.
    pub fn contract_durations(&self) -> Option<Vec<f64>> {
        self.as_list().map(|rows| {
            rows.iter()
                .map(|row| row.field_number("duration"))
                .collect()
        })
    }

    pub fn expense_allocation(&self) -> Option<ExpenseAllocation> {
        self.as_record()?;
        Some(ExpenseAllocation {
            tech: self.field_number("tech"),
            marketing: self.field_number("marketing"),
            sales: self.field_number("sales"),
            management: self.field_number("management"),
        })
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl<T: Into<AnswerValue>> From<Vec<T>> for AnswerValue {
    fn from(values: Vec<T>) -> Self {
        AnswerValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Percentage split of the three-year expense plan.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseAllocation {
    pub tech: f64,
    pub marketing: f64,
    pub sales: f64,
    pub management: f64,
}

/// Answers keyed by question label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, AnswerValue>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used when assembling fixtures and imports.
    pub fn with(mut self, label: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(label, value);
        self
    }

    pub fn insert(
        &mut self,
        label: impl Into<String>,
        value: impl Into<AnswerValue>,
    ) -> Option<AnswerValue> {
        self.0.insert(label.into(), value.into())
    }

    pub fn remove(&mut self, label: &str) -> Option<AnswerValue> {
        self.0.remove(label)
    }

    pub fn get(&self, label: &str) -> Option<&AnswerValue> {
        self.0.get(label)
    }

    /// The answer for `label` if it counts as filled in.
    pub fn answered(&self, label: &str) -> Option<&AnswerValue> {
        self.get(label).filter(|value| value.is_answered())
    }

    pub fn is_answered(&self, label: &str) -> bool {
        self.answered(label).is_some()
    }

    pub fn text(&self, label: &str) -> Option<&str> {
        self.get(label).and_then(AnswerValue::as_text)
    }

    pub fn number(&self, label: &str) -> Option<f64> {
        self.get(label).and_then(AnswerValue::as_number)
    }

    /// Length of a multi-select answer; anything that is not a list counts as
    /// no selections.
    pub fn selection_count(&self, label: &str) -> usize {
        self.get(label)
            .and_then(AnswerValue::as_list)
            .map_or(0, <[AnswerValue]>::len)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<AnswerValue>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        AnswerSet(
            iter.into_iter()
                .map(|(label, value)| (label.into(), value.into()))
                .collect(),
        )
    }
}

/// Parses the longest numeric prefix of `raw`, ignoring leading whitespace.
pub(crate) fn parse_leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let digits_from = |start: usize| {
        bytes
            .get(start..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_digits = digits_from(end);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = digits_from(end + 1);
        if integer_digits + fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }
    if integer_digits + fraction_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent_digits = digits_from(end + 1 + sign);
        if exponent_digits > 0 {
            end += 1 + sign + exponent_digits;
        }
    }

    trimmed
        .get(..end)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}
