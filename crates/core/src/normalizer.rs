//! Extraction and validation of idea records from raw generation-backend text.
//!
//! The backend is asked for a JSON object but routinely wraps it in a markdown
//! code fence (`` ```json ... ``` ``), sometimes with prose around it. This
//! module strips the fence, parses the remainder and validates every field
//! before an [`IdeaRecord`] is built. It performs no I/O.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::idea::{score_in_range, Category, IdeaRecord, ViabilityBreakdown, SCORE_MAX, SCORE_MIN};

/// Markdown code-fence delimiter.
const FENCE: &str = "```";

/// Why a raw response could not be turned into an [`IdeaRecord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The text (after fence stripping) is not a JSON object.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The JSON object is missing a field, or a field has the wrong type or range.
    #[error("invalid field `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl From<NormalizeError> for CoreError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Malformed(msg) => CoreError::MalformedResponse(msg),
            NormalizeError::Invalid { field, reason } => CoreError::InvalidRecord { field, reason },
        }
    }
}

/// Strip an optional markdown code fence (and its language tag) from `raw`.
///
/// Text before the opening fence and after the closing fence is discarded.
/// Input without a fence is returned trimmed.
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(open) = trimmed.find(FENCE) else {
        return trimmed;
    };

    let after_open = &trimmed[open + FENCE.len()..];
    let tag_len = after_open
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after_open.len());
    let body = &after_open[tag_len..];

    let body = match closing_fence(body) {
        Some(close) => &body[..close],
        None => body,
    };
    body.trim()
}

/// Offset of the fence closing a fenced object: the first fence preceded by
/// the object's closing brace. A fence inside a string value (e.g. a
/// description quoting markdown) is skipped. Without such a fence, the first
/// fence closes the block.
fn closing_fence(body: &str) -> Option<usize> {
    let mut first = None;
    let mut from = 0;
    while let Some(pos) = body[from..].find(FENCE) {
        let at = from + pos;
        if body[..at].trim_end().ends_with('}') {
            return Some(at);
        }
        first.get_or_insert(at);
        from = at + FENCE.len();
    }
    first
}

/// Parse and validate a raw backend response into an [`IdeaRecord`].
///
/// `source` is attached verbatim; it is never read from the response text.
pub fn normalize(raw: &str, source: &str) -> Result<IdeaRecord, NormalizeError> {
    let body = strip_fences(raw);
    if body.is_empty() {
        return Err(NormalizeError::Malformed("response is empty".into()));
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| NormalizeError::Malformed(e.to_string()))?;
    let Value::Object(obj) = value else {
        return Err(NormalizeError::Malformed("expected a JSON object".into()));
    };

    let name = required_str(&obj, "name", "name")?;
    if name.is_empty() {
        return Err(invalid("name", "must not be empty"));
    }
    let description = required_str(&obj, "description", "description")?;

    let category_label = required_str(&obj, "category", "category")?;
    let category = Category::from_label(&category_label).ok_or_else(|| {
        invalid(
            "category",
            format!(
                "must be one of {}, got \"{category_label}\"",
                Category::labels()
            ),
        )
    })?;

    let genre = required_str(&obj, "genre", "genre")?;
    let viability = required_score(&obj, "viability", "viability")?;

    let breakdown = match obj.get("viabilityBreakdown") {
        None | Some(Value::Null) => return Err(invalid("viabilityBreakdown", "is missing")),
        Some(Value::Object(inner)) => inner,
        Some(_) => return Err(invalid("viabilityBreakdown", "must be an object")),
    };
    let viability_breakdown = ViabilityBreakdown {
        originality: required_score(breakdown, "originality", "viabilityBreakdown.originality")?,
        market_appeal: required_score(
            breakdown,
            "marketAppeal",
            "viabilityBreakdown.marketAppeal",
        )?,
        scope: required_score(breakdown, "scope", "viabilityBreakdown.scope")?,
    };

    Ok(IdeaRecord {
        name,
        description,
        category,
        genre,
        viability,
        viability_breakdown,
        source: source.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn invalid(field: &str, reason: impl Into<String>) -> NormalizeError {
    NormalizeError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn required_str(obj: &Map<String, Value>, key: &str, path: &str) -> Result<String, NormalizeError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(invalid(path, "is missing")),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(invalid(path, "must be a string")),
    }
}

fn required_score(obj: &Map<String, Value>, key: &str, path: &str) -> Result<i32, NormalizeError> {
    let value = match obj.get(key) {
        None | Some(Value::Null) => return Err(invalid(path, "is missing")),
        Some(v) => v,
    };
    let score = value
        .as_i64()
        .ok_or_else(|| invalid(path, "must be an integer"))?;
    if !score_in_range(score) {
        return Err(invalid(
            path,
            format!("must be between {SCORE_MIN} and {SCORE_MAX}, got {score}"),
        ));
    }
    // In range, so the narrowing cannot truncate.
    Ok(score as i32)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
