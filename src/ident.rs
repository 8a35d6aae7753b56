//! Identifier normalization for generated names.
//!
//! Schema names such as `config-var`, `app_id` or `#/definitions/oauth-token`
//! are split on punctuation, camel-cased and acronym-corrected:
//!
//! | Input | `initial_cap` | `initial_low` |
//! |-------|---------------|---------------|
//! | `config-var` | `ConfigVar` | `configVar` |
//! | `user_id` | `UserID` | `userID` |
//! | `oauth-client` | `OAuthClient` | `oauthClient` |

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SchemaError;

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-.$/:_{}\s]").expect("separator pattern is valid"));

static ACRONYMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(Url|Http|Id|Io|Uuid|Api|Uri|Ssl|Cname|Oauth|Otp)$")
        .expect("acronym pattern is valid")
});

/// Normalize `raw` into a camel-cased identifier.
///
/// When `capitalize_first` is false the first segment keeps its original case.
///
/// # Errors
///
/// Returns `SchemaError::InvalidIdentifier` if `raw` is empty.
pub fn normalize(raw: &str, capitalize_first: bool) -> Result<String, SchemaError> {
    if raw.is_empty() {
        return Err(SchemaError::InvalidIdentifier);
    }

    let mut out = String::with_capacity(raw.len());
    for (i, segment) in SEPARATORS.split(raw).enumerate() {
        let segment = if capitalize_first || i > 0 {
            cap_first(segment)
        } else {
            segment.to_string()
        };
        out.push_str(&fix_acronym(&segment));
    }
    Ok(out)
}

/// Exported form: `config-var` → `ConfigVar`.
pub fn initial_cap(ident: &str) -> Result<String, SchemaError> {
    normalize(ident, true)
}

/// Unexported form: `config-var` → `configVar`.
pub fn initial_low(ident: &str) -> Result<String, SchemaError> {
    normalize(ident, false)
}

/// Method form: lower-cases the input first so `GetItem` and `getItem` agree.
pub fn method_cap(ident: &str) -> Result<String, SchemaError> {
    initial_cap(&ident.to_lowercase())
}

fn cap_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fix_acronym(segment: &str) -> String {
    let Some(m) = ACRONYMS.find(segment) else {
        return segment.to_string();
    };
    let acronym = m.as_str();
    let fixed = if acronym.len() > 4 {
        format!("{}{}", acronym[..2].to_uppercase(), &acronym[2..])
    } else {
        acronym.to_uppercase()
    };
    format!("{}{}", &segment[..m.start()], fixed)
}
