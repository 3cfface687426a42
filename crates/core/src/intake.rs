//! Intake Form & Field Normalization
//!
//! The submission form as it travels over the write channel, plus the
//! normalization rules both ends apply to it. The lookup key is built from
//! the same rules, so a record written by the server is always findable by
//! the key the client polls with.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Maximum number of characters of the user-agent string that are kept.
pub const USER_AGENT_MAX_CHARS: usize = 200;

/// Source tag stored when the submitter did not send one.
pub const DEFAULT_SOURCE_LABEL: &str = "기타";

/// Raw intake form fields, named as they appear on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birthdate: String,
    #[serde(default)]
    pub birthtime: String,
    /// "solar" or "lunar"
    #[serde(default)]
    pub calendar_type: String,
    /// "male" or "female"
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub user_agent: String,
}

impl IntakeForm {
    /// Names of required fields that are empty after trimming, in form order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let required: [(&'static str, &str); 5] = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("birthdate", &self.birthdate),
            ("calendar_type", &self.calendar_type),
            ("gender", &self.gender),
        ];
        required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect()
    }

    /// Fail with `MissingFields` if any required field is blank.
    pub fn validate(&self) -> CoreResult<()> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::MissingFields(missing))
        }
    }

    /// Return a copy with every field trimmed, phone and birthdate
    /// normalized, and the user agent truncated.
    ///
    /// Calendar, gender and source keep their wire codes; mapping them to
    /// display labels happens where the record is stored.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: normalize_phone(&self.phone),
            birthdate: normalize_birthdate(&self.birthdate),
            birthtime: self.birthtime.trim().to_string(),
            calendar_type: self.calendar_type.trim().to_string(),
            gender: self.gender.trim().to_string(),
            memo: self.memo.trim().to_string(),
            source: self.source.trim().to_string(),
            user_agent: truncate_user_agent(&self.user_agent),
        }
    }

    /// The natural key this submission will be looked up by.
    pub fn lookup_key(&self) -> LookupKey {
        LookupKey::new(&self.phone, &self.birthdate)
    }
}

/// Natural lookup key: normalized phone + canonical birthdate.
///
/// Not unique; the newest matching record wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupKey {
    pub phone: String,
    pub birthdate: String,
}

impl LookupKey {
    /// Build a key, applying the submission-time normalization.
    pub fn new(phone: &str, birthdate: &str) -> Self {
        Self {
            phone: normalize_phone(phone),
            birthdate: normalize_birthdate(birthdate),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.phone.is_empty() && !self.birthdate.is_empty()
    }
}

/// Strip everything but ASCII digits.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize a birthdate to `yyyy-MM-dd`.
///
/// Accepts slash-separated (`1990/5/1`), dash-separated, and digits-only
/// (`19900501`) input. A leading apostrophe and a time suffix after `T` are
/// dropped, so values read back from storage compare equal. Anything else is
/// returned trimmed but otherwise unchanged.
pub fn normalize_birthdate(raw: &str) -> String {
    let mut value = raw.trim().trim_start_matches('\'').trim();
    if let Some((date, _time)) = value.split_once('T') {
        if is_iso_date(date) {
            value = date;
        }
    }

    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        return format!("{}-{}-{}", &value[0..4], &value[4..6], &value[6..8]);
    }

    for separator in ['/', '-'] {
        let parts: Vec<&str> = value.split(separator).collect();
        if let [year, month, day] = parts.as_slice() {
            if let Some(date) = pad_date_parts(year, month, day) {
                return date;
            }
        }
    }

    value.to_string()
}

/// `yyyy-MM-dd` shape check, digits only.
fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn pad_date_parts(year: &str, month: &str, day: &str) -> Option<String> {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if year.len() != 4 || month.len() > 2 || day.len() > 2 {
        return None;
    }
    if !(all_digits(year) && all_digits(month) && all_digits(day)) {
        return None;
    }
    Some(format!("{}-{:0>2}-{:0>2}", year, month, day))
}

/// Map a calendar code to its stored label. Unknown values pass through.
pub fn calendar_label(raw: &str) -> String {
    match raw.trim() {
        "solar" => "양력".to_string(),
        "lunar" => "음력".to_string(),
        other => other.to_string(),
    }
}

/// Map a gender code to its stored label. Unknown values pass through.
pub fn gender_label(raw: &str) -> String {
    match raw.trim() {
        "male" => "남성".to_string(),
        "female" => "여성".to_string(),
        other => other.to_string(),
    }
}

/// Map a submission channel tag to its stored label.
pub fn source_label(raw: &str) -> String {
    match raw.trim() {
        "" => DEFAULT_SOURCE_LABEL.to_string(),
        "github_pages" => "홈페이지".to_string(),
        other => other.to_string(),
    }
}

/// Keep at most [`USER_AGENT_MAX_CHARS`] characters.
pub fn truncate_user_agent(raw: &str) -> String {
    raw.chars().take(USER_AGENT_MAX_CHARS).collect()
}
