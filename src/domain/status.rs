//! Case status enum. Any status may follow any other; there is no
//! transition table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    #[serde(rename = "New")]
    New,
    #[serde(rename = "In Follow-up")]
    InFollowUp,
    #[serde(rename = "Partially Paid")]
    PartiallyPaid,
    #[serde(rename = "Closed")]
    Closed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InFollowUp => "In Follow-up",
            Self::PartiallyPaid => "Partially Paid",
            Self::Closed => "Closed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "New" => Some(Self::New),
            "In Follow-up" => Some(Self::InFollowUp),
            "Partially Paid" => Some(Self::PartiallyPaid),
            "Closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::New, Self::InFollowUp, Self::PartiallyPaid, Self::Closed]
    }
}

impl Default for CaseStatus {
    fn default() -> Self {
        Self::New
    }
}

impl rusqlite::ToSql for CaseStatus {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl rusqlite::types::FromSql for CaseStatus {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::from_str(s).ok_or_else(|| {
            rusqlite::types::FromSqlError::Other(format!("unknown case status {s:?}").into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_display_names() {
        assert_eq!(
            serde_json::to_string(&CaseStatus::InFollowUp).unwrap(),
            "\"In Follow-up\""
        );
        let s: CaseStatus = serde_json::from_str("\"Partially Paid\"").unwrap();
        assert_eq!(s, CaseStatus::PartiallyPaid);
    }

    #[test]
    fn rejects_variant_identifiers() {
        assert!(serde_json::from_str::<CaseStatus>("\"InFollowUp\"").is_err());
        assert!(serde_json::from_str::<CaseStatus>("\"closed\"").is_err());
    }

    #[test]
    fn default_is_new() {
        assert_eq!(CaseStatus::default(), CaseStatus::New);
    }
}
