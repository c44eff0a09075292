//! Sort options for case listings.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSortBy {
    #[default]
    CreatedAt,
    DueDate,
}

impl CaseSortBy {
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::DueDate => "due_date",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(CaseSortBy::default(), CaseSortBy::CreatedAt);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn wire_names() {
        let s: CaseSortBy = serde_json::from_str("\"due_date\"").unwrap();
        assert_eq!(s.column(), "due_date");
        let o: SortOrder = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(o.as_sql(), "ASC");
        assert!(serde_json::from_str::<CaseSortBy>("\"amount\"").is_err());
        assert!(serde_json::from_str::<SortOrder>("\"ASC\"").is_err());
    }
}
