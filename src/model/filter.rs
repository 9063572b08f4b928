use crate::model::PatentStatus;

/// Status part of a catalog filter. `All` disables status filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PatentStatus),
}

impl StatusFilter {
    /// Parse the value of a `status` query parameter. Missing, empty and
    /// `All` (any case) all mean no status filter.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw.map(str::trim) {
            None | Some("") => Ok(StatusFilter::All),
            Some(value) if value.eq_ignore_ascii_case("all") => Ok(StatusFilter::All),
            Some(value) => value.parse::<PatentStatus>().map(StatusFilter::Only),
        }
    }

    pub fn admits(&self, status: PatentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatentFilter {
    pub q: String,
    pub status: StatusFilter,
}

impl PatentFilter {
    pub fn new(q: &str, status: StatusFilter) -> Self {
        Self {
            q: q.to_string(),
            status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrantFilter {
    pub q: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!(StatusFilter::parse(None).unwrap(), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some("  ")).unwrap(), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some("ALL")).unwrap(), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse(Some("Granted")).unwrap(),
            StatusFilter::Only(PatentStatus::Granted)
        );
        assert_eq!(
            StatusFilter::parse(Some(" under examination ")).unwrap(),
            StatusFilter::Only(PatentStatus::UnderExamination)
        );
        assert!(StatusFilter::parse(Some("Lapsed")).is_err());
    }

    #[test]
    fn test_all_admits_every_status() {
        for status in PatentStatus::ALL {
            assert!(StatusFilter::All.admits(status));
        }
        assert!(!StatusFilter::Only(PatentStatus::Filed).admits(PatentStatus::Granted));
    }
}
