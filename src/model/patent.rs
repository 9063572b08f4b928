use crate::model::Id;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatentStatus {
    Filed,
    Published,
    #[serde(rename = "Under Examination")]
    UnderExamination,
    Granted,
}

impl PatentStatus {
    pub const ALL: [PatentStatus; 4] = [
        PatentStatus::Granted,
        PatentStatus::Published,
        PatentStatus::UnderExamination,
        PatentStatus::Filed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatentStatus::Filed => "Filed",
            PatentStatus::Published => "Published",
            PatentStatus::UnderExamination => "Under Examination",
            PatentStatus::Granted => "Granted",
        }
    }

    /// Published and under-examination filings are both awaiting a decision.
    pub fn is_under_review(&self) -> bool {
        matches!(
            self,
            PatentStatus::Published | PatentStatus::UnderExamination
        )
    }
}

impl fmt::Display for PatentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown patent status '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommercialPotential {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Medium,
    Low,
}

/// Display-only audit trail attached with the extended detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedDetail {
    pub problem_statement: String,
    pub novelty: String,
    pub audit: Audit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patent {
    pub id: Id,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub status: PatentStatus,
    pub inventors: Vec<String>,
    pub department: String,
    pub technology_area: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patent_number: Option<String>,
    pub application_number: String,
    pub patent_office: String,
    pub filing_type: String,
    pub claims: u32,
    pub filing_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_date: Option<NaiveDate>,
    pub commercial_potential: CommercialPotential,
    pub collaborators: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended: Option<ExtendedDetail>,
}

impl Patent {
    /// Attach extended detail on first detailed view.
    ///
    /// Returns `true` when the detail was attached. A record that already
    /// carries extended detail is left untouched so edits made since the
    /// first attach survive.
    pub fn attach_extended_detail(&mut self, detail: ExtendedDetail) -> bool {
        if self.extended.is_some() {
            return false;
        }
        self.extended = Some(detail);
        true
    }

    pub fn is_extended(&self) -> bool {
        self.extended.is_some()
    }

    /// Apply a partial update. Extended fields require the record to be
    /// extended already; callers attach the detail first.
    pub fn apply_update(&mut self, update: &PatentUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(abstract_text) = &update.abstract_text {
            self.abstract_text = abstract_text.clone();
        }
        if let Some(extended) = self.extended.as_mut() {
            if let Some(problem) = &update.problem_statement {
                extended.problem_statement = problem.clone();
            }
            if let Some(novelty) = &update.novelty {
                extended.novelty = novelty.clone();
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatentUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub problem_statement: Option<String>,
    #[serde(default)]
    pub novelty: Option<String>,
}

impl PatentUpdate {
    pub fn touches_extended(&self) -> bool {
        self.problem_statement.is_some() || self.novelty.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.abstract_text.is_none()
            && self.problem_statement.is_none()
            && self.novelty.is_none()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{detail, patent};
    use super::*;

    #[test]
    fn test_status_round_trips_display_names() {
        let json = serde_json::to_string(&PatentStatus::UnderExamination).unwrap();
        assert_eq!(json, "\"Under Examination\"");
        assert_eq!(
            "under examination".parse::<PatentStatus>().unwrap(),
            PatentStatus::UnderExamination
        );
        assert!("Abandoned".parse::<PatentStatus>().is_err());
    }

    #[test]
    fn test_extension_is_idempotent_across_edits() {
        let mut p = patent("p1", "Sensor Array", PatentStatus::Filed);
        assert!(p.attach_extended_detail(detail("original problem")));
        let once = p.clone();

        let update = PatentUpdate {
            problem_statement: Some("edited problem".to_string()),
            ..Default::default()
        };
        p.apply_update(&update);

        assert!(!p.attach_extended_detail(detail("original problem")));
        let extended = p.extended.as_ref().unwrap();
        assert_eq!(extended.problem_statement, "edited problem");
        assert_eq!(extended.audit, once.extended.unwrap().audit);
    }

    #[test]
    fn test_update_ignores_extended_fields_before_attach() {
        let mut p = patent("p1", "Sensor Array", PatentStatus::Filed);
        let update = PatentUpdate {
            title: Some("Sensor Grid".to_string()),
            novelty: Some("ignored".to_string()),
            ..Default::default()
        };
        p.apply_update(&update);
        assert_eq!(p.title, "Sensor Grid");
        assert!(p.extended.is_none());
    }

    #[test]
    fn test_abstract_serializes_under_its_display_name() {
        let p = patent("p1", "Sensor Array", PatentStatus::Granted);
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["abstract"], "Abstract for Sensor Array");
        assert!(value.get("extended").is_none());
    }
}
