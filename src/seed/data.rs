use crate::model::{
    Audit, CommercialPotential, ExtendedDetail, FundingStep, Grant, GrantStatus, Id, Patent,
    PatentStatus, StepStatus,
};
use crate::store::traits::Store;
use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::info;

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow!("invalid seed date {}-{}-{}", y, m, d))
}

fn timestamp(y: i32, m: u32, d: u32) -> Result<DateTime<Utc>> {
    date(y, m, d)?
        .and_hms_opt(9, 30, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow!("invalid seed timestamp {}-{}-{}", y, m, d))
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Helper to build a seeded patent with system defaults for the optional dates
#[allow(clippy::too_many_arguments)]
fn create_patent(
    id: &str,
    title: &str,
    status: PatentStatus,
    inventors: &[&str],
    department: &str,
    technology_area: &str,
    filing_date: NaiveDate,
    commercial_potential: CommercialPotential,
    abstract_text: &str,
) -> Patent {
    Patent {
        id: id.to_string(),
        title: title.to_string(),
        abstract_text: abstract_text.to_string(),
        status,
        inventors: names(inventors),
        department: department.to_string(),
        technology_area: technology_area.to_string(),
        patent_number: None,
        application_number: format!("{}-{}", filing_date.format("%Y"), id.to_uppercase()),
        patent_office: "Indian Patent Office".to_string(),
        filing_type: "Complete Specification".to_string(),
        claims: 10,
        filing_date,
        publication_date: None,
        grant_date: None,
        commercial_potential,
        collaborators: "None".to_string(),
        extended: None,
    }
}

fn seed_patents() -> Result<Vec<Patent>> {
    let mut irrigation = create_patent(
        "pat-001",
        "IoT-Based Smart Irrigation Controller with Soil Moisture Prediction",
        PatentStatus::Granted,
        &["Dr. Meera Iyer", "Prof. Karthik Subramanian"],
        "Electronics and Communication",
        "Internet of Things",
        date(2021, 8, 12)?,
        CommercialPotential::VeryHigh,
        "A low-cost controller that schedules irrigation from predicted soil moisture, \
         cutting water usage for smallholder farms.",
    );
    irrigation.patent_number = Some("IN 412345".to_string());
    irrigation.publication_date = Some(date(2022, 2, 18)?);
    irrigation.grant_date = Some(date(2023, 11, 3)?);
    irrigation.claims = 14;
    irrigation.collaborators = "AgriTech Innovations Pvt. Ltd.".to_string();

    let mut accelerator = create_patent(
        "pat-002",
        "Low-Power Neural Network Accelerator for Edge Devices",
        PatentStatus::UnderExamination,
        &["Dr. Arjun Nair", "Sneha Kulkarni"],
        "Computer Science and Engineering",
        "Hardware Architecture",
        date(2023, 1, 24)?,
        CommercialPotential::High,
        "A systolic array design with sparse activation gating for inference on \
         battery-powered devices.",
    );
    accelerator.publication_date = Some(date(2023, 7, 28)?);
    accelerator.claims = 18;

    let mut packaging = create_patent(
        "pat-003",
        "Biodegradable Packaging Film from Agricultural Residue",
        PatentStatus::Published,
        &["Dr. Lakshmi Prasad"],
        "Chemical Engineering",
        "Sustainable Materials",
        date(2023, 5, 9)?,
        CommercialPotential::Medium,
        "A cellulose-based film extracted from rice straw with tensile strength \
         comparable to LDPE.",
    );
    packaging.publication_date = Some(date(2023, 11, 17)?);
    packaging.collaborators = "National Chemical Laboratory".to_string();

    let traffic = create_patent(
        "pat-004",
        "Adaptive Traffic Signal Timing Using Graph Neural Networks",
        PatentStatus::Filed,
        &["Prof. Ramesh Gowda", "Dr. Arjun Nair"],
        "Computer Science and Engineering",
        "Machine Learning",
        date(2023, 10, 2)?,
        CommercialPotential::High,
        "Signal timings are learned from a city-scale road graph and adapted to \
         live congestion.",
    );

    let mut prosthetic = create_patent(
        "pat-005",
        "Myoelectric Prosthetic Hand with Haptic Feedback",
        PatentStatus::Granted,
        &["Dr. Kavya Menon", "Dr. Lakshmi Prasad"],
        "Medical Electronics",
        "Biomedical Devices",
        date(2020, 3, 16)?,
        CommercialPotential::Low,
        "A three-finger prosthetic with vibrotactile feedback of grip force.",
    );
    prosthetic.patent_number = Some("IN 398812".to_string());
    prosthetic.grant_date = Some(date(2022, 9, 30)?);
    prosthetic.filing_type = "Provisional".to_string();

    Ok(vec![irrigation, accelerator, packaging, traffic, prosthetic])
}

fn seed_details() -> Result<Vec<(Id, ExtendedDetail)>> {
    let detail = |problem: &str, novelty: &str, created: DateTime<Utc>, updated: DateTime<Utc>| {
        ExtendedDetail {
            problem_statement: problem.to_string(),
            novelty: novelty.to_string(),
            audit: Audit {
                created_by: "IPR Cell".to_string(),
                created_at: created,
                updated_at: updated,
            },
        }
    };

    Ok(vec![
        (
            "pat-001".to_string(),
            detail(
                "Fixed irrigation schedules waste water and ignore rainfall.",
                "Moisture forecasting from a two-sensor probe and local weather data.",
                timestamp(2021, 8, 1)?,
                timestamp(2023, 11, 4)?,
            ),
        ),
        (
            "pat-002".to_string(),
            detail(
                "Edge inference drains batteries on always-on devices.",
                "Activation-sparsity gating at the processing-element level.",
                timestamp(2023, 1, 10)?,
                timestamp(2023, 8, 2)?,
            ),
        ),
    ])
}

fn seed_funding() -> Vec<(Id, Vec<FundingStep>)> {
    vec![
        (
            "pat-001".to_string(),
            vec![
                FundingStep::new("Prior Art Search", StepStatus::Completed, 50000.0, 45000.0, "Completed by external attorney"),
                FundingStep::new("Patent Drafting", StepStatus::Completed, 150000.0, 80000.0, ""),
                FundingStep::new("Maintenance Fees", StepStatus::Pending, 30000.0, 0.0, "Due annually"),
            ],
        ),
        (
            "pat-002".to_string(),
            vec![
                FundingStep::new("Prior Art Search", StepStatus::Completed, 40000.0, 42000.0, "Extended search on US filings"),
                FundingStep::new("Examination Response", StepStatus::InProgress, 60000.0, 15000.0, ""),
            ],
        ),
        (
            "pat-004".to_string(),
            vec![FundingStep::new("Provisional Filing", StepStatus::NotStarted, 25000.0, 0.0, "")],
        ),
    ]
}

fn seed_grants() -> Result<Vec<Grant>> {
    let grant = |id: &str,
                 title: &str,
                 pi: &str,
                 agency: &str,
                 amount: f64,
                 status: GrantStatus,
                 start: NaiveDate,
                 end: NaiveDate,
                 duration: &str,
                 utilization: u8,
                 area: &str| Grant {
        id: id.to_string(),
        title: title.to_string(),
        principal_investigator: pi.to_string(),
        agency: agency.to_string(),
        amount,
        status,
        start_date: start,
        end_date: end,
        duration: duration.to_string(),
        utilization,
        research_area: area.to_string(),
    };

    Ok(vec![
        grant(
            "grant-001",
            "Precision Agriculture Sensor Networks",
            "Dr. Meera Iyer",
            "Department of Science and Technology",
            4_500_000.0,
            GrantStatus::Active,
            date(2022, 4, 1)?,
            date(2025, 3, 31)?,
            "3 years",
            65,
            "Internet of Things",
        ),
        grant(
            "grant-002",
            "Energy-Efficient Edge AI Hardware",
            "Dr. Arjun Nair",
            "Science and Engineering Research Board",
            3_200_000.0,
            GrantStatus::Active,
            date(2023, 1, 1)?,
            date(2025, 12, 31)?,
            "3 years",
            30,
            "Hardware Architecture",
        ),
        grant(
            "grant-003",
            "Agro-Waste Derived Bioplastics",
            "Dr. Lakshmi Prasad",
            "Department of Biotechnology",
            2_000_000.0,
            GrantStatus::Completed,
            date(2019, 7, 1)?,
            date(2022, 6, 30)?,
            "3 years",
            100,
            "Sustainable Materials",
        ),
        grant(
            "grant-004",
            "Assistive Prosthetics for Rural Clinics",
            "Dr. Kavya Menon",
            "Indian Council of Medical Research",
            1_500_000.0,
            GrantStatus::Pending,
            date(2024, 4, 1)?,
            date(2026, 3, 31)?,
            "2 years",
            0,
            "Biomedical Devices",
        ),
    ])
}

/// Load the demonstration catalog into a store.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    let patents = seed_patents()?;
    let patent_count = patents.len();
    for patent in patents {
        store.upsert_patent(patent).await?;
    }

    for (id, detail) in seed_details()? {
        store.stage_extended_detail(&id, detail).await?;
    }

    for (id, steps) in seed_funding() {
        if !store.replace_funding(&id, steps).await? {
            return Err(anyhow!("seed funding references unknown patent '{}'", id));
        }
    }

    let grants = seed_grants()?;
    let grant_count = grants.len();
    for grant in grants {
        store.upsert_grant(grant).await?;
    }

    info!("Seeded {} patents and {} grants", patent_count, grant_count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::compute_aggregate;
    use crate::store::{FundingStore, GrantStore, MemoryStore, PatentStore};

    #[tokio::test]
    async fn test_seed_loads_into_memory_store() {
        let store = MemoryStore::new();
        load_seed_data(&store).await.unwrap();

        assert_eq!(store.list_patents().await.unwrap().len(), 5);
        assert_eq!(store.list_grants().await.unwrap().len(), 4);

        let steps = store.get_funding(&"pat-001".to_string()).await.unwrap().unwrap();
        let aggregate = compute_aggregate(&steps);
        assert_eq!(aggregate.total_budget, 230000.0);
        assert_eq!(aggregate.amount_spent, 125000.0);
    }

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let store = MemoryStore::new();
        load_seed_data(&store).await.unwrap();
        load_seed_data(&store).await.unwrap();
        assert_eq!(store.list_patents().await.unwrap().len(), 5);
    }
}
