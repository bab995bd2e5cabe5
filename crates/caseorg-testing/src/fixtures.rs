//! Sample data shared by tests.

use caseorg_types::{
    CaseLawFilters, CaseLawRecord, CaseLawResults, CaseSelection, DirFile, DirListing, DirPath,
    SearchResultRecord,
};

use crate::backend::FakeBackend;

/// Template the fake backend offers for cases without a note
pub const NOTE_TEMPLATE: &str = r#"{"Client": "", "Stage": "", "Note": ""}"#;

pub const DOE_NOTE: &str = r#"{"Client": "Doe", "Stage": "Admission", "Note": "Hearing on 14 Mar\nBring vakalatnama"}"#;

pub fn doe_v_roe() -> CaseSelection {
    CaseSelection::new("2024", "Mar", "Doe v. Roe")
}

/// Three file hits across two cases
pub fn search_results() -> Vec<SearchResultRecord> {
    vec![
        SearchResultRecord::new("Vakalatnama.pdf", "2024/Mar/Doe v. Roe/Vakalatnama.pdf")
            .with_rel("2024/Mar/Doe v. Roe"),
        SearchResultRecord::new(
            "Order dated 11.03.2024.pdf",
            "2024/Mar/Doe v. Roe/Orders/Order dated 11.03.2024.pdf",
        )
        .with_rel("2024/Mar/Doe v. Roe/Orders"),
        SearchResultRecord::new(
            "Charge sheet.docx",
            "2024/Mar/State v. Kumar/Primary Documents/Charge sheet.docx",
        )
        .with_rel("2024/Mar/State v. Kumar/Primary Documents"),
    ]
}

/// Listing of `2024/Mar`
pub fn case_month_listing() -> DirListing {
    DirListing {
        dirs: vec!["Doe v. Roe".to_string(), "State v. Kumar".to_string()],
        files: Vec::new(),
        error: None,
    }
}

/// Listing of the Doe v. Roe case folder
pub fn case_folder_listing() -> DirListing {
    DirListing {
        dirs: vec!["Orders".to_string()],
        files: vec![
            DirFile {
                name: "Note.json".to_string(),
                path: "2024/Mar/Doe v. Roe/Note.json".to_string(),
            },
            DirFile {
                name: "Vakalatnama.pdf".to_string(),
                path: "2024/Mar/Doe v. Roe/Vakalatnama.pdf".to_string(),
            },
        ],
        error: None,
    }
}

fn judgement(id: i64, petitioner: &str, respondent: &str, citation: &str, year: i64) -> CaseLawRecord {
    CaseLawRecord {
        id,
        petitioner: petitioner.to_string(),
        respondent: respondent.to_string(),
        citation: citation.to_string(),
        decision_year: Some(year),
        decision_month: None,
        primary_type: Some("Constitutional".to_string()),
        case_type: None,
        folder: None,
        file_name: None,
        note_preview: String::new(),
        text_preview: String::new(),
        download_url: None,
    }
}

pub fn case_law_results() -> CaseLawResults {
    CaseLawResults {
        results: vec![
            judgement(
                1,
                "Kesavananda Bharati",
                "State of Kerala",
                "(1973) 4 SCC 225",
                1973,
            ),
            judgement(2, "Maneka Gandhi", "Union of India", "(1978) 1 SCC 248", 1978),
        ],
        filters: CaseLawFilters {
            years: vec!["1973".to_string(), "1978".to_string()],
        },
        error: None,
    }
}

/// Years 2023 and 2024; `2024/Mar` holds "Doe v. Roe" (with a note) and
/// "State v. Kumar" (without one).
pub async fn seed_doe_v_roe(backend: &FakeBackend) {
    backend.set_years(&["2023", "2024"]).await;
    backend.set_months("2023", &["Dec"]).await;
    backend.set_months("2024", &["Jan", "Mar"]).await;
    backend.set_cases("2023", "Dec", &["Acme v. Zenith"]).await;
    backend
        .set_cases("2024", "Mar", &["Doe v. Roe", "State v. Kumar"])
        .await;
    backend.set_note(doe_v_roe(), DOE_NOTE).await;
    backend
        .set_dir(DirPath::parse("2024/Mar"), case_month_listing())
        .await;
    backend
        .set_dir(DirPath::parse("2024/Mar/Doe v. Roe"), case_folder_listing())
        .await;
    backend.set_search_results(search_results()).await;
}
