/// One job posting as returned by the search service.
///
/// Postings are copied into tailoring records when a batch starts and are
/// never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobPosting {
    /// Opaque identifier assigned by the search service.
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted_date: Option<String>,
    pub description: String,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub salary: Option<String>,
    pub posting_url: String,
    pub logo_url: Option<String>,
    pub applicant_count: Option<u64>,
}
