use log::debug;
use serde::{Deserialize, Serialize};

/// A job posting found by the agent, scored against the applicant profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default)]
    pub apply_method: Option<String>,
    #[serde(default)]
    pub summarize_job_description: String,
    #[serde(default)]
    pub recruiter_link: Option<String>,
    pub fit_score: f64,
}

impl Job {
    pub fn formatted_job_information(&self) -> String {
        debug!("formatting job information for {} at {}", self.role, self.company);

        let formatted = format!(
            "# Job Description\n\
             ## Job Information\n\
             - Position: {}\n\
             - At: {}\n\
             - Location: {}\n\
             - Recruiter Profile: {}\n\
             \n\
             ## Description\n\
             {}\n\
             \n\
             ## Responsibilities\n\
             {}",
            self.role,
            self.company,
            self.location.as_deref().unwrap_or("None"),
            self.recruiter_link.as_deref().unwrap_or("Not available"),
            non_empty_or(&self.description, "No description provided."),
            non_empty_or(&self.responsibilities, "No description provided."),
        );

        debug!("formatted job information: {}", formatted);
        formatted
    }

    /// Field values in declaration order, as written to the jobs file.
    pub fn csv_record(&self) -> Vec<String> {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();

        vec![
            self.role.clone(),
            self.company.clone(),
            optional(&self.location),
            optional(&self.salary),
            self.link.clone(),
            self.description.clone(),
            self.responsibilities.clone(),
            optional(&self.apply_method),
            self.summarize_job_description.clone(),
            optional(&self.recruiter_link),
            self.fit_score.to_string(),
        ]
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}
