use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::utils::validator::ConfigValidator;

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("failed to read resume {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing YAML file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid email address '{0}' in personal information")]
    InvalidEmail(String),

    #[error("zip code '{0}' must be between 5 and 10 characters long")]
    InvalidZipCode(String),

    #[error("'{field}' must be an http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInformation {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub date_of_birth: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
    pub phone_prefix: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

impl PersonalInformation {
    pub fn validate(&self) -> Result<(), ResumeError> {
        if let Some(email) = &self.email
            && !ConfigValidator::validate_email(email)
        {
            return Err(ResumeError::InvalidEmail(email.clone()));
        }

        if let Some(zip_code) = &self.zip_code
            && !(5..=10).contains(&zip_code.chars().count())
        {
            return Err(ResumeError::InvalidZipCode(zip_code.clone()));
        }

        validate_url("github", self.github.as_deref())?;
        validate_url("linkedin", self.linkedin.as_deref())?;

        Ok(())
    }

    pub fn full_name(&self) -> String {
        [self.name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for PersonalInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("name", &self.name),
            ("surname", &self.surname),
            ("date_of_birth", &self.date_of_birth),
            ("country", &self.country),
            ("city", &self.city),
            ("address", &self.address),
            ("zip_code", &self.zip_code),
            ("phone_prefix", &self.phone_prefix),
            ("phone", &self.phone),
            ("email", &self.email),
            ("github", &self.github),
            ("linkedin", &self.linkedin),
        ];

        let rendered = fields
            .iter()
            .map(|(key, value)| match value {
                Some(value) => format!("{}='{}'", key, value),
                None => format!("{}=None", key),
            })
            .collect::<Vec<_>>()
            .join(" ");

        f.write_str(&rendered)
    }
}

fn validate_url(field: &'static str, value: Option<&str>) -> Result<(), ResumeError> {
    let Some(value) = value else {
        return Ok(());
    };

    match reqwest::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ResumeError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}

/// One exam result. Serialized as a single-key mapping (`{name: grade}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exam {
    pub name: String,
    pub grade: String,
}

impl Exam {
    pub fn new(name: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grade: grade.into(),
        }
    }
}

impl Serialize for Exam {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.grade)?;
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExamInput {
    Single(Mapping),
    Many(Vec<Mapping>),
}

/// Accepts `exam` either as one mapping or as a list of mappings and flattens
/// it into single-key entries, keeping document order.
fn deserialize_exams<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Exam>, D::Error> {
    let exams = match Option::<ExamInput>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(ExamInput::Single(mapping)) => mapping_to_exams(&mapping),
        Some(ExamInput::Many(mappings)) => mappings.iter().flat_map(mapping_to_exams).collect(),
    };

    Ok(exams)
}

fn mapping_to_exams(mapping: &Mapping) -> Vec<Exam> {
    mapping
        .iter()
        .map(|(name, grade)| Exam::new(scalar_text(name), scalar_text(grade)))
        .collect()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearInput {
    Number(i64),
    Text(String),
}

fn deserialize_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<YearInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(YearInput::Number(year)) => Ok(Some(year)),
        Some(YearInput::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(YearInput::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid year '{}'", text))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationDetails {
    pub education_level: Option<String>,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    pub final_evaluation_grade: Option<String>,
    pub start_date: Option<String>,
    #[serde(deserialize_with = "deserialize_year")]
    pub year_of_completion: Option<i64>,
    #[serde(deserialize_with = "deserialize_exams")]
    pub exam: Vec<Exam>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResponsibilityInput {
    Text(String),
    Keyed(Mapping),
}

/// Responsibilities come as `- responsibility: text` mappings in most resumes,
/// but plain strings are accepted too.
fn deserialize_responsibilities<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    let items = Option::<Vec<ResponsibilityInput>>::deserialize(deserializer)?.unwrap_or_default();

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            ResponsibilityInput::Text(text) => Some(text),
            ResponsibilityInput::Keyed(mapping) => mapping
                .get("responsibility")
                .or_else(|| mapping.values().next())
                .map(scalar_text),
        })
        .collect())
}

fn deserialize_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceDetails {
    pub position: Option<String>,
    pub company: Option<String>,
    pub employment_period: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    #[serde(deserialize_with = "deserialize_responsibilities")]
    pub key_responsibilities: Vec<String>,
    #[serde(deserialize_with = "deserialize_list")]
    pub skills_acquired: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", text(&self.name), text(&self.description))?;
        if let Some(link) = &self.link {
            write!(f, " ({})", link)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", text(&self.name), text(&self.description))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl fmt::Display for Certification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", text(&self.name), text(&self.description))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub language: Option<String>,
    pub proficiency: Option<String>,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", text(&self.language), text(&self.proficiency))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Availability {
    pub notice_period: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryExpectations {
    pub salary_range_usd: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfIdentification {
    pub gender: Option<String>,
    pub pronouns: Option<String>,
    pub veteran: Option<String>,
    pub disability: Option<String>,
    pub ethnicity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalAuthorization {
    pub eu_work_authorization: Option<String>,
    pub us_work_authorization: Option<String>,
    pub requires_us_visa: Option<String>,
    pub requires_us_sponsorship: Option<String>,
    pub requires_eu_visa: Option<String>,
    pub legally_allowed_to_work_in_eu: Option<String>,
    pub legally_allowed_to_work_in_us: Option<String>,
    pub requires_eu_sponsorship: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resume {
    pub personal_information: Option<PersonalInformation>,
    pub education_details: Option<Vec<EducationDetails>>,
    pub experience_details: Option<Vec<ExperienceDetails>>,
    pub projects: Option<Vec<Project>>,
    pub achievements: Option<Vec<Achievement>>,
    pub certifications: Option<Vec<Certification>>,
    pub languages: Option<Vec<Language>>,
    pub interests: Option<Vec<String>>,
    pub availability: Option<Availability>,
    pub salary_expectations: Option<SalaryExpectations>,
    pub self_identification: Option<SelfIdentification>,
    pub legal_authorization: Option<LegalAuthorization>,
}

impl Resume {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ResumeError> {
        let resume: Resume = serde_yaml::from_str(yaml)?;
        resume.validate()?;
        Ok(resume)
    }

    pub fn load(path: &Path) -> Result<Self, ResumeError> {
        let raw = fs::read_to_string(path).map_err(|source| ResumeError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let resume = Self::from_yaml_str(&raw)?;
        debug!("loaded resume from {}", path.display());
        Ok(resume)
    }

    pub fn validate(&self) -> Result<(), ResumeError> {
        if let Some(personal) = &self.personal_information {
            personal.validate()?;
        }

        for project in self.projects.iter().flatten() {
            validate_url("projects.link", project.link.as_deref())?;
        }

        Ok(())
    }

    /// Deterministic plain-text rendering used as LLM context.
    pub fn to_plain_text(&self) -> String {
        let personal = self
            .personal_information
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "None".to_string());

        format!(
            "Personal Information: {}\n\n\
             Education Details:\n{}\n\n\
             Experience Details:\n{}\n\n\
             Projects:\n{}\n\n\
             Achievements:\n{}\n\n\
             Certifications:\n{}\n\n\
             Languages:\n{}\n\n\
             Interests:\n{}",
            personal,
            format_blocks(self.education_details.as_deref(), education_block),
            format_blocks(self.experience_details.as_deref(), experience_block),
            format_list(self.projects.as_deref()),
            format_list(self.achievements.as_deref()),
            format_list(self.certifications.as_deref()),
            format_list(self.languages.as_deref()),
            format_list(self.interests.as_deref()),
        )
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

fn joined_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn format_list<T: fmt::Display>(items: Option<&[T]>) -> String {
    match items {
        Some(items) if !items.is_empty() => items
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => "None".to_string(),
    }
}

fn format_blocks<T>(items: Option<&[T]>, block: fn(&T) -> String) -> String {
    match items {
        Some(items) if !items.is_empty() => {
            items.iter().map(block).collect::<Vec<_>>().join("\n\n")
        }
        _ => "None".to_string(),
    }
}

fn education_block(detail: &EducationDetails) -> String {
    let exams = if detail.exam.is_empty() {
        "None".to_string()
    } else {
        detail
            .exam
            .iter()
            .map(|exam| format!("{}: {}", exam.name, exam.grade))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Education Level: {}\n\
         Institution: {}\n\
         Field of Study: {}\n\
         Final Evaluation Grade: {}\n\
         Start Date: {}\n\
         Year of Completion: {}\n\
         Exams: {}",
        text(&detail.education_level),
        text(&detail.institution),
        text(&detail.field_of_study),
        text(&detail.final_evaluation_grade),
        text(&detail.start_date),
        detail
            .year_of_completion
            .map(|year| year.to_string())
            .unwrap_or_else(|| "None".to_string()),
        exams,
    )
}

fn experience_block(detail: &ExperienceDetails) -> String {
    format!(
        "Position: {}\n\
         Company: {}\n\
         Employment Period: {}\n\
         Location: {}\n\
         Industry: {}\n\
         Key Responsibilities: {}\n\
         Skills Acquired: {}",
        text(&detail.position),
        text(&detail.company),
        text(&detail.employment_period),
        text(&detail.location),
        text(&detail.industry),
        joined_or_none(&detail.key_responsibilities),
        joined_or_none(&detail.skills_acquired),
    )
}
