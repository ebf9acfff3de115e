use serde::{Deserialize, Serialize};

use crate::utils::misc::bool_label;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceLevel {
    pub internship: bool,
    pub entry: bool,
    pub associate: bool,
    pub mid_senior_level: bool,
    pub director: bool,
    pub executive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTypes {
    pub full_time: bool,
    pub contract: bool,
    pub part_time: bool,
    pub temporary: bool,
    pub internship: bool,
    pub other: bool,
    pub volunteer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFilter {
    pub all_time: bool,
    pub month: bool,
    pub week: bool,
    pub hours_24: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPreferences {
    pub remote: bool,
    pub hybrid: bool,
    pub onsite: bool,
    pub experience_level: ExperienceLevel,
    pub job_types: JobTypes,
    pub date: DateFilter,
    pub positions: Vec<String>,
    pub locations: Vec<String>,
    pub apply_once_at_company: bool,
    pub distance: u32,
    #[serde(default)]
    pub company_blacklist: Vec<String>,
    #[serde(default)]
    pub title_blacklist: Vec<String>,
    #[serde(default)]
    pub location_blacklist: Vec<String>,
}

impl JobPreferences {
    pub fn to_plain_text(&self) -> String {
        let level = &self.experience_level;
        let types = &self.job_types;
        let date = &self.date;

        let lines = [
            format!("Remote: {}", bool_label(self.remote)),
            format!("Hybrid: {}", bool_label(self.hybrid)),
            format!("Onsite: {}", bool_label(self.onsite)),
            "Experience Level:".to_string(),
            format!("  Internship: {}", bool_label(level.internship)),
            format!("  Entry: {}", bool_label(level.entry)),
            format!("  Associate: {}", bool_label(level.associate)),
            format!("  Mid-Senior Level: {}", bool_label(level.mid_senior_level)),
            format!("  Director: {}", bool_label(level.director)),
            format!("  Executive: {}", bool_label(level.executive)),
            "Job Types:".to_string(),
            format!("  Full Time: {}", bool_label(types.full_time)),
            format!("  Contract: {}", bool_label(types.contract)),
            format!("  Part Time: {}", bool_label(types.part_time)),
            format!("  Temporary: {}", bool_label(types.temporary)),
            format!("  Internship: {}", bool_label(types.internship)),
            format!("  Other: {}", bool_label(types.other)),
            format!("  Volunteer: {}", bool_label(types.volunteer)),
            "Date Filter:".to_string(),
            format!("  All Time: {}", bool_label(date.all_time)),
            format!("  Month: {}", bool_label(date.month)),
            format!("  Week: {}", bool_label(date.week)),
            format!("  24 Hours: {}", bool_label(date.hours_24)),
            format!("Positions: {}", self.positions.join(", ")),
            format!("Locations: {}", self.locations.join(", ")),
            format!("Apply Once at Company: {}", bool_label(self.apply_once_at_company)),
            format!("Distance: {}", self.distance),
            format!("Company Blacklist: {}", self.company_blacklist.join(", ")),
            format!("Title Blacklist: {}", self.title_blacklist.join(", ")),
            format!("Location Blacklist: {}", self.location_blacklist.join(", ")),
        ];

        lines.join("\n")
    }
}
