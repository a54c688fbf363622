//! Structured resume records consumed by the layout engine.
//!
//! The types mirror the JSON shape produced by the profile store, so they can be
//! deserialized straight from a request body or a file.  Every field except the
//! profile's full name is optional; blank strings are treated exactly like absent
//! values by the block builder.

use serde::{Deserialize, Serialize};

/// Contact details, summary and skills of the resume owner.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
}

impl Profile {
    /// Creates a profile carrying only the full name.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: Some(full_name.into()),
            ..Self::default()
        }
    }

    /// Sets the e-mail address and returns the updated profile.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the phone number and returns the updated profile.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the location and returns the updated profile.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the summary paragraph and returns the updated profile.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Replaces the skill list and returns the updated profile.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }
}

/// One position held by the resume owner.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: bool,
    pub description: Option<String>,
    pub achievements: Vec<String>,
}

impl ExperienceEntry {
    /// Creates an entry for `position` held at `company`.
    pub fn new(company: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            position: position.into(),
            ..Self::default()
        }
    }

    /// Sets the period and returns the updated entry.
    pub fn with_period(
        mut self,
        start_date: impl Into<String>,
        end_date: impl Into<Option<String>>,
    ) -> Self {
        self.start_date = Some(start_date.into());
        self.end_date = end_date.into();
        self
    }

    /// Marks the position as the current one.
    pub fn current(mut self) -> Self {
        self.current = true;
        self
    }

    /// Sets the description and returns the updated entry.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the achievement list and returns the updated entry.
    pub fn with_achievements<I, S>(mut self, achievements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.achievements = achievements.into_iter().map(Into::into).collect();
        self
    }
}

/// One degree or course of study.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
    pub description: Option<String>,
}

impl EducationEntry {
    /// Creates an entry for `degree` obtained at `institution`.
    pub fn new(institution: impl Into<String>, degree: impl Into<String>) -> Self {
        Self {
            institution: institution.into(),
            degree: degree.into(),
            ..Self::default()
        }
    }

    /// Sets the field of study and returns the updated entry.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the period and returns the updated entry.
    pub fn with_period(mut self, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self.end_date = Some(end_date.into());
        self
    }

    /// Sets the grade point average and returns the updated entry.
    pub fn with_gpa(mut self, gpa: impl Into<String>) -> Self {
        self.gpa = Some(gpa.into());
        self
    }
}

/// A personal or professional project.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ProjectEntry {
    /// Creates a project entry with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description and returns the updated entry.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the technology list and returns the updated entry.
    pub fn with_technologies<I, S>(mut self, technologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.technologies = technologies.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the repository link and returns the updated entry.
    pub fn with_github_url(mut self, url: impl Into<String>) -> Self {
        self.github_url = Some(url.into());
        self
    }
}

/// Everything needed to render one resume.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    pub profile: Profile,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
}

impl ResumeRecord {
    /// Creates a record for the given profile with no entries.
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Appends an experience entry and returns the updated record.
    pub fn with_experience(mut self, entry: ExperienceEntry) -> Self {
        self.experience.push(entry);
        self
    }

    /// Appends an education entry and returns the updated record.
    pub fn with_education(mut self, entry: EducationEntry) -> Self {
        self.education.push(entry);
        self
    }

    /// Appends a project entry and returns the updated record.
    pub fn with_project(mut self, entry: ProjectEntry) -> Self {
        self.projects.push(entry);
        self
    }

    /// Parses a record from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Returns the trimmed value when it carries any non-whitespace text.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_with_missing_fields() {
        let record = ResumeRecord::from_json(
            r#"{
                "profile": { "fullName": "Jane Doe", "skills": ["Rust"] },
                "experience": [
                    { "company": "Acme", "position": "Engineer", "startDate": "2020", "current": true }
                ]
            }"#,
        )
        .expect("record parses");

        assert_eq!(record.profile.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.profile.skills, vec!["Rust".to_string()]);
        assert!(record.experience[0].current);
        assert!(record.experience[0].achievements.is_empty());
        assert!(record.education.is_empty());
        assert!(record.projects.is_empty());
    }

    #[test]
    fn blank_values_are_not_present() {
        assert_eq!(present(&Some("   ".to_string())), None);
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some(" x ".to_string())), Some("x"));
    }
}
