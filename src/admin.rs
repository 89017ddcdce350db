//! Form state for the admin screens and its conversion into API requests.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::error::ApiError;
use crate::models::{ContestantId, Gender, ImageUpload, NewContestant, NewVotingLine};

const DEFAULT_MAX_VOTES: &str = "50";
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

fn invalid(message: &str) -> ApiError {
    ApiError::ValidationFailed(message.to_owned())
}

#[derive(Debug, Clone, Default)]
pub struct ContestantForm {
    pub name: String,
    pub age: String,
    pub gender: Gender,
    pub details: String,
    /// Optional path to an image file on disk.
    pub image_path: String,
}

/// A checked contestant form whose image has not been read yet.
#[derive(Debug, Clone)]
pub struct ContestantDraft {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub details: String,
    pub image_path: Option<PathBuf>,
}

impl ContestantForm {
    pub fn validate(&self) -> Result<ContestantDraft, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid("Name is required."));
        }
        let age = self
            .age
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid("Age must be a whole number."))?;
        let image_path = Some(self.image_path.trim())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        Ok(ContestantDraft {
            name: name.to_owned(),
            age,
            gender: self.gender,
            details: self.details.trim().to_owned(),
            image_path,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl ContestantDraft {
    /// Reads the image file, if any, and produces the upload payload.
    pub async fn load(self) -> Result<NewContestant, ApiError> {
        let image = match &self.image_path {
            Some(path) => Some(read_image(path).await?),
            None => None,
        };
        Ok(NewContestant {
            name: self.name,
            age: self.age,
            gender: self.gender,
            details: self.details,
            image,
        })
    }
}

async fn read_image(path: &Path) -> Result<ImageUpload, ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        ApiError::ValidationFailed(format!("Could not read {}: {}", path.display(), e))
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    Ok(ImageUpload { file_name, bytes })
}

#[derive(Debug, Clone)]
pub struct VotingLineForm {
    pub name: String,
    /// Local time, `YYYY-MM-DDTHH:MM`.
    pub start: String,
    pub end: String,
    pub max_votes: String,
    selected: BTreeSet<ContestantId>,
}

impl Default for VotingLineForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            start: String::new(),
            end: String::new(),
            max_votes: DEFAULT_MAX_VOTES.to_owned(),
            selected: BTreeSet::new(),
        }
    }
}

impl VotingLineForm {
    pub fn toggle(&mut self, contestant: ContestantId) {
        if !self.selected.remove(&contestant) {
            self.selected.insert(contestant);
        }
    }

    pub fn is_selected(&self, contestant: ContestantId) -> bool {
        self.selected.contains(&contestant)
    }

    pub fn selected(&self) -> impl Iterator<Item = ContestantId> + '_ {
        self.selected.iter().copied()
    }

    pub fn validate(&self) -> Result<NewVotingLine, ApiError> {
        self.validate_in(&Local)
    }

    /// Like [`validate`](Self::validate) with the form's times read in `tz`.
    pub fn validate_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<NewVotingLine, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid("Line name is required."));
        }
        let start_time = parse_datetime(&self.start, tz)
            .ok_or_else(|| invalid("Start time must look like 2025-01-31T18:00."))?;
        let end_time = parse_datetime(&self.end, tz)
            .ok_or_else(|| invalid("End time must look like 2025-01-31T18:00."))?;
        let max_votes_per_user = self
            .max_votes
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid("Max votes per user must be a whole number."))?;
        Ok(NewVotingLine {
            name: name.to_owned(),
            start_time,
            end_time,
            max_votes_per_user,
            contestant_ids: self.selected().collect(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn parse_datetime<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let input = input.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn line_form() -> VotingLineForm {
        VotingLineForm {
            name: "Finale".to_owned(),
            start: "2025-03-01T18:00".to_owned(),
            end: "2025-03-01 22:30".to_owned(),
            ..VotingLineForm::default()
        }
    }

    #[test]
    fn contestant_form_requires_name_and_numeric_age() {
        let mut form = ContestantForm {
            name: "  ".to_owned(),
            age: "21".to_owned(),
            ..ContestantForm::default()
        };
        assert!(form.validate().is_err());

        form.name = "Asha".to_owned();
        form.age = "twenty".to_owned();
        assert!(form.validate().is_err());

        form.age = "21".to_owned();
        let draft = form.validate().unwrap();
        assert_eq!(draft.age, 21);
        assert_eq!(draft.gender, Gender::Male);
        assert!(draft.image_path.is_none());
    }

    #[tokio::test]
    async fn contestant_draft_reads_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asha.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let form = ContestantForm {
            name: "Asha".to_owned(),
            age: "21".to_owned(),
            gender: Gender::Female,
            details: "Singer".to_owned(),
            image_path: path.display().to_string(),
        };
        let contestant = form.validate().unwrap().load().await.unwrap();
        let image = contestant.image.unwrap();
        assert_eq!(image.file_name, "asha.png");
        assert_eq!(image.bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn missing_image_is_a_validation_error() {
        let form = ContestantForm {
            name: "Asha".to_owned(),
            age: "21".to_owned(),
            image_path: "/definitely/not/here.png".to_owned(),
            ..ContestantForm::default()
        };
        let result = form.validate().unwrap().load().await;
        assert!(matches!(result, Err(ApiError::ValidationFailed(_))));
    }

    #[test]
    fn selection_behaves_as_a_set() {
        let mut form = line_form();
        form.toggle(3);
        form.toggle(1);
        form.toggle(3);
        form.toggle(2);
        assert!(form.is_selected(1));
        assert!(!form.is_selected(3));

        let line = form.validate_in(&Utc).unwrap();
        assert_eq!(line.contestant_ids, vec![1, 2]);
        assert_eq!(line.max_votes_per_user, 50);
    }

    #[test]
    fn times_are_converted_to_utc() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let line = line_form().validate_in(&ist).unwrap();
        assert_eq!(
            line.start_time,
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap()
        );
        assert_eq!(line.end_time, Utc.with_ymd_and_hms(2025, 3, 1, 17, 0, 0).unwrap());
    }

    #[test]
    fn bad_fields_are_rejected() {
        let mut form = line_form();
        form.start = "tomorrow".to_owned();
        assert!(form.validate_in(&Utc).is_err());

        let mut form = line_form();
        form.max_votes = "-1".to_owned();
        assert!(form.validate_in(&Utc).is_err());

        let mut form = line_form();
        form.name.clear();
        assert!(form.validate_in(&Utc).is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = line_form();
        form.toggle(9);
        form.max_votes = "10".to_owned();
        form.reset();
        assert!(form.name.is_empty());
        assert_eq!(form.max_votes, "50");
        assert_eq!(form.selected().count(), 0);
    }
}
