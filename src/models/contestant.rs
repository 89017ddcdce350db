use std::fmt;

use serde::{Deserialize, Serialize};

pub type ContestantId = i64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Contestant {
    pub id: ContestantId,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Others,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Others];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Others => "Others",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image attached to a new contestant.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Multipart payload for `POST /api/admin/contestants`.
#[derive(Debug, Clone)]
pub struct NewContestant {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub details: String,
    pub image: Option<ImageUpload>,
}
