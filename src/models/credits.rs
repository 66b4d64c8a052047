use serde::{Deserialize, Serialize};

/// Crew job identifying a movie's director
pub const DIRECTOR_JOB: &str = "Director";

/// Cast members billed below this order are the principal cast
pub const PRINCIPAL_CAST_SIZE: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Billing order, 0 is top billed
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Cast and crew of a title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Credits {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl Credits {
    /// First crew member, in list order, whose job is "Director"
    pub fn director(&self) -> Option<&CrewMember> {
        self.crew.iter().find(|member| member.job == DIRECTOR_JOB)
    }

    /// Cast members with a billing order below [`PRINCIPAL_CAST_SIZE`], in list order
    pub fn principal_cast(&self) -> Vec<&CastMember> {
        self.cast
            .iter()
            .filter(|actor| actor.order < PRINCIPAL_CAST_SIZE)
            .collect()
    }
}
