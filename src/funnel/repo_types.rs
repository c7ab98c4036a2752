use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub company_name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobPosition {
    pub id: Uuid,
    pub level: String,
}

/// "This job position exists at this company/location."
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct JobPositionCompanyLocation {
    pub job_position_id: Uuid,
    pub company_id: Uuid,
}

/// Hierarchy buckets, top of the funnel first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JobLevel {
    #[serde(rename = "C-Suite")]
    CSuite,
    #[serde(rename = "VP")]
    Vp,
    Director,
    Manager,
    Other,
}

impl JobLevel {
    pub const ALL: [JobLevel; 5] = [
        JobLevel::CSuite,
        JobLevel::Vp,
        JobLevel::Director,
        JobLevel::Manager,
        JobLevel::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            JobLevel::CSuite => "C-Suite",
            JobLevel::Vp => "VP",
            JobLevel::Director => "Director",
            JobLevel::Manager => "Manager",
            JobLevel::Other => "Other",
        }
    }

    /// Exact label match, as the aggregate query does; anything else belongs to no bucket.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }
}

/// Per-level assignment counts for one company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct LevelCounts {
    pub c_suite: i64,
    pub vp: i64,
    pub director: i64,
    pub manager: i64,
    pub other: i64,
}

impl LevelCounts {
    pub fn get(&self, level: JobLevel) -> i64 {
        match level {
            JobLevel::CSuite => self.c_suite,
            JobLevel::Vp => self.vp,
            JobLevel::Director => self.director,
            JobLevel::Manager => self.manager,
            JobLevel::Other => self.other,
        }
    }

    fn slot(&mut self, level: JobLevel) -> &mut i64 {
        match level {
            JobLevel::CSuite => &mut self.c_suite,
            JobLevel::Vp => &mut self.vp,
            JobLevel::Director => &mut self.director,
            JobLevel::Manager => &mut self.manager,
            JobLevel::Other => &mut self.other,
        }
    }

    pub fn tally<'a>(levels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts = Self::default();
        for level in levels.into_iter().filter_map(JobLevel::parse) {
            *counts.slot(level) += 1;
        }
        counts
    }

    pub fn total(&self) -> i64 {
        JobLevel::ALL.iter().map(|l| self.get(*l)).sum()
    }

    pub fn max(&self) -> i64 {
        JobLevel::ALL.iter().map(|l| self.get(*l)).max().unwrap_or(0)
    }
}
