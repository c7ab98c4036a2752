use crate::funnel::repo_types::{JobLevel, LevelCounts};

/// One horizontal bar of the funnel.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelRow {
    pub level: JobLevel,
    pub count: i64,
    /// Width of the invisible spacer that centers the bar: `(max - count) / 2`.
    pub offset: f64,
    /// Share of the total in tenths of a percent, rounded half away from zero.
    pub percentage_tenths: i64,
}

impl FunnelRow {
    pub fn percentage(&self) -> f64 {
        self.percentage_tenths as f64 / 10.0
    }

    /// In-bar text; empty rows carry no label.
    pub fn label(&self) -> String {
        if self.count > 0 {
            format!("{} HC ({:.1}%)", self.count, self.percentage())
        } else {
            String::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunnelReport {
    pub company: String,
    pub counts: LevelCounts,
    pub total: i64,
    pub max: i64,
    /// Ordered C-Suite first.
    pub rows: Vec<FunnelRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunnelOutcome {
    Report(FunnelReport),
    NoData { company: String },
    ZeroHeadcount { company: String },
}

impl FunnelOutcome {
    pub fn from_counts(company: &str, counts: Option<LevelCounts>) -> Self {
        let Some(counts) = counts else {
            return FunnelOutcome::NoData {
                company: company.to_owned(),
            };
        };
        let total = counts.total();
        if total == 0 {
            return FunnelOutcome::ZeroHeadcount {
                company: company.to_owned(),
            };
        }

        let max = counts.max();
        let rows = JobLevel::ALL
            .into_iter()
            .map(|level| {
                let count = counts.get(level);
                FunnelRow {
                    level,
                    count,
                    offset: (max - count) as f64 / 2.0,
                    percentage_tenths: percent_tenths(count, total),
                }
            })
            .collect();

        FunnelOutcome::Report(FunnelReport {
            company: company.to_owned(),
            counts,
            total,
            max,
            rows,
        })
    }
}

/// `count / total * 100` to one decimal, in integer tenths. Requires `total > 0`.
fn percent_tenths(count: i64, total: i64) -> i64 {
    (count * 2000 + total) / (2 * total)
}
