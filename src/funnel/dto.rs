use serde::{Deserialize, Serialize};

use crate::funnel::{
    report::{FunnelReport, FunnelRow},
    repo_types::JobLevel,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FunnelQuery {
    pub company_name: String,
}

#[derive(Debug, Serialize)]
pub struct FunnelRowData {
    pub level: JobLevel,
    pub count: i64,
    pub offset: f64,
    pub percentage: f64,
}

impl From<&FunnelRow> for FunnelRowData {
    fn from(row: &FunnelRow) -> Self {
        Self {
            level: row.level,
            count: row.count,
            offset: row.offset,
            percentage: row.percentage(),
        }
    }
}

/// Report body of `/company-funnel/data`, a superset of the per-level counts record.
#[derive(Debug, Serialize)]
pub struct FunnelData {
    pub company: String,
    pub c_suite: i64,
    pub vp: i64,
    pub director: i64,
    pub manager: i64,
    pub other: i64,
    pub total: i64,
    pub rows: Vec<FunnelRowData>,
}

impl From<&FunnelReport> for FunnelData {
    fn from(r: &FunnelReport) -> Self {
        Self {
            company: r.company.clone(),
            c_suite: r.counts.c_suite,
            vp: r.counts.vp,
            director: r.counts.director,
            manager: r.counts.manager,
            other: r.counts.other,
            total: r.total,
            rows: r.rows.iter().map(FunnelRowData::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmptyFunnel {
    pub success: bool,
    pub message: String,
}
