use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::ranking::{Direction, ranked_metrics};
use crate::team_stats::{TeamStatistics, UNRANKED};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub teams: usize,
    pub metrics: usize,
    pub ranking_rows: usize,
}

enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// Write ranked team statistics to an XLSX workbook: a `Teams` sheet with a
/// value and a rank column per metric, and a long-form `Rankings` sheet.
pub fn export_team_statistics(path: &Path, teams: &[TeamStatistics]) -> Result<ExportReport> {
    let metrics = ranked_metrics();

    let mut header: Vec<Cell> = vec!["Team".into()];
    for m in metrics {
        header.push(Cell::Text(m.name.to_string()));
        header.push(Cell::Text(format!("{} rank", m.name)));
    }
    let mut teams_rows = vec![header];
    for t in teams {
        let mut row = vec![Cell::Number(t.team_no as f64)];
        for m in metrics {
            row.push(Cell::Number((m.value)(t)));
            row.push(Cell::Number((m.rank)(t) as f64));
        }
        teams_rows.push(row);
    }

    let mut ranking_rows: Vec<Vec<Cell>> = vec![vec![
        "Metric".into(),
        "Direction".into(),
        "Rank".into(),
        "Team".into(),
        "Value".into(),
        "Match".into(),
    ]];
    for m in metrics {
        let mut ordered: Vec<&TeamStatistics> = teams.iter().collect();
        ordered.sort_by_key(|t| match (m.rank)(t) {
            UNRANKED => i32::MAX,
            rank => rank,
        });
        let direction = match m.direction {
            Direction::HigherBetter => "higher",
            Direction::LowerBetter => "lower",
        };
        for t in ordered {
            let origin = m
                .origin
                .and_then(|f| f(t))
                .map(|(no, level)| format!("{level} {no}"))
                .unwrap_or_default();
            ranking_rows.push(vec![
                Cell::Text(m.name.to_string()),
                direction.into(),
                Cell::Number((m.rank)(t) as f64),
                Cell::Number(t.team_no as f64),
                Cell::Number((m.value)(t)),
                Cell::Text(origin),
            ]);
        }
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teams")?;
        write_rows(sheet, &teams_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Rankings")?;
        write_rows(sheet, &ranking_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    tracing::info!(path = %path.display(), teams = teams.len(), "exported team statistics");
    Ok(ExportReport {
        teams: teams.len(),
        metrics: metrics.len(),
        ranking_rows: ranking_rows.len() - 1,
    })
}

fn write_rows(sheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(value) => sheet.write_string(row_idx as u32, col_idx as u16, value),
                Cell::Number(value) => sheet.write_number(row_idx as u32, col_idx as u16, *value),
            }
            .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
