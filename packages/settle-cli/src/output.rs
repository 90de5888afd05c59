//! Renderers for the settle CLI.

use std::io::{self, Write};

use scoreboard::domain::{PlayerIndex, Points, SessionState};
use scoreboard::{format_currency, BoardView, DomainError};
use serde::Serialize;

/// Round totals and the points-only settlement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoresReport {
    pub totals: Vec<ScoreLine>,
    pub transactions: Vec<ScoreTransfer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreLine {
    pub index: PlayerIndex,
    pub name: String,
    pub total: Points,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTransfer {
    pub from: String,
    pub to: String,
    pub points: Points,
}

impl ScoresReport {
    pub fn build(state: &SessionState) -> Result<Self, DomainError> {
        let name_of = |index: PlayerIndex| {
            state
                .player(index)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("#{index}"))
        };
        let totals = state
            .compute_totals()?
            .iter()
            .map(|(&index, total)| ScoreLine {
                index,
                name: name_of(index),
                total,
            })
            .collect();
        let transactions = state
            .settle_scores()?
            .into_iter()
            .map(|t| ScoreTransfer {
                from: name_of(t.from),
                to: name_of(t.to),
                points: t.amount,
            })
            .collect();
        Ok(Self {
            totals,
            transactions,
        })
    }
}

pub struct TableRenderer<W: Write> {
    out: W,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn board(&mut self, board: &BoardView) -> io::Result<()> {
        let width = name_width(board.players.iter().map(|p| p.name.as_str()));
        writeln!(self.out, "{:<width$}  {:>8}  {:>16}", "Player", "Points", "Balance")?;
        for p in &board.players {
            let marker = if p.active { "" } else { " (left)" };
            writeln!(
                self.out,
                "{:<width$}  {:>8}  {:>16}{marker}",
                p.name,
                p.total,
                format_currency(p.net_balance, 1)
            )?;
        }
        writeln!(self.out)?;
        if board.transactions.is_empty() {
            write!(self.out, "All settled.")?;
            return Ok(());
        }
        for (i, t) in board.transactions.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            write!(self.out, "{} -> {}: {}", t.from, t.to, t.display)?;
        }
        Ok(())
    }

    pub fn scores(&mut self, report: &ScoresReport) -> io::Result<()> {
        let width = name_width(report.totals.iter().map(|l| l.name.as_str()));
        writeln!(self.out, "{:<width$}  {:>8}", "Player", "Points")?;
        for line in &report.totals {
            writeln!(self.out, "{:<width$}  {:>8}", line.name, line.total)?;
        }
        writeln!(self.out)?;
        if report.transactions.is_empty() {
            write!(self.out, "All settled.")?;
            return Ok(());
        }
        for (i, t) in report.transactions.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            write!(self.out, "{} -> {}: {} pts", t.from, t.to, t.points)?;
        }
        Ok(())
    }
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
        .max("Player".len())
}
