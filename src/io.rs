use crate::model::{Duty, Eligibility, Member, MemberId, RestBudget, Streaks};
use crate::scheduler::Schedule;
use anyhow::{bail, Context};
#[cfg(feature = "csv")]
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

/// Import de membres depuis CSV, header
/// `id,name,eligibility,budget_weekday,budget_weekend[,active][,count_only][,streak_weekday][,streak_weekend]`.
///
/// `id` vide : identifiant aléatoire.
#[cfg(feature = "csv")]
pub fn import_members_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Member>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid member row (empty name)");
        }
        let eligibility: Eligibility = rec
            .get(2)
            .context("missing eligibility")?
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("member {name}"))?;
        let weekday = parse_decimal(rec.get(3).context("missing budget_weekday")?)
            .with_context(|| format!("invalid budget_weekday for {name}"))?;
        let weekend = parse_decimal(rec.get(4).context("missing budget_weekend")?)
            .with_context(|| format!("invalid budget_weekend for {name}"))?;

        let mut member = Member::new(name, eligibility, RestBudget::new(weekday, weekend));
        if !id.is_empty() {
            member.id = MemberId::new(id);
        }
        if let Some(flag) = non_empty(rec.get(5)) {
            member.active =
                parse_bool(flag).with_context(|| format!("invalid active value for {name}"))?;
        }
        if let Some(flag) = non_empty(rec.get(6)) {
            member.count_only =
                parse_bool(flag).with_context(|| format!("invalid count_only value for {name}"))?;
        }
        member.streaks = Streaks {
            weekday: parse_streak(rec.get(7)).with_context(|| format!("streak_weekday of {name}"))?,
            weekend: parse_streak(rec.get(8)).with_context(|| format!("streak_weekend of {name}"))?,
        };
        out.push(member);
    }
    Ok(out)
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "sim" | "s" => Ok(true),
        "false" | "0" | "no" | "n" | "nao" | "não" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_decimal(s: &str) -> anyhow::Result<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Decimal::ZERO);
    }
    // virgule décimale acceptée (1,5)
    s.replace(',', ".")
        .parse::<Decimal>()
        .with_context(|| format!("expected number, got {s:?}"))
}

fn parse_streak(field: Option<&str>) -> anyhow::Result<u32> {
    match non_empty(field) {
        Some(s) => s.parse().with_context(|| format!("expected integer, got {s:?}")),
        None => Ok(0),
    }
}

/// Export JSON de l'escala (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(schedule)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV: header `member_id,member_name,date,rotation,duty,streak,code`
#[cfg(feature = "csv")]
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    members: &[Member],
    schedule: &Schedule,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["member_id", "member_name", "date", "rotation", "duty", "streak", "code"])?;
    for a in &schedule.assignments {
        let name = members
            .iter()
            .find(|m| m.id == a.member)
            .map(|m| m.name.as_str())
            .unwrap_or("");
        let date = a.date.format("%Y-%m-%d").to_string();
        let rotation = a.rotation.to_string();
        let (duty, streak) = match a.duty {
            Duty::Work => ("work", String::new()),
            Duty::Rest { streak, .. } => ("rest", streak.to_string()),
        };
        w.write_record([
            a.member.as_str(),
            name,
            date.as_str(),
            rotation.as_str(),
            duty,
            streak.as_str(),
            a.display_code().as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Grille texte : une ligne par membre actif, un code par jour.
pub fn render_grid(members: &[Member], schedule: &Schedule) -> String {
    let width = members
        .iter()
        .filter(|m| m.active)
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for m in members.iter().filter(|m| m.active) {
        let codes: Vec<String> = schedule.for_member(&m.id).map(|a| a.display_code()).collect();
        out.push_str(&format!("{:<width$} | {}\n", m.name, codes.join(" ")));
    }
    out
}
