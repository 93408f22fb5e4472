use crate::infra::{in_memory_pipeline, Pipeline};
use chrono::{Duration, Utc};
use clap::Args;
use internship_pipeline::config::PipelineConfig;
use internship_pipeline::error::AppError;
use internship_pipeline::workflows::internship::{
    Candidate, CandidateIntake, Department, PipelineError, SelectionStrategy, REQUIRED_MEETINGS,
};
use internship_pipeline::workflows::roster::{RosterImporter, StaffRoster};
use std::io::Cursor;
use std::path::PathBuf;

const SAMPLE_ROSTER: &str = "Name,Department\n\
    Burak Demir,Development\n\
    Zeynep Arslan,Development\n\
    Can Yildiz,Design\n\
    Selin Aydin,Marketing\n\
    Aylin Sahin,CEO\n";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Staff roster CSV to use instead of the built-in sample roster.
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Interviewer selection strategy (random or round_robin).
    #[arg(long)]
    pub(crate) strategy: Option<SelectionStrategy>,
    /// Department the sample candidate applies to.
    #[arg(long, default_value = "Development")]
    pub(crate) department: Department,
}

#[derive(Args, Debug)]
pub(crate) struct RosterCheckArgs {
    /// Roster CSV with Name and Department columns
    pub(crate) path: PathBuf,
}

pub(crate) fn run_roster_check(args: RosterCheckArgs) -> Result<(), AppError> {
    let roster = RosterImporter::from_path(&args.path)?;
    render_roster_summary(&roster);
    println!("Members:");
    for member in roster.members() {
        println!("  - {} ({})", member.name, member.department);
    }
    if !roster.has_top_officer() {
        println!("Warning: no CEO listed; final meetings cannot be arranged.");
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        roster,
        strategy,
        department,
    } = args;

    let roster = match roster {
        Some(path) => RosterImporter::from_path(path)?,
        None => RosterImporter::from_reader(Cursor::new(SAMPLE_ROSTER))?,
    };
    let pipeline = in_memory_pipeline(&PipelineConfig {
        assignment_strategy: strategy.unwrap_or_default(),
        ..PipelineConfig::default()
    });
    roster.seed(&*pipeline.staff)?;

    println!("Internship pipeline demo");
    render_roster_summary(&roster);

    let intake = CandidateIntake {
        first_name: "Elif".to_string(),
        last_name: "Kaya".to_string(),
        email: "elif.kaya@example.com".to_string(),
        department,
        university: "Bogazici University".to_string(),
        experience: false,
    };

    if let Err(err) = walk_candidate(&pipeline, intake) {
        println!("  Pipeline stopped: {}", err);
    }
    Ok(())
}

fn walk_candidate(pipeline: &Pipeline, intake: CandidateIntake) -> Result<(), PipelineError> {
    let service = &pipeline.candidates;
    let record = service.intake(intake)?;
    println!(
        "\n- Received {} for {} -> status {}",
        record.full_name(),
        record.department,
        record.status
    );

    let early = service.accept(&record.id);
    if let Err(err) = early {
        println!("  Early acceptance refused: {}", err);
    }

    let start = Utc::now();
    for round in 1..=i64::from(REQUIRED_MEETINGS) {
        let arranged = service.arrange_meeting(&record.id, start + Duration::days(round))?;
        println!("  Meeting {}: {}", round, describe_assignment(pipeline, &arranged)?);
        let completed = service.complete_meeting(&record.id)?;
        println!(
            "    completed -> {} meeting(s), status {}",
            completed.meeting_count, completed.status
        );
    }

    let accepted = service.accept(&record.id)?;
    println!(
        "- Decision for {}: {} after {} meetings",
        accepted.full_name(),
        accepted.status,
        accepted.meeting_count
    );
    Ok(())
}

fn describe_assignment(pipeline: &Pipeline, candidate: &Candidate) -> Result<String, PipelineError> {
    let Some(assignee) = &candidate.assignee else {
        return Ok("no interviewer assigned".to_string());
    };
    let member = pipeline
        .staff
        .list()?
        .into_iter()
        .find(|member| &member.id == assignee);
    let when = candidate
        .next_meeting
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unscheduled".to_string());

    Ok(match member {
        Some(member) => format!("{} ({}) on {}", member.name, member.department, when),
        None => format!("{} on {}", assignee, when),
    })
}

fn render_roster_summary(roster: &StaffRoster) {
    println!("Staff roster: {} member(s)", roster.len());
    for department in Department::ALL {
        println!("  - {}: {}", department, roster.count_in(department));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use internship_pipeline::workflows::internship::CandidateStatus;

    fn sample_pipeline() -> Pipeline {
        let pipeline = in_memory_pipeline(&PipelineConfig::default());
        RosterImporter::from_reader(Cursor::new(SAMPLE_ROSTER))
            .expect("sample roster parses")
            .seed(&*pipeline.staff)
            .expect("sample roster seeds");
        pipeline
    }

    #[test]
    fn sample_roster_covers_every_department() {
        let roster =
            RosterImporter::from_reader(Cursor::new(SAMPLE_ROSTER)).expect("sample roster parses");

        assert!(roster.has_top_officer());
        for department in Department::ALL {
            assert!(roster.count_in(department) > 0, "{department} is empty");
        }
    }

    #[test]
    fn demo_walk_ends_with_acceptance() {
        let pipeline = sample_pipeline();
        let intake = CandidateIntake {
            first_name: "Elif".to_string(),
            last_name: "Kaya".to_string(),
            email: "elif@example.com".to_string(),
            department: Department::Design,
            university: "METU".to_string(),
            experience: true,
        };

        walk_candidate(&pipeline, intake).expect("walk succeeds");

        let stored = pipeline.candidates.list().expect("list");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, CandidateStatus::Accepted);
        assert_eq!(stored[0].meeting_count, REQUIRED_MEETINGS);
    }
}
