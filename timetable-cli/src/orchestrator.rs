//! Per-company batching loop then one scheduling solve, per spec.md §2's
//! control flow: "Orchestrator → (for each company → Batching) →
//! Scheduling (once, across all companies) → emit." The two stages
//! communicate only through the batch assignment table (spec.md §5).

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;

use timetable_batching::{BatchingInput, BatchingModel, BatchingOutcome};
use timetable_core::calendar::Calendar;
use timetable_core::domain::{BatchAssignmentRow, Course, CourseBatch, Group, Session, Trainee, Trainer};
use timetable_core::error::GenericError;
use timetable_scheduling::{solve_scheduling, SchedulingInput, SchedulingOutcome};

use crate::config::Config;
use crate::data_source::MasterDataSource;
use crate::error::CliError;
use crate::ingest::{ingest, Ingested};
use crate::output::{to_stage2_row, ResultSink};

/// Runs the full two-stage solve described by spec.md §2 and emits its
/// results through `sink`. Returns the number of companies that produced
/// at least one stage-1 row and whether stage 2 produced a schedule, for
/// callers that want a summary without inspecting `sink`.
pub fn run(source: &dyn MasterDataSource, config: &Config, sink: &mut dyn ResultSink) -> Result<(), anyhow::Error> {
    if !config.is_splitting_batch && !config.is_scheduling_course {
        return Err(CliError::NoStageSelected.into());
    }

    let start_date = NaiveDate::parse_from_str(config.start_date.trim(), "%Y-%m-%d")
        .map_err(|err| CliError::InvalidStartDate { raw: config.start_date.clone(), source: err })?;
    let holidays: BTreeSet<NaiveDate> = config.holidays.iter().filter_map(|h| NaiveDate::parse_from_str(h.trim(), "%Y-%m-%d").ok()).collect();
    let calendar = Calendar::new(start_date, config.days, &holidays)?;

    let ingested = ingest(source, config)?;

    let companies = resolve_companies(config, &ingested);
    if companies.is_empty() {
        return Err(CliError::NoCompanies.into());
    }

    let mut batch_rows_by_company: HashMap<String, Vec<BatchAssignmentRow>> = HashMap::new();

    if config.is_splitting_batch {
        for company in &companies {
            let span = tracing::info_span!("batching", company = %company);
            let _enter = span.enter();
            match run_batching_for_company(&ingested, company, config)? {
                Some(rows) => {
                    tracing::info!(rows = rows.len(), "batching solved");
                    sink.write_stage1(rows.clone());
                    batch_rows_by_company.insert(company.clone(), rows);
                }
                None => {
                    tracing::warn!("no batches feasible for this company, skipping");
                }
            }
        }
    }

    if !config.is_scheduling_course {
        return Ok(());
    }

    let (groups, course_batches) = build_groups_and_batches(&ingested, &companies, &batch_rows_by_company, config, &calendar);

    let trainers = expand_trainer_eligibility(&ingested.trainers, &course_batches);

    let input = SchedulingInput {
        calendar: &calendar,
        hours_per_day: config.hours_per_day,
        venues: ingested.venues.clone(),
        trainers,
        course_batches,
        groups,
    };

    let span = tracing::info_span!("scheduling");
    let _enter = span.enter();
    match solve_scheduling(&input, &config.scheduling_config(), config.solve_config())? {
        SchedulingOutcome::Solved(sessions) => {
            tracing::info!(sessions = sessions.len(), "scheduling solved");
            let rows = to_stage2_rows(&sessions, &calendar, config.hours_per_day, &input.venues, &input.groups);
            sink.write_stage2(rows);
        }
        SchedulingOutcome::Infeasible | SchedulingOutcome::Unknown => {
            tracing::warn!("no solution found for scheduling, producing no schedule table");
        }
    }

    Ok(())
}

fn resolve_companies(config: &Config, ingested: &Ingested) -> Vec<String> {
    if let Some(whitelist) = &config.companies {
        return whitelist.clone();
    }
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for course in &ingested.courses {
        seen.insert(course.company.clone());
    }
    seen.into_iter().collect()
}

fn run_batching_for_company(ingested: &Ingested, company: &str, config: &Config) -> Result<Option<Vec<BatchAssignmentRow>>, GenericError> {
    let trainees: Vec<&Trainee> = ingested.trainees.iter().filter(|t| t.company == company).collect();

    let courses: Vec<(Course, Vec<Trainee>)> = ingested
        .courses
        .iter()
        .filter(|c| c.company == company)
        .map(|course| {
            let enrolled: Vec<Trainee> = trainees.iter().filter(|t| t.courses.contains(&course.name)).map(|t| (*t).clone()).collect();
            (course.clone(), enrolled)
        })
        .filter(|(_, enrolled)| !enrolled.is_empty())
        .collect();

    if courses.is_empty() {
        return Ok(None);
    }

    let mut trainer_count: HashMap<String, u32> = HashMap::new();
    for (course, _) in &courses {
        let count = ingested.trainers.iter().filter(|t| t.is_eligible_for(&course.name)).count() as u32;
        trainer_count.insert(course.name.clone(), count.max(1));
    }

    let input = BatchingInput { company: company.to_string(), courses, trainer_count };
    let model = BatchingModel::build(&input, &config.batching_config())?;
    match model.solve(config.solve_config())? {
        BatchingOutcome::Solved(rows) if !rows.is_empty() => Ok(Some(rows)),
        BatchingOutcome::Solved(_) | BatchingOutcome::Infeasible | BatchingOutcome::Unknown => Ok(None),
    }
}

/// Builds the stage-2 `Group`/`CourseBatch` inputs from the batch
/// assignment table (or a synthetic single-batch grouping per company when
/// batching is disabled or produced nothing for that company), per
/// spec.md §1.
fn build_groups_and_batches(
    ingested: &Ingested,
    companies: &[String],
    batch_rows_by_company: &HashMap<String, Vec<BatchAssignmentRow>>,
    config: &Config,
    calendar: &Calendar,
) -> (Vec<Group>, Vec<CourseBatch>) {
    let course_by_key: HashMap<(String, String), &Course> = ingested.courses.iter().map(|c| ((c.company.clone(), c.name.clone()), c)).collect();

    // trainee -> course -> batch number, from stage 1's output when present.
    let mut batch_no_of: HashMap<(String, String, String), u32> = HashMap::new();
    // (company, course, batch_no) -> its assignment rows, to derive valid_start_domain.
    let mut rows_of_batch: HashMap<(String, String, u32), Vec<BatchAssignmentRow>> = HashMap::new();
    for rows in batch_rows_by_company.values() {
        for row in rows {
            batch_no_of.insert((row.company.clone(), row.course.clone(), row.trainee_id.clone()), row.batch_no);
            rows_of_batch.entry((row.company.clone(), row.course.clone(), row.batch_no)).or_default().push(row.clone());
        }
    }

    let mut batch_identities: HashSet<(String, String, u32)> = HashSet::new();
    let mut group_buckets: HashMap<(String, Vec<String>, u8, bool), Vec<String>> = HashMap::new();

    for company in companies {
        for trainee in ingested.trainees.iter().filter(|t| &t.company == company) {
            let mut course_batches: Vec<String> = Vec::new();
            for course_name in &trainee.courses {
                let batch_no = batch_no_of.get(&(company.clone(), course_name.clone(), trainee.id.clone())).copied().unwrap_or(0);
                batch_identities.insert((company.clone(), course_name.clone(), batch_no));
                course_batches.push(format!("{company}-{course_name}-{batch_no}"));
            }
            if course_batches.is_empty() {
                continue;
            }
            course_batches.sort();
            course_batches.dedup();

            let key = (company.clone(), course_batches, trainee.shift.to_week_code(), matches!(trainee.cycle, timetable_core::domain::Cycle::WEnd));
            group_buckets.entry(key).or_default().push(trainee.id.clone());
        }
    }

    let mut groups = Vec::with_capacity(group_buckets.len());
    for (i, ((company, course_batches, shift_code, is_wend), trainees)) in group_buckets.into_iter().enumerate() {
        let id = format!("{company}-group-{i}");
        let shift = timetable_core::domain::Shift::from_week_code(shift_code).unwrap_or(timetable_core::domain::Shift::NonShift);
        let cycle = if is_wend { timetable_core::domain::Cycle::WEnd } else { timetable_core::domain::Cycle::WDays };
        let subgroups = Group::build_subgroups(&id, &trainees, config.maximum_group_size);
        groups.push(Group { id, company, course_batches, trainees, shift, cycle, subgroups });
    }

    let mut course_batches = Vec::with_capacity(batch_identities.len());
    for (company, course_name, batch_no) in batch_identities {
        let Some(course) = course_by_key.get(&(company.clone(), course_name.clone())) else {
            continue;
        };
        let mut course_batch = CourseBatch::new((*course).clone(), batch_no);
        if let Some(rows) = rows_of_batch.get(&(company, course_name, batch_no)) {
            course_batch.valid_start_domain = timetable_scheduling::valid_start_domain_for_batch(calendar, config.hours_per_day, rows);
        }
        course_batches.push(course_batch);
    }

    (groups, course_batches)
}

/// Trainers may be declared eligible for a bare course name as well as a
/// specific batch identity (spec.md §3: "eligible_courses: set of course
/// or batch ids"); this expands a course-name entry into eligibility for
/// every batch of that course actually scheduled.
fn expand_trainer_eligibility(trainers: &[Trainer], course_batches: &[CourseBatch]) -> Vec<Trainer> {
    trainers
        .iter()
        .map(|t| {
            let mut eligible: HashSet<String> = t.eligible_courses.iter().cloned().collect();
            for cb in course_batches {
                if t.eligible_courses.contains(&cb.course.name) || t.eligible_courses.contains(&cb.identity()) {
                    eligible.insert(cb.identity());
                }
            }
            Trainer::new(t.id.clone(), eligible)
        })
        .collect()
}

fn to_stage2_rows(sessions: &[Session], calendar: &Calendar, hours_per_day: u32, venues: &[timetable_core::domain::Venue], groups: &[Group]) -> Vec<crate::output::Stage2OutputRow> {
    let venue_capacity: HashMap<&str, u32> = venues.iter().map(|v| (v.name.as_str(), v.capacity)).collect();
    let group_occupancy: HashMap<&str, usize> = groups.iter().map(|g| (g.id.as_str(), g.occupancy())).collect();

    sessions
        .iter()
        .filter_map(|s| {
            let capacity = venue_capacity.get(s.venue.as_str()).copied().unwrap_or(0);
            let occupancy = group_occupancy.get(s.group_id.as_str()).copied().unwrap_or(0) as u32;
            to_stage2_row(s, calendar, hours_per_day, capacity, occupancy)
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/orchestrator_test.rs"]
mod orchestrator_test;
