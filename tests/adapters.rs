#![forbid(unsafe_code)]
use gardes::{
    io,
    model::{DayAssignment, DaySpec, Person, PersonId, Roster, RosterInput, Schedule},
    report::render_roster,
    storage::{JsonStorage, Storage},
};
use std::fs;
use tempfile::tempdir;

fn sample_roster() -> Roster {
    let input = RosterInput::new(
        vec![
            Person::new(0, "alice"),
            Person::new(1, "bob"),
            Person::new(2, "chloe").junior(),
        ],
        vec![
            DaySpec::new(1, 1, false),
            DaySpec::new(2, 1, true),
            DaySpec::new(3, 1, false),
        ],
    );
    let days = vec![
        DayAssignment { day: 1, people: vec![PersonId::new(0)] },
        DayAssignment { day: 2, people: vec![PersonId::new(1)] },
        DayAssignment { day: 3, people: vec![PersonId::new(0)] },
    ];
    let schedule = Schedule::from_days(&input, days);
    Roster {
        input,
        schedule: Some(schedule),
    }
}

#[test]
fn import_people_and_days() {
    let dir = tempdir().unwrap();
    let people = dir.path().join("people.csv");
    let days = dir.path().join("days.csv");
    fs::write(
        &people,
        "name,senior,desired_shifts,unavailable\nalice,,,3;5-7\nbob,non,8,\nchloe\n",
    )
    .unwrap();
    fs::write(&days, "day,headcount,weekend\n1,2,0\n2,2,1\n3,1,\n4,2,0\n5,2,0\n6,2,1\n7,2,1\n").unwrap();

    let input = io::import_roster_csv(&people, &days).unwrap();
    assert_eq!(input.people.len(), 3);
    assert!(input.people[0].senior);
    assert_eq!(
        input.people[0].unavailable_days.iter().copied().collect::<Vec<_>>(),
        vec![3, 5, 6, 7]
    );
    assert!(!input.people[1].senior);
    assert_eq!(input.people[1].desired_shifts, Some(8));
    assert_eq!(input.people[2].id, PersonId::new(2));
    assert_eq!(input.days.len(), 7);
    assert!(input.days[1].is_weekend);
    assert!(!input.days[2].is_weekend);
}

#[test]
fn import_rejects_invalid_roster() {
    let dir = tempdir().unwrap();
    let people = dir.path().join("people.csv");
    let days = dir.path().join("days.csv");
    fs::write(&people, "name\nalice\n").unwrap();
    fs::write(&days, "day,headcount\n1,2\n").unwrap();
    let err = io::import_roster_csv(&people, &days).unwrap_err();
    assert!(err.to_string().contains("exceeds"));
}

#[test]
fn storage_roundtrip() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("roster.json"));
    assert!(!storage.exists());
    let roster = sample_roster();
    storage.save(&roster).unwrap();

    let loaded = storage.load().unwrap();
    assert_eq!(loaded.input, roster.input);
    assert_eq!(loaded.schedule, roster.schedule);
}

#[test]
fn failed_save_names_the_target() {
    let dir = tempdir().unwrap();
    // un répertoire occupe déjà le chemin cible
    let target = dir.path().join("occupied");
    fs::create_dir(&target).unwrap();
    let err = JsonStorage::open(&target).save(&sample_roster()).unwrap_err();
    assert!(err.to_string().contains("occupied"), "{err:#}");
}

#[test]
fn text_report() {
    insta::assert_snapshot!(render_roster(&sample_roster()), @r"
Day 1: alice
Day 2: bob
Day 3: alice

alice: total 2, weekend 0
bob: total 1, weekend 1
chloe: total 0, weekend 0
Spread: total 2, weekend 1
");
}

#[test]
fn schedule_and_workload_csv() {
    let dir = tempdir().unwrap();
    let roster = sample_roster();
    let schedule = roster.schedule.clone().unwrap();

    let path = dir.path().join("schedule.csv");
    io::export_schedule_csv(&path, &roster, &schedule).unwrap();
    insta::assert_snapshot!(fs::read_to_string(&path).unwrap(), @r"
day,weekend,people
1,0,alice
2,1,bob
3,0,alice
");

    let path = dir.path().join("workload.csv");
    io::export_workload_csv(&path, &roster, &schedule).unwrap();
    insta::assert_snapshot!(fs::read_to_string(&path).unwrap(), @r"
name,total,weekend
alice,2,0
bob,1,1
chloe,0,0
");
}
