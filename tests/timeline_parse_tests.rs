use chrono::NaiveDate;
use gantt_viewer::{
    CriticalPath, DEFAULT_CHART_NAME, GanttError, ScheduleDocument, SectionDocument, TaskDocument,
    Timeline,
};
use std::fs;
use tempfile::tempdir;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const LAUNCH: &str = r#"{"chart_name":"Launch","sections":[{"section_name":"Prep","tasks":[{"task_name":"Design","start_date":"2024-01-01","duration_days":5,"is_critical":true}]}]}"#;

#[test]
fn launch_schedule_yields_single_critical_row() {
    let timeline = Timeline::parse(LAUNCH).unwrap();
    assert_eq!(timeline.chart_title, "Launch");
    assert_eq!(timeline.rows.len(), 1);
    let row = &timeline.rows[0];
    assert_eq!(row.task, "Design");
    assert_eq!(row.start, d(2024, 1, 1));
    assert_eq!(row.finish, d(2024, 1, 6));
    assert_eq!(row.critical_path, CriticalPath::Critical);
    assert_eq!(row.section, "Prep");
}

#[test]
fn rows_serialize_with_chart_labels() {
    let timeline = Timeline::parse(LAUNCH).unwrap();
    let value = serde_json::to_value(&timeline.rows[0]).unwrap();
    assert_eq!(value["Task"], "Design");
    assert_eq!(value["Start"], "2024-01-01");
    assert_eq!(value["Finish"], "2024-01-06");
    assert_eq!(value["Critical Path"], "Critical");
    assert_eq!(value["Section"], "Prep");
}

#[test]
fn missing_chart_name_uses_placeholder_title() {
    let timeline = Timeline::parse(
        r#"{"sections":[{"section_name":"Prep","tasks":[{"task_name":"Design","start_date":"2024-01-01","duration_days":1}]}]}"#,
    )
    .unwrap();
    assert_eq!(timeline.chart_title, DEFAULT_CHART_NAME);
    assert_eq!(timeline.chart_title, "Project Gantt Chart");
}

#[test]
fn absent_is_critical_defaults_to_non_critical() {
    let timeline = Timeline::parse(
        r#"{"sections":[{"section_name":"Prep","tasks":[{"task_name":"Design","start_date":"2024-01-01","duration_days":1}]}]}"#,
    )
    .unwrap();
    assert_eq!(timeline.rows[0].critical_path, CriticalPath::NonCritical);
}

#[test]
fn zero_duration_finishes_on_start_date() {
    let timeline = Timeline::parse(
        r#"{"sections":[{"section_name":"Gate","tasks":[{"task_name":"Sign-off","start_date":"2024-02-29","duration_days":0}]}]}"#,
    )
    .unwrap();
    let row = &timeline.rows[0];
    assert_eq!(row.start, row.finish);
    assert_eq!(row.span_days(), 0);
}

#[test]
fn durations_use_calendar_days_across_month_and_year_ends() {
    let timeline = Timeline::parse(
        r#"{"sections":[{"section_name":"Q","tasks":[
            {"task_name":"Leap","start_date":"2024-02-28","duration_days":2},
            {"task_name":"Year","start_date":"2023-12-30","duration_days":3}
        ]}]}"#,
    )
    .unwrap();
    assert_eq!(timeline.rows[0].finish, d(2024, 3, 1));
    assert_eq!(timeline.rows[1].finish, d(2024, 1, 2));
}

#[test]
fn negative_duration_is_accepted_with_finish_before_start() {
    let timeline = Timeline::parse(
        r#"{"sections":[{"section_name":"Odd","tasks":[{"task_name":"Rewind","start_date":"2024-01-10","duration_days":-3}]}]}"#,
    )
    .unwrap();
    assert_eq!(timeline.rows[0].finish, d(2024, 1, 7));
    assert_eq!(timeline.rows[0].span_days(), -3);
}

#[test]
fn rows_flatten_sections_in_document_order() {
    let document = ScheduleDocument {
        chart_name: Some("Venue".into()),
        sections: vec![
            SectionDocument {
                section_name: "Planning".into(),
                tasks: vec![
                    TaskDocument::new("Budget", "2024-05-01", 3).critical(),
                    TaskDocument::new("Permits", "2024-05-02", 10),
                ],
            },
            SectionDocument {
                section_name: "Build-out".into(),
                tasks: vec![TaskDocument::new("Bar counter", "2024-05-15", 7)],
            },
        ],
    };
    let timeline = Timeline::from_document(&document).unwrap();
    assert_eq!(timeline.rows.len(), document.task_count());
    let names: Vec<(&str, &str)> = timeline
        .rows
        .iter()
        .map(|row| (row.section.as_str(), row.task.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Planning", "Budget"),
            ("Planning", "Permits"),
            ("Build-out", "Bar counter")
        ]
    );
}

#[test]
fn wrong_date_format_fails_with_invalid_date() {
    let err = Timeline::parse(
        r#"{"sections":[{"section_name":"Prep","tasks":[{"task_name":"Design","start_date":"01-01-2024","duration_days":5}]}]}"#,
    )
    .unwrap_err();
    match err {
        GanttError::InvalidDate { task, value } => {
            assert_eq!(task, "Design");
            assert_eq!(value, "01-01-2024");
        }
        other => panic!("expected InvalidDate, got {other:?}"),
    }
}

#[test]
fn dates_with_time_of_day_are_rejected() {
    let err = Timeline::parse(
        r#"{"sections":[{"section_name":"Prep","tasks":[{"task_name":"Design","start_date":"2024-01-01T09:00:00","duration_days":5}]}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, GanttError::InvalidDate { .. }));
}

#[test]
fn short_signed_or_padded_years_are_rejected() {
    for value in ["24-01-01", " 2024-01-01", "+2024-01-01", "2024-01-01 ", "02024-01-01"] {
        let doc = format!(
            r#"{{"sections":[{{"section_name":"Prep","tasks":[{{"task_name":"Design","start_date":"{value}","duration_days":5}}]}}]}}"#
        );
        let err = Timeline::parse(doc).unwrap_err();
        assert!(
            matches!(err, GanttError::InvalidDate { value: ref v, .. } if v == value),
            "{value:?} gave {err:?}"
        );
    }
}

#[test]
fn one_bad_task_aborts_the_whole_parse() {
    let err = Timeline::parse(
        r#"{"sections":[{"section_name":"Prep","tasks":[
            {"task_name":"Good","start_date":"2024-01-01","duration_days":5},
            {"task_name":"Bad","start_date":"2024/01/02","duration_days":5}
        ]}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, GanttError::InvalidDate { ref task, .. } if task == "Bad"));
}

#[test]
fn missing_sections_is_malformed() {
    let err = Timeline::parse(r#"{"chart_name":"No sections"}"#).unwrap_err();
    assert!(matches!(err, GanttError::MalformedSchedule(_)));
}

#[test]
fn structural_problems_are_malformed() {
    let cases = [
        "not json at all",
        "[]",
        r#"{"sections":{}}"#,
        r#"{"sections":[{"tasks":[]}]}"#,
        r#"{"sections":[{"section_name":"S"}]}"#,
        r#"{"sections":[{"section_name":"S","tasks":[{"task_name":"T","start_date":"2024-01-01"}]}]}"#,
        r#"{"sections":[{"section_name":"S","tasks":[{"task_name":"T","start_date":"2024-01-01","duration_days":"5"}]}]}"#,
        r#"{"sections":[{"section_name":"S","tasks":[{"task_name":"T","start_date":"2024-01-01","duration_days":1,"is_critical":"yes"}]}]}"#,
    ];
    for case in cases {
        let err = Timeline::parse(case).unwrap_err();
        assert!(
            matches!(err, GanttError::MalformedSchedule(_)),
            "expected malformed for {case}, got {err:?}"
        );
    }
}

#[test]
fn overflowing_duration_is_malformed() {
    let err = Timeline::parse(
        r#"{"sections":[{"section_name":"S","tasks":[{"task_name":"Forever","start_date":"2024-01-01","duration_days":9223372036854775807}]}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, GanttError::MalformedSchedule(_)));
}

#[test]
fn load_reads_from_disk_and_reports_missing_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("launch.json");
    fs::write(&path, LAUNCH).unwrap();
    let loaded = Timeline::load(&path).unwrap();
    assert_eq!(loaded, Timeline::parse(LAUNCH).unwrap());

    let err = Timeline::load(dir.path().join("missing.json")).unwrap_err();
    assert!(err.is_not_found());
}
