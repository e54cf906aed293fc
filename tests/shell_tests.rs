use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use gantt_viewer::{
    AppConfig, FileRegistry, GanttError, Shell, Timeline, UploadRequest, export_file_name,
};
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

const LAUNCH: &str = r#"{"chart_name":"Launch","sections":[{"section_name":"Prep","tasks":[{"task_name":"Design","start_date":"2024-01-01","duration_days":5,"is_critical":true}]}]}"#;

struct Fixture {
    _root: TempDir,
    schedules: std::path::PathBuf,
    exports: std::path::PathBuf,
    shell: Shell,
}

fn fixture() -> Fixture {
    let root = tempdir().unwrap();
    let schedules = root.path().join("json");
    let exports = root.path().join("out");
    fs::create_dir_all(&schedules).unwrap();
    fs::create_dir_all(&exports).unwrap();
    let shell = Shell::new(FileRegistry::new(&schedules), &exports);
    Fixture {
        _root: root,
        schedules,
        exports,
        shell,
    }
}

fn data_url(text: &str) -> String {
    format!("data:application/json;base64,{}", BASE64.encode(text))
}

fn upload(shell: &Shell, filename: &str, text: &str) -> gantt_viewer::UploadResponse {
    shell
        .upload(&UploadRequest {
            filename: filename.to_string(),
            contents: data_url(text),
        })
        .unwrap()
}

#[test]
fn select_returns_rows_chart_and_svg() {
    let fx = fixture();
    fs::write(fx.schedules.join("launch.json"), LAUNCH).unwrap();

    let response = fx.shell.select("launch.json").unwrap();
    assert_eq!(response.file, "launch.json");
    assert_eq!(response.timeline.chart_title, "Launch");
    assert_eq!(response.chart.bars.len(), 1);
    assert!(response.svg.contains("Launch"));
}

#[test]
fn upload_then_select_matches_direct_parse() {
    let fx = fixture();
    let response = upload(&fx.shell, "launch.json", LAUNCH);
    assert_eq!(response.selected, "launch.json");
    assert_eq!(response.entries.len(), 1);
    assert_eq!(response.entries[0].name, "Launch");

    let selected = fx.shell.select(&response.selected).unwrap();
    assert_eq!(selected.timeline, Timeline::parse(LAUNCH).unwrap());
    assert_eq!(
        fs::read_to_string(fx.schedules.join("launch.json")).unwrap(),
        LAUNCH
    );
}

#[test]
fn uploading_the_same_name_overwrites() {
    let fx = fixture();
    upload(&fx.shell, "plan.json", LAUNCH);
    let response = upload(
        &fx.shell,
        "plan.json",
        r#"{"chart_name":"Plan v2","sections":[]}"#,
    );

    let plans: Vec<_> = response
        .entries
        .iter()
        .filter(|entry| entry.file == "plan.json")
        .collect();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].name, "Plan v2");
    assert!(fx.shell.select("plan.json").unwrap().timeline.is_empty());
}

#[test]
fn invalid_upload_is_stored_and_fails_on_select() {
    let fx = fixture();
    let response = upload(&fx.shell, "draft.json", r#"{"chart_name":"Draft"}"#);
    assert_eq!(response.entries[0].name, "Draft");

    let err = fx.shell.select("draft.json").unwrap_err();
    assert!(matches!(err, GanttError::MalformedSchedule(_)));
}

#[test]
fn upload_rejects_undecodable_payloads_and_unsafe_names() {
    let fx = fixture();
    let err = fx
        .shell
        .upload(&UploadRequest {
            filename: "plan.json".into(),
            contents: "plain text without a payload".into(),
        })
        .unwrap_err();
    assert!(matches!(err, GanttError::InvalidUpload(_)));

    let err = fx
        .shell
        .upload(&UploadRequest {
            filename: "../escape.json".into(),
            contents: data_url(LAUNCH),
        })
        .unwrap_err();
    assert!(matches!(err, GanttError::InvalidSelection(_)));
    assert!(fx.shell.entries().unwrap().is_empty());
}

#[test]
fn export_writes_png_next_to_config_export_dir() {
    let fx = fixture();
    fs::write(fx.schedules.join("launch.json"), LAUNCH).unwrap();

    let status = fx.shell.export("launch.json").unwrap();
    assert_eq!(status.message, "Gantt chart exported as 'launch_gantt_chart.png'");
    assert_eq!(status.file.as_deref(), Some("launch.json"));
    let output = fx.exports.join("launch_gantt_chart.png");
    assert_eq!(status.output.as_deref(), Some(output.as_path()));
    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[test]
fn export_rereads_the_current_file() {
    let fx = fixture();
    let path = fx.schedules.join("launch.json");
    fs::write(&path, LAUNCH).unwrap();
    fx.shell.export("launch.json").unwrap();

    fs::write(
        &path,
        r#"{"sections":[{"section_name":"Prep","tasks":[{"task_name":"Design","start_date":"2024/01/01","duration_days":5}]}]}"#,
    )
    .unwrap();
    let err = fx.shell.export("launch.json").unwrap_err();
    assert!(matches!(err, GanttError::InvalidDate { .. }));
}

#[test]
fn export_into_missing_directory_is_an_io_error() {
    let fx = fixture();
    fs::write(fx.schedules.join("launch.json"), LAUNCH).unwrap();
    let shell = Shell::new(
        FileRegistry::new(&fx.schedules),
        fx.exports.join("does-not-exist"),
    );
    let err = shell.export("launch.json").unwrap_err();
    assert!(matches!(err, GanttError::Io { .. }));
}

#[test]
fn shell_from_config_uses_configured_directories() {
    let config = AppConfig {
        schedule_dir: "schedules".into(),
        export_dir: "exports".into(),
        ..AppConfig::default()
    };
    let shell = Shell::from_config(&config);
    assert_eq!(shell.registry().dir(), Path::new("schedules"));
    assert_eq!(shell.export_dir(), Path::new("exports"));
    assert_eq!(export_file_name("launch.json"), "launch_gantt_chart.png");
}
