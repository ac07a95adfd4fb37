//! End-to-end tests for analytics over imported data

mod common;

use common::*;
use listen_catalog::{ImportOptions, ListenAnalytics, STUDY_WINDOW};

fn imported_workspace() -> TestWorkspace {
    let mut workspace = TestWorkspace::new().unwrap();
    let csv = workspace
        .write_csv(
            "listens.csv",
            &[
                SIA_ROW,
                SIA_ROW,
                SIA_ROW,
                SIA_EXPLICIT_ROW,
                ADELE_ROW,
                ADELE_ROW,
                DAFT_PUNK_ROW,
                OLD_ROW,
                BLANK_ARTIST_ROW,
            ],
        )
        .unwrap();
    workspace.import(&csv).unwrap();
    workspace
}

#[test]
fn test_summary_after_import() {
    let workspace = imported_workspace();

    let summary = workspace.store.window_summary(&STUDY_WINDOW).unwrap();

    assert_eq!(summary.year_min, 2010);
    assert_eq!(summary.year_max, 2025);
    assert_eq!(summary.artists_count, 3);
    assert_eq!(summary.albums_count, 3);
    assert_eq!(summary.tracks_count, 4);
    assert_eq!(summary.users_count, 1);
    assert_eq!(summary.events_count, 7);
    // Explicit: one Sia row and the Daft Punk row
    let share = summary.organic_share.unwrap();
    assert!((share - 5.0 / 7.0).abs() < 1e-9);
}

#[test]
fn test_top_tracks_after_import() {
    let workspace = imported_workspace();

    let top = workspace.store.top_tracks(&STUDY_WINDOW, 50).unwrap();

    let rows: Vec<(&str, &str, u64)> = top
        .iter()
        .map(|t| (t.artist.as_str(), t.title.as_str(), t.listen_count))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Sia", "Chandelier", 3),
            ("Adele", "Hello", 2),
            ("Daft Punk", "Get Lucky", 1),
            ("Sia", "Elastic Heart", 1),
        ]
    );
}

#[test]
fn test_events_by_year_after_import() {
    let workspace = imported_workspace();

    let by_year = workspace.store.events_by_year(&STUDY_WINDOW).unwrap();

    let years: Vec<i32> = by_year.iter().map(|y| y.year).collect();
    assert_eq!(years, (2010..=2025).collect::<Vec<_>>());
    let count_of = |year: i32| by_year.iter().find(|y| y.year == year).unwrap().count;
    assert_eq!(count_of(2013), 1);
    assert_eq!(count_of(2014), 4);
    assert_eq!(count_of(2015), 2);
    assert_eq!(by_year.iter().map(|y| y.count).sum::<u64>(), 7);
}

#[test]
fn test_events_by_type_and_recent_events() {
    let workspace = imported_workspace();

    let by_type = workspace.store.events_by_type(&STUDY_WINDOW).unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].code, "listen");
    assert_eq!(by_type[0].count, 7);

    let recent = workspace.store.recent_events(&STUDY_WINDOW, 300).unwrap();
    assert_eq!(recent.len(), 7);
    assert!(recent.windows(2).all(|pair| pair[0].ts >= pair[1].ts));
    assert!(recent.iter().all(|e| e.user == "demo_user"));

    let limited = workspace.store.recent_events(&STUDY_WINDOW, 2).unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0], recent[0]);
}

#[test]
fn test_report_json_shape() {
    let workspace = imported_workspace();

    let report = workspace
        .store
        .analytics_report(&STUDY_WINDOW, 2, 3)
        .unwrap();
    assert_eq!(report.top_tracks.len(), 2);
    assert_eq!(report.recent_events.len(), 3);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["summary"]["events_count"], 7);
    assert_eq!(json["events_by_year"].as_array().unwrap().len(), 16);
    assert_eq!(json["top_tracks"][0]["artist"], "Sia");
}

#[test]
fn test_report_after_reset_to_empty_file() {
    let mut workspace = imported_workspace();
    let empty = workspace.write_csv("empty.csv", &[]).unwrap();
    let mut options = ImportOptions::new(&empty);
    options.reset = true;
    workspace.import_with(options).unwrap();

    let report = workspace
        .store
        .analytics_report(&STUDY_WINDOW, 50, 300)
        .unwrap();
    assert_eq!(report.summary.events_count, 0);
    assert_eq!(report.summary.artists_count, 0);
    assert_eq!(report.summary.organic_share, None);
    assert!(report.top_tracks.is_empty());
    assert!(report.events_by_year.iter().all(|y| y.count == 0));
    // The listen type is recreated by every run
    assert_eq!(report.events_by_type.len(), 1);
    assert_eq!(report.events_by_type[0].count, 0);
}

#[test]
fn test_top_tracks_group_by_artist_and_title() {
    let mut workspace = TestWorkspace::new().unwrap();
    // Same song released twice under different track ids
    workspace
        .import_text(&csv_content(&[
            SIA_ROW,
            "Sia,Chandelier (Remixes),Chandelier,t1-remix,2014-04-01,",
            ADELE_ROW,
        ]))
        .unwrap();

    let top = workspace.store.top_tracks(&STUDY_WINDOW, 50).unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].artist, "Sia");
    assert_eq!(top[0].title, "Chandelier");
    assert_eq!(top[0].listen_count, 2);
    assert_eq!(workspace.store.get_counts().unwrap().tracks, 3);
}
