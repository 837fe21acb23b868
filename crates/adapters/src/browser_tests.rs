// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn locate_alternate_picks_first_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("chrome");
    std::fs::write(&present, b"").unwrap();

    let browser = SystemBrowser::new(vec![
        dir.path().join("missing"),
        dir.path().to_path_buf(),
        present.clone(),
    ]);

    // The directory itself is skipped: only files count as installs
    assert_eq!(browser.locate_alternate(), Some(present));
}

#[test]
fn locate_alternate_none_when_nothing_installed() {
    let browser = SystemBrowser::new(vec![PathBuf::from("/nonexistent/chrome")]);
    assert_eq!(browser.locate_alternate(), None);
}

#[test]
fn default_paths_are_not_empty() {
    assert!(!default_alternate_browsers().is_empty());
}

#[tokio::test]
async fn missing_alternate_executable_is_a_launch_error() {
    let browser = SystemBrowser::new(Vec::new());
    let err = browser
        .open_with(Path::new("/nonexistent/chrome"), "https://ci.test/job/x/")
        .await
        .unwrap_err();
    assert!(matches!(err, BrowserError::Launch { .. }));
}

#[tokio::test]
async fn fake_records_launches_in_order() {
    let fake = FakeBrowser::new().with_alternate("/opt/chrome");
    let alt = fake.locate_alternate().unwrap();
    fake.open_with(&alt, "https://ci.test/a").await.unwrap();
    fake.open_default("https://ci.test/b").await.unwrap();

    assert_eq!(
        fake.calls(),
        vec![
            BrowserCall::With { browser: PathBuf::from("/opt/chrome"), url: "https://ci.test/a".into() },
            BrowserCall::Default { url: "https://ci.test/b".into() },
        ]
    );
}
