use std::fs;
use std::path::Path;
use tilcheck_core::{
    render_json, render_text, CheckConfig, CheckError, CheckService, CheckWarning, Severity,
    EXIT_CLEAN, EXIT_DISCREPANCY,
};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn consistent_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "notes/a.md", "# A\n");
    write(dir.path(), "notes/b.md", "# B\n");
    write(
        dir.path(),
        "README.md",
        "# TIL\n\n## Notes\n\n- [A](notes/a.md)\n- [B](notes/b.md)\n",
    );
    dir
}

fn run(root: &Path) -> tilcheck_core::CheckOutcome {
    CheckService::new(CheckConfig::for_root(root))
        .unwrap()
        .run()
        .unwrap()
}

fn paths<'a>(items: impl IntoIterator<Item = &'a tilcheck_core::RepoPath>) -> Vec<&'a str> {
    items.into_iter().map(|path| path.as_str()).collect()
}

#[test]
fn consistent_repository_exits_clean() {
    let repo = consistent_repo();
    let outcome = run(repo.path());

    assert!(outcome.report.unlisted.is_empty());
    assert!(outcome.report.dangling.is_empty());
    assert_eq!(outcome.report.matched.len(), 2);
    assert_eq!(outcome.exit_code(), EXIT_CLEAN);
    assert!(render_text(&outcome).ends_with("status: ok\n"));
}

#[test]
fn unlisted_note_is_reported_once() {
    let repo = tempfile::tempdir().unwrap();
    write(repo.path(), "notes/a.md", "# A\n");
    write(repo.path(), "notes/b.md", "# B\n");
    write(repo.path(), "README.md", "## Notes\n- [A](notes/a.md)\n");

    let outcome = run(repo.path());

    assert_eq!(
        paths(outcome.report.unlisted.iter().map(|note| &note.path)),
        vec!["notes/b.md"]
    );
    assert_eq!(outcome.report.unlisted[0].title.as_deref(), Some("B"));
    assert!(outcome.report.dangling.is_empty());
    assert_eq!(
        paths(outcome.report.matched.iter().map(|pair| &pair.note.path)),
        vec!["notes/a.md"]
    );
    assert_eq!(outcome.exit_code(), EXIT_DISCREPANCY);
}

#[test]
fn adding_a_note_changes_only_the_unlisted_set() {
    let repo = consistent_repo();
    let before = run(repo.path());

    write(repo.path(), "shell/new.md", "# New\n");
    let after = run(repo.path());

    assert_eq!(
        paths(after.report.unlisted.iter().map(|note| &note.path)),
        vec!["shell/new.md"]
    );
    assert_eq!(after.report.dangling, before.report.dangling);
    assert_eq!(after.report.matched, before.report.matched);
}

#[test]
fn removing_a_note_leaves_one_dangling_entry() {
    let repo = consistent_repo();
    fs::remove_file(repo.path().join("notes/b.md")).unwrap();

    let outcome = run(repo.path());

    assert!(outcome.report.unlisted.is_empty());
    assert_eq!(
        paths(outcome.report.dangling.iter().map(|entry| &entry.path)),
        vec!["notes/b.md"]
    );
    assert_eq!(outcome.exit_code(), EXIT_DISCREPANCY);
}

#[test]
fn external_links_never_dangle() {
    let repo = consistent_repo();
    write(
        repo.path(),
        "README.md",
        "## Notes\n- [A](notes/a.md)\n- [B](notes/b.md)\n\n## Elsewhere\n- [Docs](https://docs.docker.com/engine/)\n- [Other TIL](https://github.com/someone/til/blob/master/x.md)\n",
    );

    let outcome = run(repo.path());

    assert!(outcome.report.dangling.is_empty());
    assert_eq!(outcome.external_links.len(), 2);
    assert_eq!(outcome.exit_code(), EXIT_CLEAN);
}

#[test]
fn same_repository_urls_match_notes() {
    let repo = consistent_repo();
    write(
        repo.path(),
        "README.md",
        "## Notes\n- [A](https://github.com/jdoe/til/blob/master/notes/a.md)\n- [B](notes/b.md)\n",
    );
    let config = CheckConfig {
        repository: Some("https://github.com/jdoe/til".to_string()),
        ..CheckConfig::for_root(repo.path())
    };

    let outcome = CheckService::new(config).unwrap().run().unwrap();

    assert_eq!(outcome.report.matched.len(), 2);
    assert_eq!(outcome.exit_code(), EXIT_CLEAN);
}

#[test]
fn repeated_runs_render_identical_reports() {
    let repo = consistent_repo();
    write(repo.path(), "git/z.md", "# Z\n");
    write(repo.path(), "git/y.md", "no title\n");
    write(
        repo.path(),
        "README.md",
        "## Notes\n- [A](notes/a.md)\n- [Gone](notes/gone.md)\n- todo: write more\n",
    );

    let first = run(repo.path());
    let second = run(repo.path());

    assert_eq!(render_text(&first), render_text(&second));
    assert_eq!(render_json(&first).unwrap(), render_json(&second).unwrap());
}

#[test]
fn strict_mode_turns_unparsed_items_into_failures() {
    let repo = consistent_repo();
    write(
        repo.path(),
        "README.md",
        "## Notes\n- [A](notes/a.md)\n- [B](notes/b.md)\n- remember to add awk notes\n",
    );

    let lenient = run(repo.path());
    assert_eq!(lenient.unparsed_count(), 1);
    assert!(matches!(
        lenient.warnings[0],
        CheckWarning::MalformedIndexEntry { line: 4, .. }
    ));
    assert_eq!(lenient.exit_code(), EXIT_CLEAN);

    let config = CheckConfig {
        strict: true,
        ..CheckConfig::for_root(repo.path())
    };
    let strict = CheckService::new(config).unwrap().run().unwrap();
    assert_eq!(strict.exit_code(), EXIT_DISCREPANCY);
}

#[test]
fn warning_severity_keeps_exit_clean() {
    let repo = consistent_repo();
    write(repo.path(), "notes/c.md", "# C\n");
    let config = CheckConfig {
        unlisted: Severity::Warning,
        ..CheckConfig::for_root(repo.path())
    };

    let outcome = CheckService::new(config).unwrap().run().unwrap();

    assert_eq!(outcome.report.unlisted.len(), 1);
    assert_eq!(outcome.exit_code(), EXIT_CLEAN);
}

#[test]
fn duplicate_listing_is_a_finding() {
    let repo = consistent_repo();
    write(
        repo.path(),
        "README.md",
        "## Notes\n- [A](notes/a.md)\n- [B](notes/b.md)\n\n## Again\n- [A again](./notes/a.md)\n",
    );

    let outcome = run(repo.path());

    assert_eq!(outcome.report.duplicates.len(), 1);
    assert_eq!(outcome.report.duplicates[0].line, 6);
    assert_eq!(outcome.exit_code(), EXIT_DISCREPANCY);
}

#[test]
fn missing_index_is_input_not_found() {
    let repo = tempfile::tempdir().unwrap();
    write(repo.path(), "notes/a.md", "# A\n");

    let error = CheckService::new(CheckConfig::for_root(repo.path()))
        .unwrap()
        .run()
        .expect_err("missing index must fail");
    assert!(matches!(error, CheckError::InputNotFound { .. }));
}

#[test]
fn missing_root_is_input_not_found() {
    let repo = tempfile::tempdir().unwrap();

    let error = CheckService::new(CheckConfig::for_root(repo.path().join("absent")))
        .unwrap()
        .run()
        .expect_err("missing root must fail");
    assert!(matches!(error, CheckError::InputNotFound { .. }));
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = CheckConfig {
        extension: String::new(),
        ..CheckConfig::default()
    };
    assert!(matches!(
        CheckService::new(config),
        Err(CheckError::Config(_))
    ));
}

#[test]
fn nested_index_resolves_links_relative_to_its_directory() {
    let repo = tempfile::tempdir().unwrap();
    write(repo.path(), "docs/git/a.md", "# A\n");
    write(repo.path(), "shell/b.md", "# B\n");
    write(
        repo.path(),
        "docs/INDEX.md",
        "## Git\n- [A](git/a.md)\n## Shell\n- [B](../shell/b.md)\n",
    );
    let config = CheckConfig {
        index: "docs/INDEX.md".into(),
        ..CheckConfig::for_root(repo.path())
    };

    let outcome = CheckService::new(config).unwrap().run().unwrap();

    assert_eq!(outcome.report.matched.len(), 2);
    assert!(outcome.report.unlisted.is_empty());
    assert_eq!(outcome.exit_code(), EXIT_CLEAN);
}

#[test]
fn unreadable_indexed_note_is_matched_with_a_warning() {
    let repo = tempfile::tempdir().unwrap();
    fs::create_dir_all(repo.path().join("java")).unwrap();
    fs::write(repo.path().join("java/cafe.md"), b"# Caf\xe9\n").unwrap();
    write(repo.path(), "README.md", "## Java\n- [Cafe](java/cafe.md)\n");

    let outcome = run(repo.path());

    assert!(outcome.report.dangling.is_empty());
    assert!(outcome.report.unlisted.is_empty());
    assert_eq!(
        paths(outcome.report.matched.iter().map(|pair| &pair.note.path)),
        vec!["java/cafe.md"]
    );
    assert_eq!(outcome.report.matched[0].note.title, None);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(matches!(
        &outcome.warnings[0],
        CheckWarning::UnreadableFile { path, .. } if path.as_str() == "java/cafe.md"
    ));
    assert_eq!(outcome.exit_code(), EXIT_CLEAN);
}

#[cfg(unix)]
#[test]
fn symlinked_indexed_note_is_not_dangling() {
    let repo = tempfile::tempdir().unwrap();
    write(repo.path(), "shared/x.md", "# X\n");
    fs::create_dir_all(repo.path().join("notes")).unwrap();
    std::os::unix::fs::symlink("../shared/x.md", repo.path().join("notes/x.md")).unwrap();
    write(
        repo.path(),
        "README.md",
        "## Notes\n- [X](notes/x.md)\n## Shared\n- [X](shared/x.md)\n",
    );

    let outcome = run(repo.path());

    assert!(outcome.report.dangling.is_empty());
    assert_eq!(outcome.report.matched.len(), 2);
    assert_eq!(outcome.exit_code(), EXIT_CLEAN);
}
