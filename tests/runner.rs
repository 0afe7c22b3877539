use std::fs;
use std::path::Path;

use tempfile::tempdir;
use ziproute::common::{Compression, JobConfig, JobOptions};
use ziproute::extract;
use ziproute::runner::{self, Job};
use ziproute::PackError;

// ---------- helpers ----------

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn pack_job(cwd: &Path, dest: &Path) -> Job {
    Job::Pack(JobConfig {
        cwd: Some(cwd.to_path_buf()),
        dest: dest.to_path_buf(),
        src: vec!["**/*".to_owned()],
        dot: false,
        options: JobOptions::default(),
    })
}

fn unpack_job(archive_path: &Path, dest: &Path, check_crc32: bool) -> Job {
    Job::Unpack(JobConfig {
        cwd: None,
        dest: dest.to_path_buf(),
        src: vec![archive_path.to_string_lossy().into_owned()],
        dot: false,
        options: JobOptions {
            check_crc32,
            ..JobOptions::default()
        },
    })
}

/// Flips one byte inside the first occurrence of `needle` in the file.
fn corrupt_first(path: &Path, needle: &[u8]) {
    let mut content = fs::read(path).unwrap();
    let position = content
        .windows(needle.len())
        .position(|window| window == needle)
        .expect("needle not found in archive");
    content[position] ^= 0xff;
    fs::write(path, content).unwrap();
}

// ---------- tests ----------

#[tokio::test]
async fn one_failing_job_does_not_abort_the_others() {
    let src_a = tempdir().unwrap();
    write_file(&src_a.path().join("a.txt"), b"alpha\n");
    let src_b = tempdir().unwrap();
    write_file(&src_b.path().join("b.txt"), b"beta\n");

    let out = tempdir().unwrap();
    let zip_a = out.path().join("a.zip");
    let zip_b = out.path().join("b.zip");
    let missing = out.path().join("missing.zip");

    let jobs = vec![
        pack_job(src_a.path(), &zip_a),
        unpack_job(&missing, out.path(), true),
        pack_job(src_b.path(), &zip_b),
    ];
    let summary = runner::run(jobs).await;

    assert_eq!(summary.succeeded, 2);
    assert!(summary.failed);
    assert!(!summary.ok());

    // the successful jobs still produced their outputs
    assert!(zip_a.is_file());
    assert!(zip_b.is_file());
}

#[tokio::test]
async fn all_jobs_succeeding_reports_ok() {
    let src = tempdir().unwrap();
    write_file(&src.path().join("a.txt"), b"alpha\n");

    let out = tempdir().unwrap();
    let jobs = vec![
        pack_job(src.path(), &out.path().join("one.zip")),
        pack_job(src.path(), &out.path().join("two.zip")),
    ];
    let summary = runner::run(jobs).await;

    assert_eq!(summary.succeeded, 2);
    assert!(summary.ok());
}

#[tokio::test]
async fn corrupted_entry_fails_only_with_the_crc_check() {
    let src = tempdir().unwrap();
    let canary = b"canary canary canary\n";
    write_file(&src.path().join("canary.txt"), canary);

    let zips = tempdir().unwrap();
    let archive_path = zips.path().join("corrupt.zip");
    // Store mode keeps the content bytes recognizable inside the archive.
    ziproute::archive::build(&JobConfig {
        cwd: Some(src.path().to_path_buf()),
        dest: archive_path.clone(),
        src: vec!["**/*".to_owned()],
        dot: false,
        options: JobOptions {
            compression: Compression::Store,
            ..JobOptions::default()
        },
    })
    .await
    .unwrap();
    corrupt_first(&archive_path, canary);

    let checked = tempdir().unwrap();
    let err = extract::extract(&JobConfig {
        cwd: None,
        dest: checked.path().to_path_buf(),
        src: vec![archive_path.to_string_lossy().into_owned()],
        dot: false,
        options: JobOptions::default(),
    })
    .await
    .expect_err("corrupted archive must fail the checked extraction");
    assert!(matches!(err, PackError::Checksum { .. }), "got {err}");

    let unchecked = tempdir().unwrap();
    extract::extract(&JobConfig {
        cwd: None,
        dest: unchecked.path().to_path_buf(),
        src: vec![archive_path.to_string_lossy().into_owned()],
        dot: false,
        options: JobOptions {
            check_crc32: false,
            ..JobOptions::default()
        },
    })
    .await
    .expect("unchecked extraction proceeds");

    let extracted = fs::read(unchecked.path().join("canary.txt")).unwrap();
    assert_eq!(extracted.len(), canary.len());
    assert_ne!(extracted, canary);
}

#[tokio::test]
async fn non_zip_sources_are_skipped_not_fatal() {
    let src = tempdir().unwrap();
    write_file(&src.path().join("a.txt"), b"alpha\n");

    let zips = tempdir().unwrap();
    let archive_path = zips.path().join("good.zip");
    ziproute::archive::build(&JobConfig {
        cwd: Some(src.path().to_path_buf()),
        dest: archive_path.clone(),
        src: vec!["**/*".to_owned()],
        dot: false,
        options: JobOptions::default(),
    })
    .await
    .unwrap();

    let stray = zips.path().join("notes.txt");
    write_file(&stray, b"not an archive\n");

    let out = tempdir().unwrap();
    extract::extract(&JobConfig {
        cwd: None,
        dest: out.path().to_path_buf(),
        src: vec![
            stray.to_string_lossy().into_owned(),
            archive_path.to_string_lossy().into_owned(),
        ],
        dot: false,
        options: JobOptions::default(),
    })
    .await
    .expect("the stray source is skipped, the zip is extracted");

    assert_eq!(fs::read(out.path().join("a.txt")).unwrap(), b"alpha\n");
    assert!(!out.path().join("notes.txt").exists());
}
