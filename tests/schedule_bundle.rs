#[path = "../src/backup.rs"]
mod backup;

use serde_json::json;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};
use zip::write::FileOptions;
use zip::ZipWriter;

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

const ENTRIES: &str = r#"[{"id":"a","instructor":"Ana","className":"Yoga","duration":1.5,"room":"A1"}]"#;

#[test]
fn bundle_export_and_import_roundtrip() {
    let dir = temp_dir("schedulerd-bundle");
    let out = dir.join("nested").join("schedule.zip");

    let summary = backup::export_schedule_bundle(ENTRIES, 1, &out).expect("export bundle");
    assert_eq!(summary.bundle_format, backup::BUNDLE_FORMAT_V1);
    assert_eq!(summary.entry_count, 1);
    assert_eq!(summary.sha256.len(), 64);

    let mut archive = zip::ZipArchive::new(File::open(&out).expect("open zip")).expect("zip");
    let mut manifest = String::new();
    archive
        .by_name("manifest.json")
        .expect("manifest")
        .read_to_string(&mut manifest)
        .expect("read manifest");
    let manifest: serde_json::Value = serde_json::from_str(&manifest).expect("manifest json");
    assert_eq!(manifest["format"], "schedule-bundle-v1");
    assert_eq!(manifest["entryCount"], 1);
    assert_eq!(manifest["entriesSha256"], summary.sha256.as_str());

    let imported = backup::import_schedule_bundle(&out).expect("import bundle");
    assert_eq!(imported.entries_json, ENTRIES);
    assert_eq!(imported.bundle_format, backup::BUNDLE_FORMAT_V1);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn tampered_or_foreign_bundles_are_rejected() {
    let dir = temp_dir("schedulerd-bundle-bad");

    let tampered = dir.join("tampered.zip");
    {
        let mut zip = ZipWriter::new(File::create(&tampered).expect("create"));
        let opts = FileOptions::default();
        zip.start_file("manifest.json", opts).expect("start");
        zip.write_all(
            json!({ "format": "schedule-bundle-v1", "entriesSha256": "00" })
                .to_string()
                .as_bytes(),
        )
        .expect("write");
        zip.start_file("entries.json", opts).expect("start");
        zip.write_all(b"[]").expect("write");
        zip.finish().expect("finish");
    }
    let e = backup::import_schedule_bundle(&tampered).expect_err("checksum mismatch");
    assert!(format!("{e:#}").contains("checksum"));

    let foreign = dir.join("foreign.zip");
    {
        let mut zip = ZipWriter::new(File::create(&foreign).expect("create"));
        zip.start_file("manifest.json", FileOptions::default())
            .expect("start");
        zip.write_all(br#"{"format":"markbook-workspace-v2"}"#)
            .expect("write");
        zip.finish().expect("finish");
    }
    let e = backup::import_schedule_bundle(&foreign).expect_err("wrong format");
    assert!(format!("{e:#}").contains("unsupported bundle format"));

    let not_zip = dir.join("plain.json");
    std::fs::write(&not_zip, ENTRIES).expect("write plain");
    assert!(backup::import_schedule_bundle(&not_zip).is_err());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn sidecar_restores_exported_schedule_into_another_workspace() {
    let src = temp_dir("schedulerd-bundle-src");
    let dst = temp_dir("schedulerd-bundle-dst");
    let bundle = src.join("out.zip");

    let mut child = Command::new(env!("CARGO_BIN_EXE_schedulerd"))
        .env_remove("SCHEDULERD_WORKSPACE")
        .env_remove("SCHEDULERD_STORAGE_KEY")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn schedulerd");
    let mut stdin = child.stdin.take().expect("child stdin");
    let mut reader = BufReader::new(child.stdout.take().expect("child stdout"));

    let mut call = |id: &str, method: &str, params: serde_json::Value| -> serde_json::Value {
        writeln!(stdin, "{}", json!({ "id": id, "method": method, "params": params }))
            .expect("write request");
        stdin.flush().expect("flush");
        let mut line = String::new();
        reader.read_line(&mut line).expect("read response");
        let v: serde_json::Value = serde_json::from_str(line.trim()).expect("json");
        assert_eq!(v["ok"], true, "{method} failed: {v}");
        v["result"].clone()
    };

    call("1", "workspace.select", json!({ "path": src.to_string_lossy() }));
    call(
        "2",
        "schedule.submit",
        json!({ "instructor": "Ana", "className": "Yoga", "duration": "2", "room": "A" }),
    );
    call(
        "3",
        "schedule.submit",
        json!({ "instructor": "Bo", "className": "Spin", "duration": "0.5", "room": "B" }),
    );
    let exported = call(
        "4",
        "schedule.exportBundle",
        json!({ "outPath": bundle.to_string_lossy() }),
    );
    assert_eq!(exported["entryCount"], 2);

    call("5", "workspace.select", json!({ "path": dst.to_string_lossy() }));
    let imported = call(
        "6",
        "schedule.importBundle",
        json!({ "inPath": bundle.to_string_lossy() }),
    );
    assert_eq!(imported["imported"], 2);
    assert_eq!(imported["persisted"], true);
    let rows = imported["view"]["schedule"]["rows"].as_array().expect("rows");
    assert_eq!(rows[0]["instructor"], "Ana");
    assert_eq!(rows[1]["duration"], "0.5");

    drop(call);
    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(src);
    let _ = std::fs::remove_dir_all(dst);
}
