use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_wcs_cards(dir: &Path) -> PathBuf {
    let path = dir.join("image-wcs.txt");
    std::fs::write(
        &path,
        "CRPIX1 = 512.0\nCRPIX2 = 512.0\nCRVAL1 = 202.46959\nCRVAL2 = 47.195187\n\
         CD1_1 = -1.3888888888888e-5\nCD2_2 = 1.3888888888888e-5\n",
    )
    .unwrap();
    path
}

#[test]
fn footprint_subcommand_writes_region_files() {
    let dir = TempDir::new().unwrap();
    let wcs = write_wcs_cards(dir.path());
    let out_dir = dir.path().join("out");
    let config = dir.path().join("no-such-config.json");

    let mut cmd = Command::cargo_bin("planner").unwrap();
    cmd.args([
        "footprint",
        "--config",
        config.to_str().unwrap(),
        "--wcs",
        wcs.to_str().unwrap(),
        "--out-dir",
        out_dir.to_str().unwrap(),
        "--long",
        "--ra",
        "202.46959",
        "--dec",
        "47.195187",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ds9-long-no.reg"));

    assert!(out_dir.join("ds9-long-no.reg").exists());
    assert!(out_dir.join("ds9-long-centre.reg").exists());
}

#[test]
fn unknown_dither_pattern_fails_with_its_name() {
    let dir = TempDir::new().unwrap();
    let wcs = write_wcs_cards(dir.path());
    let config = dir.path().join("no-such-config.json");

    let mut cmd = Command::cargo_bin("planner").unwrap();
    cmd.args([
        "footprint",
        "--config",
        config.to_str().unwrap(),
        "--wcs",
        wcs.to_str().unwrap(),
        "--out-dir",
        dir.path().join("out").to_str().unwrap(),
        "--long",
        "--dither",
        "SPIRAL",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown dither pattern 'SPIRAL'"));
}

#[test]
fn init_config_writes_a_loadable_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    let mut cmd = Command::cargo_bin("planner").unwrap();
    cmd.args(["init-config", "--config", config.to_str().unwrap()]);
    cmd.assert().success();

    let loaded = aperture_planner::Config::load(&config).unwrap();
    assert_eq!(loaded, aperture_planner::Config::default());
}
