// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use predicates::prelude::*;

fn julia() -> Command {
    Command::cargo_bin("julia").unwrap()
}

#[test]
fn render_writes_an_image_and_echoes_the_polynomial() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("julia.png");

    julia()
        .args(&["render", "-s", "32", "-i", "50", "-t", "2", "-f"])
        .arg("z^2 + (-0.7+0.27015i)")
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("f(z) = z^2 + (-0.7+0.27015i)"));

    let image = image::open(&output).unwrap().to_rgb8();
    assert_eq!(image.dimensions(), (32, 32));
}

#[test]
fn render_accepts_a_negative_center_and_a_named_colormap() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("offset.png");

    julia()
        .args(&["render", "-s", "16", "-i", "20", "-c", "-0.5,0.25"])
        .args(&["-r", "1.5", "-m", "gray inverted", "--max", "10"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(output.exists());
}

#[test]
fn bad_polynomials_fail_with_a_message() {
    let dir = tempfile::tempdir().unwrap();

    julia()
        .args(&["render", "-s", "8", "-f", "z^2 + q"])
        .arg("-o")
        .arg(dir.path().join("never.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));

    assert!(!dir.path().join("never.png").exists());
}

#[test]
fn unknown_colormaps_are_rejected() {
    let dir = tempfile::tempdir().unwrap();

    julia()
        .args(&["render", "-s", "8", "-m", "plaid"])
        .arg("-o")
        .arg(dir.path().join("never.png"))
        .assert()
        .failure();
}

#[test]
fn swatch_stacks_one_band_per_colormap() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("swatch.png");

    julia()
        .args(&["swatch", "-w", "64", "--row-height", "4"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let image = image::open(&output).unwrap().to_rgb8();
    assert_eq!(image.dimensions(), (64, 19 * 4));
}

#[test]
fn colormaps_lists_every_map() {
    julia()
        .arg("colormaps")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(" 0  Jet")
                .and(predicate::str::contains("Gray Inverted"))
                .and(predicate::str::contains("18  HSV_alt")),
        );
}

#[test]
fn no_subcommand_prints_usage() {
    julia()
        .assert()
        .failure()
        .stderr(predicate::str::contains("USAGE"));
}
