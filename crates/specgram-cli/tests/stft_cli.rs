use assert_cmd::prelude::*;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write_capture(path: &Path, samples: &[(f32, f32)]) -> Result<(), Box<dyn Error>> {
    let mut bytes = Vec::new();
    for &(i, q) in samples {
        bytes.extend_from_slice(&i.to_le_bytes());
        bytes.extend_from_slice(&q.to_le_bytes());
    }
    fs::write(path, bytes)?;
    Ok(())
}

fn read_f32(path: &Path) -> Result<Vec<f32>, Box<dyn Error>> {
    Ok(fs::read(path)?
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect())
}

#[test]
fn stft_writes_ordered_half_swapped_frames() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("dc.iq");
    let output = tmp.path().join("frames.bin");
    write_capture(&input, &[(1.0, 0.0); 8])?;

    Command::cargo_bin("specgram")?
        .args([
            "stft",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-s",
            "4",
            "-l",
            "2",
            "-c",
            "2",
            "--plan",
            "estimate",
        ])
        .assert()
        .success();

    // DC input: three overlapped frames, each [0, 0, 4, 0] after the swap
    let floats = read_f32(&output)?;
    assert_eq!(floats.len(), 12);
    for frame in floats.chunks_exact(4) {
        assert!(frame[0].abs() < 1e-6);
        assert!(frame[1].abs() < 1e-6);
        assert!((frame[2] - 4.0).abs() < 1e-6);
        assert!(frame[3].abs() < 1e-6);
    }
    Ok(())
}

#[test]
fn short_window_file_equals_explicit_zero_padding() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("tone.iq");
    let samples: Vec<(f32, f32)> = (0..32)
        .map(|i| ((i as f32 * 0.4).sin(), (i as f32 * 0.4).cos()))
        .collect();
    write_capture(&input, &samples)?;

    let mut outputs = Vec::new();
    for (name, coeffs) in [("short", vec![1.0f32, 0.5]), ("padded", vec![1.0, 0.5, 0.0, 0.0])] {
        let window = tmp.path().join(format!("{name}.f32"));
        let mut bytes = Vec::new();
        for c in &coeffs {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
        fs::write(&window, bytes)?;

        let output = tmp.path().join(format!("{name}.bin"));
        Command::cargo_bin("specgram")?
            .args([
                "stft",
                "-i",
                input.to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
                "-s",
                "4",
                "-l",
                "1",
                "-w",
                window.to_str().unwrap(),
                "--plan",
                "estimate",
            ])
            .assert()
            .success();
        outputs.push(fs::read(&output)?);
    }

    assert_eq!(outputs[0], outputs[1]);
    Ok(())
}

#[test]
fn incompatible_overlap_refuses_before_writing() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("in.iq");
    let output = tmp.path().join("out.bin");
    write_capture(&input, &[(1.0, 0.0); 12])?;

    Command::cargo_bin("specgram")?
        .args([
            "stft",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-s",
            "6",
            "-l",
            "4",
        ])
        .assert()
        .failure();

    assert!(!output.exists());
    Ok(())
}

#[test]
fn energy_sums_squared_magnitudes() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let input = tmp.path().join("in.iq");
    let output = tmp.path().join("bins.bin");
    write_capture(&input, &[(1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (2.0, 0.0)])?;

    Command::cargo_bin("specgram")?
        .args([
            "energy",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-s",
            "4",
        ])
        .assert()
        .success();

    let bytes = fs::read(&output)?;
    assert_eq!(bytes.len(), 8);
    let bin = f64::from_le_bytes(bytes[..8].try_into().unwrap());
    assert_eq!(bin, 8.0);
    Ok(())
}

#[test]
fn live_mode_reports_missing_driver() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let output = tmp.path().join("out.bin");

    Command::cargo_bin("specgram")?
        .args([
            "live",
            "-o",
            output.to_str().unwrap(),
            "-s",
            "512",
            "-l",
            "2",
            "-a",
            "addr=192.168.10.2",
            "-f",
            "100000000",
            "-r",
            "1000000",
            "-t",
            "1",
        ])
        .assert()
        .failure();
    Ok(())
}
