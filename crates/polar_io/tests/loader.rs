use polar_io::loader::{load_bit_file, save_frames, slice_frames};
use std::fs;
use tempfile::TempDir;

#[test]
fn frames_round_trip_through_a_bit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.bin");
    let frames = vec![
        vec![1, 0, 1, 1, 0, 0, 0, 1, 1, 1],
        vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ];

    save_frames(&path, &frames).unwrap();
    // 10 bits per frame pad to 2 bytes each
    assert_eq!(fs::metadata(&path).unwrap().len(), 6);

    let raw = load_bit_file(&path).unwrap();
    assert_eq!(slice_frames(&raw, 10), frames);
}

#[test]
fn packing_is_lsb_first() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("one.bin");
    save_frames(&path, &[vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1]]).unwrap();
    assert_eq!(fs::read(&path).unwrap(), vec![0x01, 0x02]);
}

#[test]
fn trailing_partial_frame_is_dropped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.bin");
    fs::write(&path, [0xAA, 0x55, 0x0F]).unwrap();

    let raw = load_bit_file(&path).unwrap();
    let frames = slice_frames(&raw, 16);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0][..8], [0, 1, 0, 1, 0, 1, 0, 1]);
    assert!(slice_frames(&raw, 0).is_empty());
}

#[test]
fn non_binary_or_ragged_frames_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.bin");
    assert!(save_frames(&path, &[vec![0, 2]]).is_err());
    assert!(save_frames(&path, &[vec![0, 1], vec![1]]).is_err());
}

#[test]
fn missing_file_reports_its_path() {
    let err = load_bit_file("/nonexistent/frames.bin").unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/frames.bin"));
}
