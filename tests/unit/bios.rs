//! `BiosFile` coverage: clear, load (success and out-of-bounds), and size,
//! exercised against the shared `VecBios` harness.

use crate::common::bios::VecBios;
use rstest::rstest;
use sh4_core::sim::BiosFile;
use sh4_core::CoreError;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn fresh_image_is_zeroed_and_reports_its_size() {
    let bios = VecBios::new(256);

    assert_eq!(bios.size(), 256);
    assert!(bios.bytes().iter().all(|&b| b == 0));
}

#[test]
fn load_copies_bytes_at_the_given_offset() {
    let mut bios = VecBios::new(16);
    let payload = [0xDE, 0xAD, 0xBE, 0xEF];

    bios.load(4, &payload).unwrap();

    assert_eq!(&bios.bytes()[4..8], &payload);
    assert!(bios.bytes()[..4].iter().all(|&b| b == 0));
    assert!(bios.bytes()[8..].iter().all(|&b| b == 0));
}

#[test]
fn load_at_offset_zero_spanning_the_whole_image_succeeds() {
    let mut bios = VecBios::new(4);
    let payload = [1, 2, 3, 4];

    bios.load(0, &payload).unwrap();

    assert_eq!(bios.bytes(), &payload);
}

#[rstest]
#[case::payload_spans_past_the_end(6, &[0, 0, 0, 0])]
#[case::offset_already_past_the_end(9, &[1])]
fn load_past_the_end_reports_overflow(#[case] offset: usize, #[case] payload: &[u8]) {
    let mut bios = VecBios::new(8);

    let err = bios.load(offset, payload).unwrap_err();

    assert!(matches!(err, CoreError::Overflow(_)));
}

#[test]
fn clear_zeroes_a_previously_loaded_image() {
    let mut bios = VecBios::new(8);
    bios.load(0, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

    bios.clear();

    assert!(bios.bytes().iter().all(|&b| b == 0));
    assert_eq!(bios.size(), 8);
}

#[test]
fn repeated_loads_overwrite_rather_than_accumulate() {
    let mut bios = VecBios::new(4);
    bios.load(0, &[0xFF, 0xFF, 0xFF, 0xFF]).unwrap();

    bios.load(0, &[0, 0, 0, 0]).unwrap();

    assert_eq!(bios.bytes(), &[0, 0, 0, 0]);
}

/// A real boot image lives on disk; load it from an actual file rather than
/// an in-memory byte slice, the way an embedder's boot path would.
#[test]
fn loading_an_image_read_from_a_real_file_matches_its_contents() {
    let image: Vec<u8> = (0..512).map(|i| (i % 256) as u8).collect();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&image).unwrap();
    file.flush().unwrap();

    let on_disk = std::fs::read(file.path()).unwrap();
    let mut bios = VecBios::new(on_disk.len());
    bios.load(0, &on_disk).unwrap();

    assert_eq!(bios.bytes(), &image[..]);
}
