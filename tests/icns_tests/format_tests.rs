//! Tests for the .icns codec
//!
//! These tests verify:
//! - write_to() produces the big-endian header/entry layout
//! - load() reads entries back, duplicates and order included
//! - Malformed input yields Format errors and leaves no store behind
//! - Bytes past the declared length are never read

use std::io::Read;

use icnskit::{Config, IcnsBuilder, IcnsError, IcnsIcons};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn config_in(temp: &TempDir) -> Config {
    Config::builder().temp_dir(temp.path()).build()
}

/// Hand-encode an .icns file
fn encode(entries: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let total: usize = 8 + entries.iter().map(|(_, d)| 8 + d.len()).sum::<usize>();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"icns");
    out.extend_from_slice(&(total as u32).to_be_bytes());
    for (tag, data) in entries {
        out.extend_from_slice(&tag[..]);
        out.extend_from_slice(&((data.len() + 8) as u32).to_be_bytes());
        out.extend_from_slice(data);
    }
    out
}

fn store_files(temp: &TempDir) -> usize {
    std::fs::read_dir(temp.path()).unwrap().count()
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_write_to_layout() {
    let temp = TempDir::new().unwrap();
    let builder = IcnsBuilder::with_config(config_in(&temp)).unwrap();
    builder.add("ic07", &b"AAAA"[..]).unwrap();
    builder.add("ic08", &b"BB"[..]).unwrap();
    let icons = builder.build().unwrap();

    let mut out = Vec::new();
    let written = icons.write_to(&mut out).unwrap();

    let expected = encode(&[(b"ic07", &b"AAAA"[..]), (b"ic08", &b"BB"[..])]);
    assert_eq!(out, expected);
    assert_eq!(written, expected.len() as u64);
    assert_eq!(icons.encoded_len().unwrap(), 30);
}

#[test]
fn test_write_to_empty_container() {
    let temp = TempDir::new().unwrap();
    let icons = IcnsBuilder::with_config(config_in(&temp)).unwrap().build().unwrap();

    let mut out = Vec::new();
    assert_eq!(icons.write_to(&mut out).unwrap(), 8);
    assert_eq!(out, b"icns\0\0\0\x08");
}

#[test]
fn test_write_to_after_close_fails() {
    let temp = TempDir::new().unwrap();
    let builder = IcnsBuilder::with_config(config_in(&temp)).unwrap();
    builder.add("ic07", &b"data"[..]).unwrap();
    let icons = builder.build().unwrap();
    icons.close().unwrap();

    let err = icons.write_to(&mut Vec::new()).unwrap_err();
    assert!(err.is_environment_error());
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_load_reads_entries() {
    let temp = TempDir::new().unwrap();
    let raw = encode(&[
        (b"is32", &b"small"[..]),
        (b"ic07", &[7u8; 300][..]),
        (b"is32", &b"again"[..]),
    ]);

    let icons = IcnsIcons::load_with_config(&raw[..], config_in(&temp)).unwrap();

    assert_eq!(icons.len(), 3);
    let tags: Vec<String> = icons.iter().map(|e| e.os_type().to_string()).collect();
    assert_eq!(tags, vec!["is32", "ic07", "is32"]);
    assert_eq!(icons.entries()[1].read_to_vec().unwrap(), vec![7u8; 300]);
    assert_eq!(icons.find("is32")[1].read_to_vec().unwrap(), b"again");
}

#[test]
fn test_load_then_write_reproduces_input() {
    let temp = TempDir::new().unwrap();
    let raw = encode(&[
        (b"ic07", &b"first payload"[..]),
        (b"ic08", &b""[..]),
        (b"TOC ", &b"toc"[..]),
    ]);

    let icons = IcnsIcons::load_with_config(&raw[..], config_in(&temp)).unwrap();
    let mut out = Vec::new();
    icons.write_to(&mut out).unwrap();

    assert_eq!(out, raw);
}

#[test]
fn test_load_stops_at_declared_length() {
    let temp = TempDir::new().unwrap();
    let mut raw = encode(&[(b"ic07", &b"abc"[..])]);
    let declared = raw.len();
    raw.extend_from_slice(b"trailing garbage");

    let mut input = &raw[..];
    let icons = IcnsIcons::load_with_config(&mut input, config_in(&temp)).unwrap();

    assert_eq!(icons.len(), 1);
    assert_eq!(raw.len() - input.len(), declared);

    let mut rest = Vec::new();
    input.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"trailing garbage");
}

#[test]
fn test_load_with_default_config() {
    let raw = encode(&[(b"ic07", &b"abc"[..])]);
    let icons = IcnsIcons::load(&raw[..]).unwrap();

    assert_eq!(icons.entries()[0].read_to_vec().unwrap(), b"abc");
    icons.close().unwrap();
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_load_rejects_bad_magic() {
    let temp = TempDir::new().unwrap();
    let mut raw = encode(&[(b"ic07", &b"abc"[..])]);
    raw[..4].copy_from_slice(b"icnz");

    let err = IcnsIcons::load_with_config(&raw[..], config_in(&temp)).unwrap_err();
    assert!(matches!(err, IcnsError::Format(_)));
    assert_eq!(store_files(&temp), 0);
}

#[test]
fn test_load_rejects_truncated_file_header() {
    let temp = TempDir::new().unwrap();
    let err = IcnsIcons::load_with_config(&b"icns\0\0"[..], config_in(&temp)).unwrap_err();

    assert!(matches!(err, IcnsError::Format(_)));
}

#[test]
fn test_load_rejects_short_declared_length() {
    let temp = TempDir::new().unwrap();
    let err = IcnsIcons::load_with_config(&b"icns\0\0\0\x04"[..], config_in(&temp)).unwrap_err();

    assert!(matches!(err, IcnsError::Format(_)));
}

#[test]
fn test_load_rejects_entry_length_below_header() {
    let temp = TempDir::new().unwrap();
    let mut raw = encode(&[(b"ic07", &b"abcd"[..])]);
    raw[12..16].copy_from_slice(&4u32.to_be_bytes());

    let err = IcnsIcons::load_with_config(&raw[..], config_in(&temp)).unwrap_err();

    assert!(matches!(err, IcnsError::Format(ref msg) if msg.contains("offset 8")));
    assert_eq!(store_files(&temp), 0);
}

#[test]
fn test_load_rejects_truncated_payload() {
    let temp = TempDir::new().unwrap();
    let raw = encode(&[(b"ic07", &b"good"[..]), (b"ic08", &[1u8; 100][..])]);
    let cut = &raw[..raw.len() - 40];

    let err = IcnsIcons::load_with_config(cut, config_in(&temp)).unwrap_err();

    assert!(matches!(err, IcnsError::Format(ref msg) if msg.contains("truncated entry")));
    assert_eq!(store_files(&temp), 0);
}

#[test]
fn test_load_rejects_entry_past_declared_length() {
    let temp = TempDir::new().unwrap();
    let mut raw = encode(&[(b"ic07", &[5u8; 64][..])]);
    // Declare a file length shorter than the entry claims
    raw[4..8].copy_from_slice(&40u32.to_be_bytes());

    let err = IcnsIcons::load_with_config(&raw[..], config_in(&temp)).unwrap_err();

    assert!(matches!(err, IcnsError::Format(_)));
    assert_eq!(store_files(&temp), 0);
}

#[test]
fn test_load_rejects_truncated_entry_header() {
    let temp = TempDir::new().unwrap();
    let mut raw = encode(&[(b"ic07", &b"abc"[..])]);
    // Claim room for another entry header that is not there
    let total = raw.len() as u32 + 4;
    raw[4..8].copy_from_slice(&total.to_be_bytes());
    raw.extend_from_slice(b"ic0");

    let err = IcnsIcons::load_with_config(&raw[..], config_in(&temp)).unwrap_err();

    assert!(matches!(err, IcnsError::Format(ref msg) if msg.contains("truncated header")));
    assert_eq!(store_files(&temp), 0);
}
