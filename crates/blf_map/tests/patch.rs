use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use blf_map::{
    error::{Error, Result},
    layout::{MapLayout, MIN_MAP_LENGTH},
    patch, MapPatcher, PatchOutcome, RemapTable,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tracing_test::traced_test;

const MAP_LENGTH: usize = 0xE200;

fn record_offset(slot: usize) -> usize {
    MapLayout::default().record_offset(slot) as usize
}

/// A map with valid magics, every slot unused and some filler in the record tails
fn build_map(length: usize) -> Vec<u8> {
    let mut data = (0..length).map(|i| (i % 251) as u8).collect::<Vec<_>>();
    data[0..4].copy_from_slice(b"_blf");
    data[0x138..0x13C].copy_from_slice(b"mapv");
    for slot in 0..256 {
        set_index(&mut data, slot, -1);
    }
    data
}

fn set_index(data: &mut [u8], slot: usize, index: i32) {
    let offset = record_offset(slot);
    data[offset..offset + 4].copy_from_slice(&index.to_le_bytes());
}

fn get_index(data: &[u8], slot: usize) -> i32 {
    let offset = record_offset(slot);
    i32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
}

fn write_fixture(dir: &TempDir, name: &str, data: &[u8]) -> Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, data)?;
    Ok(path)
}

fn assert_untouched(path: &Path, original: &[u8]) -> Result<()> {
    let actual = fs::read(path)?;
    assert_eq!(actual.len(), original.len());
    assert!(actual == original, "file contents changed");
    Ok(())
}

#[traced_test]
#[test]
fn end_to_end_example() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let table = RemapTable::parse("05,0A\n0B,0C\n");
    assert_eq!(table, RemapTable::from_iter([(5, 10), (11, 12)]));

    let mut data = build_map(MAP_LENGTH);
    set_index(&mut data, 3, 5);
    set_index(&mut data, 4, -1);
    set_index(&mut data, 5, 99);
    let path = write_fixture(&dir, "example.map", &data)?;

    assert_eq!(patch(&path, &table)?, PatchOutcome::Patched);

    let actual = fs::read(&path)?;
    assert_eq!(get_index(&actual, 3), 10);
    assert_eq!(get_index(&actual, 4), -1);
    assert_eq!(get_index(&actual, 5), 99);

    let mut expected = data;
    set_index(&mut expected, 3, 10);
    assert!(actual == expected, "only the remapped index may change");

    Ok(())
}

#[traced_test]
#[test]
fn short_file_is_not_applicable() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let table = RemapTable::from_iter([(5, 10)]);

    let mut data = build_map(MAP_LENGTH);
    set_index(&mut data, 0, 5);
    data.truncate(MIN_MAP_LENGTH as usize - 1);
    let path = write_fixture(&dir, "short.map", &data)?;

    assert_eq!(patch(&path, &table)?, PatchOutcome::NotApplicable);
    assert_untouched(&path, &data)?;

    Ok(())
}

#[traced_test]
#[test]
fn exact_minimum_length_is_a_map() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let table = RemapTable::from_iter([(5, 10)]);

    let mut data = build_map(MIN_MAP_LENGTH as usize);
    set_index(&mut data, 255, 5);
    let path = write_fixture(&dir, "minimum.map", &data)?;

    assert_eq!(patch(&path, &table)?, PatchOutcome::Patched);
    assert_eq!(get_index(&fs::read(&path)?, 255), 10);

    Ok(())
}

#[traced_test]
#[test]
fn wrong_magic_is_not_applicable() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let table = RemapTable::from_iter([(5, 10)]);

    for (offset, name) in [(0x0, "blf.map"), (0x138, "mapv.map")] {
        let mut data = build_map(MAP_LENGTH);
        set_index(&mut data, 0, 5);
        data[offset..offset + 4].copy_from_slice(b"XXXX");
        let path = write_fixture(&dir, name, &data)?;

        assert_eq!(patch(&path, &table)?, PatchOutcome::NotApplicable);
        assert_untouched(&path, &data)?;
    }

    Ok(())
}

#[traced_test]
#[test]
fn unused_and_unknown_references_are_kept() -> Result<()> {
    let dir = tempfile::tempdir()?;
    // -1 is in the table on purpose, unused slots must never be looked up
    let table = RemapTable::from_iter([(-1, 7), (1, 2)]);

    let mut data = build_map(MAP_LENGTH);
    set_index(&mut data, 0, 1);
    set_index(&mut data, 1, 3);
    set_index(&mut data, 2, i32::MIN);
    let path = write_fixture(&dir, "mixed.map", &data)?;

    assert_eq!(patch(&path, &table)?, PatchOutcome::Patched);

    let actual = fs::read(&path)?;
    assert_eq!(get_index(&actual, 0), 2);
    assert_eq!(get_index(&actual, 1), 3);
    assert_eq!(get_index(&actual, 2), i32::MIN);
    assert_eq!(
        (3..256).filter(|slot| get_index(&actual, *slot) == -1).count(),
        253
    );

    Ok(())
}

#[traced_test]
#[test]
fn valid_map_without_matches_is_patched() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let table = RemapTable::from_iter([(1, 2)]);

    let data = build_map(MAP_LENGTH);
    let path = write_fixture(&dir, "nothing.map", &data)?;

    assert_eq!(patch(&path, &table)?, PatchOutcome::Patched);
    assert_untouched(&path, &data)?;

    Ok(())
}

#[traced_test]
#[test]
fn patch_twice_with_disjoint_table() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let table = RemapTable::from_iter([(1, 100), (2, 200), (3, 300)]);
    assert!(table.is_chain_free());

    let mut data = build_map(MAP_LENGTH);
    for slot in 0..256 {
        set_index(&mut data, slot, (slot % 5) as i32);
    }
    let path = write_fixture(&dir, "twice.map", &data)?;
    let patcher = MapPatcher::new(&table);

    patcher.patch_path(&path)?;
    let once = fs::read(&path)?;
    patcher.patch_path(&path)?;
    let twice = fs::read(&path)?;

    assert!(once != data);
    assert!(once == twice, "second pass changed the map");

    Ok(())
}

#[traced_test]
#[test]
fn chained_table_is_applied_one_step_per_pass() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let table = RemapTable::from_iter([(1, 2), (2, 3)]);
    assert!(!table.is_chain_free());

    let mut data = build_map(MAP_LENGTH);
    set_index(&mut data, 0, 1);
    set_index(&mut data, 1, 2);
    let path = write_fixture(&dir, "chain.map", &data)?;

    patch(&path, &table)?;
    let once = fs::read(&path)?;
    assert_eq!(get_index(&once, 0), 2);
    assert_eq!(get_index(&once, 1), 3);

    patch(&path, &table)?;
    let twice = fs::read(&path)?;
    assert_eq!(get_index(&twice, 0), 3);
    assert_eq!(get_index(&twice, 1), 3);

    Ok(())
}

#[traced_test]
#[test]
fn missing_file_is_an_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let table = RemapTable::default();

    match patch(dir.path().join("missing.map"), &table) {
        Err(Error::IOError(e)) => assert_eq!(e.kind(), ErrorKind::NotFound),
        other => panic!("expected a not found error, got {other:?}"),
    }

    Ok(())
}

#[traced_test]
#[test]
fn pending_matches_patch() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let table = RemapTable::parse("05,0A\n0B,0C\n");

    let mut data = build_map(MAP_LENGTH);
    set_index(&mut data, 7, 5);
    set_index(&mut data, 8, 11);
    set_index(&mut data, 9, 11);
    let path = write_fixture(&dir, "pending.map", &data)?;
    let patcher = MapPatcher::new(&table);

    assert_eq!(patcher.pending_path(&path)?, Some(3));
    assert_untouched(&path, &data)?;

    patcher.patch_path(&path)?;
    assert_eq!(patcher.pending_path(&path)?, Some(0));

    Ok(())
}

#[traced_test]
#[test]
fn map_held_elsewhere_is_an_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let table = RemapTable::from_iter([(5, 10)]);

    let mut data = build_map(MAP_LENGTH);
    set_index(&mut data, 0, 5);
    let path = write_fixture(&dir, "held.map", &data)?;

    // another writer that has the map open and locked
    let other = OpenOptions::new().read(true).write(true).open(&path)?;
    other.lock()?;

    assert!(matches!(patch(&path, &table), Err(Error::IOError(_))));
    drop(other);
    assert_untouched(&path, &data)?;

    assert_eq!(patch(&path, &table)?, PatchOutcome::Patched);
    assert_eq!(get_index(&fs::read(&path)?, 0), 10);

    Ok(())
}
