// src/services/archive.rs

//! In-memory log archive reader.
//!
//! GitHub names per-step logs with a numeric prefix (`1_checkout.txt`,
//! `2_build.txt`), so lexicographic member order reconstructs the order the
//! steps ran in. Nothing is written to disk.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::{AppError, Result};
use crate::models::LogMember;

/// Opened archive: member names mapped to their zip entry, ordered by name.
///
/// Only the central directory is parsed up front. Member data is decompressed
/// on `read`, so a damaged member never affects the others.
#[derive(Debug)]
pub struct LogArchive<'a> {
    zip: ZipArchive<Cursor<&'a [u8]>>,
    members: BTreeMap<String, usize>,
}

impl<'a> LogArchive<'a> {
    /// Open a zip container held in memory.
    ///
    /// Fails with `CorruptArchive` if the container is invalid or truncated.
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        let zip = ZipArchive::new(Cursor::new(bytes)).map_err(AppError::corrupt)?;

        let mut members = BTreeMap::new();
        for index in 0..zip.len() {
            let name = zip
                .name_for_index(index)
                .ok_or_else(|| AppError::corrupt(format!("missing entry {index}")))?;
            if name.ends_with('/') {
                continue;
            }
            members.insert(name.to_string(), index);
        }

        Ok(Self { zip, members })
    }

    /// Member names in lexicographic order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Decompress one member and decode it as UTF-8 text.
    ///
    /// The buffer grows with the bytes actually inflated; the size declared
    /// in the entry header is never trusted.
    pub fn read(&self, name: &str) -> Result<LogMember> {
        let index = *self
            .members
            .get(name)
            .ok_or_else(|| AppError::member_read(name, "no such member"))?;

        let mut zip = self.zip.clone();
        let mut entry = zip
            .by_index(index)
            .map_err(|e| AppError::member_read(name, e))?;
        let mut data = Vec::new();
        entry
            .read_to_end(&mut data)
            .map_err(|e| AppError::member_read(name, e))?;

        let content = String::from_utf8(data).map_err(|source| AppError::Decode {
            member: name.to_string(),
            source,
        })?;
        Ok(LogMember {
            name: name.to_string(),
            content,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::CompressionMethod;
    use zip::write::{SimpleFileOptions, ZipWriter};

    /// Build a deflated zip in memory; entries are written in the given order.
    pub(crate) fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        build_zip_with(entries, CompressionMethod::Deflated)
    }

    /// Build a zip whose member data is stored verbatim.
    pub(crate) fn build_stored_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        build_zip_with(entries, CompressionMethod::Stored)
    }

    fn build_zip_with(entries: &[(&str, &[u8])], method: CompressionMethod) -> Vec<u8> {
        let options = SimpleFileOptions::default().compression_method(method);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
                continue;
            }
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// Flip the first byte of every stored occurrence of `needle`, breaking its CRC.
    pub(crate) fn damage_stored(bytes: &mut [u8], needle: &[u8]) {
        let mut at = 0;
        while at + needle.len() <= bytes.len() {
            if &bytes[at..at + needle.len()] == needle {
                bytes[at] ^= 0x20;
                at += needle.len();
            } else {
                at += 1;
            }
        }
    }

    /// One stored entry whose central directory declares a 1 PiB size via zip64.
    fn inflated_size_zip() -> Vec<u8> {
        let name = b"1_build.txt";
        let data = b"ERROR: x\n";
        let crc: u32 = 0xcd70_3e14;
        let mut out = Vec::new();

        // Local file header
        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        out.extend_from_slice(&45u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0x21u16.to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(data);

        // Central directory
        let cd_offset = out.len() as u32;
        out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        out.extend_from_slice(&45u16.to_le_bytes());
        out.extend_from_slice(&45u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0x21u16.to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&u32::MAX.to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&12u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(&0x0001u16.to_le_bytes());
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(&(1u64 << 50).to_le_bytes());
        let cd_size = out.len() as u32 - cd_offset;

        // End of central directory
        out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&cd_size.to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out
    }

    #[test]
    fn test_members_sorted_lexicographically() {
        let bytes = build_zip(&[
            ("3_test.txt", b"c"),
            ("1_checkout.txt", b"a"),
            ("2_build.txt", b"b"),
        ]);
        let archive = LogArchive::open(&bytes).unwrap();
        let names: Vec<_> = archive.members().collect();
        assert_eq!(names, vec!["1_checkout.txt", "2_build.txt", "3_test.txt"]);
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_directories_are_skipped() {
        let bytes = build_zip(&[("build/", b""), ("build/1_setup.txt", b"ok")]);
        let archive = LogArchive::open(&bytes).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.read("build/1_setup.txt").unwrap().content, "ok");
    }

    #[test]
    fn test_empty_archive() {
        let bytes = build_zip(&[]);
        let archive = LogArchive::open(&bytes).unwrap();
        assert!(archive.is_empty());
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let err = LogArchive::open(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, AppError::CorruptArchive(_)));
    }

    #[test]
    fn test_truncated_is_corrupt() {
        let bytes = build_zip(&[("1_build.txt", b"hello world")]);
        let err = LogArchive::open(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, AppError::CorruptArchive(_)));
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let bytes = build_zip(&[("1_build.txt", &[0xff, 0xfe, 0x00])]);
        let archive = LogArchive::open(&bytes).unwrap();
        let err = archive.read("1_build.txt").unwrap_err();
        assert!(err.is_member_level());
    }

    #[test]
    fn test_inflated_declared_size_does_not_abort() {
        let bytes = inflated_size_zip();
        match LogArchive::open(&bytes) {
            Ok(archive) => match archive.read("1_build.txt") {
                Ok(member) => assert_eq!(member.content, "ERROR: x\n"),
                Err(e) => assert!(e.is_member_level(), "unexpected error: {e}"),
            },
            Err(e) => assert!(matches!(e, AppError::CorruptArchive(_))),
        }
    }

    #[test]
    fn test_damaged_member_does_not_spoil_archive() {
        let mut bytes = build_stored_zip(&[
            ("1_build.txt", b"make: Error 2"),
            ("build/system.txt", b"runner diagnostics"),
        ]);
        damage_stored(&mut bytes, b"runner diagnostics");

        let archive = LogArchive::open(&bytes).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.read("1_build.txt").unwrap().content, "make: Error 2");
        let err = archive.read("build/system.txt").unwrap_err();
        assert!(matches!(err, AppError::MemberRead { .. }));
    }

    #[test]
    fn test_unknown_member_is_member_level() {
        let bytes = build_zip(&[("1_build.txt", b"ok")]);
        let archive = LogArchive::open(&bytes).unwrap();
        assert!(archive.read("2_missing.txt").unwrap_err().is_member_level());
    }
}
