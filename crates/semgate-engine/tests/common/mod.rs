//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use semgate_apidiff::classfile::access;
use semgate_apidiff::fixtures::{class_entry, write_aar, write_jar, ClassFileBuilder};
use semgate_core::{ApiComparator, ChangeModel, ExclusionSet, Result};
use semgate_engine::{CheckRequest, ReportTargets};
use std::cell::Cell;
use std::path::{Path, PathBuf};

pub const VECTOR: &str = "com/io7m/jtensors/VectorI4F";

/// The 7.1.0 surface
pub fn vector_v1() -> Vec<(String, Vec<u8>)> {
    vec![(
        class_entry(VECTOR),
        ClassFileBuilder::new(VECTOR)
            .field(access::PUBLIC | access::FINAL, "x", "F")
            .method(access::PUBLIC, "magnitude", "()F")
            .method(access::PUBLIC | access::STATIC, "dot", "(Lcom/io7m/jtensors/VectorI4F;Lcom/io7m/jtensors/VectorI4F;)F")
            .build(),
    )]
}

/// `dot` removed: requires MAJOR
pub fn vector_v2_breaking() -> Vec<(String, Vec<u8>)> {
    vec![(
        class_entry(VECTOR),
        ClassFileBuilder::new(VECTOR)
            .field(access::PUBLIC | access::FINAL, "x", "F")
            .method(access::PUBLIC, "magnitude", "()F")
            .build(),
    )]
}

/// `normalize` added: requires MINOR
pub fn vector_v2_additive() -> Vec<(String, Vec<u8>)> {
    vec![(
        class_entry(VECTOR),
        ClassFileBuilder::new(VECTOR)
            .field(access::PUBLIC | access::FINAL, "x", "F")
            .method(access::PUBLIC, "magnitude", "()F")
            .method(access::PUBLIC | access::STATIC, "dot", "(Lcom/io7m/jtensors/VectorI4F;Lcom/io7m/jtensors/VectorI4F;)F")
            .method(access::PUBLIC, "normalize", "()Lcom/io7m/jtensors/VectorI4F;")
            .build(),
    )]
}

pub fn jar(dir: &Path, name: &str, entries: &[(String, Vec<u8>)]) -> PathBuf {
    let path = dir.join(name);
    write_jar(&path, entries).unwrap();
    path
}

pub fn aar(dir: &Path, name: &str, entries: &[(String, Vec<u8>)]) -> PathBuf {
    let path = dir.join(name);
    write_aar(&path, entries).unwrap();
    path
}

pub fn request(dir: &Path, old: &Path, old_version: &str, new: &Path, new_version: &str) -> CheckRequest {
    CheckRequest {
        old_location: old.display().to_string(),
        old_version: old_version.to_string(),
        new_location: new.display().to_string(),
        new_version: new_version.to_string(),
        exclude_list: None,
        ignore_missing_old: false,
        reports: ReportTargets {
            text: dir.join("reports/report.txt"),
            html: dir.join("reports/report.html"),
            json: None,
        },
    }
}

/// Comparator that records calls and returns a canned model
pub struct RecordingComparator {
    pub calls: Cell<usize>,
    pub model: ChangeModel,
}

impl RecordingComparator {
    pub fn returning(model: ChangeModel) -> Self {
        Self {
            calls: Cell::new(0),
            model,
        }
    }
}

impl ApiComparator for RecordingComparator {
    fn compare(&self, _old: &Path, _new: &Path, _exclusions: &ExclusionSet) -> Result<ChangeModel> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.model.clone())
    }
}
