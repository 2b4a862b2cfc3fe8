//! Builders for synthetic class files and jars.
//!
//! Enabled with the `fixtures` feature. Output is a structurally valid class
//! file with no code; enough for the surface reader and the comparator.

use crate::classfile::{access, MAGIC};
use std::collections::HashMap;
use std::io::{Result, Write};
use std::path::Path;

const JAVA_8: u16 = 52;

struct PendingMember {
    access: u16,
    name: u16,
    descriptor: u16,
    attributes: Vec<(u16, Vec<u8>)>,
}

/// Assembles a class file one declaration at a time.
///
/// ```
/// use semgate_apidiff::classfile::access;
/// use semgate_apidiff::fixtures::ClassFileBuilder;
///
/// let bytes = ClassFileBuilder::new("com/acme/Api")
///     .method(access::PUBLIC, "run", "()V")
///     .build();
/// assert_eq!(&bytes[..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
/// ```
pub struct ClassFileBuilder {
    pool: Vec<u8>,
    pool_count: u16,
    utf8_index: HashMap<String, u16>,
    class_index: HashMap<String, u16>,
    access: u16,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    fields: Vec<PendingMember>,
    methods: Vec<PendingMember>,
}

impl ClassFileBuilder {
    /// A public class extending `java/lang/Object`
    pub fn new(internal_name: &str) -> Self {
        let mut builder = Self {
            pool: Vec::new(),
            pool_count: 1,
            utf8_index: HashMap::new(),
            class_index: HashMap::new(),
            access: access::PUBLIC | access::SUPER,
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        };
        builder.this_class = builder.class(internal_name);
        builder.super_class = builder.class("java/lang/Object");
        builder
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(index) = self.utf8_index.get(value) {
            return *index;
        }
        let index = self.pool_count;
        self.pool.push(1);
        self.pool.extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.pool.extend_from_slice(value.as_bytes());
        self.pool_count += 1;
        self.utf8_index.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        if let Some(index) = self.class_index.get(internal_name) {
            return *index;
        }
        let name = self.utf8(internal_name);
        let index = self.pool_count;
        self.pool.push(7);
        self.pool.extend_from_slice(&name.to_be_bytes());
        self.pool_count += 1;
        self.class_index.insert(internal_name.to_string(), index);
        index
    }

    pub fn access(mut self, flags: u16) -> Self {
        self.access = flags;
        self
    }

    pub fn super_class(mut self, internal_name: &str) -> Self {
        self.super_class = self.class(internal_name);
        self
    }

    pub fn interface(mut self, internal_name: &str) -> Self {
        let index = self.class(internal_name);
        self.interfaces.push(index);
        self
    }

    /// Add an unreferenced long constant (occupies two pool slots)
    pub fn long_constant(mut self, value: i64) -> Self {
        self.pool.push(5);
        self.pool.extend_from_slice(&value.to_be_bytes());
        self.pool_count += 2;
        self
    }

    pub fn field(mut self, flags: u16, name: &str, descriptor: &str) -> Self {
        let member = self.member(flags, name, descriptor);
        self.fields.push(member);
        self
    }

    pub fn method(mut self, flags: u16, name: &str, descriptor: &str) -> Self {
        let member = self.member(flags, name, descriptor);
        self.methods.push(member);
        self
    }

    /// Attach a raw attribute to the most recently added method
    pub fn method_attribute(mut self, name: &str, payload: &[u8]) -> Self {
        let name = self.utf8(name);
        if let Some(method) = self.methods.last_mut() {
            method.attributes.push((name, payload.to_vec()));
        }
        self
    }

    fn member(&mut self, flags: u16, name: &str, descriptor: &str) -> PendingMember {
        PendingMember {
            access: flags,
            name: self.utf8(name),
            descriptor: self.utf8(descriptor),
            attributes: Vec::new(),
        }
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&JAVA_8.to_be_bytes());
        out.extend_from_slice(&self.pool_count.to_be_bytes());
        out.extend_from_slice(&self.pool);
        out.extend_from_slice(&self.access.to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());
        out.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for index in &self.interfaces {
            out.extend_from_slice(&index.to_be_bytes());
        }
        for members in [&self.fields, &self.methods] {
            out.extend_from_slice(&(members.len() as u16).to_be_bytes());
            for member in members {
                out.extend_from_slice(&member.access.to_be_bytes());
                out.extend_from_slice(&member.name.to_be_bytes());
                out.extend_from_slice(&member.descriptor.to_be_bytes());
                out.extend_from_slice(&(member.attributes.len() as u16).to_be_bytes());
                for (name, payload) in &member.attributes {
                    out.extend_from_slice(&name.to_be_bytes());
                    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
                    out.extend_from_slice(payload);
                }
            }
        }
        // class attributes
        out.extend_from_slice(&0u16.to_be_bytes());
        out
    }
}

/// Jar entry name for an internal class name: `com/acme/Api.class`
pub fn class_entry(internal_name: &str) -> String {
    format!("{}.class", internal_name)
}

/// Write a zip archive with the given entries, in order.
///
/// # Errors
///
/// Any I/O or zip error, converted to `std::io::Error`.
pub fn write_jar(path: &Path, entries: &[(String, Vec<u8>)]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, bytes) in entries {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(bytes)?;
    }
    writer.finish()?;
    Ok(())
}

/// Write an `.aar` whose `classes.jar` holds the given class entries.
///
/// # Errors
///
/// As [`write_jar`].
pub fn write_aar(path: &Path, entries: &[(String, Vec<u8>)]) -> Result<()> {
    let jar_path = path.with_extension("inner.jar");
    write_jar(&jar_path, entries)?;
    let jar = std::fs::read(&jar_path)?;
    std::fs::remove_file(&jar_path)?;
    write_jar(
        path,
        &[
            (
                "AndroidManifest.xml".to_string(),
                b"<manifest package=\"com.acme\"/>".to_vec(),
            ),
            ("classes.jar".to_string(), jar),
        ],
    )
}
