//! Jar surface loading.
//!
//! A [`JarSurface`] is every class in a jar keyed by dotted name, with the
//! fields and methods the comparator needs. Visibility filtering happens in
//! the comparator so that "made non-public" can be told apart from "removed".

use crate::classfile::{access, parse_class, ClassFile, MemberInfo};
use semgate_core::errors::{io_error, ExError, ExErrorKind, Result};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

const CLASS_SUFFIX: &str = ".class";
const MULTI_RELEASE_PREFIX: &str = "META-INF/versions/";

/// Public shape of a single class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSurface {
    /// Dotted name, e.g. `com.acme.Outer$Inner`
    pub name: String,
    pub access: u16,
    pub super_class: Option<String>,
    pub interfaces: BTreeSet<String>,
    /// Keyed by field name
    pub fields: BTreeMap<String, MemberInfo>,
    /// Keyed by (name, descriptor)
    pub methods: BTreeMap<(String, String), MemberInfo>,
    /// SHA-256 of the raw class bytes
    pub digest: String,
}

impl ClassSurface {
    pub fn from_class_file(class: ClassFile, bytes: &[u8]) -> Self {
        let fields = class
            .fields
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect();
        let methods = class
            .methods
            .into_iter()
            .map(|m| ((m.name.clone(), m.descriptor.clone()), m))
            .collect();
        Self {
            name: dotted(&class.this_class),
            access: class.access,
            super_class: class.super_class.as_deref().map(dotted),
            interfaces: class.interfaces.iter().map(|i| dotted(i)).collect(),
            fields,
            methods,
            digest: hex::encode(Sha256::digest(bytes)),
        }
    }

    pub fn has(&self, flag: u16) -> bool {
        self.access & flag != 0
    }

    pub fn is_visible(&self) -> bool {
        self.has(access::PUBLIC)
    }
}

/// All classes of one jar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JarSurface {
    classes: BTreeMap<String, ClassSurface>,
}

impl JarSurface {
    pub fn new(classes: impl IntoIterator<Item = ClassSurface>) -> Self {
        Self {
            classes: classes.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ClassSurface> {
        self.classes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// `com/acme/Foo` → `com.acme.Foo`
pub fn dotted(internal_name: &str) -> String {
    internal_name.replace('/', ".")
}

/// Whether a jar entry contributes to the API surface
pub fn is_surface_entry(entry_name: &str) -> bool {
    if !entry_name.ends_with(CLASS_SUFFIX) || entry_name.starts_with(MULTI_RELEASE_PREFIX) {
        return false;
    }
    let file_name = entry_name.rsplit('/').next().unwrap_or(entry_name);
    file_name != "module-info.class" && file_name != "package-info.class"
}

/// Read every surface class of a jar.
///
/// # Errors
///
/// `ERR_MALFORMED_ARCHIVE` if the file is not a zip, `ERR_CLASS_FORMAT` if
/// an entry is not a valid class file, `ERR_IO` on read failure.
pub fn load_jar(path: &Path) -> Result<JarSurface> {
    let location = path.display().to_string();
    let file = File::open(path).map_err(|e| io_error("load_jar", e).with_artifact(location.clone()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        ExError::new(ExErrorKind::MalformedArchive)
            .with_op("load_jar")
            .with_artifact(location.clone())
            .with_message(format!("not a zip container: {}", e))
    })?;

    let mut classes = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| {
            ExError::new(ExErrorKind::MalformedArchive)
                .with_op("load_jar")
                .with_artifact(location.clone())
                .with_message(e.to_string())
        })?;
        if entry.is_dir() || !is_surface_entry(entry.name()) {
            continue;
        }
        let entry_name = entry.name().to_string();
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| io_error("load_jar", e).with_artifact(format!("{}!{}", location, entry_name)))?;
        let class = parse_class(&bytes)
            .map_err(|e| e.with_artifact(format!("{}!{}", location, entry_name)))?;
        classes.push(ClassSurface::from_class_file(class, &bytes));
    }

    Ok(JarSurface::new(classes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{class_entry, write_jar, ClassFileBuilder};

    #[test]
    fn test_surface_entry_filter() {
        assert!(is_surface_entry("com/acme/Api.class"));
        assert!(is_surface_entry("com/acme/Api$Inner.class"));
        assert!(!is_surface_entry("module-info.class"));
        assert!(!is_surface_entry("com/acme/package-info.class"));
        assert!(!is_surface_entry("META-INF/versions/11/com/acme/Api.class"));
        assert!(!is_surface_entry("META-INF/MANIFEST.MF"));
    }

    #[test]
    fn test_load_jar_keys_by_dotted_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let jar = dir.path().join("lib.jar");
        write_jar(
            &jar,
            &[
                ("META-INF/MANIFEST.MF".to_string(), b"Manifest-Version: 1.0\n".to_vec()),
                (
                    class_entry("com/acme/Api"),
                    ClassFileBuilder::new("com/acme/Api")
                        .interface("com/acme/Service")
                        .method(access::PUBLIC, "run", "()V")
                        .build(),
                ),
                (
                    class_entry("com/acme/package-info"),
                    b"skipped without parsing".to_vec(),
                ),
            ],
        )
        .unwrap();

        let surface = load_jar(&jar).unwrap();
        assert_eq!(surface.len(), 1);
        let api = surface.get("com.acme.Api").unwrap();
        assert!(api.is_visible());
        assert!(api.interfaces.contains("com.acme.Service"));
        assert_eq!(api.super_class.as_deref(), Some("java.lang.Object"));
        assert!(api.methods.contains_key(&("run".to_string(), "()V".to_string())));
        assert_eq!(api.digest.len(), 64);
    }

    #[test]
    fn test_corrupt_class_names_the_entry() {
        let dir = tempfile::TempDir::new().unwrap();
        let jar = dir.path().join("lib.jar");
        write_jar(&jar, &[(class_entry("com/acme/Bad"), b"junk".to_vec())]).unwrap();

        let err = load_jar(&jar).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ClassFormat);
        assert!(err.artifact().unwrap().ends_with("!com/acme/Bad.class"));
    }

    #[test]
    fn test_non_zip_is_malformed_archive() {
        let dir = tempfile::TempDir::new().unwrap();
        let jar = dir.path().join("lib.jar");
        std::fs::write(&jar, b"plain text").unwrap();

        let err = load_jar(&jar).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::MalformedArchive);
    }
}
