//! Minimal JVM class-file reader.
//!
//! Only the header is decoded: constant pool, access flags, this/super
//! class, interfaces, and the name/descriptor/flags of fields and methods.
//! Attributes (code, signatures, annotations) are skipped.

use semgate_core::errors::{ExError, ExErrorKind, Result};

pub const MAGIC: u32 = 0xCAFE_BABE;

/// Access flag bits shared by classes, fields and methods
pub mod access {
    pub const PUBLIC: u16 = 0x0001;
    pub const PRIVATE: u16 = 0x0002;
    pub const PROTECTED: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    /// Classes only; set by every modern compiler
    pub const SUPER: u16 = 0x0020;
    /// Methods only; the same bit is `ACC_VOLATILE` on fields
    pub const BRIDGE: u16 = 0x0040;
    pub const INTERFACE: u16 = 0x0200;
    pub const ABSTRACT: u16 = 0x0400;
    pub const SYNTHETIC: u16 = 0x1000;
}

mod tag {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELD_REF: u8 = 9;
    pub const METHOD_REF: u8 = 10;
    pub const INTERFACE_METHOD_REF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_HANDLE: u8 = 15;
    pub const METHOD_TYPE: u8 = 16;
    pub const DYNAMIC: u8 = 17;
    pub const INVOKE_DYNAMIC: u8 = 18;
    pub const MODULE: u8 = 19;
    pub const PACKAGE: u8 = 20;
}

/// A field or method declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
}

impl MemberInfo {
    pub fn has(&self, flag: u16) -> bool {
        self.access & flag != 0
    }
}

/// Decoded class-file header. Class names are internal (`com/acme/Foo`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access: u16,
    pub this_class: String,
    /// `None` only for `java/lang/Object` and `module-info`
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<MemberInfo>,
    pub methods: Vec<MemberInfo>,
}

impl ClassFile {
    pub fn has(&self, flag: u16) -> bool {
        self.access & flag != 0
    }
}

#[derive(Debug, Clone)]
enum Constant {
    Utf8(String),
    Class(u16),
    /// Entries the header never dereferences
    Other,
    /// Second slot of a long or double
    Unusable,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                format_error(format!(
                    "truncated class file: wanted {} bytes at offset {}",
                    n, self.pos
                ))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u1(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u2(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u4(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

fn format_error(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::ClassFormat)
        .with_op("parse_class")
        .with_message(message)
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn read(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.u2()? as usize;
        // Index 0 is reserved
        let mut entries = vec![Constant::Unusable];
        while entries.len() < count {
            let tag = reader.u1()?;
            let constant = match tag {
                tag::UTF8 => {
                    let len = reader.u2()? as usize;
                    // Modified UTF-8 only differs for NUL and supplementary
                    // characters, neither of which appear in JVM names.
                    Constant::Utf8(String::from_utf8_lossy(reader.take(len)?).into_owned())
                }
                tag::CLASS => Constant::Class(reader.u2()?),
                tag::INTEGER | tag::FLOAT => {
                    reader.take(4)?;
                    Constant::Other
                }
                tag::LONG | tag::DOUBLE => {
                    reader.take(8)?;
                    entries.push(Constant::Other);
                    Constant::Unusable
                }
                tag::STRING | tag::METHOD_TYPE | tag::MODULE | tag::PACKAGE => {
                    reader.u2()?;
                    Constant::Other
                }
                tag::FIELD_REF
                | tag::METHOD_REF
                | tag::INTERFACE_METHOD_REF
                | tag::NAME_AND_TYPE
                | tag::DYNAMIC
                | tag::INVOKE_DYNAMIC => {
                    reader.take(4)?;
                    Constant::Other
                }
                tag::METHOD_HANDLE => {
                    reader.take(3)?;
                    Constant::Other
                }
                other => {
                    return Err(format_error(format!(
                        "unknown constant pool tag {} at index {}",
                        other,
                        entries.len()
                    )))
                }
            };
            entries.push(constant);
        }
        if entries.len() > count {
            return Err(format_error("long/double constant overruns the pool"));
        }
        Ok(Self { entries })
    }

    fn utf8(&self, index: u16) -> Result<&str> {
        match self.entries.get(index as usize) {
            Some(Constant::Utf8(s)) => Ok(s),
            _ => Err(format_error(format!(
                "constant pool index {} is not a Utf8 entry",
                index
            ))),
        }
    }

    fn class_name(&self, index: u16) -> Result<&str> {
        match self.entries.get(index as usize) {
            Some(Constant::Class(name_index)) => self.utf8(*name_index),
            _ => Err(format_error(format!(
                "constant pool index {} is not a Class entry",
                index
            ))),
        }
    }
}

fn skip_attributes(reader: &mut Reader<'_>) -> Result<()> {
    let count = reader.u2()?;
    for _ in 0..count {
        reader.u2()?;
        let len = reader.u4()? as usize;
        reader.take(len)?;
    }
    Ok(())
}

fn read_members(reader: &mut Reader<'_>, pool: &ConstantPool) -> Result<Vec<MemberInfo>> {
    let count = reader.u2()?;
    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let access = reader.u2()?;
        let name = pool.utf8(reader.u2()?)?.to_string();
        let descriptor = pool.utf8(reader.u2()?)?.to_string();
        skip_attributes(reader)?;
        members.push(MemberInfo {
            access,
            name,
            descriptor,
        });
    }
    Ok(members)
}

/// Decode a class file.
///
/// # Errors
///
/// `ERR_CLASS_FORMAT` on a bad magic number, truncation, an unknown constant
/// tag, or a dangling constant-pool reference.
pub fn parse_class(bytes: &[u8]) -> Result<ClassFile> {
    let mut reader = Reader::new(bytes);

    let magic = reader.u4()?;
    if magic != MAGIC {
        return Err(format_error(format!("bad magic number {:#010x}", magic)));
    }
    let minor_version = reader.u2()?;
    let major_version = reader.u2()?;
    let pool = ConstantPool::read(&mut reader)?;

    let access = reader.u2()?;
    let this_class = pool.class_name(reader.u2()?)?.to_string();
    let super_class = match reader.u2()? {
        0 => None,
        index => Some(pool.class_name(index)?.to_string()),
    };

    let interface_count = reader.u2()?;
    let mut interfaces = Vec::with_capacity(interface_count as usize);
    for _ in 0..interface_count {
        interfaces.push(pool.class_name(reader.u2()?)?.to_string());
    }

    let fields = read_members(&mut reader, &pool)?;
    let methods = read_members(&mut reader, &pool)?;
    skip_attributes(&mut reader)?;

    Ok(ClassFile {
        minor_version,
        major_version,
        access,
        this_class,
        super_class,
        interfaces,
        fields,
        methods,
    })
}
