//! Reads the Vulkan API registry (`vk.xml`) and classifies every command by the
//! way a loader has to obtain its pointer.

mod error;
pub mod emit;
pub mod function;
pub mod platform;
pub mod xast;
pub mod xml_iter;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use xml::reader::Result as XmlResult;
use xml::reader::XmlEvent;

pub use emit::{resolve_guard, HeaderWriter, MacroNames};
pub use error::{ParseError, ParseResult};
pub use function::{Function, FunctionCategory, FunctionTable};
pub use platform::{Platform, PlatformTable};

/// Platform and function tables built from one registry document.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub platforms: PlatformTable,
    pub functions: FunctionTable,
}

impl Registry {
    pub fn new<It: Iterator<Item = XmlResult<XmlEvent>>>(events: It) -> ParseResult<Registry> {
        let root = xast::read_root(events)?;
        Registry::from_root(&root)
    }

    pub fn from_root(root: &xast::Node) -> ParseResult<Registry> {
        let platforms = PlatformTable::build(root)?;
        let functions = FunctionTable::build(root);
        Ok(Registry { platforms, functions })
    }

    pub fn from_reader<R: Read>(source: R) -> ParseResult<Registry> {
        let root = xast::read_document(source)?;
        Registry::from_root(&root)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> ParseResult<Registry> {
        let file = fs::File::open(path.as_ref())?;
        Registry::from_reader(io::BufReader::new(file))
    }

    pub fn write_header<W: Write>(&self, out: &mut W, macros: &MacroNames) -> io::Result<()> {
        HeaderWriter::new(macros).write_header(out, &self.functions, &self.platforms)
    }
}
