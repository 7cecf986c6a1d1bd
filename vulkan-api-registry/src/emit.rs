//! Writes the function-list header consumed by the loader.
//!
//! The header defines a no-op fallback for each category macro, invokes the
//! matching macro once per function (wrapped in `#ifdef` when the function is
//! platform specific), and finally undefines the macros again so the header can
//! be included several times with different definitions.

use std::io::{self, Write};

use crate::function::{Function, FunctionCategory, FunctionTable};
use crate::platform::PlatformTable;

pub const DEFAULT_EXPORTED_MACRO: &str = "CRATER_VK_EXPORTED_FUNCTION";
pub const DEFAULT_INSTANCE_MACRO: &str = "CRATER_VK_EXT_INSTANCE_FUNCTION";
pub const DEFAULT_DEVICE_MACRO: &str = "CRATER_VK_EXT_DEVICE_FUNCTION";

/// Macro identifiers used for each function category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroNames {
    pub exported: String,
    pub instance: String,
    pub device: String,
}

impl Default for MacroNames {
    fn default() -> MacroNames {
        MacroNames {
            exported: DEFAULT_EXPORTED_MACRO.into(),
            instance: DEFAULT_INSTANCE_MACRO.into(),
            device: DEFAULT_DEVICE_MACRO.into(),
        }
    }
}

impl MacroNames {
    pub fn for_category(&self, category: FunctionCategory) -> &str {
        match category {
            FunctionCategory::Exported => self.exported.as_str(),
            FunctionCategory::InstanceExtension => self.instance.as_str(),
            FunctionCategory::DeviceExtension => self.device.as_str(),
        }
    }

    fn all(&self) -> [&str; 3] {
        [self.exported.as_str(), self.instance.as_str(), self.device.as_str()]
    }
}

/// Guard for `function`: its own `protect`, else its platform's guard, else none.
pub fn resolve_guard<'a>(function: &'a Function, platforms: &'a PlatformTable) -> Option<&'a str> {
    if !function.protect.is_empty() {
        Some(function.protect.as_str())
    } else if !function.platform.is_empty() {
        platforms.guard_for(&function.platform)
    } else {
        None
    }
}

pub struct HeaderWriter<'a> {
    macros: &'a MacroNames,
}

impl<'a> HeaderWriter<'a> {
    pub fn new(macros: &'a MacroNames) -> HeaderWriter<'a> {
        HeaderWriter { macros }
    }

    pub fn write_prologue<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(b"\n")?;
        for name in self.macros.all() {
            write!(out, "#ifndef {0}\n#    define {0}(name)\n#endif\n\n", name)?;
        }
        Ok(())
    }

    pub fn write_function<W: Write>(&self, out: &mut W, function: &Function, platforms: &PlatformTable) -> io::Result<()> {
        let guard = resolve_guard(function, platforms);
        if let Some(guard) = guard {
            writeln!(out, "#ifdef {}", guard)?;
        }
        writeln!(out, "{}({})", self.macros.for_category(function.category), &function.name)?;
        if guard.is_some() {
            out.write_all(b"#endif\n")?;
        }
        Ok(())
    }

    pub fn write_functions<W: Write>(&self, out: &mut W, functions: &FunctionTable, platforms: &PlatformTable) -> io::Result<()> {
        for function in functions.iter() {
            self.write_function(out, function, platforms)?;
        }
        Ok(())
    }

    pub fn write_epilogue<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for name in self.macros.all() {
            out.write_all(b"\n")?;
            write!(out, "#ifdef {0}\n#undef {0}\n#endif\n", name)?;
        }
        Ok(())
    }

    /// Writes prologue, function list and epilogue.
    pub fn write_header<W: Write>(&self, out: &mut W, functions: &FunctionTable, platforms: &PlatformTable) -> io::Result<()> {
        self.write_prologue(out)?;
        self.write_functions(out, functions, platforms)?;
        self.write_epilogue(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;

    fn platforms() -> PlatformTable {
        let mut platforms = PlatformTable::new();
        platforms
            .insert(Platform {
                name: "xlib".into(),
                protect: "VK_USE_PLATFORM_XLIB_KHR".into(),
            })
            .unwrap();
        platforms
    }

    fn function(name: &str, platform: &str, protect: &str, category: FunctionCategory) -> Function {
        Function {
            name: name.into(),
            platform: platform.into(),
            protect: protect.into(),
            category,
        }
    }

    fn render(f: &Function) -> String {
        let macros = MacroNames::default();
        let mut out = Vec::new();
        HeaderWriter::new(&macros).write_function(&mut out, f, &platforms()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn explicit_guard_wins_over_platform() {
        let f = function("vkA", "xlib", "VK_EXPLICIT", FunctionCategory::InstanceExtension);
        assert_eq!(resolve_guard(&f, &platforms()), Some("VK_EXPLICIT"));
    }

    #[test]
    fn platform_guard_is_the_fallback() {
        let table = platforms();
        let known = function("vkA", "xlib", "", FunctionCategory::InstanceExtension);
        let unknown = function("vkB", "fuchsia", "", FunctionCategory::InstanceExtension);
        let plain = function("vkC", "", "", FunctionCategory::Exported);
        assert_eq!(resolve_guard(&known, &table), Some("VK_USE_PLATFORM_XLIB_KHR"));
        assert_eq!(resolve_guard(&unknown, &table), None);
        assert_eq!(resolve_guard(&plain, &table), None);
    }

    #[test]
    fn unguarded_exported_function() {
        let f = Function::exported("vkCreateInstance".into());
        assert_eq!(render(&f), "CRATER_VK_EXPORTED_FUNCTION(vkCreateInstance)\n");
    }

    #[test]
    fn guarded_instance_function() {
        let f = function("vkCreateXlibSurfaceKHR", "xlib", "", FunctionCategory::InstanceExtension);
        assert_eq!(
            render(&f),
            "#ifdef VK_USE_PLATFORM_XLIB_KHR\nCRATER_VK_EXT_INSTANCE_FUNCTION(vkCreateXlibSurfaceKHR)\n#endif\n"
        );
    }

    #[test]
    fn device_function_uses_device_macro() {
        let f = function("vkCmdDrawIndirectCountKHR", "", "", FunctionCategory::DeviceExtension);
        assert_eq!(render(&f), "CRATER_VK_EXT_DEVICE_FUNCTION(vkCmdDrawIndirectCountKHR)\n");
    }

    #[test]
    fn full_header_layout() {
        let macros = MacroNames {
            exported: "E".into(),
            instance: "I".into(),
            device: "D".into(),
        };
        let mut functions = FunctionTable::new();
        functions.upsert("vkA".into(), Function::exported("vkA".into()));
        functions.upsert("vkB".into(), function("vkB", "", "G", FunctionCategory::DeviceExtension));
        let mut out = Vec::new();
        HeaderWriter::new(&macros)
            .write_header(&mut out, &functions, &PlatformTable::new())
            .unwrap();
        let expected = "\n\
#ifndef E\n#    define E(name)\n#endif\n\n\
#ifndef I\n#    define I(name)\n#endif\n\n\
#ifndef D\n#    define D(name)\n#endif\n\n\
E(vkA)\n\
#ifdef G\nD(vkB)\n#endif\n\
\n#ifdef E\n#undef E\n#endif\n\
\n#ifdef I\n#undef I\n#endif\n\
\n#ifdef D\n#undef D\n#endif\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
