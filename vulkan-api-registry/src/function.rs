//! Commands and the calling convention used to obtain each one's pointer.

use std::hash::{Hash, Hasher};

use indexmap::map::Entry;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace, warn};

use crate::xast::Node;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

fn strip_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, "").into_owned()
}

/// How a loader obtains the pointer to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FunctionCategory {
    /// Exported by the loader library itself.
    #[default]
    Exported,
    /// Loaded through the instance.
    InstanceExtension,
    /// Loaded through the device.
    DeviceExtension,
}

impl FunctionCategory {
    /// Maps an `<extension type="...">` value. Anything unrecognized is exported.
    pub fn from_extension_type(ty: &str) -> FunctionCategory {
        match ty {
            "instance" => FunctionCategory::InstanceExtension,
            "device" => FunctionCategory::DeviceExtension,
            _ => FunctionCategory::Exported,
        }
    }
}

/// A command entry. Equality and hashing only consider `name`.
#[derive(Debug, Clone, Default)]
pub struct Function {
    pub name: String,
    pub platform: String,
    pub protect: String,
    pub category: FunctionCategory,
}

impl Function {
    pub fn exported(name: String) -> Function {
        Function {
            name,
            ..Default::default()
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Function) -> bool {
        self.name == other.name
    }
}

impl Eq for Function {}

impl Hash for Function {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Functions keyed by whitespace-stripped name, iterated in order of first insertion.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: IndexMap<String, Function>,
}

impl FunctionTable {
    pub fn new() -> FunctionTable {
        Default::default()
    }

    /// Inserts `function` under `key`, replacing any previous entry in place.
    /// The key keeps the position of its first insertion.
    pub fn upsert(&mut self, key: String, function: Function) -> Option<Function> {
        match self.functions.entry(key) {
            Entry::Occupied(mut e) => {
                trace!(name = %e.key(), category = ?function.category, "overriding function");
                Some(std::mem::replace(e.get_mut(), function))
            }
            Entry::Vacant(e) => {
                e.insert(function);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Function> {
        self.functions.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Runs the core pass followed by the extension pass.
    pub fn build(root: &Node) -> FunctionTable {
        let mut table = FunctionTable::new();
        table.gather_commands(root);
        let core = table.len();
        table.gather_extensions(root);
        debug!(core, total = table.len(), "built function table");
        table
    }

    fn gather_commands(&mut self, root: &Node) {
        for commands in root.children_named("commands") {
            for command in commands.children_named("command") {
                let name = command
                    .get_child("proto")
                    .and_then(|proto| proto.get_child("name"));
                match name {
                    Some(name) => {
                        let name = strip_whitespace(&name.concat_text());
                        self.upsert(name.clone(), Function::exported(name));
                    }
                    None if command.get_attribute("alias").is_some() => {}
                    None => {
                        warn!(
                            command = command.attribute_or_empty("name"),
                            "skipping command without a prototype name"
                        );
                    }
                }
            }
        }
    }

    fn gather_extensions(&mut self, root: &Node) {
        for extensions in root.children_named("extensions") {
            for extension in extensions.children_named("extension") {
                let category = FunctionCategory::from_extension_type(extension.attribute_or_empty("type"));
                let platform = extension.attribute_or_empty("platform");
                let protect = extension.attribute_or_empty("protect");
                let commands = extension
                    .children_named("require")
                    .flat_map(|require| require.children_named("command"));
                for command in commands {
                    let Some(name) = command.get_attribute("name") else {
                        continue;
                    };
                    self.upsert(
                        strip_whitespace(name),
                        Function {
                            name: name.to_owned(),
                            platform: platform.to_owned(),
                            protect: protect.to_owned(),
                            category,
                        },
                    );
                }
            }
        }
    }
}
