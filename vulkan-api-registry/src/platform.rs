//! The `<platforms>` section: platform names and the guard macro protecting each.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

use crate::xast::Node;
use crate::{ParseError, ParseResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub name: String,
    pub protect: String,
}

/// Platforms keyed by name. Lookup-only, so no ordering is kept.
#[derive(Debug, Clone, Default)]
pub struct PlatformTable {
    platforms: HashMap<String, Platform>,
}

impl PlatformTable {
    pub fn new() -> PlatformTable {
        Default::default()
    }

    /// Adds a platform, refusing to replace one already registered under the same name.
    pub fn insert(&mut self, platform: Platform) -> ParseResult<()> {
        match self.platforms.entry(platform.name.clone()) {
            Entry::Occupied(e) => Err(ParseError::DuplicatePlatform {
                name: e.key().clone(),
            }),
            Entry::Vacant(e) => {
                e.insert(platform);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Platform> {
        self.platforms.get(name)
    }

    /// Guard macro of the named platform, if it is known.
    pub fn guard_for(&self, name: &str) -> Option<&str> {
        self.get(name).map(|p| p.protect.as_str())
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Collects every `<platform>` element with both a `name` and a `protect` attribute.
    pub fn build(root: &Node) -> ParseResult<PlatformTable> {
        let mut table = PlatformTable::new();
        for section in root.children_named("platforms") {
            for platform in section.children_named("platform") {
                let name = platform.attribute_or_empty("name");
                let protect = platform.attribute_or_empty("protect");
                if name.is_empty() || protect.is_empty() {
                    continue;
                }
                table.insert(Platform {
                    name: name.to_owned(),
                    protect: protect.to_owned(),
                })?;
            }
        }
        debug!(platforms = table.len(), "built platform table");
        Ok(table)
    }
}
