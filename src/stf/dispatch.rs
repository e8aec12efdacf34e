//! Per-block dispatch tables.
//!
//! Every parsing routine declares the names it understands at its own
//! nesting level by building a [`DispatchTable`] of closures and handing it
//! to [`Reader::parse_block`](super::Reader::parse_block). Tables are local
//! to one block; nested blocks build their own.
//!
//! ```text
//! reader.parse_block(&mut DispatchTable::new()
//!     .on("filename", |r| { file_name = r.read_string_block("")?; Ok(()) })
//!     .on("position", |r| { /* ... */ Ok(()) }))?;
//! ```

use std::fmt;

use super::reader::Reader;
use crate::error::Result;

/// Handler invoked after its block name has been consumed.
///
/// The handler must consume exactly the unit that belongs to the name,
/// normally `(` followed by the block contents and the closing `)`.
pub type Handler<'h, 'src> = Box<dyn FnMut(&mut Reader<'src>) -> Result<()> + 'h>;

/// A named handler in a [`DispatchTable`].
pub struct DispatchEntry<'h, 'src> {
    name: String,
    handler: Handler<'h, 'src>,
}

impl DispatchEntry<'_, '_> {
    /// Canonical (lowercase) name this entry answers to.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered set of handlers with unique, case-insensitive names.
pub struct DispatchTable<'h, 'src> {
    entries: Vec<DispatchEntry<'h, 'src>>,
}

impl<'h, 'src> DispatchTable<'h, 'src> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `handler` for `name`.
    ///
    /// Names are folded to lowercase. Registering a name twice replaces the
    /// earlier handler but keeps its position.
    pub fn on<F>(mut self, name: &str, handler: F) -> Self
    where
        F: FnMut(&mut Reader<'src>) -> Result<()> + 'h,
    {
        let name = name.to_lowercase();
        let handler: Handler<'h, 'src> = Box::new(handler);
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.handler = handler,
            None => self.entries.push(DispatchEntry { name, handler }),
        }
        self
    }

    /// Find the handler for a canonical (already lowercase) name.
    pub fn lookup(&mut self, key: &str) -> Option<&mut Handler<'h, 'src>> {
        self.entries
            .iter_mut()
            .find(|e| e.name == key)
            .map(|e| &mut e.handler)
    }

    /// Whether a canonical name has a handler.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.name == key)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(DispatchEntry::name).collect()
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DispatchTable<'_, '_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DispatchTable<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_folded_and_ordered() {
        let table = DispatchTable::new()
            .on("SoundSource", |_| Ok(()))
            .on("soundregion", |_| Ok(()));
        assert_eq!(table.names(), ["soundsource", "soundregion"]);
        assert!(table.contains("soundsource"));
        assert!(!table.contains("SoundSource"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_name_replaces_handler() {
        let mut hits = Vec::new();
        {
            let mut table = DispatchTable::new()
                .on("a", |_| Ok(()))
                .on("b", |_| Ok(()))
                .on("A", |_| {
                    hits.push("second");
                    Ok(())
                });
            assert_eq!(table.names(), ["a", "b"]);

            let mut reader = Reader::new("", "test");
            let handler = table.lookup("a").unwrap();
            handler(&mut reader).unwrap();
        }
        assert_eq!(hits, ["second"]);
    }

    #[test]
    fn test_names_render_in_debug() {
        let table = DispatchTable::new()
            .on("Filename", |_| Ok(()))
            .on("position", |_| Ok(()));
        assert_eq!(format!("{table:?}"), r#"["filename", "position"]"#);
    }

    #[test]
    fn test_lookup_missing() {
        let mut table = DispatchTable::new().on("x", |_| Ok(()));
        assert!(table.lookup("y").is_none());
        assert!(DispatchTable::default().is_empty());
    }
}
