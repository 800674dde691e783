//! Per-block table alias registry

use indexmap::{IndexMap, IndexSet};
use sqlscope_ast::TupleId;
use sqlscope_diagnostics::{AnalysisError, Result};

/// What a table alias refers to in one block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasBinding {
    /// No table reference uses the alias
    Unregistered,
    /// Exactly one tuple
    Bound(TupleId),
    /// Several implicitly aliased tuples share the alias
    Ambiguous,
}

#[derive(Debug, Clone)]
struct AliasEntry {
    tuple: TupleId,
    explicit: bool,
    ambiguous: bool,
}

/// Table aliases registered in one query block
///
/// Aliases are case-sensitive. A table ref with an explicit alias owns only
/// that alias. One without an explicit alias owns its fully-qualified name
/// (its unique alias) and its unqualified name.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    unique_aliases: IndexSet<String>,
    bindings: IndexMap<String, AliasEntry>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a new table ref's aliases against the block, without changing it
    ///
    /// `unqualified` is the unqualified implicit alias of a ref without an
    /// explicit alias.
    pub fn check(&self, unique_alias: &str, unqualified: Option<&str>) -> Result<()> {
        if self.unique_aliases.contains(unique_alias) {
            return Err(AnalysisError::duplicate_alias(unique_alias));
        }
        if let Some(entry) = unqualified.and_then(|alias| self.bindings.get(alias)) {
            if entry.explicit {
                return Err(AnalysisError::duplicate_alias(unique_alias));
            }
        }
        Ok(())
    }

    /// Bind every legal alias of a checked table ref to its tuple
    ///
    /// An alias already bound to another tuple becomes ambiguous.
    pub fn bind(&mut self, unique_alias: &str, aliases: &[String], tuple: TupleId, explicit: bool) {
        self.unique_aliases.insert(unique_alias.to_string());
        for alias in aliases {
            match self.bindings.get_mut(alias) {
                Some(entry) if entry.tuple != tuple => {
                    log::debug!("Alias '{}' is now ambiguous", alias);
                    entry.ambiguous = true;
                }
                Some(_) => {}
                None => {
                    self.bindings.insert(
                        alias.clone(),
                        AliasEntry {
                            tuple,
                            explicit,
                            ambiguous: false,
                        },
                    );
                }
            }
        }
    }

    /// Look up an alias
    pub fn binding(&self, alias: &str) -> AliasBinding {
        match self.bindings.get(alias) {
            None => AliasBinding::Unregistered,
            Some(entry) if entry.ambiguous => AliasBinding::Ambiguous,
            Some(entry) => AliasBinding::Bound(entry.tuple),
        }
    }

    /// Unique aliases in registration order
    pub fn unique_aliases(&self) -> impl Iterator<Item = &str> {
        self.unique_aliases.iter().map(String::as_str)
    }

    pub fn is_ambiguous(&self, alias: &str) -> bool {
        self.binding(alias) == AliasBinding::Ambiguous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(
        registry: &mut AliasRegistry,
        aliases: &[&str],
        explicit: bool,
        tuple: u32,
    ) -> Result<()> {
        let aliases: Vec<String> = aliases.iter().map(|a| a.to_string()).collect();
        let unqualified = if explicit { None } else { aliases.get(1).map(String::as_str) };
        registry.check(&aliases[0], unqualified)?;
        registry.bind(&aliases[0], &aliases, TupleId::new(tuple), explicit);
        Ok(())
    }

    #[test]
    fn test_implicit_aliases_bind_same_tuple() {
        let mut registry = AliasRegistry::new();
        register(&mut registry, &["db1.orders", "orders"], false, 0).unwrap();

        assert_eq!(registry.binding("orders"), AliasBinding::Bound(TupleId::new(0)));
        assert_eq!(registry.binding("db1.orders"), AliasBinding::Bound(TupleId::new(0)));
        assert_eq!(registry.binding("o"), AliasBinding::Unregistered);
    }

    #[test]
    fn test_explicit_alias_collision_is_duplicate() {
        let mut registry = AliasRegistry::new();
        register(&mut registry, &["o"], true, 0).unwrap();

        let err = register(&mut registry, &["o"], true, 1).unwrap_err();
        assert_eq!(err, AnalysisError::duplicate_alias("o"));
        assert_eq!(registry.binding("o"), AliasBinding::Bound(TupleId::new(0)));
    }

    #[test]
    fn test_aliases_are_case_sensitive() {
        let mut registry = AliasRegistry::new();
        register(&mut registry, &["o"], true, 0).unwrap();
        assert!(register(&mut registry, &["O"], true, 1).is_ok());
    }

    #[test]
    fn test_unqualified_clash_with_implicit_is_ambiguous() {
        let mut registry = AliasRegistry::new();
        register(&mut registry, &["db1.orders", "orders"], false, 0).unwrap();
        register(&mut registry, &["db2.orders", "orders"], false, 1).unwrap();

        assert!(registry.is_ambiguous("orders"));
        assert_eq!(registry.binding("db2.orders"), AliasBinding::Bound(TupleId::new(1)));
    }

    #[test]
    fn test_unqualified_clash_with_explicit_is_duplicate() {
        let mut registry = AliasRegistry::new();
        register(&mut registry, &["orders"], true, 0).unwrap();

        let err = register(&mut registry, &["db2.orders", "orders"], false, 1).unwrap_err();
        assert_eq!(err, AnalysisError::duplicate_alias("db2.orders"));
    }

    #[test]
    fn test_repeated_implicit_ref_is_duplicate() {
        let mut registry = AliasRegistry::new();
        register(&mut registry, &["db1.orders", "orders"], false, 0).unwrap();
        assert!(register(&mut registry, &["db1.orders", "orders"], false, 1).is_err());
        assert_eq!(registry.unique_aliases().collect::<Vec<_>>(), vec!["db1.orders"]);
    }
}
