//! The scoped symbol table. Grounded directly in `symbol_table.c`: a
//! hash-bucketed table per scope, scopes chained to their parent for
//! lookup, and a second, append-only list of every scope ever opened (the
//! reference implementation's `all_scopes`, used only for the end-of-run
//! table dump — `current_scope`/`parent` alone would lose inner scopes once
//! their block exits).
//!
//! Scopes are stored in an `IndexVec` rather than as a linked list of
//! heap-allocated nodes: `ScopeId` plays the role of the reference's raw
//! `Scope *`, and the arena gives the retained-list and the live chain for
//! free (the live chain is just `parent` links walked from `current`).

use cc_util::index_vec::{define_idx, IndexVec};

use crate::error::{Result, SemError};
use crate::symbol::Symbol;

define_idx!(ScopeId);

#[derive(Debug)]
pub struct Scope {
    pub level: u32,
    pub parent: Option<ScopeId>,
    buckets: Vec<Vec<Symbol>>,
}

impl Scope {
    /// Symbols declared directly in this scope, grouped by declaration
    /// order within each bucket (not overall declaration order — matching
    /// the reference table, which never stores one).
    pub fn buckets(&self) -> &[Vec<Symbol>] {
        &self.buckets
    }
}

/// `h = (h << 4) + c` accumulated over every byte without resetting
/// between buckets, then reduced mod `table_size` — verbatim from
/// `symbol_table.c`'s `hash()`, including its 32-bit wraparound.
fn hash(name: &str, table_size: usize) -> usize {
    let mut h: u32 = 0;
    for b in name.bytes() {
        h = h.wrapping_shl(4).wrapping_add(b as u32);
    }
    (h % table_size as u32) as usize
}

/// All scopes of one analysis run: the live current-to-global chain plus
/// every scope ever opened, retained for the final table dump.
pub struct ScopeTable {
    scopes: IndexVec<ScopeId, Scope>,
    current: Option<ScopeId>,
    table_size: usize,
}

impl ScopeTable {
    /// Opens the global scope (level 0) immediately, matching
    /// `symbol_table_init`.
    pub fn new(table_size: usize) -> Result<Self> {
        if table_size == 0 {
            return Err(SemError::InvalidTableSize);
        }
        let mut table = Self {
            scopes: IndexVec::new(),
            current: None,
            table_size,
        };
        table.enter_scope();
        Ok(table)
    }

    pub fn enter_scope(&mut self) -> ScopeId {
        let level = match self.current {
            Some(cur) => self.scopes[cur].level + 1,
            None => 0,
        };
        let scope = Scope {
            level,
            parent: self.current,
            buckets: vec![Vec::new(); self.table_size],
        };
        let id = self.scopes.push(scope);
        self.current = Some(id);
        id
    }

    /// Rewinds to the parent of the current scope. Mirrors the reference's
    /// unconditional rewind: calling this while at the global scope leaves
    /// `current` empty, so callers must balance `enter_scope`/`exit_scope`.
    pub fn exit_scope(&mut self) {
        if let Some(cur) = self.current {
            self.current = self.scopes[cur].parent;
        }
    }

    pub fn current_level(&self) -> u32 {
        self.current.map(|c| self.scopes[c].level).unwrap_or(0)
    }

    /// Inserts into the current scope. Fails (returns `false`, emits no
    /// diagnostic itself) on a same-name collision in the current scope's
    /// bucket, or if there is no current scope.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        let Some(cur) = self.current else { return false };
        let idx = hash(&symbol.name, self.table_size);
        let bucket = &mut self.scopes[cur].buckets[idx];
        if bucket.iter().any(|s| s.name == symbol.name) {
            return false;
        }
        // Prepend: most recently declared name in a bucket is found first,
        // matching the reference's head-insertion bucket chain.
        bucket.insert(0, symbol);
        true
    }

    pub fn lookup_current(&self, name: &str) -> Option<&Symbol> {
        let cur = self.current?;
        let idx = hash(name, self.table_size);
        self.scopes[cur].buckets[idx].iter().find(|s| s.name == name)
    }

    /// Walks from the current scope outward through parents.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut cur = self.current;
        while let Some(id) = cur {
            let idx = hash(name, self.table_size);
            if let Some(sym) = self.scopes[id].buckets[idx].iter().find(|s| s.name == name) {
                return Some(sym);
            }
            cur = self.scopes[id].parent;
        }
        None
    }

    /// Every scope opened during this run, in opening order — the
    /// reference's `all_scopes` list, used for the end-of-run dump.
    pub fn all_scopes(&self) -> &IndexVec<ScopeId, Scope> {
        &self.scopes
    }

    /// Renders the whole table the way `print_symbol_table` does: one
    /// section per scope (in opening order), one line per symbol.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        out.push_str("=========== SYMBOL TABLE ===========\n");
        for scope in self.scopes.as_slice() {
            out.push_str(&format!("Scope Level: {}\n", scope.level));
            for bucket in &scope.buckets {
                for sym in bucket {
                    out.push_str(&format!(
                        "  {} : {} ({:?}) line {}\n",
                        sym.name,
                        sym.data_type.as_str(),
                        sym.kind,
                        sym.line
                    ));
                }
            }
        }
        out.push_str("=====================================\n");
        out
    }
}
