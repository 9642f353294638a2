//! Scope store: a hierarchical, shadow-aware namespace.
//!
//! Scopes live in a [`ScopeArena`] and refer to each other by [`ScopeId`]:
//! `parent` for the ancestor chain, `members` on variables for dotted access,
//! list and alias entries for nested views. Nothing is shared by reference, so
//! [`ScopeArena::copy`] and [`ScopeArena::make_new`] give independent scopes.
//!
//! Lookup rules:
//! - the nearest scope in the ancestor chain that binds a name wins;
//! - inside one scope, the most recently introduced binding wins, whether it is
//!   a plain variable, a list or an alias;
//! - later path segments only look at the members of the previous segment.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::error::ScopeError;
use super::schema::BlueprintField;
use super::variable::ScopeVariable;
use crate::base::{RuntimeType, ScopeId};
use crate::syntax::SymbolId;

/// Default bound on the number of segments followed in a dotted path.
pub const DEFAULT_MAX_PATH_DEPTH: usize = 16;

#[derive(Clone, Debug)]
struct Binding {
    variable: ScopeVariable,
    seq: u64,
}

/// A named list whose elements expose the variables of `scope`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntry {
    pub name: SmolStr,
    pub scope: ScopeId,
    pub introduced_by: Option<SymbolId>,
    seq: u64,
}

/// A renamed view over another scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasEntry {
    pub name: SmolStr,
    pub target: ScopeId,
    pub introduced_by: Option<SymbolId>,
    /// The binding the alias contributes to lookups.
    variable: ScopeVariable,
    seq: u64,
}

/// One entry of a scope being merged, in source introduction order.
enum MergeEntry<'a> {
    Binding(&'a ScopeVariable),
    List(&'a ListEntry),
    Alias(&'a AliasEntry),
}

/// One namespace node.
#[derive(Clone, Debug)]
pub struct Scope {
    id: ScopeId,
    parent: Option<ScopeId>,
    name: SmolStr,
    /// Per name, every binding in introduction order; the last one is visible.
    variables: IndexMap<SmolStr, Vec<Binding>>,
    lists: IndexMap<SmolStr, ListEntry>,
    list_history: IndexSet<SmolStr>,
    aliases: IndexMap<SmolStr, AliasEntry>,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>, name: SmolStr) -> Self {
        Self {
            id,
            parent,
            name,
            variables: IndexMap::new(),
            lists: IndexMap::new(),
            list_history: IndexSet::new(),
            aliases: IndexMap::new(),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Root scopes are their own ancestor.
    pub fn ancestor(&self) -> ScopeId {
        self.parent.unwrap_or(self.id)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Visible local binding for `name`, ignoring aliases.
    pub fn variable(&self, name: &str) -> Option<&ScopeVariable> {
        self.variables
            .get(name)
            .and_then(|stack| stack.last())
            .map(|b| &b.variable)
    }

    pub fn lists(&self) -> impl Iterator<Item = &ListEntry> {
        self.lists.values()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &AliasEntry> {
        self.aliases.values()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.values().all(Vec::is_empty)
            && self.lists.is_empty()
            && self.aliases.is_empty()
    }

    /// Visible local binding for `name`, considering variables and aliases.
    fn lookup(&self, name: &str, exclude: Option<SymbolId>) -> Option<(&ScopeVariable, u64)> {
        let visible = |by: Option<SymbolId>| exclude.is_none() || by != exclude;
        let variable = self.variables.get(name).and_then(|stack| {
            stack
                .iter()
                .rev()
                .find(|b| visible(b.variable.introduced_by))
                .map(|b| (&b.variable, b.seq))
        });
        let alias = self
            .aliases
            .get(name)
            .filter(|a| visible(a.introduced_by))
            .map(|a| (&a.variable, a.seq));
        match (variable, alias) {
            (Some(v), Some(a)) => Some(if a.1 > v.1 { a } else { v }),
            (v, a) => v.or(a),
        }
    }

    /// Names bound locally, in first-introduction order.
    fn names(&self) -> impl Iterator<Item = &SmolStr> {
        self.variables
            .iter()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(name, _)| name)
            .chain(self.aliases.keys())
    }
}

/// Arena owning every scope built during one analysis pass.
#[derive(Clone, Debug)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
    next_seq: u64,
    max_path_depth: usize,
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeArena {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            next_seq: 0,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
        }
    }

    pub fn with_max_path_depth(mut self, depth: usize) -> Self {
        self.max_path_depth = depth.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.index())
    }

    pub fn contains(&self, id: ScopeId) -> bool {
        id.index() < self.scopes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    fn alloc(&mut self, parent: Option<ScopeId>, name: impl Into<SmolStr>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, parent, name.into()));
        id
    }

    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    pub fn new_root(&mut self, name: impl Into<SmolStr>) -> ScopeId {
        self.alloc(None, name)
    }

    /// A new, empty child of `parent`.
    pub fn make_new(&mut self, parent: ScopeId) -> ScopeId {
        let name = self.get(parent).map(|s| s.name.clone()).unwrap_or_default();
        self.alloc(Some(parent), name)
    }

    pub fn make_named(&mut self, parent: ScopeId, name: impl Into<SmolStr>) -> ScopeId {
        self.alloc(Some(parent), name)
    }

    /// Independent copy of a scope with the same parent.
    ///
    /// Lists are copied too, so modifying either side never shows through.
    pub fn copy(&mut self, id: ScopeId) -> Option<ScopeId> {
        let source = self.get(id)?.clone();
        let new_id = self.alloc(source.parent, source.name.clone());

        let mut remap: FxHashMap<ScopeId, ScopeId> = FxHashMap::default();
        let mut lists = IndexMap::with_capacity(source.lists.len());
        for (name, entry) in source.lists {
            let copied = self.copy(entry.scope).unwrap_or(entry.scope);
            remap.insert(entry.scope, copied);
            lists.insert(
                name,
                ListEntry {
                    scope: copied,
                    ..entry
                },
            );
        }

        let mut variables = source.variables;
        for binding in variables.values_mut().flat_map(|stack| stack.iter_mut()) {
            let remapped = binding.variable.members.and_then(|m| remap.get(&m).copied());
            if remapped.is_some() {
                binding.variable.members = remapped;
            }
        }

        let scope = &mut self.scopes[new_id.index()];
        scope.variables = variables;
        scope.lists = lists;
        scope.list_history = source.list_history;
        scope.aliases = source.aliases;
        Some(new_id)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id)?.parent
    }

    /// Parent of `id`, or `id` itself for a root.
    pub fn ancestor(&self, id: ScopeId) -> ScopeId {
        self.get(id).map(Scope::ancestor).unwrap_or(id)
    }

    pub fn is_root(&self, id: ScopeId) -> bool {
        self.get(id).is_some_and(Scope::is_root)
    }

    /// Number of ancestors above `id`.
    pub fn depth(&self, id: ScopeId) -> usize {
        self.chain(id).count().saturating_sub(1)
    }

    /// `id` followed by its ancestors, nearest first.
    pub fn chain(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(self.get(id).map(|s| s.id), |current| {
            self.get(*current).and_then(|s| s.parent)
        })
    }

    // ------------------------------------------------------------------
    // Adding bindings
    // ------------------------------------------------------------------

    pub fn add_variable(&mut self, scope: ScopeId, variable: ScopeVariable) {
        let seq = self.seq();
        if let Some(target) = self.scopes.get_mut(scope.index()) {
            target
                .variables
                .entry(variable.name.clone())
                .or_default()
                .push(Binding { variable, seq });
        }
    }

    pub fn add_variables(
        &mut self,
        scope: ScopeId,
        variables: impl IntoIterator<Item = ScopeVariable>,
    ) {
        for variable in variables {
            self.add_variable(scope, variable);
        }
    }

    /// Bind every field as a variable.
    pub fn inject_fields(
        &mut self,
        scope: ScopeId,
        fields: impl IntoIterator<Item = Arc<BlueprintField>>,
        source: &str,
        introduced_by: Option<SymbolId>,
    ) {
        for field in fields {
            let mut variable = ScopeVariable::from_field(field).with_source(source);
            variable.introduced_by = introduced_by;
            self.add_variable(scope, variable);
        }
    }

    /// Register a list in `scope`. Its element members are bound in a new
    /// scope, and `list` itself becomes an array binding pointing at it.
    pub fn add_list(
        &mut self,
        scope: ScopeId,
        list: ScopeVariable,
        members: impl IntoIterator<Item = ScopeVariable>,
    ) -> ScopeId {
        let list_scope = self.alloc(None, list.name.clone());
        self.add_variables(list_scope, members);

        let mut variable = list.with_members(list_scope);
        if variable.data_type.is_unknown() {
            variable.data_type = RuntimeType::Array;
        }
        let seq = self.seq();
        if let Some(target) = self.scopes.get_mut(scope.index()) {
            target.lists.insert(
                variable.name.clone(),
                ListEntry {
                    name: variable.name.clone(),
                    scope: list_scope,
                    introduced_by: variable.introduced_by,
                    seq,
                },
            );
            target.list_history.insert(variable.name.clone());
        }
        self.add_variable(scope, variable);
        list_scope
    }

    /// Register a list whose elements expose `fields`.
    pub fn add_list_from_fields(
        &mut self,
        scope: ScopeId,
        name: impl Into<SmolStr>,
        fields: impl IntoIterator<Item = Arc<BlueprintField>>,
        source: &str,
        introduced_by: Option<SymbolId>,
    ) -> ScopeId {
        let mut list = ScopeVariable::new(name, RuntimeType::Array).with_source(source);
        list.introduced_by = introduced_by;
        let members: Vec<_> = fields
            .into_iter()
            .map(|field| {
                let mut member = ScopeVariable::from_field(field).with_source(source);
                member.introduced_by = introduced_by;
                member
            })
            .collect();
        self.add_list(scope, list, members)
    }

    /// Remove a list from `scope`. It stays in the list history.
    pub fn remove_list(&mut self, scope: ScopeId, name: &str) -> bool {
        let Some(target) = self.scopes.get_mut(scope.index()) else {
            return false;
        };
        let Some(entry) = target.lists.shift_remove(name) else {
            return false;
        };
        if let Some(stack) = target.variables.get_mut(name) {
            stack.retain(|b| b.variable.members != Some(entry.scope));
        }
        true
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Resolve a possibly dotted path (`article.author.name`).
    pub fn find_reference(&self, scope: ScopeId, path: &str) -> Option<ScopeVariable> {
        self.resolve_path(scope, path, None)
    }

    /// Like [`find_reference`](Self::find_reference), ignoring every binding
    /// introduced by `symbol` so shadowed bindings show through.
    pub fn find_reference_excluding(
        &self,
        scope: ScopeId,
        path: &str,
        symbol: SymbolId,
    ) -> Option<ScopeVariable> {
        self.resolve_path(scope, path, Some(symbol))
    }

    pub fn contains_path(&self, scope: ScopeId, path: &str) -> bool {
        self.find_reference(scope, path).is_some()
    }

    /// Whether the first segment of `name` is bound anywhere in the chain.
    pub fn contains_reference(&self, scope: ScopeId, name: &str) -> bool {
        let head = name.split('.').next().unwrap_or_default().trim();
        !head.is_empty() && self.lookup_chain(scope, head, None).is_some()
    }

    fn lookup_chain(
        &self,
        scope: ScopeId,
        name: &str,
        exclude: Option<SymbolId>,
    ) -> Option<&ScopeVariable> {
        self.chain(scope)
            .filter_map(|id| self.get(id))
            .find_map(|s| s.lookup(name, exclude))
            .map(|(variable, _)| variable)
    }

    fn resolve_path(
        &self,
        scope: ScopeId,
        path: &str,
        exclude: Option<SymbolId>,
    ) -> Option<ScopeVariable> {
        let mut segments = path.split('.').map(str::trim);
        let head = segments.next().filter(|s| !s.is_empty())?;
        let mut current = self.lookup_chain(scope, head, exclude)?.clone();

        for (depth, segment) in segments.enumerate() {
            if depth + 1 >= self.max_path_depth || segment.is_empty() {
                return None;
            }
            // `posts.0.title`: an index stays on the element.
            if segment.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            current = self.member(&current, segment)?;
        }
        Some(current)
    }

    /// Member `name` of a variable, through its member scope or its field.
    pub fn member(&self, variable: &ScopeVariable, name: &str) -> Option<ScopeVariable> {
        if let Some(found) = variable
            .members
            .and_then(|members| self.get(members))
            .and_then(|s| s.lookup(name, None))
        {
            return Some(found.0.clone());
        }
        let field = variable.field.as_ref()?;
        let nested = field
            .member_fields()
            .into_iter()
            .find(|f| f.handle == name)?;
        let mut member =
            ScopeVariable::from_field(nested).with_source(variable.source_name.clone());
        member.introduced_by = variable.introduced_by;
        Some(member)
    }

    /// Members reachable through `variable.`, for completion.
    pub fn members_of(&self, variable: &ScopeVariable) -> Vec<ScopeVariable> {
        if let Some(members) = variable.members {
            return self.local_variables(members);
        }
        variable
            .field
            .as_ref()
            .map(|field| {
                field
                    .member_fields()
                    .into_iter()
                    .map(|f| ScopeVariable::from_field(f).with_source(variable.source_name.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Visible local bindings of one scope, one per name.
    pub fn local_variables(&self, scope: ScopeId) -> Vec<ScopeVariable> {
        let Some(target) = self.get(scope) else {
            return Vec::new();
        };
        let mut names: IndexSet<&SmolStr> = IndexSet::new();
        names.extend(target.names());
        let mut bound: Vec<(u64, ScopeVariable)> = names
            .into_iter()
            .filter_map(|name| target.lookup(name, None))
            .map(|(variable, seq)| (seq, variable.clone()))
            .collect();
        bound.sort_by_key(|(seq, _)| *seq);
        bound.into_iter().map(|(_, variable)| variable).collect()
    }

    /// Nearest binding for every name reachable from `scope`.
    pub fn visible_variables(&self, scope: ScopeId) -> Vec<ScopeVariable> {
        let mut seen: IndexMap<SmolStr, ScopeVariable> = IndexMap::new();
        for id in self.chain(scope) {
            for variable in self.local_variables(id) {
                seen.entry(variable.name.clone()).or_insert(variable);
            }
        }
        seen.into_values().collect()
    }

    // ------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------

    fn find_list(&self, scope: ScopeId, name: &str) -> Option<&ListEntry> {
        self.chain(scope)
            .filter_map(|id| self.get(id))
            .find_map(|s| s.lists.get(name))
    }

    pub fn has_list(&self, scope: ScopeId, name: &str) -> bool {
        self.find_list(scope, name).is_some()
    }

    /// Whether a list of this name was ever registered in the chain.
    pub fn has_list_in_history(&self, scope: ScopeId, name: &str) -> bool {
        self.chain(scope)
            .filter_map(|id| self.get(id))
            .any(|s| s.list_history.contains(name))
    }

    /// A new child of `scope` with the members of list `name` bound at top
    /// level. `None` when no such list exists in the chain.
    pub fn lift_list(&mut self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let entry = self.find_list(scope, name)?.clone();
        let members = self.local_variables(entry.scope);
        let lifted = self.make_named(scope, entry.name);
        self.add_variables(lifted, members);
        Some(lifted)
    }

    /// Bind the members of list `name` directly in `scope`.
    pub fn bring_list_into_main_scope(&mut self, scope: ScopeId, name: &str) -> bool {
        let Some(entry) = self.find_list(scope, name).cloned() else {
            return false;
        };
        let members = self.local_variables(entry.scope);
        self.add_variables(scope, members);
        true
    }

    // ------------------------------------------------------------------
    // Aliases
    // ------------------------------------------------------------------

    /// Expose the bindings of `target` under `alias` in `scope`.
    ///
    /// Fails when `scope` would become reachable from itself.
    pub fn introduce_alias_scope(
        &mut self,
        scope: ScopeId,
        alias: impl Into<SmolStr>,
        target: ScopeId,
        introduced_by: Option<SymbolId>,
    ) -> Result<(), ScopeError> {
        let alias = alias.into();
        for id in [scope, target] {
            if !self.contains(id) {
                return Err(ScopeError::UnknownScope(id));
            }
        }
        if self.reaches(target, scope) {
            return Err(ScopeError::CyclicAlias { alias });
        }

        let mut variable = ScopeVariable::internal(alias.clone(), RuntimeType::Object, "alias")
            .with_members(target);
        variable.introduced_by = introduced_by;
        let seq = self.seq();
        self.scopes[scope.index()].aliases.insert(
            alias.clone(),
            AliasEntry {
                name: alias,
                target,
                introduced_by,
                variable,
                seq,
            },
        );
        Ok(())
    }

    /// A new child of `scope` in which `alias` names a snapshot of everything
    /// visible from `scope`.
    pub fn introduce_scoped_alias_scope(
        &mut self,
        scope: ScopeId,
        alias: impl Into<SmolStr>,
        introduced_by: Option<SymbolId>,
    ) -> Result<ScopeId, ScopeError> {
        if !self.contains(scope) {
            return Err(ScopeError::UnknownScope(scope));
        }
        let alias = alias.into();
        let snapshot = self.alloc(None, alias.clone());
        let visible = self.visible_variables(scope);
        self.add_variables(snapshot, visible);

        let child = self.make_named(scope, alias.clone());
        self.introduce_alias_scope(child, alias, snapshot, introduced_by)?;
        Ok(child)
    }

    /// A new child of `scope` with the members behind alias `alias` bound at
    /// top level. `None` when the visible binding of `alias` is not an alias
    /// (a plain variable or a list included).
    pub fn expand_scoped_alias_scope(&mut self, scope: ScopeId, alias: &str) -> Option<ScopeId> {
        let target = self.visible_alias(scope, alias)?.target;
        let bound = self.local_variables(target);
        let expanded = self.make_named(scope, alias);
        self.add_variables(expanded, bound);
        Some(expanded)
    }

    /// Alias entry for `name` if it is the binding lookups see from `scope`.
    fn visible_alias(&self, scope: ScopeId, name: &str) -> Option<&AliasEntry> {
        let holder = self
            .chain(scope)
            .filter_map(|id| self.get(id))
            .find(|s| s.lookup(name, None).is_some())?;
        let (_, seq) = holder.lookup(name, None)?;
        holder.aliases.get(name).filter(|a| a.seq == seq)
    }

    /// Whether `goal` is reachable from `from` through members, lists or aliases.
    fn reaches(&self, from: ScopeId, goal: ScopeId) -> bool {
        let mut visited: FxHashSet<ScopeId> = FxHashSet::default();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == goal {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            let Some(scope) = self.get(id) else { continue };
            stack.extend(scope.aliases.values().map(|a| a.target));
            stack.extend(scope.lists.values().map(|l| l.scope));
            stack.extend(
                scope
                    .variables
                    .values()
                    .flatten()
                    .filter_map(|b| b.variable.members),
            );
        }
        false
    }

    // ------------------------------------------------------------------
    // Retraction
    // ------------------------------------------------------------------

    /// Remove the bindings of `name` introduced by `symbol` along the chain
    /// starting at `scope`. Bindings from other symbols are left in place.
    pub fn remove_through_introduction(
        &mut self,
        scope: ScopeId,
        name: &str,
        symbol: SymbolId,
    ) -> bool {
        let chain: Vec<ScopeId> = self.chain(scope).collect();
        let mut removed = false;
        for id in chain {
            removed |= self.scopes[id.index()].retract(Some(name), symbol) > 0;
        }
        removed
    }

    /// Remove everything `symbol` introduced anywhere in the arena.
    pub fn retract_symbol(&mut self, symbol: SymbolId) -> usize {
        self.scopes.iter_mut().map(|s| s.retract(None, symbol)).sum()
    }

    // ------------------------------------------------------------------
    // Merging
    // ------------------------------------------------------------------

    /// Copy the local bindings, lists and aliases of `source` into `target`.
    ///
    /// Entries are replayed in the order `source` introduced them, so every
    /// name resolves to the same kind of binding on both sides. Merged entries
    /// are newer than anything already in `target`.
    pub fn merge_scope(&mut self, target: ScopeId, source: ScopeId) {
        let Some(from) = self.get(source).cloned() else {
            return;
        };
        let mut entries: Vec<(u64, MergeEntry<'_>)> = from
            .variables
            .values()
            .flatten()
            .map(|b| (b.seq, MergeEntry::Binding(&b.variable)))
            .chain(from.lists.values().map(|l| (l.seq, MergeEntry::List(l))))
            .chain(from.aliases.values().map(|a| (a.seq, MergeEntry::Alias(a))))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);

        // Source list scope → its copy in `target`.
        let mut copied_lists: FxHashMap<ScopeId, ScopeId> = FxHashMap::default();
        for (_, entry) in entries {
            match entry {
                MergeEntry::Binding(variable) => {
                    let mut variable = variable.clone();
                    if let Some(copied) = variable.members.and_then(|m| copied_lists.get(&m)) {
                        variable.members = Some(*copied);
                    }
                    self.add_variable(target, variable);
                }
                MergeEntry::List(list) => {
                    let Some(copied) = self.copy(list.scope) else {
                        continue;
                    };
                    copied_lists.insert(list.scope, copied);
                    let seq = self.seq();
                    if let Some(into) = self.scopes.get_mut(target.index()) {
                        into.lists.insert(
                            list.name.clone(),
                            ListEntry {
                                scope: copied,
                                seq,
                                ..list.clone()
                            },
                        );
                        into.list_history.insert(list.name.clone());
                    }
                }
                MergeEntry::Alias(alias) => {
                    let seq = self.seq();
                    if let Some(into) = self.scopes.get_mut(target.index()) {
                        into.aliases.insert(
                            alias.name.clone(),
                            AliasEntry {
                                seq,
                                ..alias.clone()
                            },
                        );
                    }
                }
            }
        }
    }

    /// Bind the members of `variable` directly in `target`.
    pub fn merge_variable_scope(&mut self, target: ScopeId, variable: &ScopeVariable) -> bool {
        let members = self.members_of(variable);
        if members.is_empty() {
            return false;
        }
        self.add_variables(target, members);
        true
    }

    /// Bind `variables` in `target` and also register them as list `name`.
    pub fn merge_and_list(
        &mut self,
        target: ScopeId,
        name: impl Into<SmolStr>,
        variables: Vec<ScopeVariable>,
        introduced_by: Option<SymbolId>,
    ) -> ScopeId {
        let mut list = ScopeVariable::internal(name, RuntimeType::Array, "list");
        list.introduced_by = introduced_by;
        self.add_variables(target, variables.iter().cloned());
        self.add_list(target, list, variables)
    }
}

impl Scope {
    /// Drop entries introduced by `symbol`, optionally limited to one name.
    fn retract(&mut self, name: Option<&str>, symbol: SymbolId) -> usize {
        let by = Some(symbol);
        let matches = |candidate: &str| name.is_none_or(|n| n == candidate);
        let mut removed = 0;

        for (bound, stack) in self.variables.iter_mut() {
            if matches(bound.as_str()) {
                let before = stack.len();
                stack.retain(|b| b.variable.introduced_by != by);
                removed += before - stack.len();
            }
        }
        let before = self.lists.len() + self.aliases.len();
        self.lists
            .retain(|list, entry| !(matches(list.as_str()) && entry.introduced_by == by));
        self.aliases
            .retain(|alias, entry| !(matches(alias.as_str()) && entry.introduced_by == by));
        removed + before - (self.lists.len() + self.aliases.len())
    }
}
