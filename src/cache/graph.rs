//! Dependency graph operations over a module list
//!
//! Modules reference dependencies by name, so the graph is just an index
//! from name to record. Nothing here owns a module.

use super::module::Module;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

/// Name index over a borrowed module list
pub struct DependencyGraph<'a> {
    modules: &'a [Module],
    by_name: HashMap<&'a str, &'a Module>,
}

impl<'a> DependencyGraph<'a> {
    /// Index a module list. On duplicate names the first record wins.
    pub fn new(modules: &'a [Module]) -> Self {
        let mut by_name = HashMap::with_capacity(modules.len());
        for module in modules {
            by_name.entry(module.name.as_str()).or_insert(module);
        }
        Self { modules, by_name }
    }

    /// Look up a module by name
    pub fn module(&self, name: &str) -> Option<&'a Module> {
        self.by_name.get(name).copied()
    }

    /// True if `name` is reachable from `of` by following dependency edges
    /// zero or more times. Unknown names are leaves.
    pub fn is_dependency(&self, name: &str, of: &str) -> bool {
        let mut queue: VecDeque<&str> = VecDeque::from([of]);
        let mut visited: HashSet<&str> = HashSet::from([of]);

        while let Some(current) = queue.pop_front() {
            if current == name {
                return true;
            }

            let Some(module) = self.module(current) else {
                continue;
            };

            for dep in &module.dependencies {
                if visited.insert(dep.as_str()) {
                    queue.push_back(dep.as_str());
                }
            }
        }

        false
    }

    /// Transitive closure of `roots`, roots included
    pub fn dependency_closure<I, S>(&self, roots: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut closure = BTreeSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();

        for root in roots {
            let root = root.as_ref().to_string();
            if closure.insert(root.clone()) {
                queue.push_back(root);
            }
        }

        while let Some(current) = queue.pop_front() {
            let Some(module) = self.module(&current) else {
                continue;
            };
            for dep in &module.dependencies {
                if closure.insert(dep.clone()) {
                    queue.push_back(dep.clone());
                }
            }
        }

        closure
    }

    /// Order a dependency set by the indexed module order.
    ///
    /// Names that match no module trail in the set's own order.
    pub fn sort_dependencies(&self, dependencies: &BTreeSet<String>) -> Vec<String> {
        let mut remaining = dependencies.clone();
        let mut result = Vec::with_capacity(remaining.len());

        for module in self.modules {
            if remaining.remove(&module.name) {
                result.push(module.name.clone());
            }
        }

        result.extend(remaining);
        result
    }
}

/// Reorder modules for presentation and manifest emission.
///
/// Adjacent modules are swapped whenever an earlier module depends on a later
/// one, repeated until nothing moves. Modules are then regrouped by prefix in
/// first-seen order and relaxed again. Only adjacent inversions are corrected,
/// so the result approximates a topological order rather than guaranteeing one.
/// Modules on a common dependency cycle are not ordered against each other.
pub fn sort_modules(modules: &mut Vec<Module>) {
    let precedence = Precedence::new(modules);
    if precedence.has_cycle() {
        warn!("Dependency graph has a cycle; modules on it keep their relative order");
    }

    let mut order: Vec<usize> = (0..modules.len()).collect();
    relax_dependencies(&mut order, &precedence);

    let mut rank: HashMap<&str, usize> = HashMap::new();
    for &i in &order {
        let next = rank.len();
        rank.entry(modules[i].prefix()).or_insert(next);
    }
    order.sort_by_key(|&i| rank[modules[i].prefix()]);

    relax_dependencies(&mut order, &precedence);

    let mut slots: Vec<Option<Module>> = std::mem::take(modules).into_iter().map(Some).collect();
    modules.extend(order.iter().filter_map(|&i| slots[i].take()));
}

/// Strict "requires" relation between positions of a module list,
/// computed once per sort
struct Precedence {
    /// Positions reachable from each position, itself included
    reach: Vec<HashSet<usize>>,
}

impl Precedence {
    fn new(modules: &[Module]) -> Self {
        let graph = DependencyGraph::new(modules);
        let reach = modules
            .iter()
            .enumerate()
            .map(|(own, module)| {
                let closure = graph.dependency_closure(&module.dependencies);
                let mut reachable: HashSet<usize> = modules
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| closure.contains(&m.name))
                    .map(|(i, _)| i)
                    .collect();
                reachable.insert(own);
                reachable
            })
            .collect();
        Self { reach }
    }

    /// `a` depends on `b` and `b` does not depend back on `a`
    fn requires(&self, a: usize, b: usize) -> bool {
        a != b && self.reach[a].contains(&b) && !self.reach[b].contains(&a)
    }

    fn has_cycle(&self) -> bool {
        self.reach
            .iter()
            .enumerate()
            .any(|(a, reachable)| reachable.iter().any(|&b| b != a && self.reach[b].contains(&a)))
    }
}

/// Bubble modules towards the front while an earlier module requires them.
fn relax_dependencies(order: &mut [usize], precedence: &Precedence) {
    let len = order.len();
    let max_passes = len * len + 1;

    for pass in 0..max_passes {
        let mut changed = false;

        for i in 1..len {
            let candidate = order[i];
            if order[..i].iter().any(|&j| precedence.requires(j, candidate)) {
                order.swap(i - 1, i);
                changed = true;
            }
        }

        if !changed {
            debug!("Dependency relaxation settled after {} pass(es)", pass + 1);
            return;
        }
    }

    warn!("Module order did not settle after {} passes", max_passes);
}
