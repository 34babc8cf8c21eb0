use crate::error::BootError;
use fxhash::FxHashMap;
use sfa_domain::module::ModuleSpec;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Orders `specs` so every module comes after its dependencies (Kahn's algorithm).
///
/// Among modules that become ready at the same time, the one declared first wins,
/// so a list that already satisfies its dependencies comes back unchanged.
///
/// # Errors
/// * [`BootError::UnknownDependency`] when a dependency id is not declared.
/// * [`BootError::CircularDependency`] when the graph has a cycle (self-dependencies included).
pub fn resolve_load_order(specs: &[ModuleSpec]) -> Result<Vec<&ModuleSpec>, BootError> {
    let index: FxHashMap<&str, usize> =
        specs.iter().enumerate().map(|(i, spec)| (spec.id.as_str(), i)).collect();

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); specs.len()];
    let mut in_degree = vec![0_usize; specs.len()];

    for (i, spec) in specs.iter().enumerate() {
        for dep in &spec.depends_on {
            let Some(&d) = index.get(dep.as_str()) else {
                return Err(BootError::UnknownDependency {
                    message: format!("'{}' depends on undeclared module '{dep}'", spec.id).into(),
                    context: None,
                });
            };
            dependents[d].push(i);
            in_degree[i] += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> =
        (0..specs.len()).filter(|&i| in_degree[i] == 0).map(Reverse).collect();

    let mut order = Vec::with_capacity(specs.len());
    while let Some(Reverse(i)) = ready.pop() {
        order.push(&specs[i]);
        for &next in &dependents[i] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() != specs.len() {
        let stuck: Vec<&str> = specs
            .iter()
            .zip(&in_degree)
            .filter(|(_, deg)| **deg > 0)
            .map(|(spec, _)| spec.id.as_str())
            .collect();
        return Err(BootError::CircularDependency {
            message: format!("modules never become loadable: {}", stuck.join(", ")).into(),
            context: None,
        });
    }

    Ok(order)
}
