//! Depth-first traversal of the dependency graph

use std::io::Write;

use tracing::{debug, warn};

use crate::lag::calculator::{LagCalculator, LagResult};
use crate::lag::error::LagError;
use crate::lag::report::{write_cycle, write_node};
use crate::parser::parse_declaration;
use crate::version::constraint::Constraint;

/// Identity of a node on the current path: normalized name plus constraint
type PathKey = (String, Constraint);

/// Walks a package and its declared dependencies, writing one report block per node.
///
/// Every declaration is resolved on its own: the same package may be visited
/// many times with different (or identical) constraints.
pub struct DependencyWalker {
    calculator: LagCalculator,
    detect_cycles: bool,
}

impl DependencyWalker {
    pub fn new(calculator: LagCalculator) -> Self {
        Self {
            calculator,
            detect_cycles: false,
        }
    }

    /// Stop descending into a node already present on its own dependency path
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Compute and report the lag of `package` and, recursively, of its dependencies.
    ///
    /// Returns the result of the top-level package. The first error aborts the walk.
    pub async fn walk<W: Write>(
        &self,
        package: &str,
        constraint: &Constraint,
        out: &mut W,
    ) -> Result<LagResult, LagError> {
        let mut path = Vec::new();
        self.visit(package, constraint, 0, &mut path, out).await
    }

    async fn visit<W: Write>(
        &self,
        package: &str,
        constraint: &Constraint,
        depth: usize,
        path: &mut Vec<PathKey>,
        out: &mut W,
    ) -> Result<LagResult, LagError> {
        let result = self.calculator.compute_lag(package, constraint).await?;
        write_node(out, depth, &result)?;
        debug!("Dependencies: {:?}", result.dependencies);

        if self.detect_cycles {
            path.push(path_key(package, constraint));
        }

        for declaration in &result.dependencies {
            let Some(dependency) = parse_declaration(declaration)? else {
                continue;
            };

            if self.detect_cycles
                && path.contains(&path_key(&dependency.name, &dependency.constraint))
            {
                warn!(
                    "Cycle: {} {} is already being resolved",
                    dependency.name, dependency.constraint
                );
                write_cycle(
                    out,
                    depth + 1,
                    &dependency.name,
                    &dependency.constraint.to_string(),
                )?;
                continue;
            }

            debug!(
                "Going to compute lag for {} {}.",
                dependency.name, dependency.constraint
            );
            Box::pin(self.visit(
                &dependency.name,
                &dependency.constraint,
                depth + 1,
                path,
                out,
            ))
            .await?;
        }

        if self.detect_cycles {
            path.pop();
        }

        Ok(result)
    }
}

fn path_key(package: &str, constraint: &Constraint) -> PathKey {
    let name = package.to_ascii_lowercase().replace(['_', '.'], "-");
    (name, constraint.clone())
}
