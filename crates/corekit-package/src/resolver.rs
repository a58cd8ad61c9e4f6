//! Dependency resolver capability
//!
//! The build host declares requirements to a resolver; fetching, version
//! solving and provisioning belong to the resolver implementation, not to
//! the manifest. [`DeclaredGraph`] is the in-process resolver that records
//! declarations and exposes the consumer-facing graph.

use crate::reference::Reference;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a declared requirement is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Linked into the package and propagated to its consumers
    Host,
    /// Needed only while building the package
    Build,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Host => f.write_str("host"),
            Scope::Build => f.write_str("build"),
        }
    }
}

/// Receives requirement declarations.
///
/// Declaring never fails: problems surface later, when the resolver
/// actually resolves.
pub trait DependencyResolver {
    fn declare(&mut self, reference: &Reference, scope: Scope);
}

impl<R: DependencyResolver + ?Sized> DependencyResolver for &mut R {
    fn declare(&mut self, reference: &Reference, scope: Scope) {
        (**self).declare(reference, scope)
    }
}

/// One recorded declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub reference: Reference,
    pub scope: Scope,
}

/// Records declarations in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredGraph {
    declarations: Vec<Declaration>,
}

impl DeclaredGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requirements visible to consumers of the package
    pub fn consumer_graph(&self) -> Vec<&Reference> {
        self.in_scope(Scope::Host)
    }

    /// Requirements used only to perform the build
    pub fn tool_requirements(&self) -> Vec<&Reference> {
        self.in_scope(Scope::Build)
    }

    fn in_scope(&self, scope: Scope) -> Vec<&Reference> {
        self.declarations
            .iter()
            .filter(|d| d.scope == scope)
            .map(|d| &d.reference)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl DependencyResolver for DeclaredGraph {
    fn declare(&mut self, reference: &Reference, scope: Scope) {
        tracing::debug!("Declared {} requirement {}", scope, reference);
        self.declarations.push(Declaration {
            reference: reference.clone(),
            scope,
        });
    }
}
