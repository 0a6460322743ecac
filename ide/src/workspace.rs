//! Per-project collaborator bundle handed to each completion request.

use crate::extensions::ExtensionMethods;
use crate::format::Formatter;
use crate::oracle::TypeOracle;
use crate::registry::Registry;

pub struct Workspace<'a> {
    pub oracle: &'a dyn TypeOracle,
    pub registry: &'a Registry,
    pub extensions: &'a ExtensionMethods,
    pub formatter: &'a dyn Formatter,
    /// Active nature tags; gate which registry entries run.
    pub natures: Vec<String>,
}

impl<'a> Workspace<'a> {
    pub fn new(
        oracle: &'a dyn TypeOracle,
        registry: &'a Registry,
        extensions: &'a ExtensionMethods,
        formatter: &'a dyn Formatter,
    ) -> Workspace<'a> {
        Workspace {
            oracle,
            registry,
            extensions,
            formatter,
            natures: Vec::new(),
        }
    }

    pub fn with_natures(mut self, natures: &[&str]) -> Workspace<'a> {
        self.natures = natures.iter().map(|n| n.to_string()).collect();
        self
    }
}
