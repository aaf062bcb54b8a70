// ABOUTME: Configuration values for weber: locate strategy, child arity policy, load settings.
// ABOUTME: WeberBuilder provides a fluent API for constructing Weber sessions.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use crate::weber::Weber;

/// How anchors are resolved to elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocateStrategy {
    /// Query the parsed tree for elements whose immediate text equals the anchor.
    #[default]
    TreeQuery,
    /// Scan the raw markup for the tag wrapping the anchor, then resolve it in the tree.
    TagScan,
}

impl fmt::Display for LocateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LocateStrategy::TreeQuery => "tree-query",
            LocateStrategy::TagScan => "tag-scan",
        };
        write!(f, "{}", s)
    }
}

/// What to do when aligned nodes have different numbers of element children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildArity {
    /// Zip positionally and drop the surplus children.
    #[default]
    Truncate,
    /// Fail with a child arity mismatch.
    Strict,
}

/// Settings for the structure synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Attributes whose whitespace-separated values are intersected.
    pub retrieve_attrs: BTreeSet<String>,
    pub child_arity: ChildArity,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            retrieve_attrs: BTreeSet::from(["class".to_string()]),
            child_arity: ChildArity::Truncate,
        }
    }
}

/// Settings for loading a document source.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Weber/0.1".to_string(),
        }
    }
}

/// Configuration options for a Weber session.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub locate: LocateStrategy,
    pub synthesis: SynthesisOptions,
    pub load: LoadOptions,
}

/// Builder for constructing Weber sessions with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct WeberBuilder {
    opts: Options,
}

impl WeberBuilder {
    /// Create a new WeberBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the anchor locate strategy.
    pub fn locate_strategy(mut self, strategy: LocateStrategy) -> Self {
        self.opts.locate = strategy;
        self
    }

    /// Set the child arity policy.
    pub fn child_arity(mut self, arity: ChildArity) -> Self {
        self.opts.synthesis.child_arity = arity;
        self
    }

    /// Replace the set of attributes to intersect.
    pub fn retrieve_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opts.synthesis.retrieve_attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fetch timeout for remote sources.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.load.timeout = timeout;
        self
    }

    /// Set the User-Agent header for remote sources.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.load.user_agent = user_agent.into();
        self
    }

    /// Build the Weber session with the configured options.
    pub fn build(self) -> Weber {
        Weber::new(self.opts)
    }
}
