//! Configuration for a test run.

use probity_foundation::Frame;

use crate::case::CaseContext;

/// Modules dropped from reported stack traces by default.
///
/// Each entry matches the module itself and anything nested under it.
pub const DEFAULT_EXCLUDED_MODULES: &[&str] = &[
    "probity",
    "probity_foundation",
    "probity_engine",
    "probity_runner",
    "std",
    "core",
    "alloc",
    "test",
    "rust_begin_unwind",
];

/// Symbol text prefixes dropped from reported stack traces by default.
///
/// These match anywhere a qualified path starts with the text, covering
/// trait-impl frames (`<core::..>`) and the runtime's `__rust_*` shims.
pub const DEFAULT_EXCLUDED_SYMBOLS: &[&str] =
    &["__rust", "<alloc", "<core", "<std", "<probity"];

/// File prefixes dropped from reported stack traces by default.
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &["/rustc/"];

// =============================================================================
// StackFilter
// =============================================================================

/// Drops stack frames that belong to the runner or the runtime.
///
/// A frame is excluded when its qualified path (`module::function`) lies
/// inside one of the excluded modules, starts with one of the symbol
/// prefixes, or its file starts with one of the file prefixes. Module
/// entries match whole path segments, so excluding `core` keeps
/// `core_banking::ledger`. Frames with neither path nor file are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackFilter {
    modules: Vec<String>,
    symbols: Vec<String>,
    files: Vec<String>,
}

impl Default for StackFilter {
    fn default() -> Self {
        Self {
            modules: owned(DEFAULT_EXCLUDED_MODULES),
            symbols: owned(DEFAULT_EXCLUDED_SYMBOLS),
            files: owned(DEFAULT_EXCLUDED_FILES),
        }
    }
}

fn owned(entries: &[&str]) -> Vec<String> {
    entries.iter().map(ToString::to_string).collect()
}

impl StackFilter {
    /// A filter that keeps every frame.
    #[must_use]
    pub fn keep_all() -> Self {
        Self {
            modules: Vec::new(),
            symbols: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Builder method to exclude another module and everything under it.
    #[must_use]
    pub fn with_excluded_module(mut self, prefix: impl Into<String>) -> Self {
        self.modules.push(prefix.into());
        self
    }

    /// Builder method to exclude another raw symbol prefix.
    #[must_use]
    pub fn with_excluded_symbol(mut self, prefix: impl Into<String>) -> Self {
        self.symbols.push(prefix.into());
        self
    }

    /// Builder method to exclude another file prefix.
    #[must_use]
    pub fn with_excluded_file(mut self, prefix: impl Into<String>) -> Self {
        self.files.push(prefix.into());
        self
    }

    /// Returns true if `frame` should be dropped.
    #[must_use]
    pub fn excludes(&self, frame: &Frame) -> bool {
        let path = qualified_path(frame);
        if !path.is_empty()
            && (self.modules.iter().any(|m| within_module(&path, m))
                || self.symbols.iter().any(|p| path.starts_with(p.as_str())))
        {
            return true;
        }
        frame
            .file
            .as_deref()
            .is_some_and(|file| self.files.iter().any(|p| file.starts_with(p.as_str())))
    }

    /// Returns the kept frames, at most `limit` of them.
    #[must_use]
    pub fn apply(&self, frames: &[Frame], limit: usize) -> Vec<Frame> {
        frames
            .iter()
            .filter(|frame| !self.excludes(frame))
            .take(limit)
            .cloned()
            .collect()
    }
}

fn within_module(path: &str, module: &str) -> bool {
    path.strip_prefix(module)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

fn qualified_path(frame: &Frame) -> String {
    match (frame.module.is_empty(), frame.function.is_empty()) {
        (false, false) => format!("{}::{}", frame.module, frame.function),
        (false, true) => frame.module.clone(),
        (true, _) => frame.function.clone(),
    }
}

// =============================================================================
// RunConfig
// =============================================================================

/// Configuration for a test run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Namespaces to run; empty means every namespace.
    pub namespaces: Vec<String>,

    /// Only run cases whose name contains this text.
    pub name_filter: Option<String>,

    /// Filter applied to stack traces of error records.
    pub stack_filter: StackFilter,

    /// Maximum number of frames kept per stack trace.
    pub max_trace_frames: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            namespaces: Vec::new(),
            name_filter: None,
            stack_filter: StackFilter::default(),
            max_trace_frames: 32,
        }
    }
}

impl RunConfig {
    /// Creates a configuration that reports unfiltered, untruncated traces.
    #[must_use]
    pub fn full_traces() -> Self {
        Self {
            stack_filter: StackFilter::keep_all(),
            max_trace_frames: usize::MAX,
            ..Self::default()
        }
    }

    /// Builder method to add a namespace to run.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces.push(namespace.into());
        self
    }

    /// Builder method to set the name filter.
    #[must_use]
    pub fn with_name_filter(mut self, filter: impl Into<String>) -> Self {
        self.name_filter = Some(filter.into());
        self
    }

    /// Builder method to set the stack filter.
    #[must_use]
    pub fn with_stack_filter(mut self, filter: StackFilter) -> Self {
        self.stack_filter = filter;
        self
    }

    /// Builder method to set the trace length limit.
    #[must_use]
    pub fn with_max_trace_frames(mut self, frames: usize) -> Self {
        self.max_trace_frames = frames;
        self
    }

    /// Returns true if the case passes the namespace and name filters.
    #[must_use]
    pub fn selects(&self, case: &CaseContext) -> bool {
        let namespace_ok =
            self.namespaces.is_empty() || self.namespaces.iter().any(|ns| *ns == case.meta.namespace);
        let name_ok = self
            .name_filter
            .as_deref()
            .is_none_or(|filter| case.name.contains(filter));
        namespace_ok && name_ok
    }
}
