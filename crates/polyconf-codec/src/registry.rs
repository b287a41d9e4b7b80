//! Codec registry
//!
//! Registration and lookup are separate phases. A [`RegistryBuilder`] is
//! mutable and collects codecs; [`RegistryBuilder::finalize`] turns it into
//! an immutable [`CodecRegistry`] that can be shared across threads and read
//! without locking. A process-wide registry holding the built-in codecs is
//! available through [`CodecRegistry::global`].

use crate::codecs::Codec;
use crate::error::CodecError;
use crate::format::Format;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

static GLOBAL: OnceCell<CodecRegistry> = OnceCell::new();

/// Mutable registration phase
#[derive(Default)]
pub struct RegistryBuilder {
    codecs: HashMap<String, Arc<dyn Codec>>,
}

impl RegistryBuilder {
    /// Create builder with no codecs
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create builder pre-loaded with every built-in codec
    ///
    /// Each format gets one shared codec instance registered under all of
    /// its names.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut builder = Self::new();
        for format in Format::ALL {
            builder.register_shared(format.codec());
        }
        builder
    }

    /// Register a codec under the names of its descriptor
    pub fn register<C: Codec + 'static>(&mut self, codec: C) -> &mut Self {
        self.register_shared(Arc::new(codec))
    }

    /// Register a shared codec under the names of its descriptor
    pub fn register_shared(&mut self, codec: Arc<dyn Codec>) -> &mut Self {
        let descriptor = codec.descriptor();
        let names: Vec<&str> = descriptor.names().collect();
        self.register_as(codec, &names)
    }

    /// Register a shared codec under explicit names
    ///
    /// A name that is already registered is rebound to `codec`.
    pub fn register_as(&mut self, codec: Arc<dyn Codec>, names: &[&str]) -> &mut Self {
        for name in names {
            if let Some(previous) = self.codecs.insert((*name).to_string(), Arc::clone(&codec)) {
                tracing::debug!(name, ?previous, "replaced registered codec");
            }
        }
        self
    }

    /// Finish registration
    #[must_use]
    pub fn finalize(self) -> CodecRegistry {
        tracing::debug!(names = self.codecs.len(), "codec registry finalized");
        CodecRegistry {
            codecs: self.codecs,
        }
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("names", &sorted_names(&self.codecs))
            .finish()
    }
}

/// Immutable name-to-codec table
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: HashMap<String, Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// Start a new registration phase
    #[inline]
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry holding every built-in codec
    #[must_use]
    pub fn builtin() -> Self {
        RegistryBuilder::with_builtins().finalize()
    }

    /// Process-wide registry
    ///
    /// Holds the built-in codecs unless [`install_global`](Self::install_global)
    /// ran first.
    pub fn global() -> &'static CodecRegistry {
        GLOBAL.get_or_init(Self::builtin)
    }

    /// Make `registry` the process-wide registry
    ///
    /// # Errors
    /// Hands `registry` back if the global registry is already initialized,
    /// including by an earlier call to [`global`](Self::global).
    pub fn install_global(registry: CodecRegistry) -> Result<(), CodecRegistry> {
        GLOBAL.set(registry)
    }

    /// Codec registered under `name`
    ///
    /// Names match exactly and case-sensitively.
    ///
    /// # Errors
    /// Returns [`CodecError::UnsupportedFormat`] if nothing is registered
    /// under `name`
    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Codec>, CodecError> {
        self.codecs.get(name).ok_or_else(|| {
            tracing::debug!(name, "no codec registered");
            CodecError::unknown_format(name)
        })
    }

    /// Codec registered under `name`, if any
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Codec>> {
        self.codecs.get(name)
    }

    /// Check if a codec is registered under `name`
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.codecs.contains_key(name)
    }

    /// Every registered name, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        sorted_names(&self.codecs)
    }

    /// Number of registered names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Check if no codec is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Reopen registration, starting from this registry's table
    #[must_use]
    pub fn into_builder(self) -> RegistryBuilder {
        RegistryBuilder {
            codecs: self.codecs,
        }
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn sorted_names(codecs: &HashMap<String, Arc<dyn Codec>>) -> Vec<&str> {
    let mut names: Vec<&str> = codecs.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}
