//! Tiered configuration.
//!
//! Configuration is assembled by field-by-field merging, lowest tier
//! first:
//! 1. **Defaults** - built into the binary
//! 2. **User** - `~/.caskbook/config.yaml`
//! 3. **Project** - `./caskbook.yaml`
//! 4. **Environment** - `CASKBOOK_CONFIG_PATH` (explicit file, replaces
//!    the file tiers), `CASKBOOK_DB_PATH`
//! 5. **CLI flags** - applied by `main` after loading
//!
//! YAML files deep-merge: scalars and arrays are replaced, maps merge
//! recursively, null leaves the lower tier's value in place.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
