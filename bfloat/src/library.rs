//! A compile unit: macros plus constants, and the build pipeline over it.
//!
//! On disk a library is a directory:
//!
//! | File | Meaning |
//! |------|---------|
//! | `<name>.bfm` | macro `<name>`, file content is the macro body |
//! | `*.bfc` | constants; all files are concatenated and parsed as one table |
//! | anything else | ignored, as are subdirectories |

use std::path::Path;

use crate::compiler::{self, ENTRY_MACRO};
use crate::constants::ConstantTable;
use crate::error::{Error, Result};
use crate::macros::{Macro, MacroSet};
use crate::optimize::optimize;

pub const MACRO_EXT: &str = "bfm";
pub const CONSTANTS_EXT: &str = "bfc";

#[derive(Debug, Clone, Default)]
pub struct Library {
    pub macros: MacroSet,
    pub constants: ConstantTable,
}

impl Library {
    pub fn new(macros: MacroSet, constants: ConstantTable) -> Self {
        Self { macros, constants }
    }

    /// Load every macro and constants file in `dir`, in file-name order.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let path = entry.map_err(|e| Error::io(dir, e))?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut macros = MacroSet::new();
        let mut constants_src = String::new();
        for path in &paths {
            let ext = path.extension().and_then(|e| e.to_str());
            if ext == Some(CONSTANTS_EXT) {
                let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
                constants_src.push_str(&text);
                if !constants_src.ends_with('\n') {
                    constants_src.push('\n');
                }
            } else if ext == Some(MACRO_EXT) {
                let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                    tracing::warn!(path = %path.display(), "skipping macro file with non-UTF-8 name");
                    continue;
                };
                let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
                macros.insert(Macro::new(name, content));
            }
        }

        let constants = ConstantTable::parse(&constants_src)?;
        tracing::debug!(
            dir = %dir.display(),
            macros = macros.len(),
            constants = constants.len(),
            "library loaded"
        );
        Ok(Self { macros, constants })
    }

    /// Compile the entry macro without optimizing.
    pub fn compile(&self) -> Result<String> {
        let compiled = compiler::compile(&self.macros, &self.constants, ENTRY_MACRO)?;
        tracing::debug!(len = compiled.len(), "compiled");
        Ok(compiled)
    }

    /// Compile the entry macro and run the peephole optimizer over it.
    pub fn build(&self) -> Result<String> {
        let compiled = self.compile()?;
        let optimized = optimize(&compiled);
        tracing::debug!(
            len = optimized.len(),
            removed = compiled.len() - optimized.len(),
            "optimized"
        );
        Ok(optimized)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
