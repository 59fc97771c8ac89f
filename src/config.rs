//! Runtime configuration for the bytecode VM.
//!
//! Grounded on the original's literal stack/register-file size constants,
//! lifted here into an explicit, environment-overridable config struct
//! instead of baked-in numbers, since this crate has no global VM singleton
//! to hang constants off of.

use std::env;
use std::path::PathBuf;

const DEFAULT_STACK_DEPTH: usize = 20;
const DEFAULT_REGISTER_COUNT: usize = 20;

#[derive(Debug, Clone)]
pub struct VmConfig {
    /// Directory `Vm::load_class` resolves `<name>.gms` script files against.
    pub script_root: PathBuf,
    /// Operand stack capacity for any one execution frame.
    pub stack_depth: usize,
    /// Register file size for any one execution frame.
    pub register_count: usize,
}

impl VmConfig {
    pub fn from_env() -> Self {
        VmConfig {
            script_root: env::var("GMSL_SCRIPT_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("mudlib")),
            stack_depth: env_usize("GMSL_STACK_DEPTH", DEFAULT_STACK_DEPTH),
            register_count: env_usize("GMSL_REGISTER_COUNT", DEFAULT_REGISTER_COUNT),
        }
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            script_root: PathBuf::from("mudlib"),
            stack_depth: DEFAULT_STACK_DEPTH,
            register_count: DEFAULT_REGISTER_COUNT,
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_original_constants() {
        let cfg = VmConfig::default();
        assert_eq!(cfg.stack_depth, 20);
        assert_eq!(cfg.register_count, 20);
    }

    #[test]
    fn env_usize_falls_back_on_missing_or_bad_value() {
        assert_eq!(env_usize("GMSL_DOES_NOT_EXIST", 7), 7);
    }
}
