//! NVS-preserving upload flag filter
//!
//! The flashing tool accepts flags that erase the whole flash, which also
//! wipes the NVS partition holding WiFi credentials. [`UploadFlagFilter`]
//! runs as a pre-upload hook and strips those flags from the uploader flag
//! list so credentials survive a re-flash. It never touches the partition
//! table or the device itself, only the outgoing command line.

use crate::env::{UPLOADER_FLAGS_KEY, UploadEnvironment};
use crate::error::Result;
use crate::hook::{PreUploadHook, UploadContext};

// =============================================================================
// Forbidden Flags
// =============================================================================

/// Uploader flags that wipe NVS, matched as exact strings only
pub const FORBIDDEN_ERASE_FLAGS: [&str; 2] = ["--erase-all", "--erase-flash"];

/// Confirmation line printed once the flag list is committed
pub const PRESERVE_NVS_MESSAGE: &str = "Upload configured to preserve WiFi credentials";

// =============================================================================
// Upload Flag Filter
// =============================================================================

/// Pre-upload hook that removes NVS-erasing flags
///
/// For each forbidden flag the first occurrence is removed if present;
/// absence is not an error. All other flags keep their relative order.
/// The filter is idempotent and keeps no state between invocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadFlagFilter;

impl UploadFlagFilter {
    /// Create the filter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Remove the first occurrence of each forbidden flag
    ///
    /// Pure filtering step, shared by the hook path and by callers that
    /// want to inspect the result without committing it to an environment.
    #[must_use]
    pub fn filter_flags(flags: &[String]) -> Vec<String> {
        let mut filtered = flags.to_vec();
        for forbidden in FORBIDDEN_ERASE_FLAGS {
            if let Some(pos) = filtered.iter().position(|flag| flag == forbidden) {
                filtered.remove(pos);
            }
        }
        filtered
    }
}

impl PreUploadHook for UploadFlagFilter {
    fn name(&self) -> &'static str {
        "preserve-nvs"
    }

    fn before_upload(&self, ctx: &UploadContext, env: &mut UploadEnvironment) -> Result<()> {
        let flags = env.uploader_flags();
        let filtered = Self::filter_flags(flags);

        if filtered.len() != flags.len() {
            log::debug!(
                "{}: removed {} erase flag(s) for target `{}`",
                self.name(),
                flags.len() - filtered.len(),
                ctx.target
            );
        }

        env.replace(UPLOADER_FLAGS_KEY, filtered);
        println!("{PRESERVE_NVS_MESSAGE}");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    fn apply(env: &mut UploadEnvironment) {
        let ctx = UploadContext::new("upload");
        UploadFlagFilter::new()
            .before_upload(&ctx, env)
            .expect("filter never fails");
    }

    // =========================================================================
    // Pure Filtering
    // =========================================================================

    #[test]
    fn removes_erase_all_keeping_order() {
        let input = strings(&["--chip", "esp32", "--erase-all", "--baud", "921600"]);
        let output = UploadFlagFilter::filter_flags(&input);
        assert_eq!(output, strings(&["--chip", "esp32", "--baud", "921600"]));
    }

    #[test]
    fn removes_both_forbidden_flags() {
        let input = strings(&["--erase-flash", "--erase-all"]);
        let output = UploadFlagFilter::filter_flags(&input);
        assert!(output.is_empty());
    }

    #[test]
    fn clean_input_passes_through_unchanged() {
        let input = strings(&["--chip", "esp32", "--baud", "921600"]);
        assert_eq!(UploadFlagFilter::filter_flags(&input), input);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(UploadFlagFilter::filter_flags(&[]).is_empty());
    }

    #[test]
    fn removes_only_first_occurrence_of_duplicates() {
        let input = strings(&["--erase-all", "--baud", "921600", "--erase-all"]);
        let output = UploadFlagFilter::filter_flags(&input);
        assert_eq!(output, strings(&["--baud", "921600", "--erase-all"]));
    }

    #[test]
    fn exact_match_only_no_prefix_matching() {
        let input = strings(&["--erase-all-partitions", "--erase", "--no-erase-flash"]);
        assert_eq!(UploadFlagFilter::filter_flags(&input), input);
    }

    #[test]
    fn filtering_is_idempotent() {
        let input = strings(&["--chip", "esp32", "--erase-all", "--erase-flash"]);
        let once = UploadFlagFilter::filter_flags(&input);
        let twice = UploadFlagFilter::filter_flags(&once);
        assert_eq!(once, twice);
    }

    // =========================================================================
    // Hook Path (environment write-back)
    // =========================================================================

    #[test]
    fn hook_commits_filtered_flags_to_environment() {
        let mut env =
            UploadEnvironment::with_uploader_flags(["--chip", "esp32", "--erase-all", "--baud", "921600"]);
        apply(&mut env);
        assert_eq!(
            env.uploader_flags(),
            strings(&["--chip", "esp32", "--baud", "921600"]).as_slice()
        );
    }

    #[test]
    fn hook_tolerates_absent_flags_key() {
        let mut env = UploadEnvironment::new();
        apply(&mut env);

        // Absent key reads as empty and is committed back as an empty list.
        assert_eq!(env.get(UPLOADER_FLAGS_KEY), Some(&[] as &[String]));
    }

    #[test]
    fn hook_is_idempotent_on_environment() {
        let mut env = UploadEnvironment::with_uploader_flags(["--erase-flash", "--baud", "921600"]);
        apply(&mut env);
        let after_once = env.uploader_flags().to_vec();
        apply(&mut env);
        assert_eq!(env.uploader_flags(), after_once.as_slice());
    }

    #[test]
    fn hook_has_stable_name() {
        assert_eq!(UploadFlagFilter::new().name(), "preserve-nvs");
    }
}
