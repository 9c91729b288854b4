//! Upload orchestrator
//!
//! [`UploadAction`] owns the uploader tool name, the caller-owned
//! environment, and the list of registered pre-upload hooks. Running the
//! action dispatches the hooks in registration order and then spawns the
//! flashing tool with whatever flag list the hooks left behind. The tool
//! itself is an external collaborator; this module only assembles and
//! executes its command line.

use std::process::Command;

use crate::env::UploadEnvironment;
use crate::error::{Result, UploadError};
use crate::hook::{PreUploadHook, UploadContext};

// =============================================================================
// Upload Action
// =============================================================================

/// The "upload" build action with its pre-action hook chain
///
/// Hooks run in the order they were registered. The environment is handed
/// to each hook by mutable reference, one hook at a time, so every hook
/// sees the previous hook's writes.
pub struct UploadAction {
    tool: String,
    env: UploadEnvironment,
    hooks: Vec<Box<dyn PreUploadHook>>,
    dry_run: bool,
}

impl UploadAction {
    /// Create an upload action for `tool` over a seeded environment
    ///
    /// Any subcommand the tool needs (e.g. espflash's `flash`) belongs at
    /// the front of the environment's uploader flag list.
    #[must_use]
    pub fn new(tool: impl Into<String>, env: UploadEnvironment) -> Self {
        Self {
            tool: tool.into(),
            env,
            hooks: Vec::new(),
            dry_run: false,
        }
    }

    /// Print the assembled command instead of spawning the tool
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Register a pre-upload hook
    ///
    /// Registration order is dispatch order.
    pub fn register_pre_hook(&mut self, hook: Box<dyn PreUploadHook>) {
        self.hooks.push(hook);
    }

    /// The environment as the hooks have left it so far
    #[must_use]
    pub fn env(&self) -> &UploadEnvironment {
        &self.env
    }

    /// Assemble the uploader's argument vector from the current environment
    ///
    /// Flag list first, then the port and image descriptors from the
    /// context, matching how the flashing tools order their arguments.
    #[must_use]
    pub fn tool_args(&self, ctx: &UploadContext) -> Vec<String> {
        let mut args: Vec<String> = self.env.uploader_flags().to_vec();

        if let Some(port) = &ctx.port {
            args.push("--port".to_string());
            args.push(port.clone());
        }

        if let Some(image) = ctx.image() {
            args.push(image.display().to_string());
        }

        args
    }

    /// Run the upload action
    ///
    /// Dispatches the registered hooks, then spawns the tool. A hook error
    /// aborts before anything is spawned. A non-zero tool exit status is
    /// reported as [`UploadError::Failed`].
    pub fn run(&mut self, ctx: &UploadContext) -> Result<()> {
        for hook in &self.hooks {
            log::debug!("pre-upload hook `{}` for target `{}`", hook.name(), ctx.target);
            hook.before_upload(ctx, &mut self.env)?;
        }

        let args = self.tool_args(ctx);
        println!("nvs-guard: {} {}", self.tool, args.join(" "));

        if self.dry_run {
            return Ok(());
        }

        let status = Command::new(&self.tool)
            .args(&args)
            .status()
            .map_err(|source| UploadError::Spawn {
                tool: self.tool.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(UploadError::Failed {
                tool: self.tool.clone(),
                status,
            }
            .into())
        }
    }
}

impl std::fmt::Debug for UploadAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadAction")
            .field("tool", &self.tool)
            .field("env", &self.env)
            .field("hooks", &self.hooks.iter().map(|h| h.name()).collect::<Vec<_>>())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::env::UPLOADER_FLAGS_KEY;
    use crate::filter::UploadFlagFilter;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    /// Hook that records its dispatch and appends a marker flag.
    struct Recorder {
        name: &'static str,
        order: Rc<RefCell<Vec<&'static str>>>,
    }

    impl PreUploadHook for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn before_upload(&self, _ctx: &UploadContext, env: &mut UploadEnvironment) -> Result<()> {
            self.order.borrow_mut().push(self.name);
            let mut flags = env.uploader_flags().to_vec();
            flags.push(format!("--from-{}", self.name));
            env.replace(UPLOADER_FLAGS_KEY, flags);
            Ok(())
        }
    }

    // =========================================================================
    // Hook Dispatch
    // =========================================================================

    #[test]
    fn hooks_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let env = UploadEnvironment::new();
        let mut action = UploadAction::new("espflash", env).with_dry_run(true);

        action.register_pre_hook(Box::new(Recorder {
            name: "first",
            order: Rc::clone(&order),
        }));
        action.register_pre_hook(Box::new(Recorder {
            name: "second",
            order: Rc::clone(&order),
        }));

        action.run(&UploadContext::new("upload")).unwrap();

        assert_eq!(*order.borrow(), ["first", "second"]);
        assert_eq!(
            action.env().uploader_flags(),
            strings(&["--from-first", "--from-second"]).as_slice()
        );
    }

    #[test]
    fn later_hooks_see_earlier_writes() {
        let env = UploadEnvironment::with_uploader_flags(["--chip", "esp32", "--erase-all"]);
        let mut action = UploadAction::new("espflash", env).with_dry_run(true);

        action.register_pre_hook(Box::new(UploadFlagFilter::new()));
        action.run(&UploadContext::new("upload")).unwrap();

        assert_eq!(
            action.env().uploader_flags(),
            strings(&["--chip", "esp32"]).as_slice()
        );
    }

    // =========================================================================
    // Command Assembly
    // =========================================================================

    #[test]
    fn tool_args_order_flags_then_port_then_image() {
        let env = UploadEnvironment::with_uploader_flags(["flash", "--baud", "921600"]);
        let action = UploadAction::new("espflash", env);
        let ctx = UploadContext::new("upload")
            .with_port("/dev/ttyUSB0")
            .with_image("firmware.bin");

        assert_eq!(
            action.tool_args(&ctx),
            strings(&[
                "flash",
                "--baud",
                "921600",
                "--port",
                "/dev/ttyUSB0",
                "firmware.bin"
            ])
        );
    }

    #[test]
    fn tool_args_without_descriptors_is_just_flags() {
        let env = UploadEnvironment::with_uploader_flags(["flash"]);
        let action = UploadAction::new("espflash", env);
        assert_eq!(
            action.tool_args(&UploadContext::new("upload")),
            strings(&["flash"])
        );
    }

    // =========================================================================
    // Dry Run
    // =========================================================================

    #[test]
    fn dry_run_applies_hooks_without_spawning() {
        let env = UploadEnvironment::with_uploader_flags(["flash", "--erase-flash"]);
        // Tool name that cannot exist; dry run must not try to spawn it.
        let mut action = UploadAction::new("definitely-not-a-real-tool", env).with_dry_run(true);
        action.register_pre_hook(Box::new(UploadFlagFilter::new()));

        action.run(&UploadContext::new("upload")).unwrap();
        assert_eq!(action.env().uploader_flags(), strings(&["flash"]).as_slice());
    }

    #[test]
    fn missing_tool_surfaces_spawn_error() {
        let env = UploadEnvironment::new();
        let mut action = UploadAction::new("nvs-guard-test-no-such-tool", env);

        let err = action.run(&UploadContext::new("upload")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Upload(UploadError::Spawn { .. })
        ));
    }
}
