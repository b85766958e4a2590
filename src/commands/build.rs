//! `jprm-release build` - build the plugin and register it in the manifest
//!
//! Steps, in order, each fatal on failure:
//! 1. Resolve the version from the latest matching release tag
//! 2. Read framework and target ABI from the project descriptor
//! 3. Patch jprm.yaml with `targetAbi` and an empty `changelog`
//! 4. Run `jprm plugin build`
//! 5. Restore jprm.yaml
//! 6. Run `jprm repo add` with the computed download URL

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::jprm::{BuildRequest, Jprm};
use crate::release::{PluginMetadata, ReleasePlan};
use crate::utils::ensure_output_dir;

/// Run the build command
///
/// `restore_on_failure` (or `metadata.restore_on_failure` in the config) restores
/// jprm.yaml even when the build fails. Otherwise a failed build leaves the patched
/// file behind.
pub fn run_build(ctx: &ReleaseContext, restore_on_failure: bool) -> ReleaseResult<()> {
  let restore_on_failure = restore_on_failure || ctx.config.metadata.restore_on_failure;

  let plan = ReleasePlan::prepare(ctx)?;
  println!("📦 Releasing {} ({})", plan.version.version, plan.version.tag);
  println!("   Framework:  {}", plan.project.framework);
  println!("   Target ABI: {}", plan.project.target_abi);

  ensure_output_dir(&ctx.output_dir())?;

  let metadata = PluginMetadata::load(&ctx.metadata_path())?;
  let guard = metadata.patch_scoped(&plan.project.target_abi, restore_on_failure)?;
  println!("   Patched {}", plan.metadata.display());

  let jprm = Jprm::new(&ctx.config.jprm, &ctx.root);
  let request = BuildRequest {
    framework: &plan.project.framework,
    max_cpu_count: plan.max_cpu_count,
    version: &plan.version.version,
    output_dir: &plan.output_dir,
  };
  println!("🔨 Building with {} ({} CPUs)", jprm.program(), plan.max_cpu_count);
  let archive = jprm.plugin_build(&request)?;

  guard.restore()?;
  println!("   Restored {}", plan.metadata.display());

  println!("Package path: {}", archive.display());

  let url = plan.download_url(&archive)?;
  println!("📝 Registering {}", url);
  jprm.repo_add(&url, &plan.manifest, &archive)?;

  println!();
  println!("✅ Release {} added to {}", plan.version.version, plan.manifest.display());
  Ok(())
}
