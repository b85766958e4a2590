//! `jprm-release plan` - show what a build would do without running jprm
//!
//! Resolves the tag, reads the descriptor and loads the metadata so every input
//! error surfaces here. No file is written and the output directory is not created.

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::jprm::{BuildRequest, Jprm, display_args};
use crate::release::{PluginMetadata, ReleasePlan};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PlanReport {
  #[serde(flatten)]
  plan: ReleasePlan,

  build_command: String,

  /// jprm.yaml already carries `targetAbi` or `changelog`; restoring will drop them
  metadata_has_transient_keys: bool,
}

/// Run the plan command
pub fn run_plan(ctx: &ReleaseContext, json: bool) -> ReleaseResult<()> {
  let plan = ReleasePlan::prepare(ctx)?;
  let metadata = PluginMetadata::load(&ctx.metadata_path())?;

  let jprm = Jprm::new(&ctx.config.jprm, &ctx.root);
  let request = BuildRequest {
    framework: &plan.project.framework,
    max_cpu_count: plan.max_cpu_count,
    version: &plan.version.version,
    output_dir: &plan.output_dir,
  };
  let build_command = format!("{} {}", jprm.program(), display_args(&jprm.build_args(&request)));

  let report = PlanReport {
    metadata_has_transient_keys: metadata.has_transient_keys(),
    build_command,
    plan,
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_plan(&report);
  }

  Ok(())
}

fn print_plan(report: &PlanReport) {
  let plan = &report.plan;

  println!("📋 Release Plan");
  println!();
  println!("  Tag:        {}", plan.version.tag);
  println!("  Version:    {}", plan.version.version);
  println!("  Framework:  {}", plan.project.framework);
  println!("  Target ABI: {}", plan.project.target_abi);
  println!("  CPUs:       {}", plan.max_cpu_count);
  println!("  Manifest:   {}", plan.manifest.display());
  println!("  Downloads:  {}/<package>", plan.release_url);
  println!();
  println!("  Build:");
  println!("    {}", report.build_command);

  if report.metadata_has_transient_keys {
    println!();
    println!(
      "⚠️  {} already contains targetAbi/changelog; they are removed after the build",
      plan.metadata.display()
    );
  }

  println!();
  println!("To release:");
  println!("  jprm-release build");
}
