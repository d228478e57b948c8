//! Reconciliation test harness binary
//!
//! Drives a scripted reconciliation pass against the in-memory mock
//! platform and prints the outcome, so the engine's behavior can be
//! inspected without a live platform: drift refinement, operation
//! ordering, and the minimum-grantee rejection path.

use anyhow::Result;
use clap::Parser;
use spaceward_core::core_grant::SpaceRole;
use spaceward_core::core_reconcile::AccessReconciler;
use spaceward_core::core_space::DeclaredAccess;
use spaceward_core::logging::{init_logging_with_config, LogConfig, LogLevel};
use spaceward_core::test_utils::{grant_set, user, MockPlatform, TestSpaceBuilder};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "test-harness")]
#[command(about = "Spaceward reconciliation test harness", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Demonstrate the minimum-grantee rejection path
    #[arg(long)]
    strip_all_grants: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level: LogLevel = args
        .log_level
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    init_logging_with_config(LogConfig::new(level))?;

    let space = TestSpaceBuilder::new("demo-space").restricted().build();
    let platform = Arc::new(MockPlatform::new().with_space(
        space.id,
        grant_set(&[
            ("creator", SpaceRole::Admin),
            ("u1", SpaceRole::Editor),
        ]),
    ));
    let reconciler = AccessReconciler::new(platform.clone());

    // In strip mode the engine previously declared every grant, so it will
    // attempt to remove them all and run into the minimum-grantee rule.
    let (declared, previously) = if args.strip_all_grants {
        (
            DeclaredAccess::grants_only(grant_set(&[])),
            grant_set(&[("creator", SpaceRole::Admin), ("u1", SpaceRole::Editor)]),
        )
    } else {
        (
            DeclaredAccess::grants_only(grant_set(&[
                ("u1", SpaceRole::Admin),
                ("u2", SpaceRole::Viewer),
            ])),
            grant_set(&[("u1", SpaceRole::Editor)]),
        )
    };

    println!("space:      {} ({})", space.name, space.id);
    println!("previously: {}", previously);
    println!("declared:   {}", declared.grants);
    println!();

    let outcome = reconciler.reconcile(&space, &declared, &previously).await?;

    println!("first pass:  {}", outcome);
    for err in &outcome.operation_errors {
        println!("  failed: {}", err);
    }

    // A second pass with the persisted declared set must be a no-op
    let journal_before = platform.journal().len();
    let second = reconciler
        .reconcile(&space, &declared, &declared.grants)
        .await?;
    println!("second pass: {}", second);
    println!(
        "idempotent:  {}",
        platform.journal().len() == journal_before
    );

    println!();
    println!("platform journal:");
    for entry in platform.journal() {
        println!("  {}", entry);
    }

    Ok(())
}
