//! Main sync command

use crate::config::resolve_targets;
use crate::executor::{reconcile, synchronize, SyncEvent};
use crate::types::{CopyStats, SmartCopyError};
use crate::ui::Reporter;
use crate::Config;
use std::fs;

/// Run the sync operation
///
/// Placement is validated before anything is written. The copy phase stops at
/// the first error; reconciliation then runs once per (source, target) pair
/// when extra detection is enabled.
pub fn run(config: Config) -> Result<CopyStats, SmartCopyError> {
    config.validate()?;
    let plan = resolve_targets(&config.sources, &config.destination)?;

    let reporter = Reporter::new(config.output);
    let on_event = |event: &SyncEvent<'_>| reporter.on_event(event);
    let mut stats = CopyStats::new();

    if plan.create_destination {
        fs::create_dir_all(&config.destination).map_err(|e| {
            SmartCopyError::access("create destination directory", &config.destination, e)
        })?;
    }

    for pair in &plan.pairs {
        tracing::info!(src = %pair.source.display(), dest = %pair.target.display(), "synchronizing");
        synchronize(&pair.source, &pair.target, &mut stats, Some(&on_event))?;
    }

    if config.options.detect_extra {
        for pair in &plan.pairs {
            let report = reconcile(
                &pair.source,
                &pair.target,
                &config.options,
                &mut stats,
                Some(&on_event),
            )?;
            if !report.failures.is_empty() {
                tracing::warn!(
                    dest = %pair.target.display(),
                    failures = report.failures.len(),
                    "some extra entries could not be deleted"
                );
            }
        }
    }

    reporter.finish(&stats, &config.options);
    Ok(stats)
}
