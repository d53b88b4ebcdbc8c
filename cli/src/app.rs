//! Command dispatch: apply CLI overrides to the config, build providers and
//! print each command's result.
use std::io::Read;

use serde::Serialize;
use sheriff_core::api as core_api;
use sheriff_core::verdict::recommended_actions;
use sheriff_plugins::factory;

use crate::commands::cli::{Args, Commands};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerdictOutput {
    #[serde(flatten)]
    verdict: core_api::Verdict,
    recommended_actions: Vec<&'static str>,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), core_api::CliError> {
    let s = serde_json::to_string_pretty(value)
        .map_err(|e| core_api::CliError::Command(format!("serialize output failed: {e}")))?;
    println!("{s}");
    Ok(())
}

/// Parse a signal tuple; missing fields take their defaults.
pub fn parse_signals(raw: &str) -> Result<core_api::SignalTuple, core_api::CliError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(core_api::CliError::Signals("empty input".to_string()));
    }
    serde_json::from_str(raw).map_err(|e| core_api::CliError::Signals(e.to_string()))
}

pub fn apply_overrides(cfg: &mut core_api::AppConfig, args: &Args) {
    if let Some(url) = args.root_url.as_deref().filter(|u| !u.trim().is_empty()) {
        cfg.taskcluster.root_url = url.to_string();
    }
}

#[tracing::instrument(name = "cli.run", skip_all)]
pub async fn run(args: Args, mut cfg: core_api::AppConfig) -> Result<i32, core_api::CliError> {
    apply_overrides(&mut cfg, &args);

    match args.command {
        Commands::Triage(t) => {
            let triage = factory::build_triage(&cfg, t.skip_treeherder)?;
            let show_progress = !t.json && atty::is(atty::Stream::Stderr);
            let progress =
                core_api::TriageProgress::new(core_api::TriageProgress::TRIAGE_STEPS, show_progress);
            let report = triage.run(&t.task, &progress).await?;
            if t.json {
                print_json(&report)?;
            } else {
                print!("{}", core_api::render_triage_markdown(&report));
            }
        }
        Commands::Verdict(v) => {
            let raw = match v.signals {
                Some(s) => s,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let signals = parse_signals(&raw)?;
            let verdict = core_api::VerdictEngine::from(&cfg.triage).decide(signals);
            let recommended_actions = recommended_actions(verdict.verdict).to_vec();
            print_json(&VerdictOutput {
                verdict,
                recommended_actions,
            })?;
        }
        Commands::Investigate(t) => {
            let collector = factory::build_collector(&cfg)?;
            print_json(&core_api::investigate(&collector, &t.task).await?)?;
        }
        Commands::Compare(c) => {
            let collector = factory::build_collector(&cfg)?;
            print_json(&core_api::compare(&collector, &c.task1, &c.task2).await?)?;
        }
        Commands::Workers(p) => {
            let collector = factory::build_collector(&cfg)?;
            print_json(&core_api::running_workers(&collector, &p.worker_pool).await?)?;
        }
        Commands::Sbom(p) => {
            let collector = factory::build_collector(&cfg)?;
            print_json(&core_api::worker_sbom(&collector, &p.worker_pool).await?)?;
        }
        Commands::VmInfo(v) => {
            let inspector = factory::build_vm_inspector(&cfg);
            eprintln!("# VM Info: {}", v.vm_name);
            print_json(&inspector.vm_info(&v.vm_name, &v.resource_group).await?)?;
        }
        Commands::SheriffReport(r) => {
            let collector = factory::build_collector(&cfg)?;
            let summary = core_api::sheriff_summary(
                &collector,
                &r.task,
                !r.no_compare_production,
                &cfg.taskcluster.root_url,
            )
            .await?;
            print!("{}", core_api::render_sheriff_summary(&summary)?);
        }
        Commands::ProductionPool(p) => {
            let suffixes = core_api::PoolSuffixes::from(&cfg.triage);
            println!("{}", suffixes.strip(&p.worker_pool));
        }
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_signals_defaults_missing_fields() {
        let s = parse_signals(r#"{"is_alpha":true,"version_differs":true}"#).unwrap();
        assert!(s.is_alpha);
        assert_eq!(s.autoland_failures, 0);
        assert_eq!(s.classification_id, core_api::Classification::NotClassified);
    }

    #[test]
    fn test_parse_signals_rejects_bad_input() {
        assert!(matches!(
            parse_signals("not json"),
            Err(core_api::CliError::Signals(_))
        ));
        assert!(matches!(parse_signals("  "), Err(core_api::CliError::Signals(_))));
        assert!(matches!(
            parse_signals(r#"{"classification_id": 99}"#),
            Err(core_api::CliError::Signals(_))
        ));
    }

    #[test]
    fn test_root_url_override() {
        let args = Args::parse_from(["sheriff", "--root-url", "https://tc.example", "sbom", "a/b"]);
        let mut cfg = core_api::AppConfig::default();
        apply_overrides(&mut cfg, &args);
        assert_eq!(cfg.taskcluster.root_url, "https://tc.example");

        let args = Args::parse_from(["sheriff", "sbom", "a/b"]);
        let mut cfg = core_api::AppConfig::default();
        apply_overrides(&mut cfg, &args);
        assert_eq!(cfg.taskcluster.root_url, core_api::AppConfig::default().taskcluster.root_url);
    }

    #[test]
    fn test_verdict_output_shape() {
        let verdict = core_api::decide(core_api::SignalTuple {
            is_alpha: true,
            version_differs: true,
            ..Default::default()
        });
        let out = VerdictOutput {
            recommended_actions: recommended_actions(verdict.verdict).to_vec(),
            verdict,
        };
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["verdict"], "IMAGE_REGRESSION");
        assert_eq!(v["confidence"], "High");
        assert_eq!(v["recommendedActions"][0], "Notify image maintainer");
    }
}
