use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sheriff", version, about = "Triage Firefox CI test failures")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Taskcluster root URL (overrides config and TASKCLUSTER_ROOT_URL).
    #[arg(long, global = true)]
    pub root_url: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TriageArgs {
    /// Task ID or Taskcluster task URL.
    pub task: String,

    /// Print the report as JSON instead of Markdown.
    #[arg(long)]
    pub json: bool,

    /// Skip the similar-failure search on Treeherder.
    #[arg(long)]
    pub skip_treeherder: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct VerdictArgs {
    /// Signal tuple as JSON; read from stdin when omitted.
    #[arg(long)]
    pub signals: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TaskArgs {
    /// Task ID or Taskcluster task URL.
    pub task: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CompareArgs {
    /// First task (e.g. passing).
    pub task1: String,
    /// Second task (e.g. failing).
    pub task2: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PoolArgs {
    /// Worker pool, e.g. gecko-t/win11-64-24h2.
    pub worker_pool: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct VmInfoArgs {
    pub vm_name: String,
    pub resource_group: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SheriffReportArgs {
    /// Task ID or Taskcluster task URL.
    pub task: String,

    /// Do not look up the production twin of an alpha pool.
    #[arg(long)]
    pub no_compare_production: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect signals for a failed task and decide a verdict.
    Triage(TriageArgs),
    /// Run the verdict engine on a literal signal tuple.
    Verdict(VerdictArgs),
    /// Show worker and image details for a task.
    Investigate(TaskArgs),
    /// Compare worker images of two tasks.
    Compare(CompareArgs),
    /// List running workers in a pool.
    Workers(PoolArgs),
    /// Show the SBOM and image version of a pool.
    Sbom(PoolArgs),
    /// Query Windows build, generic-worker version and hotfixes on an Azure VM.
    VmInfo(VmInfoArgs),
    /// Image-focused Markdown summary for a failed task.
    SheriffReport(SheriffReportArgs),
    /// Print the production pool for an alpha/staging pool.
    ProductionPool(PoolArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_triage_flags() {
        let args = Args::parse_from([
            "sheriff",
            "triage",
            "Xcac5C8gRqiOT13YsVRX8A",
            "--json",
            "--skip-treeherder",
            "--root-url",
            "https://tc.example",
        ]);
        assert_eq!(args.root_url.as_deref(), Some("https://tc.example"));
        match args.command {
            Commands::Triage(t) => {
                assert_eq!(t.task, "Xcac5C8gRqiOT13YsVRX8A");
                assert!(t.json);
                assert!(t.skip_treeherder);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_kebab_case_subcommands() {
        let args = Args::parse_from(["sheriff", "vm-info", "vm-1", "rg-ci"]);
        assert!(matches!(args.command, Commands::VmInfo(ref v) if v.resource_group == "rg-ci"));

        let args = Args::parse_from(["sheriff", "sheriff-report", "abc", "--no-compare-production"]);
        assert!(matches!(
            args.command,
            Commands::SheriffReport(ref r) if r.no_compare_production
        ));

        let args = Args::parse_from(["sheriff", "production-pool", "gecko-t/win11-alpha"]);
        assert!(matches!(args.command, Commands::ProductionPool(_)));
    }

    #[test]
    fn test_verdict_signals_optional() {
        let args = Args::parse_from(["sheriff", "verdict"]);
        assert!(matches!(args.command, Commands::Verdict(ref v) if v.signals.is_none()));
    }
}
