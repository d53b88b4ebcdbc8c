use std::sync::Arc;

use anyhow::Result;

use sheriff_core::api::{
    AppConfig, PoolSuffixes, Providers, SignalCollector, Triage, VerdictEngine,
};

use crate::azure::AzureVmInspector;
use crate::taskcluster::TaskclusterProvider;
use crate::treeherder::TreeherderProvider;

pub fn build_providers(cfg: &AppConfig) -> Result<Providers> {
    let tc = Arc::new(TaskclusterProvider::new(
        &cfg.taskcluster.root_url,
        cfg.taskcluster.timeout_ms,
    )?);
    let th = Arc::new(TreeherderProvider::new(
        &cfg.treeherder.base_url,
        cfg.treeherder.timeout_ms,
        &cfg.treeherder.user_agent,
        cfg.treeherder.push_limit,
        cfg.treeherder.classification_repos.clone(),
    )?);

    Ok(Providers {
        tasks: tc.clone(),
        images: tc,
        failures: th.clone(),
        classifications: th,
    })
}

pub fn build_collector(cfg: &AppConfig) -> Result<SignalCollector> {
    Ok(SignalCollector::new(
        build_providers(cfg)?,
        PoolSuffixes::from(&cfg.triage),
        cfg.treeherder.search_repos.clone(),
    ))
}

pub fn build_triage(cfg: &AppConfig, skip_failure_search: bool) -> Result<Triage> {
    let collector = build_collector(cfg)?.skip_failure_search(skip_failure_search);
    Ok(Triage::new(
        collector,
        VerdictEngine::from(&cfg.triage),
        cfg.taskcluster.root_url.clone(),
    ))
}

pub fn build_vm_inspector(cfg: &AppConfig) -> AzureVmInspector {
    AzureVmInspector::new(&cfg.azure)
}
