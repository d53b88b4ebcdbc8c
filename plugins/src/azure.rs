//! Azure VM inspection through the `az` CLI.
//!
//! Each probe is a PowerShell snippet sent with `az vm run-command invoke`.
//! A failed probe leaves its field empty instead of failing the whole call.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use sheriff_core::api::AzureConfig;
use tokio::process::Command;

const WINDOWS_BUILD_SCRIPT: &str =
    r"(Get-ItemProperty 'HKLM:\SOFTWARE\Microsoft\Windows NT\CurrentVersion').CurrentBuild";
const GENERIC_WORKER_VERSION_SCRIPT: &str = r"Get-Content C:\generic-worker\generic-worker-info.json | ConvertFrom-Json | Select-Object -ExpandProperty version";
const HOTFIX_SCRIPT: &str = "Get-HotFix | Sort-Object InstalledOn -Descending | Select-Object -First 5 HotFixID, InstalledOn | ConvertTo-Json";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmInfo {
    pub vm_name: String,
    pub resource_group: String,
    pub windows_build: Option<String>,
    pub generic_worker_version: Option<String>,
    pub recent_hotfixes: Option<Value>,
}

pub struct AzureVmInspector {
    az_bin: String,
}

impl AzureVmInspector {
    pub fn new(cfg: &AzureConfig) -> Self {
        Self {
            az_bin: cfg.az_bin.clone(),
        }
    }

    fn locate(&self) -> Result<PathBuf> {
        which::which(&self.az_bin).map_err(|e| {
            anyhow::anyhow!("az CLI not found ({}): {e}. Install the Azure CLI first.", self.az_bin)
        })
    }

    /// Run one PowerShell snippet on the VM and return its stdout.
    pub async fn run_powershell(
        &self,
        vm_name: &str,
        resource_group: &str,
        script: &str,
    ) -> Result<Option<String>> {
        let az = self.locate()?;
        tracing::debug!(
            target: "sheriff.az",
            stage = "az.run_command.in",
            vm = %vm_name,
            resource_group = %resource_group
        );

        let output = Command::new(&az)
            .args([
                "vm",
                "run-command",
                "invoke",
                "--resource-group",
                resource_group,
                "--name",
                vm_name,
                "--command-id",
                "RunPowerShellScript",
                "--scripts",
                script,
                "--output",
                "json",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "az vm run-command failed ({}): {}",
                output.status,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_run_command_output(&stdout))
    }

    pub async fn vm_info(&self, vm_name: &str, resource_group: &str) -> Result<VmInfo> {
        // Fail fast before issuing three remote commands.
        self.locate()?;

        let probe = |script: &'static str| async move {
            match self.run_powershell(vm_name, resource_group, script).await {
                Ok(out) => out,
                Err(e) => {
                    tracing::warn!(
                        target: "sheriff.az",
                        stage = "az.probe.degraded",
                        vm = %vm_name,
                        error = %e
                    );
                    None
                }
            }
        };

        let (build, gw, hotfixes) = tokio::join!(
            probe(WINDOWS_BUILD_SCRIPT),
            probe(GENERIC_WORKER_VERSION_SCRIPT),
            probe(HOTFIX_SCRIPT)
        );

        Ok(VmInfo {
            vm_name: vm_name.to_string(),
            resource_group: resource_group.to_string(),
            windows_build: build.map(|s| s.trim().to_string()),
            generic_worker_version: gw.map(|s| s.trim().to_string()),
            recent_hotfixes: hotfixes.map(|s| {
                serde_json::from_str::<Value>(&s).unwrap_or(Value::String(s))
            }),
        })
    }
}

/// `value[0].message` of the run-command response, or the raw text when
/// the output is not JSON.
pub fn parse_run_command_output(stdout: &str) -> Option<String> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(v) => v
            .pointer("/value/0/message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(_) => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command_output_message() {
        let out = r#"{"value":[
            {"code":"ComponentStatus/StdOut/succeeded","message":"26100\n"},
            {"code":"ComponentStatus/StdErr/succeeded","message":""}
        ]}"#;
        assert_eq!(parse_run_command_output(out).as_deref(), Some("26100\n"));
    }

    #[test]
    fn test_parse_run_command_output_empty_value() {
        assert_eq!(parse_run_command_output(r#"{"value":[]}"#), None);
        assert_eq!(parse_run_command_output("  "), None);
    }

    #[test]
    fn test_parse_run_command_output_raw_text() {
        assert_eq!(
            parse_run_command_output("plain output\n").as_deref(),
            Some("plain output")
        );
    }

    #[tokio::test]
    async fn test_missing_az_binary_is_error() {
        let inspector = AzureVmInspector::new(&AzureConfig {
            az_bin: "definitely-not-an-az-binary-7f3a".to_string(),
        });
        let err = inspector.vm_info("vm-1", "rg").await.unwrap_err();
        assert!(err.to_string().contains("az CLI not found"));
    }
}
